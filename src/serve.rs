//! JSON server for listing views.
//!
//! Built on `tiny_http`, one request at a time:
//!
//! | Route                      | Response                                  |
//! |----------------------------|-------------------------------------------|
//! | `GET <base>?...`           | the listing page for that URL             |
//! | `GET <base>/article/<key>` | one post with its body, or 404            |
//! | `GET /facets`              | vocabularies of all facets                |
//! | anything else              | 404 (405 for non-GET methods)             |
//!
//! Posts come from the [`IndexLoader`], so index edits show up once the
//! cache expires. Ctrl+C unblocks the accept loop for a clean shutdown.

use crate::{
    config::PostqConfig,
    location::MemoryHistory,
    log,
    post::{Post, Roster},
    query::Vocabulary,
    render::{ListingDocument, PostDetail},
    session::BlogSession,
    source::IndexLoader,
    store::{FLAG_COMPACT, MemoryStore},
};
use anyhow::{Context, Result, anyhow};
use serde_json::{Value, json};
use std::{net::SocketAddr, sync::Arc};
use tiny_http::{Header, Method, Request, Response, Server};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

/// Shared state of the server.
pub struct App {
    config: PostqConfig,
    loader: IndexLoader,
    roster: Roster,
}

impl App {
    pub fn new(config: PostqConfig, loader: IndexLoader) -> Self {
        let roster = Roster::new(config.authors.clone(), config.blog.default_author.clone());
        Self {
            config,
            loader,
            roster,
        }
    }

    /// Resolve a GET request URL to a status code and JSON body.
    pub fn route(&self, url: &str) -> (u16, Value) {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let base = self.config.blog.base_path.trim_end_matches('/');
        let article_prefix = format!("{base}/article/");

        if path == base || path.strip_suffix('/') == Some(base) {
            return (200, self.listing(url));
        }
        if let Some(raw_key) = path.strip_prefix(&article_prefix) {
            return self.article(raw_key);
        }
        if path == "/facets" {
            let posts = self.loader.load(false).posts;
            return (200, json!(Vocabulary::collect(&posts)));
        }

        (404, json!({ "error": "not found", "path": path }))
    }

    fn session(&self, posts: Arc<Vec<Post>>, url: &str) -> BlogSession<MemoryHistory, MemoryStore> {
        let flags =
            MemoryStore::with_values([(FLAG_COMPACT.to_owned(), json!(self.config.blog.compact))]);
        BlogSession::new(
            posts,
            self.roster.clone(),
            &self.config.blog,
            MemoryHistory::new(url),
            flags,
        )
    }

    fn listing(&self, url: &str) -> Value {
        let loaded = self.loader.load(false);
        let session = self.session(loaded.posts, url);
        let view = session.view();
        let doc = ListingDocument::new(&view, session.roster(), session.vocabulary());
        json!({ "origin": loaded.origin, "listing": doc })
    }

    fn article(&self, raw_key: &str) -> (u16, Value) {
        let key = urlencoding::decode(raw_key.trim_end_matches('/'))
            .map(|k| k.into_owned())
            .unwrap_or_else(|_| raw_key.to_owned());
        let posts = self.loader.load(false).posts;

        match posts.iter().find(|p| p.key == key) {
            Some(post) => (200, json!(PostDetail::new(post, &self.roster))),
            None => (404, json!({ "error": "no such post", "key": key })),
        }
    }
}

// ============================================================================
// Server Entry Point
// ============================================================================

/// Serve listing views until Ctrl+C.
pub fn serve(config: PostqConfig) -> Result<()> {
    let interface: std::net::IpAddr = config
        .serve
        .interface
        .parse()
        .with_context(|| format!("invalid [serve.interface] `{}`", config.serve.interface))?;
    let base_port = config.serve.port;

    let (server, addr) = try_bind_port(interface, base_port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    // Set up Ctrl+C handler for graceful shutdown
    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    let loader = IndexLoader::from_config(&config);
    let listing = format!("http://{addr}{}", config.blog.base_path);
    let app = App::new(config, loader);
    log!("serve"; "{listing}");

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &app) {
            log!("error"; "request error: {e}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(
    interface: std::net::IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_error.map_or_else(|| "no attempt made".to_owned(), |e| e.to_string())
    ))
}

// ============================================================================
// Request Handling
// ============================================================================

fn handle_request(request: Request, app: &App) -> Result<()> {
    let (status, body) = if matches!(request.method(), Method::Get | Method::Head) {
        app.route(request.url())
    } else {
        (405, json!({ "error": "method not allowed" }))
    };

    if status >= 400 {
        log!("serve"; "{} {} -> {}", request.method(), request.url(), status);
    }
    respond_json(request, status, &body)
}

fn respond_json(request: Request, status: u16, body: &Value) -> Result<()> {
    let content_type = Header::from_bytes("Content-Type", "application/json; charset=utf-8")
        .map_err(|()| anyhow!("invalid Content-Type header"))?;
    let response = Response::from_string(serde_json::to_string(body)?)
        .with_status_code(status)
        .with_header(content_type);

    request.respond(response)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ContentSource;
    use std::time::Duration;

    struct Inline(&'static str);

    impl ContentSource for Inline {
        fn load(&self) -> Result<Vec<Value>, crate::source::SourceError> {
            crate::source::parse_index(self.0, "inline")
        }

        fn origin(&self) -> String {
            "inline".into()
        }
    }

    fn app() -> App {
        let posts = r#"[
            {"slug": "a", "title": "Alpha", "posted_date": "2025-01-03", "tags": ["x"], "body": "Alpha **body**"},
            {"slug": "b", "title": "Beta", "posted_date": "2025-01-02", "tags": ["y"]},
            {"slug": "c d", "title": "Gamma", "posted_date": "2025-01-01", "tags": ["x"]}
        ]"#;
        let config = PostqConfig::from_str("[blog]\npage_size = 2").unwrap();
        let loader = IndexLoader::new(vec![Box::new(Inline(posts))], Duration::from_secs(60));
        App::new(config, loader)
    }

    #[test]
    fn test_route_listing() {
        let (status, body) = app().route("/blog?tags=x");
        assert_eq!(status, 200);
        assert_eq!(body["origin"], "inline");
        assert_eq!(body["listing"]["total"], 2);
        assert_eq!(body["listing"]["posts"][0]["key"], "a");
    }

    #[test]
    fn test_route_listing_resolves_deep_link() {
        let (_, body) = app().route("/blog#c%20d");
        assert_eq!(body["listing"]["page"], 2);
        assert_eq!(body["listing"]["url"], "/blog?page=2#c%20d");
        assert_eq!(body["listing"]["expanded"]["key"], "c d");
    }

    #[test]
    fn test_route_article() {
        let app = app();
        let (status, body) = app.route("/blog/article/a");
        assert_eq!(status, 200);
        assert_eq!(body["content_plain"], "Alpha body");

        let (status, body) = app.route("/blog/article/c%20d");
        assert_eq!(status, 200);
        assert_eq!(body["title"], "Gamma");

        let (status, _) = app.route("/blog/article/missing");
        assert_eq!(status, 404);
    }

    #[test]
    fn test_route_facets_and_not_found() {
        let app = app();
        let (status, body) = app.route("/facets");
        assert_eq!(status, 200);
        assert_eq!(body["tags"], json!(["x", "y"]));
        assert_eq!(body["authors"], json!([]));
        assert_eq!(body.as_object().map(|o| o.len()), Some(6));

        let (status, body) = app.route("/nope");
        assert_eq!(status, 404);
        assert_eq!(body["path"], "/nope");
    }
}
