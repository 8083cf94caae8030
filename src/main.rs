//! postq - query, browse and serve a blog post collection.

use anyhow::{Context, Result};
use clap::Parser;
use postq::{
    cli::{Cli, Commands, NavAction},
    config::PostqConfig,
    location::MemoryHistory,
    log,
    post::Roster,
    query::Facet,
    render::{ListingDocument, facets_text, listing_text},
    serve::serve,
    session::BlogSession,
    source::IndexLoader,
    store::{FLAG_COMPACT, MemoryStore},
    utils::log::set_quiet,
};
use serde_json::json;

type Session = BlogSession<MemoryHistory, MemoryStore>;

fn main() -> Result<()> {
    let cli = Cli::parse();
    set_quiet(cli.quiet);
    let config = PostqConfig::load(&cli)?;

    match cli.command {
        Commands::Query { url, json, .. } => query(&config, &url, json),
        Commands::Facets { facet, json } => facets(&config, facet, json),
        Commands::Nav { url, action } => nav(&config, &url, action),
        Commands::Serve { .. } => serve(config),
    }
}

/// Load posts and mount a session at `url`.
fn open_session(config: &PostqConfig, url: &str) -> Session {
    let loaded = IndexLoader::from_config(config).load(false);
    let roster = Roster::new(config.authors.clone(), config.blog.default_author.clone());
    let flags = MemoryStore::with_values([(FLAG_COMPACT.to_owned(), json!(config.blog.compact))]);
    BlogSession::new(
        loaded.posts,
        roster,
        &config.blog,
        MemoryHistory::new(url),
        flags,
    )
}

fn query(config: &PostqConfig, url: &str, as_json: bool) -> Result<()> {
    let session = open_session(config, url);
    if session.url() != url {
        log!("query"; "{} -> {}", url, session.url());
    }

    let view = session.view();
    if as_json {
        let doc = ListingDocument::new(&view, session.roster(), session.vocabulary());
        println!(
            "{}",
            serde_json::to_string_pretty(&doc).context("Failed to encode listing")?
        );
    } else {
        print!("{}", listing_text(&view, session.roster()));
    }
    Ok(())
}

fn facets(config: &PostqConfig, facet: Option<Facet>, as_json: bool) -> Result<()> {
    let session = open_session(config, &config.blog.base_path);
    let vocabulary = session.vocabulary();

    if as_json {
        let value = match facet {
            Some(facet) => json!(vocabulary.get(facet)),
            None => json!(vocabulary),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", facets_text(vocabulary, facet));
    }
    Ok(())
}

fn nav(config: &PostqConfig, url: &str, action: NavAction) -> Result<()> {
    let mut session = open_session(config, url);

    match action {
        NavAction::Search { text } => session.set_search(&text),
        NavAction::Toggle { facet, value } => session.toggle_facet(facet, &value),
        NavAction::Sort { key } => session.set_sort(key),
        NavAction::Page { page } => session.set_page(page),
        NavAction::Open { key } => session.open_post(&key),
        NavAction::Close => session.close_post(),
        NavAction::Reset => session.reset(),
    }

    println!("{}", session.url());
    Ok(())
}
