//! Terminal and JSON renderings of listing views.

use crate::{
    post::{Byline, Post, Roster},
    query::{Facet, QueryState, Vocabulary},
    session::ListingView,
    utils::{date::display_date, text::md_to_plain},
};
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;

/// Listing entry without the article body.
#[derive(Debug, Clone, Serialize)]
pub struct PostCard<'a> {
    pub key: &'a str,
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<&'a str>,
    /// Short form such as `Jan 5, 2025`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_date: Option<String>,
    pub excerpt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byline: Option<Byline>,
    pub tags: &'a [String],
    pub values: &'a [String],
    pub vendors: &'a [String],
    pub technologies: &'a [String],
    pub other: &'a [String],
}

impl<'a> PostCard<'a> {
    pub fn new(post: &'a Post, roster: &Roster) -> Self {
        Self {
            key: &post.key,
            title: &post.title,
            date: post.date.as_deref(),
            display_date: post.date.as_deref().map(display_date),
            excerpt: &post.excerpt,
            byline: roster.byline(post),
            tags: &post.tags,
            values: &post.values,
            vendors: &post.vendors,
            technologies: &post.technologies,
            other: &post.other,
        }
    }
}

/// A full article: card fields plus the body.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail<'a> {
    #[serde(flatten)]
    pub card: PostCard<'a>,
    pub content_md: &'a str,
    pub content_plain: String,
}

impl<'a> PostDetail<'a> {
    pub fn new(post: &'a Post, roster: &Roster) -> Self {
        Self {
            card: PostCard::new(post, roster),
            content_md: &post.content_md,
            content_plain: md_to_plain(&post.content_md),
        }
    }
}

/// JSON document for one listing page.
#[derive(Debug, Clone, Serialize)]
pub struct ListingDocument<'a> {
    pub url: &'a str,
    pub state: &'a QueryState,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
    pub page_size: usize,
    pub posts: Vec<PostCard<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded: Option<PostDetail<'a>>,
    pub facets: &'a Vocabulary,
}

impl<'a> ListingDocument<'a> {
    pub fn new(view: &ListingView<'a>, roster: &Roster, facets: &'a Vocabulary) -> Self {
        Self {
            url: view.url,
            state: view.state,
            page: view.page.page,
            total_pages: view.page.total_pages,
            total: view.page.total,
            page_size: view.page.page_size,
            posts: view.page.posts.iter().map(|&p| PostCard::new(p, roster)).collect(),
            expanded: view.page.expanded.map(|p| PostDetail::new(p, roster)),
            facets,
        }
    }
}

/// Human-readable listing page.
pub fn listing_text(view: &ListingView<'_>, roster: &Roster) -> String {
    let mut out = String::new();
    let page = &view.page;

    if page.is_empty() {
        let _ = writeln!(out, "{}", "No posts match the current filters.".dimmed());
        return out;
    }

    let _ = writeln!(
        out,
        "{}",
        format!(
            "{} posts, page {} of {}",
            page.total, page.page, page.total_pages
        )
        .bold()
    );

    for post in &page.posts {
        let expanded = page.expanded.is_some_and(|e| e.key == post.key);
        out.push('\n');
        write_card(&mut out, post, roster, expanded);
        if expanded {
            let body = md_to_plain(&post.content_md);
            if !body.is_empty() {
                let _ = writeln!(out, "\n    {body}");
            }
        }
    }

    out
}

fn write_card(out: &mut String, post: &Post, roster: &Roster, expanded: bool) {
    let marker = if expanded { "▾" } else { "•" };
    let _ = writeln!(out, "{} {} {}", marker, post.title.bold(), format!("#{}", post.key).dimmed());

    let mut meta = Vec::new();
    if let Some(date) = post.date.as_deref() {
        meta.push(display_date(date));
    }
    if let Some(byline) = roster.byline(post) {
        meta.push(match byline.role {
            Some(role) => format!("{} ({role})", byline.name),
            None => byline.name,
        });
    }
    if !meta.is_empty() {
        let _ = writeln!(out, "  {}", meta.join(" · ").dimmed());
    }
    if !post.excerpt.is_empty() {
        let _ = writeln!(out, "  {}", post.excerpt);
    }
    if !post.tags.is_empty() {
        let tags: Vec<String> = post.tags.iter().map(|t| format!("[{t}]")).collect();
        let _ = writeln!(out, "  {}", tags.join(" ").cyan());
    }
}

/// Human-readable facet vocabularies, one facet or all of them.
pub fn facets_text(vocabulary: &Vocabulary, facet: Option<Facet>) -> String {
    let mut out = String::new();
    let facets = facet.map_or_else(|| Facet::ALL.to_vec(), |f| vec![f]);

    for facet in facets {
        let values = vocabulary.get(facet);
        let _ = writeln!(
            out,
            "{} {}",
            format!("{facet}:").bold(),
            format!("({})", values.len()).dimmed()
        );
        for value in values {
            let _ = writeln!(out, "  {value}");
        }
    }
    out
}
