//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use crate::query::{Facet, SortKey};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Query, browse and serve a blog post collection
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory (config and index paths resolve against it)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: postq.toml)
    #[arg(short = 'C', long, default_value = "postq.toml")]
    pub config: PathBuf,

    /// Posts index (JSON), overrides [source.index]
    #[arg(short, long)]
    pub index: Option<PathBuf>,

    /// Suppress log output
    #[arg(short, long)]
    pub quiet: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Evaluate a listing URL and print the resulting page
    Query {
        /// Listing URL, e.g. `/blog?tags=rust&page=2#my-post`
        #[arg(default_value = "/blog")]
        url: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Posts per page, overrides [blog.page_size]
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Print the distinct values of one facet, or of all facets
    Facets {
        /// tags, authors, values, vendors, tech or other
        facet: Option<Facet>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Apply one listing action to a URL and print the URL it leads to
    Nav {
        /// Starting listing URL
        url: String,

        #[command(subcommand)]
        action: NavAction,
    },

    /// Serve listing views as JSON over HTTP
    Serve {
        /// Interface to bind on
        #[arg(long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Listing actions accepted by `postq nav`
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    /// Replace the search text (empty clears it)
    Search {
        #[arg(default_value = "")]
        text: String,
    },
    /// Select or deselect one facet value
    Toggle { facet: Facet, value: String },
    /// Change the listing order
    Sort { key: SortKey },
    /// Go to a page
    Page { page: usize },
    /// Expand a post
    Open { key: String },
    /// Collapse the expanded post
    Close,
    /// Clear search, filters and expansion
    Reset,
}

#[allow(unused)]
impl Cli {
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }

    pub const fn wants_json(&self) -> bool {
        matches!(
            self.command,
            Commands::Query { json: true, .. } | Commands::Facets { json: true, .. }
        )
    }
}
