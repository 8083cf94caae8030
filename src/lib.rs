//! postq - filter, sort, paginate and URL-sync a blog post collection.
//!
//! The [`query`] module is the pure engine. [`session`] binds it to a URL
//! [`location`] and a [`store`] of view flags; [`source`] loads posts,
//! [`render`] and [`serve`] present them.

pub mod cli;
pub mod config;
pub mod location;
pub mod post;
pub mod query;
pub mod render;
pub mod serve;
pub mod session;
pub mod source;
pub mod store;
pub mod utils;
