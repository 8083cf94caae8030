//! Read/write URL location used by the blog session.
//!
//! In a browser this is the history API; here it is a trait so that the
//! session can be driven from the CLI, the JSON server or tests.

use std::fmt;

/// How a navigation affects history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    /// Add a new history entry (back returns to the previous view)
    Push,
    /// Overwrite the current entry (typing, automatic page jumps)
    Replace,
}

impl fmt::Display for NavigationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Push => "push",
            Self::Replace => "replace",
        })
    }
}

/// A navigable URL location.
pub trait Location {
    /// Current relative URL, e.g. `/blog?page=2#post`.
    fn current(&self) -> &str;

    /// Move to `url`.
    fn navigate(&mut self, url: &str, mode: NavigationMode);
}

/// In-memory history stack with back/forward support.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    index: usize,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            index: 0,
        }
    }

    /// Step back one entry. Returns false at the start of history.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Step forward one entry. Returns false at the end of history.
    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Location for MemoryHistory {
    fn current(&self) -> &str {
        &self.entries[self.index]
    }

    fn navigate(&mut self, url: &str, mode: NavigationMode) {
        match mode {
            NavigationMode::Push => {
                self.entries.truncate(self.index + 1);
                self.entries.push(url.to_owned());
                self.index += 1;
            }
            NavigationMode::Replace => self.entries[self.index] = url.to_owned(),
        }
    }
}
