//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

// ============================================================================
// [blog] Section Defaults
// ============================================================================

pub mod blog {
    use crate::query::{DEFAULT_BASE_PATH, DEFAULT_PAGE_SIZE};

    pub fn base_path() -> String {
        DEFAULT_BASE_PATH.into()
    }

    pub fn page_size() -> usize {
        DEFAULT_PAGE_SIZE
    }
}

// ============================================================================
// [source] Section Defaults
// ============================================================================

pub mod source {
    pub fn cache_ttl_secs() -> u64 {
        300
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        5278
    }
}
