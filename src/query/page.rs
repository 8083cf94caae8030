//! Pagination over a filtered list.

/// Posts per listing page
pub const DEFAULT_PAGE_SIZE: usize = 4;

/// Number of pages for `len` items; an empty list still has one page.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Clamp a 1-based page into `[1, total_pages]`.
pub fn clamp_page(page: usize, len: usize, page_size: usize) -> usize {
    page.clamp(1, total_pages(len, page_size))
}

/// The slice shown on `page` (1-based). Out-of-range pages are empty.
pub fn page_window<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(size).min(items.len());
    let end = start.saturating_add(size).min(items.len());
    &items[start..end]
}

/// Page holding the post `key` within `filtered`, or `None` when the post
/// is not part of the list.
pub fn page_for_key<T, F>(filtered: &[T], key: &str, page_size: usize, key_of: F) -> Option<usize>
where
    F: Fn(&T) -> &str,
{
    filtered
        .iter()
        .position(|item| key_of(item) == key)
        .map(|index| index / page_size.max(1) + 1)
}
