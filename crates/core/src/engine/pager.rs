//! Fixed-size page windows over the result list.

/// Results per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Number of pages needed to show `results`, `ceil(len / page_size)`.
///
/// A zero page size has no pages.
pub fn page_count<T>(results: &[T], page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    results.len().div_ceil(page_size)
}

/// The slice shown on 1-based page `page_index`.
///
/// Pages past the end (and page 0) are empty rather than an error: the
/// caller is a display layer and an empty page is a valid thing to render.
pub fn select_page<T>(results: &[T], page_index: usize, page_size: usize) -> &[T] {
    if page_index == 0 || page_size == 0 {
        return &[];
    }
    let start = (page_index - 1).saturating_mul(page_size);
    if start >= results.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(results.len());
    &results[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: usize) -> Vec<usize> {
        (1..=n).collect()
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(&numbers(12), 5), 3);
        assert_eq!(page_count(&numbers(10), 5), 2);
        assert_eq!(page_count(&numbers(1), 5), 1);
        assert_eq!(page_count::<usize>(&[], 5), 0);
    }

    #[test]
    fn test_page_count_zero_size() {
        assert_eq!(page_count(&numbers(3), 0), 0);
    }

    #[test]
    fn test_last_partial_page() {
        let results = numbers(12);
        assert_eq!(select_page(&results, 3, 5), &[11, 12]);
    }

    #[test]
    fn test_full_pages() {
        let results = numbers(12);
        assert_eq!(select_page(&results, 1, 5), &[1, 2, 3, 4, 5]);
        assert_eq!(select_page(&results, 2, 5), &[6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_out_of_range_is_empty() {
        let results = numbers(12);
        assert!(select_page(&results, 4, 5).is_empty());
        assert!(select_page(&results, 0, 5).is_empty());
        assert!(select_page(&results, usize::MAX, 5).is_empty());
        assert!(select_page::<usize>(&[], 1, 5).is_empty());
    }
}
