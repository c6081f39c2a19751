use serde::{Deserialize, Serialize};

/// Number of posts shown per feed page unless configured otherwise.
pub const DEFAULT_PER_PAGE: u64 = 10;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn first(per_page: u64) -> Self {
        Self::new(1, per_page)
    }

    /// Number of pages `total` items fill; never zero.
    pub fn pages_for(&self, total: u64) -> u64 {
        total.div_ceil(self.per_page).max(1)
    }

    /// Whether this page exists for a result set of `total` items.
    pub fn fits(&self, total: u64) -> bool {
        self.page <= self.pages_for(total)
    }

    /// Number of items to skip. Saturates for absurd page numbers.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PER_PAGE)
    }
}

/// One page of results plus the size of the whole result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            page: request.page,
            per_page: request.per_page,
            total,
        }
    }

    /// Slice a fully materialized, already ordered result set.
    pub fn from_all(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(request.per_page).unwrap_or(usize::MAX))
            .collect();
        Self::new(items, request, total)
    }

    /// Total number of pages; an empty result still has one (empty) page.
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.per_page.max(1)).max(1)
    }

    /// Whether the requested page exists.
    pub fn in_range(&self) -> bool {
        self.page <= self.total_pages()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_clamps_to_first_page() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.page, 1);
        assert_eq!(request.per_page, 1);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_from_all_slices_requested_window() {
        let page = Page::from_all((1..=25).collect::<Vec<u32>>(), PageRequest::new(3, 10));

        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages(), 3);
        assert!(page.in_range());
    }

    #[test]
    fn test_huge_page_number_does_not_overflow() {
        let request = PageRequest::new(u64::MAX, 10);
        assert_eq!(request.offset(), u64::MAX);

        let page = Page::from_all((1..=5).collect::<Vec<u32>>(), request);
        assert!(page.items.is_empty());
        assert!(!page.in_range());
        assert!(!request.fits(5));
    }

    #[test]
    fn test_empty_result_has_single_page() {
        let page = Page::from_all(Vec::<u32>::new(), PageRequest::first(10));
        assert_eq!(page.total_pages(), 1);
        assert!(page.in_range());

        let beyond = Page::from_all(Vec::<u32>::new(), PageRequest::new(2, 10));
        assert!(!beyond.in_range());
    }
}
