//! Page-number pagination with lenient page resolution.
//!
//! A missing or non-numeric page number resolves to the first page, and a
//! number outside `1..=num_pages` resolves to the last page. Resolution never
//! fails, and an empty collection still has one (empty) page.

use serde::Serialize;

/// Splits `total` items into pages of `per_page`.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    per_page: u64,
    total: u64,
}

impl Paginator {
    pub fn new(per_page: u64, total: u64) -> Self {
        Self {
            per_page: per_page.max(1),
            total,
        }
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    pub fn num_pages(&self) -> u64 {
        if self.total == 0 {
            1
        } else {
            self.total.div_ceil(self.per_page)
        }
    }

    /// Resolve a raw `?page=` value to a valid page number.
    pub fn resolve(&self, raw: Option<&str>) -> u64 {
        let Some(raw) = raw else {
            return 1;
        };

        match raw.trim().parse::<i64>() {
            Err(_) => 1,
            Ok(n) if n < 1 || n as u64 > self.num_pages() => self.num_pages(),
            Ok(n) => n as u64,
        }
    }

    /// Offset of the first item on `number`.
    pub fn offset(&self, number: u64) -> u64 {
        number.saturating_sub(1) * self.per_page
    }

    /// Wrap the items fetched for `number` into a [`Page`].
    pub fn page<T>(&self, number: u64, items: Vec<T>) -> Page<T> {
        Page {
            items,
            number,
            num_pages: self.num_pages(),
            total: self.total,
            per_page: self.per_page,
        }
    }
}

/// One page of results plus its position in the whole collection.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
    pub per_page: u64,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<u64> {
        self.has_next().then(|| self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<u64> {
        self.has_previous().then(|| self.number - 1)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_pages() {
        assert_eq!(Paginator::new(3, 0).num_pages(), 1);
        assert_eq!(Paginator::new(3, 3).num_pages(), 1);
        assert_eq!(Paginator::new(3, 4).num_pages(), 2);
        assert_eq!(Paginator::new(3, 7).num_pages(), 3);
    }

    #[test]
    fn test_resolve_missing_and_garbage_to_first_page() {
        let paginator = Paginator::new(3, 7);
        assert_eq!(paginator.resolve(None), 1);
        assert_eq!(paginator.resolve(Some("abc")), 1);
        assert_eq!(paginator.resolve(Some("")), 1);
        assert_eq!(paginator.resolve(Some("2.5")), 1);
    }

    #[test]
    fn test_resolve_out_of_range_to_last_page() {
        let paginator = Paginator::new(3, 7);
        assert_eq!(paginator.resolve(Some("4")), 3);
        assert_eq!(paginator.resolve(Some("9999")), 3);
        assert_eq!(paginator.resolve(Some("0")), 3);
        assert_eq!(paginator.resolve(Some("-1")), 3);
    }

    #[test]
    fn test_resolve_in_range() {
        let paginator = Paginator::new(3, 7);
        assert_eq!(paginator.resolve(Some("1")), 1);
        assert_eq!(paginator.resolve(Some(" 2 ")), 2);
        assert_eq!(paginator.resolve(Some("3")), 3);
    }

    #[test]
    fn test_page_navigation() {
        let paginator = Paginator::new(3, 7);
        assert_eq!(paginator.offset(3), 6);

        let first = paginator.page(1, vec![1, 2, 3]);
        assert!(first.has_next());
        assert!(!first.has_previous());
        assert_eq!(first.next_page_number(), Some(2));
        assert_eq!(first.previous_page_number(), None);

        let last = paginator.page(3, vec![7]);
        assert!(!last.has_next());
        assert!(last.has_previous());
        assert_eq!(last.previous_page_number(), Some(2));
    }

    #[test]
    fn test_empty_collection_has_single_empty_page() {
        let paginator = Paginator::new(3, 0);
        let number = paginator.resolve(Some("5"));
        assert_eq!(number, 1);

        let page: Page<u8> = paginator.page(number, Vec::new());
        assert!(page.items.is_empty());
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }
}
