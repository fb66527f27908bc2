use std::ops::Range;

use crate::utils::help::page_count;

/// 1-based page cursor over a list whose length is supplied per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, len: usize) -> usize {
        page_count(len, self.page_size)
    }

    /// Move to `page`; out-of-range requests are ignored.
    pub fn change_page(&mut self, page: usize, len: usize) -> bool {
        if page < 1 || page > self.total_pages(len) {
            return false;
        }
        self.page = page;
        true
    }

    /// Index range of the current page, empty past the end.
    pub fn range(&self, len: usize) -> Range<usize> {
        let start = (self.page - 1).saturating_mul(self.page_size).min(len);
        let end = start.saturating_add(self.page_size).min(len);
        start..end
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Pull the page back inside `[1, total_pages]`; page 1 when empty.
    pub fn clamp(&mut self, len: usize) {
        let total = self.total_pages(len);
        if total == 0 {
            self.page = 1;
        } else if self.page > total {
            self.page = total;
        }
    }

    /// After an insert at the front: go back to page 1 when the current
    /// page is already full so the new item is visible.
    pub fn rewind_if_full(&mut self, len: usize) {
        if self.range(len).len() >= self.page_size {
            self.page = 1;
        }
    }

    /// After a removal: step back one page when the current one emptied.
    pub fn step_back_if_empty(&mut self, len: usize) {
        if self.range(len).is_empty() && self.page > 1 {
            self.page -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_is_ceiling() {
        let pager = Pager::new(6);
        assert_eq!(pager.total_pages(0), 0);
        assert_eq!(pager.total_pages(6), 1);
        assert_eq!(pager.total_pages(7), 2);
    }

    #[test]
    fn change_page_respects_bounds() {
        let mut pager = Pager::new(24);
        assert!(!pager.change_page(0, 50));
        assert!(!pager.change_page(4, 50));
        assert!(pager.change_page(3, 50));
        assert_eq!(pager.current(), 3);
        assert!(!pager.change_page(1, 0));
        assert_eq!(pager.current(), 3);
    }

    #[test]
    fn range_covers_the_tail() {
        let mut pager = Pager::new(24);
        assert!(pager.change_page(3, 50));
        assert_eq!(pager.range(50), 48..50);
        assert_eq!(pager.range(10), 10..10);
    }

    #[test]
    fn clamp_collapses_to_valid_page() {
        let mut pager = Pager::new(6);
        assert!(pager.change_page(3, 18));
        pager.clamp(7);
        assert_eq!(pager.current(), 2);
        pager.clamp(0);
        assert_eq!(pager.current(), 1);
    }

    #[test]
    fn step_back_only_when_emptied() {
        let mut pager = Pager::new(6);
        assert!(pager.change_page(2, 7));
        pager.step_back_if_empty(7);
        assert_eq!(pager.current(), 2);
        pager.step_back_if_empty(6);
        assert_eq!(pager.current(), 1);
        pager.step_back_if_empty(0);
        assert_eq!(pager.current(), 1);
    }

    #[test]
    fn zero_page_size_is_lifted_to_one() {
        assert_eq!(Pager::new(0).page_size(), 1);
    }
}
