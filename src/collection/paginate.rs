// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side pagination over an already loaded list.

/// Current page over a list, 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    page: usize,
}

impl Paginator {
    /// A zero page size is treated as 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// `ceil(len / page_size)`; 0 for an empty list.
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    /// Move to `page`, clamped to `[1, max(total_pages, 1)]`. Returns the page set.
    pub fn set_page(&mut self, page: usize, len: usize) -> usize {
        let last = self.total_pages(len).max(1);
        self.page = page.clamp(1, last);
        self.page
    }

    pub fn next(&mut self, len: usize) -> usize {
        self.set_page(self.page.saturating_add(1), len)
    }

    pub fn previous(&mut self, len: usize) -> usize {
        self.set_page(self.page.saturating_sub(1), len)
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Items `[(page-1)*size, page*size)` of `items`, truncated at the end.
    ///
    /// A page past the end (the list shrank after a re-fetch) yields an empty slice.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.page - 1).saturating_mul(self.page_size);
        if start >= items.len() {
            return &[];
        }
        let end = start.saturating_add(self.page_size).min(items.len());
        &items[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twenty_three_items_by_ten() {
        let items: Vec<u32> = (1..=23).collect();
        let mut pager = Paginator::new(10);

        assert_eq!(pager.total_pages(items.len()), 3);
        pager.set_page(2, items.len());
        assert_eq!(pager.slice(&items), &(11..=20).collect::<Vec<_>>()[..]);
        pager.set_page(3, items.len());
        assert_eq!(pager.slice(&items), &[21, 22, 23]);
    }

    #[test]
    fn test_pages_reconstruct_list() {
        for page_size in 1..=7 {
            for len in 0..=30 {
                let items: Vec<usize> = (0..len).collect();
                let mut pager = Paginator::new(page_size);
                let total = pager.total_pages(len);
                assert_eq!(total, (len + page_size - 1) / page_size);

                let mut rebuilt = Vec::new();
                for page in 1..=total {
                    pager.set_page(page, len);
                    rebuilt.extend_from_slice(pager.slice(&items));
                }
                assert_eq!(rebuilt, items, "size={page_size} len={len}");
            }
        }
    }

    #[test]
    fn test_page_is_clamped() {
        let mut pager = Paginator::new(5);
        assert_eq!(pager.set_page(0, 12), 1);
        assert_eq!(pager.set_page(99, 12), 3);
        assert_eq!(pager.next(12), 3);
        assert_eq!(pager.previous(12), 2);
        assert_eq!(pager.set_page(4, 0), 1);
    }

    #[test]
    fn test_stale_page_after_shrink_is_empty() {
        let mut pager = Paginator::new(5);
        pager.set_page(3, 15);
        let shrunk = [1, 2, 3];
        assert!(pager.slice(&shrunk).is_empty());
    }
}
