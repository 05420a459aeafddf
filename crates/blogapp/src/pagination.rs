//! Page arithmetic for zero-indexed listings.

/// Number of pages needed for `total_elements` items at `size` per page.
/// An empty collection has zero pages.
pub fn total_pages(total_elements: u64, size: u32) -> u32 {
    if size == 0 || total_elements == 0 {
        return 0;
    }
    total_elements.div_ceil(size as u64) as u32
}

/// Navigation state over a paged listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub current: u32,
    pub total_pages: u32,
}

impl Pager {
    pub const WINDOW: u32 = 5;

    pub fn new(current: u32, total_pages: u32) -> Self {
        Self {
            current,
            total_pages,
        }
    }

    pub fn has_prev(&self) -> bool {
        self.current > 0
    }

    pub fn has_next(&self) -> bool {
        self.total_pages > 0 && self.current < self.total_pages - 1
    }

    pub fn prev(&self) -> u32 {
        self.current.saturating_sub(1)
    }

    pub fn next(&self) -> u32 {
        if self.total_pages == 0 {
            return 0;
        }
        self.current.saturating_add(1).min(self.total_pages - 1)
    }

    /// Only listings with more than one page show navigation.
    pub fn is_visible(&self) -> bool {
        self.total_pages > 1
    }

    /// Up to [`Self::WINDOW`] page numbers starting two before the current one.
    pub fn window(&self) -> Vec<u32> {
        let start = self.current.saturating_sub(2);
        (start..start.saturating_add(Self::WINDOW))
            .filter(|&page| page < self.total_pages)
            .collect()
    }

    /// 1-based inclusive item range shown on the current page,
    /// e.g. `(11, 20)` for page 1 at size 10.
    pub fn showing(&self, page_size: u32, total_elements: u64) -> (u64, u64) {
        if total_elements == 0 {
            return (0, 0);
        }
        let start = self.current as u64 * page_size as u64 + 1;
        let end = ((self.current as u64 + 1) * page_size as u64).min(total_elements);
        (start.min(total_elements), end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 6), 0);
        assert_eq!(total_pages(1, 6), 1);
        assert_eq!(total_pages(6, 6), 1);
        assert_eq!(total_pages(7, 6), 2);
        assert_eq!(total_pages(10, 0), 0);
    }

    #[test]
    fn test_prev_next_clamp() {
        let pager = Pager::new(0, 3);
        assert!(!pager.has_prev());
        assert_eq!(pager.prev(), 0);
        assert_eq!(pager.next(), 1);

        let last = Pager::new(2, 3);
        assert!(!last.has_next());
        assert_eq!(last.next(), 2);
    }

    #[test]
    fn test_empty_listing() {
        let pager = Pager::new(0, 0);
        assert!(!pager.has_next());
        assert!(!pager.is_visible());
        assert_eq!(pager.next(), 0);
        assert!(pager.window().is_empty());
        assert_eq!(pager.showing(10, 0), (0, 0));
    }

    #[test]
    fn test_window_slides() {
        assert_eq!(Pager::new(0, 10).window(), vec![0, 1, 2, 3, 4]);
        assert_eq!(Pager::new(5, 10).window(), vec![3, 4, 5, 6, 7]);
        assert_eq!(Pager::new(9, 10).window(), vec![7, 8, 9]);
        assert_eq!(Pager::new(1, 2).window(), vec![0, 1]);
    }

    #[test]
    fn test_showing_range() {
        assert_eq!(Pager::new(0, 3).showing(10, 25), (1, 10));
        assert_eq!(Pager::new(2, 3).showing(10, 25), (21, 25));
    }

    #[test]
    fn test_page_past_the_end_near_u32_max() {
        let pager = Pager::new(u32::MAX - 1, 3);
        assert!(pager.window().is_empty());
        assert!(!pager.has_next());
        assert_eq!(pager.next(), 2);

        let pager = Pager::new(u32::MAX, u32::MAX);
        assert_eq!(pager.window(), vec![u32::MAX - 2, u32::MAX - 1]);
        assert_eq!(pager.next(), u32::MAX - 1);
        assert_eq!(pager.showing(6, 10), (10, 10));
    }
}
