//! Page position and totals of a list.

use bazaar_shared::PageMeta;

/// Pages shown on either side of the current page in [`PaginationState::window`].
const AROUND_CURRENT: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    page: u32,
    limit: u32,
    total: u64,
    pages: u32,
}

impl PaginationState {
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            total: 0,
            pages: 0,
        }
    }

    /// 1-based current page.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn pages(&self) -> u32 {
        self.pages
    }

    pub(crate) fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub(crate) fn reset_page(&mut self) {
        self.page = 1;
    }

    /// Overwrite totals from a response. The page count is derived, never
    /// taken from the wire, and the requested page size is never replaced.
    /// A page size stated by the server (e.g. a capped one) only shapes the
    /// page count.
    pub(crate) fn apply(&mut self, meta: PageMeta) {
        let per_page = if meta.limit > 0 { meta.limit } else { self.limit };
        self.total = meta.total;
        self.pages = self.total.div_ceil(u64::from(per_page)).min(u64::from(u32::MAX)) as u32;
    }

    /// Highest page that can hold items; 1 for an empty list.
    pub fn last_valid(&self) -> u32 {
        self.pages.max(1)
    }

    /// The current page no longer exists, e.g. after its last item was deleted.
    pub fn is_out_of_range(&self) -> bool {
        self.page > self.last_valid()
    }

    pub fn contains(&self, page: u32) -> bool {
        page >= 1 && page <= self.pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    /// Page numbers to render, with `None` marking a gap:
    /// `1 … 4 5 [6] 7 8 … 20`.
    pub fn window(&self) -> Vec<Option<u32>> {
        let last = self.pages;
        if last == 0 {
            return Vec::new();
        }

        let current = self.page.min(last);
        let from = current.saturating_sub(AROUND_CURRENT).max(1);
        let to = (current + AROUND_CURRENT).min(last);

        let mut pages = Vec::new();
        if from > 1 {
            pages.push(Some(1));
            if from > 2 {
                pages.push(None);
            }
        }
        pages.extend((from..=to).map(Some));
        if to < last {
            if to + 1 < last {
                pages.push(None);
            }
            pages.push(Some(last));
        }
        pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_total(limit: u32, total: u64) -> PaginationState {
        let mut p = PaginationState::new(limit);
        p.apply(PageMeta { page: 1, limit: 0, total });
        p
    }

    #[test]
    fn pages_are_derived_from_total_and_limit() {
        assert_eq!(with_total(10, 0).pages(), 0);
        assert_eq!(with_total(10, 1).pages(), 1);
        assert_eq!(with_total(10, 10).pages(), 1);
        assert_eq!(with_total(10, 25).pages(), 3);
    }

    #[test]
    fn stated_limit_shapes_pages_but_not_the_request() {
        let mut p = PaginationState::new(10);
        p.apply(PageMeta { page: 1, limit: 20, total: 45 });
        assert_eq!(p.limit(), 10);
        assert_eq!(p.pages(), 3);
    }

    #[test]
    fn unpaginated_answer_keeps_requested_size() {
        let mut p = PaginationState::new(12);
        p.apply(PageMeta::single(1));
        assert_eq!(p.limit(), 12);
        assert_eq!(p.total(), 1);
        assert_eq!(p.pages(), 1);
    }

    #[test]
    fn zero_limit_is_clamped() {
        assert_eq!(PaginationState::new(0).limit(), 1);
    }

    #[test]
    fn out_of_range_after_shrink() {
        let mut p = with_total(10, 30);
        p.set_page(3);
        assert!(!p.is_out_of_range());

        p.apply(PageMeta { page: 3, limit: 10, total: 20 });
        assert!(p.is_out_of_range());
        assert_eq!(p.last_valid(), 2);
    }

    #[test]
    fn window_with_gaps() {
        let mut p = with_total(1, 20);
        p.set_page(10);
        assert_eq!(
            p.window(),
            vec![Some(1), None, Some(8), Some(9), Some(10), Some(11), Some(12), None, Some(20)]
        );
    }

    #[test]
    fn window_near_edges() {
        let mut p = with_total(1, 5);
        p.set_page(1);
        assert_eq!(p.window(), vec![Some(1), Some(2), Some(3), None, Some(5)]);

        p.set_page(4);
        assert_eq!(p.window(), vec![Some(1), Some(2), Some(3), Some(4), Some(5)]);

        assert!(with_total(10, 0).window().is_empty());
    }
}
