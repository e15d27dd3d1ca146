/// Maps a linear item offset onto a site's page numbers.
///
/// Sites often return a different number of items per page than they claim,
/// or than the configured size. The paginator starts from the nominal page
/// size and corrects itself from the item counts reported back through
/// [`on_list_received`](Self::on_list_received).
///
/// Not synchronized: one instance belongs to one source, and each
/// `get_page` / `on_list_received` pair must complete before the next starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    first_page: usize,
    actual_page_size: usize,
    end: Option<EndOfResults>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EndOfResults {
    offset: usize,
    page: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        let page_size = if page_size == 0 {
            log::warn!("Paginator created with page size 0, using 1");
            1
        } else {
            page_size
        };
        Self {
            page_size,
            first_page: 1,
            actual_page_size: page_size,
            end: None,
        }
    }

    /// Index of the first page, for sites that count from 0.
    pub fn with_first_page(mut self, first_page: usize) -> Self {
        self.first_page = first_page;
        self
    }

    pub fn first_page(&self) -> usize {
        self.first_page
    }

    /// Page size the paginator was created with.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Current estimate learned from responses.
    pub fn actual_page_size(&self) -> usize {
        self.actual_page_size
    }

    /// Page to fetch for `offset`. Non-decreasing in `offset`, and pinned to
    /// the last page once the end of results has been seen.
    pub fn get_page(&self, offset: usize) -> usize {
        // Saturates rather than wrapping for offsets near usize::MAX.
        let page = self
            .first_page
            .saturating_add(offset / self.actual_page_size);
        match self.end {
            Some(end) if offset >= end.offset => end.page,
            Some(end) => page.min(end.page),
            None => page,
        }
    }

    /// Whether an empty page was already observed at or before `offset`.
    pub fn is_exhausted_at(&self, offset: usize) -> bool {
        self.end.is_some_and(|end| offset >= end.offset)
    }

    /// Report how many items `page` (requested for `offset`) actually held.
    pub fn on_list_received(&mut self, offset: usize, page: usize, count: usize) {
        if count == 0 {
            if !self.end.is_some_and(|end| end.offset <= offset) {
                log::debug!("End of results at offset {} (page {})", offset, page);
                self.end = Some(EndOfResults { offset, page });
            }
            return;
        }

        if self.is_exhausted_at(offset) {
            log::debug!(
                "Page {} returned {} items past the recorded end, listing grew",
                page,
                count
            );
            self.end = None;
        }

        if count != self.actual_page_size {
            log::debug!(
                "Page {} returned {} items, adjusting page size from {} (nominal {})",
                page,
                count,
                self.actual_page_size,
                self.page_size
            );
            self.actual_page_size = count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominal_pages() {
        let paginator = Paginator::new(24);
        assert_eq!(paginator.get_page(0), 1);
        assert_eq!(paginator.get_page(23), 1);
        assert_eq!(paginator.get_page(24), 2);
        assert_eq!(paginator.get_page(48), 3);
    }

    #[test]
    fn test_zero_based_site() {
        let paginator = Paginator::new(10).with_first_page(0);
        assert_eq!(paginator.get_page(0), 0);
        assert_eq!(paginator.get_page(10), 1);
    }

    #[test]
    fn test_adaptive_drift() {
        let mut paginator = Paginator::new(12);
        assert_eq!(paginator.get_page(0), 1);

        paginator.on_list_received(0, 1, 24);
        assert_eq!(paginator.actual_page_size(), 24);
        assert_eq!(paginator.get_page(24), 2);

        paginator.on_list_received(24, 2, 18);
        assert_eq!(paginator.get_page(42), 3);
        assert_eq!(paginator.page_size(), 12);
    }

    #[test]
    fn test_matching_count_keeps_estimate() {
        let mut paginator = Paginator::new(20);
        paginator.on_list_received(0, 1, 20);
        assert_eq!(paginator.actual_page_size(), 20);
        assert_eq!(paginator.get_page(40), 3);
    }

    #[test]
    fn test_end_reach() {
        let mut paginator = Paginator::new(24);
        for i in 0..5 {
            let offset = i * 24;
            let page = paginator.get_page(offset);
            assert_eq!(page, i + 1);
            paginator.on_list_received(offset, page, 24);
        }
        assert_eq!(paginator.get_page(120), 6);
        paginator.on_list_received(120, 6, 0);

        for _ in 0..3 {
            assert_eq!(paginator.get_page(120), 6);
        }
        assert_eq!(paginator.get_page(144), 6);
        assert_eq!(paginator.get_page(10_000), 6);
        assert!(paginator.is_exhausted_at(120));
        assert!(!paginator.is_exhausted_at(96));
    }

    #[test]
    fn test_repeated_empty_page_keeps_first_end() {
        let mut paginator = Paginator::new(10);
        paginator.on_list_received(30, 4, 0);
        paginator.on_list_received(50, 6, 0);
        assert_eq!(paginator.get_page(50), 4);
        assert_eq!(paginator.get_page(30), 4);
    }

    #[test]
    fn test_listing_growth_clears_end() {
        let mut paginator = Paginator::new(10);
        paginator.on_list_received(30, 4, 0);
        paginator.on_list_received(30, 4, 10);
        assert!(!paginator.is_exhausted_at(30));
        assert_eq!(paginator.get_page(40), 5);
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        let paginator = Paginator::new(0);
        assert_eq!(paginator.page_size(), 1);
        assert_eq!(paginator.get_page(3), 4);
    }

    #[test]
    fn test_huge_offset_saturates() {
        let paginator = Paginator::new(0);
        assert_eq!(paginator.get_page(usize::MAX), usize::MAX);
        assert_eq!(paginator.get_page(usize::MAX - 1), usize::MAX);

        let last = Paginator::new(10).with_first_page(usize::MAX);
        assert_eq!(last.get_page(0), usize::MAX);
        assert_eq!(last.get_page(usize::MAX), usize::MAX);
    }

    #[test]
    fn test_short_last_page_replaces_estimate() {
        let mut paginator = Paginator::new(24);
        for i in 0..4 {
            paginator.on_list_received(i * 24, i + 1, 24);
        }
        assert_eq!(paginator.get_page(96), 5);

        paginator.on_list_received(96, 5, 4);
        assert_eq!(paginator.actual_page_size(), 4);
        assert_eq!(paginator.get_page(100), 26);

        paginator.on_list_received(100, 26, 0);
        assert_eq!(paginator.get_page(100), 26);
        assert_eq!(paginator.get_page(500), 26);
        assert_eq!(paginator.get_page(99), 25);
    }

    #[test]
    fn test_monotonic_after_end() {
        let mut paginator = Paginator::new(7);
        paginator.on_list_received(0, 1, 5);
        paginator.on_list_received(20, 5, 0);
        let pages: Vec<usize> = (0..200).map(|o| paginator.get_page(o)).collect();
        assert!(pages.windows(2).all(|w| w[0] <= w[1]));
    }
}
