/// Cursor over the paginated feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    next_page: u32,
    total_songs: usize,
}

impl Pagination {
    pub fn new(first_page: u32) -> Self {
        Self {
            next_page: first_page,
            total_songs: 0,
        }
    }

    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    /// Songs returned across all fetched pages.
    pub fn total_songs(&self) -> usize {
        self.total_songs
    }

    pub fn advance(&mut self, returned: usize) {
        self.next_page += 1;
        self.total_songs += returned;
    }
}

/// Whether `index` is close enough to the end of a queue of `queue_len`
/// items that the next page should be loaded first.
pub fn within_look_ahead(index: usize, queue_len: usize, look_ahead: usize) -> bool {
    index.saturating_add(look_ahead) >= queue_len
}

/// Bookkeeping for the single outstanding page fetch.
#[derive(Debug, Default)]
pub struct Prefetch {
    in_flight: Option<u32>,
    pending_seek: Option<usize>,
    horizon: Option<usize>,
}

impl Prefetch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> Option<u32> {
        self.in_flight
    }

    /// Remembers a seek to retry once the fetch lands. The latest target
    /// wins; the horizon keeps the furthest index ever asked for.
    pub fn defer_seek(&mut self, target: usize) {
        self.pending_seek = Some(target);
        self.extend_horizon(target);
    }

    pub fn extend_horizon(&mut self, index: usize) {
        self.horizon = Some(self.horizon.map_or(index, |h| h.max(index)));
    }

    /// Returns `false` when a fetch is already outstanding.
    pub fn begin(&mut self, page: u32) -> bool {
        if self.in_flight.is_some() {
            return false;
        }
        self.in_flight = Some(page);
        true
    }

    /// Returns `false` for a completion that does not match the outstanding
    /// fetch.
    pub fn complete(&mut self, page: u32) -> bool {
        if self.in_flight != Some(page) {
            return false;
        }
        self.in_flight = None;
        true
    }

    pub fn horizon(&self) -> Option<usize> {
        self.horizon
    }

    /// A newer seek was served from the loaded queue; the horizon stays.
    pub fn cancel_pending_seek(&mut self) {
        self.pending_seek = None;
    }

    /// Forgets the outstanding fetch along with any seek waiting on it.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn take_pending_seek(&mut self) -> Option<usize> {
        self.horizon = None;
        self.pending_seek.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_advances_page_and_total() {
        let mut cursor = Pagination::new(0);
        cursor.advance(10);
        cursor.advance(7);

        assert_eq!(cursor.next_page(), 2);
        assert_eq!(cursor.total_songs(), 17);
    }

    #[test]
    fn look_ahead_threshold() {
        assert!(within_look_ahead(0, 0, 1));
        assert!(within_look_ahead(9, 10, 1));
        assert!(!within_look_ahead(8, 10, 1));
        assert!(within_look_ahead(8, 10, 2));
        assert!(!within_look_ahead(9, 10, 0));
        assert!(within_look_ahead(usize::MAX, 10, 1));
    }

    #[test]
    fn only_one_fetch_in_flight() {
        let mut prefetch = Prefetch::new();
        assert!(prefetch.begin(3));
        assert!(!prefetch.begin(4));

        assert!(!prefetch.complete(2));
        assert!(prefetch.complete(3));
        assert!(prefetch.begin(4));
    }

    #[test]
    fn deferred_seek_keeps_latest_target_and_furthest_horizon() {
        let mut prefetch = Prefetch::new();
        prefetch.defer_seek(15);
        prefetch.defer_seek(5);

        assert_eq!(prefetch.horizon(), Some(15));
        assert_eq!(prefetch.take_pending_seek(), Some(5));
        assert_eq!(prefetch.horizon(), None);
        assert_eq!(prefetch.take_pending_seek(), None);
    }

    #[test]
    fn cancelled_seek_keeps_horizon() {
        let mut prefetch = Prefetch::new();
        prefetch.defer_seek(19);
        prefetch.cancel_pending_seek();

        assert_eq!(prefetch.horizon(), Some(19));
        assert_eq!(prefetch.take_pending_seek(), None);
    }

    #[test]
    fn reset_allows_a_new_fetch() {
        let mut prefetch = Prefetch::new();
        prefetch.defer_seek(4);
        assert!(prefetch.begin(1));

        prefetch.reset();
        assert_eq!(prefetch.in_flight(), None);
        assert_eq!(prefetch.horizon(), None);
        assert_eq!(prefetch.take_pending_seek(), None);
        assert!(prefetch.begin(1));
        assert!(!prefetch.complete(0));
    }
}
