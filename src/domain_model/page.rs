use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Rows that can be addressed by an ascending integer cursor.
pub trait Cursored {
    fn cursor_id(&self) -> i64;
}

/// Turns raw `last_id`/`page_size` input into a bounded range request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePolicy {
    default_page_size: u32,
    max_page_size: u32,
}

impl Default for PagePolicy {
    fn default() -> Self {
        PagePolicy {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl PagePolicy {
    pub fn new(default_page_size: u32, max_page_size: u32) -> Self {
        let default_page_size = default_page_size.max(1);
        PagePolicy {
            default_page_size,
            max_page_size: max_page_size.max(default_page_size),
        }
    }

    pub fn default_page_size(&self) -> u32 {
        self.default_page_size
    }

    /// Sizes below 1 fall back to the default; sizes above the maximum are capped.
    pub fn paginate(&self, last_seen: i64, requested_page_size: i64) -> PageRequest {
        let effective_limit = if requested_page_size < 1 {
            self.default_page_size
        } else {
            requested_page_size.min(self.max_page_size as i64) as u32
        };
        PageRequest {
            last_seen: last_seen.max(0),
            effective_limit,
        }
    }

    /// Query-string variant. Missing or unparsable values take the defaults.
    pub fn from_query(&self, last_id: Option<&str>, page_size: Option<&str>) -> PageRequest {
        let last_seen = last_id
            .and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(0);
        let requested = page_size
            .and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(0);
        self.paginate(last_seen, requested)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    last_seen: i64,
    effective_limit: u32,
}

impl PageRequest {
    pub fn last_seen(&self) -> i64 {
        self.last_seen
    }

    pub fn effective_limit(&self) -> u32 {
        self.effective_limit
    }

    /// Exclusive lower bound on the identifier, if any. Rows are always read
    /// in ascending identifier order.
    pub fn lower_bound(&self) -> Option<i64> {
        (self.last_seen > 0).then_some(self.last_seen)
    }

    pub fn admits(&self, id: i64) -> bool {
        self.lower_bound().is_none_or(|bound| id > bound)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    /// Identifier of the last row, `0` when the page is empty.
    pub next_cursor: i64,
    pub limit: u32,
    pub total: i64,
}

impl<T: Cursored> CursorPage<T> {
    pub fn new(items: Vec<T>, request: &PageRequest, total: i64) -> Self {
        let next_cursor = items.last().map(Cursored::cursor_id).unwrap_or(0);
        CursorPage {
            items,
            next_cursor,
            limit: request.effective_limit(),
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    struct Row(i64);

    impl Cursored for Row {
        fn cursor_id(&self) -> i64 {
            self.0
        }
    }

    fn page_over(ids: std::ops::RangeInclusive<i64>, request: PageRequest) -> CursorPage<Row> {
        let rows: Vec<Row> = ids
            .filter(|id| request.admits(*id))
            .take(request.effective_limit() as usize)
            .map(Row)
            .collect();
        CursorPage::new(rows, &request, 25)
    }

    #[test]
    fn walks_forward_through_the_rows() {
        let policy = PagePolicy::default();

        let first = page_over(1..=25, policy.paginate(0, 10));
        let ids: Vec<i64> = first.items.iter().map(|r| r.0).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
        assert_eq!(first.next_cursor, 10);

        let second = page_over(1..=25, policy.paginate(first.next_cursor, 10));
        let ids: Vec<i64> = second.items.iter().map(|r| r.0).collect();
        assert_eq!(ids, (11..=20).collect::<Vec<_>>());
        assert_eq!(second.next_cursor, 20);

        let beyond = page_over(1..=25, policy.paginate(25, 10));
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.next_cursor, 0);
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    fn non_positive_sizes_use_the_default(#[case] requested: i64) {
        let policy = PagePolicy::new(7, 50);
        assert_eq!(policy.paginate(3, requested).effective_limit(), 7);
    }

    #[test]
    fn oversized_pages_are_capped() {
        let policy = PagePolicy::new(10, 50);
        assert_eq!(policy.paginate(0, 5000).effective_limit(), 50);
    }

    #[test]
    fn zero_cursor_has_no_lower_bound() {
        let policy = PagePolicy::default();
        assert_eq!(policy.paginate(0, 10).lower_bound(), None);
        assert_eq!(policy.paginate(-3, 10).lower_bound(), None);
        assert_eq!(policy.paginate(4, 10).lower_bound(), Some(4));
    }

    #[rstest]
    #[case(None, None, 0, DEFAULT_PAGE_SIZE)]
    #[case(Some("12"), Some("5"), 12, 5)]
    #[case(Some("abc"), Some("x"), 0, DEFAULT_PAGE_SIZE)]
    #[case(Some(" 8 "), Some("-1"), 8, DEFAULT_PAGE_SIZE)]
    fn parses_query_values_leniently(
        #[case] last_id: Option<&str>,
        #[case] page_size: Option<&str>,
        #[case] expected_last: i64,
        #[case] expected_limit: u32,
    ) {
        let request = PagePolicy::default().from_query(last_id, page_size);
        assert_eq!(request.last_seen(), expected_last);
        assert_eq!(request.effective_limit(), expected_limit);
    }
}
