//! Tests for the pager module

use super::*;
use pretty_assertions::assert_eq;
use std::cell::Cell;
use std::rc::Rc;
use test_case::test_case;

#[derive(Debug, Clone, PartialEq)]
struct TestError(&'static str);

/// Fetcher that replays a fixed script of results and counts its calls
fn scripted<T>(
    script: Vec<Result<Vec<T>, TestError>>,
) -> (
    impl FnMut(&mut Params) -> Result<Vec<T>, TestError>,
    Rc<Cell<usize>>,
) {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let mut script: VecDeque<_> = script.into();
    let fetcher = move |_: &mut Params| {
        counter.set(counter.get() + 1);
        script.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    };
    (fetcher, calls)
}

fn drain<T: Clone, F: PageFetcher<T>>(iter: &mut PagedIter<T, F>) -> Vec<T> {
    let mut items = Vec::new();
    while iter.advance() {
        items.push(iter.current().cloned().unwrap());
    }
    items
}

// ============================================================================
// Full drain
// ============================================================================

#[test_case(vec![vec![1, 2, 3]] ; "single page")]
#[test_case(vec![vec![1], vec![2], vec![3]] ; "one item per page")]
#[test_case(vec![vec![1, 2], vec![3, 4, 5], vec![6]] ; "uneven pages")]
fn test_full_drain(pages: Vec<Vec<i32>>) {
    let expected: Vec<i32> = pages.iter().flatten().copied().collect();
    let page_count = pages.len();
    let (fetcher, calls) = scripted(pages.into_iter().map(Ok).collect());

    let mut iter = PagedIter::new(Params::new(), fetcher);
    let items = drain(&mut iter);

    assert_eq!(items, expected);
    assert!(iter.last_error().is_none());
    assert!(iter.is_done());
    // one extra call discovers the empty page
    assert_eq!(calls.get(), page_count + 1);
    assert_eq!(iter.pages_fetched(), page_count + 1);
}

#[test]
fn test_first_advance_uses_eager_page() {
    let (fetcher, calls) = scripted(vec![Ok(vec!["a", "b"])]);
    let mut iter = PagedIter::new(Params::new(), fetcher);
    assert_eq!(calls.get(), 1);

    assert!(iter.advance());
    assert_eq!(iter.current(), Some(&"a"));
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_current_before_advance_is_none() {
    let (fetcher, _) = scripted(vec![Ok(vec![1])]);
    let iter = PagedIter::new(Params::new(), fetcher);
    assert!(iter.current().is_none());
}

// ============================================================================
// Construction failure
// ============================================================================

#[test]
fn test_failed_iterator() {
    let mut iter: PagedIter<i32, BoxFetcher<'_, i32, TestError>> =
        PagedIter::failed(TestError("bad params"));

    assert!(!iter.advance());
    assert_eq!(iter.last_error(), Some(&TestError("bad params")));
    assert!(iter.current().is_none());
    assert_eq!(iter.remaining_in_page(), 0);
    assert_eq!(iter.pages_fetched(), 0);
    assert!(iter.is_done());
    assert_eq!(iter.into_error(), Some(TestError("bad params")));
}

#[test]
fn test_failed_iterator_stays_failed() {
    let mut iter: PagedIter<i32, BoxFetcher<'_, i32, TestError>> =
        PagedIter::failed(TestError("early"));
    for _ in 0..3 {
        assert!(!iter.advance());
        assert_eq!(iter.last_error(), Some(&TestError("early")));
    }
    assert_eq!(iter.pages_fetched(), 0);
    assert_eq!(iter.next(), None);
}

// ============================================================================
// Empty first page
// ============================================================================

#[test]
fn test_empty_first_page() {
    let (fetcher, calls) = scripted(vec![Ok(Vec::<i32>::new()), Ok(vec![1, 2])]);
    let mut iter = PagedIter::new(Params::new(), fetcher);

    assert!(!iter.advance());
    assert!(iter.last_error().is_none());
    assert!(iter.current().is_none());
    assert_eq!(calls.get(), 1);
}

// ============================================================================
// Mid-stream failure
// ============================================================================

#[test]
fn test_mid_stream_failure() {
    let (fetcher, calls) = scripted(vec![Ok(vec![1, 2]), Err(TestError("timeout"))]);
    let mut iter = PagedIter::new(Params::new(), fetcher);

    assert!(iter.advance());
    assert_eq!(iter.current(), Some(&1));
    assert!(iter.advance());
    assert_eq!(iter.current(), Some(&2));

    assert!(!iter.advance());
    assert_eq!(iter.last_error(), Some(&TestError("timeout")));
    assert_eq!(calls.get(), 2);

    // the last good item is not invalidated
    assert_eq!(iter.current(), Some(&2));
}

#[test]
fn test_eager_fetch_failure() {
    let (fetcher, calls) = scripted::<i32>(vec![Err(TestError("unauthorized"))]);
    let mut iter = PagedIter::new(Params::new(), fetcher);

    assert!(iter.is_done());
    assert!(!iter.advance());
    assert_eq!(iter.last_error(), Some(&TestError("unauthorized")));
    assert_eq!(calls.get(), 1);
}

// ============================================================================
// Terminal stickiness
// ============================================================================

#[test_case(vec![Ok(vec![1]), Ok(vec![])] ; "natural end")]
#[test_case(vec![Ok(vec![1]), Err(TestError("boom"))] ; "error")]
fn test_terminal_is_sticky(script: Vec<Result<Vec<i32>, TestError>>) {
    let (fetcher, calls) = scripted(script);
    let mut iter = PagedIter::new(Params::new(), fetcher);

    assert!(iter.advance());
    assert!(!iter.advance());
    let calls_at_stop = calls.get();
    let error_at_stop = iter.last_error().cloned();

    for _ in 0..5 {
        assert!(!iter.advance());
    }
    assert_eq!(calls.get(), calls_at_stop);
    assert_eq!(iter.last_error().cloned(), error_at_stop);
}

// ============================================================================
// Page-local count
// ============================================================================

#[test]
fn test_remaining_in_page_is_page_local() {
    let (fetcher, _) = scripted(vec![Ok(vec![1, 2, 3]), Ok(vec![4, 5])]);
    let mut iter = PagedIter::new(Params::new(), fetcher);

    assert_eq!(iter.remaining_in_page(), 3);
    assert!(iter.advance());
    assert_eq!(iter.remaining_in_page(), 2);
    assert!(iter.advance());
    assert!(iter.advance());
    assert_eq!(iter.remaining_in_page(), 0);

    // next advance pulls the second page and yields its first item
    assert!(iter.advance());
    assert_eq!(iter.current(), Some(&4));
    assert_eq!(iter.remaining_in_page(), 1);
}

// ============================================================================
// Parameters
// ============================================================================

#[test]
fn test_fetcher_mutations_carry_between_pages() {
    let seen = Rc::new(std::cell::RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);

    let fetcher = move |params: &mut Params| -> Result<Vec<u32>, TestError> {
        let offset: u32 = params.get_parsed("offset").unwrap().unwrap_or(0);
        log.borrow_mut().push(offset);
        if offset >= 4 {
            return Ok(Vec::new());
        }
        params.set("offset", (offset + 2).to_string());
        Ok(vec![offset, offset + 1])
    };

    let iter = PagedIter::new(Params::new().with("q", "rust"), fetcher);
    let items: Vec<u32> = iter.collect();

    assert_eq!(items, vec![0, 1, 2, 3]);
    assert_eq!(*seen.borrow(), vec![0, 2, 4]);
}

#[test]
fn test_params_left_by_fetcher_are_visible() {
    let fetcher = |params: &mut Params| -> Result<Vec<i32>, TestError> {
        params.set("cursor", "abc");
        Ok(vec![1])
    };
    let iter = PagedIter::new(Params::new().with("q", "x"), fetcher);

    assert_eq!(iter.params().get("q"), Some("x"));
    assert_eq!(iter.params().get("cursor"), Some("abc"));
}

// ============================================================================
// Iterator protocol
// ============================================================================

#[test]
fn test_iterator_protocol() {
    let (fetcher, _) = scripted(vec![Ok(vec![1, 2]), Ok(vec![3])]);
    let mut iter = PagedIter::new(Params::new(), fetcher);

    assert_eq!(iter.size_hint(), (2, None));
    let items: Vec<i32> = iter.by_ref().collect();
    assert_eq!(items, vec![1, 2, 3]);
    assert_eq!(iter.size_hint(), (0, Some(0)));
    assert_eq!(iter.next(), None);
}

#[test]
fn test_iterator_stops_on_error() {
    let (fetcher, _) = scripted(vec![Ok(vec![1]), Err(TestError("502"))]);
    let mut iter = PagedIter::new(Params::new(), fetcher);

    let items: Vec<i32> = iter.by_ref().collect();
    assert_eq!(items, vec![1]);
    assert_eq!(iter.last_error(), Some(&TestError("502")));
}

#[test]
fn test_collect_all() {
    let (fetcher, _) = scripted(vec![Ok(vec![1, 2]), Ok(vec![3])]);
    let iter = PagedIter::new(Params::new(), fetcher);
    assert_eq!(iter.collect_all(), Ok(vec![1, 2, 3]));

    let (fetcher, _) = scripted(vec![Ok(vec![1, 2]), Err(TestError("gone"))]);
    let iter = PagedIter::new(Params::new(), fetcher);
    assert_eq!(iter.collect_all(), Err(TestError("gone")));
}

#[test]
fn test_boxed_fetchers_share_a_type() {
    let mut fetchers: Vec<BoxFetcher<'_, i32, TestError>> = Vec::new();
    fetchers.push(Box::new(
        |_: &mut Params| -> Result<Vec<i32>, TestError> { Ok(Vec::new()) },
    ));
    fetchers.push(Box::new(scripted(vec![Ok(vec![7])]).0));
    fetchers.push(Box::new(Countdown(2)));
    let totals: Vec<usize> = fetchers
        .into_iter()
        .map(|f| PagedIter::new(Params::new(), f).count())
        .collect();
    assert_eq!(totals, vec![0, 1, 2]);
}

/// Fetcher type that is not a closure: yields `n` one-item pages
struct Countdown(i32);

impl PageFetcher<i32> for Countdown {
    type Error = TestError;

    fn fetch(&mut self, _params: &mut Params) -> Result<Vec<i32>, TestError> {
        if self.0 == 0 {
            return Ok(Vec::new());
        }
        self.0 -= 1;
        Ok(vec![self.0])
    }
}

#[test]
fn test_boxed_fetcher_keeps_iterator_semantics() {
    let boxed: BoxFetcher<'_, i32, TestError> = Box::new(Countdown(3));
    let mut iter = PagedIter::new(Params::new(), boxed);

    assert_eq!(drain(&mut iter), vec![2, 1, 0]);
    assert!(iter.last_error().is_none());
    assert_eq!(iter.pages_fetched(), 4);
}

#[test]
fn test_debug_output() {
    let (fetcher, _) = scripted(vec![Ok(vec![1, 2])]);
    let iter = PagedIter::new(Params::new(), fetcher);
    let debug = format!("{iter:?}");
    assert!(debug.contains("remaining_in_page: 2"));
    assert!(debug.contains("pages_fetched: 1"));
}
