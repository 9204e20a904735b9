use crate::*;

use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        debug_assert!(start < end_exclusive);
        start + (self.next_u64() % (end_exclusive - start) as u64) as usize
    }
}

fn item(n: usize) -> FeedItem<usize> {
    FeedItem::new(format!("a{n}"), n)
}

fn items(range: core::ops::Range<usize>) -> Vec<FeedItem<usize>> {
    range.map(item).collect()
}

fn random_items(rng: &mut Lcg, max_len: usize, id_space: usize) -> Vec<FeedItem<usize>> {
    let len = rng.gen_range_usize(0, max_len + 1);
    (0..len)
        .map(|_| item(rng.gen_range_usize(0, id_space)))
        .collect()
}

fn ids<P>(items: &[FeedItem<P>]) -> Vec<String> {
    items.iter().map(|it| it.id.clone()).collect()
}

fn page(range: core::ops::Range<usize>, has_more: bool) -> PageResult<usize> {
    PageResult::new(items(range), has_more)
}

fn opts() -> FeedOptions {
    FeedOptions::default()
}

fn applied(received: usize, new_items: usize) -> Completion {
    Completion::Applied {
        received,
        new_items,
    }
}

#[test]
fn merge_appends_only_unseen_ids_in_incoming_order() {
    let existing = items(0..3);
    let incoming = vec![item(5), item(1), item(4), item(2), item(6)];
    let merged = merge(&existing, &incoming);
    assert_eq!(ids(&merged), ["a0", "a1", "a2", "a5", "a4", "a6"]);
}

#[test]
fn merge_keeps_first_of_repeated_incoming_ids() {
    let merged = merge(&items(0..1), &[item(7), item(7), item(0), item(8)]);
    assert_eq!(ids(&merged), ["a0", "a7", "a8"]);
}

#[test]
fn append_unique_reports_new_count() {
    let mut feed = items(0..20);
    assert_eq!(append_unique(&mut feed, items(15..25)), 5);
    assert_eq!(feed.len(), 25);
    assert_eq!(append_unique(&mut feed, items(0..25)), 0);
    assert_eq!(feed.len(), 25);
}

#[test]
fn merge_is_idempotent_randomized() {
    let mut rng = Lcg::new(0x5eed);
    for _ in 0..500 {
        let mut existing = Vec::new();
        append_unique(&mut existing, random_items(&mut rng, 30, 60));
        let incoming = random_items(&mut rng, 30, 60);

        let once = merge(&existing, &incoming);
        let twice = merge(&existing, &once);
        assert_eq!(ids(&once), ids(&twice));

        // Prefix is untouched and no id appears twice.
        assert_eq!(ids(&once[..existing.len()]), ids(&existing));
        let mut sorted = ids(&once);
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), once.len());
    }
}

#[test]
fn assign_is_round_robin() {
    let a = assign(&items(0..7), 3);
    assert_eq!(a.column_count(), 3);
    assert_eq!(a.column(0), Some(&[0, 3, 6][..]));
    assert_eq!(a.column(1), Some(&[1, 4][..]));
    assert_eq!(a.column(2), Some(&[2, 5][..]));
    assert_eq!(a.column_of(4), Some(1));
    assert_eq!(a.column_of(7), None);
}

#[test]
fn assign_with_zero_columns_uses_one() {
    let a = assign_count(4, 0);
    assert_eq!(a.column_count(), 1);
    assert_eq!(a.column(0), Some(&[0, 1, 2, 3][..]));
}

#[test]
fn assign_with_more_columns_than_items_leaves_empty_columns() {
    let a = assign_count(2, 5);
    assert_eq!(a.column_count(), 5);
    assert!(a.column(4).unwrap().is_empty());
    assert_eq!(a.interleave(), [0, 1]);
}

#[test]
fn partition_is_complete_randomized() {
    let mut rng = Lcg::new(42);
    for _ in 0..300 {
        let count = rng.gen_range_usize(0, 200);
        let k = rng.gen_range_usize(1, 9);
        let a = assign_count(count, k);

        assert_eq!(a.column_count(), k);
        assert_eq!(a.len(), count);
        assert_eq!(a.columns().iter().map(Vec::len).sum::<usize>(), count);
        assert_eq!(a.interleave(), (0..count).collect::<Vec<_>>());
    }
}

#[test]
fn resolve_maps_columns_onto_items() {
    let list = items(0..5);
    let cols = assign(&list, 2).resolve(&list);
    assert_eq!(cols.len(), 2);
    let first: Vec<&str> = cols[0].iter().map(|it| it.id.as_str()).collect();
    assert_eq!(first, ["a0", "a2", "a4"]);
    assert_eq!(cols[1].len(), 2);
}

#[test]
fn layout_assigner_appends_on_growth_and_recomputes_on_column_change() {
    let mut l = LayoutAssigner::new(4, 3);
    assert_eq!(l.revision(), 0);

    assert!(!l.sync(4, 3));
    assert_eq!(l.revision(), 0);

    assert!(l.sync(8, 3));
    assert_eq!(l.assignment(), &assign_count(8, 3));
    assert_eq!(l.revision(), 1);

    assert!(l.sync(8, 4));
    assert_eq!(l.assignment(), &assign_count(8, 4));
    assert_eq!(l.revision(), 2);

    // Shrinking (e.g. a reset) also recomputes.
    assert!(l.sync(2, 4));
    assert_eq!(l.assignment(), &assign_count(2, 4));
}

#[test]
fn default_breakpoints() {
    let b = Breakpoints::default();
    assert_eq!(b.columns_for_width(0), 1);
    assert_eq!(b.columns_for_width(639), 1);
    assert_eq!(b.columns_for_width(640), 2);
    assert_eq!(b.columns_for_width(767), 2);
    assert_eq!(b.columns_for_width(1023), 3);
    assert_eq!(b.columns_for_width(1024), 4);
    assert_eq!(b.columns_for_width(1535), 5);
    assert_eq!(b.columns_for_width(1536), 6);
    assert_eq!(b.columns_for_width(u32::MAX), 6);
}

#[test]
fn custom_breakpoints_are_sorted_and_clamped() {
    let b = Breakpoints::new([(900, 3), (500, 0)], 4);
    assert_eq!(b.columns_for_width(100), 1);
    assert_eq!(b.columns_for_width(600), 3);
    assert_eq!(b.columns_for_width(900), 4);
}

#[test]
fn resize_watcher_uses_default_until_measured() {
    let mut w = ResizeWatcher::new(&opts());
    assert_eq!(w.columns(), DEFAULT_COLUMNS);
    assert!(!w.is_measured());

    assert_eq!(w.measure(1300), Some(5));
    assert!(w.is_measured());
    assert_eq!(w.width(), Some(1300));

    // Same bucket: measured, but no change reported.
    assert_eq!(w.measure(1400), None);
}

#[test]
fn resize_watcher_debounces_bursts() {
    let mut w = ResizeWatcher::new(&opts().with_resize_debounce_ms(150));
    w.measure(1023);

    let mut now = 0;
    for width in (1023..1400).step_by(20) {
        w.on_resize(width, now);
        assert_eq!(w.update(now), None);
        now += 10;
    }
    let last_event = now - 10;
    assert!(w.has_pending());
    assert_eq!(w.update(last_event + 149), None);
    assert_eq!(w.columns(), 3);

    assert_eq!(w.update(last_event + 150), Some(5));
    assert!(!w.has_pending());
    assert_eq!(w.width(), Some(1383));
    assert_eq!(w.update(last_event + 1_000), None);
}

#[test]
fn trigger_initial_states() {
    assert_eq!(LoadTrigger::new(true, 2, 3).state(), LoadState::Observing);
    assert_eq!(LoadTrigger::new(true, 0, 3).state(), LoadState::ManualOnly);
    assert_eq!(LoadTrigger::new(false, 2, 3).state(), LoadState::Exhausted);
}

#[test]
fn trigger_counts_auto_loads_before_resolution_and_ignores_reentry() {
    let mut t = LoadTrigger::new(true, 2, 3);
    assert!(t.on_sentinel_near());
    assert_eq!(t.auto_load_count(), 1);
    assert_eq!(t.state(), LoadState::Loading);
    assert_eq!(t.loading_origin(), Some(LoadOrigin::Auto));

    assert!(!t.on_sentinel_near());
    assert!(!t.on_manual_load());
    assert_eq!(t.auto_load_count(), 1);
}

#[test]
fn trigger_cap_enforcement() {
    for cap in 1..6u32 {
        let mut t = LoadTrigger::new(true, cap, 3);
        for _ in 0..cap {
            assert_eq!(t.state(), LoadState::Observing);
            assert!(t.on_sentinel_near());
            t.on_success(true, 10);
        }
        assert_eq!(t.state(), LoadState::ManualOnly);
        assert!(t.reached_cap());
        assert!(!t.on_sentinel_near());
        assert_eq!(t.auto_load_count(), cap);
    }
}

#[test]
fn trigger_exhausts_on_no_new_items_or_end_flag() {
    let mut t = LoadTrigger::new(true, 2, 3);
    t.on_sentinel_near();
    t.on_success(true, 0);
    assert!(t.is_exhausted());
    assert!(!t.on_sentinel_near());
    assert!(!t.on_manual_load());

    let mut t = LoadTrigger::new(true, 2, 3);
    t.on_sentinel_near();
    t.on_success(false, 5);
    assert!(t.is_exhausted());
}

#[test]
fn trigger_failures_fall_back_then_give_up() {
    let mut t = LoadTrigger::new(true, 2, 3);

    t.on_sentinel_near();
    t.on_failure();
    assert_eq!(t.state(), LoadState::Observing);

    t.on_sentinel_near();
    t.on_failure();
    assert_eq!(t.state(), LoadState::ManualOnly);

    assert!(t.on_manual_load());
    assert_eq!(t.loading_origin(), Some(LoadOrigin::Manual));
    t.on_failure();
    assert_eq!(t.state(), LoadState::Exhausted);
    assert_eq!(t.loading_origin(), None);
}

#[test]
fn trigger_success_resets_failure_streak() {
    let mut t = LoadTrigger::new(true, 10, 2);
    t.on_sentinel_near();
    t.on_failure();
    t.on_sentinel_near();
    t.on_success(true, 3);
    t.on_sentinel_near();
    t.on_failure();
    assert_eq!(t.state(), LoadState::Observing);
    t.on_sentinel_near();
    t.on_failure();
    assert_eq!(t.state(), LoadState::Exhausted);
}

#[test]
fn trigger_ignores_outcomes_when_not_loading() {
    let mut t = LoadTrigger::new(true, 2, 1);
    t.on_failure();
    t.on_success(false, 0);
    assert_eq!(t.state(), LoadState::Observing);
}

#[test]
fn initial_short_page_starts_exhausted() {
    let feed = Feed::new(items(0..7), opts());
    assert_eq!(feed.load_state(), LoadState::Exhausted);
    assert!(!feed.has_more());
    assert_eq!(feed.footer(), Footer::EndOfFeed);
    assert!(!feed.is_watching_sentinel());

    let empty = Feed::<usize>::new(Vec::new(), opts());
    assert_eq!(empty.footer(), Footer::Empty);
}

#[test]
fn explicit_initial_has_more_overrides_heuristic() {
    let mut feed = Feed::new(items(0..7), opts().with_initial_has_more(Some(true)));
    assert_eq!(feed.load_state(), LoadState::Observing);
    assert!(feed.on_sentinel_near().is_some());

    let feed = Feed::new(items(0..20), opts().with_initial_has_more(Some(false)));
    assert_eq!(feed.load_state(), LoadState::Exhausted);
}

#[test]
fn initial_duplicate_ids_are_dropped() {
    let mut initial = items(0..20);
    initial.push(item(3));
    let feed = Feed::new(initial, opts());
    assert_eq!(feed.len(), 20);
}

#[test]
fn scenario_a_new_page_is_appended() {
    let mut feed = Feed::new(items(0..20), opts());
    assert_eq!(feed.footer(), Footer::ScrollHint);

    let req = feed.on_sentinel_near().unwrap();
    assert_eq!(
        (req.page, req.page_size, req.origin),
        (2, 20, LoadOrigin::Auto)
    );
    assert_eq!(feed.footer(), Footer::Loading);
    assert_eq!(feed.state().auto_load_count(), 1);

    let c = feed.complete(req, Ok(page(20..40, true)));
    assert_eq!(c, applied(20, 20));
    assert_eq!(feed.len(), 40);
    assert_eq!(feed.page(), 2);
    assert!(feed.has_more());
    assert_eq!(feed.load_state(), LoadState::Observing);
    assert_eq!(feed.columns().len(), 40);

    let req = feed.on_sentinel_near().unwrap();
    assert_eq!(req.page, 3);
    feed.complete(req, Ok(page(40..55, false)));
    assert_eq!(feed.len(), 55);
    assert_eq!(feed.page(), 3);
    assert!(!feed.has_more());
    assert_eq!(feed.footer(), Footer::EndOfFeed);
}

#[test]
fn scenario_b_fully_overlapping_page_exhausts() {
    let mut feed = Feed::new(items(0..20), opts());
    let req = feed.on_sentinel_near().unwrap();
    let c = feed.complete(req, Ok(page(10..15, true)));
    assert_eq!(c, applied(5, 0));
    assert_eq!(feed.len(), 20);
    assert_eq!(feed.page(), 1);
    assert!(!feed.has_more());
    assert_eq!(feed.load_state(), LoadState::Exhausted);
    assert!(feed.on_sentinel_near().is_none());
    assert!(feed.load_more().is_none());
}

#[test]
fn scenario_c_breakpoint_crossing_relayouts_every_item_once() {
    let mut feed = Feed::new(items(0..20), opts());
    let req = feed.on_sentinel_near().unwrap();
    feed.complete(req, Ok(page(20..37, true)));

    feed.measure_viewport(1023);
    assert_eq!(feed.column_count(), 3);
    let rev = feed.layout_revision();

    feed.on_resize(1024, 1_000);
    assert!(!feed.tick(1_100));
    assert_eq!(feed.column_count(), 3);
    assert!(feed.tick(1_150));
    assert_eq!(feed.column_count(), 4);
    assert!(feed.layout_revision() > rev);

    let cols = feed.columns();
    assert_eq!(cols.len(), 37);
    assert_eq!(cols.interleave(), (0..37).collect::<Vec<_>>());
    let mut seen: Vec<usize> = cols.columns().iter().flatten().copied().collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..37).collect::<Vec<_>>());
}

#[test]
fn layout_is_hydration_safe_before_measurement() {
    let a = Feed::new(items(0..23), opts());
    let b = Feed::new(items(0..23), opts());
    assert!(!a.is_measured());
    assert_eq!(a.column_count(), DEFAULT_COLUMNS);
    assert_eq!(a.columns(), b.columns());
    assert_eq!(a.columns(), &assign(&items(0..23), DEFAULT_COLUMNS));

    let mut a = a;
    a.measure_viewport(500);
    assert_eq!(a.column_count(), 1);
}

#[test]
fn scenario_e_manual_load_after_cap() {
    let mut feed = Feed::new(items(0..20), opts().with_auto_load_cap(2));
    for n in 0..2 {
        let req = feed.on_sentinel_near().unwrap();
        feed.complete(req, Ok(page(20 + n * 20..40 + n * 20, true)));
    }
    assert_eq!(feed.load_state(), LoadState::ManualOnly);
    assert_eq!(feed.footer(), Footer::LoadMore);
    assert!(feed.state().reached_cap());
    assert!(!feed.is_watching_sentinel());
    assert!(feed.on_sentinel_near().is_none());

    let req = feed.load_more().unwrap();
    assert_eq!((req.page, req.origin), (4, LoadOrigin::Manual));
    let c = feed.complete(req, Ok(page(60..80, true)));
    assert_eq!(c, applied(20, 20));
    assert_eq!(feed.len(), 80);
    assert_eq!(feed.state().auto_load_count(), 2);
    assert_eq!(feed.load_state(), LoadState::ManualOnly);
}

#[test]
fn failures_recover_then_end_softly() {
    let mut feed = Feed::new(items(0..20), opts().with_max_no_progress_attempts(2));

    let req = feed.on_sentinel_near().unwrap();
    let kind = FailureKind::Network;
    assert_eq!(feed.complete(req, Err(kind)), Completion::Failed { kind });
    assert_eq!(feed.load_state(), LoadState::Observing);
    assert!(feed.has_more());

    let req = feed.on_sentinel_near().unwrap();
    assert_eq!(req.page, 2);
    feed.complete(req, Err(FailureKind::ApiFormat));
    assert_eq!(feed.load_state(), LoadState::Exhausted);
    assert!(!feed.has_more());
    assert_eq!(feed.footer(), Footer::EndOfFeed);
    assert_eq!(feed.len(), 20);
}

#[test]
fn stale_and_post_teardown_completions_are_discarded() {
    let mut feed = Feed::new(items(0..20), opts());
    let req = feed.on_sentinel_near().unwrap();

    let forged = PageRequest {
        ticket: req.ticket + 1,
        ..req
    };
    let c = feed.complete(forged, Ok(page(20..40, true)));
    assert_eq!(c, Completion::Discarded);
    assert_eq!(feed.in_flight(), Some(req));

    feed.complete(req, Ok(page(20..40, true)));
    let c = feed.complete(req, Ok(page(40..60, true)));
    assert_eq!(c, Completion::Discarded);
    assert_eq!(feed.len(), 40);

    let req = feed.on_sentinel_near().unwrap();
    feed.teardown();
    assert!(feed.is_torn_down());
    let c = feed.complete(req, Ok(page(40..60, true)));
    assert_eq!(c, Completion::Discarded);
    assert_eq!(feed.len(), 40);
    assert!(feed.on_sentinel_near().is_none());
    assert!(!feed.is_watching_sentinel());
}

#[test]
fn on_scroll_uses_sentinel_margin() {
    let mut feed = Feed::new(items(0..20), opts().with_sentinel_margin_px(200.0));
    assert!(feed.on_scroll(2_000.0, 0.0, 800.0).is_none());
    assert_eq!(feed.load_state(), LoadState::Observing);
    assert!(feed.on_scroll(2_000.0, 1_000.0, 800.0).is_some());
}

#[test]
fn on_scroll_with_non_finite_geometry_is_not_near() {
    let mut feed = Feed::new(items(0..20), opts());
    assert!(feed.on_scroll(f64::NAN, 0.0, 800.0).is_none());
    assert!(feed.on_scroll(100.0, f64::NAN, 800.0).is_none());
    assert!(feed.on_scroll(100.0, 0.0, f64::NAN).is_none());
    assert_eq!(feed.load_state(), LoadState::Observing);
    assert_eq!(feed.state().auto_load_count(), 0);
    assert!(feed.on_scroll(100.0, 0.0, 800.0).is_some());
}

#[test]
fn snapshot_round_trip_restores_state_once() {
    let mut feed = Feed::new(items(0..20), opts());
    let req = feed.on_sentinel_near().unwrap();
    feed.complete(req, Ok(page(20..40, true)));

    let snap = feed.snapshot("/", Some("a27".into()), 1234.5);
    assert_eq!(snap.route, "/");
    assert_eq!(snap.page, 2);

    let mut restored = Feed::from_snapshot(snap, opts());
    assert!(restored.is_restored());
    assert_eq!(restored.items(), feed.items());
    assert_eq!(restored.page(), 2);
    assert_eq!(restored.state().auto_load_count(), 0);
    assert_eq!(restored.load_state(), LoadState::Observing);

    let scroll = restored.take_scroll_restore().unwrap();
    assert!((scroll.scroll_y - 1234.5).abs() < 1.0);
    assert_eq!(scroll.last_viewed_item_id.as_deref(), Some("a27"));
    assert!(restored.take_scroll_restore().is_none());

    // Continues from the restored page instead of refetching page 1.
    assert_eq!(restored.on_sentinel_near().unwrap().page, 3);
}

#[test]
fn cold_feed_has_no_scroll_restore() {
    let mut feed = Feed::new(items(0..20), opts());
    assert!(!feed.is_restored());
    assert!(feed.take_scroll_restore().is_none());
}

#[cfg(feature = "serde")]
#[test]
fn snapshot_json_layout() {
    let snap = FeedSnapshot {
        route: "/".into(),
        items: items(0..2),
        page: 3,
        last_viewed_item_id: Some("a1".into()),
        scroll_y: 640.25,
    };
    let value = serde_json::to_value(&snap).unwrap();
    let obj = value.as_object().unwrap();
    for key in ["pathname", "articles", "page", "lastViewedArticleId", "scrollY"] {
        assert!(obj.contains_key(key), "missing {key}");
    }
    let back: FeedSnapshot<usize> = serde_json::from_value(value).unwrap();
    assert_eq!(back, snap);
}

#[cfg(feature = "serde")]
#[test]
fn options_deserialize_with_defaults() {
    let json = r#"{ "page_size": 12, "auto_load_cap": 4 }"#;
    let o: FeedOptions = serde_json::from_str(json).unwrap();
    assert_eq!(o.page_size, 12);
    assert_eq!(o.auto_load_cap, 4);
    assert_eq!(o.default_columns, DEFAULT_COLUMNS);
    assert_eq!(o.breakpoints, Breakpoints::default());
}
