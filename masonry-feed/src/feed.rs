use alloc::string::String;
use alloc::vec::Vec;

use crate::dedup::append_unique;
use crate::layout::{ColumnAssignment, LayoutAssigner};
use crate::resize::ResizeWatcher;
use crate::trigger::{LoadState, LoadTrigger};
use crate::{
    Completion, FailureKind, FeedItem, FeedOptions, FeedSnapshot, Footer, ItemId, LoadOrigin,
    PageRequest, PageResult, ScrollRestore,
};

/// The engine-owned state of a mounted feed.
///
/// Items are insertion-ordered with unique ids and only ever appended to.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedState<P> {
    items: Vec<FeedItem<P>>,
    page: u32,
    has_more: bool,
    reached_cap: bool,
    auto_load_count: u32,
}

impl<P> FeedState<P> {
    pub fn items(&self) -> &[FeedItem<P>] {
        &self.items
    }

    /// The last page whose items made it into the feed (1 for the initial page).
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn reached_cap(&self) -> bool {
        self.reached_cap
    }

    pub fn auto_load_count(&self) -> u32 {
        self.auto_load_count
    }
}

/// A headless infinite-scroll feed.
///
/// This type does no I/O and holds no UI objects:
/// - the host reports sentinel proximity, manual load presses, viewport widths and ticks;
/// - the feed answers with [`PageRequest`]s, and the host performs each fetch and hands the
///   outcome back through [`Feed::complete`];
/// - the current column layout is exposed as a [`ColumnAssignment`] over [`Feed::items`].
///
/// For an async driver wired to HTTP and session storage, see the `masonry-feed-adapter` crate.
#[derive(Clone, Debug)]
pub struct Feed<P> {
    options: FeedOptions,
    state: FeedState<P>,
    trigger: LoadTrigger,
    resize: ResizeWatcher,
    layout: LayoutAssigner,
    in_flight: Option<PageRequest>,
    next_ticket: u64,
    torn_down: bool,
    restored: bool,
    scroll_restore: Option<ScrollRestore>,
}

impl<P> Feed<P> {
    /// Starts a feed cold from the caller-supplied first page.
    pub fn new(initial_items: Vec<FeedItem<P>>, options: FeedOptions) -> Self {
        let received = initial_items.len();
        let mut items = Vec::with_capacity(received);
        append_unique(&mut items, initial_items);
        let has_more = options.resolve_initial_has_more(received);
        fdebug!(items = items.len(), has_more, "Feed::new");
        Self::with_state(items, 1, has_more, options, None)
    }

    /// Hydrates a feed from a snapshot taken before navigating away.
    ///
    /// No first-page fetch is needed. The snapshot's scroll offset is handed out once through
    /// [`Feed::take_scroll_restore`].
    pub fn from_snapshot(snapshot: FeedSnapshot<P>, options: FeedOptions) -> Self {
        let mut items = Vec::with_capacity(snapshot.items.len());
        append_unique(&mut items, snapshot.items);
        fdebug!(
            route = %snapshot.route,
            items = items.len(),
            page = snapshot.page,
            scroll_y = snapshot.scroll_y,
            "Feed::from_snapshot"
        );
        let restore = ScrollRestore {
            scroll_y: snapshot.scroll_y,
            last_viewed_item_id: snapshot.last_viewed_item_id,
        };
        Self::with_state(items, snapshot.page.max(1), true, options, Some(restore))
    }

    fn with_state(
        items: Vec<FeedItem<P>>,
        page: u32,
        has_more: bool,
        options: FeedOptions,
        scroll_restore: Option<ScrollRestore>,
    ) -> Self {
        let trigger = LoadTrigger::new(
            has_more,
            options.auto_load_cap,
            options.max_no_progress_attempts,
        );
        let resize = ResizeWatcher::new(&options);
        let layout = LayoutAssigner::new(items.len(), resize.columns());
        let mut feed = Self {
            state: FeedState {
                items,
                page,
                has_more,
                reached_cap: false,
                auto_load_count: 0,
            },
            trigger,
            resize,
            layout,
            in_flight: None,
            next_ticket: 1,
            torn_down: false,
            restored: scroll_restore.is_some(),
            scroll_restore,
            options,
        };
        feed.sync_trigger_state();
        feed
    }

    pub fn options(&self) -> &FeedOptions {
        &self.options
    }

    pub fn state(&self) -> &FeedState<P> {
        &self.state
    }

    pub fn items(&self) -> &[FeedItem<P>] {
        &self.state.items
    }

    pub fn len(&self) -> usize {
        self.state.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    pub fn page(&self) -> u32 {
        self.state.page
    }

    pub fn has_more(&self) -> bool {
        self.state.has_more
    }

    pub fn load_state(&self) -> LoadState {
        self.trigger.state()
    }

    /// Whether this feed was hydrated from a snapshot.
    pub fn is_restored(&self) -> bool {
        self.restored
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Whether a sentinel watcher should currently exist.
    pub fn is_watching_sentinel(&self) -> bool {
        !self.torn_down && self.trigger.is_watching()
    }

    /// The fetch currently in flight, if any.
    pub fn in_flight(&self) -> Option<PageRequest> {
        self.in_flight
    }

    pub fn footer(&self) -> Footer {
        match self.trigger.state() {
            LoadState::Loading => Footer::Loading,
            LoadState::Observing => Footer::ScrollHint,
            LoadState::ManualOnly => Footer::LoadMore,
            LoadState::Exhausted if self.state.items.is_empty() => Footer::Empty,
            LoadState::Exhausted => Footer::EndOfFeed,
        }
    }

    /// The sentinel came near the viewport.
    ///
    /// Returns the fetch to perform, or `None` when the trigger is not observing (including
    /// while another fetch is in flight).
    pub fn on_sentinel_near(&mut self) -> Option<PageRequest> {
        if self.torn_down || !self.trigger.on_sentinel_near() {
            return None;
        }
        self.sync_trigger_state();
        Some(self.issue(LoadOrigin::Auto))
    }

    /// Scroll geometry in the host's coordinate space: the sentinel's top edge, the current
    /// scroll offset and the viewport height.
    ///
    /// The sentinel counts as near when it is at most `sentinel_margin_px` below the viewport.
    /// Non-finite geometry never counts as near.
    pub fn on_scroll(
        &mut self,
        sentinel_top: f64,
        scroll_offset: f64,
        viewport_height: f64,
    ) -> Option<PageRequest> {
        let reach = scroll_offset + viewport_height + self.options.sentinel_margin_px;
        let near = sentinel_top <= reach;
        if !near {
            return None;
        }
        self.on_sentinel_near()
    }

    /// The user pressed the manual "load more" control.
    pub fn load_more(&mut self) -> Option<PageRequest> {
        if self.torn_down || !self.trigger.on_manual_load() {
            return None;
        }
        Some(self.issue(LoadOrigin::Manual))
    }

    fn issue(&mut self, origin: LoadOrigin) -> PageRequest {
        let request = PageRequest {
            ticket: self.next_ticket,
            page: self.state.page.saturating_add(1),
            page_size: self.options.page_size,
            origin,
        };
        self.next_ticket = self.next_ticket.wrapping_add(1);
        self.in_flight = Some(request);
        fdebug!(
            ticket = request.ticket,
            page = request.page,
            origin = ?origin,
            "Feed: fetch started"
        );
        request
    }

    /// Hands back the outcome of a fetch issued by this feed.
    ///
    /// Outcomes for a ticket that is no longer in flight, or that arrive after
    /// [`Feed::teardown`], are discarded.
    pub fn complete(
        &mut self,
        request: PageRequest,
        result: Result<PageResult<P>, FailureKind>,
    ) -> Completion {
        if self.torn_down || self.in_flight.map(|r| r.ticket) != Some(request.ticket) {
            fdebug!(ticket = request.ticket, "Feed: stale completion discarded");
            return Completion::Discarded;
        }
        self.in_flight = None;

        let completion = match result {
            Ok(page) => {
                let received = page.items.len();
                let new_items = append_unique(&mut self.state.items, page.items);
                ftrace!(
                    page = request.page,
                    received,
                    new_items,
                    "Feed: page merged"
                );
                if new_items > 0 {
                    self.state.page = request.page;
                }
                self.trigger.on_success(page.has_more, new_items);
                Completion::Applied {
                    received,
                    new_items,
                }
            }
            Err(kind) => {
                fwarn!(page = request.page, %kind, "Feed: fetch failed");
                self.trigger.on_failure();
                Completion::Failed { kind }
            }
        };

        self.state.has_more = !self.trigger.is_exhausted();
        self.sync_trigger_state();
        self.sync_layout();
        completion
    }

    /// The current column layout over [`Feed::items`].
    pub fn columns(&self) -> &ColumnAssignment {
        self.layout.assignment()
    }

    pub fn column_count(&self) -> usize {
        self.layout.column_count()
    }

    /// Bumped every time [`Feed::columns`] changes.
    pub fn layout_revision(&self) -> u64 {
        self.layout.revision()
    }

    /// Whether the real viewport width has been observed yet.
    pub fn is_measured(&self) -> bool {
        self.resize.is_measured()
    }

    /// Applies the first real viewport width right away. Returns `true` when the layout
    /// changed.
    pub fn measure_viewport(&mut self, width: u32) -> bool {
        self.resize.measure(width);
        self.sync_layout()
    }

    /// Records a viewport width change. Applied by [`Feed::tick`] once resizing settles.
    pub fn on_resize(&mut self, width: u32, now_ms: u64) {
        self.resize.on_resize(width, now_ms);
    }

    /// Advances debounced work. Returns `true` when the layout changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.resize.update(now_ms);
        self.sync_layout()
    }

    /// Takes the one-time scroll restore of a hydrated feed. Returns `None` afterwards.
    pub fn take_scroll_restore(&mut self) -> Option<ScrollRestore> {
        self.scroll_restore.take()
    }

    /// Captures the state to persist before navigating away.
    pub fn snapshot(
        &self,
        route: impl Into<String>,
        last_viewed_item_id: Option<ItemId>,
        scroll_y: f64,
    ) -> FeedSnapshot<P>
    where
        P: Clone,
    {
        FeedSnapshot {
            route: route.into(),
            items: self.state.items.clone(),
            page: self.state.page,
            last_viewed_item_id,
            scroll_y,
        }
    }

    /// Tears the feed down. Any fetch still in flight will be discarded when it resolves.
    pub fn teardown(&mut self) {
        if let Some(_request) = self.in_flight.take() {
            fdebug!(
                ticket = _request.ticket,
                "Feed::teardown with fetch in flight"
            );
        }
        self.torn_down = true;
    }

    fn sync_trigger_state(&mut self) {
        self.state.auto_load_count = self.trigger.auto_load_count();
        self.state.reached_cap = self.trigger.reached_cap();
    }

    fn sync_layout(&mut self) -> bool {
        self.layout
            .sync(self.state.items.len(), self.resize.columns())
    }
}
