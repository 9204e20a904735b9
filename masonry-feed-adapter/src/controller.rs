use masonry_feed::{
    ColumnAssignment, Completion, FailureKind, Feed, FeedItem, FeedOptions, Footer, ItemId,
    PageRequest, ScrollRestore,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{PageSource, SessionStorage, StateStore};

/// Drives a [`Feed`] mounted on one route: runs its fetches against a [`PageSource`] and
/// persists/restores it through a [`StateStore`].
///
/// All methods take `&mut self`, so at most one fetch is in flight per controller. Dropping a
/// fetch future before it resolves counts as a failed attempt.
pub struct FeedController<S: PageSource, St> {
    feed: Feed<S::Payload>,
    source: S,
    store: StateStore<St>,
    route: String,
}

impl<S, St> FeedController<S, St>
where
    S: PageSource,
    St: SessionStorage,
{
    /// Mounts a feed for `route`.
    ///
    /// If the store holds a snapshot for this route, the feed is hydrated from it (and the
    /// snapshot is consumed); otherwise it starts cold from `initial_items`.
    pub fn mount(
        route: impl Into<String>,
        initial_items: Vec<FeedItem<S::Payload>>,
        options: FeedOptions,
        source: S,
        mut store: StateStore<St>,
    ) -> Self
    where
        S::Payload: DeserializeOwned,
    {
        let route = route.into();
        let feed = match store.take::<S::Payload>(&route) {
            Some(snapshot) => Feed::from_snapshot(snapshot, options),
            None => Feed::new(initial_items, options),
        };
        fdebug!(
            %route,
            restored = feed.is_restored(),
            items = feed.len(),
            "FeedController::mount"
        );
        Self {
            feed,
            source,
            store,
            route,
        }
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn feed(&self) -> &Feed<S::Payload> {
        &self.feed
    }

    pub fn feed_mut(&mut self) -> &mut Feed<S::Payload> {
        &mut self.feed
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> &StateStore<St> {
        &self.store
    }

    pub fn items(&self) -> &[FeedItem<S::Payload>] {
        self.feed.items()
    }

    pub fn columns(&self) -> &ColumnAssignment {
        self.feed.columns()
    }

    pub fn footer(&self) -> Footer {
        self.feed.footer()
    }

    /// The sentinel came near the viewport. Returns `None` when no fetch was started.
    pub async fn on_sentinel_near(&mut self) -> Option<Completion> {
        let request = self.feed.on_sentinel_near()?;
        Some(self.run(request).await)
    }

    /// See [`Feed::on_scroll`].
    pub async fn on_scroll(
        &mut self,
        sentinel_top: f64,
        scroll_offset: f64,
        viewport_height: f64,
    ) -> Option<Completion> {
        let request = self
            .feed
            .on_scroll(sentinel_top, scroll_offset, viewport_height)?;
        Some(self.run(request).await)
    }

    /// The manual "load more" control was pressed.
    pub async fn load_more(&mut self) -> Option<Completion> {
        let request = self.feed.load_more()?;
        Some(self.run(request).await)
    }

    async fn run(&mut self, request: PageRequest) -> Completion {
        let Self { feed, source, .. } = self;
        let mut guard = Abandon {
            feed,
            request: Some(request),
        };
        let result = source.fetch_page(request.page, request.page_size).await;
        guard.request = None;

        let result = result.map_err(|err| {
            fwarn!(page = request.page, error = %err, "FeedController: fetch failed");
            err.failure_kind()
        });
        guard.feed.complete(request, result)
    }

    pub fn measure_viewport(&mut self, width: u32) -> bool {
        self.feed.measure_viewport(width)
    }

    pub fn on_resize(&mut self, width: u32, now_ms: u64) {
        self.feed.on_resize(width, now_ms);
    }

    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.feed.tick(now_ms)
    }

    /// Takes the one-time scroll to apply after the first paint of a restored feed.
    pub fn take_scroll_restore(&mut self) -> Option<ScrollRestore> {
        self.feed.take_scroll_restore()
    }

    /// The user is navigating from the feed to an item. Persists the feed and `scroll_y` so
    /// that mounting this route again restores them.
    ///
    /// Persistence failures are logged and swallowed; returns whether the snapshot was saved.
    pub fn navigate_to_item(&mut self, item_id: impl Into<ItemId>, scroll_y: f64) -> bool
    where
        S::Payload: Serialize + Clone,
    {
        let snapshot = self
            .feed
            .snapshot(self.route.as_str(), Some(item_id.into()), scroll_y);
        match self.store.persist(&snapshot) {
            Ok(()) => true,
            Err(_err) => {
                fwarn!(error = %_err, "FeedController: snapshot not saved");
                false
            }
        }
    }

    /// Tears the feed down and hands back the source and store.
    pub fn unmount(mut self) -> (S, StateStore<St>) {
        self.feed.teardown();
        (self.source, self.store)
    }
}

/// Fails the in-flight request if the fetch future is dropped before it resolves.
struct Abandon<'a, P> {
    feed: &'a mut Feed<P>,
    request: Option<PageRequest>,
}

impl<P> Drop for Abandon<'_, P> {
    fn drop(&mut self) {
        if let Some(request) = self.request.take() {
            fdebug!(ticket = request.ticket, "FeedController: fetch abandoned");
            self.feed.complete(request, Err(FailureKind::Network));
        }
    }
}
