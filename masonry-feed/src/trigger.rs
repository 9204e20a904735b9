use crate::LoadOrigin;

/// States of the load trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadState {
    /// Watching the sentinel; the next "near viewport" signal starts an automatic fetch.
    Observing,
    /// A fetch is in flight. Sentinel signals are ignored.
    Loading,
    /// More data exists but the auto-load cap is spent; only the manual control loads.
    ManualOnly,
    /// Terminal. No further fetches for this mount.
    Exhausted,
}

/// The sentinel-driven loading state machine.
///
/// The sentinel watcher should exist exactly while [`LoadTrigger::is_watching`] is `true`;
/// hosts create and tear it down from that, not from their own conditions.
#[derive(Clone, Debug)]
pub struct LoadTrigger {
    state: LoadState,
    cap: u32,
    auto_load_count: u32,
    max_no_progress: u32,
    no_progress_streak: u32,
    origin: Option<LoadOrigin>,
}

impl LoadTrigger {
    pub fn new(has_more: bool, cap: u32, max_no_progress: u32) -> Self {
        let mut t = Self {
            state: LoadState::Exhausted,
            cap,
            auto_load_count: 0,
            max_no_progress: max_no_progress.max(1),
            no_progress_streak: 0,
            origin: None,
        };
        if has_more {
            t.settle();
        }
        t
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn auto_load_count(&self) -> u32 {
        self.auto_load_count
    }

    pub fn reached_cap(&self) -> bool {
        self.auto_load_count >= self.cap
    }

    pub fn is_watching(&self) -> bool {
        self.state == LoadState::Observing
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == LoadState::Exhausted
    }

    /// The origin of the in-flight fetch, if any.
    pub fn loading_origin(&self) -> Option<LoadOrigin> {
        self.origin
    }

    /// The sentinel came near the viewport. Starts an automatic fetch from `Observing`.
    ///
    /// The auto-load counter is bumped here, before the fetch resolves, so failed fetches count
    /// against the cap too.
    pub fn on_sentinel_near(&mut self) -> bool {
        if self.state != LoadState::Observing {
            ftrace!(state = ?self.state, "LoadTrigger: sentinel ignored");
            return false;
        }
        self.auto_load_count = self.auto_load_count.saturating_add(1);
        self.enter_loading(LoadOrigin::Auto);
        true
    }

    /// The user pressed the manual control. Starts a fetch from `ManualOnly`.
    pub fn on_manual_load(&mut self) -> bool {
        if self.state != LoadState::ManualOnly {
            ftrace!(state = ?self.state, "LoadTrigger: manual load ignored");
            return false;
        }
        self.enter_loading(LoadOrigin::Manual);
        true
    }

    /// The in-flight fetch succeeded.
    ///
    /// A page that added nothing new ends the feed even if the server claims there is more.
    pub fn on_success(&mut self, has_more: bool, new_items: usize) {
        if self.state != LoadState::Loading {
            return;
        }
        self.origin = None;
        if !has_more || new_items == 0 {
            self.transition(LoadState::Exhausted);
            return;
        }
        self.no_progress_streak = 0;
        self.settle();
    }

    /// The in-flight fetch failed.
    ///
    /// Falls back so the user can retry, until `max_no_progress` consecutive failures, after
    /// which the feed is exhausted.
    pub fn on_failure(&mut self) {
        if self.state != LoadState::Loading {
            return;
        }
        self.origin = None;
        self.no_progress_streak = self.no_progress_streak.saturating_add(1);
        if self.no_progress_streak >= self.max_no_progress {
            fwarn!(
                attempts = self.no_progress_streak,
                "LoadTrigger: giving up after consecutive failures"
            );
            self.transition(LoadState::Exhausted);
            return;
        }
        self.settle();
    }

    fn enter_loading(&mut self, origin: LoadOrigin) {
        self.origin = Some(origin);
        self.transition(LoadState::Loading);
    }

    fn settle(&mut self) {
        let next = if self.reached_cap() {
            LoadState::ManualOnly
        } else {
            LoadState::Observing
        };
        self.transition(next);
    }

    fn transition(&mut self, next: LoadState) {
        if self.state != next {
            fdebug!(
                from = ?self.state,
                to = ?next,
                auto_load_count = self.auto_load_count,
                "LoadTrigger: transition"
            );
        }
        self.state = next;
    }
}
