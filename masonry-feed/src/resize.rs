use crate::{Breakpoints, FeedOptions};

/// Debounced viewport-width tracking that drives the column count.
///
/// Until the first width is applied the column count is the fixed `default_columns`, so any
/// render that happens before measurement lays out identically.
///
/// The watcher owns no timers. Report widths with [`ResizeWatcher::on_resize`] and call
/// [`ResizeWatcher::update`] from the host's tick; a burst of events is applied once, after
/// `resize_debounce_ms` without a new event.
#[derive(Clone, Debug)]
pub struct ResizeWatcher {
    breakpoints: Breakpoints,
    default_columns: usize,
    debounce_ms: u64,
    width: Option<u32>,
    pending: Option<PendingWidth>,
    columns: usize,
}

#[derive(Clone, Copy, Debug)]
struct PendingWidth {
    width: u32,
    last_event_ms: u64,
}

impl ResizeWatcher {
    pub fn new(options: &FeedOptions) -> Self {
        let default_columns = options.default_columns.max(1);
        Self {
            breakpoints: options.breakpoints.clone(),
            default_columns,
            debounce_ms: options.resize_debounce_ms,
            width: None,
            pending: None,
            columns: default_columns,
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn default_columns(&self) -> usize {
        self.default_columns
    }

    /// The last applied width, or `None` before the first measurement.
    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn is_measured(&self) -> bool {
        self.width.is_some()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Applies a width immediately, bypassing the debounce. Use this for the first measurement
    /// after mount.
    ///
    /// Returns the new column count when it changed.
    pub fn measure(&mut self, width: u32) -> Option<usize> {
        self.pending = None;
        self.apply(width)
    }

    /// Records a width change event at `now_ms`. Later events replace earlier ones.
    pub fn on_resize(&mut self, width: u32, now_ms: u64) {
        self.pending = Some(PendingWidth {
            width,
            last_event_ms: now_ms,
        });
    }

    /// Applies the pending width once the quiet period has elapsed.
    ///
    /// Returns the new column count when it changed.
    pub fn update(&mut self, now_ms: u64) -> Option<usize> {
        let pending = self.pending?;
        if now_ms.saturating_sub(pending.last_event_ms) < self.debounce_ms {
            return None;
        }
        self.pending = None;
        self.apply(pending.width)
    }

    fn apply(&mut self, width: u32) -> Option<usize> {
        self.width = Some(width);
        let next = self.breakpoints.columns_for_width(width);
        if next == self.columns {
            return None;
        }
        fdebug!(
            width,
            from = self.columns,
            to = next,
            "ResizeWatcher: columns changed"
        );
        self.columns = next;
        Some(next)
    }
}
