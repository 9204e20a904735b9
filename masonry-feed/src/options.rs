use alloc::vec;
use alloc::vec::Vec;

/// Default column count used before the real viewport width is known.
pub const DEFAULT_COLUMNS: usize = 3;
/// Default PAGE_SIZE.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Default CAP on automatic fetches per mount.
pub const DEFAULT_AUTO_LOAD_CAP: u32 = 2;
/// Default number of consecutive failed attempts before the feed gives up.
pub const DEFAULT_MAX_NO_PROGRESS_ATTEMPTS: u32 = 3;

/// One row of the breakpoint table: widths strictly below `max_width` get `columns`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Breakpoint {
    pub max_width: u32,
    pub columns: usize,
}

/// An ordered viewport-width → column-count table.
///
/// Rows are matched in ascending `max_width` order; widths at or above the last row get
/// `fallback`. Column counts of zero are treated as one.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Breakpoints {
    pub rows: Vec<Breakpoint>,
    pub fallback: usize,
}

impl Breakpoints {
    pub fn new(rows: impl IntoIterator<Item = (u32, usize)>, fallback: usize) -> Self {
        let mut rows: Vec<Breakpoint> = rows
            .into_iter()
            .map(|(max_width, columns)| Breakpoint { max_width, columns })
            .collect();
        rows.sort_by_key(|r| r.max_width);
        Self { rows, fallback }
    }

    pub fn columns_for_width(&self, width: u32) -> usize {
        let columns = self
            .rows
            .iter()
            .find(|r| width < r.max_width)
            .map_or(self.fallback, |r| r.columns);
        columns.max(1)
    }
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            rows: vec![
                Breakpoint {
                    max_width: 640,
                    columns: 1,
                },
                Breakpoint {
                    max_width: 768,
                    columns: 2,
                },
                Breakpoint {
                    max_width: 1024,
                    columns: 3,
                },
                Breakpoint {
                    max_width: 1280,
                    columns: 4,
                },
                Breakpoint {
                    max_width: 1536,
                    columns: 5,
                },
            ],
            fallback: 6,
        }
    }
}

/// Configuration for [`crate::Feed`].
///
/// All fields have defaults; with `feature = "serde"` a partial config deserializes with the
/// missing fields filled in.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FeedOptions {
    /// Items requested per page (the `limit` query parameter).
    pub page_size: u32,
    /// Maximum number of automatic fetches per mount. Manual loads are not counted.
    pub auto_load_cap: u32,
    /// Consecutive failed attempts tolerated before the feed is forced to `Exhausted`.
    pub max_no_progress_attempts: u32,
    /// Column count used until the real viewport width has been observed.
    ///
    /// Server-side and first client renders must agree on this value.
    pub default_columns: usize,
    pub breakpoints: Breakpoints,
    /// Quiet period after the last resize event before the layout is recomputed.
    pub resize_debounce_ms: u64,
    /// How far below the viewport the sentinel may be and still count as "near".
    pub sentinel_margin_px: f64,
    /// Continuation flag for the caller-supplied first page.
    ///
    /// When `None`, a first page shorter than `page_size` is taken to mean there is nothing
    /// more to load.
    pub initial_has_more: Option<bool>,
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            auto_load_cap: DEFAULT_AUTO_LOAD_CAP,
            max_no_progress_attempts: DEFAULT_MAX_NO_PROGRESS_ATTEMPTS,
            default_columns: DEFAULT_COLUMNS,
            breakpoints: Breakpoints::default(),
            resize_debounce_ms: 150,
            sentinel_margin_px: 200.0,
            initial_has_more: None,
        }
    }
}

impl FeedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_auto_load_cap(mut self, cap: u32) -> Self {
        self.auto_load_cap = cap;
        self
    }

    pub fn with_max_no_progress_attempts(mut self, attempts: u32) -> Self {
        self.max_no_progress_attempts = attempts;
        self
    }

    pub fn with_default_columns(mut self, columns: usize) -> Self {
        self.default_columns = columns;
        self
    }

    pub fn with_breakpoints(mut self, breakpoints: Breakpoints) -> Self {
        self.breakpoints = breakpoints;
        self
    }

    pub fn with_resize_debounce_ms(mut self, delay_ms: u64) -> Self {
        self.resize_debounce_ms = delay_ms;
        self
    }

    pub fn with_sentinel_margin_px(mut self, margin: f64) -> Self {
        self.sentinel_margin_px = margin;
        self
    }

    pub fn with_initial_has_more(mut self, has_more: Option<bool>) -> Self {
        self.initial_has_more = has_more;
        self
    }

    /// Resolves the continuation flag for an initial page of `initial_len` items.
    pub(crate) fn resolve_initial_has_more(&self, initial_len: usize) -> bool {
        self.initial_has_more
            .unwrap_or(initial_len >= self.page_size as usize)
    }
}
