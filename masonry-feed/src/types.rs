use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// A stable, feed-wide unique item identity.
pub type ItemId = String;

/// One entry of the feed. The payload is opaque to the engine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeedItem<P> {
    pub id: ItemId,
    pub payload: P,
}

impl<P> FeedItem<P> {
    pub fn new(id: impl Into<ItemId>, payload: P) -> Self {
        Self {
            id: id.into(),
            payload,
        }
    }
}

/// The result of one page fetch: produced once, consumed once by [`crate::Feed::complete`].
#[derive(Clone, Debug, PartialEq)]
pub struct PageResult<P> {
    pub items: Vec<FeedItem<P>>,
    pub has_more: bool,
}

impl<P> PageResult<P> {
    pub fn new(items: Vec<FeedItem<P>>, has_more: bool) -> Self {
        Self { items, has_more }
    }
}

/// Why a fetch failed. The engine treats both kinds the same way; the distinction is kept for
/// logging and for hosts that want to surface it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FailureKind {
    /// The request was rejected or timed out.
    Network,
    /// The response did not have the expected shape.
    ApiFormat,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => f.write_str("network error"),
            Self::ApiFormat => f.write_str("unexpected api response"),
        }
    }
}

/// Who asked for a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadOrigin {
    /// The sentinel came near the viewport.
    Auto,
    /// The user pressed the "load more" control.
    Manual,
}

/// A fetch the host must perform and hand back through [`crate::Feed::complete`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub ticket: u64,
    pub page: u32,
    pub page_size: u32,
    pub origin: LoadOrigin,
}

/// What [`crate::Feed::complete`] did with a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// The result was merged. `new_items` counts the ids that were not already in the feed.
    Applied { received: usize, new_items: usize },
    /// The fetch failed and the trigger fell back (or gave up).
    Failed { kind: FailureKind },
    /// The result belonged to a stale ticket or a torn-down feed and was dropped.
    Discarded,
}

/// The control rendered below the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Footer {
    /// A fetch is in flight.
    Loading,
    /// Automatic loading is armed; a "scroll for more" hint.
    ScrollHint,
    /// The auto-load cap was reached; a manual "load more" button.
    LoadMore,
    /// Nothing more to load.
    EndOfFeed,
    /// Nothing more to load and nothing was ever loaded.
    Empty,
}
