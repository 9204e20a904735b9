//! A headless infinite-scroll masonry feed engine.
//!
//! This crate holds the client-side feed logic that is independent of any UI framework:
//! cross-page deduplication, a deterministic round-robin column layout, debounced
//! viewport-width tracking, the sentinel-driven loading state machine, and the serializable
//! snapshot used to restore a feed after navigating away and back.
//!
//! It is I/O-free. A UI layer is expected to provide:
//! - sentinel proximity (or raw scroll geometry) and manual "load more" presses
//! - viewport widths and a clock (`now_ms`) for debouncing
//! - the actual page fetches, handed back through [`Feed::complete`]
//!
//! For an HTTP page source, session-storage persistence and an async driver, see the
//! `masonry-feed-adapter` crate.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod dedup;
mod feed;
mod key;
mod layout;
mod options;
mod resize;
mod state;
mod trigger;
mod types;

#[cfg(test)]
mod tests;

pub use dedup::{append_unique, merge};
pub use feed::{Feed, FeedState};
pub use layout::{ColumnAssignment, LayoutAssigner, assign, assign_count};
pub use options::{
    Breakpoint, Breakpoints, DEFAULT_AUTO_LOAD_CAP, DEFAULT_COLUMNS,
    DEFAULT_MAX_NO_PROGRESS_ATTEMPTS, DEFAULT_PAGE_SIZE, FeedOptions,
};
pub use resize::ResizeWatcher;
pub use state::{FeedSnapshot, ScrollRestore};
pub use trigger::{LoadState, LoadTrigger};
pub use types::{
    Completion, FailureKind, FeedItem, Footer, ItemId, LoadOrigin, PageRequest, PageResult,
};
