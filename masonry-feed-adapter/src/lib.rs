//! Adapter layer for the `masonry-feed` crate.
//!
//! The `masonry-feed` crate is I/O-free and only models the feed. This crate supplies the
//! collaborators a host needs around it:
//!
//! - [`PageSource`] and an HTTP implementation ([`HttpPageSource`], `http` feature) speaking
//!   `GET /items?page={n}&limit={size}` → `{ success, data, pagination?: { hasMore } }`
//! - [`StateStore`]: consume-once snapshot persistence over a [`SessionStorage`]
//! - [`FeedController`]: an async driver tying a feed, a source and a store to one route
//!
//! This crate is framework-agnostic (no DOM or GUI bindings).
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod controller;
mod error;
#[cfg(feature = "http")]
mod http;
mod source;
mod storage;
mod store;


pub use controller::FeedController;
pub use error::{FeedError, Result};
#[cfg(feature = "http")]
pub use http::HttpPageSource;
pub use source::{PageSource, parse_page_response};
pub use storage::{DirStorage, MemoryStorage, SessionStorage};
pub use store::{StateStore, StoreOptions};

pub use masonry_feed;
