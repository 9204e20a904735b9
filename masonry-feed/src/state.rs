use alloc::string::String;
use alloc::vec::Vec;

use crate::{FeedItem, ItemId};

/// A serializable copy of feed state plus scroll offset, saved when the user navigates from
/// the feed to an item and consumed once on return.
///
/// With `feature = "serde"`, this type serializes as
/// `{ pathname, articles, page, lastViewedArticleId, scrollY }`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeedSnapshot<P> {
    #[cfg_attr(feature = "serde", serde(rename = "pathname"))]
    pub route: String,
    #[cfg_attr(feature = "serde", serde(rename = "articles"))]
    pub items: Vec<FeedItem<P>>,
    pub page: u32,
    #[cfg_attr(feature = "serde", serde(rename = "lastViewedArticleId", default))]
    pub last_viewed_item_id: Option<ItemId>,
    #[cfg_attr(feature = "serde", serde(rename = "scrollY"))]
    pub scroll_y: f64,
}

/// A one-time scroll the host should apply after the first paint of a restored feed.
///
/// `last_viewed_item_id` is an anchor for hosts whose layout may have shifted since the
/// snapshot was taken.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollRestore {
    pub scroll_y: f64,
    pub last_viewed_item_id: Option<ItemId>,
}
