use core::future::Future;

use masonry_feed::{FeedItem, PageResult};
use serde::Deserialize;
use serde_json::Value;

use crate::{FeedError, Result};

/// The paging collaborator: fetches one page of items.
///
/// Implementations own any retry policy; the feed engine never retries on its own. Repeated
/// calls for the same `(page, page_size)` may return overlapping items.
pub trait PageSource {
    type Payload;

    fn fetch_page(
        &self,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<PageResult<Self::Payload>>> + Send;
}

#[derive(Debug, Deserialize)]
struct PageResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Vec<Value>>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pagination {
    #[serde(default)]
    has_more: Option<bool>,
}

/// Parses a `{ success, data: [...], pagination?: { hasMore } }` body.
///
/// Each element of `data` becomes a [`FeedItem`] whose id is read from `id_field` (a string or
/// a number) and whose payload is the whole element. When `pagination.hasMore` is absent, a
/// page shorter than `page_size` is taken as the end of the feed.
pub fn parse_page_response(
    body: &[u8],
    page_size: u32,
    id_field: &str,
) -> Result<PageResult<Value>> {
    let resp: PageResponse = serde_json::from_slice(body)
        .map_err(|err| FeedError::ApiFormat(format!("invalid body: {err}")))?;

    if resp.success == Some(false) {
        return Err(FeedError::ApiFormat(
            resp.message
                .unwrap_or_else(|| "request was not successful".to_owned()),
        ));
    }

    let data = resp
        .data
        .ok_or_else(|| FeedError::ApiFormat("missing `data` array".to_owned()))?;

    let received = data.len();
    let items = data
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            let id = item_id(&value, id_field).ok_or_else(|| {
                FeedError::ApiFormat(format!("item {i} has no `{id_field}`"))
            })?;
            Ok(FeedItem::new(id, value))
        })
        .collect::<Result<Vec<_>>>()?;

    let has_more = resp
        .pagination
        .and_then(|p| p.has_more)
        .unwrap_or(received >= page_size as usize);

    Ok(PageResult::new(items, has_more))
}

fn item_id(value: &Value, id_field: &str) -> Option<String> {
    match value.get(id_field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
