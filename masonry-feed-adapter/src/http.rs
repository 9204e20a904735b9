use core::future::Future;
use std::time::Duration;

use masonry_feed::PageResult;
use serde_json::Value;

use crate::source::parse_page_response;
use crate::{FeedError, PageSource, Result};

/// A [`PageSource`] that issues `GET {base_url}{path}?page={n}&limit={page_size}`.
#[derive(Clone, Debug)]
pub struct HttpPageSource {
    client: reqwest::Client,
    base_url: String,
    path: String,
    id_field: String,
}

impl HttpPageSource {
    pub const DEFAULT_PATH: &'static str = "/items";
    pub const DEFAULT_ID_FIELD: &'static str = "_id";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Self::DEFAULT_TIMEOUT)
            .build()
            .map_err(|err| FeedError::Network(err.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            path: Self::DEFAULT_PATH.to_owned(),
            id_field: Self::DEFAULT_ID_FIELD.to_owned(),
        }
    }

    /// Pages a different listing with the same wire format, e.g. `/items/category/{id}`.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// The field of each wire item that holds its id.
    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self
    }

    pub fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if self.path.starts_with('/') {
            format!("{base}{}", self.path)
        } else {
            format!("{base}/{}", self.path)
        }
    }

    async fn get(&self, page: u32, page_size: u32) -> Result<PageResult<Value>> {
        let url = self.endpoint();
        fdebug!(%url, page, page_size, "HttpPageSource: GET");
        let resp = self
            .client
            .get(&url)
            .query(&[("page", page), ("limit", page_size)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            fwarn!(%url, status = status.as_u16(), "HttpPageSource: non-success status");
            return Err(FeedError::Status {
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await?;
        parse_page_response(&body, page_size, &self.id_field)
    }
}

impl PageSource for HttpPageSource {
    type Payload = Value;

    fn fetch_page(
        &self,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<PageResult<Value>>> + Send {
        self.get(page, page_size)
    }
}
