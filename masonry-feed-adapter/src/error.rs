use masonry_feed::FailureKind;

/// Errors produced by the adapter layer.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The request could not be sent, timed out, or the body could not be read.
    #[error("request failed: {0}")]
    Network(String),
    /// The endpoint answered with a non-success HTTP status.
    #[error("endpoint returned status {status}")]
    Status { status: u16 },
    /// The response body did not have the expected shape.
    #[error("unexpected api response: {0}")]
    ApiFormat(String),
    /// The session store failed (quota exceeded, unwritable directory) or a snapshot could
    /// not be encoded.
    #[error("persistence failed: {0}")]
    Persistence(String),
}

impl FeedError {
    /// How the feed engine should classify this error when it ends a fetch.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::ApiFormat(_) => FailureKind::ApiFormat,
            _ => FailureKind::Network,
        }
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::ApiFormat(err.to_string());
        }
        if let Some(status) = err.status() {
            return Self::Status {
                status: status.as_u16(),
            };
        }
        Self::Network(err.to_string())
    }
}

pub type Result<T> = core::result::Result<T, FeedError>;
