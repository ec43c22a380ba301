use shared::error::ApiException;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url '{url}': {source}")]
    InvalidServerUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },
    #[error("{url} returned an unreadable response: {source}")]
    Decode { url: String, source: reqwest::Error },
    #[error("server rejected request: {0}")]
    Api(#[from] ApiException),
}
