use anyhow::Result;
use async_trait::async_trait;
use reqwest::{
    header::{HeaderValue, ACCEPT},
    multipart, Client,
};
use shared::{
    domain::Paper,
    error::{ApiError, ApiException, ErrorCode},
    protocol::{UploadForm, UploadReceipt, ADMIN_ROUTE, PAPERS_ROUTE, UPLOAD_FILE_FIELD, UPLOAD_ROUTE},
};
use tracing::debug;
use url::Url;

pub mod console;
pub mod device;
pub mod error;
pub mod search;
pub mod session;
pub mod startup;

pub use console::{Console, ConsoleEvent, LineTone, OutputLine, Segment, SegmentStyle};
pub use device::{DeviceInfo, DeviceProbe, StorageEstimate, SystemProbe};
pub use error::ClientError;
pub use session::{SearchOutcome, SearchSession};
pub use startup::{run_startup, Pacing, StartupReport};

/// Anything that can hand the terminal its paper list.
#[async_trait]
pub trait PaperSource: Send + Sync {
    async fn fetch_papers(&self) -> Result<Vec<Paper>>;
}

/// HTTP client for the archive server.
#[derive(Debug, Clone)]
pub struct ArchiveClient {
    http: Client,
    base_url: Url,
}

impl ArchiveClient {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http: Client::new(),
            base_url: normalize_base_url(server_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn admin_url(&self) -> Result<Url, ClientError> {
        self.endpoint(ADMIN_ROUTE)
    }

    fn endpoint(&self, route: &str) -> Result<Url, ClientError> {
        join_url(&self.base_url, route).map_err(|source| ClientError::InvalidServerUrl {
            url: format!("{}{route}", self.base_url),
            source,
        })
    }

    pub async fn list_papers(&self) -> Result<Vec<Paper>, ClientError> {
        let url = self.endpoint(PAPERS_ROUTE)?;
        debug!(%url, "fetching paper list");
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|source| ClientError::Transport {
                url: url.to_string(),
                source,
            })?;
        response
            .json::<Vec<Paper>>()
            .await
            .map_err(|source| ClientError::Decode {
                url: url.to_string(),
                source,
            })
    }

    pub async fn upload_paper(
        &self,
        form: &UploadForm,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadReceipt, ClientError> {
        let url = self.endpoint(UPLOAD_ROUTE)?;
        let transport = |source: reqwest::Error| ClientError::Transport {
            url: url.to_string(),
            source,
        };

        let mut body = multipart::Form::new();
        for (name, value) in form.fields() {
            body = body.text(name, value.to_string());
        }
        let part = multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("application/pdf")
            .map_err(transport)?;
        body = body.part(UPLOAD_FILE_FIELD, part);

        let response = self
            .http
            .post(url.clone())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .multipart(body)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let err = response.json::<ApiError>().await.unwrap_or_else(|_| {
                ApiError::new(ErrorCode::Internal, format!("upload failed with {status}"))
            });
            return Err(ApiException::from(err).into());
        }
        response
            .json::<UploadReceipt>()
            .await
            .map_err(|source| ClientError::Decode {
                url: url.to_string(),
                source,
            })
    }
}

#[async_trait]
impl PaperSource for ArchiveClient {
    async fn fetch_papers(&self) -> Result<Vec<Paper>> {
        Ok(self.list_papers().await?)
    }
}

/// Parses `server_url` and gives it a trailing slash so relative joins keep
/// any path prefix.
pub fn normalize_base_url(server_url: &str) -> Result<Url, ClientError> {
    let trimmed = server_url.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&with_slash).map_err(|source| ClientError::InvalidServerUrl {
        url: server_url.to_string(),
        source,
    })
}

/// Joins a server-rooted path such as `/api/papers` under `base`.
pub fn join_url(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    base.join(path.trim_start_matches('/'))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
