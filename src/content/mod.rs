use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use crate::config::ContentConfig;
use crate::session::change::ChangePayload;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("invalid content service base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("content {content_id} rejected with status {status}")]
    Rejected { content_id: i64, status: u16 },
}

/// Persistence seam for the content service. The session only ever sees this
/// trait; the HTTP implementation below is what production wires in.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Persist one content value. Any `Err` counts as a failed item for the
    /// commit that issued it; no distinction is made between a rejection and
    /// a request that never reached the server.
    async fn save(
        &self,
        content_id: i64,
        payload: &ChangePayload,
        credential: &str,
    ) -> Result<(), ContentError>;
}

/// `ContentStore` backed by the portal's content API: one PUT per content
/// unit, bearer credential, JSON body, any 2xx counts as success.
pub struct HttpContentStore {
    client: reqwest::Client,
    base_url: Url,
    log_requests: bool,
}

impl HttpContentStore {
    pub fn new(config: &ContentConfig) -> Result<Self, ContentError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(&config.base_url)?,
            log_requests: config.enable_request_logging,
        })
    }

    fn content_url(&self, content_id: i64) -> Result<Url, ContentError> {
        Ok(self.base_url.join(&format!("api/content/{}", content_id))?)
    }
}

#[async_trait]
impl ContentStore for HttpContentStore {
    async fn save(
        &self,
        content_id: i64,
        payload: &ChangePayload,
        credential: &str,
    ) -> Result<(), ContentError> {
        let url = self.content_url(content_id)?;

        if self.log_requests {
            tracing::debug!(%url, content_id, "saving content");
        }

        let response = self
            .client
            .put(url)
            .bearer_auth(credential)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ContentError::Rejected {
                content_id,
                status: status.as_u16(),
            })
        }
    }
}
