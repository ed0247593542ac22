// Document transports.
// The seam between the cache and wherever the document actually lives.

use async_trait::async_trait;
use reqwest::{Client, Response, header::CONTENT_TYPE};
use serde::Deserialize;
use tracing::debug;

use crate::error::{FolioError, Result};
use crate::model::Document;

/// Reads and replaces the whole document. No partial updates.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the full current document.
    async fn fetch(&self) -> Result<Document>;

    /// Replace the stored document with `document`.
    async fn store(&self, document: &Document) -> Result<()>;
}

#[async_trait]
impl Transport for Box<dyn Transport> {
    async fn fetch(&self) -> Result<Document> {
        (**self).fetch().await
    }

    async fn store(&self, document: &Document) -> Result<()> {
        (**self).store(document).await
    }
}

/// Acknowledgement body returned by the store proxy on POST.
#[derive(Debug, Deserialize)]
struct WriteAck {
    #[serde(default)]
    message: Option<String>,
}

/// Talks to the store proxy over HTTP.
pub struct HttpTransport {
    client: Client,
    api_url: String,
}

impl HttpTransport {
    pub fn new(api_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().build().map_err(FolioError::Http)?;
        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Anything outside 2xx becomes a `Status` error carrying the body.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(FolioError::Status {
            status,
            body: response.text().await.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self) -> Result<Document> {
        let response = self.client.get(&self.api_url).send().await?;
        let response = Self::check_response(response).await?;
        let document: Document = response.json().await?;
        Ok(document)
    }

    async fn store(&self, document: &Document) -> Result<()> {
        let response = self
            .client
            .post(&self.api_url)
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(document)?)
            .send()
            .await?;
        let response = Self::check_response(response).await?;

        // The ack body is informational only.
        if let Ok(ack) = response.json::<WriteAck>().await {
            debug!(message = ?ack.message, "store acknowledged write");
        }
        Ok(())
    }
}
