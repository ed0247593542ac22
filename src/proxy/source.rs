// Backing storage for the store proxy.
// DocumentSource trait and the gist-backed implementation behind it.

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::github::GitHubClient;

/// Raw document text, loaded and saved whole.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn load(&self) -> Result<String>;

    async fn save(&self, content: &str) -> Result<()>;
}

/// One file inside a GitHub gist.
pub struct GistSource {
    client: GitHubClient,
    gist_id: String,
    filename: String,
}

impl GistSource {
    pub fn new(client: GitHubClient, gist_id: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            client,
            gist_id: gist_id.into(),
            filename: filename.into(),
        }
    }
}

#[async_trait]
impl DocumentSource for GistSource {
    async fn load(&self) -> Result<String> {
        self.client.get_gist_file(&self.gist_id, &self.filename).await
    }

    async fn save(&self, content: &str) -> Result<()> {
        info!(
            gist_id = %self.gist_id,
            filename = %self.filename,
            bytes = content.len(),
            "updating gist file"
        );
        self.client
            .update_gist_file(&self.gist_id, &self.filename, content)
            .await
    }
}
