// Gist endpoints.
// Reading and replacing a single file inside a gist.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{FolioError, Result};

use super::client::GitHubClient;
use super::types::{Gist, GistFileContent, GistUpdate};

impl GitHubClient {
    /// Get a gist with its file listing and inline contents.
    pub async fn get_gist(&self, gist_id: &str) -> Result<Gist> {
        let response = self.get(&format!("/gists/{}", gist_id)).await?;
        let gist: Gist = response.json().await?;
        Ok(gist)
    }

    /// Full content of one gist file. Large files come back truncated in
    /// the gist listing and are fetched from their raw URL instead.
    pub async fn get_gist_file(&self, gist_id: &str, filename: &str) -> Result<String> {
        let mut gist = self.get_gist(gist_id).await?;
        let file = gist
            .files
            .remove(filename)
            .ok_or_else(|| FolioError::MissingGistFile(filename.to_string()))?;

        match (file.truncated, file.content, file.raw_url) {
            (false, Some(content), _) => Ok(content),
            (_, _, Some(raw_url)) => {
                debug!(filename, "gist file truncated, fetching raw content");
                let response = self.get_absolute(&raw_url).await?;
                Ok(response.text().await?)
            }
            _ => Err(FolioError::MissingGistFile(filename.to_string())),
        }
    }

    /// Replace the content of one gist file.
    pub async fn update_gist_file(&self, gist_id: &str, filename: &str, content: &str) -> Result<()> {
        let mut files = HashMap::new();
        files.insert(filename, GistFileContent { content });

        self.patch_json(&format!("/gists/{}", gist_id), &GistUpdate { files })
            .await?;
        Ok(())
    }
}
