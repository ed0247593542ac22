// Local file transport.
// Keeps the document in a JSON file on disk instead of behind the proxy.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::Result;
use crate::model::Document;

use super::transport::Transport;

const DOCUMENT_FILE: &str = "document.json";

/// On-disk wrapper with save metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedDocument {
    pub document: Document,
    pub saved_at: DateTime<Utc>,
}

/// Get the base data directory (~/.local/share/folio on Linux).
pub fn data_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "folio").map(|dirs| dirs.data_local_dir().to_path_buf())
}

/// Default path of the local document file.
pub fn default_document_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join(DOCUMENT_FILE))
}

/// Transport backed by a single JSON file.
pub struct LocalTransport {
    path: PathBuf,
}

impl LocalTransport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved wrapper, `None` if nothing has been saved yet.
    pub async fn read_saved(&self) -> Result<Option<SavedDocument>> {
        if !fs::try_exists(&self.path).await? {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path).await?;
        let saved: SavedDocument = serde_json::from_str(&contents)?;
        Ok(Some(saved))
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn fetch(&self) -> Result<Document> {
        Ok(self
            .read_saved()
            .await?
            .map(|saved| saved.document)
            .unwrap_or_default())
    }

    async fn store(&self, document: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let saved = SavedDocument {
            document: document.clone(),
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&saved)?;

        // Write atomically via temp file
        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;
        fs::rename(&temp_path, &self.path).await?;

        debug!(path = %self.path.display(), "saved document locally");
        Ok(())
    }
}
