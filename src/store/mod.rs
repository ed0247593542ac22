// Store module.
// The document cache/coordinator and the transports it can sit in front of.

pub mod coordinator;
pub mod local;
pub mod transport;

pub use coordinator::{DocumentStore, ReadErrorPolicy};
pub use local::{LocalTransport, SavedDocument};
pub use transport::{HttpTransport, Transport};

use tracing::info;

use crate::config::{BackendKind, ClientConfig};
use crate::error::{FolioError, Result};

/// Build a document store for the configured backend.
pub fn connect(config: &ClientConfig) -> Result<DocumentStore<Box<dyn Transport>>> {
    let transport: Box<dyn Transport> = match config.backend {
        BackendKind::Http => {
            info!(api_url = %config.api_url, "using store proxy");
            Box::new(HttpTransport::new(&config.api_url)?)
        }
        BackendKind::Local => {
            let path = local::default_document_path()
                .ok_or_else(|| FolioError::Other("No local data directory available".to_string()))?;
            info!(path = %path.display(), "using local document file");
            Box::new(LocalTransport::new(path))
        }
    };

    Ok(DocumentStore::new(transport).with_policy(config.read_error))
}
