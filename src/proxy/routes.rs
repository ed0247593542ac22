// Store proxy handlers.
// GET returns the stored document (or one work), POST replaces it whole.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::{
        StatusCode,
        header::{ALLOW, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::FolioError;
use crate::model::Document;

use super::error::ProxyError;
use super::source::DocumentSource;

pub struct ProxyState {
    pub source: Box<dyn DocumentSource>,
}

impl ProxyState {
    pub fn new(source: impl DocumentSource + 'static) -> Arc<Self> {
        Arc::new(Self {
            source: Box::new(source),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReadParams {
    pub id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

pub async fn read_handler(
    State(state): State<Arc<ProxyState>>,
    Query(params): Query<ReadParams>,
) -> Result<Response, ProxyError> {
    let content = state.source.load().await?;

    let Some(id) = params.id else {
        debug!(bytes = content.len(), "serving full document");
        return Ok(([(CONTENT_TYPE, "application/json")], content).into_response());
    };

    let document: Document = serde_json::from_str(&content).map_err(FolioError::from)?;
    match document.find_work(&id) {
        Some(work) => Ok(Json(work).into_response()),
        None => Err(ProxyError::WorkNotFound(id)),
    }
}

/// The body must be a document; it is stored as sent.
pub async fn write_handler(
    State(state): State<Arc<ProxyState>>,
    body: String,
) -> Result<Json<Message>, ProxyError> {
    let document: Document = serde_json::from_str(&body)
        .map_err(|e| ProxyError::MalformedPayload(e.to_string()))?;

    state.source.save(&body).await?;
    info!(
        works = document.works.len(),
        gallery = document.gallery.len(),
        "document replaced"
    );

    Ok(Json(Message {
        message: "Database updated successfully!".to_string(),
    }))
}

pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(ALLOW, "GET, POST, OPTIONS")],
        Json(Message {
            message: "Method Not Allowed".to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use async_trait::async_trait;
    use axum::body::to_bytes;
    use reqwest::StatusCode as UpstreamStatus;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct MemorySource {
        content: Mutex<String>,
        fail: AtomicBool,
    }

    impl MemorySource {
        fn new(content: &str) -> Self {
            Self {
                content: Mutex::new(content.to_string()),
                fail: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl DocumentSource for MemorySource {
        async fn load(&self) -> Result<String> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(FolioError::Status {
                    status: UpstreamStatus::BAD_GATEWAY,
                    body: "gist unavailable".to_string(),
                });
            }
            Ok(self.content.lock().unwrap().clone())
        }

        async fn save(&self, content: &str) -> Result<()> {
            *self.content.lock().unwrap() = content.to_string();
            Ok(())
        }
    }

    const STORED: &str = r#"{"works":[{"id":"a","title":"Site","description":"","category":"websites","imageUrl":"https://img.example/a.png","tags":[],"date":"2024-01-01","order":0}],"gallery":[]}"#;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn params(id: Option<&str>) -> Query<ReadParams> {
        Query(ReadParams {
            id: id.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn test_read_full_document_verbatim() {
        let state = ProxyState::new(MemorySource::new(STORED));

        let response = read_handler(State(state), params(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(body_text(response).await, STORED);
    }

    #[tokio::test]
    async fn test_read_single_work() {
        let state = ProxyState::new(MemorySource::new(STORED));

        let response = read_handler(State(state.clone()), params(Some("a")))
            .await
            .unwrap();
        let work: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(work["id"], "a");

        let missing = read_handler(State(state), params(Some("zzz")))
            .await
            .unwrap_err()
            .into_response();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_read_backend_failure_is_500() {
        let source = MemorySource::new(STORED);
        source.fail.store(true, Ordering::SeqCst);
        let state = ProxyState::new(source);

        let response = read_handler(State(state), params(None))
            .await
            .unwrap_err()
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert!(body["error"].as_str().unwrap().contains("gist unavailable"));
    }

    #[tokio::test]
    async fn test_write_replaces_document() {
        let state = ProxyState::new(MemorySource::new(STORED));
        let replacement = r#"{"works":[],"gallery":[{"id":"g1","imageUrl":"https://img.example/g.jpg","title":"Sketch"}]}"#;

        let Json(ack) = write_handler(State(state.clone()), replacement.to_string())
            .await
            .unwrap();
        assert_eq!(ack.message, "Database updated successfully!");

        let response = read_handler(State(state), params(None)).await.unwrap();
        assert_eq!(body_text(response).await, replacement);
    }

    #[tokio::test]
    async fn test_write_rejects_malformed_body() {
        let state = ProxyState::new(MemorySource::new(STORED));

        let response = write_handler(State(state.clone()), "not json".to_string())
            .await
            .unwrap_err()
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = read_handler(State(state), params(None)).await.unwrap();
        assert_eq!(body_text(response).await, STORED);
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let response = method_not_allowed().await.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(body_text(response).await.contains("Method Not Allowed"));
    }
}
