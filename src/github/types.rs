// GitHub API types.
// Gist payloads and rate limit bookkeeping.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A gist as returned by `GET /gists/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gist {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub files: HashMap<String, GistFile>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// One file inside a gist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GistFile {
    pub filename: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    /// Set when the file content did not fit in the API response.
    #[serde(default)]
    pub truncated: bool,
    pub raw_url: Option<String>,
    pub content: Option<String>,
}

/// Body of `PATCH /gists/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct GistUpdate<'a> {
    pub files: HashMap<&'a str, GistFileContent<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GistFileContent<'a> {
    pub content: &'a str,
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Default)]
pub struct RateLimit {
    pub limit: u64,
    /// `None` until a response carried the header.
    pub remaining: Option<u64>,
    pub reset: u64,
}

impl RateLimit {
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    /// Reset time as wall clock, for messages.
    pub fn reset_display(&self) -> String {
        DateTime::from_timestamp(self.reset as i64, 0)
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gist_deserialize() {
        let json = r#"{
            "id": "abc123",
            "description": null,
            "updated_at": "2024-05-01T10:00:00Z",
            "files": {
                "db.json": {
                    "filename": "db.json",
                    "size": 27,
                    "truncated": false,
                    "raw_url": "https://gist.githubusercontent.com/raw/db.json",
                    "content": "{\"works\":[],\"gallery\":[]}"
                }
            }
        }"#;

        let gist: Gist = serde_json::from_str(json).unwrap();
        let file = &gist.files["db.json"];
        assert!(!file.truncated);
        assert_eq!(file.content.as_deref(), Some(r#"{"works":[],"gallery":[]}"#));
    }

    #[test]
    fn test_update_body_shape() {
        let mut files = HashMap::new();
        files.insert("db.json", GistFileContent { content: "{}" });
        let value = serde_json::to_value(GistUpdate { files }).unwrap();
        assert_eq!(value["files"]["db.json"]["content"], "{}");
    }

    #[test]
    fn test_rate_limit_exhausted() {
        let mut rate_limit = RateLimit::default();
        assert!(!rate_limit.is_exhausted());

        rate_limit.remaining = Some(0);
        rate_limit.reset = 0;
        assert!(rate_limit.is_exhausted());
        assert_eq!(rate_limit.reset_display(), "00:00:00");
    }
}
