// The stored document.
// Holds every persisted collection; always read and written as one blob.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::gallery::GalleryImage;
use super::work::Work;

/// Root of the persisted data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub works: Vec<Work>,
    #[serde(default)]
    pub gallery: Vec<GalleryImage>,
    /// Top-level keys other than the collections, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    /// Fallback used when the store cannot be read.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.works.is_empty() && self.gallery.is_empty()
    }

    pub fn find_work(&self, id: &str) -> Option<&Work> {
        self.works.iter().find(|work| work.id == id)
    }

    /// New document with `works` replaced and the gallery carried over.
    pub fn with_works(&self, works: Vec<Work>) -> Self {
        Self {
            works,
            gallery: self.gallery.clone(),
            extra: self.extra.clone(),
        }
    }

    /// New document with `gallery` replaced and the works carried over.
    pub fn with_gallery(&self, gallery: Vec<GalleryImage>) -> Self {
        Self {
            works: self.works.clone(),
            gallery,
            extra: self.extra.clone(),
        }
    }
}

/// Timestamp-derived id, bumped until it does not collide with `taken`.
pub fn generate_id<'a>(taken: impl Iterator<Item = &'a str> + Clone) -> String {
    let mut candidate = Utc::now().timestamp_millis();
    while taken.clone().any(|id| id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_collections_default_to_empty() {
        let doc: Document = serde_json::from_str("{}").unwrap();
        assert_eq!(doc, Document::empty());
        assert!(doc.is_empty());

        let doc: Document = serde_json::from_str(r#"{"works": []}"#).unwrap();
        assert!(doc.gallery.is_empty());
    }

    #[test]
    fn test_unknown_keys_survive_rewrite() {
        let json = r#"{
            "works": [{
                "id": "a",
                "title": "Site",
                "description": "",
                "category": "websites",
                "imageUrl": "https://img.example/a.png",
                "tags": [],
                "date": "2024-01-01",
                "order": 0.5,
                "featured": true
            }],
            "gallery": [],
            "settings": {"theme": "dark"}
        }"#;

        let doc: Document = serde_json::from_str(json).unwrap();
        let rewritten = doc.with_gallery(vec![]).with_works(doc.works.clone());

        let value = serde_json::to_value(&rewritten).unwrap();
        assert_eq!(value["settings"]["theme"], "dark");
        assert_eq!(value["works"][0]["featured"], true);
        assert_eq!(value["works"][0]["order"], 0.5);
    }

    #[test]
    fn test_generate_id_skips_taken() {
        let first = generate_id(std::iter::empty());
        let taken = [first.as_str()];
        let second = generate_id(taken.iter().copied());

        assert_ne!(first, second);
        assert!(second.parse::<i64>().is_ok());
    }
}
