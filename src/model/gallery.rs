// Gallery image entries.
// Defines the GalleryImage record and the payload for adding one.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An image shown in the gallery section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub id: String,
    pub image_url: String,
    /// Caption. Older documents store it as `description`.
    #[serde(alias = "description", default)]
    pub title: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload for adding a gallery image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGalleryImage {
    pub image_url: String,
    #[serde(default)]
    pub title: String,
}

impl NewGalleryImage {
    pub fn into_image(self, id: String) -> GalleryImage {
        GalleryImage {
            id,
            image_url: self.image_url,
            title: self.title,
            extra: Map::new(),
        }
    }
}
