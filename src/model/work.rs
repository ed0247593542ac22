// Portfolio work entries.
// Defines the Work record, its category, and the create/update payloads.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::FolioError;

/// Portfolio section a work belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkCategory {
    Design,
    Websites,
    Apps,
    Presentations,
}

impl WorkCategory {
    pub const ALL: [WorkCategory; 4] = [
        WorkCategory::Design,
        WorkCategory::Websites,
        WorkCategory::Apps,
        WorkCategory::Presentations,
    ];

    /// Wire name, as stored in the document.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkCategory::Design => "design",
            WorkCategory::Websites => "websites",
            WorkCategory::Apps => "apps",
            WorkCategory::Presentations => "presentations",
        }
    }

    /// Human readable section title.
    pub fn display_name(&self) -> &'static str {
        match self {
            WorkCategory::Design => "Graphic design",
            WorkCategory::Websites => "Websites",
            WorkCategory::Apps => "Apps",
            WorkCategory::Presentations => "Presentations",
        }
    }
}

impl fmt::Display for WorkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkCategory {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorkCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| FolioError::Other(format!("Unknown work category: {s}")))
    }
}

/// A single portfolio work sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: WorkCategory,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_images: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Display position; lower sorts first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<f64>,
    /// Keys this model does not know, kept so a rewrite does not drop them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload for creating a work. The id is assigned on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWork {
    pub title: String,
    pub description: String,
    pub category: WorkCategory,
    pub image_url: String,
    #[serde(default)]
    pub additional_images: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub date: String,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub order: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewWork {
    pub fn into_work(mut self, id: String, order: f64) -> Work {
        self.extra.remove("id");
        Work {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            image_url: self.image_url,
            additional_images: self.additional_images,
            tags: self.tags,
            date: self.date,
            client: self.client,
            link: self.link,
            order: Some(self.order.unwrap_or(order)),
            extra: self.extra,
        }
    }
}

/// Partial update for a work. Fields left as `None` keep their value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<WorkCategory>,
    pub image_url: Option<String>,
    pub additional_images: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub date: Option<String>,
    pub client: Option<String>,
    pub link: Option<String>,
    pub order: Option<f64>,
    /// Extra keys, merged over the existing ones.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkUpdate {
    /// Shallow merge onto an existing work, returning the merged copy.
    pub fn apply(&self, work: &Work) -> Work {
        let update = self.clone();
        Work {
            id: work.id.clone(),
            title: update.title.unwrap_or_else(|| work.title.clone()),
            description: update.description.unwrap_or_else(|| work.description.clone()),
            category: update.category.unwrap_or(work.category),
            image_url: update.image_url.unwrap_or_else(|| work.image_url.clone()),
            additional_images: update
                .additional_images
                .or_else(|| work.additional_images.clone()),
            tags: update.tags.unwrap_or_else(|| work.tags.clone()),
            date: update.date.unwrap_or_else(|| work.date.clone()),
            client: update.client.or_else(|| work.client.clone()),
            link: update.link.or_else(|| work.link.clone()),
            order: update.order.or(work.order),
            extra: {
                let mut extra = work.extra.clone();
                extra.extend(update.extra.into_iter().filter(|(key, _)| key != "id"));
                extra
            },
        }
    }
}

/// Next display position: one past the highest existing order, 0 when none.
pub fn next_order(works: &[Work]) -> f64 {
    works
        .iter()
        .filter_map(|work| work.order)
        .filter(|order| order.is_finite())
        .reduce(f64::max)
        .map_or(0.0, |max| max + 1.0)
}

/// Sort works for display. Ordered works come first, ascending; works
/// without an order keep their stored sequence at the end.
pub fn sort_for_display(works: &mut [Work]) {
    works.sort_by(|a, b| match (a.order, b.order) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work(id: &str, order: Option<f64>) -> Work {
        Work {
            id: id.to_string(),
            title: format!("Work {id}"),
            description: String::new(),
            category: WorkCategory::Design,
            image_url: format!("https://img.example/{id}.png"),
            additional_images: None,
            tags: vec![],
            date: "2024-01-01".to_string(),
            client: None,
            link: None,
            order,
            extra: Map::new(),
        }
    }

    #[test]
    fn test_category_parse_and_display() {
        assert_eq!(
            "websites".parse::<WorkCategory>().unwrap(),
            WorkCategory::Websites
        );
        assert!("video".parse::<WorkCategory>().is_err());
        assert_eq!(WorkCategory::Apps.to_string(), "apps");
        assert_eq!(WorkCategory::Design.display_name(), "Graphic design");
    }

    #[test]
    fn test_work_wire_format() {
        let json = r#"{
            "id": "1700000000000",
            "title": "Rebrand",
            "description": "Logo and identity",
            "category": "design",
            "imageUrl": "https://img.example/a.png",
            "tags": ["branding"],
            "date": "2023-10-15",
            "client": "TechVision"
        }"#;

        let parsed: Work = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.category, WorkCategory::Design);
        assert_eq!(parsed.client.as_deref(), Some("TechVision"));
        assert_eq!(parsed.order, None);

        let value = serde_json::to_value(&parsed).unwrap();
        assert_eq!(value["imageUrl"], "https://img.example/a.png");
        assert!(value.get("link").is_none());
        assert!(value.get("order").is_none());
    }

    #[test]
    fn test_fractional_order_and_unknown_keys_survive() {
        let json = r#"{
            "id": "a",
            "title": "Site",
            "description": "",
            "category": "websites",
            "imageUrl": "https://img.example/a.png",
            "tags": [],
            "date": "2024-01-01",
            "order": 1.5,
            "featured": true
        }"#;

        let parsed: Work = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.order, Some(1.5));
        assert_eq!(parsed.extra["featured"], Value::Bool(true));

        let value = serde_json::to_value(&parsed).unwrap();
        assert_eq!(value["order"], 1.5);
        assert_eq!(value["featured"], true);
        assert!(value.get("extra").is_none());
    }

    #[test]
    fn test_next_order() {
        assert_eq!(next_order(&[]), 0.0);
        assert_eq!(next_order(&[work("a", Some(0.0))]), 1.0);
        assert_eq!(next_order(&[work("a", Some(4.0)), work("b", Some(2.0))]), 5.0);
        assert_eq!(next_order(&[work("a", None)]), 0.0);
        assert_eq!(next_order(&[work("a", Some(1.5))]), 2.5);
        assert_eq!(next_order(&[work("a", Some(f64::MAX))]), f64::MAX);
    }

    #[test]
    fn test_update_merges_fields() {
        let mut original = work("a", Some(3.0));
        original.extra.insert("featured".to_string(), Value::Bool(true));
        original.extra.insert("views".to_string(), Value::from(10));
        let update = WorkUpdate {
            title: Some("Renamed".to_string()),
            link: Some("https://example.com".to_string()),
            extra: Map::from_iter([("views".to_string(), Value::from(11))]),
            ..Default::default()
        };

        let merged = update.apply(&original);
        assert_eq!(merged.id, "a");
        assert_eq!(merged.title, "Renamed");
        assert_eq!(merged.link.as_deref(), Some("https://example.com"));
        assert_eq!(merged.order, Some(3.0));
        assert_eq!(merged.image_url, original.image_url);
        assert_eq!(merged.extra["featured"], Value::Bool(true));
        assert_eq!(merged.extra["views"], Value::from(11));
    }

    #[test]
    fn test_sort_for_display() {
        let mut works = vec![
            work("x", None),
            work("b", Some(2.0)),
            work("a", Some(0.5)),
            work("y", None),
        ];
        sort_for_display(&mut works);

        let ids: Vec<&str> = works.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "x", "y"]);
    }
}
