// Data model module.
// Serde types for the stored document, works, and gallery images.

pub mod document;
pub mod gallery;
pub mod work;

pub use document::{Document, generate_id};
pub use gallery::{GalleryImage, NewGalleryImage};
pub use work::{NewWork, Work, WorkCategory, WorkUpdate, next_order, sort_for_display};
