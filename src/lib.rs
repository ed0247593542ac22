// Portfolio content store.
// Cached access to the gist-backed portfolio document, its entity
// operations, and the HTTP proxy that fronts the gist.

pub mod config;
pub mod error;
pub mod github;
pub mod image;
pub mod model;
pub mod proxy;
pub mod services;
pub mod store;

pub use error::{FolioError, Result};
pub use model::{Document, GalleryImage, NewGalleryImage, NewWork, Work, WorkCategory, WorkUpdate};
pub use store::{DocumentStore, ReadErrorPolicy, Transport};
