// Gallery entity operations.
// List, add and delete images; mutations rewrite the whole document.

use tracing::info;

use crate::error::Result;
use crate::model::{GalleryImage, NewGalleryImage, generate_id};
use crate::store::{DocumentStore, Transport};

impl<T: Transport> DocumentStore<T> {
    pub async fn get_gallery_images(&self) -> Result<Vec<GalleryImage>> {
        Ok(self.read().await?.gallery.clone())
    }

    /// Append an image with a fresh id.
    pub async fn add_gallery_image(&self, image: NewGalleryImage) -> Result<GalleryImage> {
        let document = self.read_for_update().await?;

        let id = generate_id(document.gallery.iter().map(|i| i.id.as_str()));
        let image = image.into_image(id);

        let mut gallery = document.gallery.clone();
        gallery.push(image.clone());
        self.write(document.with_gallery(gallery)).await?;

        info!(id = %image.id, "added gallery image");
        Ok(image)
    }

    /// Remove the image with `id`. Returns whether anything was removed.
    pub async fn delete_gallery_image(&self, id: &str) -> Result<bool> {
        let document = self.read_for_update().await?;

        let gallery: Vec<GalleryImage> = document
            .gallery
            .iter()
            .filter(|i| i.id != id)
            .cloned()
            .collect();
        if gallery.len() == document.gallery.len() {
            return Ok(false);
        }

        self.write(document.with_gallery(gallery)).await?;
        info!(id, "deleted gallery image");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FolioError;
    use crate::store::testing::{MockTransport, sample_document};
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_add_and_delete_gallery_image() {
        let store = DocumentStore::new(MockTransport::new(sample_document()));

        let added = store
            .add_gallery_image(NewGalleryImage {
                image_url: "https://img.example/g2.jpg".to_string(),
                title: "Poster".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(added.title, "Poster");

        let written = store.transport().last_stored().unwrap();
        assert_eq!(written.gallery.len(), 2);
        assert_eq!(written.works, sample_document().works);

        assert!(store.delete_gallery_image("g1").await.unwrap());
        let images = store.get_gallery_images().await.unwrap();
        assert_eq!(images, vec![added]);

        assert!(!store.delete_gallery_image("g1").await.unwrap());
        assert_eq!(store.transport().stores.load(Ordering::SeqCst), 2);
        assert_eq!(store.transport().fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gallery_mutations_refuse_unreadable_store() {
        let store = DocumentStore::new(MockTransport::new(sample_document()));
        store.transport().fail_fetches(true);

        let added = store
            .add_gallery_image(NewGalleryImage {
                image_url: "https://img.example/g2.jpg".to_string(),
                title: String::new(),
            })
            .await;
        assert!(matches!(added, Err(FolioError::ReadFailed(_))));
        assert!(matches!(
            store.delete_gallery_image("g1").await,
            Err(FolioError::ReadFailed(_))
        ));
        assert_eq!(store.transport().stores.load(Ordering::SeqCst), 0);
    }
}
