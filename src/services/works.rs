// Work entity operations.
// Each mutation reads the cached document, builds a new one, and writes it back.
// Mutations never build on the empty fallback; an unreadable store is an error.

use tracing::{info, warn};

use crate::error::Result;
use crate::model::{NewWork, Work, WorkCategory, WorkUpdate, generate_id, next_order, sort_for_display};
use crate::store::{DocumentStore, Transport};

impl<T: Transport> DocumentStore<T> {
    /// All works in stored order.
    pub async fn get_works(&self) -> Result<Vec<Work>> {
        Ok(self.read().await?.works.clone())
    }

    /// All works in display order.
    pub async fn get_works_sorted(&self) -> Result<Vec<Work>> {
        let mut works = self.get_works().await?;
        sort_for_display(&mut works);
        Ok(works)
    }

    pub async fn get_works_by_category(&self, category: WorkCategory) -> Result<Vec<Work>> {
        let document = self.read().await?;
        Ok(document
            .works
            .iter()
            .filter(|work| work.category == category)
            .cloned()
            .collect())
    }

    /// Look up a work. A missing id is `None`, not an error.
    pub async fn get_work_by_id(&self, id: &str) -> Result<Option<Work>> {
        Ok(self.read().await?.find_work(id).cloned())
    }

    /// Insert a work with a fresh id, placed after every ordered work unless
    /// the payload carries its own order.
    pub async fn add_work(&self, work: NewWork) -> Result<Work> {
        let document = self.read_for_update().await?;

        let id = generate_id(document.works.iter().map(|w| w.id.as_str()));
        let work = work.into_work(id, next_order(&document.works));

        let mut works = document.works.clone();
        works.push(work.clone());
        self.write(document.with_works(works)).await?;

        info!(id = %work.id, order = ?work.order, "added work");
        Ok(work)
    }

    /// Merge `update` into the work with `id`. Returns `None` without
    /// writing when no such work exists.
    pub async fn update_work(&self, id: &str, update: WorkUpdate) -> Result<Option<Work>> {
        let document = self.read_for_update().await?;

        let Some(index) = document.works.iter().position(|w| w.id == id) else {
            warn!(id, "work not found for update");
            return Ok(None);
        };

        let updated = update.apply(&document.works[index]);
        let mut works = document.works.clone();
        works[index] = updated.clone();
        self.write(document.with_works(works)).await?;

        info!(id, "updated work");
        Ok(Some(updated))
    }

    /// Remove the work with `id`. Returns whether anything was removed;
    /// nothing is written when the id is unknown.
    pub async fn delete_work(&self, id: &str) -> Result<bool> {
        let document = self.read_for_update().await?;

        let works: Vec<Work> = document
            .works
            .iter()
            .filter(|w| w.id != id)
            .cloned()
            .collect();
        if works.len() == document.works.len() {
            return Ok(false);
        }

        self.write(document.with_works(works)).await?;
        info!(id, "deleted work");
        Ok(true)
    }
}
