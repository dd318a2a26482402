//! Entry service: attaches the category snapshot before writes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Category, Entry};
use crate::services::{HttpResourceService, InMemoryApi, ResourceService, ServiceResult, ENTRIES};

pub struct EntryService {
    entries: HttpResourceService<Entry>,
    categories: Arc<dyn ResourceService<Category>>,
}

impl EntryService {
    pub fn new(api: Arc<InMemoryApi>, categories: Arc<dyn ResourceService<Category>>) -> Self {
        Self {
            entries: HttpResourceService::new(api, ENTRIES),
            categories,
        }
    }

    /// Fills `entry.category` from `categoryId`. An unknown category leaves
    /// the snapshot empty so the backend can reject the reference itself.
    /// The lookup is a `GET` issued ahead of every entry write.
    async fn with_category(&self, mut entry: Entry) -> ServiceResult<Entry> {
        match self
            .categories
            .get_by_id(&entry.category_id.to_string())
            .await
        {
            Ok(category) => entry.category = Some(category),
            Err(err) if err.status() == Some(404) => entry.category = None,
            Err(err) => return Err(err),
        }
        Ok(entry)
    }
}

#[async_trait]
impl ResourceService<Entry> for EntryService {
    async fn get_all(&self) -> ServiceResult<Vec<Entry>> {
        self.entries.get_all().await
    }

    async fn get_by_id(&self, id: &str) -> ServiceResult<Entry> {
        self.entries.get_by_id(id).await
    }

    async fn create(&self, resource: Entry) -> ServiceResult<Entry> {
        let entry = self.with_category(resource).await?;
        self.entries.create(entry).await
    }

    async fn update(&self, resource: Entry) -> ServiceResult<Entry> {
        let entry = self.with_category(resource).await?;
        self.entries.update(entry).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntryType;
    use crate::services::CategoryService;

    fn service() -> EntryService {
        let api = Arc::new(InMemoryApi::seeded());
        let categories = Arc::new(CategoryService::categories(Arc::clone(&api)));
        EntryService::new(api, categories)
    }

    #[tokio::test]
    async fn create_attaches_category_snapshot() {
        let entry = Entry::new("Cinema", EntryType::Expense, "32,00", "20/10/2018", 3);
        let created = service().create(entry).await.unwrap();
        assert_eq!(created.id, Some(6));
        assert_eq!(
            created.category.map(|category| category.name),
            Some("Lazer".to_string())
        );
    }

    #[tokio::test]
    async fn unknown_category_is_rejected_by_backend() {
        let entry = Entry::new("Cinema", EntryType::Expense, "32,00", "20/10/2018", 99);
        let err = service().create(entry).await.unwrap_err();
        assert_eq!(err.status(), Some(422));
    }
}
