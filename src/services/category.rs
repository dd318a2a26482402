use std::sync::Arc;

use crate::domain::Category;
use crate::services::{HttpResourceService, InMemoryApi, CATEGORIES};

pub type CategoryService = HttpResourceService<Category>;

impl CategoryService {
    pub fn categories(api: Arc<InMemoryApi>) -> Self {
        Self::new(api, CATEGORIES)
    }
}
