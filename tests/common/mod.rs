#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use finance_core::{
    controller::FormContext,
    domain::Category,
    errors::ServiceError,
    navigation::{FormRoute, Router},
    notify::RecordingNotifier,
    services::{CategoryService, EntryService, InMemoryApi, ResourceService, ServiceResult},
};
use tempfile::TempDir;

/// Seeded backend plus recording collaborators for controller tests.
pub struct Harness {
    pub api: Arc<InMemoryApi>,
    pub categories: Arc<CategoryService>,
    pub entries: Arc<EntryService>,
    pub notifier: Arc<RecordingNotifier>,
    pub router: Arc<Router>,
}

impl Harness {
    pub fn seeded() -> Self {
        Self::with_api(InMemoryApi::seeded())
    }

    /// Seeded backend answering every request after `delay`.
    pub fn with_api_delay(delay: Duration) -> Self {
        Self::with_api(InMemoryApi::seeded().with_delay(delay))
    }

    fn with_api(api: InMemoryApi) -> Self {
        let api = Arc::new(api);
        let categories = Arc::new(CategoryService::categories(Arc::clone(&api)));
        let entries = Arc::new(EntryService::new(
            Arc::clone(&api),
            Arc::clone(&categories) as Arc<dyn ResourceService<Category>>,
        ));
        Self {
            api,
            categories,
            entries,
            notifier: Arc::new(RecordingNotifier::new()),
            router: Arc::new(Router::new()),
        }
    }

    pub fn context(&self) -> FormContext {
        FormContext::new(
            Arc::clone(&self.notifier) as _,
            Arc::clone(&self.router) as _,
        )
    }
}

pub fn route(path: &str) -> FormRoute {
    FormRoute::parse(path).expect("valid form route")
}

/// Category service answering `get_by_id` after a per-id delay and logging
/// which requests started and which ran to completion.
#[derive(Default)]
pub struct ScriptedCategories {
    delays: HashMap<String, Duration>,
    log: Mutex<Vec<String>>,
}

impl ScriptedCategories {
    pub fn with_delay(mut self, id: &str, delay: Duration) -> Self {
        self.delays.insert(id.to_string(), delay);
        self
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().expect("log lock").clone()
    }

    fn record(&self, event: String) {
        self.log.lock().expect("log lock").push(event);
    }
}

#[async_trait]
impl ResourceService<Category> for ScriptedCategories {
    async fn get_all(&self) -> ServiceResult<Vec<Category>> {
        Ok(Vec::new())
    }

    async fn get_by_id(&self, id: &str) -> ServiceResult<Category> {
        self.record(format!("start {id}"));
        let delay = self.delays.get(id).copied().unwrap_or_default();
        tokio::time::sleep(delay).await;
        self.record(format!("finish {id}"));
        let numeric: i64 = id.parse().map_err(|_| ServiceError::Http {
            status: 404,
            body: None,
        })?;
        Ok(Category::new(format!("Categoria {id}")).with_id(numeric))
    }

    async fn create(&self, resource: Category) -> ServiceResult<Category> {
        Ok(resource)
    }

    async fn update(&self, resource: Category) -> ServiceResult<Category> {
        Ok(resource)
    }
}

/// Unique application home for CLI and config tests.
pub fn temp_home() -> TempDir {
    TempDir::new().expect("create temp dir")
}
