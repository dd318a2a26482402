//! Resource services consumed by form controllers, plus the in-memory REST
//! backend they talk to.

pub mod api;
pub mod category;
pub mod entry;
pub mod http;
pub mod seed;

pub use api::{ApiResponse, Fault, InMemoryApi, Method};
pub use category::CategoryService;
pub use entry::EntryService;
pub use http::HttpResourceService;

use async_trait::async_trait;

use crate::errors::ServiceError;

pub const CATEGORIES: &str = "categories";
pub const ENTRIES: &str = "entries";

pub type ServiceResult<T> = Result<T, ServiceError>;

/// CRUD surface of one REST collection.
#[async_trait]
pub trait ResourceService<R: Send + Sync + 'static>: Send + Sync {
    async fn get_all(&self) -> ServiceResult<Vec<R>>;

    /// `id` is the raw route token; malformed tokens fail at the backend.
    async fn get_by_id(&self, id: &str) -> ServiceResult<R>;

    /// Persists a new record and returns it with its assigned id.
    async fn create(&self, resource: R) -> ServiceResult<R>;

    async fn update(&self, resource: R) -> ServiceResult<R>;
}
