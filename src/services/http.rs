//! JSON-over-"HTTP" adapter from a REST collection to [`ResourceService`].

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::domain::Identifiable;
use crate::errors::ServiceError;
use crate::services::api::{ApiResponse, InMemoryApi, Method};
use crate::services::{ResourceService, ServiceResult};

/// Talks to `api/<collection>` on an [`InMemoryApi`].
pub struct HttpResourceService<R> {
    api: Arc<InMemoryApi>,
    collection: &'static str,
    _resource: PhantomData<fn() -> R>,
}

impl<R> HttpResourceService<R> {
    pub fn new(api: Arc<InMemoryApi>, collection: &'static str) -> Self {
        Self {
            api,
            collection,
            _resource: PhantomData,
        }
    }

    pub fn collection(&self) -> &'static str {
        self.collection
    }

    fn collection_url(&self) -> String {
        format!("api/{}", self.collection)
    }

    fn item_url(&self, id: &str) -> String {
        format!("api/{}/{}", self.collection, id)
    }
}

impl<R> Clone for HttpResourceService<R> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.api), self.collection)
    }
}

/// Turns non-2xx responses into [`ServiceError::Http`].
fn ensure_success(response: ApiResponse) -> ServiceResult<ApiResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ServiceError::Http {
            status: response.status,
            body: response.body,
        })
    }
}

fn decode<T: DeserializeOwned>(response: &ApiResponse) -> ServiceResult<T> {
    let body = response.body.as_deref().unwrap_or("null");
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl<R> ResourceService<R> for HttpResourceService<R>
where
    R: Serialize + DeserializeOwned + Identifiable + Send + Sync + 'static,
{
    async fn get_all(&self) -> ServiceResult<Vec<R>> {
        let response = self
            .api
            .request(Method::Get, &self.collection_url(), None)
            .await?;
        decode(&ensure_success(response)?)
    }

    async fn get_by_id(&self, id: &str) -> ServiceResult<R> {
        tracing::debug!(collection = self.collection, id, "fetching record");
        let response = self
            .api
            .request(Method::Get, &self.item_url(id), None)
            .await?;
        decode(&ensure_success(response)?)
    }

    async fn create(&self, resource: R) -> ServiceResult<R> {
        let body = serde_json::to_value(&resource)?;
        let response = self
            .api
            .request(Method::Post, &self.collection_url(), Some(body))
            .await?;
        decode(&ensure_success(response)?)
    }

    async fn update(&self, resource: R) -> ServiceResult<R> {
        let id = resource.id().map(|id| id.to_string()).unwrap_or_default();
        let body = serde_json::to_value(&resource)?;
        let response = self
            .api
            .request(Method::Put, &self.item_url(&id), Some(body))
            .await?;
        ensure_success(response)?;
        // The backend answers 204 without a body.
        Ok(resource)
    }
}
