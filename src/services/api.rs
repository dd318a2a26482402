//! In-memory REST backend.
//!
//! Stores JSON records per collection under `api/<collection>` and answers
//! the small set of requests the resource services issue. Records that fail
//! server-side checks are rejected with `422` and a `{"errors": [...]}` body.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::currency;
use crate::domain::EntryType;
use crate::errors::ServiceError;
use crate::services::{seed, CATEGORIES, ENTRIES};

const API_PREFIX: &str = "api";
const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<String>,
}

impl ApiResponse {
    fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            body: Some(body.to_string()),
        }
    }

    fn empty(status: u16) -> Self {
        Self { status, body: None }
    }

    fn not_found(message: String) -> Self {
        Self::json(404, &json!({ "error": message }))
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure injected ahead of the next request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// Answer with this status and body instead of handling the request.
    Status { status: u16, body: Option<String> },
    /// Drop the request without a response.
    Disconnect,
}

type Collections = BTreeMap<String, Vec<Value>>;

pub struct InMemoryApi {
    collections: Mutex<Collections>,
    faults: Mutex<VecDeque<(Option<Method>, Fault)>>,
    delay: Duration,
}

impl InMemoryApi {
    /// Backend with no collections.
    pub fn empty() -> Self {
        Self {
            collections: Mutex::new(Collections::new()),
            faults: Mutex::new(VecDeque::new()),
            delay: Duration::ZERO,
        }
    }

    /// Backend holding the sample categories and entries.
    pub fn seeded() -> Self {
        let api = Self::empty();
        {
            let mut collections = api.collections();
            collections.insert(CATEGORIES.to_string(), to_values(seed::categories()));
            collections.insert(ENTRIES.to_string(), to_values(seed::entries()));
        }
        api
    }

    /// Simulated network latency applied to every request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fails the next request, whatever its method.
    pub fn inject_fault(&self, fault: Fault) {
        self.queue_fault(None, fault);
    }

    /// Fails the next request made with `method`; requests with other
    /// methods pass through untouched.
    pub fn inject_fault_on(&self, method: Method, fault: Fault) {
        self.queue_fault(Some(method), fault);
    }

    fn queue_fault(&self, target: Option<Method>, fault: Fault) {
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back((target, fault));
    }

    fn take_fault(&self, method: Method) -> Option<Fault> {
        let mut faults = self.faults.lock().unwrap_or_else(PoisonError::into_inner);
        let index = faults
            .iter()
            .position(|(target, _)| target.map_or(true, |target| target == method))?;
        faults.remove(index).map(|(_, fault)| fault)
    }

    /// Number of records currently stored in `collection`.
    pub fn count(&self, collection: &str) -> usize {
        self.collections().get(collection).map_or(0, Vec::len)
    }

    pub async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse, ServiceError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.take_fault(method) {
            Some(Fault::Status { status, body }) => {
                tracing::debug!(?method, url, status, "injected fault");
                return Ok(ApiResponse { status, body });
            }
            Some(Fault::Disconnect) => {
                return Err(ServiceError::Transport(format!("connection to {url} lost")));
            }
            None => {}
        }

        let response = self.handle(method, url, body);
        tracing::debug!(?method, url, status = response.status, "api request handled");
        Ok(response)
    }

    fn collections(&self) -> MutexGuard<'_, Collections> {
        self.collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn handle(&self, method: Method, url: &str, body: Option<Value>) -> ApiResponse {
        let Some((collection, id)) = parse_url(url) else {
            return ApiResponse::not_found(format!("No route for {url}"));
        };
        let mut collections = self.collections();
        if !collections.contains_key(collection) {
            return ApiResponse::not_found(format!("Collection '{collection}' not found"));
        }

        match (method, id) {
            (Method::Get, None) => {
                let records = collections.get(collection).cloned().unwrap_or_default();
                ApiResponse::json(200, &Value::Array(records))
            }
            (Method::Get, Some(token)) => match find(&collections, collection, token) {
                Some(record) => ApiResponse::json(200, record),
                None => ApiResponse::not_found(format!(
                    "'{collection}' with id='{token}' not found"
                )),
            },
            (Method::Post, None) => {
                let Some(record) = body.filter(Value::is_object) else {
                    return ApiResponse::json(400, &json!({ "error": "Body must be an object" }));
                };
                insert(&mut collections, collection, record)
            }
            (Method::Put, Some(token)) => {
                let Some(record) = body.filter(Value::is_object) else {
                    return ApiResponse::json(400, &json!({ "error": "Body must be an object" }));
                };
                match token.parse::<i64>() {
                    Ok(id) => upsert(&mut collections, collection, id, record),
                    Err(_) => ApiResponse::not_found(format!(
                        "'{collection}' with id='{token}' not found"
                    )),
                }
            }
            (Method::Post, Some(_)) | (Method::Put, None) => {
                ApiResponse::json(405, &json!({ "error": "Method not allowed" }))
            }
        }
    }
}

impl Default for InMemoryApi {
    fn default() -> Self {
        Self::seeded()
    }
}

fn to_values<T: serde::Serialize>(records: Vec<T>) -> Vec<Value> {
    records
        .into_iter()
        .filter_map(|record| serde_json::to_value(record).ok())
        .collect()
}

/// Splits `api/<collection>[/<id>]`.
fn parse_url(url: &str) -> Option<(&str, Option<&str>)> {
    let mut parts = url.trim_matches('/').split('/');
    if parts.next()? != API_PREFIX {
        return None;
    }
    let collection = parts.next().filter(|part| !part.is_empty())?;
    let id = parts.next().filter(|part| !part.is_empty());
    if parts.next().is_some() {
        return None;
    }
    Some((collection, id))
}

fn record_id(record: &Value) -> Option<i64> {
    record.get("id").and_then(Value::as_i64)
}

fn find<'a>(collections: &'a Collections, collection: &str, token: &str) -> Option<&'a Value> {
    let id = token.parse::<i64>().ok()?;
    collections
        .get(collection)?
        .iter()
        .find(|record| record_id(record) == Some(id))
}

fn insert(collections: &mut Collections, collection: &str, mut record: Value) -> ApiResponse {
    let errors = validate(collections, collection, &record);
    if !errors.is_empty() {
        return ApiResponse::json(422, &json!({ "errors": errors }));
    }

    let records = collections.entry(collection.to_string()).or_default();
    let id = match record_id(&record) {
        Some(id) if records.iter().any(|existing| record_id(existing) == Some(id)) => {
            return ApiResponse::json(
                409,
                &json!({ "error": format!("'{collection}' item with id='{id}' exists") }),
            );
        }
        Some(id) => id,
        None => records.iter().filter_map(record_id).max().unwrap_or(0) + 1,
    };
    record["id"] = Value::from(id);
    records.push(record.clone());
    ApiResponse::json(201, &record)
}

fn upsert(collections: &mut Collections, collection: &str, id: i64, mut record: Value) -> ApiResponse {
    record["id"] = Value::from(id);
    let errors = validate(collections, collection, &record);
    if !errors.is_empty() {
        return ApiResponse::json(422, &json!({ "errors": errors }));
    }

    let records = collections.entry(collection.to_string()).or_default();
    match records.iter_mut().find(|existing| record_id(existing) == Some(id)) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
    ApiResponse::empty(204)
}

fn validate(collections: &Collections, collection: &str, record: &Value) -> Vec<String> {
    match collection {
        CATEGORIES => validate_category(record),
        ENTRIES => validate_entry(collections, record),
        _ => Vec::new(),
    }
}

fn text<'a>(record: &'a Value, key: &str) -> &'a str {
    record.get(key).and_then(Value::as_str).unwrap_or("").trim()
}

fn validate_category(record: &Value) -> Vec<String> {
    let mut errors = Vec::new();
    if text(record, "name").is_empty() {
        errors.push("name is required".to_string());
    }
    errors
}

fn validate_entry(collections: &Collections, record: &Value) -> Vec<String> {
    let mut errors = Vec::new();
    if text(record, "name").is_empty() {
        errors.push("name is required".to_string());
    }
    if EntryType::parse(text(record, "type")).is_none() {
        errors.push("type must be expense or revenue".to_string());
    }
    if currency::parse_amount(text(record, "amount")).is_err() {
        errors.push("amount must be a valid decimal".to_string());
    }
    if NaiveDate::parse_from_str(text(record, "date"), DATE_FORMAT).is_err() {
        errors.push("date must use dd/mm/yyyy".to_string());
    }
    if !record.get("paid").is_some_and(Value::is_boolean) {
        errors.push("paid is required".to_string());
    }
    let category_exists = record
        .get("categoryId")
        .and_then(Value::as_i64)
        .and_then(|id| find(collections, CATEGORIES, &id.to_string()))
        .is_some();
    if !category_exists {
        errors.push("categoryId must reference an existing category".to_string());
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(response: &ApiResponse) -> Value {
        serde_json::from_str(response.body.as_deref().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn lists_seeded_collections() {
        let api = InMemoryApi::seeded();
        let response = api.request(Method::Get, "api/categories", None).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(body(&response).as_array().map(Vec::len), Some(5));
        assert_eq!(api.count(ENTRIES), 5);
    }

    #[tokio::test]
    async fn unknown_or_malformed_ids_are_not_found() {
        let api = InMemoryApi::seeded();
        for url in ["api/entries/99", "api/entries/abc", "api/budgets/1"] {
            let response = api.request(Method::Get, url, None).await.unwrap();
            assert_eq!(response.status, 404, "{url}");
        }
    }

    #[tokio::test]
    async fn post_assigns_the_next_id() {
        let api = InMemoryApi::seeded();
        let response = api
            .request(
                Method::Post,
                "api/categories",
                Some(json!({ "name": "Educação" })),
            )
            .await
            .unwrap();
        assert_eq!(response.status, 201);
        assert_eq!(body(&response)["id"], json!(6));
        assert_eq!(api.count(CATEGORIES), 6);
    }

    #[tokio::test]
    async fn invalid_entry_is_rejected_with_error_list() {
        let api = InMemoryApi::seeded();
        let response = api
            .request(
                Method::Post,
                "api/entries",
                Some(json!({
                    "name": "Cinema",
                    "type": "expense",
                    "amount": "12,5x",
                    "date": "2018-10-20",
                    "paid": true,
                    "categoryId": 42
                })),
            )
            .await
            .unwrap();
        assert_eq!(response.status, 422);
        assert_eq!(
            body(&response),
            json!({
                "errors": [
                    "amount must be a valid decimal",
                    "date must use dd/mm/yyyy",
                    "categoryId must reference an existing category"
                ]
            })
        );
        assert_eq!(api.count(ENTRIES), 5);
    }

    #[tokio::test]
    async fn put_replaces_the_record() {
        let api = InMemoryApi::seeded();
        let response = api
            .request(
                Method::Put,
                "api/categories/3",
                Some(json!({ "name": "Diversão" })),
            )
            .await
            .unwrap();
        assert_eq!(response, ApiResponse::empty(204));

        let fetched = api.request(Method::Get, "api/categories/3", None).await.unwrap();
        assert_eq!(body(&fetched), json!({ "id": 3, "name": "Diversão" }));
    }

    #[tokio::test]
    async fn injected_faults_apply_once() {
        let api = InMemoryApi::seeded();
        api.inject_fault(Fault::Status {
            status: 500,
            body: None,
        });
        api.inject_fault(Fault::Disconnect);

        let first = api.request(Method::Get, "api/categories", None).await.unwrap();
        assert_eq!(first.status, 500);
        let second = api.request(Method::Get, "api/categories", None).await;
        assert!(matches!(second, Err(ServiceError::Transport(_))));
        let third = api.request(Method::Get, "api/categories", None).await.unwrap();
        assert!(third.is_success());
    }

    #[tokio::test]
    async fn targeted_faults_skip_other_methods() {
        let api = InMemoryApi::seeded();
        api.inject_fault_on(
            Method::Post,
            Fault::Status {
                status: 500,
                body: None,
            },
        );

        let lookup = api.request(Method::Get, "api/categories/1", None).await.unwrap();
        assert_eq!(lookup.status, 200);
        let created = api
            .request(Method::Post, "api/categories", Some(json!({ "name": "Educação" })))
            .await
            .unwrap();
        assert_eq!(created.status, 500);
        assert_eq!(api.count(CATEGORIES), 5);
    }
}
