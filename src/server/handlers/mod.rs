pub mod form_submissions;
pub mod health;
pub mod salesforce_forms;

use serde::{Deserialize, Serialize};

/// Standard response envelope: `{ "data": ..., "meta": { "total" }? }`.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

#[derive(Serialize)]
pub struct Meta {
    pub total: u64,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data, meta: None }
    }

    pub fn with_total(data: T, total: u64) -> Self {
        Self {
            data,
            meta: Some(Meta { total }),
        }
    }
}

/// Write bodies arrive wrapped as `{ "data": { ... } }` (host convention).
#[derive(Deserialize)]
pub struct DataBody<T> {
    pub data: T,
}

/// `?locale=` query filter shared by the form endpoints.
#[derive(Deserialize)]
pub struct LocaleQuery {
    pub locale: Option<String>,
}
