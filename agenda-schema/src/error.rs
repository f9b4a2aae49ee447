//! Error envelope returned by every failing route.
//!
//! `{ "error": { "code": "...", "message": "..." } }`

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(rename = "error")]
    pub inner: ApiErrorObject,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorObject {
    pub code: String,
    pub message: String,
}
