use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::DocumentType;

/// Wire shape of a document on `POST /api/v3/lk/documents/create`.
///
/// `description` and `products` carry *ids* of pre-existing rows, not nested
/// objects. `doc_id` must be absent on input and is populated on output.
/// Field names match the upstream contract: snake_case except
/// `importRequest`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<i64>,
    pub status: String,
    pub doc_type: DocumentType,
    #[serde(rename = "importRequest")]
    pub import_request: bool,
    pub owner_inn: String,
    pub participant_inn: String,
    pub producer_inn: String,
    #[serde(default)]
    pub production_date: Option<DateTime<Utc>>,
    pub production_type: String,
    #[serde(default)]
    pub reg_date: Option<DateTime<Utc>>,
    pub reg_number: String,
    #[serde(default)]
    pub description: Vec<i64>,
    #[serde(default)]
    pub products: Vec<i64>,
}
