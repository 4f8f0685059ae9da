use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document kind. The intake flow handles a single kind today; the enum keeps
/// the wire contract closed so unknown kinds fail at the JSON decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    #[serde(rename = "LP_INTRODUCE_GOODS")]
    LpIntroduceGoods,
}

impl DocumentType {
    /// Column value in the `document` table.
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::LpIntroduceGoods => "LP_INTRODUCE_GOODS",
        }
    }
}

/// Scalar fields of a `document` row. `doc_id` is `None` until the row has
/// been persisted; `production_date` and `reg_date` stay unset until the
/// store fills them with the transaction clock.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub doc_id: Option<i64>,
    pub status: String,
    pub doc_type: DocumentType,
    pub import_request: bool,
    pub owner_inn: String,
    pub participant_inn: String,
    pub producer_inn: String,
    pub production_date: Option<DateTime<Utc>>,
    pub production_type: String,
    pub reg_date: Option<DateTime<Utc>>,
    pub reg_number: String,
}

/// The transactional unit: a document plus the ids of the pre-existing
/// `description` and `product` rows it links to. The intake flow never
/// creates those rows, it only attaches them by foreign key.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentAggregate {
    pub document: Document,
    pub description: Option<i64>,
    pub products: Vec<i64>,
}
