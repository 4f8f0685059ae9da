//! Transactional persistence gateway for document aggregates.

use std::future::Future;

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::document::model::DocumentAggregate;
use crate::error::CoreError;

/// Persistence seam for the create-document coordinator. The production
/// implementation is [`PgDocumentStore`]; tests substitute stubs.
pub trait DocumentStore: Send + Sync {
    /// Persist the aggregate atomically and return it with all
    /// server-assigned ids and timestamps populated.
    fn save(
        &self,
        aggregate: DocumentAggregate,
    ) -> impl Future<Output = Result<DocumentAggregate, CoreError>> + Send;
}

/// Postgres-backed store. One transaction per `save`: the document insert,
/// its description link, and all product links commit together or not at all.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DocumentStore for PgDocumentStore {
    async fn save(&self, mut aggregate: DocumentAggregate) -> Result<DocumentAggregate, CoreError> {
        let mut tx = self.pool.begin().await.map_err(CoreError::from_sqlx)?;

        // Document first, so its identity is available to the links. Absent
        // creation timestamps resolve to the transaction clock.
        let row = sqlx::query(
            r#"
            INSERT INTO document
                (status, doc_type, import_request, owner_inn, participant_inn,
                 producer_inn, production_date, production_type, reg_date, reg_number)
            VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, NOW()), $8, COALESCE($9, NOW()), $10)
            RETURNING doc_id, production_date, reg_date
            "#,
        )
        .bind(&aggregate.document.status)
        .bind(aggregate.document.doc_type.as_str())
        .bind(aggregate.document.import_request)
        .bind(&aggregate.document.owner_inn)
        .bind(&aggregate.document.participant_inn)
        .bind(&aggregate.document.producer_inn)
        .bind(aggregate.document.production_date)
        .bind(&aggregate.document.production_type)
        .bind(aggregate.document.reg_date)
        .bind(&aggregate.document.reg_number)
        .fetch_one(&mut *tx)
        .await
        .map_err(CoreError::from_sqlx)?;

        let doc_id: i64 = row.get("doc_id");
        aggregate.document.doc_id = Some(doc_id);
        aggregate.document.production_date = Some(row.get::<DateTime<Utc>, _>("production_date"));
        aggregate.document.reg_date = Some(row.get::<DateTime<Utc>, _>("reg_date"));

        // Link pre-existing rows by id. Zero rows affected means the caller
        // named a row that does not exist; dropping the open transaction on
        // the error path rolls the document insert back.
        if let Some(description_id) = aggregate.description {
            let updated = sqlx::query("UPDATE description SET doc_id = $1 WHERE id = $2")
                .bind(doc_id)
                .bind(description_id)
                .execute(&mut *tx)
                .await
                .map_err(CoreError::from_sqlx)?;
            if updated.rows_affected() == 0 {
                return Err(CoreError::MissingReference(format!(
                    "description {description_id}"
                )));
            }
        }

        for &product_id in &aggregate.products {
            let updated = sqlx::query(
                r#"
                UPDATE product
                SET doc_id = $1,
                    production_date = COALESCE(production_date, NOW()),
                    certificate_document_date = COALESCE(certificate_document_date, NOW())
                WHERE id = $2
                "#,
            )
            .bind(doc_id)
            .bind(product_id)
            .execute(&mut *tx)
            .await
            .map_err(CoreError::from_sqlx)?;
            if updated.rows_affected() == 0 {
                return Err(CoreError::MissingReference(format!("product {product_id}")));
            }
        }

        tx.commit().await.map_err(CoreError::from_sqlx)?;

        tracing::debug!(doc_id, products = aggregate.products.len(), "document saved");
        Ok(aggregate)
    }
}
