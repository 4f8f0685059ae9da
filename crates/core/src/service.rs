//! Create-document coordinator: admission gate, translation, and
//! transactional save composed into one operation.

use std::time::Duration;

use crate::document::dto::DocumentDto;
use crate::document::{translate, validate};
use crate::error::CoreError;
use crate::limiter::AdmissionLimiter;
use crate::store::DocumentStore;

/// Initial attempt plus nine retries.
const MAX_ATTEMPTS: u32 = 10;
/// Fixed delay between attempts. Deliberately short: the loop absorbs
/// micro-bursts, sustained overload still surfaces as rejection.
const BACKOFF: Duration = Duration::from_millis(5);

/// Request flow: validate, then loop on the admission gate with bounded
/// backoff; once admitted, translate → save in one transaction → translate
/// back. Only admission denial is retried here; every store error propagates
/// as-is.
pub struct DocumentService<S> {
    limiter: AdmissionLimiter,
    store: S,
}

impl<S: DocumentStore> DocumentService<S> {
    pub fn new(limiter: AdmissionLimiter, store: S) -> Self {
        Self { limiter, store }
    }

    /// The process-wide limiter instance, shared by every request through
    /// this service.
    pub fn limiter(&self) -> &AdmissionLimiter {
        &self.limiter
    }

    pub async fn create_document(&self, dto: DocumentDto) -> Result<DocumentDto, CoreError> {
        validate::validate(&dto).map_err(|e| CoreError::Validation(e.to_string()))?;

        for attempt in 1..=MAX_ATTEMPTS {
            if self.limiter.try_admit() {
                let aggregate = translate::to_aggregate(&dto);
                let saved = self.store.save(aggregate).await?;
                return Ok(translate::to_dto(&saved));
            }
            if attempt < MAX_ATTEMPTS {
                tracing::debug!(attempt, "admission denied, backing off");
                // Cancel-safe: dropping the request mid-sleep abandons the
                // remaining retries.
                tokio::time::sleep(BACKOFF).await;
            }
        }

        tracing::warn!(
            attempts = MAX_ATTEMPTS,
            unit = %self.limiter.config().time_unit,
            "admission rejected, retry budget exhausted"
        );
        Err(CoreError::AdmissionRejected {
            attempts: MAX_ATTEMPTS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::model::{DocumentAggregate, DocumentType};
    use crate::limiter::{LimiterConfig, TimeUnit};
    use std::sync::atomic::{AtomicU32, Ordering};

    struct StubStore {
        calls: AtomicU32,
    }

    impl StubStore {
        fn new() -> Self {
            Self {
                calls: AtomicU32::new(0),
            }
        }
    }

    impl DocumentStore for StubStore {
        async fn save(
            &self,
            mut aggregate: DocumentAggregate,
        ) -> Result<DocumentAggregate, CoreError> {
            let id = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            aggregate.document.doc_id = Some(i64::from(id));
            aggregate.document.production_date.get_or_insert_with(chrono::Utc::now);
            aggregate.document.reg_date.get_or_insert_with(chrono::Utc::now);
            Ok(aggregate)
        }
    }

    struct FailingStore {
        calls: AtomicU32,
    }

    impl DocumentStore for FailingStore {
        async fn save(&self, _: DocumentAggregate) -> Result<DocumentAggregate, CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(CoreError::Transient(sqlx::Error::PoolTimedOut))
        }
    }

    fn generous_limiter() -> AdmissionLimiter {
        AdmissionLimiter::new(LimiterConfig {
            request_limit: 1_000_000,
            warmup_period: 0,
            time_unit: TimeUnit::Seconds,
        })
        .unwrap()
    }

    fn saturated_limiter() -> AdmissionLimiter {
        // One permit per 30 minutes; consuming the initial permit leaves the
        // limiter dry for the rest of the test.
        let limiter = AdmissionLimiter::new(LimiterConfig {
            request_limit: 2,
            warmup_period: 0,
            time_unit: TimeUnit::Hours,
        })
        .unwrap();
        assert!(limiter.try_admit());
        limiter
    }

    fn sample_dto() -> DocumentDto {
        DocumentDto {
            doc_id: None,
            status: "NEW".into(),
            doc_type: DocumentType::LpIntroduceGoods,
            import_request: false,
            owner_inn: "123".into(),
            participant_inn: "456".into(),
            producer_inn: "789".into(),
            production_date: None,
            production_type: "X".into(),
            reg_date: None,
            reg_number: "R1".into(),
            description: vec![],
            products: vec![],
        }
    }

    #[tokio::test]
    async fn assigns_distinct_ids_and_creation_timestamps() {
        let service = DocumentService::new(generous_limiter(), StubStore::new());

        let first = service.create_document(sample_dto()).await.unwrap();
        let second = service.create_document(sample_dto()).await.unwrap();

        assert!(first.doc_id.is_some());
        assert_ne!(first.doc_id, second.doc_id);
        assert!(first.reg_date.is_some());
        assert!(first.production_date.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_ten_attempts_with_five_ms_backoff() {
        let service = DocumentService::new(saturated_limiter(), StubStore::new());

        let started = tokio::time::Instant::now();
        let err = service.create_document(sample_dto()).await.unwrap_err();

        assert!(matches!(err, CoreError::AdmissionRejected { attempts: 10 }));
        // Nine backoff sleeps between ten attempts.
        assert_eq!(started.elapsed(), Duration::from_millis(45));
        assert_eq!(service.store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn validation_fails_before_spending_a_token() {
        let service = DocumentService::new(saturated_limiter(), StubStore::new());

        let mut dto = sample_dto();
        dto.doc_id = Some(42);
        let err = service.create_document(dto).await.unwrap_err();

        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(service.store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn store_errors_are_not_retried() {
        let service = DocumentService::new(
            generous_limiter(),
            FailingStore {
                calls: AtomicU32::new(0),
            },
        );

        let err = service.create_document(sample_dto()).await.unwrap_err();

        assert!(err.is_transient());
        assert_eq!(service.store.calls.load(Ordering::SeqCst), 1);
    }
}
