//! Input validation for the create-document payload.

use thiserror::Error;

use super::dto::DocumentDto;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("doc_id must be absent on input, the server assigns it")]
    DocIdPresent,
    #[error("participant_inn cannot be empty")]
    EmptyParticipantInn,
    #[error("owner_inn cannot be empty")]
    EmptyOwnerInn,
    #[error("producer_inn cannot be empty")]
    EmptyProducerInn,
    #[error("a document links at most one description, got {0}")]
    MultipleDescriptions(usize),
}

/// Check the DTO before it reaches admission or persistence.
pub fn validate(dto: &DocumentDto) -> Result<(), ValidationError> {
    if dto.doc_id.is_some() {
        return Err(ValidationError::DocIdPresent);
    }
    if dto.participant_inn.trim().is_empty() {
        return Err(ValidationError::EmptyParticipantInn);
    }
    if dto.owner_inn.trim().is_empty() {
        return Err(ValidationError::EmptyOwnerInn);
    }
    if dto.producer_inn.trim().is_empty() {
        return Err(ValidationError::EmptyProducerInn);
    }
    if dto.description.len() > 1 {
        return Err(ValidationError::MultipleDescriptions(dto.description.len()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::model::DocumentType;

    fn valid_dto() -> DocumentDto {
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

    #[test]
    fn accepts_valid_dto() {
        assert_eq!(validate(&valid_dto()), Ok(()));
    }

    #[test]
    fn rejects_client_supplied_doc_id() {
        let mut dto = valid_dto();
        dto.doc_id = Some(42);
        assert_eq!(validate(&dto), Err(ValidationError::DocIdPresent));
    }

    #[test]
    fn rejects_blank_inn_fields() {
        let mut dto = valid_dto();
        dto.participant_inn = "   ".into();
        assert_eq!(validate(&dto), Err(ValidationError::EmptyParticipantInn));

        let mut dto = valid_dto();
        dto.owner_inn = String::new();
        assert_eq!(validate(&dto), Err(ValidationError::EmptyOwnerInn));
    }

    #[test]
    fn rejects_more_than_one_description_id() {
        let mut dto = valid_dto();
        dto.description = vec![1, 2];
        assert_eq!(validate(&dto), Err(ValidationError::MultipleDescriptions(2)));
    }
}
