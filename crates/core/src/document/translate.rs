//! DTO ⇄ aggregate projection.
//!
//! Scalar fields copy one-for-one. The DTO's `description` and `products`
//! arrays are foreign-key ids: they are attached as references without
//! fetching the rows, the store verifies they exist at save time.

use super::dto::DocumentDto;
use super::model::{Document, DocumentAggregate};

pub fn to_aggregate(dto: &DocumentDto) -> DocumentAggregate {
    DocumentAggregate {
        document: Document {
            doc_id: dto.doc_id,
            status: dto.status.clone(),
            doc_type: dto.doc_type,
            import_request: dto.import_request,
            owner_inn: dto.owner_inn.clone(),
            participant_inn: dto.participant_inn.clone(),
            producer_inn: dto.producer_inn.clone(),
            production_date: dto.production_date,
            production_type: dto.production_type.clone(),
            reg_date: dto.reg_date,
            reg_number: dto.reg_number.clone(),
        },
        description: dto.description.first().copied(),
        products: dto.products.clone(),
    }
}

pub fn to_dto(aggregate: &DocumentAggregate) -> DocumentDto {
    let doc = &aggregate.document;
    DocumentDto {
        doc_id: doc.doc_id,
        status: doc.status.clone(),
        doc_type: doc.doc_type,
        import_request: doc.import_request,
        owner_inn: doc.owner_inn.clone(),
        participant_inn: doc.participant_inn.clone(),
        producer_inn: doc.producer_inn.clone(),
        production_date: doc.production_date,
        production_type: doc.production_type.clone(),
        reg_date: doc.reg_date,
        reg_number: doc.reg_number.clone(),
        description: aggregate.description.into_iter().collect(),
        products: aggregate.products.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::model::DocumentType;
    use chrono::{TimeZone, Utc};

    fn sample_dto() -> DocumentDto {
        DocumentDto {
            doc_id: None,
            status: "NEW".into(),
            doc_type: DocumentType::LpIntroduceGoods,
            import_request: true,
            owner_inn: "111".into(),
            participant_inn: "222".into(),
            producer_inn: "333".into(),
            production_date: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
            production_type: "OWN".into(),
            reg_date: None,
            reg_number: "R-42".into(),
            description: vec![5],
            products: vec![10, 11, 12],
        }
    }

    #[test]
    fn round_trip_is_identity() {
        let dto = sample_dto();
        assert_eq!(to_dto(&to_aggregate(&dto)), dto);
    }

    #[test]
    fn id_arrays_become_references() {
        let aggregate = to_aggregate(&sample_dto());
        assert_eq!(aggregate.description, Some(5));
        assert_eq!(aggregate.products, vec![10, 11, 12]);
    }

    #[test]
    fn empty_description_array_maps_to_none_and_back() {
        let mut dto = sample_dto();
        dto.description = vec![];
        let aggregate = to_aggregate(&dto);
        assert_eq!(aggregate.description, None);
        assert!(to_dto(&aggregate).description.is_empty());
    }

    #[test]
    fn product_order_is_preserved() {
        let aggregate = to_aggregate(&sample_dto());
        assert_eq!(to_dto(&aggregate).products, vec![10, 11, 12]);
    }
}
