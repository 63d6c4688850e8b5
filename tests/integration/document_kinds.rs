use service_catalog::accessor::{encode_catalog, CATALOG_DOCUMENT_KIND};
use service_catalog::agent::AgentIdentity;
use service_catalog::document::{Document, DocumentStore, Envelope, FetchOutcome};
use service_catalog::types::SERVICE_CATALOG_DOCUMENT_KEY;
use service_catalog::{ApiError, CatalogEntry, CatalogStore};

use crate::integration::support::{for_each_backend, writer_service};

fn seed(documents: &dyn DocumentStore, payload: Vec<u8>) {
    documents
        .store(
            &Document::unstored(SERVICE_CATALOG_DOCUMENT_KEY, payload),
            &AgentIdentity::writer("seeder"),
        )
        .unwrap();
}

fn stored_payload(documents: &dyn DocumentStore) -> Vec<u8> {
    match documents
        .fetch(SERVICE_CATALOG_DOCUMENT_KEY, &AgentIdentity::reader("probe"))
        .unwrap()
    {
        FetchOutcome::Found(document) => document.payload().to_vec(),
        FetchOutcome::NotFound => panic!("catalog document missing"),
    }
}

#[test]
fn foreign_document_kind_is_type_mismatch() {
    for_each_backend(|documents| {
        let foreign = Envelope::new("feature-flags", "{}".to_string())
            .to_bytes()
            .unwrap();
        seed(documents.as_ref(), foreign.clone());

        let service = writer_service(documents.clone());
        assert!(matches!(
            service.list_catalog(),
            Err(ApiError::TypeMismatch { .. })
        ));
        assert!(matches!(
            service.upsert_entry("svc", "1", "", "", ""),
            Err(ApiError::TypeMismatch { .. })
        ));
        assert_eq!(stored_payload(documents.as_ref()), foreign);
    });
}

#[test]
fn garbage_payload_is_decode_error() {
    for_each_backend(|documents| {
        seed(documents.as_ref(), b"\x00\x01not json".to_vec());

        let service = writer_service(documents);
        assert!(matches!(
            service.catalog_as_record_map(),
            Err(ApiError::DecodeError(_))
        ));
    });
}

#[test]
fn catalog_envelope_with_unreadable_content_is_decode_error() {
    for_each_backend(|documents| {
        let envelope = Envelope::new(CATALOG_DOCUMENT_KIND, "{}".to_string())
            .to_bytes()
            .unwrap();
        seed(documents.as_ref(), envelope);

        let service = writer_service(documents);
        assert!(matches!(
            service.list_catalog(),
            Err(ApiError::DecodeError(_))
        ));
        assert!(matches!(
            service.delete_entry("svc"),
            Err(ApiError::DecodeError(_))
        ));
    });
}

#[test]
fn catalog_written_elsewhere_is_readable() {
    for_each_backend(|documents| {
        let mut catalog = CatalogStore::new();
        catalog.upsert(
            CatalogEntry::new(Some("external"), Some("3"), None, None, None).unwrap(),
        );
        seed(documents.as_ref(), encode_catalog(&catalog).unwrap());

        let service = writer_service(documents);
        let entry = service.get_entry("external").unwrap().unwrap();
        assert_eq!(entry.version(), "3");
    });
}
