use std::collections::BTreeMap;

use service_catalog::agent::AgentIdentity;
use service_catalog::{ApiError, CatalogService, PublishOutcome, SharedDocumentAccessor};

use crate::integration::support::{for_each_backend, memory_store, writer_service};

fn record(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn upsert_then_record_map_has_exact_fields() {
    for_each_backend(|documents| {
        let service = writer_service(documents);
        service
            .upsert_entry(
                "TestService",
                "0.5",
                "http://github.com/",
                "http://google.com/",
                "This is a very good service!",
            )
            .unwrap();

        let records = service.catalog_as_record_map().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records["TestService"],
            record(&[
                ("name", "TestService"),
                ("version", "0.5"),
                ("github", "http://github.com/"),
                ("frontend", "http://google.com/"),
                ("description", "This is a very good service!"),
            ])
        );
    });
}

#[test]
fn second_upsert_replaces_first() {
    for_each_backend(|documents| {
        let service = writer_service(documents);
        assert_eq!(
            service.upsert_entry("svc", "1", "", "", "old").unwrap(),
            PublishOutcome::Created
        );
        assert_eq!(
            service.upsert_entry("svc", "2", "", "", "new").unwrap(),
            PublishOutcome::Replaced
        );

        let records = service.catalog_as_record_map().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records["svc"]["version"], "2");
        assert_eq!(records["svc"]["description"], "new");
    });
}

#[test]
fn delete_removes_entry_and_ignores_missing_names() {
    for_each_backend(|documents| {
        let service = writer_service(documents);
        service.upsert_entry("keep", "1", "", "", "").unwrap();
        service.upsert_entry("drop", "1", "", "", "").unwrap();

        service.delete_entry("drop").unwrap();
        service.delete_entry("never-existed").unwrap();

        let records = service.catalog_as_record_map().unwrap();
        assert_eq!(records.keys().collect::<Vec<_>>(), vec!["keep"]);
    });
}

#[test]
fn empty_catalog_lists_as_empty_array() {
    for_each_backend(|documents| {
        let service = writer_service(documents);
        assert_eq!(service.list_catalog().unwrap(), "[]");
        assert!(service.catalog_as_record_map().unwrap().is_empty());
    });
}

#[test]
fn names_and_fields_are_trimmed() {
    for_each_backend(|documents| {
        let service = writer_service(documents);
        service
            .upsert_entry(" Foo ", " 1.0 ", "  ", "", " desc ")
            .unwrap();

        let entry = service.get_entry("Foo").unwrap().unwrap();
        assert_eq!(entry.name(), "Foo");
        assert_eq!(entry.version(), "1.0");
        assert_eq!(entry.github(), "");
        assert_eq!(entry.description(), "desc");

        service.delete_entry("  Foo").unwrap();
        assert!(service.get_entry("Foo").unwrap().is_none());
    });
}

#[test]
fn listing_round_trips_through_json() {
    let service = writer_service(memory_store());
    service.upsert_entry("a", "1", "gh", "fe", "first").unwrap();
    service.upsert_entry("b", "2", "", "", "second").unwrap();

    let listing: serde_json::Value =
        serde_json::from_str(&service.list_catalog().unwrap()).unwrap();
    let mut names: Vec<&str> = listing
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["name"].as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn blank_name_is_rejected_before_any_store_call() {
    let documents = memory_store();
    let service = writer_service(documents.clone());
    documents.set_offline(true);

    assert!(matches!(
        service.upsert_entry("   ", "1", "", "", ""),
        Err(ApiError::InvalidEntry(_))
    ));
}

#[test]
fn reader_can_list_but_not_mutate() {
    let documents = memory_store();
    writer_service(documents.clone())
        .upsert_entry("svc", "1", "", "", "")
        .unwrap();

    let reader = CatalogService::new(SharedDocumentAccessor::new(
        documents,
        AgentIdentity::reader("dashboard"),
    ));
    assert_eq!(reader.catalog_as_record_map().unwrap().len(), 1);
    assert!(matches!(
        reader.upsert_entry("other", "1", "", "", ""),
        Err(ApiError::AccessDenied(_))
    ));
    assert!(matches!(
        reader.delete_entry("svc"),
        Err(ApiError::AccessDenied(_))
    ));
}

#[test]
fn unavailable_store_surfaces_on_every_operation() {
    let documents = memory_store();
    let service = writer_service(documents.clone());
    documents.set_offline(true);

    assert!(service.list_catalog().unwrap_err().is_unavailable());
    assert!(service
        .upsert_entry("svc", "1", "", "", "")
        .unwrap_err()
        .is_unavailable());
    assert!(service.delete_entry("svc").unwrap_err().is_unavailable());
}
