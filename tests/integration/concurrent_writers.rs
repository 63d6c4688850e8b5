use std::sync::{Arc, Barrier};
use std::thread;

use service_catalog::agent::AgentIdentity;
use service_catalog::document::DocumentStore;
use service_catalog::{ApiError, CatalogEntry, PublishOutcome, SharedDocumentAccessor};

use crate::integration::support::{for_each_backend, writer_service, SERVICE_AGENT};

fn entry(name: &str) -> CatalogEntry {
    CatalogEntry::new(Some(name), Some("1"), None, None, None).unwrap()
}

fn accessor(documents: Arc<dyn DocumentStore>) -> SharedDocumentAccessor {
    SharedDocumentAccessor::new(documents, AgentIdentity::writer(SERVICE_AGENT))
}

#[test]
fn interleaved_writers_one_conflicts() {
    for_each_backend(|documents| {
        let first = accessor(documents.clone());
        let second = accessor(documents.clone());

        let mut a = first.checkout().unwrap();
        let mut b = second.checkout().unwrap();
        a.catalog_mut().upsert(entry("A"));
        b.catalog_mut().upsert(entry("B"));

        assert_eq!(first.publish(a).unwrap(), PublishOutcome::Created);
        assert!(matches!(
            second.publish(b),
            Err(ApiError::Conflict { .. })
        ));

        let records = writer_service(documents).catalog_as_record_map().unwrap();
        assert_eq!(records.keys().collect::<Vec<_>>(), vec!["A"]);
    });
}

#[test]
fn racing_threads_never_lose_a_reported_write() {
    for_each_backend(|documents| {
        const WRITERS: usize = 8;
        let barrier = Arc::new(Barrier::new(WRITERS));

        let handles: Vec<_> = (0..WRITERS)
            .map(|i| {
                let documents = documents.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    let service = writer_service(documents);
                    barrier.wait();
                    let name = format!("svc-{}", i);
                    (name.clone(), service.upsert_entry(&name, "1", "", "", ""))
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let records = writer_service(documents).catalog_as_record_map().unwrap();

        for (name, result) in &results {
            match result {
                Ok(_) => assert!(records.contains_key(name), "{} was reported but lost", name),
                Err(err) => assert!(err.is_retryable(), "unexpected error {:?}", err),
            }
        }
        assert!(results.iter().any(|(_, result)| result.is_ok()));
    });
}

#[test]
fn retrying_upsert_lands_every_write() {
    for_each_backend(|documents| {
        const WRITERS: usize = 4;
        let barrier = Arc::new(Barrier::new(WRITERS));

        let handles: Vec<_> = (0..WRITERS)
            .map(|i| {
                let documents = documents.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    let service = writer_service(documents);
                    barrier.wait();
                    service.upsert_entry_with_retry(&entry(&format!("svc-{}", i)), 64)
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap().unwrap();
        }
        let records = writer_service(documents).catalog_as_record_map().unwrap();
        assert_eq!(records.len(), WRITERS);
    });
}
