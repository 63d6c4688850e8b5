//! Integration tests for the service catalog

mod catalog_scenarios;
mod cli_contracts;
mod concurrent_writers;
mod document_kinds;
mod support;
