use clap::Parser;
use service_catalog::cli::{Cli, CliContext, Commands};
use service_catalog::config::{CatalogConfig, StorageBackend};
use service_catalog::ApiError;
use tempfile::TempDir;

fn sled_config(temp_dir: &TempDir) -> CatalogConfig {
    let mut config = CatalogConfig::default();
    config.storage.backend = StorageBackend::Sled;
    config.storage.path = Some(temp_dir.path().join("store"));
    config
}

#[test]
fn sled_backend_persists_across_contexts() {
    let temp_dir = TempDir::new().unwrap();

    {
        let cli = CliContext::new(sled_config(&temp_dir)).unwrap();
        let output = cli
            .execute(&Commands::Submit {
                json: r#"{"name":"billing","version":"4.2","description":"Invoices"}"#
                    .to_string(),
            })
            .unwrap();
        assert_eq!(output, "Catalog updated.");
    }

    let cli = CliContext::new(sled_config(&temp_dir)).unwrap();
    let output = cli.execute(&Commands::Records).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["billing"]["version"], "4.2");
    assert_eq!(parsed["billing"]["github"], "");
}

#[test]
fn records_json_contract_has_every_field() {
    let cli = CliContext::new(CatalogConfig::in_memory()).unwrap();
    cli.execute(&Commands::Put {
        name: "svc".to_string(),
        version: "1".to_string(),
        github: "gh".to_string(),
        frontend: "fe".to_string(),
        description: "d".to_string(),
    })
    .unwrap();

    let output = cli.execute(&Commands::Records).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    let record = parsed["svc"].as_object().unwrap();
    let mut keys: Vec<&str> = record.keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(
        keys,
        vec!["description", "frontend", "github", "name", "version"]
    );
}

#[test]
fn skip_unchanged_writes_reported_by_delete() {
    let mut config = CatalogConfig::in_memory();
    config.catalog.skip_unchanged_writes = true;
    let cli = CliContext::new(config).unwrap();
    cli.execute(&Commands::Put {
        name: "svc".to_string(),
        version: String::new(),
        github: String::new(),
        frontend: String::new(),
        description: String::new(),
    })
    .unwrap();

    let output = cli
        .execute(&Commands::Delete {
            name: "missing".to_string(),
        })
        .unwrap();
    assert_eq!(output, "Catalog updated. (no changes)");
}

#[test]
fn default_backend_keeps_acknowledged_writes() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = CatalogConfig::default();
    config.storage.path = Some(temp_dir.path().join("store"));

    {
        let cli = CliContext::new(config.clone()).unwrap();
        cli.execute(&Commands::Put {
            name: "svc".to_string(),
            version: "1".to_string(),
            github: String::new(),
            frontend: String::new(),
            description: String::new(),
        })
        .unwrap();
    }

    let cli = CliContext::new(config).unwrap();
    let listing: serde_json::Value = serde_json::from_str(
        &cli.execute(&Commands::List {
            format: "json".to_string(),
        })
        .unwrap(),
    )
    .unwrap();
    assert_eq!(listing.as_array().unwrap().len(), 1);
    assert_eq!(listing[0]["name"], "svc");
}

#[test]
fn missing_entry_and_bad_format_have_distinct_errors() {
    let cli = CliContext::new(CatalogConfig::in_memory()).unwrap();
    assert!(matches!(
        cli.execute(&Commands::Get {
            name: "absent".to_string()
        }),
        Err(ApiError::EntryNotFound { .. })
    ));
    assert!(matches!(
        cli.execute(&Commands::List {
            format: "yaml".to_string()
        }),
        Err(ApiError::InvalidArgument(_))
    ));
}

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["catalog", "list"],
        vec!["catalog", "list", "--format", "table"],
        vec!["catalog", "get", "svc"],
        vec!["catalog", "put", "svc", "--version", "1", "--github", "gh"],
        vec!["catalog", "submit", r#"{"name":"svc"}"#],
        vec!["catalog", "delete", "svc"],
        vec!["catalog", "records"],
        vec!["catalog", "--log-format", "json", "config"],
    ];
    for args in cases {
        assert!(Cli::try_parse_from(args.clone()).is_ok(), "failed to parse {:?}", args);
    }
}

#[test]
fn parse_rejects_missing_arguments() {
    assert!(Cli::try_parse_from(["catalog", "put"]).is_err());
    assert!(Cli::try_parse_from(["catalog", "delete"]).is_err());
    assert!(Cli::try_parse_from(["catalog", "unknown"]).is_err());
}
