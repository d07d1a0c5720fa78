//! End-to-end integration tests for the dataset pipeline.
//!
//! Each test drives the public API from a query or a file on disk through
//! classification, interning, splitting and persistence.

use rand::rngs::StdRng;
use rand::SeedableRng;

use kge_dataset::binding::{RawBinding, RawTriplet};
use kge_dataset::classify::Entity;
use kge_dataset::config::DatasetConfig;
use kge_dataset::dataset::{Dataset, LoadStats};
use kge_dataset::endpoint::{decode_results, QueryResponse};
use kge_dataset::error::{DatasetError, EndpointError};

const RESULTS: &str = r#"{
  "head": { "vars": ["subject", "predicate", "object"] },
  "results": { "bindings": [
    { "subject":   { "type": "uri", "value": "http://www.wikidata.org/entity/Q42" },
      "predicate": { "type": "uri", "value": "http://www.wikidata.org/prop/direct/P31" },
      "object":    { "type": "uri", "value": "http://www.wikidata.org/entity/Q5" } },
    { "subject":   { "type": "uri", "value": "http://www.wikidata.org/entity/Q42" },
      "predicate": { "type": "uri", "value": "http://www.wikidata.org/prop/direct/P1559" },
      "object":    { "type": "literal", "value": "Douglas Adams", "xml:lang": "en" } },
    { "subject":   { "type": "uri", "value": "http://www.wikidata.org/entity/Q42" },
      "predicate": { "type": "uri", "value": "http://www.wikidata.org/prop/P69" },
      "object":    { "type": "uri", "value": "http://www.wikidata.org/entity/statement/Q42-1" } },
    { "subject":   { "type": "uri", "value": "http://www.wikidata.org/entity/Q5" },
      "predicate": { "type": "uri", "value": "http://www.wikidata.org/reference/abc" },
      "object":    { "type": "uri", "value": "http://www.wikidata.org/entity/Q215627" } },
    { "subject":   { "type": "uri", "value": "http://dbpedia.org/resource/Douglas_Adams" },
      "predicate": { "type": "uri", "value": "http://www.w3.org/2002/07/owl#sameAs" },
      "object":    { "type": "uri", "value": "http://www.wikidata.org/entity/Q42" } }
  ] }
}"#;

fn fixture_executor(query: &str) -> Result<QueryResponse, EndpointError> {
    assert!(query.contains("wdt:P950"));
    Ok(QueryResponse::ok(decode_results(RESULTS)?))
}

#[test]
fn fetch_split_save_and_reopen() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("wikidata.bin");

    let mut dataset = Dataset::new();
    let stats = dataset
        .load_levels(&fixture_executor, 1, "", false)
        .unwrap();

    // The literal object and the reference predicate are rejected.
    assert_eq!(stats, LoadStats { seen: 5, added: 3, skipped: 2 });
    // Q215627 leaks in from the reference row, P1559 from the literal row.
    assert!(dataset.entity_id_by_uri("http://www.wikidata.org/entity/Q215627").is_some());
    assert!(dataset.relation_id("http://www.wikidata.org/prop/direct/P1559").is_some());
    assert_eq!(dataset.relations().len(), 4);

    let split = dataset
        .save_with(&path, 0.8, &mut StdRng::seed_from_u64(7))
        .unwrap();
    assert_eq!(split.len(), 3);

    let reopened = Dataset::open(&path).unwrap();
    assert_eq!(reopened.info(), dataset.info());
    assert_eq!(reopened.entities(), dataset.entities());
}

#[test]
fn foreign_iris_are_admitted_under_any_category() {
    let mut dataset = Dataset::new();
    dataset.load_levels(&fixture_executor, 1, "", false).unwrap();

    let foreign = dataset
        .entity_id_by_uri("http://dbpedia.org/resource/Douglas_Adams")
        .unwrap();
    let same_as = dataset
        .relation_id("http://www.w3.org/2002/07/owl#sameAs")
        .unwrap();
    assert!(dataset
        .triplets()
        .iter()
        .any(|t| t.subject == foreign && t.predicate == same_as));
}

#[test]
fn config_enables_literals() {
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = dir.path().join("kge.toml");
    std::fs::write(&config_path, "[filters]\naccept-literal = true\n").unwrap();
    let config = DatasetConfig::load(&config_path).unwrap();

    let mut dataset = Dataset::from_config(&config);
    let stats = dataset.load_levels(&fixture_executor, 1, "", false).unwrap();
    assert_eq!(stats.added, 4);
    let lit = Entity::Literal(RawBinding::literal("Douglas Adams").with_lang("en"));
    assert!(dataset.entity_id(&lit).is_some());

    let mut strict = Dataset::from_config(&config);
    assert_eq!(
        strict.load_levels(&fixture_executor, 1, "", true).unwrap().added,
        3
    );
}

#[test]
fn transport_failure_propagates() {
    let down = |_: &str| -> Result<QueryResponse, EndpointError> {
        Err(EndpointError::Transport {
            url: "http://localhost:1/sparql".into(),
            message: "connection refused".into(),
        })
    };
    let mut dataset = Dataset::new();
    let err = dataset.load_levels(&down, 2, "", false).unwrap_err();
    assert!(matches!(
        err,
        DatasetError::Endpoint(EndpointError::Transport { .. })
    ));
    assert_eq!(dataset.info().triplets, 0);
}

#[test]
fn delimited_file_to_container() {
    let dir = tempfile::TempDir::new().unwrap();
    let csv = dir.path().join("triples.csv");
    std::fs::write(&csv, "Q5,P31,Q42\nQ35120,P279,Q5\nQ5,P31,Q1\n").unwrap();

    let mut dataset = Dataset::new();
    let file = std::fs::File::open(&csv).unwrap();
    let stats = dataset
        .load_delimited(std::io::BufReader::new(file), ',')
        .unwrap();
    assert_eq!(stats.added, 3);
    assert_eq!(dataset.info().entities, 4);
    assert_eq!(dataset.info().relations, 2);

    let out = dir.path().join("out.bin");
    let split = dataset
        .save_with(&out, 0.5, &mut StdRng::seed_from_u64(11))
        .unwrap();
    // 3 triplets at 0.5: holdout 1, all of it in valid.
    assert_eq!(
        (split.train.len(), split.valid.len(), split.test.len()),
        (2, 1, 0)
    );
}

#[test]
fn rows_loaded_twice_repeat_only_triplets() {
    let rows = decode_results(RESULTS).unwrap();
    let mut dataset = Dataset::new();
    dataset.load_bindings(&rows, false);
    let info = dataset.info();
    dataset.load_bindings(&rows, false);
    assert_eq!(dataset.info().entities, info.entities);
    assert_eq!(dataset.info().relations, info.relations);
    assert_eq!(dataset.info().triplets, info.triplets * 2);
}

#[test]
fn row_array_json_decodes() {
    let rows: Vec<RawTriplet> = serde_json::from_str(
        r#"[{ "subject": { "type": "uri", "value": "http://www.wikidata.org/entity/Q1" },
              "predicate": { "type": "uri", "value": "http://www.wikidata.org/prop/direct/P31" },
              "object": { "type": "uri", "value": "http://www.wikidata.org/entity/Q2" } }]"#,
    )
    .unwrap();
    let mut dataset = Dataset::new();
    assert_eq!(dataset.load_bindings(&rows, false).added, 1);
}
