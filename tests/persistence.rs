//! Save / load tests for the dataset container.
//!
//! These tests verify that vocabularies survive a save + load cycle, that the
//! reloaded triplet store is the concatenation of the saved partitions, and
//! that failures leave the in-memory dataset untouched.

use rand::rngs::StdRng;
use rand::SeedableRng;

use kge_dataset::binding::{RawBinding, RawTriplet};
use kge_dataset::classify::{Entity, EntityClassifier, EntityFilters, WIKIDATA_HOST};
use kge_dataset::dataset::Dataset;
use kge_dataset::error::{DatasetError, PersistError};
use kge_dataset::persist::DatasetFile;
use kge_dataset::split::Split;
use kge_dataset::triplet::Triplet;

fn wd(kind: &str, id: u32) -> RawBinding {
    match kind {
        "Q" => RawBinding::uri(format!("http://www.wikidata.org/entity/Q{id}")),
        _ => RawBinding::uri(format!("http://www.wikidata.org/prop/direct/P{id}")),
    }
}

fn populated() -> Dataset {
    let filters = EntityFilters {
        accept_literal: true,
        ..EntityFilters::default()
    };
    let mut dataset = Dataset::with_classifier(EntityClassifier::new(WIKIDATA_HOST, filters));
    let mut rows: Vec<RawTriplet> = (0..20)
        .map(|i| RawTriplet::new(wd("Q", i), wd("P", i % 4), wd("Q", (i * 7) % 13)))
        .collect();
    rows.push(RawTriplet::new(
        wd("Q", 1),
        wd("P", 1559),
        RawBinding::literal("Douglas Adams").with_lang("en"),
    ));
    rows.push(RawTriplet::new(
        wd("Q", 1),
        wd("P", 569),
        RawBinding::literal("1952-03-11T00:00:00Z")
            .with_datatype("http://www.w3.org/2001/XMLSchema#dateTime"),
    ));
    dataset.load_bindings(&rows, false);
    dataset
}

fn sorted(mut triplets: Vec<Triplet>) -> Vec<Triplet> {
    triplets.sort_by_key(|t| (t.object, t.subject, t.predicate));
    triplets
}

#[test]
fn vocabularies_survive_reload() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("dataset.bin");

    let mut original = populated();
    let split = original
        .save_with(&path, 0.8, &mut StdRng::seed_from_u64(3))
        .unwrap();
    assert_eq!(split.len(), original.triplets().len());

    let mut reloaded = Dataset::new();
    reloaded.load(&path).unwrap();

    assert_eq!(reloaded.entities(), original.entities());
    assert_eq!(reloaded.relations(), original.relations());
    assert_eq!(reloaded.triplets(), split.concat().as_slice());
    assert_eq!(
        sorted(reloaded.triplets().to_vec()),
        sorted(original.triplets().to_vec())
    );
}

#[test]
fn literal_entities_round_trip_exactly() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("dataset.bin");
    let mut original = populated();
    original.save(&path).unwrap();

    let reloaded = Dataset::open(&path).unwrap();
    let lit = Entity::Literal(RawBinding::literal("Douglas Adams").with_lang("en"));
    assert_eq!(reloaded.entity_id(&lit), original.entity_id(&lit));
    assert!(reloaded.entity_id(&lit).is_some());
}

#[test]
fn second_cycle_changes_nothing_further() {
    let dir = tempfile::TempDir::new().unwrap();
    let first = dir.path().join("first.bin");
    let second = dir.path().join("second.bin");

    let mut dataset = populated();
    dataset.save(&first).unwrap();
    dataset.load(&first).unwrap();
    let entities = dataset.entities().to_vec();
    let relations = dataset.relations().to_vec();
    let triplets = dataset.triplets().to_vec();

    // A different seed must not matter: nothing was appended since the load.
    dataset
        .save_with(&second, 0.8, &mut StdRng::seed_from_u64(2))
        .unwrap();
    dataset.load(&second).unwrap();

    assert_eq!(dataset.entities(), entities.as_slice());
    assert_eq!(dataset.relations(), relations.as_slice());
    assert_eq!(dataset.triplets(), triplets.as_slice());
    assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
}

#[test]
fn saving_twice_writes_the_same_partitions() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut dataset = populated();
    let a = dataset
        .save_with(&dir.path().join("a.bin"), 0.8, &mut StdRng::seed_from_u64(5))
        .unwrap();
    let b = dataset
        .save_with(&dir.path().join("b.bin"), 0.8, &mut StdRng::seed_from_u64(6))
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn appending_after_reload_resplits() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("dataset.bin");
    let mut dataset = populated();
    dataset.save(&path).unwrap();
    dataset.load(&path).unwrap();

    dataset.load_bindings(&[RawTriplet::new(wd("Q", 2), wd("P", 1), wd("Q", 3))], false);
    assert!(dataset.cached_split().is_none());
    let split = dataset.save(&dir.path().join("grown.bin")).unwrap();
    assert_eq!(split.len(), dataset.triplets().len());
}

#[test]
fn interning_after_reload_dedupes_against_stored_values() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("dataset.bin");
    let mut original = populated();
    original.save(&path).unwrap();

    let mut reloaded = Dataset::open(&path).unwrap();
    let entities_before = reloaded.entities().len();
    let relations_before = reloaded.relations().len();
    reloaded.load_bindings(&[RawTriplet::new(wd("Q", 2), wd("P", 1), wd("Q", 3))], false);

    assert_eq!(reloaded.entities().len(), entities_before);
    assert_eq!(reloaded.relations().len(), relations_before);
    assert_eq!(reloaded.triplets().len(), original.triplets().len() + 1);
}

#[test]
fn unwritable_path_fails_without_panicking() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("missing").join("dataset.bin");
    let err = populated().save(&path).unwrap_err();
    assert!(matches!(err, DatasetError::Persist(PersistError::Create { .. })));
}

#[test]
fn failed_load_leaves_dataset_untouched() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut dataset = populated();
    let before = dataset.info();

    let err = dataset.load(&dir.path().join("absent.bin")).unwrap_err();
    assert!(matches!(err, DatasetError::Persist(PersistError::Open { .. })));
    assert_eq!(dataset.info(), before);

    let junk = dir.path().join("junk.bin");
    std::fs::write(&junk, b"not a dataset").unwrap();
    assert!(dataset.load(&junk).is_err());
    assert_eq!(dataset.info(), before);
}

#[test]
fn empty_dataset_round_trips() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("empty.bin");
    let split = Dataset::new().save(&path).unwrap();
    assert!(split.is_empty());
    let reloaded = Dataset::open(&path).unwrap();
    assert_eq!(reloaded.info().entities, 0);
    assert!(reloaded.triplets().is_empty());
}

#[test]
fn container_with_dangling_ids_is_refused() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("dangling.bin");
    let file = DatasetFile::new(
        vec![Entity::Uri("Q1".into()), Entity::Uri("Q2".into())],
        vec!["P31".into()],
        Split {
            train: vec![Triplet::new(0, 1, 0), Triplet::new(2, 0, 0)],
            valid: vec![],
            test: vec![],
        },
    );
    file.write(&path).unwrap();

    let mut dataset = populated();
    let before = dataset.info();
    let err = dataset.load(&path).unwrap_err();
    assert!(matches!(err, DatasetError::Persist(PersistError::DanglingId { .. })));
    assert_eq!(dataset.info(), before);
}
