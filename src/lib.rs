// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # kge-dataset
//!
//! Turns SPARQL result rows into integer-indexed knowledge-graph datasets for
//! embedding training.
//!
//! ## Pipeline
//!
//! - **Classification** (`classify`): raw bindings become IRIs, literals or rejections
//! - **Vocabularies** (`vocab`): append-only, deduplicating value → id maps
//! - **Loading** (`dataset`): rows become `(object, subject, predicate)` id triplets
//! - **Splitting** (`split`): shuffled train / valid / test partitions
//! - **Persistence** (`persist`): bincode container of vocabularies and partitions
//!
//! ## Library usage
//!
//! ```no_run
//! use kge_dataset::binding::{RawBinding, RawTriplet};
//! use kge_dataset::dataset::Dataset;
//!
//! let mut dataset = Dataset::new();
//! dataset.load_bindings(
//!     &[RawTriplet::new(
//!         RawBinding::uri("http://www.wikidata.org/entity/Q42"),
//!         RawBinding::uri("http://www.wikidata.org/prop/direct/P31"),
//!         RawBinding::uri("http://www.wikidata.org/entity/Q5"),
//!     )],
//!     false,
//! );
//! dataset.save(std::path::Path::new("wikidata.bin")).unwrap();
//! ```

pub mod binding;
pub mod classify;
pub mod config;
pub mod dataset;
pub mod endpoint;
pub mod error;
pub mod persist;
pub mod query;
pub mod split;
pub mod triplet;
pub mod vocab;
