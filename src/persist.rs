//! Binary dataset container.
//!
//! A container holds both vocabularies and the three partitions, encoded with
//! bincode. The unsplit triplet store is never written; readers rebuild it as
//! `train ++ valid ++ test`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::Entity;
use crate::error::PersistError;
use crate::split::Split;
use crate::triplet::Triplet;

const FORMAT_TAG: &str = "kge-dataset";
const FORMAT_VERSION: u32 = 1;

/// On-disk layout of a saved dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetFile {
    format: String,
    version: u32,
    pub entities: Vec<Entity>,
    pub relations: Vec<String>,
    pub train: Vec<Triplet>,
    pub valid: Vec<Triplet>,
    pub test: Vec<Triplet>,
}

impl DatasetFile {
    pub fn new(entities: Vec<Entity>, relations: Vec<String>, split: Split) -> Self {
        Self {
            format: FORMAT_TAG.to_string(),
            version: FORMAT_VERSION,
            entities,
            relations,
            train: split.train,
            valid: split.valid,
            test: split.test,
        }
    }

    pub fn split(&self) -> Split {
        Split {
            train: self.train.clone(),
            valid: self.valid.clone(),
            test: self.test.clone(),
        }
    }

    /// Write the container to `path`, truncating any existing file.
    pub fn write(&self, path: &Path) -> Result<(), PersistError> {
        let file = File::create(path).map_err(|e| PersistError::Create {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, self).map_err(|e| PersistError::Serialization {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        writer.flush().map_err(|e| PersistError::Serialization {
            path: path.display().to_string(),
            message: format!("flush failed: {e}"),
        })?;
        Ok(())
    }

    /// Read and validate a container from `path`.
    ///
    /// Decoded from memory; a truncated or corrupt file is a
    /// `Serialization` error.
    pub fn read(path: &Path) -> Result<Self, PersistError> {
        let bytes = std::fs::read(path).map_err(|e| PersistError::Open {
            path: path.display().to_string(),
            source: e,
        })?;
        let decoded: Self =
            bincode::deserialize(&bytes).map_err(|e| PersistError::Serialization {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        if decoded.format != FORMAT_TAG || decoded.version != FORMAT_VERSION {
            return Err(PersistError::IncompatibleFormat {
                path: path.display().to_string(),
                expected: format!("{FORMAT_TAG} v{FORMAT_VERSION}"),
                found: format!("{} v{}", decoded.format, decoded.version),
            });
        }
        decoded.check_ids(path)?;
        Ok(decoded)
    }

    /// Every triplet must index into the stored vocabularies.
    fn check_ids(&self, path: &Path) -> Result<(), PersistError> {
        let entities = self.entities.len();
        let relations = self.relations.len();
        let dangling = self
            .train
            .iter()
            .chain(&self.valid)
            .chain(&self.test)
            .find(|t| t.object >= entities || t.subject >= entities || t.predicate >= relations);
        match dangling {
            Some(triplet) => Err(PersistError::DanglingId {
                path: path.display().to_string(),
                triplet: triplet.to_string(),
                entities,
                relations,
            }),
            None => Ok(()),
        }
    }
}
