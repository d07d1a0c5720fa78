//! Dataset facade: vocabularies, triplet store, loading, splitting and
//! persistence.
//!
//! A [`Dataset`] starts empty and only grows through the loading methods.
//! Each raw record is classified and interned in a fixed order (object,
//! subject, predicate) before the loader decides whether to keep it, so a
//! record discarded because of its predicate still leaves its object and
//! subject in the entity vocabulary.
//!
//! The most recent split is kept with the dataset until the triplet store
//! grows again, so saving a dataset that was just loaded or saved writes the
//! same partitions.

use std::io::BufRead;
use std::path::Path;

use rand::Rng;

use crate::binding::RawTriplet;
use crate::classify::{Classification, Entity, EntityClassifier};
use crate::config::DatasetConfig;
use crate::endpoint::{QueryExecutor, QueryResponse};
use crate::error::{DatasetResult, EndpointError, IngestError};
use crate::persist::DatasetFile;
use crate::query::LevelsQuery;
use crate::split::{self, Split, DEFAULT_TRAIN_RATIO};
use crate::triplet::Triplet;
use crate::vocab::Vocabulary;

/// Counters for one loading call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Records examined.
    pub seen: usize,
    /// Triplets appended to the store.
    pub added: usize,
    /// Records discarded because a binding was rejected.
    pub skipped: usize,
}

impl LoadStats {
    fn merge(&mut self, other: LoadStats) {
        self.seen += other.seen;
        self.added += other.added;
        self.skipped += other.skipped;
    }
}

impl std::fmt::Display for LoadStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} records, {} triplets added, {} skipped",
            self.seen, self.added, self.skipped
        )
    }
}

/// Entity, relation and triplet counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetInfo {
    pub entities: usize,
    pub relations: usize,
    pub triplets: usize,
}

impl std::fmt::Display for DatasetInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} entities, {} relations, {} triplets",
            self.entities, self.relations, self.triplets
        )
    }
}

/// An integer-indexed knowledge-graph dataset.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    classifier: EntityClassifier,
    entities: Vocabulary<Entity>,
    relations: Vocabulary<String>,
    triplets: Vec<Triplet>,
    /// Split matching the current triplet store; dropped on every append.
    cached_split: Option<Split>,
}

impl Dataset {
    /// Empty dataset with the default Wikidata classifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty dataset classifying with `classifier`.
    pub fn with_classifier(classifier: EntityClassifier) -> Self {
        Self {
            classifier,
            ..Self::default()
        }
    }

    pub fn from_config(config: &DatasetConfig) -> Self {
        Self::with_classifier(config.classifier())
    }

    pub fn classifier(&self) -> &EntityClassifier {
        &self.classifier
    }

    // -----------------------------------------------------------------------
    // Interning
    // -----------------------------------------------------------------------

    fn intern_entity(&mut self, value: Classification, only_identifiers: bool) -> Option<usize> {
        let entity = value.into_admitted()?;
        if only_identifiers && entity.as_uri().is_none() {
            return None;
        }
        Some(self.entities.intern(entity))
    }

    /// Relations are identifiers; a literal predicate is always rejected.
    fn intern_relation(&mut self, value: Classification) -> Option<usize> {
        match value.into_admitted()? {
            Entity::Uri(uri) => Some(self.relations.intern(uri)),
            Entity::Literal(_) => None,
        }
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Load raw result rows.
    ///
    /// A row is kept only if all three bindings are admitted. Discarded rows
    /// are not logged above `trace`; the returned counters are the only
    /// record of them.
    pub fn load_bindings(&mut self, records: &[RawTriplet], only_identifiers: bool) -> LoadStats {
        let mut stats = LoadStats::default();
        for record in records {
            stats.seen += 1;

            let object = self.classifier.classify(&record.object);
            let object = self.intern_entity(object, only_identifiers);
            let subject = self.classifier.classify(&record.subject);
            let subject = self.intern_entity(subject, only_identifiers);
            let predicate = self.classifier.classify(&record.predicate);
            let predicate = self.intern_relation(predicate);

            match (object, subject, predicate) {
                (Some(object), Some(subject), Some(predicate)) => {
                    self.push(Triplet::new(object, subject, predicate));
                    stats.added += 1;
                }
                _ => {
                    tracing::trace!(
                        subject = %record.subject.value,
                        predicate = %record.predicate.value,
                        object = %record.object.value,
                        "record discarded"
                    );
                    stats.skipped += 1;
                }
            }
        }
        tracing::debug!(%stats, "loaded bindings");
        stats
    }

    /// Execute `query` and load its rows.
    ///
    /// A non-success status is an [`EndpointError::Status`] and nothing is
    /// loaded.
    pub fn load_query<E>(
        &mut self,
        executor: &E,
        query: &str,
        only_identifiers: bool,
    ) -> DatasetResult<LoadStats>
    where
        E: QueryExecutor + ?Sized,
    {
        let response = checked(executor.execute(query)?)?;
        Ok(self.load_bindings(&response.bindings, only_identifiers))
    }

    /// Build a `levels`-hop query, append `extra` verbatim, execute and load.
    pub fn load_levels<E>(
        &mut self,
        executor: &E,
        levels: usize,
        extra: &str,
        only_identifiers: bool,
    ) -> DatasetResult<LoadStats>
    where
        E: QueryExecutor + ?Sized,
    {
        let query = LevelsQuery::new(levels).with_extra(extra).render();
        tracing::debug!(levels, %query, "levels query");
        self.load_query(executor, &query, only_identifiers)
    }

    /// Load a levels query in pages of `page_size` rows.
    ///
    /// Stops after `max_pages` pages or at the first empty page. A failing
    /// page aborts with its error; rows from earlier pages stay loaded.
    pub fn load_paged<E>(
        &mut self,
        executor: &E,
        levels: usize,
        extra: &str,
        page_size: usize,
        max_pages: usize,
        only_identifiers: bool,
    ) -> DatasetResult<LoadStats>
    where
        E: QueryExecutor + ?Sized,
    {
        let mut total = LoadStats::default();
        for page in 0..max_pages {
            let offset = page * page_size;
            let query = LevelsQuery::new(levels)
                .with_extra(extra)
                .page(page_size, offset)
                .render();
            let response = checked(executor.execute(&query)?)?;
            if response.bindings.is_empty() {
                break;
            }
            let stats = self.load_bindings(&response.bindings, only_identifiers);
            tracing::info!(page, offset, %stats, "loaded page");
            total.merge(stats);
        }
        Ok(total)
    }

    fn push(&mut self, triplet: Triplet) {
        self.triplets.push(triplet);
        self.cached_split = None;
    }

    /// Add one triplet from plain identifier strings, bypassing
    /// classification.
    ///
    /// All three parts go through the classifier's
    /// [`IdentifierScheme`](crate::classify::IdentifierScheme)
    /// checks first; if any is invalid nothing is interned and `None` is
    /// returned. The object is interned before the subject.
    pub fn add_triple(&mut self, subject: &str, predicate: &str, object: &str) -> Option<Triplet> {
        let subject = self.classifier.check_entity(subject)?;
        let predicate = self.classifier.check_relation(predicate)?;
        let object = self.classifier.check_entity(object)?;

        let object = self.entities.intern(Entity::Uri(object));
        let subject = self.entities.intern(Entity::Uri(subject));
        let predicate = self.relations.intern(predicate);
        let triplet = Triplet::new(object, subject, predicate);
        self.push(triplet);
        Some(triplet)
    }

    /// Load delimited lines of `object <sep> predicate <sep> subject`.
    ///
    /// Columns past the third are ignored. Blank lines and `#` comments are
    /// passed over; lines with fewer than three columns or an identifier
    /// rejected by [`add_triple`](Self::add_triple) count as skipped.
    pub fn load_delimited<R: BufRead>(
        &mut self,
        reader: R,
        separator: char,
    ) -> DatasetResult<LoadStats> {
        let mut stats = LoadStats::default();
        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| IngestError::Read {
                line: line_num + 1,
                source: e,
            })?;
            let line = line.trim_end();
            if line.trim_start().is_empty() || line.starts_with('#') {
                continue;
            }
            stats.seen += 1;

            let mut columns = line.split(separator).map(str::trim);
            let added = match (columns.next(), columns.next(), columns.next()) {
                (Some(object), Some(predicate), Some(subject)) => {
                    self.add_triple(subject, predicate, object).is_some()
                }
                _ => false,
            };
            if added {
                stats.added += 1;
            } else {
                tracing::trace!(line = line_num + 1, "malformed line skipped");
                stats.skipped += 1;
            }
        }
        tracing::debug!(%stats, "loaded delimited triplets");
        Ok(stats)
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    pub fn entities(&self) -> &[Entity] {
        self.entities.as_slice()
    }

    pub fn relations(&self) -> &[String] {
        self.relations.as_slice()
    }

    /// The triplet store in load order.
    pub fn triplets(&self) -> &[Triplet] {
        &self.triplets
    }

    pub fn entity(&self, id: usize) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn entity_id(&self, entity: &Entity) -> Option<usize> {
        self.entities.id_of(entity)
    }

    /// Id of the IRI entity `uri`.
    pub fn entity_id_by_uri(&self, uri: &str) -> Option<usize> {
        self.entities.id_of(&Entity::Uri(uri.to_string()))
    }

    pub fn relation(&self, id: usize) -> Option<&str> {
        self.relations.get(id).map(String::as_str)
    }

    pub fn relation_id(&self, relation: &str) -> Option<usize> {
        self.relations.id_of(relation)
    }

    pub fn info(&self) -> DatasetInfo {
        DatasetInfo {
            entities: self.entities.len(),
            relations: self.relations.len(),
            triplets: self.triplets.len(),
        }
    }

    /// Every entity, relation and triplet, one per line.
    pub fn listing(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{}", self.info());
        let _ = writeln!(out, "\nEntities ({}):", self.entities.len());
        for (id, entity) in self.entities.iter().enumerate() {
            let _ = writeln!(out, "{id}\t{entity}");
        }
        let _ = writeln!(out, "\nRelations ({}):", self.relations.len());
        for (id, relation) in self.relations.iter().enumerate() {
            let _ = writeln!(out, "{id}\t<{relation}>");
        }
        let _ = writeln!(out, "\nTriplets ({}):", self.triplets.len());
        for triplet in &self.triplets {
            let _ = writeln!(out, "{triplet}");
        }
        out
    }

    // -----------------------------------------------------------------------
    // Splitting and persistence
    // -----------------------------------------------------------------------

    /// Split the triplet store with the thread-local random source.
    pub fn split(&self, ratio: f64) -> DatasetResult<Split> {
        self.split_with(ratio, &mut rand::thread_rng())
    }

    /// Split the triplet store with a caller-supplied random source.
    pub fn split_with<R: Rng + ?Sized>(&self, ratio: f64, rng: &mut R) -> DatasetResult<Split> {
        Ok(split::split(&self.triplets, ratio, rng)?)
    }

    /// The split kept from the last save or load, if the triplet store has
    /// not grown since.
    pub fn cached_split(&self) -> Option<&Split> {
        self.cached_split.as_ref()
    }

    /// Split at the default ratio and write the container to `path`.
    ///
    /// Returns the split that was written.
    pub fn save(&mut self, path: &Path) -> DatasetResult<Split> {
        self.save_with(path, DEFAULT_TRAIN_RATIO, &mut rand::thread_rng())
    }

    /// Write the container to `path`.
    ///
    /// Reuses the cached split when there is one; otherwise splits with
    /// `ratio` and `rng` and caches the result.
    pub fn save_with<R: Rng + ?Sized>(
        &mut self,
        path: &Path,
        ratio: f64,
        rng: &mut R,
    ) -> DatasetResult<Split> {
        let split = match &self.cached_split {
            Some(split) => split.clone(),
            None => self.split_with(ratio, rng)?,
        };
        let file = DatasetFile::new(
            self.entities.as_slice().to_vec(),
            self.relations.as_slice().to_vec(),
            split,
        );
        file.write(path)?;
        tracing::info!(
            path = %path.display(),
            entities = file.entities.len(),
            relations = file.relations.len(),
            train = file.train.len(),
            valid = file.valid.len(),
            test = file.test.len(),
            "saved dataset"
        );
        let split = file.split();
        self.cached_split = Some(split.clone());
        Ok(split)
    }

    /// Replace vocabularies and triplet store with the container at `path`.
    ///
    /// The triplet store becomes `train ++ valid ++ test`. On error the
    /// dataset is left untouched.
    pub fn load(&mut self, path: &Path) -> DatasetResult<()> {
        let file = DatasetFile::read(path)?;
        let split = file.split();
        self.triplets = split.concat();
        self.cached_split = Some(split);
        self.entities = Vocabulary::from_items(file.entities);
        self.relations = Vocabulary::from_items(file.relations);
        tracing::info!(path = %path.display(), info = %self.info(), "loaded dataset");
        Ok(())
    }

    /// Open a saved container as a new dataset with the default classifier.
    pub fn open(path: &Path) -> DatasetResult<Self> {
        let mut dataset = Self::new();
        dataset.load(path)?;
        Ok(dataset)
    }
}

fn checked(response: QueryResponse) -> Result<QueryResponse, EndpointError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(EndpointError::Status {
            status: response.status,
            body: response.body,
        })
    }
}
