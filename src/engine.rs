//! Loaded-dataset snapshots and atomic reload.
//!
//! A [`Snapshot`] bundles a normalized [`Dataset`] with the column sets derived
//! from its schema. It is never mutated; [`LookupEngine::reload`] builds a
//! complete replacement first and only then swaps the shared pointer, so a
//! reader sees either the old table or the new one.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};

use chrono::NaiveDateTime;
use log::{info, warn};

use crate::{
    columns::{ColumnRules, SearchableColumnSet},
    config::LookupConfig,
    dataset::{self, Dataset, LoadOptions, Record},
    error::Result,
    expiry::{self, ExpiryColumnSet},
    io_utils,
    search::{self, SearchOutcome},
};

#[derive(Debug, Clone)]
pub struct Snapshot {
    dataset: Dataset,
    searchable: SearchableColumnSet,
    expiry: ExpiryColumnSet,
}

impl Snapshot {
    pub fn new<S: AsRef<str>>(dataset: Dataset, rules: &ColumnRules, expiry_columns: &[S]) -> Self {
        let searchable = rules.searchable_columns(dataset.headers());
        if searchable.is_empty() {
            warn!("No identity, name, or plate column found; searches will not match anything");
        }
        let expiry = ExpiryColumnSet::resolve(dataset.headers(), expiry_columns);
        Self {
            dataset,
            searchable,
            expiry,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn searchable(&self) -> &SearchableColumnSet {
        &self.searchable
    }

    pub fn expiry(&self) -> &ExpiryColumnSet {
        &self.expiry
    }

    pub fn search(&self, query: &str) -> SearchOutcome<'_> {
        search::search(&self.dataset, &self.searchable, query)
    }

    pub fn is_expired(&self, record: &Record, now: NaiveDateTime) -> bool {
        expiry::is_expired(record, &self.expiry, now)
    }

    pub fn expired_columns(&self, record: &Record, now: NaiveDateTime) -> Vec<&str> {
        expiry::expired_columns(record, &self.expiry, now)
    }
}

/// Everything needed to (re)load a dataset from disk.
#[derive(Debug, Clone)]
pub struct DatasetSource {
    pub path: PathBuf,
    pub load: LoadOptions,
    pub rules: ColumnRules,
    pub expiry_columns: Vec<String>,
}

impl DatasetSource {
    /// Resolves the source from configuration, letting explicit CLI values win.
    pub fn from_config(
        path: &Path,
        config: &LookupConfig,
        delimiter: Option<u8>,
        input_encoding: Option<&str>,
    ) -> Result<Self> {
        let delimiter = match delimiter {
            Some(value) => Some(value),
            None => config.delimiter_byte()?,
        };
        let encoding =
            io_utils::resolve_encoding(input_encoding.or(config.input_encoding.as_deref()))?;
        Ok(Self {
            path: path.to_path_buf(),
            load: LoadOptions {
                delimiter,
                encoding,
                placeholder_prefix: config.placeholder_prefix.clone(),
            },
            rules: ColumnRules::from_config(config)?,
            expiry_columns: config.expiry_columns.clone(),
        })
    }

    pub fn load(&self) -> Result<Snapshot> {
        let dataset = dataset::load_dataset(&self.path, &self.load)?;
        Ok(Snapshot::new(dataset, &self.rules, &self.expiry_columns))
    }
}

#[derive(Debug)]
pub struct LookupEngine {
    source: DatasetSource,
    current: RwLock<Arc<Snapshot>>,
}

impl LookupEngine {
    pub fn open(source: DatasetSource) -> Result<Self> {
        let snapshot = source.load()?;
        Ok(Self {
            source,
            current: RwLock::new(Arc::new(snapshot)),
        })
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    /// The snapshot current at the time of the call.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reloads the source file. On failure the previous snapshot stays active.
    pub fn reload(&self) -> Result<Arc<Snapshot>> {
        let fresh = Arc::new(self.source.load()?);
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::clone(&fresh);
        info!(
            "Reloaded {:?}: {} row(s)",
            self.source.path,
            fresh.dataset().len()
        );
        Ok(fresh)
    }
}
