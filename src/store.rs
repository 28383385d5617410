use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use log::debug;
use once_cell::sync::Lazy;

use crate::error::Result;
use crate::export;
use crate::generator::{self, GenerationPolicy};
use crate::models::Dataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenerationKey {
    pub seed: u64,
    pub count: i64,
    pub policy: GenerationPolicy,
}

/// Generate-once cache of datasets. Entries live until the process exits.
#[derive(Debug, Default)]
pub struct DatasetStore {
    generated: HashMap<GenerationKey, Dataset>,
}

static GLOBAL_STORE: Lazy<Mutex<DatasetStore>> = Lazy::new(|| Mutex::new(DatasetStore::new()));

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide store shared by every session.
    pub fn global() -> &'static Mutex<DatasetStore> {
        &GLOBAL_STORE
    }

    pub fn get_or_generate(&mut self, key: GenerationKey) -> Result<Dataset> {
        if let Some(dataset) = self.generated.get(&key) {
            debug!("Dataset cache hit for {key:?}");
            return Ok(Arc::clone(dataset));
        }

        let dataset = generator::generate(key.count, key.seed, key.policy)?;
        self.generated.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn cached_len(&self) -> usize {
        self.generated.len()
    }

    /// Load a previously exported table. File-backed datasets are not cached.
    pub fn load_file(path: &Path) -> Result<Dataset> {
        Ok(Arc::new(export::import_csv(path)?))
    }
}
