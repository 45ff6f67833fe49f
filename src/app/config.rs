// Messenger configuration

use crate::rsa::{PrimeSearcher, DEFAULT_WITNESSES};
use crate::util::file_ops::{read_json, StoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Folder holding public.key, private.key and contact keys
    pub key_dir: PathBuf,
    /// Root folder of the key/message directory
    pub directory: PathBuf,
    /// Miller-Rabin witnesses per candidate
    pub witnesses: i32,
    /// Prime search threads; 0 means one per logical CPU
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key_dir: PathBuf::from("."),
            directory: PathBuf::from("directory"),
            witnesses: DEFAULT_WITNESSES,
            workers: 0,
        }
    }
}

impl Config {
    /// Load from a JSON file; missing fields keep their defaults
    pub fn load(path: &Path) -> StoreResult<Self> {
        read_json(path)
    }

    pub fn with_key_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.key_dir = dir.into();
        self
    }

    pub fn with_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directory = dir.into();
        self
    }

    pub fn with_witnesses(mut self, witnesses: i32) -> Self {
        self.witnesses = witnesses;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn searcher(&self) -> PrimeSearcher {
        let searcher = PrimeSearcher::default().with_witnesses(self.witnesses);
        if self.workers == 0 {
            searcher
        } else {
            searcher.with_workers(self.workers)
        }
    }
}
