//! Advisor persistence layer
//!
//! Keeps advisor state between CLI invocations as pretty-printed JSON.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub state_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".advisor_data"),
            state_file: "advisor.json".to_string(),
        }
    }
}

/// JSON state storage
pub struct Storage {
    config: StorageConfig,
}

impl Storage {
    /// Create a new storage manager
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.data_dir)?;
        Ok(Self { config })
    }

    /// Get the state file path
    fn state_path(&self) -> PathBuf {
        self.config.data_dir.join(&self.config.state_file)
    }

    /// Save state to disk
    pub fn save<T: Serialize>(&self, state: &T) -> Result<(), StorageError> {
        let path = self.state_path();

        // Write to temporary file first
        let temp_path = self
            .config
            .data_dir
            .join(format!("{}.tmp", self.config.state_file));
        let file = fs::File::create(&temp_path)?;
        let writer = BufWriter::new(file);

        serde_json::to_writer_pretty(writer, state)?;

        // Atomic rename
        fs::rename(&temp_path, &path)?;
        log::debug!("Saved advisor state to {:?}", path);

        Ok(())
    }

    /// Load state from disk
    pub fn load<T: DeserializeOwned>(&self) -> Result<T, StorageError> {
        let path = self.state_path();

        if !path.exists() {
            return Err(StorageError::InvalidData(
                "State file not found".to_string(),
            ));
        }

        load_from_file(&path)
    }

    /// Load saved state, or fall back to the default when nothing is saved
    pub fn load_or_default<T: DeserializeOwned + Default>(&self) -> Result<T, StorageError> {
        if self.exists() {
            log::debug!("Loading advisor state from {:?}", self.state_path());
            self.load()
        } else {
            Ok(T::default())
        }
    }

    /// Check if saved state exists
    pub fn exists(&self) -> bool {
        self.state_path().exists()
    }

    /// Delete the saved state
    pub fn delete(&self) -> Result<(), StorageError> {
        let path = self.state_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Save state to a specific file path
pub fn save_to_file<T: Serialize>(state: &T, path: &Path) -> Result<(), StorageError> {
    let file = fs::File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, state)?;
    Ok(())
}

/// Load state from a specific file path
pub fn load_from_file<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}
