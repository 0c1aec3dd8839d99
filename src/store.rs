//! Persisted language records
//!
//! The orchestrator only sees [`LanguageStore`]. [`FileStore`] keeps one file
//! per language on disk; [`MemoryStore`] keeps records in process.

mod file;
mod memory;

use thiserror::Error;

pub use file::{
    FileFormat,
    FileStore,
};
pub use memory::MemoryStore;

use crate::tree::{
    TranslationTree,
    TreeError,
};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access language record: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse language record '{language}': {message}")]
    Parse { language: String, message: String },

    #[error("Invalid language record '{language}': {source}")]
    Tree {
        language: String,
        #[source]
        source: TreeError,
    },

    #[error("Failed to serialize language record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Key-value store of translation trees keyed by language code.
pub trait LanguageStore {
    fn exists(&self, language: &str) -> bool;

    /// Load a record. `Ok(None)` means no record exists; an unreadable or
    /// malformed record is an error.
    fn load(&self, language: &str) -> Result<Option<TranslationTree>, StoreError>;

    /// Replace the whole record for `language`.
    fn save(&mut self, language: &str, tree: &TranslationTree) -> Result<(), StoreError>;

    /// Codes of every persisted record, sorted.
    fn languages(&self) -> Result<Vec<String>, StoreError>;
}
