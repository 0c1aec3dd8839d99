//! In-process language records

use std::collections::BTreeMap;

use super::{
    LanguageStore,
    StoreError,
};
use crate::tree::TranslationTree;

/// Language records held in memory, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, TranslationTree>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_record(mut self, language: &str, tree: TranslationTree) -> Self {
        self.records.insert(language.to_string(), tree);
        self
    }

    #[must_use]
    pub fn get(&self, language: &str) -> Option<&TranslationTree> {
        self.records.get(language)
    }
}

impl LanguageStore for MemoryStore {
    fn exists(&self, language: &str) -> bool {
        self.records.contains_key(language)
    }

    fn load(&self, language: &str) -> Result<Option<TranslationTree>, StoreError> {
        Ok(self.records.get(language).cloned())
    }

    fn save(&mut self, language: &str, tree: &TranslationTree) -> Result<(), StoreError> {
        self.records.insert(language.to_string(), tree.clone());
        Ok(())
    }

    fn languages(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.records.keys().cloned().collect())
    }
}
