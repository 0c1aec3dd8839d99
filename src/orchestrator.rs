//! Create and update workflows over batches of languages
//!
//! Languages are handled one at a time, in the order given. A failure for
//! one language is recorded in the [`BatchReport`] and the batch moves on.
//! Only a missing or unreadable source language aborts a batch, and it does
//! so before any translation request is made.

use std::fmt;

use thiserror::Error;

use crate::store::{
    LanguageStore,
    StoreError,
};
use crate::translator::Translator;
use crate::tree::{
    TranslationTree,
    deep_merge,
    diff,
    remove_keys,
};

/// Batch-level failures.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Source language '{language}' has no translation file")]
    MissingSource { language: String },

    #[error("Failed to read source language '{language}': {source}")]
    UnreadableSource {
        language: String,
        #[source]
        source: StoreError,
    },
}

/// Terminal state of one language in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageOutcome {
    Created,
    Updated { content_added: bool, content_removed: bool },
    UpToDate,
    /// Create flow found an existing record.
    SkippedExists,
    /// Update flow was asked to update the source language.
    SkippedDefault,
    Failed(String),
}

impl LanguageOutcome {
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for LanguageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Updated { content_added, content_removed } => {
                let changes = match (content_added, content_removed) {
                    (true, true) => "content added and removed",
                    (true, false) => "content added",
                    (false, true) => "content removed",
                    (false, false) => "no changes",
                };
                write!(f, "updated ({changes})")
            }
            Self::UpToDate => f.write_str("up to date"),
            Self::SkippedExists => f.write_str("skipped (already exists)"),
            Self::SkippedDefault => f.write_str("skipped (default language)"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Per-language outcomes of one batch, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    outcomes: Vec<(String, LanguageOutcome)>,
}

impl BatchReport {
    #[must_use]
    pub fn outcomes(&self) -> &[(String, LanguageOutcome)] {
        &self.outcomes
    }

    #[must_use]
    pub fn outcome(&self, language: &str) -> Option<&LanguageOutcome> {
        self.outcomes.iter().find(|(lang, _)| lang == language).map(|(_, outcome)| outcome)
    }

    /// True when the batch created a record, so the language registry needs
    /// to be recomputed from the store.
    #[must_use]
    pub fn registry_stale(&self) -> bool {
        self.outcomes.iter().any(|(_, outcome)| *outcome == LanguageOutcome::Created)
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|(_, outcome)| outcome.is_failure())
    }

    fn record(&mut self, language: String, outcome: LanguageOutcome) {
        match &outcome {
            LanguageOutcome::Failed(reason) => {
                tracing::error!(language = %language, reason = %reason, "Language failed");
            }
            other => tracing::info!(language = %language, outcome = %other, "Language processed"),
        }
        self.outcomes.push((language, outcome));
    }
}

/// Drives the differ, merger and pruner against a store and a translator.
#[derive(Debug)]
pub struct Orchestrator<S, T> {
    store: S,
    translator: T,
    default_language: String,
}

impl<S: LanguageStore, T: Translator> Orchestrator<S, T> {
    pub fn new(store: S, translator: T, default_language: impl Into<String>) -> Self {
        Self { store, translator, default_language: default_language.into() }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Create records for languages that do not have one yet.
    ///
    /// # Errors
    /// Returns error if the source language cannot be loaded.
    pub async fn translate<I, L>(&mut self, languages: I) -> Result<BatchReport, SyncError>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let source = self.load_source()?;
        let mut report = BatchReport::default();

        for language in dedup_languages(languages) {
            let outcome = self.create_language(&language, &source).await;
            report.record(language, outcome);
        }

        Ok(report)
    }

    /// Bring existing records in line with the source language, creating
    /// the ones that are missing.
    ///
    /// # Errors
    /// Returns error if the source language cannot be loaded.
    pub async fn update<I, L>(&mut self, languages: I) -> Result<BatchReport, SyncError>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let source = self.load_source()?;
        let mut report = BatchReport::default();

        for language in dedup_languages(languages) {
            let outcome = self.update_language(&language, &source).await;
            report.record(language, outcome);
        }

        Ok(report)
    }

    fn load_source(&self) -> Result<TranslationTree, SyncError> {
        let language = &self.default_language;
        match self.store.load(language) {
            Ok(Some(source)) => {
                tracing::debug!(language = %language, keys = source.leaf_count(), "Loaded source");
                Ok(source)
            }
            Ok(None) => Err(SyncError::MissingSource { language: language.clone() }),
            Err(source) => Err(SyncError::UnreadableSource { language: language.clone(), source }),
        }
    }

    async fn create_language(&mut self, language: &str, source: &TranslationTree) -> LanguageOutcome {
        if self.store.exists(language) {
            return LanguageOutcome::SkippedExists;
        }
        self.create_from_source(language, source).await
    }

    /// Translate the whole source and write it as `language`'s record.
    async fn create_from_source(
        &mut self,
        language: &str,
        source: &TranslationTree,
    ) -> LanguageOutcome {
        let translated = match self.translator.translate(source, language).await {
            Ok(translated) => translated,
            Err(e) => return LanguageOutcome::Failed(e.to_string()),
        };

        match self.store.save(language, &translated) {
            Ok(()) => LanguageOutcome::Created,
            Err(e) => LanguageOutcome::Failed(e.to_string()),
        }
    }

    async fn update_language(&mut self, language: &str, source: &TranslationTree) -> LanguageOutcome {
        if language == self.default_language {
            return LanguageOutcome::SkippedDefault;
        }

        let existing = match self.store.load(language) {
            Ok(Some(existing)) => existing,
            Ok(None) => return self.create_from_source(language, source).await,
            Err(e) => {
                tracing::warn!(
                    language = %language,
                    error = %e,
                    "Existing translation file is unreadable, recreating it"
                );
                return self.create_from_source(language, source).await;
            }
        };

        let changes = diff(source, &existing);
        if changes.is_empty() {
            return LanguageOutcome::UpToDate;
        }

        let content_removed = !changes.obsolete.is_empty();
        let content_added = !changes.missing.is_empty();
        tracing::debug!(
            language = %language,
            missing = changes.missing.leaf_count(),
            obsolete = changes.obsolete.len(),
            "Computed diff"
        );

        let mut updated =
            if content_removed { remove_keys(&existing, &changes.obsolete) } else { existing };

        if content_added {
            match self.translator.translate(&changes.missing, language).await {
                Ok(translated) => updated = deep_merge(&updated, &translated),
                Err(e) => return LanguageOutcome::Failed(e.to_string()),
            }
        }

        match self.store.save(language, &updated) {
            Ok(()) => LanguageOutcome::Updated { content_added, content_removed },
            Err(e) => LanguageOutcome::Failed(e.to_string()),
        }
    }
}

/// Drop repeated codes, keeping first occurrences in order.
fn dedup_languages<I, L>(languages: I) -> Vec<String>
where
    I: IntoIterator<Item = L>,
    L: AsRef<str>,
{
    let mut unique: Vec<String> = Vec::new();
    for language in languages {
        let language = language.as_ref();
        if !unique.iter().any(|seen| seen == language) {
            unique.push(language.to_string());
        }
    }
    unique
}
