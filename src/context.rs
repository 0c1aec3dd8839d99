//! Runtime translation lookup
//!
//! [`I18nContext`] owns the current language and the trees loaded so far.
//! Callers create it, [`init`](I18nContext::init) it against a store and
//! [`reset`](I18nContext::reset) it when they are done; nothing is global.

use std::collections::HashMap;

use crate::store::{
    LanguageStore,
    StoreError,
};
use crate::tree::{
    KeyPath,
    TranslationTree,
    get_by_path,
};

#[derive(Debug, Clone)]
pub struct I18nContext {
    default_language: String,
    current_language: String,
    key_separator: String,
    cache: HashMap<String, TranslationTree>,
}

impl I18nContext {
    #[must_use]
    pub fn new(default_language: impl Into<String>, key_separator: impl Into<String>) -> Self {
        let default_language = default_language.into();
        Self {
            current_language: default_language.clone(),
            default_language,
            key_separator: key_separator.into(),
            cache: HashMap::new(),
        }
    }

    /// Load the default language and switch to `language`.
    ///
    /// # Errors
    /// Returns error if a record exists but cannot be read.
    pub fn init<S: LanguageStore>(&mut self, store: &S, language: &str) -> Result<(), StoreError> {
        let default_language = self.default_language.clone();
        self.ensure_loaded(store, &default_language)?;
        self.set_language(store, language)
    }

    /// Switch the current language, loading its record if needed.
    ///
    /// A language without a record falls back to the default language on
    /// every lookup.
    ///
    /// # Errors
    /// Returns error if a record exists but cannot be read.
    pub fn set_language<S: LanguageStore>(
        &mut self,
        store: &S,
        language: &str,
    ) -> Result<(), StoreError> {
        self.ensure_loaded(store, language)?;
        self.current_language = language.to_string();
        Ok(())
    }

    fn ensure_loaded<S: LanguageStore>(&mut self, store: &S, language: &str) -> Result<(), StoreError> {
        if self.cache.contains_key(language) {
            return Ok(());
        }
        match store.load(language)? {
            Some(tree) => {
                self.cache.insert(language.to_string(), tree);
            }
            None => tracing::debug!(language = %language, "No translations for language"),
        }
        Ok(())
    }

    #[must_use]
    pub fn current_language(&self) -> &str {
        &self.current_language
    }

    #[must_use]
    pub fn is_loaded(&self, language: &str) -> bool {
        self.cache.contains_key(language)
    }

    /// Translate `key` in the current language.
    ///
    /// Falls back to the default language, then to an empty string.
    #[must_use]
    pub fn t(&self, key: &str) -> String {
        let path = KeyPath::parse(key, &self.key_separator);
        let fallback = self
            .cache
            .get(&self.default_language)
            .map(|tree| get_by_path(tree, &path, ""))
            .unwrap_or_default();

        match self.cache.get(&self.current_language) {
            Some(tree) => get_by_path(tree, &path, &fallback),
            None => fallback,
        }
    }

    /// Drop every loaded tree and return to the default language.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.current_language.clone_from(&self.default_language);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::{
        fixture,
        rstest,
    };
    use serde_json::json;

    use super::*;
    use crate::store::MemoryStore;
    use crate::tree::tree;

    #[fixture]
    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_record("en", tree(json!({ "common": { "hello": "Hello", "bye": "Bye" } })))
            .with_record("fr", tree(json!({ "common": { "hello": "Bonjour" } })))
    }

    #[rstest]
    fn test_lookup_in_current_language(store: MemoryStore) {
        let mut ctx = I18nContext::new("en", ".");
        ctx.init(&store, "fr").unwrap();

        assert_that!(ctx.current_language(), eq("fr"));
        assert_eq!(ctx.t("common.hello"), "Bonjour");
    }

    #[rstest]
    #[case::missing_in_current("common.bye", "Bye")]
    #[case::missing_everywhere("common.nope", "")]
    #[case::subtree("common", "")]
    fn test_lookup_falls_back(store: MemoryStore, #[case] key: &str, #[case] expected: &str) {
        let mut ctx = I18nContext::new("en", ".");
        ctx.init(&store, "fr").unwrap();

        assert_eq!(ctx.t(key), expected);
    }

    #[rstest]
    fn test_unknown_language_uses_default(store: MemoryStore) {
        let mut ctx = I18nContext::new("en", ".");
        ctx.init(&store, "ja").unwrap();

        assert_eq!(ctx.t("common.hello"), "Hello");
        assert!(!ctx.is_loaded("ja"));
    }

    #[rstest]
    fn test_custom_separator(store: MemoryStore) {
        let mut ctx = I18nContext::new("en", ":");
        ctx.init(&store, "en").unwrap();

        assert_eq!(ctx.t("common:hello"), "Hello");
        assert_eq!(ctx.t("common.hello"), "");
    }

    #[rstest]
    fn test_reset_clears_cache_and_language(store: MemoryStore) {
        let mut ctx = I18nContext::new("en", ".");
        ctx.init(&store, "fr").unwrap();

        ctx.reset();

        assert_that!(ctx.current_language(), eq("en"));
        assert_that!(ctx.is_loaded("fr"), eq(false));
        assert_eq!(ctx.t("common.hello"), "");
    }

    #[rstest]
    fn test_uninitialised_context_returns_empty() {
        let ctx = I18nContext::new("en", ".");

        assert_eq!(ctx.t("common.hello"), "");
    }
}
