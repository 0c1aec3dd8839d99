//! One file per language under a locales directory

use std::fs;
use std::path::PathBuf;

use jsonc_parser::ParseOptions;
use serde::{
    Deserialize,
    Serialize,
};

use super::{
    LanguageStore,
    StoreError,
};
use crate::tree::TranslationTree;

/// Prefix of a JS module translation file.
const JS_MODULE_PREFIX: &str = "export default";

/// On-disk encoding of a language file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// `<lang>.json` holding the tree as a JSON object.
    #[default]
    Json,
    /// `<lang>.js` holding `export default { ... };`.
    Js,
}

impl FileFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Js => "js",
        }
    }

    /// Strip the module wrapper so the object literal can be parsed.
    fn unwrap_module(self, content: &str) -> &str {
        match self {
            Self::Json => content,
            Self::Js => {
                let body = find_module_export(content)
                    .and_then(|start| content.get(start + JS_MODULE_PREFIX.len()..))
                    .unwrap_or(content);
                body.trim().trim_end_matches(';')
            }
        }
    }

    fn render(self, json: &str) -> String {
        match self {
            Self::Json => format!("{json}\n"),
            Self::Js => format!("{JS_MODULE_PREFIX} {json};\n"),
        }
    }
}

/// Byte offset of the `export default` statement, ignoring comments and string literals.
fn find_module_export(content: &str) -> Option<usize> {
    let bytes = content.as_bytes();
    let marker = JS_MODULE_PREFIX.as_bytes();
    let mut i = 0;

    while let Some(rest) = bytes.get(i..) {
        let Some(&first) = rest.first() else { break };
        if rest.starts_with(b"//") {
            i += rest.iter().position(|&b| b == b'\n').unwrap_or(rest.len());
        } else if rest.starts_with(b"/*") {
            i += rest.windows(2).skip(2).position(|w| w == b"*/").map_or(rest.len(), |end| end + 4);
        } else if matches!(first, b'"' | b'\'' | b'`') {
            i += quoted_len(rest, first);
        } else if rest.starts_with(marker)
            && !i.checked_sub(1).and_then(|prev| bytes.get(prev)).is_some_and(|&b| is_ident_byte(b))
            && !rest.get(marker.len()).is_some_and(|&b| is_ident_byte(b))
        {
            return Some(i);
        } else {
            i += 1;
        }
    }

    None
}

/// Length of the quoted literal at the start of `rest`, quotes included.
fn quoted_len(rest: &[u8], quote: u8) -> usize {
    let mut escaped = false;
    rest.iter()
        .skip(1)
        .position(|&b| {
            let closes = !escaped && b == quote;
            escaped = !escaped && b == b'\\';
            closes
        })
        .map_or(rest.len(), |end| end + 2)
}

/// Identifier characters that make `export default` part of a longer word.
const fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Language records stored as `<dir>/<lang>.<ext>`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    format: FileFormat,
}

impl FileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, format: FileFormat) -> Self {
        Self { dir: dir.into(), format }
    }

    #[must_use]
    pub fn path_for(&self, language: &str) -> PathBuf {
        self.dir.join(format!("{language}.{}", self.format.extension()))
    }

    fn parse(&self, language: &str, content: &str) -> Result<TranslationTree, StoreError> {
        let body = self.format.unwrap_module(content);
        let value = jsonc_parser::parse_to_serde_value(body, &ParseOptions::default())
            .map_err(|e| StoreError::Parse { language: language.to_string(), message: e.to_string() })?
            .ok_or_else(|| StoreError::Parse {
                language: language.to_string(),
                message: "file is empty".to_string(),
            })?;

        TranslationTree::from_value(value)
            .map_err(|source| StoreError::Tree { language: language.to_string(), source })
    }
}

impl LanguageStore for FileStore {
    fn exists(&self, language: &str) -> bool {
        self.path_for(language).is_file()
    }

    fn load(&self, language: &str) -> Result<Option<TranslationTree>, StoreError> {
        let path = self.path_for(language);
        if !path.is_file() {
            tracing::debug!(language = %language, path = %path.display(), "No language file");
            return Ok(None);
        }

        tracing::debug!(language = %language, path = %path.display(), "Loading language file");
        let content = fs::read_to_string(&path)?;
        self.parse(language, &content).map(Some)
    }

    fn save(&mut self, language: &str, tree: &TranslationTree) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(language);
        let json = serde_json::to_string_pretty(tree)?;

        // Whole-file replace: a reader sees the old file or the new one.
        let tmp_path = path.with_extension(format!("{}.tmp", self.format.extension()));
        fs::write(&tmp_path, self.format.render(&json))?;
        fs::rename(&tmp_path, &path)?;

        tracing::debug!(language = %language, path = %path.display(), "Saved language file");
        Ok(())
    }

    fn languages(&self) -> Result<Vec<String>, StoreError> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut languages = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(self.format.extension()) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                languages.push(stem.to_string());
            }
        }

        languages.sort();
        Ok(languages)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::tree::{
        TranslationNode,
        tree,
    };

    #[rstest]
    fn test_save_then_load_json() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(temp_dir.path().join("locales"), FileFormat::Json);
        let t = tree(json!({ "b": "2", "a": { "c": "3" } }));

        store.save("fr", &t).unwrap();

        assert!(store.exists("fr"));
        assert_eq!(store.load("fr").unwrap(), Some(t));
        let written = fs::read_to_string(temp_dir.path().join("locales/fr.json")).unwrap();
        assert!(written.starts_with("{\n  \"b\": \"2\""));
        assert!(written.ends_with("}\n"));
    }

    #[rstest]
    fn test_save_then_load_js_module() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(temp_dir.path(), FileFormat::Js);
        let t = tree(json!({ "hello": "Bonjour" }));

        store.save("fr", &t).unwrap();

        let written = fs::read_to_string(temp_dir.path().join("fr.js")).unwrap();
        assert!(written.starts_with("export default {"));
        assert!(written.ends_with("};\n"));
        assert_eq!(store.load("fr").unwrap(), Some(t));
    }

    #[rstest]
    fn test_load_hand_written_js_module() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("en.js"),
            "// greetings\nexport default {\n  hello: \"Hello\",\n  nested: { bye: \"Bye\" },\n};\n",
        )
        .unwrap();
        let store = FileStore::new(temp_dir.path(), FileFormat::Js);

        let loaded = store.load("en").unwrap();

        assert_eq!(loaded, Some(tree(json!({ "hello": "Hello", "nested": { "bye": "Bye" } }))));
    }

    #[rstest]
    #[case::line_comment("// keep the export default below\nexport default { title: \"Titre soigne\" };\n")]
    #[case::block_comment("/* export default is generated */\nexport default {\n  title: \"Titre soigne\",\n};\n")]
    #[case::string_value("export default { title: \"Titre soigne\", note: \"export default\" };")]
    fn test_load_js_module_ignores_marker_outside_statement(#[case] content: &str) {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("fr.js"), content).unwrap();
        let store = FileStore::new(temp_dir.path(), FileFormat::Js);

        let loaded = store.load("fr").unwrap().unwrap();

        assert_eq!(loaded.get("title").and_then(TranslationNode::as_leaf), Some("Titre soigne"));
    }

    #[rstest]
    #[case::leading_line_comment("// header\nexport default {}", Some(10))]
    #[case::identifier_suffix("const myexport default_x = 1;", None)]
    #[case::unterminated_comment("/* export default", None)]
    #[case::absent("{}", None)]
    #[case::escaped_quote(r#"const s = "\" export default"; export default {}"#, Some(31))]
    fn test_find_module_export(#[case] content: &str, #[case] expected: Option<usize>) {
        assert_eq!(find_module_export(content), expected);
    }

    #[rstest]
    fn test_load_missing_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path(), FileFormat::Json);

        assert!(!store.exists("de"));
        assert!(store.load("de").unwrap().is_none());
    }

    #[rstest]
    #[case::syntax("{ not json")]
    #[case::empty("")]
    #[case::array_leaf(r#"{ "a": ["x"] }"#)]
    fn test_load_malformed_is_error(#[case] content: &str) {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("fr.json"), content).unwrap();
        let store = FileStore::new(temp_dir.path(), FileFormat::Json);

        let result = store.load("fr");

        assert_that!(result.unwrap_err().to_string(), contains_substring("'fr'"));
    }

    #[rstest]
    fn test_languages_lists_matching_files_sorted() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["fr.json", "en.json", "de.json", "notes.txt", "es.js"] {
            fs::write(temp_dir.path().join(name), "{}").unwrap();
        }
        fs::create_dir(temp_dir.path().join("nested.json")).unwrap();
        let store = FileStore::new(temp_dir.path(), FileFormat::Json);

        let languages = store.languages().unwrap();

        assert_that!(languages, elements_are![eq("de"), eq("en"), eq("fr")]);
    }

    #[rstest]
    fn test_languages_of_missing_dir_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("absent"), FileFormat::Json);

        assert!(store.languages().unwrap().is_empty());
    }
}
