//! 設定ファイルの読み書き関数

use std::path::Path;

use serde_json::Value;

use super::{
    ConfigError,
    SyncSettings,
};

/// プロジェクトルートに置く設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".i18n-sync.json";

/// プロジェクトから設定を読み込む
///
/// `.i18n-sync.json` ファイルを探して読み込む
///
/// # Arguments
/// * `workspace_root` - プロジェクトのルートパス
///
/// # Returns
/// - `Ok(Some(settings))`: 設定ファイルが見つかり、読み込みに成功
/// - `Ok(None)`: 設定ファイルが見つからない
/// - `Err(ConfigError)`: ファイル読み込みまたはパースエラー
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<SyncSettings>, ConfigError> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let settings: SyncSettings = serde_json::from_str(&content)?;

    Ok(Some(settings))
}

/// 言語一覧をプロジェクトの設定ファイルに書き戻す
///
/// 既存ファイルは `languages` だけを差し替え、他のフィールドはそのまま残す。
/// ファイルが無い場合は設定全体を書き出す。一時ファイルに書いてから置き換える
pub(super) fn save_languages(
    workspace_root: &Path,
    settings: &SyncSettings,
) -> Result<(), ConfigError> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);

    let mut document = if config_path.exists() {
        serde_json::from_str::<Value>(&std::fs::read_to_string(&config_path)?)?
    } else {
        serde_json::to_value(settings)?
    };
    match document.as_object_mut() {
        Some(object) => {
            object.insert("languages".to_string(), serde_json::to_value(&settings.languages)?);
        }
        None => document = serde_json::to_value(settings)?,
    }

    let content = serde_json::to_string_pretty(&document)?;
    let tmp_path = config_path.with_extension("json.tmp");
    std::fs::write(&tmp_path, format!("{content}\n"))?;
    std::fs::rename(&tmp_path, &config_path)?;
    tracing::debug!("Saved configuration to: {:?}", config_path);

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    /// `load_from_workspace`: 設定ファイルが存在する場合
    #[rstest]
    fn test_load_from_workspace_with_valid_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"{"defaultLanguage": "de"}"#;
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), config_content).unwrap();

        let result = load_from_workspace(temp_dir.path());

        assert!(result.is_ok());
        let settings = result.unwrap();
        assert!(settings.is_some());
        assert_eq!(settings.unwrap().default_language, "de");
    }

    /// `load_from_workspace`: 設定ファイルが存在しない場合
    #[rstest]
    fn test_load_from_workspace_no_config_file() {
        let temp_dir = TempDir::new().unwrap();

        let result = load_from_workspace(temp_dir.path());

        assert!(result.is_ok());
        assert!(result.unwrap().is_none());
    }

    /// `load_from_workspace`: JSON パースエラー
    #[rstest]
    fn test_load_from_workspace_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "invalid json").unwrap();

        let result = load_from_workspace(temp_dir.path());

        assert!(result.is_err());
    }

    /// `save_languages`: 設定ファイルが無い場合は設定全体を書き出す
    #[rstest]
    fn test_save_languages_without_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let settings = SyncSettings {
            languages: vec!["en".to_string(), "fr".to_string()],
            ..SyncSettings::default()
        };

        save_languages(temp_dir.path(), &settings).unwrap();
        let loaded = load_from_workspace(temp_dir.path()).unwrap();

        assert_eq!(loaded, Some(settings));
        assert!(!temp_dir.path().join(".i18n-sync.json.tmp").exists());
    }

    /// `save_languages`: 未知のフィールドと他の設定値を残す
    #[rstest]
    fn test_save_languages_keeps_other_fields() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &config_path,
            r#"{"$schema": "./schema.json", "defaultLanguage": "ja", "languages": ["ja"], "owner": "docs-team"}"#,
        )
        .unwrap();
        let settings = SyncSettings {
            languages: vec!["en".to_string(), "ja".to_string()],
            ..SyncSettings::default()
        };

        save_languages(temp_dir.path(), &settings).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&config_path).unwrap()).unwrap();
        assert_eq!(written["$schema"], "./schema.json");
        assert_eq!(written["owner"], "docs-team");
        assert_eq!(written["defaultLanguage"], "ja");
        assert_eq!(written["languages"], serde_json::json!(["en", "ja"]));
        assert!(written.get("localesDir").is_none());
        let keys: Vec<&String> = written.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["$schema", "defaultLanguage", "languages", "owner"]);
    }
}
