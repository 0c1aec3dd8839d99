//! 設定管理を行うモジュール

use std::path::PathBuf;

use super::{
    ConfigError,
    SyncSettings,
    loader,
};

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: SyncSettings,

    /// プロジェクトのルートパス
    workspace_root: Option<PathBuf>,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: SyncSettings::default(), workspace_root: None }
    }

    /// 設定を読み込む
    ///
    /// # Arguments
    /// * `workspace_root` - プロジェクトのルートパス
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, workspace_root: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for workspace: {:?}", workspace_root);

        let settings = if let Some(root) = &workspace_root {
            loader::load_from_workspace(root)?.map_or_else(SyncSettings::default, |ws| {
                tracing::debug!("Loaded workspace settings: {:?}", ws);
                ws
            })
        } else {
            SyncSettings::default()
        };

        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        self.workspace_root = workspace_root;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// 言語一覧を置き換えて設定ファイルに書き戻す
    ///
    /// ワークスペースが無い場合はメモリ上の設定だけを更新する
    pub fn refresh_languages(&mut self, mut languages: Vec<String>) -> Result<(), ConfigError> {
        languages.sort();
        languages.dedup();

        if languages == self.current_settings.languages {
            tracing::debug!("Language registry unchanged");
            return Ok(());
        }

        tracing::info!(languages = ?languages, "Refreshing language registry");
        self.current_settings.languages = languages;

        if let Some(root) = &self.workspace_root {
            loader::save_languages(root, &self.current_settings)?;
        }

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &SyncSettings {
        &self.current_settings
    }

    /// 言語ファイルのディレクトリ
    ///
    /// ワークスペースが無い場合はカレントディレクトリ基準
    #[must_use]
    pub fn locales_path(&self) -> PathBuf {
        let locales_dir = &self.current_settings.locales_dir;
        self.workspace_root.as_ref().map_or_else(|| locales_dir.clone(), |root| root.join(locales_dir))
    }
}
