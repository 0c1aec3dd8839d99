//! Command line interface

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{
    Args,
    Parser,
    Subcommand,
};
use thiserror::Error;

use crate::config::{
    ConfigError,
    ConfigManager,
    SyncSettings,
};
use crate::context::I18nContext;
use crate::orchestrator::{
    BatchReport,
    Orchestrator,
    SyncError,
};
use crate::store::{
    FileStore,
    LanguageStore,
    StoreError,
};
use crate::translator::{
    Credentials,
    HttpTranslator,
    TranslatorError,
};

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Translator(#[from] TranslatorError),

    #[error("Missing credential: pass --{flag} or set {env}")]
    MissingCredential { flag: &'static str, env: &'static str },

    #[error(
        "No translation endpoint: set translator.endpoint in .i18n-sync.json or pass --endpoint"
    )]
    MissingEndpoint,
}

#[derive(Debug, Parser)]
#[command(name = "i18n-sync", version, about = "Keep translation files in sync with a base language")]
pub struct Cli {
    /// Project root containing `.i18n-sync.json`
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Log at debug level (overridden by `RUST_LOG`)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create translation files for languages that do not have one
    Translate {
        #[arg(required = true)]
        languages: Vec<String>,

        #[command(flatten)]
        remote: RemoteArgs,
    },

    /// Sync existing translation files with the default language
    ///
    /// Without languages, every registered or persisted language is updated.
    Update {
        languages: Vec<String>,

        #[command(flatten)]
        remote: RemoteArgs,
    },

    /// Print the translation of a key
    Get {
        key: String,

        /// Language to look up (default language if omitted)
        #[arg(long)]
        lang: Option<String>,
    },

    /// List languages that have a translation file
    Languages,
}

#[derive(Debug, Args)]
pub struct RemoteArgs {
    #[arg(long, env = "I18N_SYNC_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    #[arg(long, env = "I18N_SYNC_ACCOUNT_ID")]
    account_id: Option<String>,

    /// Translation API URL (overrides translator.endpoint)
    #[arg(long, env = "I18N_SYNC_ENDPOINT")]
    endpoint: Option<String>,
}

impl RemoteArgs {
    fn translator(&self, settings: &SyncSettings) -> Result<HttpTranslator, CliError> {
        let api_token = required(self.api_token.as_deref(), "api-token", "I18N_SYNC_API_TOKEN")?;
        let account_id = required(self.account_id.as_deref(), "account-id", "I18N_SYNC_ACCOUNT_ID")?;
        let endpoint = self
            .endpoint
            .clone()
            .or_else(|| settings.translator.endpoint.clone())
            .ok_or(CliError::MissingEndpoint)?;

        Ok(HttpTranslator::new(
            endpoint,
            &settings.translator,
            Credentials::new(api_token, account_id),
        )?)
    }
}

fn required(
    value: Option<&str>,
    flag: &'static str,
    env: &'static str,
) -> Result<String, CliError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(CliError::MissingCredential { flag, env })
}

/// Run a parsed command.
///
/// # Errors
/// Returns error on invalid configuration, missing credentials, or when the
/// source language cannot be read.
pub async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let mut config = ConfigManager::new();
    config.load_settings(Some(cli.root))?;
    let settings = config.get_settings().clone();
    let store = FileStore::new(config.locales_path(), settings.file_format);

    match cli.command {
        Command::Translate { languages, remote } => {
            let translator = remote.translator(&settings)?;
            let mut orchestrator =
                Orchestrator::new(store, translator, settings.default_language.as_str());
            let report = orchestrator.translate(&languages).await?;
            finish_batch(&report, orchestrator.store(), &mut config)
        }
        Command::Update { languages, remote } => {
            let languages =
                if languages.is_empty() { update_targets(&settings, &store)? } else { languages };
            if languages.is_empty() {
                tracing::info!("No languages to update");
                return Ok(ExitCode::SUCCESS);
            }

            let translator = remote.translator(&settings)?;
            let mut orchestrator =
                Orchestrator::new(store, translator, settings.default_language.as_str());
            let report = orchestrator.update(&languages).await?;
            finish_batch(&report, orchestrator.store(), &mut config)
        }
        Command::Get { key, lang } => {
            let language = lang.as_deref().unwrap_or(&settings.default_language);
            let mut context =
                I18nContext::new(settings.default_language.as_str(), settings.key_separator.as_str());
            context.init(&store, language)?;
            print_lines([context.t(&key)]);
            Ok(ExitCode::SUCCESS)
        }
        Command::Languages => {
            print_lines(store.languages()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Languages an argument-less `update` works on: the registry followed by any
/// other persisted language, without the default language.
fn update_targets<S: LanguageStore>(
    settings: &SyncSettings,
    store: &S,
) -> Result<Vec<String>, StoreError> {
    let mut targets: Vec<String> = Vec::new();
    for language in settings.languages.iter().cloned().chain(store.languages()?) {
        if language != settings.default_language && !targets.contains(&language) {
            targets.push(language);
        }
    }
    Ok(targets)
}

fn finish_batch<S: LanguageStore>(
    report: &BatchReport,
    store: &S,
    config: &mut ConfigManager,
) -> Result<ExitCode, CliError> {
    print_lines(report.outcomes().iter().map(|(language, outcome)| format!("{language}: {outcome}")));

    if report.registry_stale() {
        config.refresh_languages(store.languages()?)?;
    }

    Ok(if report.has_failures() { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

#[allow(clippy::print_stdout)]
fn print_lines<I: IntoIterator<Item = String>>(lines: I) {
    for line in lines {
        println!("{line}");
    }
}
