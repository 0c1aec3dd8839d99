//! json-i18n-sync
//!
//! Keeps per-language translation files structurally in sync with a base
//! language: missing content is sent to a translation service, obsolete keys
//! are pruned, and every file is rewritten whole.

pub mod cli;
pub mod config;
pub mod context;
pub mod logging;
pub mod orchestrator;
pub mod store;
pub mod translator;
pub mod tree;

pub use context::I18nContext;
pub use orchestrator::{
    BatchReport,
    LanguageOutcome,
    Orchestrator,
    SyncError,
};
