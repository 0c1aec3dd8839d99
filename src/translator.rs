//! Remote translation service client

use std::fmt;
use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::TranslatorConfig;
use crate::tree::TranslationTree;

#[derive(Error, Debug)]
pub enum TranslatorError {
    #[error("Translation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Translation service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed translation response: {0}")]
    MalformedResponse(String),
}

impl TranslatorError {
    /// Transport failures, throttling and server errors may succeed on retry.
    const fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::MalformedResponse(_) => false,
        }
    }
}

/// Translates a whole tree into one target language.
pub trait Translator {
    fn translate(
        &self,
        tree: &TranslationTree,
        target_language: &str,
    ) -> impl Future<Output = Result<TranslationTree, TranslatorError>> + Send;
}

/// Account credentials forwarded with every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_token: String,
    pub account_id: String,
}

impl Credentials {
    #[must_use]
    pub fn new(api_token: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self { api_token: api_token.into(), account_id: account_id.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_token", &"<redacted>")
            .field("account_id", &self.account_id)
            .finish()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateRequest<'a> {
    data: &'a TranslationTree,
    target_language: &'a str,
    api_token: &'a str,
    account_id: &'a str,
}

/// [`Translator`] backed by a JSON-over-HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpTranslator {
    client: Client,
    endpoint: String,
    credentials: Credentials,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpTranslator {
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        config: &TranslatorConfig,
        credentials: Credentials,
    ) -> Result<Self, TranslatorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            credentials,
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    async fn request_once(
        &self,
        tree: &TranslationTree,
        target_language: &str,
    ) -> Result<TranslationTree, TranslatorError> {
        let request = TranslateRequest {
            data: tree,
            target_language,
            api_token: &self.credentials.api_token,
            account_id: &self.credentials.account_id,
        };

        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslatorError::Status { status: status.as_u16(), body });
        }

        let bytes = response.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)
            .map_err(|e| TranslatorError::MalformedResponse(format!("body is not JSON: {e}")))?;
        parse_response(body)
    }
}

/// Extract `translatedData` from a success body.
fn parse_response(body: Value) -> Result<TranslationTree, TranslatorError> {
    let Value::Object(mut map) = body else {
        return Err(TranslatorError::MalformedResponse("body is not a JSON object".to_string()));
    };
    let translated = map.remove("translatedData").ok_or_else(|| {
        TranslatorError::MalformedResponse("missing 'translatedData'".to_string())
    })?;

    TranslationTree::from_value(translated)
        .map_err(|e| TranslatorError::MalformedResponse(e.to_string()))
}

impl Translator for HttpTranslator {
    async fn translate(
        &self,
        tree: &TranslationTree,
        target_language: &str,
    ) -> Result<TranslationTree, TranslatorError> {
        let mut attempt = 0;
        loop {
            tracing::debug!(
                language = %target_language,
                keys = tree.leaf_count(),
                attempt,
                "Requesting translation"
            );

            match self.request_once(tree, target_language).await {
                Ok(translated) => return Ok(translated),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        language = %target_language,
                        error = %e,
                        attempt,
                        "Translation request failed, retrying"
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
