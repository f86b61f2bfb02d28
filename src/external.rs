//! # External Collaborators Module
//!
//! ## Purpose
//! Capability interfaces for the two external collaborators, the hosted
//! morphological analyzer and the LLM translation service, together with
//! their reqwest-backed client implementations.
//!
//! ## Input/Output Specification
//! - **Input**: A single Arabic word (and, for translation, its root)
//! - **Output**: Independently sourced analyses / a short translation text
//! - **Failure**: Degradable; callers treat collaborator errors as absence
//!
//! ## Key Features
//! - Collaborators are injected at the orchestration layer and never called
//!   from the normalizer, segmenter, resolver or corpus index
//! - The external analyzer is a second opinion, merged but never reconciled
//!   with the core's own resolution
//! - Per-request timeouts live here, not in the core

use crate::config::{AnalyzerEndpointConfig, TranslatorConfig};
use crate::errors::{AnalyzerError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const TRANSLATION_SYSTEM_PROMPT: &str = "You are an expert in Arabic linguistics and \
etymology. Provide a concise English translation and a brief explanation of the word's \
origin from its root.";

/// One analysis produced by the external analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalAnalysis {
    pub root: String,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub prefixes: Vec<String>,
    #[serde(default)]
    pub suffixes: Vec<String>,
    #[serde(default)]
    pub stem: Option<String>,
    #[serde(default)]
    pub pos: Option<String>,
}

/// Hosted morphological analyzer capability
#[async_trait]
pub trait ExternalAnalyzer: Send + Sync {
    async fn analyze(&self, word: &str) -> Result<Vec<ExternalAnalysis>>;
}

/// Translation capability, invoked by the orchestration layer only
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, word: &str, root: &str) -> Result<String>;
}

/// HTTP client for the hosted analyzer: posts `{"word": ...}` and expects a
/// JSON array of analyses
pub struct HttpAnalyzer {
    client: reqwest::Client,
    api_url: String,
}

impl HttpAnalyzer {
    pub fn new(config: &AnalyzerEndpointConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
        })
    }
}

#[async_trait]
impl ExternalAnalyzer for HttpAnalyzer {
    async fn analyze(&self, word: &str) -> Result<Vec<ExternalAnalysis>> {
        let response = self
            .client
            .post(&self.api_url)
            .json(&serde_json::json!({ "word": word }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AnalyzerError::ExternalAnalyzer {
                details: format!("analyzer returned status {}", response.status()),
            });
        }

        Ok(response.json().await?)
    }
}

/// Chat-completions client for translation. Speaks the OpenAI-compatible
/// wire format; endpoint, model and sampling settings come from
/// configuration.
pub struct ChatTranslator {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl ChatTranslator {
    pub fn new(config: &TranslatorConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl Translator for ChatTranslator {
    async fn translate(&self, word: &str, root: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "messages": [
                { "role": "system", "content": TRANSLATION_SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": format!(
                        "Analyze the Arabic word '{word}' which comes from the root '{root}'."
                    ),
                },
            ],
        });

        let mut request = self.client.post(&self.api_url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(AnalyzerError::Translation {
                details: format!("translation API returned status {}", response.status()),
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AnalyzerError::Translation {
                details: "no choice or message returned".to_string(),
            })
    }
}
