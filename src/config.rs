//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration for the Arabic root analyzer, loaded from TOML
//! files with environment-variable overrides and validation.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files (TOML), environment variables
//! - **Output**: Validated configuration structs with defaults and overrides
//! - **Validation**: Type checking, range validation, dependency verification
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Command line arguments (highest priority, applied in `main`)
//! 2. Environment variables
//! 3. Configuration files
//! 4. Default values (lowest priority)
//!
//! ## Usage
//! ```rust,no_run
//! use arabic_root_analyzer::config::Config;
//!
//! let config = Config::from_file("config.toml").unwrap();
//! println!("Server port: {}", config.server.port);
//! ```

use crate::corpus::RootMatchPolicy;
use crate::errors::{AnalyzerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure containing all system settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server and API configuration
    pub server: ServerConfig,
    /// Corpus loading and indexing settings
    pub corpus: CorpusConfig,
    /// Analysis behavior
    pub analysis: AnalysisConfig,
    /// External collaborator endpoints
    pub external: ExternalConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server and API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Enable CORS for browser frontends
    pub enable_cors: bool,
}

/// Corpus loading and indexing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Verse corpus file (`surah|ayah|text` lines)
    pub corpus_path: PathBuf,
    /// Optional auxiliary root-set file, one root per line. When absent the
    /// root universe is derived from the corpus itself.
    pub roots_path: Option<PathBuf>,
    /// Bound on example verses per indexed root
    pub example_cap: usize,
    /// How verse tokens are matched against roots
    pub match_policy: RootMatchPolicy,
}

/// Analysis behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Wrap root letters of example verses in highlight markers
    pub highlight_examples: bool,
}

/// External collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalConfig {
    /// Hosted morphological analyzer
    pub analyzer: AnalyzerEndpointConfig,
    /// LLM translation service
    pub translator: TranslatorConfig,
}

/// Hosted analyzer endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerEndpointConfig {
    /// Enable the collaborator
    pub enabled: bool,
    /// Analyzer endpoint URL
    pub api_url: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

/// Translation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Enable the collaborator
    pub enabled: bool,
    /// Chat-completions endpoint URL
    pub api_url: String,
    /// API key (usually supplied via OPENAI_API_KEY)
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Response token cap
    pub max_tokens: u32,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable structured JSON logging
    pub json_format: bool,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::from_file("config.toml")
    }

    /// Load configuration from a specific file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("configuration file not found: {:?}, using defaults", path);
            let mut config = Self::default();
            config.apply_env_overrides()?;
            config.validate()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).map_err(|e| AnalyzerError::Config {
            message: format!("failed to read config file {:?}: {}", path, e),
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| AnalyzerError::Config {
            message: format!("failed to parse config file {:?}: {}", path, e),
        })?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("ARABIC_ANALYZER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("ARABIC_ANALYZER_PORT") {
            self.server.port = port.parse().map_err(|_| AnalyzerError::Config {
                message: "invalid port number in ARABIC_ANALYZER_PORT".to_string(),
            })?;
        }
        if let Ok(corpus_path) = std::env::var("ARABIC_ANALYZER_CORPUS_PATH") {
            self.corpus.corpus_path = PathBuf::from(corpus_path);
        }
        if let Ok(roots_path) = std::env::var("ARABIC_ANALYZER_ROOTS_PATH") {
            self.corpus.roots_path = Some(PathBuf::from(roots_path));
        }
        if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
            self.external.translator.api_key = Some(api_key);
        }

        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AnalyzerError::ValidationFailed {
                field: "server.port".to_string(),
                reason: "port cannot be zero".to_string(),
            });
        }

        if self.corpus.corpus_path.as_os_str().is_empty() {
            return Err(AnalyzerError::ValidationFailed {
                field: "corpus.corpus_path".to_string(),
                reason: "corpus path cannot be empty".to_string(),
            });
        }

        if self.corpus.example_cap == 0 {
            return Err(AnalyzerError::ValidationFailed {
                field: "corpus.example_cap".to_string(),
                reason: "example cap must be at least one".to_string(),
            });
        }

        if self.external.analyzer.enabled && self.external.analyzer.api_url.is_empty() {
            return Err(AnalyzerError::ValidationFailed {
                field: "external.analyzer.api_url".to_string(),
                reason: "analyzer endpoint required when enabled".to_string(),
            });
        }

        if self.external.translator.enabled && self.external.translator.api_url.is_empty() {
            return Err(AnalyzerError::ValidationFailed {
                field: "external.translator.api_url".to_string(),
                reason: "translation endpoint required when enabled".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                enable_cors: true,
            },
            corpus: CorpusConfig {
                corpus_path: PathBuf::from("./data/quraan.txt"),
                roots_path: None,
                example_cap: 3,
                match_policy: RootMatchPolicy::LetterSet,
            },
            analysis: AnalysisConfig {
                highlight_examples: true,
            },
            external: ExternalConfig {
                analyzer: AnalyzerEndpointConfig {
                    enabled: false,
                    api_url: String::new(),
                    timeout_seconds: 10,
                },
                translator: TranslatorConfig {
                    enabled: false,
                    api_url: "https://api.openai.com/v1/chat/completions".to_string(),
                    api_key: None,
                    model: "gpt-4o-mini".to_string(),
                    temperature: 0.3,
                    max_tokens: 150,
                    timeout_seconds: 30,
                },
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json_format: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_zero_example_cap_is_rejected() {
        let mut config = Config::default();
        config.corpus.example_cap = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_enabled_analyzer_requires_url() {
        let mut config = Config::default();
        config.external.analyzer.enabled = true;
        assert!(config.validate().is_err());

        config.external.analyzer.api_url = "http://localhost:9000/analyze".to_string();
        config.validate().unwrap();
    }

    #[test]
    fn test_roundtrips_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.corpus.example_cap, config.corpus.example_cap);
        assert_eq!(parsed.corpus.match_policy, config.corpus.match_policy);
    }
}
