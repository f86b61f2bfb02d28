//! # Arabic Root Analyzer Main Driver
//!
//! ## Purpose
//! Main entry point for the analyzer server. Orchestrates initialization of
//! all system components and starts the web server for handling analysis
//! requests.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files, command line arguments, environment
//!   variables
//! - **Output**: Running web server with analysis API endpoints
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging and tracing
//! 3. Load the corpus and build the root-occurrence index (sequential,
//!    before serving begins)
//! 4. Wire up the analysis service and optional collaborators
//! 5. Start the API server
//! 6. Handle shutdown signals gracefully

use clap::{Arg, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arabic_root_analyzer::{
    analysis::AnalysisService,
    api::ApiServer,
    config::Config,
    corpus::{self, CorpusIndex},
    errors::{AnalyzerError, Result},
    external::{ChatTranslator, ExternalAnalyzer, HttpAnalyzer, Translator},
    utils::Timer,
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("arabic-analyzer-server")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Arabic morphological analyzer with a Quranic root occurrence index")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Server port")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("corpus")
                .long("corpus")
                .value_name("FILE")
                .help("Corpus file path override"),
        )
        .get_matches();

    // Load configuration
    let config_path = matches.get_one::<String>("config").unwrap();
    let mut config = Config::from_file(config_path)?;

    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }
    if let Some(corpus_path) = matches.get_one::<String>("corpus") {
        config.corpus.corpus_path = PathBuf::from(corpus_path);
    }

    let config = Arc::new(config);

    init_logging(&config)?;

    info!(
        "starting Arabic Root Analyzer v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!("configuration loaded from: {}", config_path);

    // Initialize application components
    let app_state = initialize_components(config.clone())?;

    // Start the API server
    let server = ApiServer::new(app_state).await?;
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            error!("server error: {}", e);
        }
    });

    info!(
        "Arabic Root Analyzer listening on {}:{}",
        config.server.host, config.server.port
    );

    // Wait for shutdown signal
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("received SIGINT, shutting down gracefully...");
        }
        _ = server_handle => {
            warn!("server stopped unexpectedly");
        }
    }

    info!("Arabic Root Analyzer shut down successfully");
    Ok(())
}

/// Initialize logging and tracing
fn init_logging(config: &Config) -> Result<()> {
    // validate the configured level before handing it to the filter
    config
        .logging
        .level
        .parse::<tracing::Level>()
        .map_err(|_| AnalyzerError::Config {
            message: format!("invalid log level: {}", config.logging.level),
        })?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    if config.logging.json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }

    Ok(())
}

/// Build the corpus index and wire up the analysis service and collaborators
fn initialize_components(config: Arc<Config>) -> Result<AppState> {
    info!("building corpus index...");
    let timer = Timer::new("corpus-build");

    let roots = match &config.corpus.roots_path {
        Some(path) => Some(corpus::load_root_set(path)?),
        None => None,
    };

    let index = Arc::new(CorpusIndex::load(
        &config.corpus.corpus_path,
        roots.as_ref(),
        config.corpus.match_policy,
        config.corpus.example_cap,
    )?);
    timer.stop();

    let mut analysis = AnalysisService::new(index, config.analysis.highlight_examples);

    if config.external.analyzer.enabled {
        info!(
            "external analyzer enabled: {}",
            config.external.analyzer.api_url
        );
        let analyzer: Arc<dyn ExternalAnalyzer> =
            Arc::new(HttpAnalyzer::new(&config.external.analyzer)?);
        analysis = analysis.with_external(analyzer);
    }

    let translator: Option<Arc<dyn Translator>> = if config.external.translator.enabled {
        info!(
            "translation service enabled: {}",
            config.external.translator.model
        );
        Some(Arc::new(ChatTranslator::new(&config.external.translator)?))
    } else {
        None
    };

    Ok(AppState {
        config,
        analysis: Arc::new(analysis),
        translator,
    })
}
