//! # API Server Module
//!
//! ## Purpose
//! REST API server exposing the analysis service over HTTP. Thin plumbing:
//! validation, delegation to `AnalysisService`, and status-code mapping.
//! No morphology logic lives here.
//!
//! ## Input/Output Specification
//! - **Input**: HTTP requests with a single Arabic word
//! - **Output**: JSON analysis responses, health and statistics payloads
//! - **Endpoints**: `POST /analyze`, `GET /health`, `GET /stats`, `GET /`
//!
//! ## Key Features
//! - CORS support for web frontends
//! - Error taxonomy mapped to HTTP statuses: InvalidInput → 400,
//!   NotFound → 404, everything else → 500
//! - Translation fetched by the handler (orchestration layer), never from
//!   the resolution path

use crate::analysis::AnalysisResult;
use crate::errors::{AnalyzerError, Result};
use crate::utils::Timer;
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::{Deserialize, Serialize};

/// API server wrapping the shared application state
pub struct ApiServer {
    app_state: crate::AppState,
}

/// Analysis request payload
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub word: String,
}

/// Analysis response payload
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub analysis: AnalysisResult,
    /// Present when the translation collaborator is configured and reachable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    pub query_time_ms: u64,
}

/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub verse_count: usize,
    pub root_count: usize,
}

impl ApiServer {
    /// Create new API server
    pub async fn new(app_state: crate::AppState) -> Result<Self> {
        Ok(Self { app_state })
    }

    /// Run the API server
    pub async fn run(self) -> Result<()> {
        let bind_addr = format!(
            "{}:{}",
            self.app_state.config.server.host, self.app_state.config.server.port
        );
        let enable_cors = self.app_state.config.server.enable_cors;

        tracing::info!("starting API server on {}", bind_addr);

        let server = HttpServer::new(move || {
            let cors = if enable_cors {
                Cors::permissive()
            } else {
                Cors::default()
            };

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(self.app_state.clone()))
                .route("/analyze", web::post().to(analyze_handler))
                .route("/health", web::get().to(health_handler))
                .route("/stats", web::get().to(stats_handler))
                .route("/", web::get().to(index_handler))
        })
        .bind(&bind_addr)
        .map_err(|e| AnalyzerError::Internal {
            message: format!("failed to bind server to {}: {}", bind_addr, e),
        })?
        .run();

        server.await.map_err(|e| AnalyzerError::Internal {
            message: format!("server error: {}", e),
        })?;

        Ok(())
    }
}

/// Analysis endpoint handler
async fn analyze_handler(
    app_state: web::Data<crate::AppState>,
    request: web::Json<AnalyzeRequest>,
) -> ActixResult<HttpResponse> {
    let timer = Timer::new("analyze");

    match app_state.analysis.analyze_blended(&request.word).await {
        Ok(analysis) => {
            let translation = match &app_state.translator {
                Some(translator) => {
                    match translator.translate(&analysis.word, &analysis.root).await {
                        Ok(text) => Some(text),
                        Err(e) => {
                            tracing::warn!("translation unavailable: {}", e);
                            None
                        }
                    }
                }
                None => None,
            };

            Ok(HttpResponse::Ok().json(AnalyzeResponse {
                analysis,
                translation,
                query_time_ms: timer.stop(),
            }))
        }
        Err(e @ AnalyzerError::InvalidInput { .. }) => {
            Ok(HttpResponse::BadRequest().json(ErrorResponse {
                error: e.to_string(),
            }))
        }
        Err(e @ AnalyzerError::NotFound { .. }) => {
            Ok(HttpResponse::NotFound().json(ErrorResponse {
                error: e.to_string(),
            }))
        }
        Err(e) => {
            tracing::error!("analysis error ({}): {}", e.category(), e);
            Ok(HttpResponse::InternalServerError().json(ErrorResponse {
                error: "an internal error occurred".to_string(),
            }))
        }
    }
}

/// Health check endpoint handler
async fn health_handler(app_state: web::Data<crate::AppState>) -> ActixResult<HttpResponse> {
    let stats = app_state.analysis.corpus_stats();

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        verse_count: stats.verse_count,
        root_count: stats.root_count,
    }))
}

/// Statistics endpoint handler
async fn stats_handler(app_state: web::Data<crate::AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(app_state.analysis.corpus_stats()))
}

/// Index page handler
async fn index_handler() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Arabic root analyzer backend is running."))
}
