//! Clinic API - Serviço REST de cadastro de pacientes e médicos
//!
//! Os handlers usam os repositórios de `clinic-db`; qualquer falha é
//! convertida em resposta HTTP por `error::ApiError`.

use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use error::{ApiError, ErrorResponse, ValidationError};
pub use state::AppState;

/// Aplicação completa, com estado e camadas de rastreamento
pub fn app(state: AppState) -> Router {
    routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Aplicação com as camadas de produção (limite de concorrência, CORS e
/// compressão)
pub fn app_with_layers(state: AppState, config: &AppConfig) -> Router {
    app(state)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(ConcurrencyLimitLayer::new(config.max_concurrent_requests))
}
