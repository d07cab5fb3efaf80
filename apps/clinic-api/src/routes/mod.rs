//! Rotas HTTP da API

use axum::Router;

use crate::state::AppState;

pub mod doctors;
pub mod patients;

/// Junta as rotas de todos os recursos
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(patients::router())
        .merge(doctors::router())
}
