//! Endpoints de pacientes (`/pacientes`)

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use clinic_db::models::{
    NewPatient, PatientDetail, PatientListItem, PatientRegistration, PatientUpdate,
};
use clinic_db::models::validation::require;
use clinic_db::Page;

use crate::error::ApiError;
use crate::extract::{EntityId, PageParams, ValidatedJson, ValidatedQuery};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pacientes", get(list).post(register).put(update))
        .route("/pacientes/:id", get(detail).delete(remove))
}

async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<PatientRegistration>,
) -> Result<impl IntoResponse, ApiError> {
    let new_patient = NewPatient::try_from(payload).map_err(ApiError::field_validation)?;
    let patient = state.patients.save(new_patient).await?;

    let location = format!("/pacientes/{}", patient.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(PatientDetail::from(&patient)),
    ))
}

async fn list(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<PageParams>,
) -> Result<Json<Page<PatientListItem>>, ApiError> {
    let request = params.into_page_request()?;
    let page = state.patients.find_all_by_active_true(&request).await?;
    Ok(Json(page.map(|patient| PatientListItem::from(&patient))))
}

async fn detail(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<Json<PatientDetail>, ApiError> {
    let patient = state
        .patients
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(PatientDetail::from(&patient)))
}

async fn update(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<PatientUpdate>,
) -> Result<Json<PatientDetail>, ApiError> {
    let id = require(payload.id, "id").map_err(ApiError::field_validation)?;
    let mut patient = state
        .patients
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;

    patient.apply_update(&payload);
    state.patients.update(&patient).await?;

    Ok(Json(PatientDetail::from(&patient)))
}

async fn remove(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<StatusCode, ApiError> {
    state.patients.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
