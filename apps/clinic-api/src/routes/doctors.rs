//! Endpoints de médicos (`/medicos`)

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use clinic_db::models::{DoctorDetail, DoctorListItem, DoctorRegistration, DoctorUpdate, NewDoctor};
use clinic_db::models::validation::require;
use clinic_db::Page;

use crate::error::ApiError;
use crate::extract::{EntityId, PageParams, ValidatedJson, ValidatedQuery};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/medicos", get(list).post(register).put(update))
        .route("/medicos/:id", get(detail).delete(remove))
}

async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<DoctorRegistration>,
) -> Result<impl IntoResponse, ApiError> {
    let new_doctor = NewDoctor::try_from(payload).map_err(ApiError::field_validation)?;
    let doctor = state.doctors.save(new_doctor).await?;

    let location = format!("/medicos/{}", doctor.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(DoctorDetail::from(&doctor)),
    ))
}

async fn list(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<PageParams>,
) -> Result<Json<Page<DoctorListItem>>, ApiError> {
    let request = params.into_page_request()?;
    let page = state.doctors.find_all_by_active_true(&request).await?;
    Ok(Json(page.map(|doctor| DoctorListItem::from(&doctor))))
}

async fn detail(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<Json<DoctorDetail>, ApiError> {
    let doctor = state
        .doctors
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(DoctorDetail::from(&doctor)))
}

async fn update(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<DoctorUpdate>,
) -> Result<Json<DoctorDetail>, ApiError> {
    let id = require(payload.id, "id").map_err(ApiError::field_validation)?;
    let mut doctor = state
        .doctors
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;

    doctor.apply_update(&payload);
    state.doctors.update(&doctor).await?;

    Ok(Json(DoctorDetail::from(&doctor)))
}

async fn remove(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<StatusCode, ApiError> {
    state.doctors.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
