//! Extratores que validam a entrada antes de chegar aos handlers

use axum::async_trait;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query};
use axum::http::request::Parts;
use axum::http::Request;
use axum::Json;
use clinic_db::page::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use clinic_db::{PageRequest, Sort};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use validator::Validate;

use crate::error::ApiError;

/// Corpo JSON validado. Falhas de validação viram `ApiError::FieldValidation`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S, B> FromRequest<S, B> for ValidatedJson<T>
where
    T: Validate,
    S: Send + Sync,
    B: Send + 'static,
    Json<T>: FromRequest<S, B, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate().map_err(ApiError::field_validation)?;
        Ok(ValidatedJson(value))
    }
}

/// Parâmetros de consulta validados. Falhas de validação viram
/// `ApiError::BindValidation`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: QueryRejection| ApiError::from(rejection))?;
        value.validate().map_err(ApiError::bind_validation)?;
        Ok(ValidatedQuery(value))
    }
}

/// Identificador no caminho (`/pacientes/:id`); precisa ser positivo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: PathRejection| ApiError::from(rejection))?;
        if id <= 0 {
            return Err(ApiError::ConstraintViolation(format!(
                "id: deve ser maior que zero (recebido {})",
                id
            )));
        }
        Ok(EntityId(id))
    }
}

/// Parâmetros de paginação aceitos nas listagens
/// (`?page=0&size=10&sort=nome,desc`)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PageParams {
    #[validate(range(max = 1000000, message = "deve ser menor ou igual a 1000000"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "deve estar entre 1 e 100"))]
    pub size: Option<u32>,
    pub sort: Option<String>,
}

impl PageParams {
    /// Converte para `PageRequest`, aplicando os padrões
    pub fn into_page_request(self) -> Result<PageRequest, ApiError> {
        let sort = self.sort.as_deref().map(Sort::parse).transpose()?;
        let size = self.size.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
        Ok(PageRequest::new(self.page.unwrap_or(0), size, sort))
    }
}
