//! Tradução centralizada de falhas para respostas HTTP
//!
//! Todo handler devolve `Result<_, ApiError>`; a conversão para status e
//! corpo JSON acontece uma única vez, em `IntoResponse`.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use clinic_db::DbError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};
use validator::{ValidationErrors, ValidationErrorsKind};

/// Mensagem fixa das falhas de validação na ligação de parâmetros
pub const BIND_VALIDATION_MESSAGE: &str = "Validation error. Check 'errors' field for details.";

/// Mensagem fixa das falhas não reconhecidas
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred.";

/// Um campo rejeitado pela validação
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Envelope de erro devolvido ao cliente
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub errors: Option<Vec<ValidationError>>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            errors: None,
        }
    }

    pub fn add_validation_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .get_or_insert_with(Vec::new)
            .push(ValidationError::new(field, message));
    }
}

/// Falhas reconhecidas pela API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("entidade não encontrada")]
    NotFound,

    /// Validação do corpo da requisição
    #[error("falha de validação em {} campo(s)", .0.len())]
    FieldValidation(Vec<ValidationError>),

    /// Validação de parâmetros ligados a partir da query string
    #[error("falha de validação na ligação de parâmetros em {} campo(s)", .0.len())]
    BindValidation(Vec<ValidationError>),

    /// Violação de integridade no banco, com a causa mais específica
    #[error("{0}")]
    IntegrityConflict(String),

    /// Restrição declarada em parâmetro de caminho/consulta ou corpo ilegível
    #[error("{0}")]
    ConstraintViolation(String),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ApiError {
    pub fn field_validation(errors: ValidationErrors) -> Self {
        ApiError::FieldValidation(flatten_validation_errors(&errors))
    }

    pub fn bind_validation(errors: ValidationErrors) -> Self {
        ApiError::BindValidation(flatten_validation_errors(&errors))
    }
}

/// Achata os erros do `validator` em pares (campo, mensagem).
///
/// Campos aninhados usam caminho com ponto (`endereco.cep`) e itens de lista
/// usam índice (`itens[0].nome`). A saída é ordenada pelo nome do campo.
pub fn flatten_validation_errors(errors: &ValidationErrors) -> Vec<ValidationError> {
    let mut flattened = Vec::new();
    collect_errors("", errors, &mut flattened);
    flattened.sort_by(|a, b| a.field.cmp(&b.field));
    flattened
}

fn collect_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<ValidationError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("valor inválido ({})", err.code));
                    out.push(ValidationError::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_errors(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_errors(&format!("{}[{}]", path, index), nested, out);
                }
            }
        }
    }
}

/// Monta o envelope (status, mensagem) e acrescenta os erros de campo
/// somente quando existirem.
fn build_error_response(
    status: StatusCode,
    message: impl Into<String>,
    validation_errors: &[ValidationError],
) -> Response {
    let mut body = ErrorResponse::new(status, message);
    for err in validation_errors {
        body.add_validation_error(err.field.clone(), err.message.clone());
    }
    (status, Json(body)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => {
                warn!("Entidade não encontrada");
                StatusCode::NOT_FOUND.into_response()
            }
            ApiError::FieldValidation(errors) => {
                warn!("Validation failed: {:?}", errors);
                (StatusCode::BAD_REQUEST, Json(errors)).into_response()
            }
            ApiError::BindValidation(errors) => {
                warn!("Falha de validação na ligação de parâmetros: {:?}", errors);
                build_error_response(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    BIND_VALIDATION_MESSAGE,
                    &errors,
                )
            }
            ApiError::IntegrityConflict(cause) => {
                error!("Erro ao salvar registro com problema(s): {}", cause);
                build_error_response(StatusCode::CONFLICT, cause, &[])
            }
            ApiError::ConstraintViolation(message) => {
                warn!("Erro de validação do elemento: {}", message);
                build_error_response(StatusCode::UNPROCESSABLE_ENTITY, message, &[])
            }
            ApiError::Unexpected(err) => {
                error!("An unexpected error occurred: {:?}", err);
                build_error_response(StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_MESSAGE, &[])
            }
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(_) => ApiError::NotFound,
            DbError::IntegrityViolation(cause) => ApiError::IntegrityConflict(cause),
            DbError::InvalidArgument(message) => ApiError::ConstraintViolation(message),
            other => ApiError::Unexpected(anyhow::Error::new(other)),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::ConstraintViolation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::ConstraintViolation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::ConstraintViolation(rejection.body_text())
    }
}
