//! Definições de erro para a biblioteca clinic-db
//!
//! Este módulo define os tipos de erro usados pelos repositórios

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Erros específicos para operações de banco de dados
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Erro de conexão com banco de dados: {0}")]
    ConnectionError(String),

    #[error("Erro de consulta: {0}")]
    QueryError(String),

    #[error("Entidade não encontrada: {0}")]
    NotFound(String),

    /// Violação de integridade (unicidade, chave estrangeira, NOT NULL, CHECK).
    /// Carrega a mensagem da causa mais específica, vinda do SQLite.
    #[error("{0}")]
    IntegrityViolation(String),

    /// Argumento rejeitado antes de chegar ao banco (ex.: ordenação desconhecida)
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Erro interno: {0}")]
    InternalError(String),
}

/// Códigos estendidos do SQLite para violações de restrição
const SQLITE_CONSTRAINT_CODES: &[&str] = &["19", "275", "531", "787", "1299", "1555", "2067"];

/// Conversão de erros específicos do SQLx para nossos tipos de erro
impl From<sqlx::Error> for DbError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => DbError::NotFound("Registro não encontrado".to_string()),
            sqlx::Error::Database(dbe) => {
                match dbe.kind() {
                    ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation => {
                        return DbError::IntegrityViolation(dbe.message().to_string())
                    }
                    _ => {}
                }
                if let Some(code) = dbe.code() {
                    if SQLITE_CONSTRAINT_CODES.contains(&code.as_ref()) {
                        return DbError::IntegrityViolation(dbe.message().to_string());
                    }
                }
                DbError::QueryError(dbe.message().to_string())
            }
            sqlx::Error::ColumnNotFound(col) => {
                DbError::QueryError(format!("Coluna não encontrada: {}", col))
            }
            sqlx::Error::TypeNotFound { type_name } => {
                DbError::QueryError(format!("Tipo não encontrado: {}", type_name))
            }
            sqlx::Error::ColumnDecode { index, source } => {
                DbError::QueryError(format!("Erro ao decodificar coluna {}: {}", index, source))
            }
            sqlx::Error::Io(io_err) => DbError::ConnectionError(io_err.to_string()),
            sqlx::Error::Configuration(conf_err) => DbError::ConnectionError(conf_err.to_string()),
            sqlx::Error::PoolClosed => {
                DbError::ConnectionError("Pool de conexões fechado".to_string())
            }
            sqlx::Error::PoolTimedOut => {
                DbError::ConnectionError("Timeout no pool de conexões".to_string())
            }
            sqlx::Error::WorkerCrashed => {
                DbError::InternalError("Worker do banco de dados falhou".to_string())
            }
            _ => DbError::InternalError(format!("Erro inesperado: {:?}", error)),
        }
    }
}
