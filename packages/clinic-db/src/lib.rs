//! Clinic DB - Biblioteca compartilhada de acesso ao banco de dados da clínica
//!
//! Esta biblioteca fornece:
//! - Modelos de pacientes, médicos e endereços, com seus payloads
//! - Migrações automáticas do banco de dados
//! - Repositórios com listagem paginada
//! - Pool de conexão SQLite

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::info;

pub mod error;
pub mod migrations;
pub mod models;
pub mod page;
pub mod repository;

pub use error::DbError;
pub use page::{Direction, Page, PageRequest, Sort};
pub use repository::{
    DoctorRepository, PatientRepository, SqliteDoctorRepository, SqlitePatientRepository,
};

#[cfg(feature = "test-utils")]
pub use repository::{MockDoctorRepository, MockPatientRepository};

/// Configuração da conexão com o banco de dados
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Caminho para o arquivo SQLite
    pub db_path: String,
    /// Número máximo de conexões no pool
    pub max_connections: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            db_path: "data/clinic.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Inicializa o pool de conexões SQLite e aplica as migrações pendentes
pub async fn init_db_pool(config: &DbConfig) -> Result<SqlitePool> {
    let db_path = Path::new(&config.db_path);

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .context("Falha ao criar diretório para banco de dados")?;
        }
    }

    let connection_options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .pragma("synchronous", "NORMAL");

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(connection_options)
        .await
        .context("Falha ao conectar ao banco de dados SQLite")?;

    migrations::run_migrations(&pool)
        .await
        .context("Falha ao aplicar migrações")?;

    info!("Banco de dados inicializado com sucesso: {}", config.db_path);
    Ok(pool)
}
