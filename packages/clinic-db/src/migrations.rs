//! Sistema de migrações para banco de dados
//!
//! Este módulo gerencia as migrações do banco de dados SQLite. A versão
//! aplicada fica registrada em `PRAGMA user_version`.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::{error, info};

/// Lista de migrações SQL a serem aplicadas
pub(crate) const MIGRATIONS: &[&str] = &[
    // 001_medicos.sql
    r#"
    CREATE TABLE IF NOT EXISTS medicos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nome TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        crm TEXT NOT NULL UNIQUE,
        especialidade TEXT NOT NULL CHECK (especialidade IN ('ORTOPEDIA', 'CARDIOLOGIA', 'GINECOLOGIA', 'DERMATOLOGIA')),
        logradouro TEXT NOT NULL,
        bairro TEXT NOT NULL,
        cep TEXT NOT NULL,
        complemento TEXT,
        numero TEXT,
        uf TEXT NOT NULL,
        cidade TEXT NOT NULL
    );
    "#,

    // 002_medicos_telefone_ativo.sql
    r#"
    ALTER TABLE medicos ADD COLUMN telefone TEXT NOT NULL DEFAULT '';
    ALTER TABLE medicos ADD COLUMN ativo BOOLEAN NOT NULL DEFAULT 1;

    CREATE INDEX IF NOT EXISTS idx_medicos_ativo ON medicos (ativo);
    "#,

    // 003_pacientes.sql
    r#"
    CREATE TABLE IF NOT EXISTS pacientes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nome TEXT NOT NULL,
        email TEXT NOT NULL,
        telefone TEXT NOT NULL,
        cpf TEXT NOT NULL UNIQUE,
        logradouro TEXT NOT NULL,
        bairro TEXT NOT NULL,
        cep TEXT NOT NULL,
        complemento TEXT,
        numero TEXT,
        uf TEXT NOT NULL,
        cidade TEXT NOT NULL,
        ativo BOOLEAN NOT NULL DEFAULT 1
    );

    CREATE INDEX IF NOT EXISTS idx_pacientes_ativo ON pacientes (ativo);
    "#,
];

/// Executa todas as migrações pendentes no banco de dados
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    info!("Aplicando migrações de banco de dados...");

    // Obter a versão atual do banco de dados
    let version: i64 = match sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await
    {
        Ok(v) => v,
        Err(e) => {
            // Primeira execução: segue a partir da versão zero
            error!("Erro ao obter versão do banco: {}", e);
            0
        }
    };

    info!("Versão atual do banco: {}", version);

    for (i, migration_sql) in MIGRATIONS.iter().enumerate() {
        let migration_version = (i + 1) as i64;

        if migration_version <= version {
            info!("Migração {} já aplicada", migration_version);
            continue;
        }

        info!("Aplicando migração {}...", migration_version);

        let mut transaction = pool.begin().await.with_context(|| {
            format!("Falha ao iniciar transação para migração {}", migration_version)
        })?;

        sqlx::query(migration_sql)
            .execute(&mut *transaction)
            .await
            .with_context(|| format!("Falha ao executar migração {}", migration_version))?;

        sqlx::query(&format!("PRAGMA user_version = {}", migration_version))
            .execute(&mut *transaction)
            .await
            .with_context(|| format!("Falha ao atualizar versão para {}", migration_version))?;

        transaction.commit().await.with_context(|| {
            format!("Falha ao confirmar transação para migração {}", migration_version)
        })?;

        info!("Migração {} aplicada com sucesso", migration_version);
    }

    info!("Migrações concluídas. Versão atual: {}", MIGRATIONS.len());
    Ok(())
}
