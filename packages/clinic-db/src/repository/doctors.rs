use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::DoctorRepository;
use crate::error::DbError;
use crate::models::{Doctor, NewDoctor};
use crate::page::{Page, PageRequest};

const SORTABLE_COLUMNS: &[&str] = &["id", "nome", "email", "crm", "especialidade"];

const SELECT_COLUMNS: &str = "SELECT id, nome, email, telefone, crm, especialidade, logradouro, \
     bairro, cep, numero, complemento, cidade, uf, ativo FROM medicos";

/// Repositório de médicos sobre SQLite
#[derive(Debug, Clone)]
pub struct SqliteDoctorRepository {
    pool: SqlitePool,
}

impl SqliteDoctorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_page(
        &self,
        page: &PageRequest,
        only_active: bool,
    ) -> Result<Page<Doctor>, DbError> {
        let order_by = page.order_by(SORTABLE_COLUMNS, "nome")?;
        let filter = if only_active { " WHERE ativo = 1" } else { "" };

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM medicos{}", filter))
            .fetch_one(&self.pool)
            .await?;

        let content: Vec<Doctor> = sqlx::query_as(&format!(
            "{}{} ORDER BY {} LIMIT ? OFFSET ?",
            SELECT_COLUMNS, filter, order_by
        ))
        .bind(i64::from(page.size))
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        debug!(
            "Página {} de médicos: {} de {} registros",
            page.page,
            content.len(),
            total
        );
        Ok(Page::new(content, page, total.max(0) as u64))
    }
}

#[async_trait]
impl DoctorRepository for SqliteDoctorRepository {
    async fn save(&self, doctor: NewDoctor) -> Result<Doctor, DbError> {
        let result = sqlx::query(
            "INSERT INTO medicos (nome, email, telefone, crm, especialidade, logradouro, bairro, \
             cep, numero, complemento, cidade, uf, ativo) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1)",
        )
        .bind(&doctor.nome)
        .bind(&doctor.email)
        .bind(&doctor.telefone)
        .bind(&doctor.crm)
        .bind(doctor.especialidade.to_string())
        .bind(&doctor.endereco.logradouro)
        .bind(&doctor.endereco.bairro)
        .bind(&doctor.endereco.cep)
        .bind(&doctor.endereco.numero)
        .bind(&doctor.endereco.complemento)
        .bind(&doctor.endereco.cidade)
        .bind(&doctor.endereco.uf)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!("Médico {} cadastrado (CRM {})", id, doctor.crm);

        Ok(Doctor {
            id,
            nome: doctor.nome,
            email: doctor.email,
            telefone: doctor.telefone,
            crm: doctor.crm,
            especialidade: doctor.especialidade,
            endereco: doctor.endereco,
            ativo: true,
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Doctor>, DbError> {
        let doctor = sqlx::query_as(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(doctor)
    }

    async fn update(&self, doctor: &Doctor) -> Result<(), DbError> {
        let result = sqlx::query(
            "UPDATE medicos SET nome = ?, telefone = ?, logradouro = ?, bairro = ?, cep = ?, \
             numero = ?, complemento = ?, cidade = ?, uf = ?, ativo = ? WHERE id = ?",
        )
        .bind(&doctor.nome)
        .bind(&doctor.telefone)
        .bind(&doctor.endereco.logradouro)
        .bind(&doctor.endereco.bairro)
        .bind(&doctor.endereco.cep)
        .bind(&doctor.endereco.numero)
        .bind(&doctor.endereco.complemento)
        .bind(&doctor.endereco.cidade)
        .bind(&doctor.endereco.uf)
        .bind(doctor.ativo)
        .bind(doctor.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("Médico {}", doctor.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE medicos SET ativo = 0 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("Médico {}", id)));
        }
        info!("Médico {} inativado", id);
        Ok(())
    }

    async fn find_all(&self, page: &PageRequest) -> Result<Page<Doctor>, DbError> {
        self.fetch_page(page, false).await
    }

    async fn find_all_by_active_true(&self, page: &PageRequest) -> Result<Page<Doctor>, DbError> {
        self.fetch_page(page, true).await
    }
}
