use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::PatientRepository;
use crate::error::DbError;
use crate::models::{NewPatient, Patient};
use crate::page::{Page, PageRequest};

/// Colunas aceitas no parâmetro `sort`
const SORTABLE_COLUMNS: &[&str] = &["id", "nome", "email", "cpf"];

const SELECT_COLUMNS: &str = "SELECT id, nome, email, telefone, cpf, logradouro, bairro, cep, \
     numero, complemento, cidade, uf, ativo FROM pacientes";

/// Repositório de pacientes sobre SQLite
#[derive(Debug, Clone)]
pub struct SqlitePatientRepository {
    pool: SqlitePool,
}

impl SqlitePatientRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_page(
        &self,
        page: &PageRequest,
        only_active: bool,
    ) -> Result<Page<Patient>, DbError> {
        let order_by = page.order_by(SORTABLE_COLUMNS, "nome")?;
        let filter = if only_active { " WHERE ativo = 1" } else { "" };

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM pacientes{}", filter))
            .fetch_one(&self.pool)
            .await?;

        let content: Vec<Patient> = sqlx::query_as(&format!(
            "{}{} ORDER BY {} LIMIT ? OFFSET ?",
            SELECT_COLUMNS, filter, order_by
        ))
        .bind(i64::from(page.size))
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        debug!(
            "Página {} de pacientes: {} de {} registros",
            page.page,
            content.len(),
            total
        );
        Ok(Page::new(content, page, total.max(0) as u64))
    }
}

#[async_trait]
impl PatientRepository for SqlitePatientRepository {
    async fn save(&self, patient: NewPatient) -> Result<Patient, DbError> {
        let result = sqlx::query(
            "INSERT INTO pacientes (nome, email, telefone, cpf, logradouro, bairro, cep, numero, \
             complemento, cidade, uf, ativo) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1)",
        )
        .bind(&patient.nome)
        .bind(&patient.email)
        .bind(&patient.telefone)
        .bind(&patient.cpf)
        .bind(&patient.endereco.logradouro)
        .bind(&patient.endereco.bairro)
        .bind(&patient.endereco.cep)
        .bind(&patient.endereco.numero)
        .bind(&patient.endereco.complemento)
        .bind(&patient.endereco.cidade)
        .bind(&patient.endereco.uf)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!("Paciente {} cadastrado", id);

        Ok(Patient {
            id,
            nome: patient.nome,
            email: patient.email,
            telefone: patient.telefone,
            cpf: patient.cpf,
            endereco: patient.endereco,
            ativo: true,
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Patient>, DbError> {
        let patient = sqlx::query_as(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(patient)
    }

    async fn update(&self, patient: &Patient) -> Result<(), DbError> {
        let result = sqlx::query(
            "UPDATE pacientes SET nome = ?, telefone = ?, logradouro = ?, bairro = ?, cep = ?, \
             numero = ?, complemento = ?, cidade = ?, uf = ?, ativo = ? WHERE id = ?",
        )
        .bind(&patient.nome)
        .bind(&patient.telefone)
        .bind(&patient.endereco.logradouro)
        .bind(&patient.endereco.bairro)
        .bind(&patient.endereco.cep)
        .bind(&patient.endereco.numero)
        .bind(&patient.endereco.complemento)
        .bind(&patient.endereco.cidade)
        .bind(&patient.endereco.uf)
        .bind(patient.ativo)
        .bind(patient.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("Paciente {}", patient.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE pacientes SET ativo = 0 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("Paciente {}", id)));
        }
        info!("Paciente {} inativado", id);
        Ok(())
    }

    async fn find_all(&self, page: &PageRequest) -> Result<Page<Patient>, DbError> {
        self.fetch_page(page, false).await
    }

    async fn find_all_by_active_true(&self, page: &PageRequest) -> Result<Page<Patient>, DbError> {
        self.fetch_page(page, true).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Address;
    use crate::page::Sort;
    use crate::{init_db_pool, DbConfig};
    use anyhow::Result;
    use tempfile::{tempdir, TempDir};

    async fn repository() -> Result<(TempDir, SqlitePatientRepository)> {
        let temp_dir = tempdir()?;
        let config = DbConfig {
            db_path: temp_dir.path().join("pacientes.db").display().to_string(),
            max_connections: 2,
        };
        let pool = init_db_pool(&config).await?;
        Ok((temp_dir, SqlitePatientRepository::new(pool)))
    }

    fn new_patient(nome: &str, cpf: &str) -> NewPatient {
        NewPatient {
            nome: nome.to_string(),
            email: format!("{}@exemplo.com.br", cpf),
            telefone: "11999990000".to_string(),
            cpf: cpf.to_string(),
            endereco: Address {
                logradouro: "Rua das Flores".to_string(),
                bairro: "Centro".to_string(),
                cep: "01310100".to_string(),
                numero: None,
                complemento: None,
                cidade: "São Paulo".to_string(),
                uf: "SP".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_save_and_find_by_id() -> Result<()> {
        let (_dir, repo) = repository().await?;

        let saved = repo.save(new_patient("Ana", "111")).await?;
        assert!(saved.id > 0);
        assert!(saved.ativo);

        let found = repo.find_by_id(saved.id).await?.expect("paciente gravado");
        assert_eq!(found.nome, "Ana");
        assert_eq!(found.cpf, "111");
        assert_eq!(found.endereco, saved.endereco);

        assert!(repo.find_by_id(saved.id + 100).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_cpf_is_integrity_violation() -> Result<()> {
        let (_dir, repo) = repository().await?;

        repo.save(new_patient("Ana", "123")).await?;
        let err = repo.save(new_patient("Bruno", "123")).await.unwrap_err();

        match err {
            DbError::IntegrityViolation(message) => assert!(message.contains("pacientes.cpf")),
            other => panic!("esperava violação de integridade, veio {:?}", other),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_update_persists_mutable_fields() -> Result<()> {
        let (_dir, repo) = repository().await?;
        let mut patient = repo.save(new_patient("Ana", "222")).await?;

        patient.telefone = "2133334444".to_string();
        patient.endereco.numero = Some("42".to_string());
        repo.update(&patient).await?;

        let found = repo.find_by_id(patient.id).await?.expect("paciente gravado");
        assert_eq!(found.telefone, "2133334444");
        assert_eq!(found.endereco.numero.as_deref(), Some("42"));

        patient.id = 9999;
        assert!(matches!(repo.update(&patient).await, Err(DbError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_active_listing_skips_deleted() -> Result<()> {
        let (_dir, repo) = repository().await?;
        let ana = repo.save(new_patient("Ana", "301")).await?;
        repo.save(new_patient("Bruno", "302")).await?;
        repo.save(new_patient("Carla", "303")).await?;

        repo.delete(ana.id).await?;

        let active = repo.find_all_by_active_true(&PageRequest::default()).await?;
        assert_eq!(active.total_elements, 2);
        let names: Vec<_> = active.content.iter().map(|p| p.nome.as_str()).collect();
        assert_eq!(names, vec!["Bruno", "Carla"]);

        let all = repo.find_all(&PageRequest::default()).await?;
        assert_eq!(all.total_elements, 3);

        let deleted = repo.find_by_id(ana.id).await?.expect("continua gravado");
        assert!(!deleted.ativo);

        assert!(matches!(repo.delete(9999).await, Err(DbError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_pagination_and_sort() -> Result<()> {
        let (_dir, repo) = repository().await?;
        for (nome, cpf) in [("Ana", "401"), ("Bruno", "402"), ("Carla", "403")] {
            repo.save(new_patient(nome, cpf)).await?;
        }

        let request = PageRequest::new(0, 2, Some(Sort::parse("nome,desc")?));
        let first = repo.find_all_by_active_true(&request).await?;
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.content.len(), 2);
        assert_eq!(first.content[0].nome, "Carla");
        assert!(first.first && !first.last);

        let request = PageRequest::new(1, 2, Some(Sort::parse("nome,desc")?));
        let second = repo.find_all_by_active_true(&request).await?;
        assert_eq!(second.content.len(), 1);
        assert_eq!(second.content[0].nome, "Ana");
        assert!(second.last);

        let bad = PageRequest::new(0, 2, Some(Sort::asc("telefone")));
        assert!(matches!(
            repo.find_all(&bad).await,
            Err(DbError::InvalidArgument(_))
        ));
        Ok(())
    }
}
