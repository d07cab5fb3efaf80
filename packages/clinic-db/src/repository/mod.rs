//! Repositórios de acesso aos dados
//!
//! Cada entidade expõe apenas as operações usadas pela API: criação, leitura
//! por id, atualização, exclusão lógica e as duas listagens paginadas.

use async_trait::async_trait;

use crate::error::DbError;
use crate::models::{Doctor, NewDoctor, NewPatient, Patient};
use crate::page::{Page, PageRequest};

mod doctors;
mod patients;

pub use doctors::SqliteDoctorRepository;
pub use patients::SqlitePatientRepository;

/// Operações sobre pacientes
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// Persiste um novo paciente e devolve o registro com o id gerado
    async fn save(&self, patient: NewPatient) -> Result<Patient, DbError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Patient>, DbError>;

    /// Grava os campos mutáveis (nome, telefone, endereço, ativo)
    async fn update(&self, patient: &Patient) -> Result<(), DbError>;

    /// Exclusão lógica: o registro deixa de estar ativo
    async fn delete(&self, id: i64) -> Result<(), DbError>;

    async fn find_all(&self, page: &PageRequest) -> Result<Page<Patient>, DbError>;

    async fn find_all_by_active_true(&self, page: &PageRequest) -> Result<Page<Patient>, DbError>;
}

/// Operações sobre médicos
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    async fn save(&self, doctor: NewDoctor) -> Result<Doctor, DbError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Doctor>, DbError>;

    async fn update(&self, doctor: &Doctor) -> Result<(), DbError>;

    async fn delete(&self, id: i64) -> Result<(), DbError>;

    async fn find_all(&self, page: &PageRequest) -> Result<Page<Doctor>, DbError>;

    async fn find_all_by_active_true(&self, page: &PageRequest) -> Result<Page<Doctor>, DbError>;
}
