use std::sync::Arc;

use clinic_db::{
    DoctorRepository, PatientRepository, SqliteDoctorRepository, SqlitePatientRepository,
};
use sqlx::SqlitePool;

/// Estado compartilhado entre os handlers
#[derive(Clone)]
pub struct AppState {
    pub patients: Arc<dyn PatientRepository>,
    pub doctors: Arc<dyn DoctorRepository>,
}

impl AppState {
    pub fn new(patients: Arc<dyn PatientRepository>, doctors: Arc<dyn DoctorRepository>) -> Self {
        Self { patients, doctors }
    }

    /// Estado padrão: repositórios SQLite sobre o mesmo pool
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self::new(
            Arc::new(SqlitePatientRepository::new(pool.clone())),
            Arc::new(SqliteDoctorRepository::new(pool)),
        )
    }
}
