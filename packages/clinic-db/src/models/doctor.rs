//! Cadastro de médicos

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use std::str::FromStr;
use validator::{Validate, ValidationErrors};

use super::address::{Address, AddressData, AddressUpdate};
use super::validation::{require, validate_crm, validate_not_blank};

/// Especialidades atendidas pela clínica
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Specialty {
    Ortopedia,
    Cardiologia,
    Ginecologia,
    Dermatologia,
}

impl std::fmt::Display for Specialty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Specialty::Ortopedia => write!(f, "ORTOPEDIA"),
            Specialty::Cardiologia => write!(f, "CARDIOLOGIA"),
            Specialty::Ginecologia => write!(f, "GINECOLOGIA"),
            Specialty::Dermatologia => write!(f, "DERMATOLOGIA"),
        }
    }
}

impl FromStr for Specialty {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ORTOPEDIA" => Ok(Specialty::Ortopedia),
            "CARDIOLOGIA" => Ok(Specialty::Cardiologia),
            "GINECOLOGIA" => Ok(Specialty::Ginecologia),
            "DERMATOLOGIA" => Ok(Specialty::Dermatologia),
            other => Err(format!("Valor de especialidade inválido: {}", other)),
        }
    }
}

/// Médico da clínica. A igualdade considera apenas o `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub crm: String,
    pub especialidade: Specialty,
    pub endereco: Address,
    pub ativo: bool,
}

impl PartialEq for Doctor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Doctor {}

impl Doctor {
    /// Atualização parcial, mesma regra do paciente: só nome, telefone e
    /// endereço podem mudar, e apenas quando presentes.
    pub fn apply_update(&mut self, update: &DoctorUpdate) {
        if let Some(nome) = &update.nome {
            self.nome = nome.clone();
        }
        if let Some(telefone) = &update.telefone {
            self.telefone = telefone.clone();
        }
        if let Some(endereco) = &update.endereco {
            self.endereco.apply_update(endereco);
        }
    }
}

impl FromRow<'_, SqliteRow> for Doctor {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let especialidade: String = row.try_get("especialidade")?;
        let especialidade = especialidade
            .parse::<Specialty>()
            .map_err(|message| sqlx::Error::ColumnDecode {
                index: String::from("especialidade"),
                source: Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
            })?;

        Ok(Self {
            id: row.try_get("id")?,
            nome: row.try_get("nome")?,
            email: row.try_get("email")?,
            telefone: row.try_get("telefone")?,
            crm: row.try_get("crm")?,
            especialidade,
            endereco: Address::from_row(row)?,
            ativo: row.try_get("ativo")?,
        })
    }
}

/// Médico ainda não persistido
#[derive(Debug, Clone)]
pub struct NewDoctor {
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub crm: String,
    pub especialidade: Specialty,
    pub endereco: Address,
}

/// Payload de cadastro. Campos ausentes chegam vazios (ou `None`) e são
/// reportados pela validação.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DoctorRegistration {
    #[validate(custom = "validate_not_blank")]
    pub nome: String,
    #[validate(email(message = "deve ser um endereço de e-mail bem formado"))]
    pub email: String,
    #[validate(custom = "validate_not_blank")]
    pub telefone: String,
    #[validate(custom = "validate_crm")]
    pub crm: String,
    #[validate(required(message = "não deve ser nulo"))]
    pub especialidade: Option<Specialty>,
    #[validate(required(message = "não deve ser nulo"))]
    #[validate]
    pub endereco: Option<AddressData>,
}

impl TryFrom<DoctorRegistration> for NewDoctor {
    type Error = ValidationErrors;

    fn try_from(data: DoctorRegistration) -> Result<Self, Self::Error> {
        let especialidade = require(data.especialidade, "especialidade")?;
        let endereco = require(data.endereco, "endereco")?;
        Ok(Self {
            nome: data.nome,
            email: data.email,
            telefone: data.telefone,
            crm: data.crm,
            especialidade,
            endereco: endereco.into(),
        })
    }
}

/// Payload de atualização. Email, CRM e especialidade não são alteráveis.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DoctorUpdate {
    #[validate(required(message = "não deve ser nulo"))]
    pub id: Option<i64>,
    #[validate(custom = "validate_not_blank")]
    pub nome: Option<String>,
    #[validate(custom = "validate_not_blank")]
    pub telefone: Option<String>,
    #[validate]
    pub endereco: Option<AddressUpdate>,
}

/// Projeção usada na listagem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorListItem {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub crm: String,
    pub especialidade: Specialty,
}

impl From<&Doctor> for DoctorListItem {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id,
            nome: doctor.nome.clone(),
            email: doctor.email.clone(),
            crm: doctor.crm.clone(),
            especialidade: doctor.especialidade,
        }
    }
}

/// Projeção completa
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorDetail {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub crm: String,
    pub especialidade: Specialty,
    pub endereco: Address,
    pub ativo: bool,
}

impl From<&Doctor> for DoctorDetail {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id,
            nome: doctor.nome.clone(),
            email: doctor.email.clone(),
            telefone: doctor.telefone.clone(),
            crm: doctor.crm.clone(),
            especialidade: doctor.especialidade,
            endereco: doctor.endereco.clone(),
            ativo: doctor.ativo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::address::sample_address;

    fn doctor() -> Doctor {
        Doctor {
            id: 3,
            nome: "Carlos Mendes".to_string(),
            email: "carlos.mendes@voll.med".to_string(),
            telefone: "1133330000".to_string(),
            crm: "123456".to_string(),
            especialidade: Specialty::Cardiologia,
            endereco: sample_address(),
            ativo: true,
        }
    }

    #[test]
    fn test_specialty_round_trips_through_text() {
        for specialty in [
            Specialty::Ortopedia,
            Specialty::Cardiologia,
            Specialty::Ginecologia,
            Specialty::Dermatologia,
        ] {
            assert_eq!(specialty.to_string().parse::<Specialty>(), Ok(specialty));
        }
        assert!("PEDIATRIA".parse::<Specialty>().is_err());
    }

    #[test]
    fn test_specialty_serializes_in_upper_case() {
        let json = serde_json::to_string(&Specialty::Ginecologia).unwrap();
        assert_eq!(json, "\"GINECOLOGIA\"");
    }

    #[test]
    fn test_update_keeps_immutable_fields() {
        let mut current = doctor();
        current.apply_update(&DoctorUpdate {
            id: Some(3),
            nome: Some("Carlos A. Mendes".to_string()),
            telefone: Some("1144440000".to_string()),
            endereco: None,
        });

        assert_eq!(current.nome, "Carlos A. Mendes");
        assert_eq!(current.telefone, "1144440000");
        assert_eq!(current.email, "carlos.mendes@voll.med");
        assert_eq!(current.crm, "123456");
        assert_eq!(current.especialidade, Specialty::Cardiologia);
        assert_eq!(current.endereco, sample_address());
    }

    #[test]
    fn test_registration_rejects_bad_crm() {
        let payload: DoctorRegistration = serde_json::from_value(serde_json::json!({
            "nome": "Carlos",
            "email": "carlos@voll.med",
            "telefone": "1133330000",
            "crm": "12",
            "especialidade": "ORTOPEDIA",
            "endereco": {
                "logradouro": "Rua A",
                "bairro": "Centro",
                "cep": "01310100",
                "cidade": "São Paulo",
                "uf": "SP"
            }
        }))
        .unwrap();

        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("crm"));
    }

    #[test]
    fn test_registration_reports_missing_specialty_and_address() {
        let payload: DoctorRegistration = serde_json::from_value(serde_json::json!({
            "nome": "Carlos",
            "email": "carlos@voll.med",
            "telefone": "1133330000",
            "crm": "1234"
        }))
        .unwrap();

        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 2);
        assert!(fields.contains_key("especialidade"));
        assert!(fields.contains_key("endereco"));
        assert!(NewDoctor::try_from(payload).is_err());
    }

    #[test]
    fn test_update_with_blank_name_is_rejected() {
        let payload = DoctorUpdate {
            id: Some(3),
            nome: Some(" ".to_string()),
            ..Default::default()
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("nome"));
    }
}
