//! Cadastro de pacientes
//!
//! Entidade persistida, payloads de cadastro/atualização e as projeções
//! usadas nas respostas da API.

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use validator::{Validate, ValidationErrors};

use super::address::{Address, AddressData, AddressUpdate};
use super::validation::{require, validate_not_blank};

/// Paciente da clínica
///
/// A igualdade considera apenas o `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub cpf: String,
    pub endereco: Address,
    pub ativo: bool,
}

impl PartialEq for Patient {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Patient {}

impl std::hash::Hash for Patient {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Patient {
    /// Aplica uma atualização parcial: campos ausentes no payload não alteram
    /// o registro. Email, CPF e id não fazem parte do payload.
    pub fn apply_update(&mut self, update: &PatientUpdate) {
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

impl FromRow<'_, SqliteRow> for Patient {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            nome: row.try_get("nome")?,
            email: row.try_get("email")?,
            telefone: row.try_get("telefone")?,
            cpf: row.try_get("cpf")?,
            endereco: Address::from_row(row)?,
            ativo: row.try_get("ativo")?,
        })
    }
}

/// Paciente ainda não persistido (sem id)
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub cpf: String,
    pub endereco: Address,
}

/// Payload de cadastro. Campos ausentes não interrompem a leitura do JSON:
/// chegam vazios (ou `None`) e são reportados pela validação.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PatientRegistration {
    #[validate(custom = "validate_not_blank")]
    pub nome: String,
    #[validate(email(message = "deve ser um endereço de e-mail bem formado"))]
    pub email: String,
    #[validate(custom = "validate_not_blank")]
    pub telefone: String,
    #[validate(custom = "validate_not_blank")]
    pub cpf: String,
    #[validate(required(message = "não deve ser nulo"))]
    #[validate]
    pub endereco: Option<AddressData>,
}

impl TryFrom<PatientRegistration> for NewPatient {
    type Error = ValidationErrors;

    fn try_from(data: PatientRegistration) -> Result<Self, Self::Error> {
        let endereco = require(data.endereco, "endereco")?;
        Ok(Self {
            nome: data.nome,
            email: data.email,
            telefone: data.telefone,
            cpf: data.cpf,
            endereco: endereco.into(),
        })
    }
}

/// Payload de atualização. O `id` localiza o registro e não é copiado.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PatientUpdate {
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
pub struct PatientListItem {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub cpf: String,
}

impl From<&Patient> for PatientListItem {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id,
            nome: patient.nome.clone(),
            email: patient.email.clone(),
            cpf: patient.cpf.clone(),
        }
    }
}

/// Projeção completa, devolvida no cadastro, detalhamento e atualização
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientDetail {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub cpf: String,
    pub endereco: Address,
    pub ativo: bool,
}

impl From<&Patient> for PatientDetail {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id,
            nome: patient.nome.clone(),
            email: patient.email.clone(),
            telefone: patient.telefone.clone(),
            cpf: patient.cpf.clone(),
            endereco: patient.endereco.clone(),
            ativo: patient.ativo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::address::sample_address;
    use crate::models::validation::REQUIRED_MESSAGE;

    fn patient() -> Patient {
        Patient {
            id: 7,
            nome: "Ana Souza".to_string(),
            email: "ana@exemplo.com.br".to_string(),
            telefone: "11999990000".to_string(),
            cpf: "123.456.789-00".to_string(),
            endereco: sample_address(),
            ativo: true,
        }
    }

    fn assert_same_fields(a: &Patient, b: &Patient) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.nome, b.nome);
        assert_eq!(a.email, b.email);
        assert_eq!(a.telefone, b.telefone);
        assert_eq!(a.cpf, b.cpf);
        assert_eq!(a.endereco, b.endereco);
        assert_eq!(a.ativo, b.ativo);
    }

    #[test]
    fn test_update_without_fields_changes_nothing() {
        let mut current = patient();
        current.apply_update(&PatientUpdate {
            id: Some(7),
            ..Default::default()
        });
        assert_same_fields(&current, &patient());
    }

    #[test]
    fn test_update_sets_only_present_field() {
        let mut current = patient();
        current.apply_update(&PatientUpdate {
            id: Some(7),
            telefone: Some("2133334444".to_string()),
            ..Default::default()
        });

        let mut expected = patient();
        expected.telefone = "2133334444".to_string();
        assert_same_fields(&current, &expected);
    }

    #[test]
    fn test_update_never_copies_id() {
        let mut current = patient();
        current.apply_update(&PatientUpdate {
            id: Some(99),
            nome: Some("Ana Lima".to_string()),
            ..Default::default()
        });
        assert_eq!(current.id, 7);
        assert_eq!(current.nome, "Ana Lima");
        assert_eq!(current.email, "ana@exemplo.com.br");
        assert_eq!(current.cpf, "123.456.789-00");
    }

    #[test]
    fn test_update_merges_address_partially() {
        let mut current = patient();
        current.apply_update(&PatientUpdate {
            id: Some(7),
            endereco: Some(AddressUpdate {
                numero: Some("200".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        });

        assert_eq!(current.endereco.numero.as_deref(), Some("200"));
        assert_eq!(current.endereco.logradouro, sample_address().logradouro);
        assert_eq!(current.endereco.cep, sample_address().cep);
    }

    #[test]
    fn test_equality_uses_id_only() {
        let a = patient();
        let mut b = patient();
        b.nome = "Outro Nome".to_string();
        assert_eq!(a, b);

        b.id = 8;
        assert_ne!(a, b);
    }

    #[test]
    fn test_list_item_copies_projection_fields() {
        let item = PatientListItem::from(&patient());
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "nome": "Ana Souza",
                "email": "ana@exemplo.com.br",
                "cpf": "123.456.789-00"
            })
        );
    }

    #[test]
    fn test_registration_reports_each_invalid_field() {
        let payload: PatientRegistration = serde_json::from_value(serde_json::json!({
            "nome": "",
            "email": "nao-e-email",
            "telefone": "11999990000",
            "cpf": "123",
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
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 2);
        assert!(fields.contains_key("nome"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn test_registration_reports_missing_fields() {
        let payload: PatientRegistration = serde_json::from_value(serde_json::json!({
            "nome": "Ana",
            "telefone": "1"
        }))
        .unwrap();

        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        let mut names: Vec<_> = fields.keys().copied().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["cpf", "email", "endereco"]);
        assert_eq!(
            fields["endereco"][0].message.as_deref(),
            Some(REQUIRED_MESSAGE)
        );

        assert!(NewPatient::try_from(payload).is_err());
    }

    #[test]
    fn test_update_requires_id() {
        let payload: PatientUpdate =
            serde_json::from_value(serde_json::json!({ "nome": "Ana" })).unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("id"));
    }

    #[test]
    fn test_update_validates_nested_address() {
        let payload = PatientUpdate {
            id: Some(7),
            endereco: Some(AddressUpdate {
                cep: Some("123".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.errors().contains_key("endereco"));
    }
}
