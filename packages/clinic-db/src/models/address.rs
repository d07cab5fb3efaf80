//! Endereço embutido nos cadastros de pacientes e médicos
//!
//! O endereço não tem identidade própria: é gravado nas mesmas linhas da
//! entidade que o contém (colunas `logradouro`, `bairro`, `cep`, ...).

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use validator::Validate;

use super::validation::{validate_cep, validate_not_blank, validate_uf};

/// Endereço persistido
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub logradouro: String,
    pub bairro: String,
    pub cep: String,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub cidade: String,
    pub uf: String,
}

impl Address {
    /// Mescla parcial: cada subcampo presente no payload substitui o atual,
    /// subcampos ausentes permanecem como estão.
    pub fn apply_update(&mut self, update: &AddressUpdate) {
        if let Some(logradouro) = &update.logradouro {
            self.logradouro = logradouro.clone();
        }
        if let Some(bairro) = &update.bairro {
            self.bairro = bairro.clone();
        }
        if let Some(cep) = &update.cep {
            self.cep = cep.clone();
        }
        if let Some(numero) = &update.numero {
            self.numero = Some(numero.clone());
        }
        if let Some(complemento) = &update.complemento {
            self.complemento = Some(complemento.clone());
        }
        if let Some(cidade) = &update.cidade {
            self.cidade = cidade.clone();
        }
        if let Some(uf) = &update.uf {
            self.uf = uf.clone();
        }
    }
}

impl FromRow<'_, SqliteRow> for Address {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            logradouro: row.try_get("logradouro")?,
            bairro: row.try_get("bairro")?,
            cep: row.try_get("cep")?,
            numero: row.try_get("numero")?,
            complemento: row.try_get("complemento")?,
            cidade: row.try_get("cidade")?,
            uf: row.try_get("uf")?,
        })
    }
}

/// Endereço recebido no cadastro. Subcampos ausentes chegam vazios e são
/// rejeitados pela validação.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AddressData {
    #[validate(custom = "validate_not_blank")]
    pub logradouro: String,
    #[validate(custom = "validate_not_blank")]
    pub bairro: String,
    #[validate(custom = "validate_cep")]
    pub cep: String,
    #[validate(custom = "validate_not_blank")]
    pub cidade: String,
    #[validate(custom = "validate_uf")]
    pub uf: String,
    pub numero: Option<String>,
    pub complemento: Option<String>,
}

impl From<AddressData> for Address {
    fn from(data: AddressData) -> Self {
        Self {
            logradouro: data.logradouro,
            bairro: data.bairro,
            cep: data.cep,
            numero: data.numero,
            complemento: data.complemento,
            cidade: data.cidade,
            uf: data.uf,
        }
    }
}

/// Endereço recebido na atualização: todos os subcampos são opcionais
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AddressUpdate {
    #[validate(custom = "validate_not_blank")]
    pub logradouro: Option<String>,
    #[validate(custom = "validate_not_blank")]
    pub bairro: Option<String>,
    #[validate(custom = "validate_cep")]
    pub cep: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    #[validate(custom = "validate_not_blank")]
    pub cidade: Option<String>,
    #[validate(custom = "validate_uf")]
    pub uf: Option<String>,
}

#[cfg(test)]
pub(crate) fn sample_address() -> Address {
    Address {
        logradouro: "Rua das Flores".to_string(),
        bairro: "Centro".to_string(),
        cep: "01310100".to_string(),
        numero: Some("100".to_string()),
        complemento: None,
        cidade: "São Paulo".to_string(),
        uf: "SP".to_string(),
    }
}
