//! Validadores customizados usados pelos DTOs de entrada

use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors};

/// Mensagem dos campos obrigatórios ausentes no payload
pub const REQUIRED_MESSAGE: &str = "não deve ser nulo";

fn violation(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Rejeita texto vazio ou composto apenas de espaços
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(violation("not_blank", "não deve estar em branco"));
    }
    Ok(())
}

/// CRM: de 4 a 6 dígitos
pub fn validate_crm(value: &str) -> Result<(), ValidationError> {
    let digits = value.chars().all(|c| c.is_ascii_digit());
    if !digits || !(4..=6).contains(&value.len()) {
        return Err(violation("crm", "CRM deve conter de 4 a 6 dígitos"));
    }
    Ok(())
}

/// CEP: exatamente 8 dígitos, sem máscara
pub fn validate_cep(value: &str) -> Result<(), ValidationError> {
    if value.len() != 8 || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(violation("cep", "CEP deve conter 8 dígitos"));
    }
    Ok(())
}

/// UF: sigla de duas letras
pub fn validate_uf(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() != 2 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(violation("uf", "UF deve conter 2 letras"));
    }
    Ok(())
}

/// Extrai um campo obrigatório já validado com `required`; a ausência vira o
/// mesmo erro de campo que a validação produziria.
pub fn require<T>(value: Option<T>, field: &'static str) -> Result<T, ValidationErrors> {
    value.ok_or_else(|| {
        let mut errors = ValidationErrors::new();
        errors.add(field, violation("required", REQUIRED_MESSAGE));
        errors
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("Maria").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
    }

    #[test]
    fn test_crm() {
        assert!(validate_crm("1234").is_ok());
        assert!(validate_crm("123456").is_ok());
        assert!(validate_crm("123").is_err());
        assert!(validate_crm("1234567").is_err());
        assert!(validate_crm("12a4").is_err());
    }

    #[test]
    fn test_cep_and_uf() {
        assert!(validate_cep("01310100").is_ok());
        assert!(validate_cep("01310-100").is_err());
        assert!(validate_uf("SP").is_ok());
        assert!(validate_uf("SPO").is_err());
        assert!(validate_uf("S1").is_err());

        let err = validate_cep("123").unwrap_err();
        assert_eq!(err.message.as_deref(), Some("CEP deve conter 8 dígitos"));
    }

    #[test]
    fn test_require_reports_missing_field() {
        assert_eq!(require(Some(3), "id").unwrap(), 3);

        let errors = require::<i64>(None, "id").unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields["id"][0].message.as_deref(), Some(REQUIRED_MESSAGE));
    }
}
