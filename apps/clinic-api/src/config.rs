//! Configuração da aplicação, lida das variáveis de ambiente

use anyhow::{Context, Result};
use clinic_db::DbConfig;
use std::net::SocketAddr;
use std::num::{NonZeroU32, NonZeroUsize};
use std::str::FromStr;

/// Configuração do serviço
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Endereço de escuta HTTP (`CLINIC_API_ADDR`)
    pub listen_addr: SocketAddr,
    /// Banco de dados (`CLINIC_DB_PATH`, `CLINIC_DB_MAX_CONNECTIONS`)
    pub db: DbConfig,
    /// Limite de requisições simultâneas (`CLINIC_MAX_CONCURRENT_REQUESTS`)
    pub max_concurrent_requests: usize,
    /// Logs em JSON (`CLINIC_LOG_JSON`)
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            db: DbConfig::default(),
            max_concurrent_requests: 256,
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Lê a configuração do ambiente do processo
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Lê a configuração a partir de uma função de busca; valores ausentes
    /// mantêm o padrão, valores inválidos são erro. Os limites de conexões e
    /// de requisições simultâneas precisam ser maiores que zero.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("CLINIC_API_ADDR") {
            config.listen_addr = parse_var("CLINIC_API_ADDR", &addr)?;
        }
        if let Some(path) = lookup("CLINIC_DB_PATH") {
            config.db.db_path = path;
        }
        if let Some(max) = lookup("CLINIC_DB_MAX_CONNECTIONS") {
            config.db.max_connections =
                parse_var::<NonZeroU32>("CLINIC_DB_MAX_CONNECTIONS", &max)?.get();
        }
        if let Some(max) = lookup("CLINIC_MAX_CONCURRENT_REQUESTS") {
            config.max_concurrent_requests =
                parse_var::<NonZeroUsize>("CLINIC_MAX_CONCURRENT_REQUESTS", &max)?.get();
        }
        if let Some(json) = lookup("CLINIC_LOG_JSON") {
            config.log_json = matches!(json.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }

        Ok(config)
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("Valor inválido para {}: {}", key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_env_is_empty() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.db.db_path, "data/clinic.db");
        assert_eq!(config.db.max_connections, 5);
        assert!(!config.log_json);
    }

    #[test]
    fn test_overrides_from_env() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("CLINIC_API_ADDR", "127.0.0.1:3000"),
            ("CLINIC_DB_PATH", "/tmp/voll.db"),
            ("CLINIC_DB_MAX_CONNECTIONS", "12"),
            ("CLINIC_MAX_CONCURRENT_REQUESTS", "64"),
            ("CLINIC_LOG_JSON", "true"),
        ]))
        .unwrap();

        assert_eq!(config.listen_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.db.db_path, "/tmp/voll.db");
        assert_eq!(config.db.max_connections, 12);
        assert_eq!(config.max_concurrent_requests, 64);
        assert!(config.log_json);
    }

    #[test]
    fn test_invalid_number_is_error() {
        let err = AppConfig::from_lookup(lookup_from(&[("CLINIC_DB_MAX_CONNECTIONS", "muitas")]))
            .unwrap_err();
        assert!(err.to_string().contains("CLINIC_DB_MAX_CONNECTIONS"));
    }

    #[test]
    fn test_zero_limits_are_rejected() {
        for key in ["CLINIC_DB_MAX_CONNECTIONS", "CLINIC_MAX_CONCURRENT_REQUESTS"] {
            let err = AppConfig::from_lookup(lookup_from(&[(key, "0")])).unwrap_err();
            assert!(err.to_string().contains(key));
        }
    }
}
