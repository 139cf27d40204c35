use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }

    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

/// Where documents are persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    /// Process memory; contents are lost on restart
    Memory,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,

    // Storage
    pub store: StoreBackend,

    // CORS
    pub cors_allow_origins: Vec<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup (the process environment in
    /// production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let env = Environment::from_str(&var("ENV").unwrap_or_else(|| "dev".to_string()));

        let server_addr = match var("SERVER_ADDR") {
            Some(addr) => addr,
            None => {
                let port: u16 = var("PORT")
                    .map(|p| p.parse().context("PORT must be a port number"))
                    .transpose()?
                    .unwrap_or(8000);
                format!("0.0.0.0:{port}")
            }
        };

        // Storage
        let store = match var("DATABASE_URL") {
            Some(database_url) => {
                let max_connections = var("DATABASE_MAX_CONNECTIONS")
                    .map(|n| {
                        n.parse()
                            .context("DATABASE_MAX_CONNECTIONS must be a positive integer")
                    })
                    .transpose()?
                    .unwrap_or(10);
                StoreBackend::Postgres {
                    database_url,
                    max_connections,
                }
            }
            None => StoreBackend::Memory,
        };

        // CORS
        let cors_allow_origins = var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Settings {
            env,
            server_addr,
            store,
            cors_allow_origins,
        })
    }

    /// Whether any origin may call the API
    pub fn cors_allows_any_origin(&self) -> bool {
        self.cors_allow_origins.iter().any(|o| o == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.env, Environment::Dev);
        assert_eq!(s.server_addr, "0.0.0.0:8000");
        assert_eq!(s.store, StoreBackend::Memory);
        assert!(s.cors_allows_any_origin());
    }

    #[test]
    fn test_port_and_addr() {
        assert_eq!(settings(&[("PORT", "9000")]).unwrap().server_addr, "0.0.0.0:9000");
        assert_eq!(
            settings(&[("PORT", "9000"), ("SERVER_ADDR", "127.0.0.1:3000")])
                .unwrap()
                .server_addr,
            "127.0.0.1:3000"
        );
        assert!(settings(&[("PORT", "http")]).is_err());
    }

    #[test]
    fn test_postgres_backend() {
        let s = settings(&[
            ("DATABASE_URL", "postgres://localhost/tenders"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
        ])
        .unwrap();
        assert_eq!(
            s.store,
            StoreBackend::Postgres {
                database_url: "postgres://localhost/tenders".into(),
                max_connections: 4,
            }
        );
        assert!(settings(&[("DATABASE_URL", "postgres://x"), ("DATABASE_MAX_CONNECTIONS", "-1")]).is_err());
    }

    #[test]
    fn test_cors_origins_and_env() {
        let s = settings(&[
            ("ENV", "production"),
            ("CORS_ALLOW_ORIGINS", "https://tenders.qa, https://admin.tenders.qa,"),
        ])
        .unwrap();
        assert!(s.env.is_prod());
        assert_eq!(
            s.cors_allow_origins,
            vec!["https://tenders.qa", "https://admin.tenders.qa"]
        );
        assert!(!s.cors_allows_any_origin());
    }
}
