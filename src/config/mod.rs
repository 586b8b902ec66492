use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

use crate::services::generator::GenerationMode;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub generation: GenerationConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub llm: LlmConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub mode: GenerationMode,
    /// `GENERATION_MODE` value that did not parse; reported by `validate`.
    pub unrecognized: Option<String>,
}

impl GenerationConfig {
    fn new(mode: GenerationMode) -> Self {
        Self { mode, unrecognized: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    pub url: Option<SecretString>,
    pub max_connections: u32,
    /// Apply bundled migrations at startup.
    pub run_migrations: bool,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Privileged credential that bypasses per-row ownership filters.
    pub service_key: SecretString,
    pub jwt_secret: SecretString,
    pub jwt_audience: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<SecretString>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").or_else(|_| env::var("ENVIRONMENT")).as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Profile defaults first, then specific env vars win
        Self::for_environment(environment).with_env_overrides()
    }

    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("GENERATION_MODE") {
            self.set_generation_mode(&v);
        }

        if let Ok(v) = env::var("STORE_BACKEND") {
            self.database.backend = match v.to_ascii_lowercase().as_str() {
                "memory" => StoreBackend::Memory,
                "postgres" | "postgresql" => StoreBackend::Postgres,
                _ => self.database.backend,
            };
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(SecretString::from(v));
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_RUN_MIGRATIONS") {
            self.database.run_migrations = matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }

        if let Ok(v) = env::var("HOST") {
            self.api.host = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }

        if let Ok(v) = env::var("SERVICE_ROLE_KEY") {
            self.security.service_key = SecretString::from(v);
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = SecretString::from(v);
        }
        if let Ok(v) = env::var("JWT_AUDIENCE") {
            self.security.jwt_audience = Some(v).filter(|s| !s.trim().is_empty());
        }

        if let Ok(v) = env::var("OPENAI_API_KEY") {
            self.llm.api_key = Some(SecretString::from(v));
        }
        if let Ok(v) = env::var("OPENAI_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = env::var("OPENAI_BASE_URL") {
            self.llm.base_url = v;
        }

        if let Ok(v) = env::var("PDF_OUTPUT_DIR") {
            self.export.output_dir = PathBuf::from(v);
        }

        self
    }

    fn set_generation_mode(&mut self, raw: &str) {
        if raw.trim().is_empty() {
            return;
        }
        match raw.parse() {
            Ok(mode) => {
                self.generation.mode = mode;
                self.generation.unrecognized = None;
            }
            Err(_) => self.generation.unrecognized = Some(raw.to_string()),
        }
    }

    /// Checks that everything the selected backends need is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(value) = &self.generation.unrecognized {
            return Err(ConfigError::Invalid {
                name: "GENERATION_MODE",
                value: value.clone(),
            });
        }
        if self.security.jwt_secret.expose_secret().is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if self.security.service_key.expose_secret().is_empty() {
            return Err(ConfigError::Missing("SERVICE_ROLE_KEY"));
        }

        if self.database.backend == StoreBackend::Postgres {
            let has_url = self
                .database
                .url
                .as_ref()
                .is_some_and(|u| !u.expose_secret().is_empty());
            if !has_url {
                return Err(ConfigError::Missing("DATABASE_URL"));
            }
        }

        if self.generation.mode == GenerationMode::Live {
            let has_key = self
                .llm
                .api_key
                .as_ref()
                .is_some_and(|k| !k.expose_secret().is_empty());
            if !has_key {
                return Err(ConfigError::Missing("OPENAI_API_KEY"));
            }
        }

        url::Url::parse(&self.llm.base_url).map_err(|_| ConfigError::Invalid {
            name: "OPENAI_BASE_URL",
            value: self.llm.base_url.clone(),
        })?;

        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            generation: GenerationConfig::new(GenerationMode::Mock),
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                max_connections: 10,
                run_migrations: true,
            },
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
            security: Self::empty_security(),
            llm: Self::default_llm(),
            export: ExportConfig { output_dir: PathBuf::from("pdfs") },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            generation: GenerationConfig::new(GenerationMode::Live),
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                max_connections: 20,
                run_migrations: true,
            },
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            security: Self::empty_security(),
            llm: Self::default_llm(),
            export: ExportConfig { output_dir: PathBuf::from("pdfs") },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            generation: GenerationConfig::new(GenerationMode::Live),
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                max_connections: 50,
                run_migrations: false,
            },
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            security: Self::empty_security(),
            llm: Self::default_llm(),
            export: ExportConfig { output_dir: PathBuf::from("/var/lib/itinerary-api/pdfs") },
        }
    }

    fn empty_security() -> SecurityConfig {
        SecurityConfig {
            service_key: SecretString::from(String::new()),
            jwt_secret: SecretString::from(String::new()),
            jwt_audience: None,
        }
    }

    fn default_llm() -> LlmConfig {
        LlmConfig {
            api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured(environment: Environment) -> AppConfig {
        let mut config = AppConfig::for_environment(environment);
        config.security.jwt_secret = SecretString::from("jwt-secret".to_string());
        config.security.service_key = SecretString::from("service-key".to_string());
        config.database.url = Some(SecretString::from("postgres://localhost/trips".to_string()));
        config
    }

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.generation.mode, GenerationMode::Mock);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.export.output_dir, PathBuf::from("pdfs"));
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.generation.mode, GenerationMode::Live);
        assert_eq!(config.database.max_connections, 50);
        assert!(!config.database.run_migrations);
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
    }

    #[test]
    fn validate_requires_signing_secret() {
        let mut config = configured(Environment::Development);
        config.security.jwt_secret = SecretString::from(String::new());
        assert!(matches!(config.validate(), Err(ConfigError::Missing("JWT_SECRET"))));
    }

    #[test]
    fn live_mode_requires_provider_key() {
        let config = configured(Environment::Production);
        assert!(matches!(config.validate(), Err(ConfigError::Missing("OPENAI_API_KEY"))));

        let mut config = configured(Environment::Production);
        config.llm.api_key = Some(SecretString::from("sk-test".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn memory_backend_needs_no_database_url() {
        let mut config = configured(Environment::Development);
        config.database.url = None;
        config.database.backend = StoreBackend::Memory;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_unparseable_provider_url() {
        let mut config = configured(Environment::Development);
        config.llm.base_url = "not a url".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { name: "OPENAI_BASE_URL", .. })
        ));
    }

    #[test]
    fn generation_mode_override_parses() {
        let mut config = configured(Environment::Production);
        config.set_generation_mode("mock");
        assert_eq!(config.generation.mode, GenerationMode::Mock);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unrecognized_generation_mode_is_invalid() {
        let mut config = configured(Environment::Development);
        config.set_generation_mode("lvie");
        assert_eq!(config.generation.mode, GenerationMode::Mock);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { name: "GENERATION_MODE", value }) if value == "lvie"
        ));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = configured(Environment::Development);
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("jwt-secret"));
        assert!(!rendered.contains("service-key"));
    }
}
