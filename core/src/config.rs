//! Credentials and client configuration.
//!
//! Credentials are plain values handed to each request; nothing here is
//! global. They can be built directly, read from the environment (with an
//! optional `.env` file), or loaded from a TOML document:
//!
//! ```toml
//! base_url = "https://api.edamam.com"
//!
//! [credentials]
//! app_id = "..."
//! app_key = "..."
//! ```

use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;
use crate::http::Parameters;

pub const DEFAULT_BASE_URL: &str = "https://api.edamam.com";

const APP_ID_VAR: &str = "EDAMAM_APP_ID";
const APP_KEY_VAR: &str = "EDAMAM_APP_KEY";

/// Static identification values attached to every outgoing query.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub app_id: String,
    pub app_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_key", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_key: app_key.into(),
        }
    }

    /// Read `EDAMAM_APP_ID` and `EDAMAM_APP_KEY`, loading `.env` first if
    /// one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("loaded environment from {}", path.display()),
            Err(err) => debug!("no .env file loaded: {err}"),
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name).ok_or_else(|| ConfigError::MissingVariable {
                name: name.to_string(),
            })
        };
        Ok(Self::new(read(APP_ID_VAR)?, read(APP_KEY_VAR)?))
    }

    /// The credential query parameters.
    pub fn to_parameters(&self) -> Parameters {
        let mut parameters = Parameters::new();
        parameters.insert("app_id".to_string(), Value::String(self.app_id.clone()));
        parameters.insert("app_key".to_string(), Value::String(self.app_key.clone()));
        parameters
    }
}

/// Base URL plus credentials for building requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub credentials: Credentials,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Config {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: default_base_url(),
            credentials,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Credentials from the environment, default base URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(Credentials::from_env()?))
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|err| ConfigError::Parse {
            reason: err.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_become_query_parameters() {
        let parameters = Credentials::new("id-1", "key-1").to_parameters();
        assert_eq!(parameters["app_id"], "id-1");
        assert_eq!(parameters["app_key"], "key-1");
        assert_eq!(parameters.len(), 2);
    }

    #[test]
    fn debug_output_hides_the_key() {
        let rendered = format!("{:?}", Credentials::new("id-1", "secret"));
        assert!(rendered.contains("id-1"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn lookup_reports_the_missing_variable() {
        let err = Credentials::from_lookup(|name| {
            (name == APP_ID_VAR).then(|| "id".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVariable { name } if name == APP_KEY_VAR));
    }

    #[test]
    fn lookup_reads_both_variables() {
        let credentials = Credentials::from_lookup(|name| Some(format!("{name}-value"))).unwrap();
        assert_eq!(credentials.app_id, "EDAMAM_APP_ID-value");
        assert_eq!(credentials.app_key, "EDAMAM_APP_KEY-value");
    }

    #[test]
    fn toml_without_base_url_uses_default() {
        let config = Config::from_toml_str(
            r#"
            [credentials]
            app_id = "abc"
            app_key = "def"
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.credentials, Credentials::new("abc", "def"));
    }

    #[test]
    fn toml_overrides_base_url() {
        let config = Config::from_toml_str(
            r#"
            base_url = "http://localhost:3000"
            [credentials]
            app_id = "abc"
            app_key = "def"
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:3000");
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Config::from_toml_str("base_url = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Config::load(Path::new("/nonexistent/edamam.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
