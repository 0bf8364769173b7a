//! Server configuration.
//!
//! Sources, lowest to highest priority:
//! 1. Built-in defaults
//! 2. `dental-clinic.toml` in the working directory (optional)
//! 3. Legacy `PORT` / `JWT_SECRET` variables
//! 4. `DENTAL_*` environment variables

use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use dental_clinic_core::seed::{DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};

pub const DEFAULT_CONFIG_FILE: &str = "dental-clinic.toml";
pub const DEFAULT_JWT_SECRET: &str = "your-secret-key";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// SQLite file, created on first start
    pub database_path: PathBuf,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    /// Operator account provisioned at startup if absent
    pub admin_username: String,
    pub admin_password: String,
    /// Insert demo patients and appointments into an empty database
    pub seed_sample_data: bool,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load from the default file location and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Load using `file` as the optional config file.
    pub fn load_from(file: &Path) -> Result<Self> {
        let config = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 5000)?
            .set_default("database_path", "dental.db")?
            .set_default("jwt_secret", DEFAULT_JWT_SECRET)?
            .set_default("token_ttl_hours", 24)?
            .set_default("bcrypt_cost", 10)?
            .set_default("admin_username", DEFAULT_ADMIN_USERNAME)?
            .set_default("admin_password", DEFAULT_ADMIN_PASSWORD)?
            .set_default("seed_sample_data", false)?
            .set_default("log_format", "text")?
            .add_source(File::from(file).required(false))
            .set_override_option("port", legacy_var("PORT", "DENTAL_PORT"))?
            .set_override_option("jwt_secret", legacy_var("JWT_SECRET", "DENTAL_JWT_SECRET"))?
            .add_source(Environment::with_prefix("DENTAL").try_parsing(true))
            .build()
            .context("Failed to build configuration")?;

        let loaded: ServerConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        loaded.validate()?;
        Ok(loaded)
    }

    fn validate(&self) -> Result<()> {
        if self.jwt_secret.is_empty() {
            bail!("jwt_secret must not be empty");
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            bail!("bcrypt_cost must be between 4 and 31, got {}", self.bcrypt_cost);
        }
        if self.token_ttl_hours <= 0 {
            bail!("token_ttl_hours must be positive, got {}", self.token_ttl_hours);
        }
        Ok(())
    }

    /// Whether the signing secret is still the built-in placeholder.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

/// Read a legacy variable unless its prefixed replacement is set.
fn legacy_var(name: &str, replacement: &str) -> Option<String> {
    if env::var_os(replacement).is_some() {
        return None;
    }
    env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::load_from(&dir.path().join("missing.toml")).unwrap();

        assert_eq!(config.database_path, PathBuf::from("dental.db"));
        assert_eq!(config.token_ttl_hours, 24);
        assert_eq!(config.bcrypt_cost, 10);
        assert_eq!(config.admin_username, "atinukeade");
        assert!(!config.seed_sample_data);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_file_values_applied() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "database_path = \"/var/lib/dental/clinic.db\"\ntoken_ttl_hours = 12\nseed_sample_data = true\nlog_format = \"json\""
        )
        .unwrap();

        let config = ServerConfig::load_from(file.path()).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/var/lib/dental/clinic.db"));
        assert_eq!(config.token_ttl_hours, 12);
        assert!(config.seed_sample_data);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_cost_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "bcrypt_cost = 2").unwrap();

        assert!(ServerConfig::load_from(file.path()).is_err());
    }
}
