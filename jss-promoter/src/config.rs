use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Connection settings for the source and target servers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PromoterConfig {
    pub source: ServerConfig,
    pub target: ServerConfig,
    /// Optional manifests file; relative paths resolve against the config file.
    #[serde(default)]
    pub manifests: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub url: String,
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    /// Name of an environment variable holding the password.
    #[serde(default)]
    pub password_env: Option<String>,
    #[serde(default)]
    pub read_only: bool,
}

/// Errors returned when loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("no password configured for {url} (set `password` or `password_env`)")]
    MissingPassword { url: String },
    #[error("environment variable {var} for {url} is not set")]
    MissingEnv { var: String, url: String },
}

impl ServerConfig {
    /// The literal password, or the value of `password_env`.
    pub fn resolve_password(&self) -> Result<String, ConfigError> {
        if let Some(password) = &self.password {
            return Ok(password.clone());
        }
        let Some(var) = &self.password_env else {
            return Err(ConfigError::MissingPassword {
                url: self.url.clone(),
            });
        };
        env::var(var).map_err(|_| ConfigError::MissingEnv {
            var: var.clone(),
            url: self.url.clone(),
        })
    }
}

/// Load the configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<PromoterConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut config: PromoterConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;

    if let (Some(manifests), Some(dir)) = (&config.manifests, path.parent()) {
        if manifests.is_relative() {
            config.manifests = Some(dir.join(manifests));
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{load_config, ConfigError, ServerConfig};

    const SAMPLE: &str = r#"
manifests = "site.toml"

[source]
url = "https://source.example.com:8443"
username = "api"
password = "s3cret"

[target]
url = "https://target.example.com:8443"
username = "api"
password_env = "JSS_PROMOTER_TEST_TARGET_PASSWORD"
"#;

    #[test]
    fn loads_servers_and_resolves_manifests_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("promoter.toml");
        fs::write(&path, SAMPLE).expect("write config");

        let config = load_config(&path).expect("config should parse");
        assert_eq!(config.source.url, "https://source.example.com:8443");
        assert!(!config.target.read_only);
        assert_eq!(config.manifests, Some(dir.path().join("site.toml")));
        assert_eq!(
            config.source.resolve_password().expect("literal password"),
            "s3cret"
        );
    }

    #[test]
    fn password_can_come_from_environment() {
        let server = ServerConfig {
            url: "https://target.example.com".to_string(),
            username: "api".to_string(),
            password: None,
            password_env: Some("JSS_PROMOTER_TEST_ENV_PASSWORD".to_string()),
            read_only: false,
        };
        std::env::set_var("JSS_PROMOTER_TEST_ENV_PASSWORD", "from-env");
        assert_eq!(server.resolve_password().expect("env password"), "from-env");
    }

    #[test]
    fn missing_password_is_reported() {
        let server = ServerConfig {
            url: "https://target.example.com".to_string(),
            username: "api".to_string(),
            password: None,
            password_env: None,
            read_only: false,
        };
        assert!(matches!(
            server.resolve_password(),
            Err(ConfigError::MissingPassword { .. })
        ));

        let unset = ServerConfig {
            password_env: Some("JSS_PROMOTER_TEST_UNSET_PASSWORD".to_string()),
            ..server
        };
        assert!(matches!(
            unset.resolve_password(),
            Err(ConfigError::MissingEnv { .. })
        ));
    }

    #[test]
    fn rejects_unknown_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("promoter.toml");
        fs::write(&path, format!("{SAMPLE}\nretries = 3\n")).expect("write config");
        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
    }
}
