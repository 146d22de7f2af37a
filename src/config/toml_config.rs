use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, RoadReadyError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5047/api/";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 20;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Where remembered logins are kept. Without it nothing survives the process.
    pub file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RoadReadyError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RoadReadyError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RoadReadyError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Base URL with a guaranteed trailing slash so relative paths join under it.
    pub fn normalized_base_url(&self) -> String {
        if self.api.base_url.ends_with('/') {
            self.api.base_url.clone()
        } else {
            format!("{}/", self.api.base_url)
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        crate::utils::validation::validate_url("api.base_url", &self.api.base_url)?;
        crate::utils::validation::validate_positive_number(
            "api.timeout_seconds",
            self.api.timeout_seconds,
            1,
        )?;
        if let Some(file) = &self.session.file {
            crate::utils::validation::validate_path("session.file", file)?;
        }
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        &self.api.base_url
    }

    fn timeout_seconds(&self) -> u64 {
        self.api.timeout_seconds
    }

    fn session_file(&self) -> Option<&str> {
        self.session.file.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout_seconds(), 20);
        assert!(config.session_file().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[api]
base_url = "https://rentals.example.org/api"
timeout_seconds = 5

[session]
file = "/tmp/roadready/session.json"

[logging]
json = true
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.timeout_seconds(), 5);
        assert_eq!(config.normalized_base_url(), "https://rentals.example.org/api/");
        assert_eq!(config.session_file(), Some("/tmp/roadready/session.json"));
        assert!(config.logging.json);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ROADREADY_TEST_BASE", "https://test.api.com/api/");

        let toml_content = r#"
[api]
base_url = "${ROADREADY_TEST_BASE}"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api.base_url, "https://test.api.com/api/");

        std::env::remove_var("ROADREADY_TEST_BASE");
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[api]
base_url = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let zero_timeout = TomlConfig::from_toml_str(
            r#"
[api]
timeout_seconds = 0
"#,
        )
        .unwrap();
        assert!(zero_timeout.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[api]\nbase_url = \"http://localhost:9000/api/\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.base_url(), "http://localhost:9000/api/");
    }
}
