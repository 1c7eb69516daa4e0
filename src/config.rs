use thiserror::Error;

/// Environment-derived settings. The API credential is supplied out-of-band
/// (environment or `.env` file) and required; everything else has defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub api_host: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = read_required("DEVELOPER_KEY")?;
        let api_host = read_string("TUBESCOPE_API_HOST", "youtube.googleapis.com");

        Ok(Self { api_key, api_host })
    }
}

fn read_required(key: &'static str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::MissingVar(key)),
    }
}

fn read_string(key: &'static str, default: &'static str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::AppConfig;

    #[test]
    fn from_env_requires_developer_key() {
        std::env::remove_var("DEVELOPER_KEY");
        assert!(AppConfig::from_env().is_err());

        std::env::set_var("DEVELOPER_KEY", "test-key");
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.api_host, "youtube.googleapis.com");
        std::env::remove_var("DEVELOPER_KEY");
    }
}
