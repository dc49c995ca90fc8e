use serde::Deserialize;
use std::env;
use std::str::FromStr;
use url::Url;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
const MIN_BODY_BYTES: usize = 1024;
const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Cross-origin policy inputs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    /// Exact origins (`scheme://host[:port]`) allowed to call the API.
    #[serde(default)]
    pub allow_origins: Vec<String>,
}

/// Runtime settings shared read-only by the server and the services.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub cors: CorsConfig,
    pub max_body_bytes: Option<usize>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

impl Config {
    pub fn new(host: impl Into<String>, port: u16, allow_origins: Vec<String>) -> Self {
        Self {
            host: host.into(),
            port,
            cors: CorsConfig { allow_origins },
            max_body_bytes: None,
        }
    }

    /// Loads `HOST`, `PORT`, `CORS__ALLOW_ORIGINS` and `MAX_BODY_BYTES`
    /// from the process environment (and `.env` when present).
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_environment(environment())
    }

    pub(crate) fn from_environment(
        source: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let cfg = config::Config::builder().add_source(source).build()?;

        let mut config: Config = cfg.try_deserialize()?;
        config
            .cors
            .allow_origins
            .retain(|origin| !origin.trim().is_empty());
        for origin in config.cors.allow_origins.iter_mut() {
            *origin = origin.trim().to_string();
        }

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.host.is_empty()
            || !self
                .host
                .chars()
                .all(|c| c.is_alphanumeric() || ".:-_".contains(c))
        {
            return Err(config::ConfigError::Message(
                "Invalid host format".to_string(),
            ));
        }

        if self.port == 0 {
            return Err(config::ConfigError::Message(
                "Port must be between 1 and 65535".to_string(),
            ));
        }

        for origin in &self.cors.allow_origins {
            validate_origin(origin)?;
        }

        if let Some(limit) = self.max_body_bytes {
            if !(MIN_BODY_BYTES..=MAX_BODY_BYTES).contains(&limit) {
                return Err(config::ConfigError::Message(format!(
                    "max_body_bytes must be between {} and {} bytes",
                    MIN_BODY_BYTES, MAX_BODY_BYTES
                )));
            }
        }

        Ok(())
    }

    pub fn effective_max_body_bytes(&self) -> usize {
        self.max_body_bytes.unwrap_or(DEFAULT_MAX_BODY_BYTES)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn environment() -> config::Environment {
    config::Environment::default()
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("cors.allow_origins")
        .try_parsing(true)
}

/// Browsers send `Origin` in its serialized form, and the CORS layer compares
/// it byte for byte, so only that exact form is accepted here.
fn validate_origin(origin: &str) -> Result<(), config::ConfigError> {
    let invalid = |reason: &str| {
        config::ConfigError::Message(format!("Invalid CORS origin `{}`: {}", origin, reason))
    };

    let url = Url::parse(origin).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid("host is missing"));
    }
    if url.origin().ascii_serialization() != origin {
        return Err(invalid("expected scheme://host[:port] without path"));
    }

    Ok(())
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub connect_timeout_secs: Option<u64>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
    pub sql_log: Option<bool>,
}

impl DatabaseSettings {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let url = env::var("DATABASE_URL")
            .map_err(|_| config::ConfigError::NotFound("DATABASE_URL".to_string()))?;
        Ok(Self::default_from_url(url))
    }

    pub fn default_from_url(url: String) -> Self {
        Self {
            url,
            max_connections: parse_env_var("DATABASE_MAX_CONNECTIONS"),
            min_connections: parse_env_var("DATABASE_MIN_CONNECTIONS"),
            connect_timeout_secs: parse_env_var("DATABASE_CONNECT_TIMEOUT_SECS"),
            acquire_timeout_secs: parse_env_var("DATABASE_ACQUIRE_TIMEOUT_SECS"),
            idle_timeout_secs: parse_env_var("DATABASE_IDLE_TIMEOUT_SECS"),
            sql_log: parse_env_var("DATABASE_SQL_LOG"),
        }
    }
}

fn parse_env_var<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    env::var(key).ok().and_then(|value| value.parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, config::ConfigError> {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_environment(environment().source(Some(map)))
    }

    #[test]
    fn loads_port_and_origin_list() {
        let config = load(&[
            ("PORT", "8080"),
            ("CORS__ALLOW_ORIGINS", "http://a.com,https://b.example:8443"),
        ])
        .expect("valid config");

        assert_eq!(config.port, 8080);
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(
            config.cors.allow_origins,
            vec!["http://a.com".to_string(), "https://b.example:8443".to_string()]
        );
        assert_eq!(config.effective_max_body_bytes(), DEFAULT_MAX_BODY_BYTES);
    }

    #[test]
    fn origins_default_to_empty() {
        let config = load(&[("PORT", "8080"), ("HOST", "127.0.0.1")]).expect("valid config");
        assert!(config.cors.allow_origins.is_empty());
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn missing_port_is_an_error() {
        assert!(load(&[("HOST", "127.0.0.1")]).is_err());
    }

    #[test]
    fn rejects_origin_with_path_or_trailing_slash() {
        assert!(load(&[("PORT", "8080"), ("CORS__ALLOW_ORIGINS", "http://a.com/")]).is_err());
        assert!(load(&[("PORT", "8080"), ("CORS__ALLOW_ORIGINS", "http://a.com/app")]).is_err());
    }

    #[test]
    fn rejects_wildcard_and_non_http_origins() {
        assert!(load(&[("PORT", "8080"), ("CORS__ALLOW_ORIGINS", "*")]).is_err());
        assert!(load(&[("PORT", "8080"), ("CORS__ALLOW_ORIGINS", "ftp://a.com")]).is_err());
    }

    #[test]
    fn rejects_suspicious_host() {
        let config = Config::new("local host;", 8080, Vec::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_port_zero() {
        assert!(Config::new("127.0.0.1", 0, Vec::new()).validate().is_err());
    }

    #[test]
    fn body_limit_must_be_in_range() {
        let mut config = Config::new("127.0.0.1", 8080, Vec::new());
        config.max_body_bytes = Some(10);
        assert!(config.validate().is_err());

        config.max_body_bytes = Some(2 * 1024 * 1024);
        assert!(config.validate().is_ok());
        assert_eq!(config.effective_max_body_bytes(), 2 * 1024 * 1024);
    }
}
