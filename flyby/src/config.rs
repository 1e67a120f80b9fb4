use reqwest::Url;
use serde::Deserialize;
use std::{path::Path, time::Duration};

pub use config::ConfigError;

pub const DEFAULT_URL: &str = "https://api.nasa.gov/planetary/earth/assets";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Imagery assets endpoint, without query parameters for the location.
    pub url: String,
    /// Access key sent as `api_key`.
    pub key: String,
    pub timeout_seconds: u64,
}

impl Config {
    /// Load configuration from defaults, an optional TOML file, `FLYBY_`
    /// environment variables (`FLYBY_API__KEY`) and finally `api_key`.
    ///
    /// Without `path`, `flyby.toml` in the current directory is read if it
    /// exists.
    pub fn load(path: Option<&Path>, api_key: Option<&str>) -> Result<Self, config::ConfigError> {
        let _ = dotenvy::dotenv();

        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("flyby").required(false),
        };

        let builder = defaults()?.add_source(file).add_source(environment());

        finish(builder, api_key)
    }
}

/// `FLYBY_API__KEY` style variables; `__` separates nested keys.
fn environment() -> config::Environment {
    config::Environment::with_prefix("FLYBY")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    config::Config::builder()
        .set_default("api.url", DEFAULT_URL)?
        .set_default("api.timeout_seconds", DEFAULT_TIMEOUT_SECONDS)
}

fn finish(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    api_key: Option<&str>,
) -> Result<Config, config::ConfigError> {
    let config: Config = builder
        .set_override_option("api.key", api_key)?
        .build()?
        .try_deserialize()?;

    if config.api.key.trim().is_empty() {
        return Err(config::ConfigError::Message(
            "api.key must not be empty".to_string(),
        ));
    }

    if config.api.timeout_seconds == 0 {
        return Err(config::ConfigError::Message(
            "api.timeout_seconds must be at least 1".to_string(),
        ));
    }

    // Reject an unusable endpoint before any request is built.
    config.api.endpoint()?;

    Ok(config)
}

impl ApiConfig {
    /// How long a single request may take before it is abandoned.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn endpoint(&self) -> Result<Url, config::ConfigError> {
        Url::parse(&self.url)
            .map_err(|err| config::ConfigError::Message(format!("api.url `{}`: {err}", self.url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn from_toml(toml: &str, api_key: Option<&str>) -> Result<Config, config::ConfigError> {
        let builder = defaults()
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml));

        finish(builder, api_key)
    }

    #[test]
    fn defaults_fill_everything_but_the_key() {
        let config = from_toml("[api]\nkey = \"DEMO_KEY\"", None).unwrap();

        assert_eq!(config.api.url, DEFAULT_URL);
        assert_eq!(config.api.key, "DEMO_KEY");
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn file_values_override_defaults() {
        let toml = r#"
            [api]
            url = "http://localhost:8080/assets"
            key = "local"
            timeout_seconds = 3
        "#;

        let config = from_toml(toml, None).unwrap();

        assert_eq!(config.api.url, "http://localhost:8080/assets");
        assert_eq!(config.api.timeout(), Duration::from_secs(3));
        assert_eq!(
            config.api.endpoint().unwrap().as_str(),
            "http://localhost:8080/assets"
        );
    }

    fn with_env(
        toml: &str,
        vars: &[(&str, &str)],
        api_key: Option<&str>,
    ) -> Result<Config, config::ConfigError> {
        let vars: config::Map<String, String> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        let builder = defaults()
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .add_source(environment().source(Some(vars)));

        finish(builder, api_key)
    }

    #[test]
    fn environment_overrides_file() {
        let toml = "[api]\nkey = \"from-file\"\ntimeout_seconds = 3";
        let vars = [
            ("FLYBY_API__KEY", "from-env"),
            ("FLYBY_API__TIMEOUT_SECONDS", "5"),
        ];

        let config = with_env(toml, &vars, None).unwrap();

        assert_eq!(config.api.key, "from-env");
        assert_eq!(config.api.timeout(), Duration::from_secs(5));
        assert_eq!(config.api.url, DEFAULT_URL);
    }

    #[test]
    fn environment_alone_supplies_the_key() {
        let config = with_env("", &[("FLYBY_API__KEY", "DEMO_KEY")], None).unwrap();

        assert_eq!(config.api.key, "DEMO_KEY");
    }

    #[test]
    fn explicit_key_wins_over_environment() {
        let config = with_env("", &[("FLYBY_API__KEY", "from-env")], Some("from-flag")).unwrap();

        assert_eq!(config.api.key, "from-flag");
    }

    #[test]
    fn explicit_key_wins_over_file() {
        let config = from_toml("[api]\nkey = \"from-file\"", Some("from-flag")).unwrap();

        assert_eq!(config.api.key, "from-flag");
    }

    #[test]
    fn explicit_key_alone_is_enough() {
        let config = from_toml("", Some("from-flag")).unwrap();

        assert_eq!(config.api.key, "from-flag");
    }

    #[test]
    fn missing_key_is_an_error() {
        assert!(from_toml("", None).is_err());
    }

    #[test]
    fn blank_key_is_an_error() {
        assert!(from_toml("[api]\nkey = \"  \"", None).is_err());
    }

    #[test]
    fn zero_timeout_is_an_error() {
        assert!(from_toml("[api]\nkey = \"k\"\ntimeout_seconds = 0", None).is_err());
    }

    #[test]
    fn invalid_url_is_an_error() {
        let err = from_toml("[api]\nkey = \"k\"\nurl = \"not a url\"", None).unwrap_err();

        assert!(err.to_string().contains("not a url"));
    }
}
