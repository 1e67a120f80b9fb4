use thiserror::Error;

/// Failures outside the prediction pipeline itself.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to load configuration")]
    Config(#[source] flyby::config::ConfigError),

    #[error("Failed to build the HTTP client")]
    HttpClient(#[source] flyby::fetch::HttpClientError),
}

impl CliError {
    /// Exit code for anything the pipeline does not categorise.
    pub const EXIT_CODE: u8 = 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_message_defers_to_its_cause() {
        let err = CliError::Config(flyby::config::ConfigError::Message(
            "api.timeout_seconds must be at least 1".to_string(),
        ));

        assert_eq!(err.to_string(), "Failed to load configuration");
        assert_eq!(
            std::error::Error::source(&err).map(ToString::to_string),
            Some("api.timeout_seconds must be at least 1".to_string())
        );
    }
}
