// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{
    DatasetSettings, LoggingSettings, ServerSettings, Settings, DEFAULT_DATASET_URL,
};

/// Loads the application configuration.
///
/// This function is the primary entry point for this crate. Defaults cover
/// every key, so the service runs with no configuration at all; an optional
/// `config.toml` next to the binary refines them, and `MERIDIAN_*`
/// environment variables (e.g. `MERIDIAN_SERVER__PORT=9000`) win over both.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("dataset.url", settings::DEFAULT_DATASET_URL)?
        .set_default("dataset.fetch_timeout_secs", 30)?
        .add_source(config::File::with_name("config.toml").required(false))
        .add_source(config::Environment::with_prefix("MERIDIAN").separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;

    validate(&settings)?;
    Ok(settings)
}

/// Rejects configurations that would only fail later, at load time.
fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.dataset.path.is_none() && settings.dataset.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "dataset.url must not be empty when dataset.path is unset".to_string(),
        ));
    }
    if settings.dataset.fetch_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "dataset.fetch_timeout_secs must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_produce_a_valid_configuration() {
        // No config.toml is present in the test working directory, so this
        // exercises the pure-defaults path.
        let settings = load_settings().expect("defaults must load");
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.dataset.url, DEFAULT_DATASET_URL);
        assert!(settings.dataset.path.is_none());
        assert!(settings.logging.directory.is_none());
    }

    #[test]
    fn empty_url_without_path_is_rejected() {
        let settings = Settings {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            dataset: DatasetSettings {
                url: "  ".to_string(),
                path: None,
                fetch_timeout_secs: 30,
            },
            logging: LoggingSettings::default(),
        };
        assert!(validate(&settings).is_err());
    }
}
