//! Centralized server configuration.
//!
//! Loaded via the `config` crate from an optional `config/default.toml`,
//! then from environment variables using `__` as the section separator
//! (for example `SERVER__PORT=8080` or `SCHEDULE__EVENT_ID=7000`).
//!
//! See [`ScheduleConfig`] for the talk source settings.

use serde::Deserialize;
use talkfinder_schedule::ScheduleConfig;

/// Server configuration composed from library configs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    /// Listener configuration.
    #[serde(default)]
    pub server: HttpConfig,

    /// Talk schedule source configuration.
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl HttpConfig {
    /// Returns the `host:port` pair to bind.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ServerConfig {
    /// Loads configuration from `config/default.toml` and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or a value has the wrong type.
    pub fn load() -> Result<Self, config::ConfigError> {
        file_source("config/default")
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

fn file_source(path: &str) -> config::ConfigBuilder<config::builder::DefaultState> {
    config::Config::builder().add_source(config::File::with_name(path).required(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_config_has_correct_defaults() {
        let config = HttpConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config: ServerConfig = file_source("does/not/exist")
            .build()
            .expect("build")
            .try_deserialize()
            .expect("deserialize");
        assert_eq!(config.schedule.talk_count, 220);
        assert_eq!(config.schedule.event_id, 6314);
    }

    #[test]
    fn sections_deserialize_with_partial_values() {
        let config: ServerConfig = config::Config::builder()
            .set_override("server.port", 8080)
            .and_then(|builder| builder.set_override("schedule.event_id", 7000))
            .expect("overrides")
            .build()
            .expect("build")
            .try_deserialize()
            .expect("deserialize");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.schedule.event_id, 7000);
        assert_eq!(config.schedule.timeout_seconds, 5);
    }
}
