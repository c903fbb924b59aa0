mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{
    BrokerSettings, LogSettings, ServerSettings, Settings, StorageBackend, StorageSettings,
};

/// Prefix for environment overrides, e.g. `PRIOMQ_SERVER__PORT=4000`.
pub const ENV_PREFIX: &str = "PRIOMQ";

/// Loads the configuration from the default file, an optional extra file and
/// environment variables, in increasing order of precedence.
/// Merges the result with default values and returns the full `Settings`.
pub fn load_config(extra_file: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder().add_source(File::with_name("config/default").required(false));

    if let Some(path) = extra_file {
        builder = builder.add_source(File::with_name(path).required(true));
    }

    let builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();

    Ok(Settings {
        server: ServerSettings {
            host: partial
                .server
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: partial
                .server
                .as_ref()
                .and_then(|s| s.port)
                .unwrap_or(default.server.port),
            max_payload_bytes: partial
                .server
                .as_ref()
                .and_then(|s| s.max_payload_bytes)
                .unwrap_or(default.server.max_payload_bytes),
        },
        storage: StorageSettings {
            backend: partial
                .storage
                .as_ref()
                .and_then(|s| s.backend)
                .unwrap_or(default.storage.backend),
            path: partial
                .storage
                .as_ref()
                .and_then(|s| s.path.clone())
                .unwrap_or(default.storage.path),
        },
        broker: BrokerSettings {
            message_ttl_secs: partial
                .broker
                .as_ref()
                .and_then(|b| b.message_ttl_secs)
                .or(default.broker.message_ttl_secs),
            sweep_interval_secs: partial
                .broker
                .as_ref()
                .and_then(|b| b.sweep_interval_secs)
                .unwrap_or(default.broker.sweep_interval_secs),
        },
        log: LogSettings {
            level: partial
                .log
                .as_ref()
                .and_then(|l| l.level.clone())
                .unwrap_or(default.log.level),
        },
    })
}
