use serde::{Deserialize, Serialize};

/// Top-level configuration settings for the application.
///
/// Groups the HTTP server, payload storage, broker and logging settings.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub broker: BrokerSettings,
    pub log: LogSettings,
}

/// Configuration settings for the HTTP server.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Largest accepted push request body, in bytes.
    pub max_payload_bytes: usize,
}

/// Which `PayloadStore` implementation backs the broker.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Sled,
    Memory,
}

/// Configuration settings for payload storage.
///
/// `path` is the message directory for the file backend and the database
/// path for sled. The memory backend ignores it.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub path: String,
}

/// Configuration settings for the broker.
///
/// Message expiry is disabled unless `message_ttl_secs` is set.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BrokerSettings {
    pub message_ttl_secs: Option<u64>,
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values are filled from
/// defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub storage: Option<PartialStorageSettings>,
    pub broker: Option<PartialBrokerSettings>,
    pub log: Option<PartialLogSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_payload_bytes: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PartialStorageSettings {
    pub backend: Option<StorageBackend>,
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialBrokerSettings {
    pub message_ttl_secs: Option<u64>,
    pub sweep_interval_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLogSettings {
    pub level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 3333,
                max_payload_bytes: 1_048_576,
            },
            storage: StorageSettings {
                backend: StorageBackend::File,
                path: "messages".to_string(),
            },
            broker: BrokerSettings {
                message_ttl_secs: None,
                sweep_interval_secs: 5,
            },
            log: LogSettings {
                level: "info".to_string(),
            },
        }
    }
}
