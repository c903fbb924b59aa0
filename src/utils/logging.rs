use tracing::Level;

/// Maps a configured level name onto a `tracing::Level`, falling back to `INFO`.
pub fn parse_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "error" => Level::ERROR,
        "warn" | "warning" => Level::WARN,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    }
}

/// Initialize tracing/logging for the application.
///
/// Uses `try_init` so tests and the binary can call this more than once
/// without panicking; only the first call installs a subscriber.
pub fn init(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(parse_level(default_level))
        .with_target(false)
        .try_init();
}
