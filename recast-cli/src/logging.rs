//! Logging setup for the CLI.

/// Initializes env_logger for the whole process.
///
/// The level defaults to `info` and can be overridden with `RUST_LOG`.
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();
}
