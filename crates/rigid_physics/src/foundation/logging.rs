//! Logging utilities

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system from `RUST_LOG`, defaulting to `info`
pub fn init() {
    init_with_filter("info");
}

/// Initialize the logging system with a fallback filter used when `RUST_LOG` is unset
///
/// Safe to call more than once; later calls are ignored.
pub fn init_with_filter(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}
