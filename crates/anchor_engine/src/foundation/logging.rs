//! Logger setup for hosts embedding the overlay

pub use log::{debug, info, warn, error, trace};

/// Initialize the logger from `RUST_LOG`, defaulting to `info`
pub fn init() {
    init_with_level("info");
}

/// Initialize the logging system with a default level
///
/// `RUST_LOG` still wins when it is set. Calling this more than once is
/// harmless; later calls are ignored.
pub fn init_with_level(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialized, keeping existing configuration");
    }
}
