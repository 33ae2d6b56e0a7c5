//! Infrastructure configuration modules.

pub mod logging;
pub mod session;
pub mod settings;

pub use logging::{LogFormat, LoggingConfig};
pub use session::SessionConfig;
pub use settings::{Config, DEFAULT_CONFIG_PATH};
