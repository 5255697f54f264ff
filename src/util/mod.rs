//! Utility modules for tripbrief

pub mod logging;

pub use logging::{config_from_env, init_logging, LoggingConfig};
