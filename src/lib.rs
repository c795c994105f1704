#![doc = include_str!("../README.md")]

mod macros;

mod config;
mod error;
pub mod expander;
pub mod graph;
pub mod orchestrator;
pub mod prune;
pub mod revalidate;
mod route;
pub mod schema;
pub mod search;

#[cfg(feature = "mock")]
pub mod mock;

pub use crate::config::Config;
pub use crate::error::{CoreError, UpstreamError};
pub use crate::orchestrator::FlightRouter;
pub use crate::route::{RouteResult, RouteSegment, ValidatedRoute};

use std::sync::Once;
static INIT_LOGGER: Once = Once::new();

/// Initialize the logger with the provided configuration. Safe to call
/// more than once; only the first call takes effect.
pub fn init_logger(config: &Config) {
    INIT_LOGGER.call_once(|| {
        let log_cfg: &str = config.log_config.as_str();
        if let Err(e) = log4rs::init_file(log_cfg, Default::default()) {
            panic!(
                "(logger) could not parse log config {} found in config {:?}: {}.",
                log_cfg, config, e
            );
        }
    });
}
