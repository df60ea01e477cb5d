//! Diagnostic tool for saved capability documents
//!
//! Prints, as JSON:
//! - Host: CPU, NUMA counts, guest types and the resolved install target
//! - Domain: CPU models, firmware loaders and their labels, devices, features

pub mod args;
pub mod config;
pub mod dto;
pub mod response;
pub mod service;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use args::{Arguments, Command};
pub use config::Config;
pub use dto::*;
pub use response::{Report, ReportError};
pub use service::{run, FileSource};

// =============================================================================
// Tracing Initialization
// =============================================================================

/// Initialize tracing/logging with the given filter level
pub fn init_tracing(filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
