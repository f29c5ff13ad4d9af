//! # Observability
//!
//! Tracing subscriber setup and structured log field helpers.

pub mod fields;

use crate::constants::DEFAULT_LOG_FILTER;

/// Install the global `fmt` subscriber for a binary
///
/// Honors `RUST_LOG`, falling back to info level for the binary's own target
/// and for this library.
pub fn init_tracing(binary: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{binary}=info,{DEFAULT_LOG_FILTER}").into()),
        )
        .init();
}
