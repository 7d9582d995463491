//! services/site/src/error.rs
//!
//! Defines the primary error type for the widget host.

use crate::config::ConfigError;
use portfolio_core::catalog::CatalogError;
use portfolio_core::ports::PortError;

/// The primary error type for the `site` service.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// The configured product catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A view update could not be encoded for the client.
    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    /// The event stream could not be read or written.
    #[error("Stream error: {0}")]
    Stream(#[from] tokio_util::codec::LinesCodecError),

    /// Represents a standard Input/Output error (e.g., reading the catalog file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
