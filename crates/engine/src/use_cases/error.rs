//! Sheet handler errors.

use babel_domain::DomainError;

use crate::infrastructure::ports::PortError;

/// Errors that can occur while handling a sheet event.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("Port error: {0}")]
    Port(#[from] PortError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Catalogue could not be read: {0}")]
    CatalogueIo(#[from] std::io::Error),

    #[error("Catalogue is not valid JSON: {0}")]
    CatalogueJson(#[from] serde_json::Error),
}
