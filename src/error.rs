use thiserror::Error;

use crate::property::PropertyError;
use crate::provider::ProviderError;

/// Errors surfaced by `InputSourceManager`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("input source manager is not initialized")]
    NotInitialized,

    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
