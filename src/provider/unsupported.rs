//! Provider for platforms without an input source service binding.

use super::{Provider, ProviderError};
use crate::property::{PropertyKey, PropertyValue};

/// Fails every primitive with `ProviderError::Unsupported`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedProvider;

impl UnsupportedProvider {
    pub const fn new() -> Self {
        Self
    }
}

impl Provider for UnsupportedProvider {
    type Handle = ();

    fn enumerate(&self) -> Result<Vec<()>, ProviderError> {
        Err(ProviderError::Unsupported)
    }

    fn property(&self, _handle: &(), _key: PropertyKey) -> Option<PropertyValue> {
        None
    }

    fn current(&self) -> Result<(), ProviderError> {
        Err(ProviderError::Unsupported)
    }

    fn activate(&self, _id: &str) -> Result<(), ProviderError> {
        Err(ProviderError::Unsupported)
    }
}
