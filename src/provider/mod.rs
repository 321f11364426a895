//! Input source providers.
//!
//! A provider is the authoritative OS service: it lists sources, reports
//! their properties, says which one is active and activates another one.
//! The manager treats it as an oracle and never caches what it says about
//! the current source.
//!
//! ```text
//! SystemProvider ── macOS ──→ TisProvider (Text Input Sources, Carbon)
//!                └─ other ──→ UnsupportedProvider
//! MemoryProvider            scripted, for tests and headless hosts
//! ```

pub mod memory;
#[cfg(target_os = "macos")]
pub mod macos;
pub mod unsupported;

use thiserror::Error;

use crate::property::{PropertyKey, PropertyValue};

pub use memory::{MemoryProvider, MemorySource};
#[cfg(target_os = "macos")]
pub use macos::TisProvider;
pub use unsupported::UnsupportedProvider;

/// The provider backing the process-wide manager on this platform.
#[cfg(target_os = "macos")]
pub type SystemProvider = TisProvider;

/// The provider backing the process-wide manager on this platform.
#[cfg(not(target_os = "macos"))]
pub type SystemProvider = UnsupportedProvider;

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("input sources are not supported on this platform")]
    Unsupported,

    #[error("{call} returned null")]
    NullResult { call: &'static str },

    #[error("no input source with id `{id}`")]
    SourceNotFound { id: String },

    #[error("{call} failed with status {status}")]
    Status { call: &'static str, status: i32 },
}

// =============================================================================
// Provider trait
// =============================================================================

/// Primitives of the OS input source service.
///
/// Handles are short-lived: the manager copies what it needs into
/// `InputSource` values and drops them.
pub trait Provider: Send + Sync {
    /// Opaque reference to one source.
    type Handle;

    /// Every enabled source, in the order the OS reports them.
    fn enumerate(&self) -> Result<Vec<Self::Handle>, ProviderError>;

    /// Raw property value, `None` when the source doesn't carry `key`.
    fn property(&self, handle: &Self::Handle, key: PropertyKey) -> Option<PropertyValue>;

    /// The source active right now.
    fn current(&self) -> Result<Self::Handle, ProviderError>;

    /// Ask the OS to activate the source with this id. Success only means
    /// the request was accepted, not that the switch happened.
    fn activate(&self, id: &str) -> Result<(), ProviderError>;
}
