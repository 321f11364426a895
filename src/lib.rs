//! # input-source-manager
//!
//! Enumerate, query and switch the operating system's active keyboard input
//! source (layout or input method), exposed over a C ABI.
//!
//! ## Architecture
//!
//! ```text
//! Host (any language)                       Rust
//! ───────────────────                       ────
//! initialize / select / list / free ──→ ffi        owned strings, i32 codes
//!                                        │
//!                                        ▼
//!                                      manager    registry snapshot (once)
//!                                        │        select-and-verify
//!                                        ▼
//!                                      provider   OS oracle: enumerate,
//!                                                 property, current, activate
//! ```
//!
//! Static facts (which sources exist) come from a snapshot taken once at
//! initialization. Live facts (which source is active) are always queried.
//!
//! ## Modules
//!
//! - [`source`] - `InputSource` and its category / CJKV classification
//! - [`property`] - Typed, fallible access to raw provider properties
//! - [`provider`] - Provider trait, macOS TIS binding, scripted provider
//! - [`manager`] - Registry, lookup, current source, select protocol
//! - [`ffi`] - The exported C functions and string ownership
//! - [`host`] - Safe Rust wrapper over the C functions

pub mod config;
pub mod error;
pub mod ffi;
pub mod host;
pub mod manager;
pub mod mask;
pub mod property;
pub mod provider;
pub mod source;

pub use config::ManagerConfig;
pub use error::{Error, Result};
pub use manager::{InputSourceManager, Registry, SelectOutcome, SelectStatus};
pub use mask::CategoryMask;
pub use property::{PropertyError, PropertyKey, PropertyValue};
pub use provider::{MemoryProvider, MemorySource, Provider, ProviderError, SystemProvider};
pub use source::{Category, InputSource};
