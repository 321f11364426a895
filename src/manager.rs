//! Input source registry and the select-and-verify protocol.
//!
//! ```text
//!                 initialize() (once)
//! Provider ──enumerate──→ selectable? ──→ Keyboard ──→ registry.keyboard
//!                                     └─→ Palette  ──→ registry.palette
//!
//! select(target):
//!   current == target ─────────────────────────────→ Verified (no activation)
//!   else activate(target) → [settle] → current == target ? Verified : Mismatched
//! ```
//!
//! The registry is a snapshot sealed in a `OnceCell`: filled by the first
//! successful `initialize()`, never mutated afterwards, read without locks.
//! The current source is never cached.

use std::thread;

use once_cell::sync::OnceCell;

use crate::config::ManagerConfig;
use crate::error::{Error, Result};
use crate::mask::CategoryMask;
use crate::provider::Provider;
use crate::source::{self, Category, InputSource};

// =============================================================================
// Types
// =============================================================================

/// Selectable sources discovered at initialization, in provider order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    keyboard: Vec<InputSource>,
    palette: Vec<InputSource>,
}

impl Registry {
    pub fn keyboard(&self) -> &[InputSource] {
        &self.keyboard
    }

    pub fn palette(&self) -> &[InputSource] {
        &self.palette
    }

    /// Keyboard sources followed by palette sources.
    pub fn iter(&self) -> impl Iterator<Item = &InputSource> {
        self.keyboard.iter().chain(self.palette.iter())
    }
}

/// Result of `select`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The target is the current source.
    Verified,
    /// The OS declined or deferred the switch.
    Mismatched,
}

/// Result of `select_by_id`, with its wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum SelectStatus {
    Switched = 0,
    NotFound = -1,
    VerificationFailed = -2,
    /// Not initialized, or the provider failed.
    InternalError = -3,
}

impl SelectStatus {
    pub const fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(SelectStatus::Switched),
            -1 => Some(SelectStatus::NotFound),
            -2 => Some(SelectStatus::VerificationFailed),
            -3 => Some(SelectStatus::InternalError),
            _ => None,
        }
    }
}

// =============================================================================
// InputSourceManager
// =============================================================================

pub struct InputSourceManager<P: Provider> {
    provider: P,
    config: ManagerConfig,
    registry: OnceCell<Registry>,
}

impl<P: Provider> InputSourceManager<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, ManagerConfig::default())
    }

    pub fn with_config(provider: P, config: ManagerConfig) -> Self {
        Self {
            provider,
            config,
            registry: OnceCell::new(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.registry.get().is_some()
    }

    /// Take the registry snapshot. Later calls are no-ops.
    ///
    /// A failed discovery leaves the manager uninitialized; the next call
    /// tries again. Concurrent first calls discover once.
    pub fn initialize(&self) -> Result<()> {
        self.registry.get_or_try_init(|| self.discover()).map(|_| ())
    }

    fn discover(&self) -> Result<Registry> {
        let handles = self.provider.enumerate()?;
        let mut registry = Registry::default();

        for handle in &handles {
            if !source::read_selectable(&self.provider, handle)? {
                continue;
            }
            let partition = match source::read_category(&self.provider, handle)? {
                Category::Keyboard => &mut registry.keyboard,
                Category::Palette => &mut registry.palette,
                Category::Other => continue,
            };
            partition.push(InputSource::from_handle(&self.provider, handle)?);
        }

        tracing::info!(
            "discovered {} input sources: {} keyboard, {} palette",
            handles.len(),
            registry.keyboard.len(),
            registry.palette.len()
        );
        Ok(registry)
    }

    /// The sealed snapshot.
    pub fn registry(&self) -> Result<&Registry> {
        self.registry.get().ok_or(Error::NotInitialized)
    }

    /// First cached source with this id, keyboard partition first.
    pub fn get_input_source(&self, id: &str) -> Result<Option<&InputSource>> {
        Ok(self.registry()?.iter().find(|s| s.id() == id))
    }

    /// Cached ids of the categories in `mask`: keyboard ids, then palette ids.
    pub fn available_ids(&self, mask: CategoryMask) -> Result<Vec<&str>> {
        let registry = self.registry()?;
        let mut ids = Vec::new();
        for (category, partition) in [
            (Category::Keyboard, &registry.keyboard),
            (Category::Palette, &registry.palette),
        ] {
            if mask.includes(category) {
                ids.extend(partition.iter().map(InputSource::id));
            }
        }
        Ok(ids)
    }

    /// Fresh query for the active source.
    pub fn current_source(&self) -> Result<InputSource> {
        let handle = self.provider.current()?;
        Ok(InputSource::from_handle(&self.provider, &handle)?)
    }

    /// Fresh query for the active source's id only.
    pub fn current_id(&self) -> Result<String> {
        let handle = self.provider.current()?;
        Ok(source::read_id(&self.provider, &handle)?)
    }

    /// Make `target` the current source and check that it stuck.
    ///
    /// Issues no activation when `target` is already current, and at most
    /// one otherwise.
    pub fn select(&self, target: &InputSource) -> Result<SelectOutcome> {
        if self.current_id()? == target.id() {
            tracing::debug!("{} already current", target.id());
            return Ok(SelectOutcome::Verified);
        }

        tracing::debug!("activating {}", target.id());
        if let Err(e) = self.provider.activate(target.id()) {
            tracing::warn!("activation of {} rejected: {}", target.id(), e);
        }

        if !self.config.settle_time.is_zero() {
            thread::sleep(self.config.settle_time);
        }

        let now = self.current_id()?;
        if now == target.id() {
            Ok(SelectOutcome::Verified)
        } else {
            tracing::warn!("switch to {} not verified, current is {}", target.id(), now);
            Ok(SelectOutcome::Mismatched)
        }
    }

    /// Look `id` up in the registry and select it.
    ///
    /// Unknown ids short-circuit to `NotFound` without touching the provider.
    pub fn select_by_id(&self, id: &str) -> Result<SelectStatus> {
        let Some(target) = self.get_input_source(id)? else {
            return Ok(SelectStatus::NotFound);
        };
        Ok(match self.select(target)? {
            SelectOutcome::Verified => SelectStatus::Switched,
            SelectOutcome::Mismatched => SelectStatus::VerificationFailed,
        })
    }
}
