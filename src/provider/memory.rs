//! Scripted in-memory provider.
//!
//! Holds a fixed list of sources and a current id. Activation either moves
//! the current id (the default) or is accepted and ignored, which is how a
//! disabled source or a racing external switch looks from the outside.
//! Every primitive is counted so callers can assert on provider traffic.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::{Provider, ProviderError};
use crate::property::{PropertyKey, PropertyValue};
use crate::source::{CATEGORY_KEYBOARD, CATEGORY_PALETTE};

// =============================================================================
// MemorySource
// =============================================================================

/// A source as the provider stores it: a bag of raw properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySource {
    properties: HashMap<PropertyKey, PropertyValue>,
}

impl MemorySource {
    pub fn new(id: &str, category: &str, selectable: bool, languages: &[&str]) -> Self {
        let mut properties = HashMap::new();
        properties.insert(PropertyKey::Id, PropertyValue::String(id.to_string()));
        properties.insert(PropertyKey::Category, PropertyValue::String(category.to_string()));
        properties.insert(PropertyKey::IsSelectable, PropertyValue::Bool(selectable));
        properties.insert(
            PropertyKey::Languages,
            PropertyValue::StringList(languages.iter().map(|l| l.to_string()).collect()),
        );
        Self { properties }
    }

    /// Selectable keyboard layout or input method.
    pub fn keyboard(id: &str, languages: &[&str]) -> Self {
        Self::new(id, CATEGORY_KEYBOARD, true, languages)
    }

    /// Selectable palette.
    pub fn palette(id: &str) -> Self {
        Self::new(id, CATEGORY_PALETTE, true, &[])
    }

    /// Replace one raw property.
    pub fn with(mut self, key: PropertyKey, value: PropertyValue) -> Self {
        self.properties.insert(key, value);
        self
    }

    /// Drop one raw property.
    pub fn without(mut self, key: PropertyKey) -> Self {
        self.properties.remove(&key);
        self
    }

    fn id(&self) -> Option<&str> {
        match self.properties.get(&PropertyKey::Id) {
            Some(PropertyValue::String(id)) => Some(id),
            _ => None,
        }
    }
}

// =============================================================================
// MemoryProvider
// =============================================================================

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallCounts {
    pub enumerate: usize,
    pub property: usize,
    pub current: usize,
    pub activate: usize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.enumerate + self.property + self.current + self.activate
    }
}

#[derive(Debug)]
struct State {
    sources: Vec<MemorySource>,
    current: String,
    follow_activation: bool,
    calls: CallCounts,
}

#[derive(Debug)]
pub struct MemoryProvider {
    state: Mutex<State>,
}

impl MemoryProvider {
    /// `current` need not be among `sources`; `current()` then fails.
    pub fn new(sources: Vec<MemorySource>, current: &str) -> Self {
        Self {
            state: Mutex::new(State {
                sources,
                current: current.to_string(),
                follow_activation: true,
                calls: CallCounts::default(),
            }),
        }
    }

    /// When false, `activate` succeeds but the current source stays put.
    pub fn set_follow_activation(&self, follow: bool) {
        self.state.lock().follow_activation = follow;
    }

    /// Switch the current source behind the manager's back.
    pub fn set_current(&self, id: &str) {
        self.state.lock().current = id.to_string();
    }

    pub fn current_id(&self) -> String {
        self.state.lock().current.clone()
    }

    pub fn calls(&self) -> CallCounts {
        self.state.lock().calls
    }

    pub fn reset_calls(&self) {
        self.state.lock().calls = CallCounts::default();
    }
}

impl Provider for MemoryProvider {
    type Handle = MemorySource;

    fn enumerate(&self) -> Result<Vec<MemorySource>, ProviderError> {
        let mut state = self.state.lock();
        state.calls.enumerate += 1;
        Ok(state.sources.clone())
    }

    fn property(&self, handle: &MemorySource, key: PropertyKey) -> Option<PropertyValue> {
        self.state.lock().calls.property += 1;
        handle.properties.get(&key).cloned()
    }

    fn current(&self) -> Result<MemorySource, ProviderError> {
        let mut state = self.state.lock();
        state.calls.current += 1;
        let current = state.current.clone();
        state
            .sources
            .iter()
            .find(|s| s.id() == Some(current.as_str()))
            .cloned()
            .ok_or(ProviderError::SourceNotFound { id: current })
    }

    fn activate(&self, id: &str) -> Result<(), ProviderError> {
        let mut state = self.state.lock();
        state.calls.activate += 1;
        if !state.sources.iter().any(|s| s.id() == Some(id)) {
            return Err(ProviderError::SourceNotFound { id: id.to_string() });
        }
        if state.follow_activation {
            state.current = id.to_string();
        }
        Ok(())
    }
}
