//! Input source values.

use std::hash::{Hash, Hasher};

use crate::property::{self, PropertyError, PropertyKey};
use crate::provider::Provider;

/// Category tag string for keyboard layouts and input methods.
pub const CATEGORY_KEYBOARD: &str = "TISCategoryKeyboardInputSource";
/// Category tag string for palettes (character viewer, emoji, ...).
pub const CATEGORY_PALETTE: &str = "TISCategoryPaletteInputSource";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Keyboard,
    Palette,
    /// Ink and any category this crate doesn't know. Never cached.
    Other,
}

impl Category {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            CATEGORY_KEYBOARD => Category::Keyboard,
            CATEGORY_PALETTE => Category::Palette,
            _ => Category::Other,
        }
    }
}

/// One OS-reported input source.
///
/// Immutable. Two sources are equal iff their ids match; category and
/// languages are informational.
#[derive(Debug, Clone)]
pub struct InputSource {
    id: String,
    category: Category,
    languages: Vec<String>,
}

impl InputSource {
    pub fn new(id: impl Into<String>, category: Category, languages: Vec<String>) -> Self {
        Self {
            id: id.into(),
            category,
            languages,
        }
    }

    /// Wrap a provider handle, reading every property this type keeps.
    pub fn from_handle<P: Provider>(
        provider: &P,
        handle: &P::Handle,
    ) -> Result<Self, PropertyError> {
        let category = read_category(provider, handle)?;
        Ok(Self {
            id: read_id(provider, handle)?,
            category,
            languages: property::as_string_list(
                PropertyKey::Languages,
                provider.property(handle, PropertyKey::Languages),
            )?,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// True when the primary language is Chinese, Japanese, Korean or
    /// Vietnamese. Classification only: selection never branches on it.
    pub fn is_cjkv(&self) -> bool {
        match self.languages.first() {
            Some(lang) => lang == "ko" || lang == "ja" || lang == "vi" || lang.starts_with("zh"),
            None => false,
        }
    }
}

impl PartialEq for InputSource {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for InputSource {}

impl Hash for InputSource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

pub(crate) fn read_id<P: Provider>(provider: &P, handle: &P::Handle) -> Result<String, PropertyError> {
    property::as_string(PropertyKey::Id, provider.property(handle, PropertyKey::Id))
}

pub(crate) fn read_category<P: Provider>(
    provider: &P,
    handle: &P::Handle,
) -> Result<Category, PropertyError> {
    property::as_string(PropertyKey::Category, provider.property(handle, PropertyKey::Category))
        .map(|tag| Category::from_tag(&tag))
}

pub(crate) fn read_selectable<P: Provider>(
    provider: &P,
    handle: &P::Handle,
) -> Result<bool, PropertyError> {
    property::as_bool(
        PropertyKey::IsSelectable,
        provider.property(handle, PropertyKey::IsSelectable),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(langs: &[&str]) -> InputSource {
        InputSource::new(
            "test.source",
            Category::Keyboard,
            langs.iter().map(|l| l.to_string()).collect(),
        )
    }

    #[test]
    fn test_cjkv_first_language() {
        assert!(source(&["ja"]).is_cjkv());
        assert!(source(&["ko", "en"]).is_cjkv());
        assert!(source(&["vi"]).is_cjkv());
        assert!(source(&["zh-Hans"]).is_cjkv());
        assert!(source(&["zh-Hant", "en"]).is_cjkv());
    }

    #[test]
    fn test_cjkv_only_first_counts() {
        assert!(!source(&["en", "ja"]).is_cjkv());
        assert!(!source(&[]).is_cjkv());
        assert!(!source(&["jav"]).is_cjkv());
    }

    #[test]
    fn test_equality_by_id() {
        let a = InputSource::new("com.apple.keylayout.US", Category::Keyboard, vec!["en".into()]);
        let b = InputSource::new("com.apple.keylayout.US", Category::Palette, vec![]);
        let c = InputSource::new("com.apple.keylayout.ABC", Category::Keyboard, vec!["en".into()]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_category_from_tag() {
        assert_eq!(Category::from_tag(CATEGORY_KEYBOARD), Category::Keyboard);
        assert_eq!(Category::from_tag(CATEGORY_PALETTE), Category::Palette);
        assert_eq!(Category::from_tag("TISCategoryInkInputSource"), Category::Other);
    }
}
