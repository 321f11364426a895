//! macOS provider backed by the Text Input Sources API (Carbon/HIToolbox).
//!
//! Follows the Core Foundation ownership rules: `Create`/`Copy` results are
//! owned and released on drop, `Get` results are borrowed and retained before
//! they outlive their container.

#![allow(non_upper_case_globals, non_snake_case)]

use std::ffi::{CStr, c_void};
use std::ptr;

use libc::{c_char, c_long, c_uchar, c_ulong};

use super::{Provider, ProviderError};
use crate::property::{PropertyKey, PropertyValue};

// =============================================================================
// Raw bindings
// =============================================================================

type CFTypeRef = *const c_void;
type CFStringRef = *const c_void;
type CFArrayRef = *const c_void;
type CFDictionaryRef = *const c_void;
type CFIndex = c_long;
type CFTypeID = c_ulong;
type Boolean = c_uchar;
type OSStatus = i32;

const kCFStringEncodingUTF8: u32 = 0x0800_0100;

#[link(name = "CoreFoundation", kind = "framework")]
unsafe extern "C" {
    fn CFRetain(cf: CFTypeRef) -> CFTypeRef;
    fn CFRelease(cf: CFTypeRef);
    fn CFGetTypeID(cf: CFTypeRef) -> CFTypeID;

    fn CFStringGetTypeID() -> CFTypeID;
    fn CFBooleanGetTypeID() -> CFTypeID;
    fn CFArrayGetTypeID() -> CFTypeID;

    fn CFBooleanGetValue(boolean: CFTypeRef) -> Boolean;

    fn CFArrayGetCount(array: CFArrayRef) -> CFIndex;
    fn CFArrayGetValueAtIndex(array: CFArrayRef, idx: CFIndex) -> *const c_void;

    fn CFStringGetLength(string: CFStringRef) -> CFIndex;
    fn CFStringGetMaximumSizeForEncoding(length: CFIndex, encoding: u32) -> CFIndex;
    fn CFStringGetCStringPtr(string: CFStringRef, encoding: u32) -> *const c_char;
    fn CFStringGetCString(
        string: CFStringRef,
        buffer: *mut c_char,
        buffer_size: CFIndex,
        encoding: u32,
    ) -> Boolean;
}

#[link(name = "Carbon", kind = "framework")]
unsafe extern "C" {
    static kTISPropertyInputSourceID: CFStringRef;
    static kTISPropertyInputSourceCategory: CFStringRef;
    static kTISPropertyInputSourceIsSelectCapable: CFStringRef;
    static kTISPropertyInputSourceLanguages: CFStringRef;

    fn TISCreateInputSourceList(properties: CFDictionaryRef, include_all_installed: Boolean) -> CFArrayRef;
    fn TISCopyCurrentKeyboardInputSource() -> CFTypeRef;
    fn TISGetInputSourceProperty(source: CFTypeRef, key: CFStringRef) -> *const c_void;
    fn TISSelectInputSource(source: CFTypeRef) -> OSStatus;
}

// =============================================================================
// Owned CF reference
// =============================================================================

/// An owned (+1) Core Foundation reference.
pub struct CfRef(CFTypeRef);

impl CfRef {
    /// Take ownership of a `Create`/`Copy` result.
    fn from_create(ptr: CFTypeRef, call: &'static str) -> Result<Self, ProviderError> {
        if ptr.is_null() {
            Err(ProviderError::NullResult { call })
        } else {
            Ok(Self(ptr))
        }
    }

    /// Retain a borrowed (`Get`) reference.
    unsafe fn retain(ptr: CFTypeRef) -> Self {
        Self(unsafe { CFRetain(ptr) })
    }

    fn as_ptr(&self) -> CFTypeRef {
        self.0
    }
}

impl Drop for CfRef {
    fn drop(&mut self) {
        unsafe { CFRelease(self.0) }
    }
}

// =============================================================================
// Conversions
// =============================================================================

/// `None` when the string can't be converted to UTF-8.
unsafe fn cf_string(string: CFStringRef) -> Option<String> {
    let fast = unsafe { CFStringGetCStringPtr(string, kCFStringEncodingUTF8) };
    if !fast.is_null() {
        return Some(unsafe { CStr::from_ptr(fast) }.to_string_lossy().into_owned());
    }

    let len = unsafe { CFStringGetLength(string) };
    let size = unsafe { CFStringGetMaximumSizeForEncoding(len, kCFStringEncodingUTF8) } + 1;
    let mut buffer = vec![0 as c_char; size as usize];
    let ok = unsafe {
        CFStringGetCString(string, buffer.as_mut_ptr(), size, kCFStringEncodingUTF8)
    };
    if ok == 0 {
        return None;
    }
    Some(
        unsafe { CStr::from_ptr(buffer.as_ptr()) }
            .to_string_lossy()
            .into_owned(),
    )
}

unsafe fn property_value(value: CFTypeRef) -> PropertyValue {
    let type_id = unsafe { CFGetTypeID(value) };
    if type_id == unsafe { CFStringGetTypeID() } {
        match unsafe { cf_string(value) } {
            Some(s) => PropertyValue::String(s),
            None => PropertyValue::Other("CFString"),
        }
    } else if type_id == unsafe { CFBooleanGetTypeID() } {
        PropertyValue::Bool(unsafe { CFBooleanGetValue(value) } != 0)
    } else if type_id == unsafe { CFArrayGetTypeID() } {
        let count = unsafe { CFArrayGetCount(value) };
        let mut items = Vec::with_capacity(count.max(0) as usize);
        for i in 0..count {
            let item = unsafe { CFArrayGetValueAtIndex(value, i) };
            if item.is_null() || unsafe { CFGetTypeID(item) } != unsafe { CFStringGetTypeID() } {
                return PropertyValue::Other("array");
            }
            match unsafe { cf_string(item) } {
                Some(s) => items.push(s),
                None => return PropertyValue::Other("array"),
            }
        }
        PropertyValue::StringList(items)
    } else {
        PropertyValue::Other("CFType")
    }
}

fn key_ref(key: PropertyKey) -> CFStringRef {
    unsafe {
        match key {
            PropertyKey::Id => kTISPropertyInputSourceID,
            PropertyKey::Category => kTISPropertyInputSourceCategory,
            PropertyKey::IsSelectable => kTISPropertyInputSourceIsSelectCapable,
            PropertyKey::Languages => kTISPropertyInputSourceLanguages,
        }
    }
}

// =============================================================================
// TisProvider
// =============================================================================

#[derive(Debug, Default, Clone, Copy)]
pub struct TisProvider;

impl TisProvider {
    pub const fn new() -> Self {
        Self
    }

    fn id_of(&self, handle: &CfRef) -> Option<String> {
        match self.property(handle, PropertyKey::Id) {
            Some(PropertyValue::String(id)) => Some(id),
            _ => None,
        }
    }
}

impl Provider for TisProvider {
    type Handle = CfRef;

    fn enumerate(&self) -> Result<Vec<CfRef>, ProviderError> {
        let list = CfRef::from_create(
            unsafe { TISCreateInputSourceList(ptr::null(), 0) },
            "TISCreateInputSourceList",
        )?;
        let count = unsafe { CFArrayGetCount(list.as_ptr()) };
        let mut sources = Vec::with_capacity(count.max(0) as usize);
        for i in 0..count {
            let item = unsafe { CFArrayGetValueAtIndex(list.as_ptr(), i) };
            if !item.is_null() {
                sources.push(unsafe { CfRef::retain(item) });
            }
        }
        Ok(sources)
    }

    fn property(&self, handle: &CfRef, key: PropertyKey) -> Option<PropertyValue> {
        let value = unsafe { TISGetInputSourceProperty(handle.as_ptr(), key_ref(key)) };
        if value.is_null() {
            None
        } else {
            Some(unsafe { property_value(value) })
        }
    }

    fn current(&self) -> Result<CfRef, ProviderError> {
        CfRef::from_create(
            unsafe { TISCopyCurrentKeyboardInputSource() },
            "TISCopyCurrentKeyboardInputSource",
        )
    }

    fn activate(&self, id: &str) -> Result<(), ProviderError> {
        let target = self
            .enumerate()?
            .into_iter()
            .find(|handle| self.id_of(handle).as_deref() == Some(id))
            .ok_or_else(|| ProviderError::SourceNotFound { id: id.to_string() })?;

        let status = unsafe { TISSelectInputSource(target.as_ptr()) };
        if status != 0 {
            return Err(ProviderError::Status {
                call: "TISSelectInputSource",
                status,
            });
        }
        Ok(())
    }
}
