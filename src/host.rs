//! Safe Rust host over the C surface.
//!
//! Goes through the exported functions exactly as a foreign host would and
//! releases every returned string with `free_string`.

use std::ffi::{CStr, CString, c_char};

use thiserror::Error;

use crate::ffi;
use crate::manager::SelectStatus;
use crate::mask::CategoryMask;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputSourceError {
    #[error("input source not found")]
    SourceNotFound,

    #[error("input source switch was not applied")]
    SwitchFailed,

    #[error("input source bridge failed with code {0}")]
    Bridge(i32),

    #[error("input source bridge returned no string")]
    NullResult,

    #[error("input source id contains a NUL byte")]
    InvalidId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchResult {
    Switched,
    /// Already on the target, or nothing to cycle through.
    NotSwitched,
}

/// Take ownership of a string from the bridge and release it.
fn take_string(ptr: *mut c_char) -> Result<String, InputSourceError> {
    if ptr.is_null() {
        return Err(InputSourceError::NullResult);
    }
    let s = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
    unsafe { ffi::free_string(ptr) };
    Ok(s)
}

fn status_result(code: i32) -> Result<(), InputSourceError> {
    match SelectStatus::from_code(code) {
        Some(SelectStatus::Switched) => Ok(()),
        Some(SelectStatus::NotFound) => Err(InputSourceError::SourceNotFound),
        Some(SelectStatus::VerificationFailed) => Err(InputSourceError::SwitchFailed),
        Some(SelectStatus::InternalError) | None => Err(InputSourceError::Bridge(code)),
    }
}

/// Discover input sources. Must run before `set_input_source`,
/// `switch_input_source` and `available_ids`.
pub fn initialize() {
    ffi::initialize_input_source_manager();
}

/// Id of the active input source.
pub fn current_id() -> Result<String, InputSourceError> {
    take_string(ffi::get_current_input_source_id())
}

/// Switch to `id` and return the id that is current afterwards.
pub fn set_input_source(id: &str) -> Result<String, InputSourceError> {
    let id = CString::new(id).map_err(|_| InputSourceError::InvalidId)?;
    status_result(unsafe { ffi::select_input_source_by_id(id.as_ptr()) })?;
    current_id()
}

/// The source after `current` in `ids`, wrapping around; the first one when
/// `current` isn't listed. `None` when there is nothing to switch to.
pub fn next_in_cycle<'a>(ids: &'a [String], current: &str) -> Option<&'a str> {
    let target = match ids.iter().position(|id| id == current) {
        Some(index) => &ids[(index + 1) % ids.len()],
        None => ids.first()?,
    };
    if target == current { None } else { Some(target.as_str()) }
}

/// Move to the next source of `ids` (see `next_in_cycle`).
///
/// Returns whether a switch happened and the id current afterwards.
pub fn switch_input_source(ids: &[String]) -> Result<(SwitchResult, String), InputSourceError> {
    let current = current_id()?;
    match next_in_cycle(ids, &current) {
        None => Ok((SwitchResult::NotSwitched, current)),
        Some(target) => {
            let now = set_input_source(target)?;
            Ok((SwitchResult::Switched, now))
        }
    }
}

/// Cached ids of the categories in `mask`, keyboard ids first.
pub fn available_ids(mask: CategoryMask) -> Result<Vec<String>, InputSourceError> {
    let joined = take_string(ffi::get_available_input_source_ids(mask.to_wire()))?;
    Ok(joined
        .split(ffi::ID_SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cycle_advances() {
        let list = ids(&["a", "b", "c"]);
        assert_eq!(next_in_cycle(&list, "a"), Some("b"));
        assert_eq!(next_in_cycle(&list, "b"), Some("c"));
    }

    #[test]
    fn test_cycle_wraps() {
        let list = ids(&["a", "b", "c"]);
        assert_eq!(next_in_cycle(&list, "c"), Some("a"));
    }

    #[test]
    fn test_cycle_unlisted_goes_first() {
        let list = ids(&["a", "b"]);
        assert_eq!(next_in_cycle(&list, "z"), Some("a"));
    }

    #[test]
    fn test_cycle_nothing_to_do() {
        assert_eq!(next_in_cycle(&[], "a"), None);
        assert_eq!(next_in_cycle(&ids(&["a"]), "a"), None);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_result(0), Ok(()));
        assert_eq!(status_result(-1), Err(InputSourceError::SourceNotFound));
        assert_eq!(status_result(-2), Err(InputSourceError::SwitchFailed));
        assert_eq!(status_result(-3), Err(InputSourceError::Bridge(-3)));
        assert_eq!(status_result(42), Err(InputSourceError::Bridge(42)));
    }

    #[test]
    fn test_take_null() {
        assert_eq!(take_string(std::ptr::null_mut()), Err(InputSourceError::NullResult));
    }

    #[test]
    fn test_take_releases() {
        let ptr = ffi::into_owned_ptr("com.apple.keylayout.US");
        assert_eq!(take_string(ptr).as_deref(), Ok("com.apple.keylayout.US"));
    }
}
