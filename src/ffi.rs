//! C ABI surface.
//!
//! ```text
//! host ──→ initialize_input_source_manager()
//!      ──→ get_current_input_source_id()      → owned char*  ─┐
//!      ──→ get_available_input_source_ids(m)  → owned char*  ─┤
//!      ──→ select_input_source_by_id(id)      → 0 / -1 / -2 / -3
//!      ──→ free_string(ptr)                   ←───────────────┘
//! ```
//!
//! Every string handed out is a fresh `CString` turned into a raw pointer;
//! `free_string` is the only way back. The manager keeps no reference to
//! memory it hands out. An outstanding-string counter tracks the balance.
//!
//! The `marshal_*` helpers are generic over the provider so the exact
//! boundary behaviour can be driven by a scripted provider.

use std::ffi::{CStr, CString, c_char};
use std::ptr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicIsize, Ordering};

use crate::config::ManagerConfig;
use crate::manager::{InputSourceManager, SelectStatus};
use crate::mask::CategoryMask;
use crate::provider::{Provider, SystemProvider};

/// Separator of `get_available_input_source_ids`. Ids never contain it.
pub const ID_SEPARATOR: &str = ",";

// =============================================================================
// GLOBAL STATE
// =============================================================================

/// The process-wide manager, built from the environment on first use unless
/// `configure` got there first.
static MANAGER: OnceLock<InputSourceManager<SystemProvider>> = OnceLock::new();

fn manager() -> &'static InputSourceManager<SystemProvider> {
    MANAGER.get_or_init(|| {
        InputSourceManager::with_config(SystemProvider::new(), ManagerConfig::from_env())
    })
}

/// Build the process-wide manager with `config` instead of the environment.
///
/// Must run before any exported function. Returns `false` (and changes
/// nothing) if the manager already exists.
pub fn configure(config: ManagerConfig) -> bool {
    install(&MANAGER, SystemProvider::new(), config)
}

fn install<P: Provider>(
    cell: &OnceLock<InputSourceManager<P>>,
    provider: P,
    config: ManagerConfig,
) -> bool {
    let installed = cell
        .set(InputSourceManager::with_config(provider, config))
        .is_ok();
    if !installed {
        tracing::warn!("manager already built; ignoring {:?}", config);
    }
    installed
}

/// Strings handed out and not yet released.
static OUTSTANDING: AtomicIsize = AtomicIsize::new(0);

/// Number of strings handed out by this surface and not yet passed to
/// `free_string`.
pub fn outstanding_strings() -> isize {
    OUTSTANDING.load(Ordering::SeqCst)
}

// =============================================================================
// Ownership
// =============================================================================

/// Copy `s` into a caller-owned C string. Null if `s` has an interior NUL.
pub fn into_owned_ptr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(owned) => {
            OUTSTANDING.fetch_add(1, Ordering::SeqCst);
            owned.into_raw()
        }
        Err(e) => {
            tracing::error!("cannot hand out string with NUL at {}", e.nul_position());
            ptr::null_mut()
        }
    }
}

/// Release a string from `into_owned_ptr`. Null is a no-op.
///
/// # Safety
/// `ptr` must come from `into_owned_ptr` and not have been released yet.
pub unsafe fn release(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    drop(unsafe { CString::from_raw(ptr) });
    OUTSTANDING.fetch_sub(1, Ordering::SeqCst);
}

/// Borrow a C string argument. `None` for null.
///
/// # Safety
/// Non-null `s` must point to a NUL-terminated string that outlives `'a`.
unsafe fn as_str<'a>(s: *const c_char) -> Result<Option<&'a str>, std::str::Utf8Error> {
    if s.is_null() {
        Ok(None)
    } else {
        unsafe { CStr::from_ptr(s) }.to_str().map(Some)
    }
}

// =============================================================================
// Marshaling
// =============================================================================

pub fn marshal_initialize<P: Provider>(manager: &InputSourceManager<P>) {
    if let Err(e) = manager.initialize() {
        tracing::error!("input source discovery failed: {}", e);
    }
}

pub fn marshal_current_id<P: Provider>(manager: &InputSourceManager<P>) -> *mut c_char {
    match manager.current_id() {
        Ok(id) => into_owned_ptr(&id),
        Err(e) => {
            tracing::error!("current input source query failed: {}", e);
            ptr::null_mut()
        }
    }
}

/// # Safety
/// Same contract as `select_input_source_by_id`.
pub unsafe fn marshal_select_by_id<P: Provider>(
    manager: &InputSourceManager<P>,
    id: *const c_char,
) -> i32 {
    let id = match unsafe { as_str(id) } {
        Ok(Some(id)) => id,
        Ok(None) => return SelectStatus::NotFound.code(),
        Err(e) => {
            tracing::debug!("input source id is not UTF-8: {}", e);
            return SelectStatus::NotFound.code();
        }
    };

    match manager.select_by_id(id) {
        Ok(status) => status.code(),
        Err(e) => {
            tracing::error!("selecting {} failed: {}", id, e);
            SelectStatus::InternalError.code()
        }
    }
}

pub fn marshal_available_ids<P: Provider>(
    manager: &InputSourceManager<P>,
    category_mask: i32,
) -> *mut c_char {
    match manager.available_ids(CategoryMask::from_wire(category_mask)) {
        Ok(ids) => into_owned_ptr(&ids.join(ID_SEPARATOR)),
        Err(e) => {
            tracing::error!("listing input sources failed: {}", e);
            ptr::null_mut()
        }
    }
}

// =============================================================================
// FFI EXPORTS
// =============================================================================

/// Discover input sources. Idempotent; call before anything else.
///
/// Failures are logged and leave the manager uninitialized, so a later call
/// retries and `select_input_source_by_id` reports `-3` meanwhile.
#[unsafe(no_mangle)]
pub extern "C" fn initialize_input_source_manager() {
    marshal_initialize(manager());
}

/// Id of the active input source, or null if the OS query failed.
///
/// The caller owns the string and must release it with `free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn get_current_input_source_id() -> *mut c_char {
    marshal_current_id(manager())
}

/// Switch to the input source `id` and verify the switch.
///
/// Returns: 0 = success, -1 = not found, -2 = verification failed,
/// -3 = not initialized or OS failure
///
/// # Safety
/// `id` must be null or point to a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn select_input_source_by_id(id: *const c_char) -> i32 {
    unsafe { marshal_select_by_id(manager(), id) }
}

/// Comma-separated ids of the categories in `category_mask`
/// (1 = keyboard, 2 = palette), keyboard ids first.
///
/// Empty string when the mask selects nothing, null when not initialized.
/// The caller must release it with `free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn get_available_input_source_ids(category_mask: i32) -> *mut c_char {
    marshal_available_ids(manager(), category_mask)
}

/// Release a string returned by this library. Null is a no-op.
///
/// # Safety
/// `ptr` must come from this library and be released at most once.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn free_string(ptr: *mut c_char) {
    unsafe { release(ptr) }
}
