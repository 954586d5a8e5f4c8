//! Expose a Rust [`ManagerInterface`] through the C suite contract.
//!
//! This is the writer half of the protocol. The exported handle owns a boxed
//! manager; the suite's entries borrow it for each call, write results into
//! the caller's string views and free it from `dtor`. Panics are caught so
//! they never unwind across the boundary.

use std::panic::{AssertUnwindSafe, catch_unwind};

use assetbridge_abi::{
    ErrorCode, K_OK, K_UNKNOWN, ManagerInterfaceHandle, ManagerInterfaceOpaque,
    ManagerInterfaceSuite, StringView,
};

use crate::error::BridgeError;
use crate::interface::ManagerInterface;

/// Box `manager` and return the handle and suite that operate on it.
///
/// Ownership passes to whoever holds the handle; it is freed when the
/// suite's `dtor` is called with it. Pairing the result with
/// [`CManagerInterface::new`](crate::CManagerInterface::new) gives a
/// manager that goes through the full boundary round trip.
pub fn export<M: ManagerInterface + 'static>(
    manager: M,
) -> (ManagerInterfaceHandle, ManagerInterfaceSuite) {
    let handle = Box::into_raw(Box::new(manager)).cast::<ManagerInterfaceOpaque>();
    let suite = ManagerInterfaceSuite {
        dtor: dtor_entry::<M>,
        identifier: identifier_entry::<M>,
        display_name: display_name_entry::<M>,
    };
    tracing::debug!(manager = std::any::type_name::<M>(), "Exported manager as suite");
    (handle, suite)
}

unsafe extern "C" fn dtor_entry<M: ManagerInterface>(handle: ManagerInterfaceHandle) {
    if handle.is_null() {
        return;
    }
    // SAFETY: a non-null handle handed to this dtor came from `export::<M>`.
    let manager = unsafe { Box::from_raw(handle.cast::<M>()) };
    if catch_unwind(AssertUnwindSafe(move || drop(manager))).is_err() {
        tracing::warn!("Panic while dropping exported manager");
    }
}

unsafe extern "C" fn identifier_entry<M: ManagerInterface>(
    error_message: *mut StringView,
    out: *mut StringView,
    handle: ManagerInterfaceHandle,
) -> ErrorCode {
    unsafe { string_entry::<M, _>("identifier", error_message, out, handle, |m| m.identifier()) }
}

unsafe extern "C" fn display_name_entry<M: ManagerInterface>(
    error_message: *mut StringView,
    out: *mut StringView,
    handle: ManagerInterfaceHandle,
) -> ErrorCode {
    unsafe {
        string_entry::<M, _>("display_name", error_message, out, handle, |m| {
            m.display_name()
        })
    }
}

/// Shared body of every string-valued entry.
///
/// # Safety
///
/// `handle` must be null or a live handle from `export::<M>`; the views must
/// be null or describe writable storage of their advertised capacity.
unsafe fn string_entry<M, F>(
    operation: &'static str,
    error_message: *mut StringView,
    out: *mut StringView,
    handle: ManagerInterfaceHandle,
    call: F,
) -> ErrorCode
where
    M: ManagerInterface,
    F: FnOnce(&M) -> Result<String, BridgeError>,
{
    if handle.is_null() || out.is_null() {
        unsafe { write_message(error_message, &format!("{operation}: null handle or output view")) };
        return K_UNKNOWN;
    }
    // SAFETY: non-null and produced by `export::<M>` per this fn's contract.
    let manager = unsafe { &*handle.cast::<M>() };

    match catch_unwind(AssertUnwindSafe(|| call(manager))) {
        Ok(Ok(value)) => {
            unsafe { (*out).write_str(&value) };
            K_OK
        }
        Ok(Err(err)) => {
            let (code, message) = status_of(err);
            unsafe { write_message(error_message, &message) };
            code
        }
        Err(_) => {
            tracing::warn!(operation, "Panic in exported manager");
            unsafe { write_message(error_message, &format!("{operation}: manager panicked")) };
            K_UNKNOWN
        }
    }
}

/// Code and message to report for `err`. Suite-originated statuses keep
/// their code; everything else is `K_UNKNOWN` with the error's description.
fn status_of(err: BridgeError) -> (ErrorCode, String) {
    match err {
        BridgeError::Status { code, message } if code != K_OK => (code, message),
        other => (K_UNKNOWN, other.to_string()),
    }
}

unsafe fn write_message(view: *mut StringView, message: &str) {
    if let Some(view) = unsafe { view.as_mut() } {
        unsafe { view.write_str(message) };
    }
}
