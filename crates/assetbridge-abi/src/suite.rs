use std::marker::{PhantomData, PhantomPinned};

use crate::errors::ErrorCode;
use crate::string_view::StringView;

/// Opaque target of a [`ManagerInterfaceHandle`].
///
/// Only the suite that produced a handle knows what it points to. The marker
/// keeps the type unconstructible, `!Send`, `!Sync` and `!Unpin`.
#[repr(C)]
pub struct ManagerInterfaceOpaque {
    _private: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// Opaque handle to one manager instance, passed verbatim to every suite call.
pub type ManagerInterfaceHandle = *mut ManagerInterfaceOpaque;

/// Uniform shape of every string-valued suite operation:
/// `(error_message, out, handle) -> status`.
///
/// On success the implementation fills `out`; on failure it may fill
/// `error_message`. It must never write past either view's capacity.
pub type StringFunction = unsafe extern "C" fn(
    error_message: *mut StringView,
    out: *mut StringView,
    handle: ManagerInterfaceHandle,
) -> ErrorCode;

/// Releases the handle. Called exactly once per handle.
pub type DestructorFunction = unsafe extern "C" fn(handle: ManagerInterfaceHandle);

/// Function table implementing one manager's operations.
///
/// Bound to a handle's concrete implementation, fully populated by its
/// supplier and never mutated afterwards. The suite does not own the handle.
/// Field order is part of the binary contract.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ManagerInterfaceSuite {
    pub dtor: DestructorFunction,
    pub identifier: StringFunction,
    pub display_name: StringFunction,
}
