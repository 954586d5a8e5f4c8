//! Stable C ABI contract shared by asset manager suites and their hosts.
//!
//! Everything in this crate is part of the binary contract between
//! independently compiled components. A suite provider and a host only ever
//! exchange the types defined here: [`StringView`] descriptors over
//! caller-owned storage, integer [`ErrorCode`]s, an opaque
//! [`ManagerInterfaceHandle`] and the [`ManagerInterfaceSuite`] function table.
//!
//! No memory is allocated or freed across the boundary. Every string that
//! crosses it is written into a fixed-capacity buffer owned by the caller.
//!
//! ```rust
//! use assetbridge_abi::{StringBuffer, K_OK};
//!
//! let mut out = StringBuffer::<16>::new();
//! let mut view = out.view();
//! // A suite implementation writes through the view...
//! let written = unsafe { view.write_str("org.example.manager") };
//! assert_eq!(written, 16);
//! // ...and the owner reads back from its own storage.
//! assert_eq!(out.contents(&view), b"org.example.mana");
//! assert_eq!(K_OK, 0);
//! ```

pub mod errors;
pub mod string_view;
pub mod suite;

pub use errors::{ErrorCode, K_OK, K_UNKNOWN, is_ok};
pub use string_view::{StringBuffer, StringView};
pub use suite::{
    DestructorFunction, ManagerInterfaceHandle, ManagerInterfaceOpaque, ManagerInterfaceSuite,
    StringFunction,
};
