use std::fmt;
use std::mem::ManuallyDrop;

use assetbridge_abi::{ManagerInterfaceHandle, ManagerInterfaceSuite, StringBuffer, StringFunction};

use crate::error::{BridgeError, check_status};
use crate::interface::{ManagerInterface, Settings};

/// Capacity of every result and error message buffer passed to a suite.
///
/// Both sides only rely on `used_size <= capacity`, so this can be tuned
/// without changing the protocol.
pub const STRING_BUFFER_SIZE: usize = 500;

/// A [`ManagerInterface`] backed by a C suite and the handle it operates on.
///
/// The adapter owns the handle: it is passed verbatim to every suite call
/// and released through the suite's `dtor` exactly once, either by an
/// explicit [`release`](Self::release) or when the adapter is dropped.
///
/// Every call allocates its own stack buffers of [`STRING_BUFFER_SIZE`]
/// bytes and copies the result out before returning, so nothing is shared
/// between calls. A result longer than the buffer is truncated by the suite
/// and cannot be told apart from one that fits exactly.
pub struct CManagerInterface {
    /// `None` once released.
    handle: Option<ManagerInterfaceHandle>,
    suite: ManagerInterfaceSuite,
}

// SAFETY: the handle is only ever passed to the suite, and `new` requires
// the supplier to guarantee the suite may be called from any thread.
unsafe impl Send for CManagerInterface {}
unsafe impl Sync for CManagerInterface {}

impl CManagerInterface {
    /// Take ownership of `handle`, to be operated on through `suite`.
    ///
    /// # Safety
    ///
    /// * `suite` must be fully populated with functions that honour the
    ///   string view contract for `handle`.
    /// * `handle` must not be released by anyone else; the adapter calls
    ///   `suite.dtor` on it exactly once.
    /// * The suite must tolerate being called from any thread. Calls through
    ///   `&self` may be concurrent unless the caller serializes them.
    pub unsafe fn new(handle: ManagerInterfaceHandle, suite: ManagerInterfaceSuite) -> Self {
        Self {
            handle: Some(handle),
            suite,
        }
    }

    pub fn identifier(&self) -> Result<String, BridgeError> {
        self.call_string("identifier", self.suite.identifier)
    }

    pub fn display_name(&self) -> Result<String, BridgeError> {
        self.call_string("display_name", self.suite.display_name)
    }

    /// Release the handle through the suite's destructor.
    ///
    /// Idempotent: only the first call reaches the suite. Any method called
    /// afterwards fails with [`BridgeError::Released`].
    pub fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            tracing::debug!("Releasing manager interface handle");
            // SAFETY: `handle` was taken out of `self`, so no other path can
            // reach the destructor for it again.
            unsafe { (self.suite.dtor)(handle) };
        }
    }

    pub fn is_released(&self) -> bool {
        self.handle.is_none()
    }

    /// Give up ownership of the handle without releasing it.
    ///
    /// Returns `None` if the handle has already been released.
    pub fn into_raw(self) -> Option<(ManagerInterfaceHandle, ManagerInterfaceSuite)> {
        let mut this = ManuallyDrop::new(self);
        let suite = this.suite;
        this.handle.take().map(|handle| (handle, suite))
    }

    fn call_string(
        &self,
        operation: &'static str,
        function: StringFunction,
    ) -> Result<String, BridgeError> {
        let handle = self.handle.ok_or(BridgeError::Released { operation })?;

        let mut error_buffer = StringBuffer::<STRING_BUFFER_SIZE>::new();
        let mut error_message = error_buffer.view();
        let mut out_buffer = StringBuffer::<STRING_BUFFER_SIZE>::new();
        let mut out = out_buffer.view();

        tracing::trace!(operation, "Invoking suite function");

        // SAFETY: both views describe live local buffers of the capacity they
        // advertise, and `handle` is still owned by this adapter.
        let code = unsafe { function(&mut error_message, &mut out, handle) };

        if let Err(err) = check_status(code, error_buffer.contents(&error_message)) {
            tracing::debug!(operation, code, error = %err, "Suite function reported failure");
            return Err(err);
        }

        String::from_utf8(out_buffer.contents(&out).to_vec())
            .map_err(|_| BridgeError::InvalidUtf8 { operation })
    }
}

impl ManagerInterface for CManagerInterface {
    fn identifier(&self) -> Result<String, BridgeError> {
        CManagerInterface::identifier(self)
    }

    fn display_name(&self) -> Result<String, BridgeError> {
        CManagerInterface::display_name(self)
    }

    /// The suite has no entry that accepts settings, so only an empty set
    /// can be honoured.
    fn initialize(&self, settings: Settings) -> Result<(), BridgeError> {
        if settings.is_empty() {
            return Ok(());
        }
        tracing::warn!(settings = settings.len(), "Suite cannot accept manager settings");
        Err(BridgeError::Unsupported {
            operation: "initialize",
        })
    }
}

impl Drop for CManagerInterface {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for CManagerInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CManagerInterface")
            .field("handle", &self.handle)
            .field("released", &self.is_released())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetbridge_abi::{ErrorCode, K_OK, ManagerInterfaceOpaque, StringView};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Per-test state reached through the handle.
    struct Fixture {
        identifier: Vec<u8>,
        code: ErrorCode,
        message: &'static str,
        dtor_calls: AtomicUsize,
        calls: AtomicUsize,
    }

    impl Fixture {
        fn returning(identifier: &str) -> Self {
            Self {
                identifier: identifier.as_bytes().to_vec(),
                code: K_OK,
                message: "",
                dtor_calls: AtomicUsize::new(0),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(code: ErrorCode, message: &'static str) -> Self {
            Self {
                code,
                message,
                ..Self::returning("")
            }
        }

        fn handle(&self) -> ManagerInterfaceHandle {
            self as *const Fixture as *mut ManagerInterfaceOpaque
        }
    }

    unsafe fn fixture<'a>(handle: ManagerInterfaceHandle) -> &'a Fixture {
        unsafe { &*(handle as *const Fixture) }
    }

    unsafe fn write_bytes(view: *mut StringView, bytes: &[u8]) {
        let view = unsafe { &mut *view };
        let count = bytes.len().min(view.capacity);
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), view.buffer.cast::<u8>(), count);
        }
        view.used_size = count;
    }

    unsafe extern "C" fn counting_dtor(handle: ManagerInterfaceHandle) {
        unsafe { fixture(handle) }
            .dtor_calls
            .fetch_add(1, Ordering::SeqCst);
    }

    unsafe extern "C" fn identifier_entry(
        error_message: *mut StringView,
        out: *mut StringView,
        handle: ManagerInterfaceHandle,
    ) -> ErrorCode {
        let fixture = unsafe { fixture(handle) };
        fixture.calls.fetch_add(1, Ordering::SeqCst);
        if fixture.code != K_OK {
            unsafe { (*error_message).write_str(fixture.message) };
            return fixture.code;
        }
        unsafe { write_bytes(out, &fixture.identifier) };
        K_OK
    }

    unsafe extern "C" fn display_name_entry(
        _error_message: *mut StringView,
        out: *mut StringView,
        _handle: ManagerInterfaceHandle,
    ) -> ErrorCode {
        unsafe { (*out).write_str("Test Manager") };
        K_OK
    }

    /// Alternates a result that overflows the buffer with a short one.
    unsafe extern "C" fn alternating_entry(
        _error_message: *mut StringView,
        out: *mut StringView,
        handle: ManagerInterfaceHandle,
    ) -> ErrorCode {
        let call = unsafe { fixture(handle) }
            .calls
            .fetch_add(1, Ordering::SeqCst);
        let value = if call % 2 == 0 {
            "x".repeat(STRING_BUFFER_SIZE * 2)
        } else {
            "short".to_string()
        };
        unsafe { (*out).write_str(&value) };
        K_OK
    }

    fn suite() -> ManagerInterfaceSuite {
        ManagerInterfaceSuite {
            dtor: counting_dtor,
            identifier: identifier_entry,
            display_name: display_name_entry,
        }
    }

    fn adapter(fixture: &Fixture) -> CManagerInterface {
        unsafe { CManagerInterface::new(fixture.handle(), suite()) }
    }

    #[test]
    fn identifier_returns_written_value() {
        let fixture = Fixture::returning("org.example.manager");
        let manager = adapter(&fixture);

        assert_eq!(manager.identifier().unwrap(), "org.example.manager");
    }

    #[test]
    fn display_name_returns_written_value() {
        let fixture = Fixture::returning("");
        let manager = adapter(&fixture);

        assert_eq!(manager.display_name().unwrap(), "Test Manager");
    }

    #[test]
    fn zero_length_result_is_empty_string() {
        let fixture = Fixture::returning("");
        let manager = adapter(&fixture);

        assert_eq!(manager.identifier().unwrap(), "");
    }

    #[test]
    fn result_at_full_capacity_is_returned_whole() {
        let value = "a".repeat(STRING_BUFFER_SIZE);
        let fixture = Fixture::returning(&value);
        let manager = adapter(&fixture);

        assert_eq!(manager.identifier().unwrap(), value);
    }

    #[test]
    fn overlong_result_is_cut_at_capacity() {
        let fixture = Fixture::returning(&"b".repeat(STRING_BUFFER_SIZE + 20));
        let manager = adapter(&fixture);

        assert_eq!(manager.identifier().unwrap().len(), STRING_BUFFER_SIZE);
    }

    #[test]
    fn suite_failure_becomes_status_error() {
        let fixture = Fixture::failing(123, "some error");
        let manager = adapter(&fixture);

        let err = manager.identifier().unwrap_err();

        assert_eq!(err.to_string(), "123: some error");
        assert_eq!(err.code(), Some(123));
    }

    #[test]
    fn overlong_error_message_is_cut_at_capacity() {
        let message: &'static str = "e".repeat(STRING_BUFFER_SIZE + 100).leak();
        let fixture = Fixture::failing(3, message);
        let manager = adapter(&fixture);

        let err = manager.identifier().unwrap_err();

        assert_eq!(
            err.to_string(),
            format!("3: {}", &message[..STRING_BUFFER_SIZE])
        );
    }

    #[test]
    fn initialize_with_empty_settings_succeeds() {
        let fixture = Fixture::returning("id");
        let manager = adapter(&fixture);

        ManagerInterface::initialize(&manager, Settings::new()).unwrap();
    }

    #[test]
    fn initialize_with_settings_is_unsupported() {
        let fixture = Fixture::returning("id");
        let manager = adapter(&fixture);
        let settings = Settings::from([("library_path".to_string(), "/assets".into())]);

        let err = ManagerInterface::initialize(&manager, settings).unwrap_err();

        assert!(matches!(
            err,
            BridgeError::Unsupported {
                operation: "initialize"
            }
        ));
        assert_eq!(fixture.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn suite_failure_without_message_has_empty_description() {
        let fixture = Fixture::failing(5, "");
        let manager = adapter(&fixture);

        assert_eq!(manager.identifier().unwrap_err().to_string(), "5: ");
    }

    #[test]
    fn non_utf8_result_is_rejected() {
        let mut fixture = Fixture::returning("");
        fixture.identifier = vec![b'o', b'k', 0xc3];
        let manager = adapter(&fixture);

        assert!(matches!(
            manager.identifier(),
            Err(BridgeError::InvalidUtf8 {
                operation: "identifier"
            })
        ));
    }

    #[test]
    fn sequential_calls_do_not_share_buffers() {
        let fixture = Fixture::returning("");
        let mut table = suite();
        table.identifier = alternating_entry;
        let manager = unsafe { CManagerInterface::new(fixture.handle(), table) };

        assert_eq!(manager.identifier().unwrap().len(), STRING_BUFFER_SIZE);
        assert_eq!(manager.identifier().unwrap(), "short");
        assert_eq!(manager.identifier().unwrap().len(), STRING_BUFFER_SIZE);
    }

    #[test]
    fn drop_calls_dtor_once() {
        let fixture = Fixture::returning("id");
        {
            let manager = adapter(&fixture);
            manager.identifier().unwrap();
            assert_eq!(fixture.dtor_calls.load(Ordering::SeqCst), 0);
        }
        assert_eq!(fixture.dtor_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dtor_runs_when_a_call_fails() {
        let fixture = Fixture::failing(9, "nope");
        {
            let manager = adapter(&fixture);
            assert!(manager.identifier().is_err());
        }
        assert_eq!(fixture.dtor_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn explicit_release_then_drop_calls_dtor_once() {
        let fixture = Fixture::returning("id");
        let mut manager = adapter(&fixture);

        manager.release();
        manager.release();
        assert!(manager.is_released());
        drop(manager);

        assert_eq!(fixture.dtor_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn calls_after_release_fail_without_reaching_suite() {
        let fixture = Fixture::returning("id");
        let mut manager = adapter(&fixture);
        manager.release();

        let err = manager.identifier().unwrap_err();

        assert!(matches!(err, BridgeError::Released { .. }));
        assert_eq!(fixture.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn moved_adapter_releases_once() {
        let fixture = Fixture::returning("id");
        let manager = adapter(&fixture);
        let boxed: Box<dyn ManagerInterface> = Box::new(manager);

        assert_eq!(boxed.identifier().unwrap(), "id");
        drop(boxed);

        assert_eq!(fixture.dtor_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn into_raw_hands_back_ownership() {
        let fixture = Fixture::returning("id");
        let manager = adapter(&fixture);

        let (handle, suite) = manager.into_raw().unwrap();
        assert_eq!(handle, fixture.handle());
        assert_eq!(fixture.dtor_calls.load(Ordering::SeqCst), 0);

        let manager = unsafe { CManagerInterface::new(handle, suite) };
        drop(manager);
        assert_eq!(fixture.dtor_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn into_raw_after_release_is_none() {
        let fixture = Fixture::returning("id");
        let mut manager = adapter(&fixture);
        manager.release();

        assert!(manager.into_raw().is_none());
        assert_eq!(fixture.dtor_calls.load(Ordering::SeqCst), 1);
    }
}
