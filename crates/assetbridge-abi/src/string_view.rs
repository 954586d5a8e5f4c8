use std::os::raw::c_char;
use std::ptr;

/// A borrowed, fixed-capacity buffer descriptor used for every string that
/// crosses the boundary.
///
/// The reader of a result allocates the storage and mints the view; the
/// writer fills at most `capacity` bytes and records how many it wrote in
/// `used_size`. A `StringView` never owns the memory it points to.
///
/// The field order is part of the binary contract and must not change.
#[repr(C)]
#[derive(Debug)]
pub struct StringView {
    pub capacity: usize,
    pub buffer: *mut c_char,
    pub used_size: usize,
}

impl Default for StringView {
    /// The null view: zero capacity, no storage.
    fn default() -> Self {
        Self {
            capacity: 0,
            buffer: ptr::null_mut(),
            used_size: 0,
        }
    }
}

impl StringView {
    /// An empty view over `storage`. The view does not carry the borrow, so
    /// `storage` must outlive every use of the returned descriptor.
    pub fn from_slice(storage: &mut [u8]) -> Self {
        Self {
            capacity: storage.len(),
            buffer: storage.as_mut_ptr().cast::<c_char>(),
            used_size: 0,
        }
    }

    /// A view over `storage` whose whole extent counts as written.
    pub fn with_contents(storage: &mut [u8]) -> Self {
        let mut view = Self::from_slice(storage);
        view.used_size = view.capacity;
        view
    }

    /// Number of readable bytes, clamped to the capacity.
    ///
    /// A writer that reports more than it was allowed to write is not
    /// trusted past `capacity`.
    pub fn len(&self) -> usize {
        if self.buffer.is_null() {
            0
        } else {
            self.used_size.min(self.capacity)
        }
    }

    /// True when nothing readable has been written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The written bytes, `buffer[0..min(used_size, capacity)]`.
    ///
    /// # Safety
    ///
    /// `buffer` must be null or valid for reads of `capacity` bytes for as
    /// long as the returned slice is alive, with no concurrent writer.
    pub unsafe fn as_bytes(&self) -> &[u8] {
        if self.buffer.is_null() {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(self.buffer.cast::<u8>().cast_const(), self.len()) }
    }

    /// Writer half: copy as much of `value` as fits and record the length.
    ///
    /// Truncation is silent and never splits a UTF-8 code point, so the
    /// written prefix is always valid UTF-8. Returns the number of bytes
    /// written. A null view accepts nothing.
    ///
    /// # Safety
    ///
    /// `buffer` must be null or valid for writes of `capacity` bytes, and not
    /// aliased by any live reference for the duration of the call.
    pub unsafe fn write_str(&mut self, value: &str) -> usize {
        if self.buffer.is_null() {
            self.used_size = 0;
            return 0;
        }
        let count = truncation_point(value, self.capacity);
        unsafe {
            ptr::copy_nonoverlapping(value.as_ptr(), self.buffer.cast::<u8>(), count);
        }
        self.used_size = count;
        count
    }
}

/// Largest prefix length of `value` that fits in `limit` bytes and ends on a
/// char boundary.
fn truncation_point(value: &str, limit: usize) -> usize {
    if value.len() <= limit {
        return value.len();
    }
    let mut end = limit;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    end
}

/// Caller-owned fixed storage for one string result.
///
/// This is the reader half of the protocol: the owner mints a
/// [`StringView`] with [`view`](Self::view), hands it to the writer, then
/// copies the result out of its own storage with
/// [`contents`](Self::contents). Reads are bounds-checked against `N`
/// regardless of what the writer reported.
pub struct StringBuffer<const N: usize> {
    storage: [u8; N],
}

impl<const N: usize> StringBuffer<N> {
    /// Size of the storage, and the capacity of every view minted from it.
    pub const CAPACITY: usize = N;

    /// Zeroed storage.
    pub fn new() -> Self {
        Self { storage: [0; N] }
    }

    /// A fresh, empty view over this buffer's storage.
    pub fn view(&mut self) -> StringView {
        StringView::from_slice(&mut self.storage)
    }

    /// The bytes written through `view`, clamped to this buffer's capacity.
    pub fn contents(&self, view: &StringView) -> &[u8] {
        &self.storage[..view.used_size.min(view.capacity).min(N)]
    }
}

impl<const N: usize> Default for StringBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
