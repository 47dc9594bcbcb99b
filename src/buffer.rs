use alloc::alloc::alloc;
use alloc::alloc::dealloc;
use core::alloc::Layout;
use core::fmt::Debug;
use core::marker::PhantomData;
use core::ops::Deref;
use core::ops::DerefMut;
use core::ptr::NonNull;

use crate::error::Error;
use crate::error::unwrap_infallible;

#[inline]
fn array_layout<T>(len: usize) -> Result<Layout, Error> {
    Layout::array::<T>(len).map_err(|_| Error::CapacityOverflow)
}

/// Allocates uninitialized storage for `len` values of `T`.
///
/// Zero-sized layouts never touch the allocator and yield a dangling,
/// well-aligned pointer.
fn allocate<T>(len: usize) -> Result<NonNull<T>, Error> {
    let layout = array_layout::<T>(len)?;
    if layout.size() == 0 {
        return Ok(NonNull::dangling());
    }

    // SAFETY: We have validated that the layout size is non-zero.
    let raw = unsafe { alloc(layout) };
    NonNull::new(raw.cast::<T>()).ok_or(Error::AllocError { layout })
}

/// Releases storage obtained from `allocate::<T>(len)`.
///
/// # Safety
///
/// `ptr` must come from `allocate::<T>(len)` with the same `len`, and no
/// value stored in it may be used afterwards.
unsafe fn deallocate<T>(ptr: NonNull<T>, len: usize) {
    // The layout was computed successfully when the storage was allocated.
    if let Ok(layout) = Layout::array::<T>(len)
        && layout.size() != 0
    {
        // SAFETY: Caller guarantees `ptr` was allocated with this layout.
        unsafe { dealloc(ptr.as_ptr().cast(), layout) };
    }
}

/// Owns a fresh allocation while it is being filled.
///
/// Values in `start..initialized` belong to the guard. If the guard is
/// dropped (for example because a constructor panicked), those values are
/// dropped and the allocation is released, so a partially built buffer
/// never escapes.
struct FillGuard<T> {
    ptr: NonNull<T>,
    capacity: usize,
    start: usize,
    initialized: usize,
}

impl<T> FillGuard<T> {
    #[inline]
    fn push(&mut self, value: T) {
        debug_assert!(self.initialized < self.capacity);
        // SAFETY: `initialized < capacity`, so the write stays inside the
        // allocation, and the slot holds no live value yet.
        unsafe { self.ptr.add(self.initialized).write(value) };
        self.initialized += 1;
    }

    /// Hands the allocation over to the caller without dropping anything.
    #[inline]
    fn finish(self) -> NonNull<T> {
        let ptr = self.ptr;
        core::mem::forget(self);
        ptr
    }
}

impl<T> Drop for FillGuard<T> {
    fn drop(&mut self) {
        // SAFETY: Values in `start..initialized` were written by `push` (or
        // handed to the guard by the caller) and are owned by the guard. The
        // allocation came from `allocate::<T>(capacity)`.
        unsafe {
            let live = core::ptr::slice_from_raw_parts_mut(
                self.ptr.add(self.start).as_ptr(),
                self.initialized - self.start,
            );
            core::ptr::drop_in_place(live);
            deallocate(self.ptr, self.capacity);
        }
    }
}

/// A fixed-length, heap-allocated run of initialized values.
///
/// `Buffer` manages its own allocation: elements are constructed one by one
/// into raw storage, destroyed in place, and released with the same layout.
/// Every operation that builds new storage is all-or-nothing; on failure
/// (allocation error or a panicking constructor) the new storage is
/// unwound and the existing buffer is left as it was.
///
/// The hash table stores its nodes here, so growing a table only ever
/// constructs empty nodes, never values of the user's type.
pub(crate) struct Buffer<T> {
    ptr: NonNull<T>,
    len: usize,
    _phantom: PhantomData<T>,
}

// SAFETY: `Buffer<T>` uniquely owns its values, like `Box<[T]>`.
unsafe impl<T: Send> Send for Buffer<T> {}
// SAFETY: Shared access only hands out `&T`.
unsafe impl<T: Sync> Sync for Buffer<T> {}

impl<T> Buffer<T> {
    /// Creates an empty buffer without allocating.
    #[inline]
    pub(crate) const fn new() -> Self {
        Buffer {
            ptr: NonNull::dangling(),
            len: 0,
            _phantom: PhantomData,
        }
    }

    /// Builds a buffer of `len` values, constructing the value at index `i`
    /// with `f(i)`.
    pub(crate) fn try_from_fn(len: usize, mut f: impl FnMut(usize) -> T) -> Result<Self, Error> {
        let ptr = allocate::<T>(len)?;
        let mut guard = FillGuard {
            ptr,
            capacity: len,
            start: 0,
            initialized: 0,
        };
        while guard.initialized < len {
            let value = f(guard.initialized);
            guard.push(value);
        }

        Ok(Buffer {
            ptr: guard.finish(),
            len,
            _phantom: PhantomData,
        })
    }

    #[cfg(test)]
    pub(crate) fn from_fn(len: usize, f: impl FnMut(usize) -> T) -> Self {
        unwrap_infallible(Self::try_from_fn(len, f))
    }

    /// Exchanges the contents of two buffers without touching any element.
    #[inline]
    pub(crate) fn swap(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.ptr, &mut other.ptr);
        core::mem::swap(&mut self.len, &mut other.len);
    }

    /// Changes the length of the buffer to `new_len`.
    ///
    /// Surviving elements are moved into a freshly allocated buffer; new
    /// positions are filled with values returned by `fill`, and elements
    /// past `new_len` are dropped. If allocation fails or `fill` panics, the
    /// buffer is left untouched.
    pub(crate) fn try_resize_with(
        &mut self,
        new_len: usize,
        mut fill: impl FnMut() -> T,
    ) -> Result<(), Error> {
        if new_len == self.len {
            return Ok(());
        }

        let survivors = self.len.min(new_len);
        let mut guard = FillGuard {
            ptr: allocate::<T>(new_len)?,
            capacity: new_len,
            start: survivors,
            initialized: survivors,
        };
        while guard.initialized < new_len {
            guard.push(fill());
        }
        let new_ptr = guard.finish();

        let old_ptr = core::mem::replace(&mut self.ptr, new_ptr);
        let old_len = core::mem::replace(&mut self.len, new_len);

        // SAFETY: Both allocations hold at least `survivors` slots and do not
        // overlap. The survivors are moved bitwise; the old allocation keeps
        // ownership of its tail only, which the guard drops before releasing
        // the old storage.
        unsafe {
            core::ptr::copy_nonoverlapping(old_ptr.as_ptr(), new_ptr.as_ptr(), survivors);
        }
        drop(FillGuard {
            ptr: old_ptr,
            capacity: old_len,
            start: survivors,
            initialized: old_len,
        });

        Ok(())
    }

    /// Size in bytes of the current allocation.
    #[cfg(any(test, feature = "stats"))]
    pub(crate) fn allocated_bytes(&self) -> usize {
        core::mem::size_of::<T>() * self.len
    }
}

impl<T> Deref for Buffer<T> {
    type Target = [T];

    #[inline(always)]
    fn deref(&self) -> &[T] {
        // SAFETY: `ptr` points to `len` initialized values (or is dangling
        // and well-aligned when `len == 0` or `T` is zero-sized).
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> DerefMut for Buffer<T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut [T] {
        // SAFETY: As for `deref`, and `&mut self` guarantees uniqueness.
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> Drop for Buffer<T> {
    fn drop(&mut self) {
        drop(FillGuard {
            ptr: self.ptr,
            capacity: self.len,
            start: 0,
            initialized: self.len,
        });
    }
}

impl<T> Default for Buffer<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Buffer<T> {
    fn clone(&self) -> Self {
        unwrap_infallible(Self::try_from_fn(self.len, |index| self[index].clone()))
    }
}

impl<T: Debug> Debug for Buffer<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
