use core::fmt;
use core::mem;
use core::ops::{Deref, DerefMut};
use core::ptr::NonNull;

use alloc::boxed::Box;

use crate::ConstNonNull;

// -----------------------------------------------------------------------------
// RawTarget

/// Read-only access to the address a pointer resolves to.
///
/// Implemented by [`OwnedPtr`] and [`BorrowedPtr`] so that code which only
/// needs to observe an address can accept either ownership mode.
pub trait RawTarget<T> {
    /// Current backing address.
    fn target(&self) -> ConstNonNull<T>;
}

// -----------------------------------------------------------------------------
// OwnedPtr

/// A move-only owner of a heap-allocated native value.
///
/// Dropping an `OwnedPtr` frees the pointee exactly once. There is no
/// `Clone` impl, so a second owner of the same allocation cannot be created
/// through this type and a double free is structurally impossible.
///
/// # Ownership
///
/// At most one owner may exist per allocation. The safe constructor takes a
/// [`Box`], which already guarantees this; [`from_raw`](Self::from_raw)
/// shifts the guarantee to the caller.
///
/// # Examples
///
/// ```
/// use nb_ptr::OwnedPtr;
///
/// let ptr = OwnedPtr::new(Box::new(42));
/// assert_eq!(*ptr, 42);
/// // dropping `ptr` frees the allocation
/// ```
#[repr(transparent)]
pub struct OwnedPtr<T>(NonNull<T>);

impl<T> OwnedPtr<T> {
    /// Takes ownership of a fresh heap allocation.
    #[inline]
    pub fn new(value: Box<T>) -> Self {
        // SAFETY: `Box::into_raw` never returns null.
        Self(unsafe { NonNull::new_unchecked(Box::into_raw(value)) })
    }

    /// Creates an `OwnedPtr` from a raw address.
    ///
    /// # Safety
    ///
    /// - `ptr` must come from [`Box::into_raw`] (or an allocation with the
    ///   same layout and allocator).
    /// - Nothing else may free the allocation afterwards.
    #[inline(always)]
    pub const unsafe fn from_raw(ptr: NonNull<T>) -> Self {
        Self(ptr)
    }

    /// Relinquishes ownership and returns the raw address without freeing.
    ///
    /// Whoever receives the address becomes responsible for the allocation.
    #[inline]
    pub fn into_raw(self) -> NonNull<T> {
        let ptr = self.0;
        mem::forget(self);
        ptr
    }

    /// Current backing address.
    #[inline(always)]
    pub const fn target(&self) -> ConstNonNull<T> {
        // SAFETY: `self.0` is non-null.
        unsafe { ConstNonNull::new_unchecked(self.0.as_ptr()) }
    }

    /// Current backing address, valid for writes.
    #[inline(always)]
    pub const fn target_mut(&mut self) -> NonNull<T> {
        self.0
    }
}

impl<T> Drop for OwnedPtr<T> {
    fn drop(&mut self) {
        // SAFETY: `self.0` originates from `Box::into_raw` and is uniquely
        // owned by this handle.
        drop(unsafe { Box::from_raw(self.0.as_ptr()) });
    }
}

impl<T> RawTarget<T> for OwnedPtr<T> {
    #[inline(always)]
    fn target(&self) -> ConstNonNull<T> {
        Self::target(self)
    }
}

impl<T> Deref for OwnedPtr<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        // SAFETY: the pointee is owned by `self` and live.
        unsafe { self.0.as_ref() }
    }
}

impl<T> DerefMut for OwnedPtr<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: the pointee is owned by `self` and live, and `&mut self`
        // guarantees exclusive access.
        unsafe { self.0.as_mut() }
    }
}

impl<T> fmt::Pointer for OwnedPtr<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.0, f)
    }
}

impl<T> fmt::Debug for OwnedPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnedPtr({:?})", self.0)
    }
}

// -----------------------------------------------------------------------------
// BorrowedPtr

/// A move-only reference to a native value whose lifetime is managed
/// elsewhere.
///
/// Dropping a `BorrowedPtr` never touches the pointee. The address is
/// captured without a lifetime, so keeping the pointee alive for as long as
/// the pointer is dereferenced is the caller's obligation, checked nowhere.
///
/// # Examples
///
/// ```
/// use nb_ptr::BorrowedPtr;
///
/// let value = 7;
/// let ptr = BorrowedPtr::from_ref(&value);
///
/// assert_eq!(unsafe { *ptr.as_ref() }, 7);
/// // dropping `ptr` leaves `value` untouched
/// ```
#[repr(transparent)]
pub struct BorrowedPtr<T>(NonNull<T>);

impl<T> BorrowedPtr<T> {
    /// Creates a `BorrowedPtr` from a raw address.
    ///
    /// Storing the address is safe; every dereference carries the liveness
    /// obligation.
    #[inline(always)]
    pub const fn new(ptr: NonNull<T>) -> Self {
        Self(ptr)
    }

    /// Captures the address of a referent.
    ///
    /// The pointer produced this way is read-only: it must not be used with
    /// [`as_mut`](Self::as_mut).
    #[inline(always)]
    pub const fn from_ref(r: &T) -> Self {
        Self(NonNull::from_ref(r))
    }

    /// Captures the address of a mutable referent, valid for writes.
    #[inline(always)]
    pub const fn from_mut(r: &mut T) -> Self {
        Self(NonNull::from_mut(r))
    }

    /// Returns the raw address, consuming the pointer.
    #[inline(always)]
    pub const fn into_raw(self) -> NonNull<T> {
        self.0
    }

    /// Current backing address.
    #[inline(always)]
    pub const fn target(&self) -> ConstNonNull<T> {
        // SAFETY: `self.0` is non-null.
        unsafe { ConstNonNull::new_unchecked(self.0.as_ptr()) }
    }

    /// Current backing address as a raw mutable pointer.
    #[inline(always)]
    pub const fn target_mut(&mut self) -> NonNull<T> {
        self.0
    }

    /// Return an immutable reference to the pointee.
    ///
    /// # Safety
    ///
    /// - The pointee must still be live, at the captured address.
    /// - It must not be mutated while the returned reference is active.
    #[inline(always)]
    pub const unsafe fn as_ref<'a>(&self) -> &'a T {
        // SAFETY: liveness and aliasing are the caller's contract.
        unsafe { self.0.as_ref() }
    }

    /// Return a mutable reference to the pointee.
    ///
    /// # Safety
    ///
    /// - The pointee must still be live, at the captured address.
    /// - The address must have been captured from a mutable referent
    ///   ([`from_mut`](Self::from_mut) or an exclusive raw pointer), and no
    ///   other access may alias the returned reference.
    #[inline(always)]
    pub const unsafe fn as_mut<'a>(&mut self) -> &'a mut T {
        // SAFETY: liveness, provenance and aliasing are the caller's
        // contract.
        unsafe { &mut *self.0.as_ptr() }
    }
}

impl<T> RawTarget<T> for BorrowedPtr<T> {
    #[inline(always)]
    fn target(&self) -> ConstNonNull<T> {
        Self::target(self)
    }
}

impl<T> fmt::Pointer for BorrowedPtr<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.0, f)
    }
}

impl<T> fmt::Debug for BorrowedPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BorrowedPtr({:?})", self.0)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use super::{BorrowedPtr, OwnedPtr, RawTarget};
    use crate::ConstNonNull;

    fn observed<T, P: RawTarget<T>>(ptr: &P) -> ConstNonNull<T> {
        ptr.target()
    }

    #[test]
    fn both_modes_expose_the_same_address_capability() {
        let mut owned = OwnedPtr::new(Box::new(3));
        let borrowed = BorrowedPtr::from_ref(&*owned);

        assert_eq!(observed(&owned), observed(&borrowed));
        assert_eq!(observed(&owned).as_ptr(), owned.target_mut().as_ptr());
    }

    #[test]
    fn owned_ptr_reads_and_writes_through() {
        let mut ptr = OwnedPtr::new(Box::new(3));
        *ptr += 1;
        assert_eq!(*ptr, 4);
    }

    #[test]
    fn into_raw_hands_the_allocation_back() {
        let ptr = OwnedPtr::new(Box::new(3));
        let raw = ptr.into_raw();

        // SAFETY: `raw` came out of `into_raw`, so we are the only owner.
        let boxed = unsafe { Box::from_raw(raw.as_ptr()) };
        assert_eq!(*boxed, 3);
    }

    #[test]
    fn borrowed_ptr_writes_through_a_mutable_capture() {
        let mut value = 3;
        let mut ptr = BorrowedPtr::from_mut(&mut value);

        // SAFETY: `value` is live and the capture was mutable.
        *unsafe { ptr.as_mut() } += 1;
        assert_eq!(value, 4);
    }
}
