use core::fmt;
use core::mem;
use core::ptr::NonNull;

use alloc::boxed::Box;

use crate::{BorrowedPtr, ConstNonNull, OwnedPtr};

// -----------------------------------------------------------------------------
// Ownership

/// The ownership mode observable on a non-empty [`ProxyHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// The handle frees the pointee when it is dropped.
    Owning,
    /// Teardown responsibility lies elsewhere; dropping the handle never
    /// touches the pointee.
    Borrowed,
}

// -----------------------------------------------------------------------------
// ProxyHandle

/// The runtime-selected union of [`OwnedPtr`] and [`BorrowedPtr`].
///
/// Each exposure site decides when the handle is built whether the wrapper
/// holding it owns the native value or merely borrows it; everything
/// downstream (teardown included) follows from that choice without further
/// branching on the caller's part.
///
/// # Moving
///
/// A handle is move-only. Besides the language-level move, [`take`] moves
/// the address and mode out in one combined operation and leaves an
/// observable [`Empty`](Self::Empty) state behind, which is how a wrapper
/// hands its handle to another wrapper without ever exposing a half-moved
/// state.
///
/// # Equality
///
/// Handles compare by backing address, never by mode. Two empty handles are
/// equal; empty never equals non-empty.
///
/// # Examples
///
/// ```
/// use nb_ptr::{Ownership, ProxyHandle};
///
/// let mut a = ProxyHandle::owning(Box::new(5));
/// assert_eq!(a.ownership(), Some(Ownership::Owning));
///
/// let b = a.take();
/// assert!(a.is_empty());
/// assert_eq!(b.ownership(), Some(Ownership::Owning));
/// // dropping `b` frees the value; dropping `a` is a no-op
/// ```
///
/// [`take`]: Self::take
pub enum ProxyHandle<T> {
    /// The wrapper owns the native value.
    Owned(OwnedPtr<T>),
    /// The native value is owned elsewhere.
    Borrowed(BorrowedPtr<T>),
    /// No backing address; what [`take`](Self::take) and
    /// [`release`](Self::release) leave behind.
    Empty,
}

impl<T> ProxyHandle<T> {
    /// Builds an owning handle over a fresh heap allocation.
    #[inline]
    pub fn owning(value: Box<T>) -> Self {
        Self::Owned(OwnedPtr::new(value))
    }

    /// Builds a borrowed handle over an existing value.
    ///
    /// The referent must outlive every dereference of the handle; that
    /// obligation is carried by the dereference sites, not checked here.
    #[inline]
    pub const fn borrowing(native: &T) -> Self {
        Self::Borrowed(BorrowedPtr::from_ref(native))
    }

    /// Builds an owning handle over a raw address.
    ///
    /// # Safety
    ///
    /// Same contract as [`OwnedPtr::from_raw`]: the address must come from
    /// [`Box::into_raw`] and have no other owner.
    #[inline]
    pub const unsafe fn wrap_owned(ptr: NonNull<T>) -> Self {
        // SAFETY: forwarded to the caller.
        Self::Owned(unsafe { OwnedPtr::from_raw(ptr) })
    }

    /// Builds a borrowed handle over a raw address.
    #[inline]
    pub const fn wrap_borrowed(ptr: NonNull<T>) -> Self {
        Self::Borrowed(BorrowedPtr::new(ptr))
    }

    /// The ownership mode, or `None` for an empty handle.
    #[inline]
    pub const fn ownership(&self) -> Option<Ownership> {
        match self {
            Self::Owned(_) => Some(Ownership::Owning),
            Self::Borrowed(_) => Some(Ownership::Borrowed),
            Self::Empty => None,
        }
    }

    /// Whether dropping this handle would free the pointee.
    #[inline]
    pub const fn is_owning(&self) -> bool {
        matches!(self, Self::Owned(_))
    }

    /// Whether the handle has been moved out of or released.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Current backing address, `None` when empty.
    #[inline]
    pub const fn target(&self) -> Option<ConstNonNull<T>> {
        match self {
            Self::Owned(ptr) => Some(ptr.target()),
            Self::Borrowed(ptr) => Some(ptr.target()),
            Self::Empty => None,
        }
    }

    /// Current backing address as a raw mutable pointer, `None` when empty.
    #[inline]
    pub const fn target_mut(&mut self) -> Option<NonNull<T>> {
        match self {
            Self::Owned(ptr) => Some(ptr.target_mut()),
            Self::Borrowed(ptr) => Some(ptr.target_mut()),
            Self::Empty => None,
        }
    }

    /// Moves address and mode out in one operation, leaving `Empty`.
    ///
    /// The pointee is never dropped by this transfer.
    #[inline]
    pub const fn take(&mut self) -> ProxyHandle<T> {
        mem::replace(self, Self::Empty)
    }

    /// Relinquishes the backing address without freeing, leaving `Empty`.
    ///
    /// For an owning handle this transfers teardown responsibility to the
    /// caller; for a borrowed handle it merely forgets the address.
    #[inline]
    pub fn release(&mut self) -> Option<NonNull<T>> {
        match self.take() {
            Self::Owned(ptr) => Some(ptr.into_raw()),
            Self::Borrowed(ptr) => Some(ptr.into_raw()),
            Self::Empty => None,
        }
    }

    /// Points the handle at a new address in borrowed mode.
    ///
    /// If the handle currently owns a pointee, that pointee is freed first;
    /// the new address is never adopted. Reassignment always states the
    /// resulting mode explicitly, so an owning handle cannot silently become
    /// responsible for an address it never allocated.
    #[inline]
    pub fn retarget_borrowed(&mut self, ptr: NonNull<T>) {
        if let Self::Owned(old) = self.take() {
            log::debug!(
                "retarget dropped owned pointee at {:p} for new target {ptr:p}",
                old.target(),
            );
        }
        *self = Self::Borrowed(BorrowedPtr::new(ptr));
    }

    /// Points the handle at a new address in owning mode.
    ///
    /// If the handle currently owns a pointee, that pointee is freed first.
    ///
    /// # Safety
    ///
    /// Same contract as [`OwnedPtr::from_raw`] for `ptr`.
    #[inline]
    pub unsafe fn retarget_owned(&mut self, ptr: NonNull<T>) {
        if let Self::Owned(old) = self.take() {
            log::debug!(
                "retarget dropped owned pointee at {:p} for new target {ptr:p}",
                old.target(),
            );
        }
        // SAFETY: forwarded to the caller.
        *self = Self::Owned(unsafe { OwnedPtr::from_raw(ptr) });
    }

    /// Return an immutable reference to the pointee.
    ///
    /// # Panics
    ///
    /// Panics if the handle is empty. Dereferencing an emptied handle is a
    /// precondition violation, not a recoverable condition.
    ///
    /// # Safety
    ///
    /// For a borrowed handle the pointee must still be live; see
    /// [`BorrowedPtr::as_ref`].
    #[inline]
    pub unsafe fn as_ref(&self) -> &T {
        match self {
            Self::Owned(ptr) => &**ptr,
            // SAFETY: liveness is the caller's contract.
            Self::Borrowed(ptr) => unsafe { ptr.as_ref() },
            Self::Empty => panic!("dereferenced an empty proxy handle"),
        }
    }

    /// Return a mutable reference to the pointee.
    ///
    /// # Panics
    ///
    /// Panics if the handle is empty.
    ///
    /// # Safety
    ///
    /// For a borrowed handle, see [`BorrowedPtr::as_mut`]: the address must
    /// have been captured mutably and the pointee must still be live.
    #[inline]
    pub unsafe fn as_mut(&mut self) -> &mut T {
        match self {
            Self::Owned(ptr) => &mut **ptr,
            // SAFETY: liveness, provenance and aliasing are the caller's
            // contract.
            Self::Borrowed(ptr) => unsafe { ptr.as_mut() },
            Self::Empty => panic!("dereferenced an empty proxy handle"),
        }
    }
}

impl<T> Default for ProxyHandle<T> {
    #[inline]
    fn default() -> Self {
        Self::Empty
    }
}

impl<T> From<OwnedPtr<T>> for ProxyHandle<T> {
    #[inline]
    fn from(ptr: OwnedPtr<T>) -> Self {
        Self::Owned(ptr)
    }
}

impl<T> From<BorrowedPtr<T>> for ProxyHandle<T> {
    #[inline]
    fn from(ptr: BorrowedPtr<T>) -> Self {
        Self::Borrowed(ptr)
    }
}

impl<T> PartialEq for ProxyHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self.target(), other.target()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T> Eq for ProxyHandle<T> {}

impl<T> fmt::Debug for ProxyHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owned(ptr) => write!(f, "ProxyHandle::Owned({:?})", ptr.target()),
            Self::Borrowed(ptr) => write!(f, "ProxyHandle::Borrowed({:?})", ptr.target()),
            Self::Empty => f.write_str("ProxyHandle::Empty"),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::sync::Arc;
    use core::ptr::NonNull;
    use core::sync::atomic::{AtomicUsize, Ordering};

    use super::{Ownership, ProxyHandle};

    struct Probe {
        value: i32,
        drops: Arc<AtomicUsize>,
    }

    impl Drop for Probe {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn probe(value: i32) -> (Box<Probe>, Arc<AtomicUsize>) {
        let drops = Arc::new(AtomicUsize::new(0));
        let probe = Box::new(Probe {
            value,
            drops: Arc::clone(&drops),
        });
        (probe, drops)
    }

    #[test]
    fn owning_drop_frees_exactly_once() {
        let (boxed, drops) = probe(5);
        let handle = ProxyHandle::owning(boxed);
        // SAFETY: an owning handle keeps its pointee live.
        assert_eq!(unsafe { handle.as_ref().value }, 5);
        assert_eq!(drops.load(Ordering::Relaxed), 0);
        drop(handle);
        assert_eq!(drops.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn borrowed_drop_leaves_pointee_alone() {
        let (boxed, drops) = probe(5);
        let handle = ProxyHandle::borrowing(&*boxed);
        drop(handle);
        assert_eq!(drops.load(Ordering::Relaxed), 0);
        drop(boxed);
        assert_eq!(drops.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn take_transfers_address_and_mode() {
        let (boxed, drops) = probe(5);
        let mut a = ProxyHandle::owning(boxed);
        let addr = a.target().unwrap();

        let b = a.take();
        assert!(a.is_empty());
        assert!(a.target().is_none());
        assert_eq!(b.target(), Some(addr));
        assert_eq!(b.ownership(), Some(Ownership::Owning));

        drop(a);
        drop(b);
        assert_eq!(drops.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn release_relinquishes_without_freeing() {
        let (boxed, drops) = probe(5);
        let mut handle = ProxyHandle::owning(boxed);

        let raw = handle.release().unwrap();
        assert!(handle.is_empty());
        drop(handle);
        assert_eq!(drops.load(Ordering::Relaxed), 0);

        // SAFETY: `raw` came out of `release` on an owning handle.
        drop(unsafe { Box::from_raw(raw.as_ptr()) });
        assert_eq!(drops.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn retarget_borrowed_keeps_mode_and_frees_nothing() {
        let first = 1;
        let mut second = 2;

        let mut handle = ProxyHandle::borrowing(&first);
        handle.retarget_borrowed(NonNull::from_mut(&mut second));

        assert_eq!(handle.ownership(), Some(Ownership::Borrowed));
        assert_eq!(
            handle.target().unwrap().as_ptr(),
            &raw const second,
        );
        assert_eq!(unsafe { *handle.as_ref() }, 2);
    }

    #[test]
    fn retarget_borrowed_frees_a_previously_owned_pointee() {
        let (first, first_drops) = probe(5);
        let (second, second_drops) = probe(9);

        let mut handle = ProxyHandle::owning(first);
        handle.retarget_borrowed(NonNull::from_ref(&*second));

        assert_eq!(first_drops.load(Ordering::Relaxed), 1);
        assert_eq!(second_drops.load(Ordering::Relaxed), 0);
        assert_eq!(handle.ownership(), Some(Ownership::Borrowed));

        drop(handle);
        assert_eq!(second_drops.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn equality_is_by_address_not_mode() {
        let (boxed, _drops) = probe(5);
        let owned = ProxyHandle::owning(boxed);
        let addr = owned.target().unwrap();

        // SAFETY: the owning handle keeps the pointee live; the borrowed
        // handle is dropped first.
        let borrowed =
            ProxyHandle::wrap_borrowed(NonNull::new(addr.as_ptr().cast_mut()).unwrap());
        assert_eq!(owned, borrowed);

        let empty = ProxyHandle::<Probe>::Empty;
        assert_ne!(owned, empty);
        assert_eq!(empty, ProxyHandle::<Probe>::Empty);
    }

    #[test]
    #[should_panic(expected = "empty proxy handle")]
    fn empty_dereference_panics() {
        let handle = ProxyHandle::<i32>::Empty;
        let _ = unsafe { handle.as_ref() };
    }
}
