use core::fmt;
use core::ptr::NonNull;

use alloc::boxed::Box;

use nb_ptr::{ConstNonNull, ErasedAddr, ErasedAddrMut, ProxyHandle};

// -----------------------------------------------------------------------------
// ProxyObject

/// A managed wrapper around a native value.
///
/// Implementors hold exactly one [`ProxyHandle`] and surface it through
/// [`handle`](Self::handle); everything else is provided. The wrapper's
/// identity is the handle's backing address, never the wrapper itself.
///
/// Construction goes through [`wrap_owned`](Self::wrap_owned) or
/// [`wrap_borrowed`](Self::wrap_borrowed), which install the handle and
/// then invoke [`attached`](Self::attached) exactly once.
/// [`from_handle`](Self::from_handle) is the raw constructor those entry
/// points build on; calling it directly skips the hook.
pub trait ProxyObject: Sized {
    /// The backing native type.
    type Native: 'static;

    /// Builds the wrapper around an already-installed handle.
    fn from_handle(handle: ProxyHandle<Self::Native>) -> Self;

    /// The wrapper's handle.
    fn handle(&self) -> &ProxyHandle<Self::Native>;

    /// One-time hook, invoked right after the handle is installed.
    ///
    /// Wrapper types that need to register with the native side (a delegate,
    /// a callback pointing back at the wrapper) override this; the default
    /// does nothing. The hook runs unconditionally on every wrap
    /// constructor, so there is no optional-capability probing at runtime.
    #[inline]
    fn attached(&mut self) {}

    /// Footprint of the backing native type in bytes.
    #[inline]
    fn native_size() -> usize {
        size_of::<Self::Native>()
    }

    /// Wraps a native allocation, taking ownership of it.
    ///
    /// # Safety
    ///
    /// Same contract as [`ProxyHandle::wrap_owned`]: `ptr` must come from
    /// [`Box::into_raw`](alloc::boxed::Box::into_raw) and have no other
    /// owner.
    #[inline]
    unsafe fn wrap_owned(ptr: NonNull<Self::Native>) -> Self {
        // SAFETY: forwarded to the caller.
        let mut proxy = Self::from_handle(unsafe { ProxyHandle::wrap_owned(ptr) });
        proxy.attached();
        proxy
    }

    /// Wraps a native address without taking ownership of it.
    ///
    /// The pointee must outlive every dereference of the wrapper; that
    /// obligation is carried by the dereference sites, not checked here.
    #[inline]
    fn wrap_borrowed(ptr: NonNull<Self::Native>) -> Self {
        let mut proxy = Self::from_handle(ProxyHandle::wrap_borrowed(ptr));
        proxy.attached();
        proxy
    }

    /// Current backing address, `None` for an emptied wrapper.
    #[inline]
    fn target(&self) -> Option<ConstNonNull<Self::Native>> {
        self.handle().target()
    }
}

// -----------------------------------------------------------------------------
// ProxyObjectMut

/// A [`ProxyObject`] that additionally exposes mutation of its pointee.
pub trait ProxyObjectMut: ProxyObject {
    /// The wrapper's handle, mutably.
    fn handle_mut(&mut self) -> &mut ProxyHandle<Self::Native>;

    /// Current backing address, valid for writes; `None` for an emptied
    /// wrapper.
    #[inline]
    fn target_mut(&mut self) -> Option<NonNull<Self::Native>> {
        self.handle_mut().target_mut()
    }
}

// -----------------------------------------------------------------------------
// AnyProxy

/// The object-safe wrapper protocol, as the managed runtime sees it.
///
/// The runtime stores wrappers untyped, so this trait only speaks in
/// type-erased addresses. It is blanket-implemented for every
/// [`ProxyObject`].
pub trait AnyProxy {
    /// Type-erased backing address, `None` for an emptied wrapper.
    fn erased_target(&self) -> Option<ErasedAddr<'_>>;

    /// Footprint of the backing native type in bytes.
    fn native_size(&self) -> usize;
}

impl<P: ProxyObject> AnyProxy for P {
    #[inline]
    fn erased_target(&self) -> Option<ErasedAddr<'_>> {
        // SAFETY: the address stays valid while `self` is borrowed; pointee
        // liveness beyond that is the wrapper's caller contract and is
        // re-checked at no point, exactly as for any dereference.
        self.handle()
            .target()
            .map(|ptr| unsafe { ErasedAddr::from_raw(ptr) })
    }

    #[inline]
    fn native_size(&self) -> usize {
        P::native_size()
    }
}

// -----------------------------------------------------------------------------
// AnyProxyMut

/// The object-safe protocol for wrappers that expose mutation.
pub trait AnyProxyMut: AnyProxy {
    /// Type-erased backing address valid for writes, `None` for an emptied
    /// wrapper.
    fn erased_target_mut(&mut self) -> Option<ErasedAddrMut<'_>>;
}

impl<P: ProxyObjectMut> AnyProxyMut for P {
    #[inline]
    fn erased_target_mut(&mut self) -> Option<ErasedAddrMut<'_>> {
        // SAFETY: as for `erased_target`, plus exclusivity from `&mut self`.
        self.handle_mut()
            .target_mut()
            .map(|ptr| unsafe { ErasedAddrMut::from_raw(ptr) })
    }
}

// -----------------------------------------------------------------------------
// NativeProxy

/// A ready-made wrapper for any native type.
///
/// Exposing a native type needs nothing beyond the type parameter: the three
/// canonical operations (wrap owned, wrap borrowed, unwrap) all come from
/// the [`ProxyObject`] impl. Wrapper types with custom behavior (extra
/// fields, an [`attached`](ProxyObject::attached) hook) implement
/// [`ProxyObject`] themselves instead.
///
/// # Examples
///
/// ```
/// use nb_proxy::NativeProxy;
///
/// let proxy = NativeProxy::owning(Box::new(5i32));
///
/// // SAFETY: an owning wrapper keeps its pointee live.
/// assert_eq!(unsafe { *proxy.native() }, 5);
/// ```
pub struct NativeProxy<T: 'static> {
    handle: ProxyHandle<T>,
}

impl<T: 'static> NativeProxy<T> {
    /// Wraps a fresh heap allocation, taking ownership of it.
    #[inline]
    pub fn owning(value: Box<T>) -> Self {
        let mut proxy = Self::from_handle(ProxyHandle::owning(value));
        proxy.attached();
        proxy
    }

    /// Wraps an existing value without taking ownership of it.
    #[inline]
    pub fn borrowing(native: &T) -> Self {
        crate::to_proxy(native)
    }

    /// Reference to the pointee.
    ///
    /// # Panics
    ///
    /// Panics if the wrapper has been emptied.
    ///
    /// # Safety
    ///
    /// For a borrowed wrapper the pointee must still be live; see
    /// [`ProxyHandle::as_ref`].
    #[inline]
    pub unsafe fn native(&self) -> &T {
        // SAFETY: forwarded to the caller.
        unsafe { self.handle.as_ref() }
    }

    /// Mutable reference to the pointee.
    ///
    /// # Panics
    ///
    /// Panics if the wrapper has been emptied.
    ///
    /// # Safety
    ///
    /// For a borrowed wrapper, see [`ProxyHandle::as_mut`].
    #[inline]
    pub unsafe fn native_mut(&mut self) -> &mut T {
        // SAFETY: forwarded to the caller.
        unsafe { self.handle.as_mut() }
    }
}

impl<T: 'static> ProxyObject for NativeProxy<T> {
    type Native = T;

    #[inline]
    fn from_handle(handle: ProxyHandle<T>) -> Self {
        Self { handle }
    }

    #[inline]
    fn handle(&self) -> &ProxyHandle<T> {
        &self.handle
    }
}

impl<T: 'static> ProxyObjectMut for NativeProxy<T> {
    #[inline]
    fn handle_mut(&mut self) -> &mut ProxyHandle<T> {
        &mut self.handle
    }
}

impl<T: 'static> fmt::Debug for NativeProxy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.handle.target() {
            Some(ptr) => write!(f, "NativeProxy({ptr:?})"),
            None => f.write_str("NativeProxy(empty)"),
        }
    }
}
