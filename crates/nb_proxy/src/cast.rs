use core::ptr::NonNull;

use crate::{AnyProxy, AnyProxyMut, ProxyObject, ProxyObjectMut};

// -----------------------------------------------------------------------------
// Native reference -> wrapper

/// Builds a borrowed wrapper around an existing native value.
///
/// The wrapper records the referent's address and nothing else; the native
/// value must outlive every dereference of the wrapper. That obligation is
/// the caller's and is not detected when violated.
///
/// # Examples
///
/// ```
/// use nb_proxy::{to_proxy, NativeProxy, ProxyObject};
///
/// let value = 41i32;
/// let proxy: NativeProxy<i32> = to_proxy(&value);
///
/// assert_eq!(proxy.target().unwrap().as_ptr(), &raw const value);
/// ```
#[inline]
pub fn to_proxy<P: ProxyObject>(native: &P::Native) -> P {
    P::wrap_borrowed(NonNull::from_ref(native))
}

/// Builds a borrowed wrapper around an existing native value, with the
/// address captured mutably so the wrapper's mutation surface is usable.
#[inline]
pub fn to_proxy_mut<P: ProxyObjectMut>(native: &mut P::Native) -> P {
    P::wrap_borrowed(NonNull::from_mut(native))
}

// -----------------------------------------------------------------------------
// Wrapper -> native reference

/// Recovers a native reference from a wrapper by reinterpreting its backing
/// address as a `T`.
///
/// No type information is consulted at runtime in release builds; debug
/// builds check the address's type tag and panic on a mismatch.
///
/// # Panics
///
/// Panics if the wrapper has been emptied, and in debug builds if `T` is
/// not the wrapper's backing type.
///
/// # Safety
///
/// - `T` must be the wrapper's backing native type.
/// - The pointee must still be live (borrowed wrappers only record an
///   address).
#[inline]
pub unsafe fn from_proxy<T: 'static>(proxy: &dyn AnyProxy) -> &T {
    let addr = match proxy.erased_target() {
        Some(addr) => addr,
        None => panic!("dereferenced an empty proxy"),
    };
    // SAFETY: forwarded to the caller; debug builds verify the type tag.
    unsafe { addr.as_ref::<T>() }
}

/// Recovers a mutable native reference from a wrapper.
///
/// # Panics
///
/// Panics if the wrapper has been emptied, and in debug builds if `T` is
/// not the wrapper's backing type.
///
/// # Safety
///
/// - `T` must be the wrapper's backing native type.
/// - The pointee must still be live, and the wrapper's address must have
///   been captured mutably (see [`to_proxy_mut`]).
#[inline]
pub unsafe fn from_proxy_mut<T: 'static>(proxy: &mut dyn AnyProxyMut) -> &mut T {
    let addr = match proxy.erased_target_mut() {
        Some(addr) => addr,
        None => panic!("dereferenced an empty proxy"),
    };
    // SAFETY: forwarded to the caller; debug builds verify the type tag.
    unsafe { addr.consume::<T>() }
}

// -----------------------------------------------------------------------------
// Wrapper identity

/// Wrapper identity: backing-address equality.
///
/// Two emptied wrappers are equal; an emptied wrapper never equals a
/// non-empty one. Ownership mode plays no part.
#[inline]
pub fn proxy_eq(a: &dyn AnyProxy, b: &dyn AnyProxy) -> bool {
    match (a.erased_target(), b.erased_target()) {
        (Some(a), Some(b)) => a == b,
        (None, None) => true,
        _ => false,
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::sync::Arc;
    use core::ptr;
    use core::sync::atomic::{AtomicUsize, Ordering};

    use nb_ptr::ProxyHandle;

    use super::{from_proxy, from_proxy_mut, proxy_eq, to_proxy, to_proxy_mut};
    use crate::{AnyProxy, NativeProxy, ProxyObject, ProxyObjectMut};

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

    /// A wrapper with a post-attach hook, the way a delegate-registering
    /// wrapper would be written.
    struct ProbeProxy {
        handle: ProxyHandle<Probe>,
        attach_count: usize,
    }

    impl ProxyObject for ProbeProxy {
        type Native = Probe;

        fn from_handle(handle: ProxyHandle<Probe>) -> Self {
            Self {
                handle,
                attach_count: 0,
            }
        }

        fn handle(&self) -> &ProxyHandle<Probe> {
            &self.handle
        }

        fn attached(&mut self) {
            self.attach_count += 1;
        }
    }

    impl ProxyObjectMut for ProbeProxy {
        fn handle_mut(&mut self) -> &mut ProxyHandle<Probe> {
            &mut self.handle
        }
    }

    #[test]
    fn unwrap_recovers_the_wrapped_address() {
        let value = 41i32;
        let proxy: NativeProxy<i32> = to_proxy(&value);

        let unwrapped = unsafe { from_proxy::<i32>(&proxy) };
        assert!(ptr::eq(unwrapped, &value));
        assert_eq!(*unwrapped, 41);
    }

    #[test]
    fn owning_wrapper_end_to_end() {
        let (boxed, drops) = probe(5);
        let mut proxy = NativeProxy::owning(boxed);

        assert_eq!(AnyProxy::native_size(&proxy), size_of::<Probe>());
        assert_eq!(unsafe { proxy.native().value }, 5);

        unsafe { from_proxy_mut::<Probe>(&mut proxy) }.value = 7;
        assert_eq!(unsafe { proxy.native().value }, 7);

        assert_eq!(drops.load(Ordering::Relaxed), 0);
        drop(proxy);
        assert_eq!(drops.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn attach_hook_runs_once_per_wrap() {
        let (mut boxed, drops) = probe(3);

        let borrowed: ProbeProxy = to_proxy_mut(&mut *boxed);
        assert_eq!(borrowed.attach_count, 1);
        drop(borrowed);
        assert_eq!(drops.load(Ordering::Relaxed), 0);

        // SAFETY: the address comes straight out of `Box::into_raw`.
        let owned = unsafe {
            ProbeProxy::wrap_owned(ptr::NonNull::new(Box::into_raw(boxed)).unwrap())
        };
        assert_eq!(owned.attach_count, 1);
        drop(owned);
        assert_eq!(drops.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn identity_is_by_address_across_wrapper_types() {
        let (boxed, _drops) = probe(3);
        let owned = NativeProxy::owning(boxed);
        let addr = owned.target().unwrap();

        let borrowed: NativeProxy<Probe> =
            // SAFETY: `owned` keeps the pointee live for the whole test.
            to_proxy(unsafe { addr.as_ref() });
        assert!(proxy_eq(&owned, &borrowed));

        let mut emptied = borrowed;
        emptied.handle_mut().release();
        assert!(!proxy_eq(&owned, &emptied));

        let other = NativeProxy::<Probe>::from_handle(ProxyHandle::Empty);
        assert!(proxy_eq(&emptied, &other));
    }

    #[test]
    #[should_panic(expected = "empty proxy")]
    fn unwrapping_an_emptied_wrapper_panics() {
        let mut proxy = NativeProxy::<i32>::from_handle(ProxyHandle::Empty);
        let _ = unsafe { from_proxy_mut::<i32>(&mut proxy) };
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "type mismatch")]
    fn mismatched_unwrap_is_caught_in_debug() {
        let value = 41i32;
        let proxy: NativeProxy<i32> = to_proxy(&value);
        let _ = unsafe { from_proxy::<u32>(&proxy) };
    }
}
