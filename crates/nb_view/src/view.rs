use alloc::vec::Vec;

use nb_proxy::{ProxyObject, to_proxy};

use crate::iter::ViewIter;
use crate::{RandomAccess, ViewError};

// -----------------------------------------------------------------------------
// ProxyView

/// An immutable, count-bounded view that wraps a captured container's
/// elements on demand.
///
/// The container is moved into the view and its length is read once at
/// construction; neither changes afterwards. Every access runs the element
/// factory fresh, so two accesses to the same index yield distinct wrapper
/// objects over the same backing address — the elements themselves are
/// never copied.
///
/// Wrappers handed out by the view borrow the captured elements in place.
/// The view must therefore outlive every dereference of a wrapper it
/// produced; that obligation lies with the caller, like every other pointee
/// lifetime in this stack.
///
/// # Examples
///
/// ```
/// use nb_proxy::NativeProxy;
/// use nb_view::view_of;
///
/// let view = view_of::<NativeProxy<i32>, _>(vec![10, 20, 30]);
///
/// assert_eq!(view.count(), 3);
/// let first = view.at(0).unwrap();
/// // SAFETY: the view outlives the wrapper.
/// assert_eq!(unsafe { *first.native() }, 10);
/// ```
pub struct ProxyView<C, F> {
    items: C,
    len: usize,
    wrap: F,
}

impl<C, F> ProxyView<C, F> {
    /// Captures `items` and builds a view wrapping each element with `wrap`.
    #[inline]
    pub fn new<P>(items: C, wrap: F) -> Self
    where
        C: RandomAccess,
        F: Fn(&C::Element) -> P,
    {
        let len = items.len();
        Self { items, len, wrap }
    }

    /// Number of elements, fixed at construction.
    #[inline]
    pub const fn count(&self) -> usize {
        self.len
    }

    /// Whether the view has no elements.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Wraps the `index`-th element.
    ///
    /// # Errors
    ///
    /// [`ViewError::IndexOutOfRange`] when `index` is outside
    /// `[0, count)`.
    pub fn at<P>(&self, index: usize) -> Result<P, ViewError>
    where
        C: RandomAccess,
        F: Fn(&C::Element) -> P,
    {
        match self.items.get(index) {
            Some(element) if index < self.len => Ok((self.wrap)(element)),
            _ => Err(ViewError::IndexOutOfRange {
                index,
                len: self.len,
            }),
        }
    }

    /// A restartable traversal in ascending index order.
    ///
    /// Each call starts over from index zero, and every step runs the
    /// element factory fresh.
    #[inline]
    pub fn iter(&self) -> ViewIter<'_, C, F> {
        ViewIter {
            view: self,
            index: 0,
        }
    }

    /// Eagerly wraps every element, in order.
    ///
    /// Equivalent to collecting one full traversal.
    pub fn materialize<P>(&self) -> Vec<P>
    where
        C: RandomAccess,
        F: Fn(&C::Element) -> P,
    {
        self.iter().collect()
    }
}

// -----------------------------------------------------------------------------
// view_of

/// Builds a [`ProxyView`] whose elements are wrapped by `P`'s borrowed
/// constructor.
///
/// # Examples
///
/// ```
/// use nb_proxy::NativeProxy;
/// use nb_view::view_of;
///
/// let view = view_of::<NativeProxy<u8>, _>(vec![1u8, 2, 3]);
/// assert_eq!(view.count(), 3);
/// ```
pub fn view_of<P, C>(items: C) -> ProxyView<C, fn(&C::Element) -> P>
where
    C: RandomAccess,
    C::Element: 'static,
    P: ProxyObject<Native = C::Element>,
{
    ProxyView::new(items, to_proxy::<P>)
}

// -----------------------------------------------------------------------------
// Tests
