//! Lazily-evaluated wrapper views over native containers.
//!
//! A [`ProxyView`] presents a captured native container as a read-only,
//! ordered, index-addressable collection of per-element wrappers, created on
//! demand. The container is moved into the view at construction, so later
//! mutation of the caller's data never changes what the view reports;
//! element wrappers borrow the captured elements in place and are never
//! copies.
//!
//! The view satisfies the three operations a wrapper runtime expects from
//! anything presented as a collection: a count query ([`count`]), indexed
//! access ([`at`]) and forward iteration (`for proxy in &view`).
//!
//! [`count`]: ProxyView::count
//! [`at`]: ProxyView::at
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod iter;
mod seq;
mod view;

// -----------------------------------------------------------------------------
// Top-level exports

pub use error::ViewError;
pub use iter::ViewIter;
pub use seq::RandomAccess;
pub use view::{ProxyView, view_of};
