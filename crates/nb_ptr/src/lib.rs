//! This crate provides the pointer primitives used to hand a manually
//! managed native value to a reference-counted wrapper runtime.
//!
//! A native value lives at a stable address that the wrapper side never
//! copies. The types here record that address together with the one question
//! every exposure site must answer: who frees the value when the wrapper is
//! torn down?
//!
//! **OwnedPtr** and **BorrowedPtr**
//!
//! [`OwnedPtr<T>`] is a move-only owner of a heap-allocated value; dropping
//! it frees the pointee exactly once. [`BorrowedPtr<T>`] is a move-only
//! reference to a value whose lifetime is managed elsewhere; dropping it
//! never touches the pointee. Both expose their address through the
//! read-only [`RawTarget`] capability.
//!
//! **ProxyHandle**
//!
//! [`ProxyHandle<T>`] is the runtime-selected union of the two: each
//! exposure site picks owning or borrowed when the handle is built, and the
//! teardown behavior follows from the choice. An emptied handle (after
//! [`take`](ProxyHandle::take) or [`release`](ProxyHandle::release)) is an
//! observable state, not undefined behavior.
//!
//! **ErasedAddr** and **ErasedAddrMut**
//!
//! [`ErasedAddr`] and [`ErasedAddrMut`] are type-erased addresses used at
//! the wrapper boundary, where the runtime stores objects untyped. They
//! carry no type information in release builds; under `debug_assertions`
//! they keep a [`TypeId`](core::any::TypeId) tag so that a mismatched cast
//! is caught while testing instead of silently reinterpreting memory.
#![expect(unsafe_code, reason = "Raw pointers are inherently unsafe.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod erased;
mod handle;
mod non_null;
mod target;

// -----------------------------------------------------------------------------
// Top-level exports

pub use erased::{ErasedAddr, ErasedAddrMut};
pub use handle::{Ownership, ProxyHandle};
pub use non_null::ConstNonNull;
pub use target::{BorrowedPtr, OwnedPtr, RawTarget};
