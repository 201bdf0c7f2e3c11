//! The wrapper contract between native values and the reference-counted
//! runtime that exposes them.
//!
//! A *proxy* is a managed object holding exactly one
//! [`ProxyHandle`](nb_ptr::ProxyHandle) to a native value. This crate
//! defines what a proxy type must provide and the free operations that move
//! references across the boundary in both directions:
//!
//! - [`ProxyObject`] / [`ProxyObjectMut`]: the typed implementation side of
//!   the contract, including the canonical `wrap_owned` / `wrap_borrowed`
//!   constructors and the one-time [`attached`](ProxyObject::attached)
//!   hook.
//! - [`AnyProxy`] / [`AnyProxyMut`]: the object-safe protocol the runtime
//!   sees, where backing addresses are type-erased.
//! - [`to_proxy`] / [`to_proxy_mut`]: build a borrowed wrapper around an
//!   existing native reference.
//! - [`from_proxy`] / [`from_proxy_mut`]: recover a native reference from a
//!   wrapper by reinterpreting its backing address.
//! - [`proxy_eq`]: wrapper identity, defined as backing-address equality.
//! - [`NativeProxy<T>`]: a ready-made wrapper for any native type, so
//!   exposing a new type needs a type parameter rather than hand-written
//!   wiring.
#![expect(unsafe_code, reason = "Casting wrappers to native references is unsafe.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod cast;
mod object;

// -----------------------------------------------------------------------------
// Top-level exports

pub use cast::{from_proxy, from_proxy_mut, proxy_eq, to_proxy, to_proxy_mut};
pub use object::{AnyProxy, AnyProxyMut, NativeProxy, ProxyObject, ProxyObjectMut};
