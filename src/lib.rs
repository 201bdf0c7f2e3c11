#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use nb_proxy as proxy;
pub use nb_ptr as ptr;
pub use nb_view as view;
