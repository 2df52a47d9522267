//! # fbtools — shared glue for the binaries
//!
//! The real work lives in the `fb-*` crates. This crate only holds what every
//! binary needs the same way: [`logging`] setup.

pub mod logging;
