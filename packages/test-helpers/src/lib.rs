//! Testing helpers for [filemesh](https://docs.rs/filemesh).
//!
//! Refer to the [filemesh](https://docs.rs/filemesh) crate for more
//! information.
pub mod configuration;
pub mod random;
