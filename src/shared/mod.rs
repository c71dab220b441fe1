//! Modules with generic logic used by several modules.
//!
//! - [`wire`]: the binary framing of the tracker and peer data protocols.
//! - [`clients`]: clients for both protocols.
pub mod clients;
pub mod wire;
