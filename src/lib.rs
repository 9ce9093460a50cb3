//! geolocation-rs
//!
//! Workspace facade over [`geolocation_core`]; the demos under `demos/` link
//! against it.

pub use geolocation_core::*;
