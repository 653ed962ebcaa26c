//! Core types and constants for geodetic synchronization

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
