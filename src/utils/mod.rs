//! Shared utilities

pub mod helpers;

pub use helpers::*;
