//! Core data models for extension packaging

pub mod manifest;
pub mod target;
pub mod package;

pub use manifest::*;
pub use target::*;
pub use package::*;
