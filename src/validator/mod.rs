//! Validation module

pub mod license;

pub use license::{audit_licenses, check_license};
