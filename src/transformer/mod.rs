//! Per-target manifest transformation

pub mod manifest;

pub use manifest::ManifestTransformer;
