//! Package assembly: file selection, asset builds and archive writing

pub mod resolver;
pub mod builder;
pub mod scripts;

pub use builder::ArchiveWriter;
pub use resolver::{load_entries, resolve_files, MANIFEST_ENTRY};
pub use scripts::run_scripts;
