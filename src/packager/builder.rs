//! Extension package builder
//!
//! Archives are reproducible: entry order comes from the resolver, every
//! entry carries the same timestamp and permissions, and compression only
//! depends on the file extension.

use crate::config::{ArchiveSettings, LicensePolicy};
use crate::error::{PackError, Result};
use crate::models::FileEntry;
use crate::validator::check_license;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use zip::result::ZipError;
use zip::write::{FileOptions, ZipWriter};
use zip::{CompressionMethod, DateTime};

/// Modification time stored for every entry
pub const ENTRY_TIMESTAMP: (u16, u8, u8, u8, u8, u8) = (2019, 1, 1, 0, 0, 0);

pub struct ArchiveWriter<'a> {
    settings: &'a ArchiveSettings,
    license: &'a LicensePolicy,
}

impl<'a> ArchiveWriter<'a> {
    pub fn new(settings: &'a ArchiveSettings, license: &'a LicensePolicy) -> Self {
        Self { settings, license }
    }

    /// Write `entries` to `output_path`, replacing any previous archive.
    ///
    /// The archive is assembled in a temporary file next to the output and
    /// renamed into place once complete, so a failed build never leaves a
    /// partial archive behind. Returns the number of entries written.
    pub fn write(&self, entries: &[FileEntry], output_path: &Path) -> Result<usize> {
        let parent = output_path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).map_err(|e| PackError::io(parent, e))?;

        if output_path.exists() {
            log::debug!("removing stale {}", output_path.display());
            fs::remove_file(output_path).map_err(|e| PackError::io(output_path, e))?;
        }

        let timestamp = entry_timestamp()
            .map_err(|source| PackError::archive(output_path, source))?;
        let temp = NamedTempFile::new_in(parent).map_err(|e| PackError::io(parent, e))?;
        let mut zip = ZipWriter::new(temp);

        for entry in entries {
            check_license(&entry.path, &entry.content, self.license)?;

            let name = entry.archive_name();
            zip.start_file(name.as_str(), self.options_for(&entry.path, timestamp))
                .map_err(|source| PackError::archive(output_path, source))?;
            zip.write_all(&entry.content)
                .map_err(|e| PackError::io(output_path, e))?;

            log::info!("  {}", name);
        }

        let temp = zip
            .finish()
            .map_err(|source| PackError::archive(output_path, source))?;

        // temp files are created 0600
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(temp.path(), fs::Permissions::from_mode(0o644))
                .map_err(|e| PackError::io(output_path, e))?;
        }

        temp.persist(output_path)
            .map_err(|e| PackError::io(output_path, e.error))?;

        Ok(entries.len())
    }

    fn options_for(&self, path: &Path, timestamp: DateTime) -> FileOptions {
        let options = FileOptions::default()
            .last_modified_time(timestamp)
            .large_file(false);

        if self.settings.is_uncompressible(path) {
            options
                .compression_method(CompressionMethod::Stored)
                .compression_level(None)
        } else {
            options
                .compression_method(CompressionMethod::Deflated)
                .compression_level(Some(self.settings.compression_level))
        }
    }
}

fn entry_timestamp() -> std::result::Result<DateTime, ZipError> {
    let (year, month, day, hour, minute, second) = ENTRY_TIMESTAMP;
    DateTime::from_date_and_time(year, month, day, hour, minute, second)
        .map_err(|_| ZipError::InvalidArchive("invalid entry timestamp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    const SCRIPT: &[u8] = b"/* License: MPL 2.0 */\nconsole.log('downloading');\n";

    fn entries() -> Vec<FileEntry> {
        vec![
            FileEntry::new("manifest.json", b"{\"name\": \"DownThemAll!\"}".to_vec()),
            FileEntry::new("bundles/background.js", SCRIPT.to_vec()),
            FileEntry::new("style/icon.png", vec![0x89, b'P', b'N', b'G', 0, 1, 2, 3]),
        ]
    }

    fn write(entries: &[FileEntry], output: &Path) -> Result<usize> {
        let settings = ArchiveSettings::default();
        let license = LicensePolicy::default();
        ArchiveWriter::new(&settings, &license).write(entries, output)
    }

    #[test]
    fn test_round_trip_and_compression_choice() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("artifacts/dta-4.0-development-fx.zip");

        assert_eq!(write(&entries(), &output).unwrap(), 3);

        let mut archive = ZipArchive::new(fs::File::open(&output).unwrap()).unwrap();
        assert_eq!(archive.len(), 3);

        for (index, expected) in entries().iter().enumerate() {
            let mut file = archive.by_index(index).unwrap();
            assert_eq!(file.name(), expected.archive_name());

            let modified = file.last_modified();
            assert_eq!(
                (modified.year(), modified.month(), modified.day()),
                (2019, 1, 1)
            );
            assert_eq!(
                (modified.hour(), modified.minute(), modified.second()),
                (0, 0, 0)
            );

            let method = file.compression();
            if expected.archive_name().ends_with(".png") {
                assert_eq!(method, CompressionMethod::Stored);
                assert_eq!(file.compressed_size(), file.size());
            } else {
                assert_eq!(method, CompressionMethod::Deflated);
            }

            let mut content = Vec::new();
            file.read_to_end(&mut content).unwrap();
            assert_eq!(content, expected.content);
        }
    }

    #[test]
    fn test_replaces_stale_archive() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("dta.zip");
        fs::write(&output, b"stale").unwrap();

        write(&entries(), &output).unwrap();

        let archive = ZipArchive::new(fs::File::open(&output).unwrap()).unwrap();
        assert_eq!(archive.len(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_archive_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("dta.zip");

        write(&entries(), &output).unwrap();

        let mode = fs::metadata(&output).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_output_is_byte_identical_across_runs() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first.zip");
        let second = temp_dir.path().join("second.zip");

        write(&entries(), &first).unwrap();
        write(&entries(), &second).unwrap();

        assert_eq!(fs::read(first).unwrap(), fs::read(second).unwrap());
    }

    #[test]
    fn test_unlicensed_entry_leaves_no_archive() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("dta.zip");
        let mut entries = entries();
        entries.push(FileEntry::new("bundles/vendor.js", b"void 0;".to_vec()));

        let err = write(&entries, &output).unwrap_err();

        assert!(matches!(err, PackError::LicenseViolation { .. }));
        assert!(!output.exists());
        let leftovers: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
        assert!(leftovers.is_empty());
    }
}
