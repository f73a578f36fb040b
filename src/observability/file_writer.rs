//! Rotating log file writer with size-based rotation and backup retention.
//!
//! The writer is shared behind an `Arc` and handed to `tracing_subscriber` as
//! its `MakeWriter`; every formatted event arrives as one `write` call on
//! `&FileWriter`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Maximum file size before rotation (10 MB).
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating file writer.
///
/// When the current file exceeds the size limit it is renamed to
/// `<name>.<unix time in nanoseconds>` and a fresh file is started. Only
/// the newest backups are kept.
pub struct FileWriter {
    file_path: PathBuf,
    max_bytes: u64,
    /// Opened lazily on first write.
    writer: Mutex<Option<File>>,
}

impl FileWriter {
    /// Creates a writer for `file_path` with the default 10 MB limit.
    ///
    /// The file is not opened until the first write.
    pub const fn new(file_path: PathBuf) -> Self {
        Self::with_limit(file_path, MAX_FILE_SIZE_BYTES)
    }

    /// Creates a writer that rotates once the file exceeds `max_bytes`.
    pub const fn with_limit(file_path: PathBuf, max_bytes: u64) -> Self {
        Self {
            file_path,
            max_bytes,
            writer: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn lock(&self) -> MutexGuard<'_, Option<File>> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_locked(&self, buf: &[u8]) -> io::Result<usize> {
        let mut writer = self.lock();

        self.check_and_rotate(&mut writer)?;

        if writer.is_none() {
            *writer = Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.file_path)?,
            );
        }
        let Some(file) = writer.as_mut() else {
            return Err(io::Error::other("No file available"));
        };

        file.write_all(buf)?;
        file.flush()?;
        Ok(buf.len())
    }

    fn check_and_rotate(&self, writer: &mut Option<File>) -> io::Result<()> {
        if let Ok(metadata) = fs::metadata(&self.file_path) {
            if metadata.len() > self.max_bytes {
                *writer = None;
                self.rotate_files()?;
            }
        }
        Ok(())
    }

    /// Backups are named `<file name>.<unix time in nanoseconds>`, so
    /// rotations within the same second stay distinct.
    fn rotate_files(&self) -> io::Result<()> {
        let timestamp = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();

        let mut backup_name = self.file_path.as_os_str().to_owned();
        backup_name.push(format!(".{timestamp}"));

        if self.file_path.exists() {
            fs::rename(&self.file_path, PathBuf::from(backup_name))?;
        }

        self.cleanup_old_backups()
    }

    fn cleanup_old_backups(&self) -> io::Result<()> {
        let parent_dir = self
            .file_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let Some(file_name) = self.file_path.file_name().and_then(|s| s.to_str()) else {
            return Err(io::Error::other("Invalid file name"));
        };
        let prefix = format!("{file_name}.");

        let mut backups: Vec<PathBuf> = fs::read_dir(parent_dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .and_then(|name| name.strip_prefix(&prefix))
                    .is_some_and(|suffix| suffix.chars().all(|c| c.is_ascii_digit()))
            })
            .collect();

        // Timestamp suffixes sort numerically; newest first.
        backups.sort_by_key(|path| {
            std::cmp::Reverse(
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .and_then(|ext| ext.parse::<i64>().ok())
                    .unwrap_or_default(),
            )
        });

        for old_backup in backups.iter().skip(MAX_BACKUP_FILES) {
            let _ = fs::remove_file(old_backup);
        }

        Ok(())
    }
}

impl Write for &FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_locked(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().as_mut().map_or(Ok(()), Write::flush)
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backups_in(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .is_some_and(|n| n.starts_with("app.log."))
            })
            .count()
    }

    #[test]
    fn appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::new(dir.path().join("app.log"));

        (&writer).write_all(b"one\n").unwrap();
        (&writer).write_all(b"two\n").unwrap();

        let contents = fs::read_to_string(writer.path()).unwrap();
        assert_eq!(contents, "one\ntwo\n");
    }

    #[test]
    fn rotates_and_keeps_bounded_backups() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::with_limit(dir.path().join("app.log"), 8);

        for i in 0..6 {
            (&writer).write_all(format!("line {i} padding\n").as_bytes()).unwrap();
        }

        assert!(writer.path().exists());
        let backups = backups_in(dir.path());
        assert!(backups >= 1);
        assert!(backups <= MAX_BACKUP_FILES);
    }

    #[test]
    fn backup_suffix_is_nanosecond_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::with_limit(dir.path().join("app.log"), 4);
        let before = chrono::Utc::now().timestamp_nanos_opt().unwrap();

        (&writer).write_all(b"first line\n").unwrap();
        (&writer).write_all(b"second line\n").unwrap();

        let suffixes: Vec<i64> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter_map(|e| {
                let name = e.file_name().to_str()?.to_string();
                name.strip_prefix("app.log.")?.parse().ok()
            })
            .collect();
        assert_eq!(suffixes.len(), 1);
        assert!(suffixes[0] >= before);
    }
}
