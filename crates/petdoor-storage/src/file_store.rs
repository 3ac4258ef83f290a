//! File-backed byte store.
//!
//! Emulates the controller's non-volatile region with a plain file. Writes
//! are buffered in memory and reach the file only on [`ByteStore::commit`],
//! which writes a temporary sibling, syncs it, and renames it over the
//! file. A crash mid-commit leaves either the old contents or the new ones.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use petdoor_hardware::{ByteStore, HardwareError};
use tracing::{debug, info, warn};

/// [`ByteStore`] persisted to a file on commit.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    bytes: Vec<u8>,
    dirty: bool,
}

impl FileStore {
    /// Open the store at `path`, creating a zero-filled file of `size` bytes
    /// if none exists.
    ///
    /// An existing file of a different length is zero-padded or truncated
    /// to `size`; the change is written back on the next commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or created.
    pub fn open(path: impl AsRef<Path>, size: usize) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();

        match fs::read(&path) {
            Ok(mut bytes) => {
                let dirty = bytes.len() != size;
                if dirty {
                    warn!(
                        path = %path.display(),
                        found = bytes.len(),
                        expected = size,
                        "store file size mismatch, resizing"
                    );
                    bytes.resize(size, 0);
                }
                debug!(path = %path.display(), size, "store file loaded");
                Ok(Self { path, bytes, dirty })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let mut store = Self {
                    path,
                    bytes: vec![0; size],
                    dirty: true,
                };
                store.flush()?;
                info!(path = %store.path.display(), size, "store file created");
                Ok(store)
            }
            Err(e) => Err(e),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if there are buffered writes not yet committed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let mut file = File::create(&tmp)?;
        file.write_all(&self.bytes)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp, &self.path)?;
        sync_parent(&self.path)?;
        self.dirty = false;
        Ok(())
    }
}

/// Make the rename itself durable.
#[cfg(unix)]
fn sync_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => File::open(dir)?.sync_all(),
        _ => File::open(".")?.sync_all(),
    }
}

#[cfg(not(unix))]
fn sync_parent(_path: &Path) -> io::Result<()> {
    Ok(())
}

impl ByteStore for FileStore {
    fn size(&self) -> usize {
        self.bytes.len()
    }

    fn read_byte(&self, address: usize) -> petdoor_hardware::Result<u8> {
        self.bytes
            .get(address)
            .copied()
            .ok_or_else(|| HardwareError::out_of_range(address, 1, self.bytes.len()))
    }

    fn write_byte(&mut self, address: usize, value: u8) -> petdoor_hardware::Result<()> {
        let size = self.bytes.len();
        let byte = self
            .bytes
            .get_mut(address)
            .ok_or_else(|| HardwareError::out_of_range(address, 1, size))?;
        if *byte != value {
            *byte = value;
            self.dirty = true;
        }
        Ok(())
    }

    fn commit(&mut self) -> petdoor_hardware::Result<()> {
        if !self.dirty {
            return Ok(());
        }
        self.flush()?;
        debug!(path = %self.path.display(), "store committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_zeroed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.bin");

        let store = FileStore::open(&path, 128).unwrap();

        assert_eq!(store.size(), 128);
        assert!(!store.is_dirty());
        assert_eq!(fs::read(&path).unwrap(), vec![0u8; 128]);
    }

    #[test]
    fn test_writes_reach_disk_only_on_commit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.bin");
        let mut store = FileStore::open(&path, 8).unwrap();

        store.write_byte(3, 7).unwrap();
        assert!(store.is_dirty());
        assert_eq!(fs::read(&path).unwrap()[3], 0);

        store.commit().unwrap();
        assert!(!store.is_dirty());
        assert_eq!(fs::read(&path).unwrap()[3], 7);
    }

    #[test]
    fn test_commit_replaces_file_and_leaves_no_temp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.bin");
        let tmp = dir.path().join("store.bin.tmp");
        let mut store = FileStore::open(&path, 4).unwrap();

        // Leftover from an interrupted commit
        fs::write(&tmp, [0xEE; 9]).unwrap();

        store.write_byte(0, 0x42).unwrap();
        store.commit().unwrap();

        assert!(!tmp.exists());
        let reopened = FileStore::open(&path, 4).unwrap();
        assert!(!reopened.is_dirty());
        assert_eq!(reopened.read_byte(0).unwrap(), 0x42);
        assert_eq!(fs::read(&path).unwrap().len(), 4);
    }

    #[test]
    fn test_resizes_mismatched_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.bin");
        fs::write(&path, [1u8, 2, 3]).unwrap();

        let mut store = FileStore::open(&path, 6).unwrap();
        assert!(store.is_dirty());
        assert_eq!(store.read_byte(2).unwrap(), 3);
        assert_eq!(store.read_byte(5).unwrap(), 0);

        store.commit().unwrap();
        assert_eq!(fs::read(&path).unwrap(), vec![1, 2, 3, 0, 0, 0]);
    }

    #[test]
    fn test_out_of_range() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::open(dir.path().join("s.bin"), 4).unwrap();

        assert!(matches!(
            store.write_byte(4, 1),
            Err(HardwareError::OutOfRange { address: 4, .. })
        ));
    }
}
