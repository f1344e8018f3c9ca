//! File-backed backing store.
//!
//! The file is the physical memory image: byte `n` of the file is address `n`.
//! Reads and writes go straight to the file so that writebacks are visible to
//! anything else inspecting the image after a run.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{BackingStore, check_range};
use crate::common::{ConfigError, MemoryError};

/// Backing memory stored in an existing file.
#[derive(Debug)]
pub struct FileMemory {
    file: File,
    path: PathBuf,
    size: usize,
}

impl FileMemory {
    /// Opens an existing memory image for reading and writing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingBackingStore`] when the file does not exist
    /// or cannot be opened read-write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let missing = |source| ConfigError::MissingBackingStore {
            path: path.clone(),
            source,
        };
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(missing)?;
        let size = file.metadata().map_err(missing)?.len() as usize;
        debug!(path = %path.display(), size, "opened memory image");
        Ok(Self { file, path, size })
    }

    /// Path of the memory image.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BackingStore for FileMemory {
    fn len(&self) -> usize {
        self.size
    }

    fn read_block(&mut self, address: u32, buf: &mut [u8]) -> Result<(), MemoryError> {
        let start = check_range(self.size, address, buf.len())?;
        let _ = self.file.seek(SeekFrom::Start(start as u64))?;
        self.file.read_exact(buf)?;
        Ok(())
    }

    fn write_block(&mut self, address: u32, data: &[u8]) -> Result<(), MemoryError> {
        let start = check_range(self.size, address, data.len())?;
        let _ = self.file.seek(SeekFrom::Start(start as u64))?;
        self.file.write_all(data)?;
        Ok(())
    }
}
