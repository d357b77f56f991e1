//! File access used by the include expander and the command line tools.

use {
    crate::error::{Error, Result},
    fnv::FnvHashMap,
    parking_lot::Mutex,
    std::{
        fs::{create_dir_all, read, write},
        io::{Error as IoError, ErrorKind},
        path::{Path, PathBuf},
    },
};

pub trait FileSystem: Sync {
    fn exists(&self, path: &Path) -> bool;

    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// Reads a file which must contain UTF-8 text.
    fn read_to_string(&self, path: &Path) -> Result<String> {
        String::from_utf8(self.read_file(path)?)
            .map_err(|err| Error::io(path, IoError::new(ErrorKind::InvalidData, err)))
    }
}

/// The host filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        read(path).map_err(|err| Error::io(path, err))
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            create_dir_all(parent).map_err(|err| Error::io(parent, err))?;
        }

        write(path, data).map_err(|err| Error::io(path, err))
    }
}

/// An in-memory filesystem keyed by exact path.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: Mutex<FnvHashMap<PathBuf, Vec<u8>>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(path, data);
        self
    }

    pub fn insert(&self, path: impl Into<PathBuf>, data: impl Into<Vec<u8>>) {
        self.files.lock().insert(path.into(), data.into());
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.files.lock().get(path.as_ref()).cloned()
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.lock().contains_key(path)
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        self.get(path)
            .ok_or_else(|| Error::io(path, IoError::from(ErrorKind::NotFound)))
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        self.insert(path, data);

        Ok(())
    }
}
