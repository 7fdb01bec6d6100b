//! Filesystem capability used by the repository resolver and the renderer.
//!
//! Nothing in the core touches `std::fs` directly: every lookup, read and
//! write goes through [`Filesystem`], so ref resolution can be exercised
//! against [`MemoryFilesystem`] without a repository on disk.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{self, Cursor, Read, Write};
use std::path::{Path, PathBuf};

use crate::encoding::OutputEncoding;

/// What the filesystem knows about a directory path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryInfo {
    pub path: PathBuf,
    pub exists: bool,
}

impl DirectoryInfo {
    /// Final path component, if any.
    pub fn name(&self) -> Option<String> {
        self.path.file_name().map(|name| name.to_string_lossy().into_owned())
    }

    /// Parent path, `None` at the filesystem root.
    pub fn parent(&self) -> Option<&Path> {
        self.path.parent().filter(|parent| !parent.as_os_str().is_empty())
    }
}

pub trait Filesystem {
    fn directory(&self, path: &Path) -> DirectoryInfo;

    fn file_exists(&self, path: &Path) -> bool;

    fn open_read<'a>(&'a self, path: &Path) -> io::Result<Box<dyn Read + 'a>>;

    /// Opens `path` for writing, creating it or truncating existing content.
    fn create<'a>(&'a self, path: &Path) -> io::Result<Box<dyn Write + 'a>>;

    /// Reads the whole file as text in `encoding`. A byte order mark in the
    /// file overrides `encoding` and is stripped.
    fn read_to_string(&self, path: &Path, encoding: OutputEncoding) -> io::Result<String> {
        let mut bytes = Vec::new();
        self.open_read(path)?.read_to_end(&mut bytes)?;
        Ok(encoding.decode(&bytes))
    }
}

/// The host filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFilesystem;

impl Filesystem for RealFilesystem {
    fn directory(&self, path: &Path) -> DirectoryInfo {
        DirectoryInfo {
            path: path.to_path_buf(),
            exists: path.is_dir(),
        }
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn open_read<'a>(&'a self, path: &Path) -> io::Result<Box<dyn Read + 'a>> {
        Ok(Box::new(fs::File::open(path)?))
    }

    fn create<'a>(&'a self, path: &Path) -> io::Result<Box<dyn Write + 'a>> {
        Ok(Box::new(fs::File::create(path)?))
    }
}

/// In-memory filesystem for tests and benchmarks.
///
/// Adding a file or directory implies all of its ancestor directories.
#[derive(Debug, Default)]
pub struct MemoryFilesystem {
    files: RefCell<HashMap<PathBuf, Vec<u8>>>,
    directories: RefCell<HashSet<PathBuf>>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dir<P: AsRef<Path>>(&self, path: P) {
        let mut directories = self.directories.borrow_mut();
        for ancestor in path.as_ref().ancestors() {
            if !ancestor.as_os_str().is_empty() {
                directories.insert(ancestor.to_path_buf());
            }
        }
    }

    pub fn add_file<P: AsRef<Path>, C: AsRef<[u8]>>(&self, path: P, contents: C) {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.as_ref().to_vec());
    }

    /// Raw bytes of a file, including anything written through [`Filesystem::create`].
    pub fn contents<P: AsRef<Path>>(&self, path: P) -> Option<Vec<u8>> {
        self.files.borrow().get(path.as_ref()).cloned()
    }

    pub fn contents_string<P: AsRef<Path>>(&self, path: P) -> Option<String> {
        self.contents(path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Filesystem for MemoryFilesystem {
    fn directory(&self, path: &Path) -> DirectoryInfo {
        DirectoryInfo {
            path: path.to_path_buf(),
            exists: self.directories.borrow().contains(path),
        }
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn open_read<'a>(&'a self, path: &Path) -> io::Result<Box<dyn Read + 'a>> {
        let bytes = self.contents(path).ok_or_else(|| not_found(path))?;
        Ok(Box::new(Cursor::new(bytes)))
    }

    fn create<'a>(&'a self, path: &Path) -> io::Result<Box<dyn Write + 'a>> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !self.directories.borrow().contains(parent) {
                return Err(not_found(parent));
            }
        }
        self.files.borrow_mut().insert(path.to_path_buf(), Vec::new());
        Ok(Box::new(MemoryFile {
            files: &self.files,
            path: path.to_path_buf(),
            buffer: Vec::new(),
        }))
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} does not exist", path.display()),
    )
}

struct MemoryFile<'a> {
    files: &'a RefCell<HashMap<PathBuf, Vec<u8>>>,
    path: PathBuf,
    buffer: Vec<u8>,
}

impl MemoryFile<'_> {
    fn commit(&self) {
        self.files
            .borrow_mut()
            .insert(self.path.clone(), self.buffer.clone());
    }
}

impl Write for MemoryFile<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.commit();
        Ok(())
    }
}

impl Drop for MemoryFile<'_> {
    fn drop(&mut self) {
        self.commit();
    }
}
