use log::debug;
use std::path::{Path, PathBuf};

use crate::filesystem::Filesystem;

/// Name of the metadata directory that marks a repository root.
pub const METADATA_DIR: &str = ".git";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocation {
    pub root: PathBuf,
    pub metadata_dir: PathBuf,
}

/// Walks from `start_dir` towards the filesystem root looking for a directory
/// that contains [`METADATA_DIR`].
///
/// Paths are compared as given, without canonicalization.
pub fn locate(fs: &dyn Filesystem, start_dir: &Path) -> Option<RepositoryLocation> {
    let mut dir = fs.directory(start_dir);
    let mut previous: Option<PathBuf> = None;

    while dir.exists && previous.as_deref() != Some(dir.path.as_path()) {
        let metadata_dir = dir.path.join(METADATA_DIR);
        if fs.directory(&metadata_dir).exists {
            debug!("Found repository metadata at {}", metadata_dir.display());
            return Some(RepositoryLocation {
                root: dir.path,
                metadata_dir,
            });
        }

        let parent = match dir.parent() {
            Some(parent) => fs.directory(parent),
            None => break,
        };
        previous = Some(dir.path);
        dir = parent;
    }

    debug!("No repository found above {}", start_dir.display());
    None
}
