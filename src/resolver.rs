//! Resolves branch and revision by reading the ref files under the
//! repository metadata directory.
//!
//! The walk follows at most two `ref:` indirections: HEAD to the branch ref,
//! and the branch ref to one secondary ref. A ref file whose content is
//! neither a commit id nor an indirection yields [`UNKNOWN_REVISION`]
//! instead of an error, so the generated document always has the same shape.

use log::{debug, warn};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use crate::context::RepositoryContext;
use crate::encoding::OutputEncoding;
use crate::filesystem::Filesystem;
use crate::locator::locate;

pub const HEAD_FILE: &str = "HEAD";
pub const BRANCH_REF_PREFIX: &str = "refs/heads/";
pub const UNKNOWN_REVISION: &str = "UNKNOWN";
pub const DEFAULT_VERSION_TAG_FILE: &str = "next-version-tag";

/// HEAD, branch ref, secondary ref.
const MAX_REF_READS: usize = 3;

fn commit_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9a-fA-F]+$").expect("valid commit id pattern"))
}

fn indirection_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^ref: ?(.+)$").expect("valid ref pattern"))
}

#[derive(Debug, PartialEq, Eq)]
enum RefLine<'a> {
    CommitId(&'a str),
    Indirection(&'a str),
    Other,
}

fn classify(line: &str) -> RefLine<'_> {
    if let Some(captures) = indirection_regex().captures(line) {
        if let Some(target) = captures.get(1) {
            return RefLine::Indirection(target.as_str().trim());
        }
    }
    if commit_id_regex().is_match(line) {
        return RefLine::CommitId(line);
    }
    RefLine::Other
}

/// Branch and revision read from the ref files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefState {
    pub branch_name: Option<String>,
    pub branch_full_name: Option<String>,
    pub revision: Option<String>,
}

impl RefState {
    fn set_branch(&mut self, target: &str) {
        let full_name = target.strip_prefix(BRANCH_REF_PREFIX).unwrap_or(target);
        let short_name = full_name.rsplit('/').next().unwrap_or_default();
        if !short_name.is_empty() {
            self.branch_name = Some(short_name.to_string());
            self.branch_full_name = Some(full_name.to_string());
        }
    }
}

#[derive(Debug)]
enum Step {
    AtHead,
    AtBranchRef(String),
    AtSecondaryRef(String),
}

/// Reads HEAD and the refs it points to under `metadata_dir`.
pub fn resolve_refs(fs: &dyn Filesystem, metadata_dir: &Path) -> RefState {
    let mut state = RefState::default();
    let mut step = Some(Step::AtHead);
    let mut reads = 0;

    while let Some(current) = step.take() {
        if reads == MAX_REF_READS {
            warn!("Giving up on ref chain after {} reads", MAX_REF_READS);
            break;
        }
        reads += 1;

        let relative = match &current {
            Step::AtHead => HEAD_FILE,
            Step::AtBranchRef(target) | Step::AtSecondaryRef(target) => target.as_str(),
        };
        let Some(contents) = read_ref_file(fs, &metadata_dir.join(relative)) else {
            break;
        };

        for line in contents.lines().filter(|line| !line.is_empty()) {
            match (&current, classify(line)) {
                (Step::AtHead, RefLine::Indirection(target)) => {
                    debug!("HEAD points at {}", target);
                    state.set_branch(target);
                    step = Some(Step::AtBranchRef(target.to_string()));
                    break;
                }
                (Step::AtHead, RefLine::CommitId(id)) => {
                    debug!("HEAD is detached at {}", id);
                    state.revision = Some(id.to_string());
                    break;
                }
                (Step::AtHead, RefLine::Other) => {}
                (_, RefLine::CommitId(id)) => {
                    state.revision = Some(id.to_string());
                    break;
                }
                (Step::AtBranchRef(_), RefLine::Indirection(target)) => {
                    debug!("{} points at {}", relative, target);
                    step = Some(Step::AtSecondaryRef(target.to_string()));
                    break;
                }
                _ => {
                    debug!("Unrecognized ref line in {}: {:?}", relative, line);
                    state.revision = Some(UNKNOWN_REVISION.to_string());
                }
            }
        }
    }

    state
}

fn read_ref_file(fs: &dyn Filesystem, path: &Path) -> Option<String> {
    if !fs.file_exists(path) {
        debug!("Ref file {} does not exist", path.display());
        return None;
    }

    match fs.read_to_string(path, OutputEncoding::Utf8) {
        Ok(contents) => Some(contents),
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            None
        }
    }
}

/// Reads the trimmed version tag from `file_name` at the repository root.
pub fn read_version_tag(fs: &dyn Filesystem, root: &Path, file_name: &str) -> Option<String> {
    let path = root.join(file_name);
    if !fs.file_exists(&path) {
        return None;
    }

    match fs.read_to_string(&path, OutputEncoding::Utf8) {
        Ok(contents) => {
            let tag = contents.trim();
            (!tag.is_empty()).then(|| tag.to_string())
        }
        Err(e) => {
            warn!("Failed to read version tag {}: {}", path.display(), e);
            None
        }
    }
}

/// Locates the repository enclosing `start_dir` and gathers its metadata.
///
/// Never fails: without a repository the returned context is empty.
pub fn resolve(fs: &dyn Filesystem, start_dir: &Path, version_tag_file: &str) -> RepositoryContext {
    let Some(location) = locate(fs, start_dir) else {
        return RepositoryContext::default();
    };

    let refs = resolve_refs(fs, &location.metadata_dir);
    let version_tag = read_version_tag(fs, &location.root, version_tag_file);
    let repository_name = fs.directory(&location.root).name();

    RepositoryContext {
        root: Some(location.root),
        metadata_dir: Some(location.metadata_dir),
        repository_name,
        branch_name: refs.branch_name,
        branch_full_name: refs.branch_full_name,
        revision: refs.revision,
        version_tag,
    }
}
