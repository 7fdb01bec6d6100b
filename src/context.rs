use serde::Serialize;
use std::path::PathBuf;

/// Repository facts gathered for the generated document.
///
/// Every field is optional: a missing repository, a detached head or an
/// unreadable ref simply leaves the corresponding fields empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepositoryContext {
    pub root: Option<PathBuf>,
    pub metadata_dir: Option<PathBuf>,
    pub repository_name: Option<String>,
    /// Last `/` segment of the checked out branch.
    pub branch_name: Option<String>,
    /// Branch ref path with `refs/heads/` stripped.
    pub branch_full_name: Option<String>,
    /// Commit id, or [`crate::resolver::UNKNOWN_REVISION`].
    pub revision: Option<String>,
    pub version_tag: Option<String>,
}

impl RepositoryContext {
    /// Branch to report: the full name when known, otherwise the short name.
    pub fn branch(&self) -> Option<&str> {
        self.branch_full_name
            .as_deref()
            .or(self.branch_name.as_deref())
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
