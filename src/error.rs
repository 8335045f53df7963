use thiserror::Error;

/// Every failure a search instance can report.
///
/// Callers that only care whether a search failed can treat this as one type; callers that
/// need the specific kind match on the variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The root is not a container, or a tree was assembled incorrectly
    #[error("{0}")]
    Type(String),

    /// An option failed validation
    #[error("{0}")]
    Config(String),

    /// `find` was given an unusable key
    #[error("Invalid key \"{key}\": {reason}")]
    Key { key: String, reason: String },

    /// `find_by_path` was given a structurally invalid path
    #[error("Invalid path \"{path}\": {reason}")]
    Path { path: String, reason: String },

    /// A container is its own descendant
    #[error("Circular reference detected at path \"{path}\"")]
    CircularReference { path: String },

    /// An argument outside the accepted set, such as an unknown occurrence mode
    #[error("{0}")]
    InvalidArgument(String),
}

impl SearchError {
    pub(crate) fn key(key: &str, reason: &str) -> Self {
        SearchError::Key { key: key.to_string(), reason: reason.to_string() }
    }

    pub(crate) fn path(path: &str, reason: &str) -> Self {
        SearchError::Path { path: path.to_string(), reason: reason.to_string() }
    }
}

pub type Result<T, E = SearchError> = std::result::Result<T, E>;
