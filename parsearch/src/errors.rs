/// Error types for parsearch.
///
/// Every fallible operation in the crate returns [`SearchResult`]. Configuration
/// problems are detected before any task is scheduled; task failures abort the
/// batch they occur in; a verification mismatch is reported by the harness but
/// does not stop the benchmark.
use std::path::PathBuf;
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur while configuring or running a search benchmark
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Task failure: {0}")]
    TaskFailure(String),
    #[error(
        "Verification mismatch: single task found {single} positions, multi task found {multi}{}",
        .first_difference.map(|i| format!(", first difference at index {}", i)).unwrap_or_default()
    )]
    VerificationMismatch {
        single: usize,
        multi: usize,
        first_difference: Option<usize>,
    },
    #[error("Internal invariant violated: {0}")]
    InvariantViolation(String),
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SearchError {
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn task_failure(msg: impl Into<String>) -> Self {
        Self::TaskFailure(msg.into())
    }

    pub fn invariant_violation(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Builds a mismatch error from two position lists, locating the first index
    /// at which they disagree.
    pub fn verification_mismatch(single: &[usize], multi: &[usize]) -> Self {
        let first_difference = single
            .iter()
            .zip(multi.iter())
            .position(|(a, b)| a != b)
            .or_else(|| (single.len() != multi.len()).then_some(single.len().min(multi.len())));
        Self::VerificationMismatch {
            single: single.len(),
            multi: multi.len(),
            first_difference,
        }
    }

    /// Whether the benchmark may keep going after this error.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::VerificationMismatch { .. })
    }
}

impl From<config::ConfigError> for SearchError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_error_creation() {
        let err = SearchError::invalid_configuration("ntasks must be positive");
        assert!(matches!(err, SearchError::InvalidConfiguration(_)));

        let err = SearchError::task_failure("window out of bounds");
        assert!(matches!(err, SearchError::TaskFailure(_)));

        let err = SearchError::invariant_violation("duplicate position");
        assert!(matches!(err, SearchError::InvariantViolation(_)));

        let err = SearchError::file_not_found(Path::new("missing.txt"));
        assert!(matches!(err, SearchError::FileNotFound(_)));

        let err = SearchError::permission_denied(Path::new("secret.txt"));
        assert!(matches!(err, SearchError::PermissionDenied(_)));
    }

    #[test]
    fn test_error_messages() {
        let err = SearchError::invalid_configuration("pattern is empty");
        assert_eq!(err.to_string(), "Invalid configuration: pattern is empty");

        let err = SearchError::task_failure("worker terminated");
        assert_eq!(err.to_string(), "Task failure: worker terminated");

        let err = SearchError::file_not_found("test.txt");
        assert_eq!(err.to_string(), "File not found: test.txt");
    }

    #[test]
    fn test_verification_mismatch_locates_difference() {
        let err = SearchError::verification_mismatch(&[1, 4, 7], &[1, 5, 7]);
        assert_eq!(
            err.to_string(),
            "Verification mismatch: single task found 3 positions, multi task found 3, first difference at index 1"
        );
        assert!(!err.is_fatal());

        // A missing tail differs at the length of the shorter list
        let err = SearchError::verification_mismatch(&[1, 4, 7], &[1, 4]);
        assert!(matches!(
            err,
            SearchError::VerificationMismatch {
                first_difference: Some(2),
                ..
            }
        ));
    }

    #[test]
    fn test_fatal_errors() {
        assert!(SearchError::task_failure("boom").is_fatal());
        assert!(SearchError::invalid_configuration("bad").is_fatal());
    }
}
