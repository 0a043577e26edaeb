/*!
 * Error Types
 * Sandbox error handling with thiserror, miette, and serde support
 */

use crate::fs::FsError;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Sandbox operation result
///
/// A failed validation means the path must not be used.
pub type SandboxResult<T> = Result<T, SandboxError>;

/// Errors surfaced by sandboxed paths
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SandboxError {
    #[error("Path {attempted_path:?} escapes sandbox root {sandbox_root:?}")]
    #[diagnostic(
        code(sandbox::violation),
        help("The path resolves outside the sandbox. Check for '..' segments or symlinks pointing elsewhere.")
    )]
    Violation {
        attempted_path: PathBuf,
        sandbox_root: PathBuf,
    },

    #[error("Cannot resolve {path:?}: {cause}")]
    #[diagnostic(
        code(sandbox::resolution),
        help("A path component is missing, is not a directory, is not traversable, or forms a symlink loop.")
    )]
    Resolution { path: PathBuf, cause: FsError },

    #[error("Invalid path input: {0}")]
    #[diagnostic(
        code(sandbox::invalid_input),
        help("Paths must be non-empty, free of NUL bytes and within the length limit.")
    )]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(sandbox::invalid_config), help("Review the sandbox options."))]
    InvalidConfig(String),

    #[error("Filesystem error: {0}")]
    #[diagnostic(
        code(sandbox::filesystem),
        help("The path was validated but the filesystem operation itself failed.")
    )]
    Fs(#[from] FsError),
}

impl SandboxError {
    pub(crate) fn violation(attempted_path: &Path, sandbox_root: &Path) -> Self {
        SandboxError::Violation {
            attempted_path: attempted_path.to_path_buf(),
            sandbox_root: sandbox_root.to_path_buf(),
        }
    }

    pub(crate) fn resolution(path: &Path, cause: FsError) -> Self {
        SandboxError::Resolution {
            path: path.to_path_buf(),
            cause,
        }
    }

    /// True for containment failures
    #[inline]
    pub fn is_violation(&self) -> bool {
        matches!(self, SandboxError::Violation { .. })
    }

    /// True for canonicalization failures
    #[inline]
    pub fn is_resolution(&self) -> bool {
        matches!(self, SandboxError::Resolution { .. })
    }
}
