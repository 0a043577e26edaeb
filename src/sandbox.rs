/*!
 * Path Sandbox
 * Trusted entry point: a boxed path whose path is its own root
 */

use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::boxed::BoxedPath;
use crate::config::SandboxOptions;
use crate::errors::SandboxResult;
use crate::fs::{FileSystem, LocalFS};
use crate::root::SandboxRoot;

/// A sandbox rooted at a trusted directory
///
/// Dereferences to the [`BoxedPath`] naming the root, so `sandbox.join(..)`,
/// `sandbox.exists()` and friends behave exactly as on
/// `BoxedPath::new(root, root)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSandbox {
    root_path: BoxedPath,
}

impl PathSandbox {
    /// Sandbox on the host filesystem with default options
    ///
    /// Fails only when `root` cannot be canonicalized.
    pub fn new(root: impl AsRef<Path>) -> SandboxResult<Self> {
        Self::with_options(root, SandboxOptions::default())
    }

    pub fn with_options(root: impl AsRef<Path>, options: SandboxOptions) -> SandboxResult<Self> {
        Self::with_filesystem(root, Arc::new(LocalFS), options)
    }

    /// Sandbox backed by a custom filesystem collaborator
    pub fn with_filesystem(
        root: impl AsRef<Path>,
        fs: Arc<dyn FileSystem>,
        options: SandboxOptions,
    ) -> SandboxResult<Self> {
        let root = SandboxRoot::new(root, fs, options)?;
        let anchor = root.anchor().to_path_buf();
        let root_path = BoxedPath::with_root(anchor, root)?;

        info!(
            root = %root_path.sandbox_root().display(),
            require_existing = options.require_existing,
            "path sandbox created"
        );
        Ok(Self { root_path })
    }

    /// Validate `path` against this sandbox's root
    ///
    /// Relative paths are taken relative to the root. Equivalent to
    /// `BoxedPath::new(path, root)` without re-canonicalizing the root.
    pub fn boxed(&self, path: impl AsRef<Path>) -> SandboxResult<BoxedPath> {
        BoxedPath::with_root(path, Arc::clone(self.root_path.root()))
    }

    pub fn as_boxed(&self) -> &BoxedPath {
        &self.root_path
    }

    pub fn into_boxed(self) -> BoxedPath {
        self.root_path
    }
}

impl Deref for PathSandbox {
    type Target = BoxedPath;

    fn deref(&self) -> &BoxedPath {
        &self.root_path
    }
}

impl AsRef<BoxedPath> for PathSandbox {
    fn as_ref(&self) -> &BoxedPath {
        &self.root_path
    }
}

impl From<PathSandbox> for BoxedPath {
    fn from(sandbox: PathSandbox) -> Self {
        sandbox.root_path
    }
}
