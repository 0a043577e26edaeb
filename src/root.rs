/*!
 * Sandbox Root
 * The canonical directory shared by a sandbox and every path derived from it
 */

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::canonical::Canonicalizer;
use crate::config::SandboxOptions;
use crate::errors::{SandboxError, SandboxResult};
use crate::fs::{FileSystem, FsError};
use crate::limits::MAX_PATH_BYTES;

/// Reject malformed raw input before it reaches the filesystem
pub(crate) fn validate_input(path: &Path) -> SandboxResult<()> {
    let bytes = path.as_os_str().as_encoded_bytes();
    if bytes.is_empty() {
        return Err(SandboxError::InvalidInput("empty path".to_string()));
    }
    if bytes.contains(&0) {
        return Err(SandboxError::InvalidInput(format!(
            "path contains a NUL byte: {:?}",
            path
        )));
    }
    if bytes.len() > MAX_PATH_BYTES {
        return Err(SandboxError::InvalidInput(format!(
            "path is {} bytes, limit is {}",
            bytes.len(),
            MAX_PATH_BYTES
        )));
    }
    Ok(())
}

/// Immutable sandbox root
///
/// Holds the root both as the caller spelled it (made absolute, otherwise
/// untouched) and in canonical form. Relative paths inside the sandbox are
/// anchored at the former; containment is decided against the latter.
pub struct SandboxRoot {
    anchor: PathBuf,
    canonical: PathBuf,
    fs: Arc<dyn FileSystem>,
    options: SandboxOptions,
}

impl SandboxRoot {
    /// Canonicalize `root` (every component must exist) and freeze it
    pub fn new(
        root: impl AsRef<Path>,
        fs: Arc<dyn FileSystem>,
        options: SandboxOptions,
    ) -> SandboxResult<Arc<Self>> {
        let root = root.as_ref();
        validate_input(root)?;
        options.validate()?;

        let anchor = std::path::absolute(root).map_err(|e| {
            SandboxError::resolution(root, FsError::from_io(e, "make root absolute"))
        })?;
        let canonical = Canonicalizer::new(&*fs, &options).canonicalize_existing(&anchor)?;

        debug!(
            root = %anchor.display(),
            canonical = %canonical.display(),
            backend = fs.name(),
            "sandbox root established"
        );

        Ok(Arc::new(Self {
            anchor,
            canonical,
            fs,
            options,
        }))
    }

    /// Canonical root every path is checked against
    pub fn canonical(&self) -> &Path {
        &self.canonical
    }

    /// Absolute, non-canonical form of the root as given
    pub fn anchor(&self) -> &Path {
        &self.anchor
    }

    pub fn options(&self) -> &SandboxOptions {
        &self.options
    }

    pub(crate) fn fs(&self) -> &dyn FileSystem {
        &*self.fs
    }

    pub(crate) fn canonicalizer(&self) -> Canonicalizer<'_> {
        Canonicalizer::new(&*self.fs, &self.options)
    }
}

impl fmt::Debug for SandboxRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SandboxRoot")
            .field("anchor", &self.anchor)
            .field("canonical", &self.canonical)
            .field("fs", &self.fs.name())
            .field("options", &self.options)
            .finish()
    }
}
