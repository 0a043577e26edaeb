/*!
 * Boxed Paths
 * Path values that can only name locations inside their sandbox root
 *
 * A `BoxedPath` is validated when it is created and again right before every
 * operation that touches the filesystem. Nothing is cached between the two:
 * a symlink swapped in after construction is caught by the next operation.
 */

use std::ffi::OsStr;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::canonical::Resolved;
use crate::config::SandboxOptions;
use crate::containment;
use crate::errors::{SandboxError, SandboxResult};
use crate::fs::{Entry, FsError, LocalFS, Metadata, OpenFile, OpenFlags, OpenMode};
use crate::root::{validate_input, SandboxRoot};

/// Drop root and drive prefixes so a segment can only extend a path
fn relative_segment(segment: &Path) -> PathBuf {
    segment
        .components()
        .filter(|c| !matches!(c, Component::Prefix(_) | Component::RootDir))
        .collect()
}

/// Resolution failed because something on the way does not exist
fn is_absent(err: &SandboxError) -> bool {
    matches!(
        err,
        SandboxError::Resolution {
            cause: FsError::NotFound(_) | FsError::NotADirectory(_),
            ..
        }
    )
}

/// A path proven to resolve inside its sandbox root
///
/// Exposes only vetted operations. There is deliberately no `AsRef<Path>`:
/// handing the raw path to `std::fs` would skip re-validation. Use
/// [`BoxedPath::realpath`] for a checked canonical path, or
/// [`BoxedPath::insecure_unrestrained_realpath`] to opt out of the check.
#[derive(Clone)]
pub struct BoxedPath {
    /// As the caller expressed it; relative paths are relative to the root
    path: PathBuf,
    root: Arc<SandboxRoot>,
}

impl BoxedPath {
    /// Validate `path` against `sandbox_root` on the host filesystem
    pub fn new(path: impl AsRef<Path>, sandbox_root: impl AsRef<Path>) -> SandboxResult<Self> {
        Self::with_options(path, sandbox_root, SandboxOptions::default())
    }

    pub fn with_options(
        path: impl AsRef<Path>,
        sandbox_root: impl AsRef<Path>,
        options: SandboxOptions,
    ) -> SandboxResult<Self> {
        let root = SandboxRoot::new(sandbox_root, Arc::new(LocalFS), options)?;
        Self::with_root(path, root)
    }

    /// Validate `path` against an already established root
    pub fn with_root(path: impl AsRef<Path>, root: Arc<SandboxRoot>) -> SandboxResult<Self> {
        let path = path.as_ref();
        validate_input(path)?;

        let boxed = Self {
            path: path.to_path_buf(),
            root,
        };
        let canonical = boxed.validated()?;
        debug!(
            path = %boxed.path.display(),
            canonical = %canonical.display(),
            "boxed path validated"
        );
        Ok(boxed)
    }

    /// Extend this path by `segment` and validate the result
    ///
    /// Absolute segments are appended as if relative: `join("/etc")` names
    /// `<self>/etc`, never `/etc`. The combined path is re-canonicalized, so
    /// `..` and symlinked directories in the segment are judged by where they
    /// actually lead.
    #[instrument(level = "trace", skip_all, fields(path = %self.path.display()))]
    pub fn join(&self, segment: impl AsRef<Path>) -> SandboxResult<BoxedPath> {
        let segment = segment.as_ref();
        validate_input(segment)?;
        Self::with_root(self.path.join(relative_segment(segment)), Arc::clone(&self.root))
    }

    /// Whether the path exists, after re-validating containment
    ///
    /// Errors with [`SandboxError::Violation`] instead of probing a location
    /// outside the sandbox. A missing or non-directory component on the way
    /// means `false`, as with `Path::exists`.
    pub fn exists(&self) -> SandboxResult<bool> {
        let path = match self.checked() {
            Ok(path) => path,
            Err(e) if is_absent(&e) => return Ok(false),
            Err(e) => return Err(e),
        };
        Ok(self.root.fs().metadata(&path).is_ok())
    }

    /// Open the file after re-validating containment
    ///
    /// On Unix the open refuses a symlink in the final component when
    /// `nofollow_open` is set; the validated path has none, so one appearing
    /// there was put in place after the check.
    #[instrument(level = "trace", skip_all, fields(path = %self.path.display()))]
    pub fn open(&self, flags: OpenFlags, mode: OpenMode) -> SandboxResult<Box<dyn OpenFile>> {
        let path = self.checked()?;
        let file = self.root.fs().open(
            &path,
            flags,
            mode,
            self.root.options().nofollow_open,
        )?;
        Ok(file)
    }

    /// Metadata (following symlinks) after re-validating containment
    pub fn metadata(&self) -> SandboxResult<Metadata> {
        let path = self.checked()?;
        Ok(self.root.fs().metadata(&path)?)
    }

    pub fn is_file(&self) -> SandboxResult<bool> {
        self.probe(Metadata::is_file)
    }

    pub fn is_dir(&self) -> SandboxResult<bool> {
        self.probe(Metadata::is_dir)
    }

    /// Entries of this directory after re-validating containment
    ///
    /// Entries are names only; join them to get sandboxed paths.
    pub fn list_dir(&self) -> SandboxResult<Vec<Entry>> {
        let path = self.checked()?;
        Ok(self.root.fs().list_dir(&path)?)
    }

    /// Parent directory, or `None` at the sandbox root
    ///
    /// Lexical when the path ends in a name (`a/link/f` gives `a/link`, which
    /// is where `f` really lives), otherwise `..` is appended.
    pub fn parent(&self) -> SandboxResult<Option<BoxedPath>> {
        if self.is_sandbox_root()? {
            return Ok(None);
        }
        let parent = match self.path.components().next_back() {
            Some(Component::Normal(_)) => match self.path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => self.root.anchor().to_path_buf(),
            },
            _ => self.path.join(".."),
        };
        Self::with_root(parent, Arc::clone(&self.root)).map(Some)
    }

    /// Whether this path resolves to the sandbox root itself
    pub fn is_sandbox_root(&self) -> SandboxResult<bool> {
        Ok(self.checked()? == self.root.canonical())
    }

    /// Canonical path, checked for containment
    pub fn realpath(&self) -> SandboxResult<PathBuf> {
        self.validated()
    }

    /// Canonical path relative to the sandbox root, checked for containment
    pub fn relative_path(&self) -> SandboxResult<PathBuf> {
        let canonical = self.validated()?;
        containment::relative_to(self.root.canonical(), &canonical)
            .map(Path::to_path_buf)
            .ok_or_else(|| SandboxError::violation(&canonical, self.root.canonical()))
    }

    /// Canonical path with NO containment check
    ///
    /// The only way to get a resolved location without the sandbox guarantee.
    /// The result may lie anywhere on the filesystem; the caller takes
    /// responsibility for what is done with it. Fails only when the path
    /// cannot be canonicalized at all.
    pub fn insecure_unrestrained_realpath(&self) -> SandboxResult<PathBuf> {
        let full = self.full_path();
        let canonical = self
            .root
            .canonicalizer()
            .walk(&full)?
            .into_result(&full, false)?;
        debug!(
            path = %self.path.display(),
            canonical = %canonical.display(),
            contained = containment::contains(self.root.canonical(), &canonical),
            "unrestrained realpath requested"
        );
        Ok(canonical)
    }

    /// Canonical sandbox root
    pub fn sandbox_root(&self) -> &Path {
        self.root.canonical()
    }

    /// Shared root, for constructing sibling paths
    pub fn root(&self) -> &Arc<SandboxRoot> {
        &self.root
    }

    /// Final component of the path as expressed
    pub fn file_name(&self) -> Option<&OsStr> {
        self.path.file_name()
    }

    /// Display the path as expressed, without resolving it
    pub fn display(&self) -> std::path::Display<'_> {
        self.path.display()
    }

    fn full_path(&self) -> PathBuf {
        // Joining an absolute path replaces the anchor
        self.root.anchor().join(&self.path)
    }

    /// Canonicalize and check containment
    ///
    /// Containment is judged first, so a path that escapes is reported as a
    /// violation even when part of it does not exist.
    fn resolve(&self) -> SandboxResult<Resolved> {
        let full = self.full_path();
        let resolved = self.root.canonicalizer().walk(&full)?;

        if !containment::contains(self.root.canonical(), &resolved.path) {
            warn!(
                attempted = %full.display(),
                resolved = %resolved.path.display(),
                root = %self.root.canonical().display(),
                "path escapes sandbox"
            );
            return Err(SandboxError::violation(&full, self.root.canonical()));
        }
        Ok(resolved)
    }

    /// `resolve`, failing when an intermediate component is unusable
    ///
    /// A missing final component is fine here: gated operations may create it.
    fn checked(&self) -> SandboxResult<PathBuf> {
        self.resolve()?.into_result(&self.full_path(), false)
    }

    /// `resolve`, then apply the root's `require_existing` setting
    fn validated(&self) -> SandboxResult<PathBuf> {
        let require_existing = self.root.options().require_existing;
        self.resolve()?.into_result(&self.full_path(), require_existing)
    }

    fn probe(&self, check: fn(&Metadata) -> bool) -> SandboxResult<bool> {
        match self.metadata() {
            Ok(md) => Ok(check(&md)),
            Err(SandboxError::Fs(e)) if e.is_not_found() => Ok(false),
            Err(e) if is_absent(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn unchecked_canonical(&self) -> Option<PathBuf> {
        self.root
            .canonicalizer()
            .walk(&self.full_path())
            .ok()
            .map(|r| r.path)
    }
}

/// Equal when both resolve to the same canonical path
///
/// Falls back to comparing the absolute, unresolved forms when either side
/// can no longer be resolved.
impl PartialEq for BoxedPath {
    fn eq(&self, other: &Self) -> bool {
        match (self.unchecked_canonical(), other.unchecked_canonical()) {
            (Some(a), Some(b)) => a == b,
            _ => self.full_path() == other.full_path(),
        }
    }
}

impl fmt::Display for BoxedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl fmt::Debug for BoxedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxedPath")
            .field("path", &self.path)
            .field("root", &self.root.canonical())
            .finish()
    }
}
