/*!
 * Path Canonicalization
 * Resolves symlinks and dot segments by walking the path one component at a time
 *
 * A lexical normalizer cannot tell where `a/link/../b` ends up; only the
 * filesystem knows what `link` points at. Every component is therefore probed
 * with `lstat` through the collaborator, and symlink targets are spliced back
 * into the unresolved remainder before walking on.
 */

use std::collections::VecDeque;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use tracing::trace;

use crate::config::SandboxOptions;
use crate::errors::{SandboxError, SandboxResult};
use crate::fs::{FileSystem, FsError, LocalFS};

/// A unit of path still waiting to be resolved
#[derive(Debug)]
enum Segment {
    /// Filesystem root (plus drive prefix on Windows); resets resolution
    Anchor(PathBuf),
    Parent,
    Name(OsString),
}

fn segments(path: &Path) -> VecDeque<Segment> {
    let mut out = VecDeque::new();
    let mut anchor = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => anchor.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => out.push_back(Segment::Parent),
            Component::Normal(name) => out.push_back(Segment::Name(name.to_os_string())),
        }
    }

    if !anchor.as_os_str().is_empty() {
        out.push_front(Segment::Anchor(anchor));
    }
    out
}

/// Outcome of walking a path
///
/// Failures that leave the walk unable to continue are recorded rather than
/// returned, so the caller can still judge containment of the lexical
/// remainder before reporting them.
#[derive(Debug)]
pub(crate) struct Resolved {
    pub(crate) path: PathBuf,
    /// First component that was missing or not a directory while more
    /// components still had to be resolved beneath it
    pub(crate) blocked: Option<FsError>,
    /// The final component does not exist
    pub(crate) missing_leaf: Option<FsError>,
}

impl Resolved {
    pub(crate) fn into_result(
        self,
        input: &Path,
        require_existing: bool,
    ) -> SandboxResult<PathBuf> {
        if let Some(cause) = self.blocked {
            return Err(SandboxError::resolution(input, cause));
        }
        match self.missing_leaf {
            Some(cause) if require_existing => Err(SandboxError::resolution(input, cause)),
            _ => Ok(self.path),
        }
    }
}

/// Whether anything other than `..` is still waiting to be resolved
fn descends(pending: &VecDeque<Segment>) -> bool {
    pending.iter().any(|s| !matches!(s, Segment::Parent))
}

/// Resolves paths to their canonical absolute form
///
/// Every intermediate component must exist and be a directory. A missing
/// final component is accepted so that a path to a file about to be created
/// still canonicalizes, unless `require_existing` is set.
pub struct Canonicalizer<'a> {
    fs: &'a dyn FileSystem,
    max_symlink_hops: usize,
    require_existing: bool,
}

impl<'a> Canonicalizer<'a> {
    pub fn new(fs: &'a dyn FileSystem, options: &SandboxOptions) -> Self {
        Self {
            fs,
            max_symlink_hops: options.max_symlink_hops,
            require_existing: options.require_existing,
        }
    }

    /// Canonicalize, honoring the configured `require_existing`
    pub fn canonicalize(&self, path: &Path) -> SandboxResult<PathBuf> {
        self.walk(path)?.into_result(path, self.require_existing)
    }

    /// Canonicalize, requiring the final component to exist as well
    pub fn canonicalize_existing(&self, path: &Path) -> SandboxResult<PathBuf> {
        self.walk(path)?.into_result(path, true)
    }

    /// Resolve as far as the filesystem allows
    ///
    /// Missing and non-directory components are recorded in the result and
    /// the remainder is appended lexically. Loops, permission and other I/O
    /// failures are returned immediately.
    pub(crate) fn walk(&self, path: &Path) -> SandboxResult<Resolved> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|e| SandboxError::resolution(path, FsError::from_io(e, "current_dir")))?
                .join(path)
        };

        let mut pending = segments(&absolute);
        let mut resolved = PathBuf::new();
        let mut blocked = None;
        let mut missing_leaf = None;
        let mut hops = 0usize;

        while let Some(segment) = pending.pop_front() {
            match segment {
                Segment::Anchor(anchor) => resolved = anchor,
                Segment::Parent => {
                    // `/..` is `/`
                    resolved.pop();
                }
                Segment::Name(name) => {
                    let candidate = resolved.join(&name);
                    if blocked.is_some() {
                        resolved = candidate;
                        continue;
                    }

                    match self.fs.symlink_metadata(&candidate) {
                        Ok(md) if md.is_symlink() => {
                            hops += 1;
                            if hops > self.max_symlink_hops {
                                return Err(SandboxError::resolution(
                                    path,
                                    FsError::SymlinkLoop(format!(
                                        "more than {} links while resolving {}",
                                        self.max_symlink_hops,
                                        candidate.display()
                                    )),
                                ));
                            }

                            let target = self
                                .fs
                                .read_link(&candidate)
                                .map_err(|e| SandboxError::resolution(path, e))?;
                            trace!(
                                link = %candidate.display(),
                                target = %target.display(),
                                hops,
                                "expanding symlink"
                            );

                            // Relative targets resolve against the link's directory,
                            // which is what `resolved` still holds.
                            let mut spliced = segments(&target);
                            spliced.extend(pending.drain(..));
                            pending = spliced;
                        }
                        Ok(md) => {
                            if !md.is_dir() && !pending.is_empty() {
                                blocked = Some(FsError::NotADirectory(
                                    candidate.display().to_string(),
                                ));
                            }
                            resolved = candidate;
                        }
                        Err(e @ FsError::NotFound(_)) => {
                            if descends(&pending) {
                                blocked = Some(e);
                            } else {
                                missing_leaf.get_or_insert(e);
                            }
                            resolved = candidate;
                        }
                        Err(e @ FsError::NotADirectory(_)) => {
                            blocked = Some(e);
                            resolved = candidate;
                        }
                        Err(e) => return Err(SandboxError::resolution(path, e)),
                    }
                }
            }
        }

        Ok(Resolved {
            path: resolved,
            blocked,
            missing_leaf,
        })
    }
}

/// Canonicalize against the host filesystem with default options
pub fn canonicalize(path: &Path) -> SandboxResult<PathBuf> {
    Canonicalizer::new(&LocalFS, &SandboxOptions::default()).canonicalize(path)
}
