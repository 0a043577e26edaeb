/*!
 * Filesystem Traits
 * The collaborator every sandboxed operation is gated in front of
 */

use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};

use super::types::*;

/// Filesystem collaborator
///
/// Paths handed to these methods have already been validated by the sandbox;
/// implementations perform the raw operation and nothing else. The
/// canonicalizer resolves paths through the same trait, so a sandbox never
/// mixes two views of the filesystem.
pub trait FileSystem: Send + Sync {
    /// Metadata of the path itself, without following a final symlink
    fn symlink_metadata(&self, path: &Path) -> FsResult<Metadata>;

    /// Metadata of the path, following symlinks
    fn metadata(&self, path: &Path) -> FsResult<Metadata>;

    /// Read symbolic link target
    fn read_link(&self, path: &Path) -> FsResult<PathBuf>;

    /// Open file with specified flags and mode
    ///
    /// When `nofollow` is set the final component must not be a symlink.
    fn open(
        &self,
        path: &Path,
        flags: OpenFlags,
        mode: OpenMode,
        nofollow: bool,
    ) -> FsResult<Box<dyn OpenFile>>;

    /// List directory contents
    fn list_dir(&self, path: &Path) -> FsResult<Vec<Entry>>;

    /// Get filesystem name/type
    fn name(&self) -> &str;
}

/// Open file handle trait
///
/// Closed when dropped.
pub trait OpenFile: Read + Write + Seek + Send + Sync {
    /// Sync file data to storage
    fn sync(&mut self) -> FsResult<()>;

    /// Get file metadata
    fn metadata(&self) -> FsResult<Metadata>;

    /// Set file length
    fn set_len(&mut self, size: u64) -> FsResult<()>;
}
