/*!
 * Local Filesystem Backend
 * Wraps std::fs for host filesystem access
 */

use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::traits::{FileSystem, OpenFile};
use super::types::*;

/// Host filesystem implementation using std::fs
///
/// Performs no path resolution of its own; the sandbox hands it canonical,
/// already-validated paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFS;

impl LocalFS {
    pub fn new() -> Self {
        Self
    }

    /// Convert std::fs::Metadata to sandbox Metadata
    fn convert_metadata(md: fs::Metadata) -> Metadata {
        #[cfg(unix)]
        let mode = {
            use std::os::unix::fs::PermissionsExt;
            md.permissions().mode()
        };
        #[cfg(not(unix))]
        let mode = if md.permissions().readonly() {
            0o444
        } else {
            0o644
        };

        Metadata {
            file_type: md.file_type().into(),
            size: md.len(),
            permissions: Permissions::new(mode),
            modified: md.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            accessed: md.accessed().unwrap_or(SystemTime::UNIX_EPOCH),
            created: md.created().unwrap_or(SystemTime::UNIX_EPOCH),
        }
    }
}

impl FileSystem for LocalFS {
    fn symlink_metadata(&self, path: &Path) -> FsResult<Metadata> {
        let md = fs::symlink_metadata(path)
            .map_err(|e| FsError::from_io(e, format!("lstat {}", path.display())))?;
        Ok(Self::convert_metadata(md))
    }

    fn metadata(&self, path: &Path) -> FsResult<Metadata> {
        let md = fs::metadata(path)
            .map_err(|e| FsError::from_io(e, format!("metadata {}", path.display())))?;
        Ok(Self::convert_metadata(md))
    }

    fn read_link(&self, path: &Path) -> FsResult<PathBuf> {
        fs::read_link(path).map_err(|e| FsError::from_io(e, format!("read_link {}", path.display())))
    }

    fn open(
        &self,
        path: &Path,
        flags: OpenFlags,
        mode: OpenMode,
        nofollow: bool,
    ) -> FsResult<Box<dyn OpenFile>> {
        let mut options = fs::OpenOptions::new();

        options.read(flags.read);
        options.write(flags.write);
        options.append(flags.append);
        options.truncate(flags.truncate);
        options.create(flags.create);
        options.create_new(flags.create_new);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(mode.permissions.mode);
            if nofollow {
                options.custom_flags(libc::O_NOFOLLOW);
            }
        }
        #[cfg(not(unix))]
        let _ = (mode, nofollow);

        let file = options
            .open(path)
            .map_err(|e| FsError::from_io(e, format!("open {}", path.display())))?;

        Ok(Box::new(LocalFile { file }))
    }

    fn list_dir(&self, path: &Path) -> FsResult<Vec<Entry>> {
        let entries = fs::read_dir(path)
            .map_err(|e| FsError::from_io(e, format!("list_dir {}", path.display())))?;

        let mut result = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                FsError::from_io(e, format!("read dir entry in {}", path.display()))
            })?;
            let name = entry.file_name().into_string().map_err(|raw| {
                FsError::InvalidPath(format!("invalid UTF-8 in filename {:?}", raw))
            })?;
            let file_type = entry
                .file_type()
                .map_err(|e| FsError::from_io(e, format!("get file type for {}", name)))?;

            result.push(Entry::new(name, file_type.into()));
        }

        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    fn name(&self) -> &str {
        "local"
    }
}

/// Local file handle
struct LocalFile {
    file: fs::File,
}

impl Read for LocalFile {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for LocalFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }
}

impl Seek for LocalFile {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.file.seek(pos)
    }
}

impl OpenFile for LocalFile {
    fn sync(&mut self) -> FsResult<()> {
        self.file
            .sync_all()
            .map_err(|e| FsError::IoError(format!("sync: {}", e)))
    }

    fn metadata(&self) -> FsResult<Metadata> {
        let md = self
            .file
            .metadata()
            .map_err(|e| FsError::IoError(format!("metadata: {}", e)))?;
        Ok(LocalFS::convert_metadata(md))
    }

    fn set_len(&mut self, size: u64) -> FsResult<()> {
        self.file
            .set_len(size)
            .map_err(|e| FsError::IoError(format!("set_len: {}", e)))
    }
}
