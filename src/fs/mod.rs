/*!
 * Filesystem Module
 * Collaborator abstraction that sandboxed paths delegate I/O to
 */

pub mod local;
pub mod traits;
pub mod types;

// Re-exports
pub use local::LocalFS;
pub use traits::{FileSystem, OpenFile};
pub use types::{Entry, FileType, FsError, FsResult, Metadata, OpenFlags, OpenMode, Permissions};
