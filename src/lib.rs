/*!
 * Path Sandbox
 * Filesystem paths that cannot resolve outside a designated root
 *
 * Build a [`PathSandbox`] from a trusted directory, then derive
 * [`BoxedPath`] values from untrusted input with `join`. Every derived path
 * is canonicalized against the live filesystem (symlinks followed, `.` and
 * `..` removed) and checked component-wise against the canonical root, both
 * when it is created and again right before each filesystem operation.
 *
 * ```no_run
 * use path_sandbox::{OpenFlags, OpenMode, PathSandbox};
 *
 * # fn main() -> Result<(), path_sandbox::SandboxError> {
 * let uploads = PathSandbox::new("/srv/uploads")?;
 * let file = uploads.join("alice/avatar.png")?;
 * let _handle = file.open(OpenFlags::read_only(), OpenMode::default())?;
 *
 * assert!(uploads.join("../../etc/passwd").unwrap_err().is_violation());
 * # Ok(())
 * # }
 * ```
 */

pub mod boxed;
pub mod canonical;
pub mod config;
pub mod containment;
pub mod errors;
pub mod fs;
pub mod limits;
pub mod monitoring;
pub mod root;
pub mod sandbox;

// Re-exports
pub use boxed::BoxedPath;
pub use canonical::{canonicalize, Canonicalizer};
pub use config::SandboxOptions;
pub use errors::{SandboxError, SandboxResult};
pub use fs::{Entry, FileSystem, FileType, FsError, LocalFS, Metadata, OpenFile, OpenFlags, OpenMode};
pub use monitoring::init_tracing;
pub use root::SandboxRoot;
pub use sandbox::PathSandbox;
