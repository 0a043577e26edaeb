/*!
 * Containment Checks
 * Component-wise "is this canonical path under that canonical root" tests
 */

use std::path::Path;

/// Check whether `candidate` equals `root` or lies beneath it
///
/// Both paths must already be canonical. Comparison works on whole path
/// components, so `/sandbox-other` is not inside `/sandbox`.
#[inline]
#[must_use]
pub fn contains(root: &Path, candidate: &Path) -> bool {
    debug_assert!(root.is_absolute(), "containment root must be absolute");
    candidate.starts_with(root)
}

/// The part of `candidate` below `root`, or `None` when not contained
///
/// Returns an empty path when `candidate` is the root itself.
#[must_use]
pub fn relative_to<'a>(root: &Path, candidate: &'a Path) -> Option<&'a Path> {
    candidate.strip_prefix(root).ok()
}
