/*!
 * Sandbox Limits and Constants
 *
 * Values marked [SECURITY] bound work an attacker-controlled path can cause.
 * Values marked [LINUX-COMPAT] mirror the kernel's own limits.
 */

/// Maximum symlink expansions while resolving one path (40)
/// [SECURITY] Stops symlink cycles from resolving forever
/// [LINUX-COMPAT] Same as MAXSYMLINKS
pub const MAX_SYMLINK_HOPS: usize = 40;

/// Maximum raw path length accepted as input, in bytes (4096)
/// [SECURITY] Rejects oversized input before any filesystem access
/// [LINUX-COMPAT] Same as PATH_MAX
pub const MAX_PATH_BYTES: usize = 4096;
