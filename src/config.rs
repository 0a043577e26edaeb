/*!
 * Sandbox Configuration
 */

use crate::errors::{SandboxError, SandboxResult};
use crate::limits::MAX_SYMLINK_HOPS;
use serde::{Deserialize, Serialize};

/// Options shared by a sandbox and every path derived from it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct SandboxOptions {
    /// Symlink expansions allowed while resolving a single path
    pub max_symlink_hops: usize,
    /// Also fail resolution when the final component does not exist
    ///
    /// Intermediate components must exist regardless. Paths in a sandbox
    /// with this set can only name existing entries, so files cannot be
    /// created through it.
    pub require_existing: bool,
    /// Refuse to open a final component that is a symlink (Unix)
    pub nofollow_open: bool,
}

impl SandboxOptions {
    /// A missing final component is accepted (default)
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            max_symlink_hops: MAX_SYMLINK_HOPS,
            require_existing: false,
            nofollow_open: true,
        }
    }

    /// Every component, the final one included, must exist
    #[must_use]
    pub fn strict() -> Self {
        Self {
            require_existing: true,
            ..Self::lenient()
        }
    }

    #[must_use]
    pub fn with_max_symlink_hops(mut self, hops: usize) -> Self {
        self.max_symlink_hops = hops;
        self
    }

    #[must_use]
    pub fn with_require_existing(mut self, require: bool) -> Self {
        self.require_existing = require;
        self
    }

    #[must_use]
    pub fn with_nofollow_open(mut self, nofollow: bool) -> Self {
        self.nofollow_open = nofollow;
        self
    }

    /// Reject option combinations that cannot resolve anything
    pub fn validate(&self) -> SandboxResult<()> {
        if self.max_symlink_hops == 0 {
            return Err(SandboxError::InvalidConfig(
                "max_symlink_hops must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SandboxOptions {
    fn default() -> Self {
        Self::lenient()
    }
}
