//! Cache directories partitioned by build mode and purpose.
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::environment::BuildMode;

/// Name of the cache root below the package directory.
pub const CACHE_ROOT: &str = ".cache";

/// What a cache directory is used for.
#[derive(Serialize, Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CachePurpose {
    /// Results of the caching step that precedes a transform.
    PreTransform,
    /// Transpiler cache for application code.
    Transpile,
    /// Transpiler cache for dependency code.
    TranspileDependencies,
}

impl CachePurpose {
    /// Path segment for this purpose.
    pub fn as_str(&self) -> &'static str {
        match self {
            CachePurpose::PreTransform => "pre-transform",
            CachePurpose::Transpile => "transpile",
            CachePurpose::TranspileDependencies => "transpile-deps",
        }
    }
}

impl fmt::Display for CachePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cache directory for a mode and purpose below `root`.
///
/// The mode is always a path segment so development and production
/// never share a directory.
pub fn cache_directory<P: AsRef<Path>>(
    root: P,
    mode: BuildMode,
    purpose: CachePurpose,
) -> PathBuf {
    root.as_ref()
        .join(CACHE_ROOT)
        .join(purpose.as_str())
        .join(mode.segment())
}
