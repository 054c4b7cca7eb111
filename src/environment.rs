//! Resolve the build environment from raw environment variables.
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::{error::ConfigError, utils::join_normalized};

/// Variable holding the project root.
pub const INIT_CWD: &str = "INIT_CWD";
/// Variable holding the source directory relative to the project root.
pub const SOURCE_DIR: &str = "SOURCE_DIR";
/// Variable holding the build directory relative to the project root.
pub const BUILD_DIR: &str = "BUILD_DIR";
/// Variable that toggles source maps.
pub const SOURCEMAPS: &str = "SOURCEMAPS";
/// Variable that selects the build mode.
pub const NODE_ENV: &str = "NODE_ENV";

/// Build mode for a single configuration run.
#[derive(Serialize, Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Fast incremental builds served from memory.
    Development,
    /// Optimized builds emitted to disk.
    Production,
}

impl BuildMode {
    /// Parse the value of `NODE_ENV`.
    ///
    /// Anything other than `development` yields production.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("development") => BuildMode::Development,
            Some("production") | None => BuildMode::Production,
            Some(other) => {
                log::warn!(
                    "Unrecognized {} value {:?}, using production",
                    NODE_ENV,
                    other
                );
                BuildMode::Production
            }
        }
    }

    /// Full name of the mode.
    pub fn name(&self) -> &'static str {
        match self {
            BuildMode::Development => "development",
            BuildMode::Production => "production",
        }
    }

    /// Short name of the mode used for path segments.
    pub fn segment(&self) -> &'static str {
        match self {
            BuildMode::Development => "dev",
            BuildMode::Production => "prod",
        }
    }
}

impl Default for BuildMode {
    fn default() -> Self {
        BuildMode::Production
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Resolved, immutable build environment.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    mode: BuildMode,
    project_root: PathBuf,
    source_dir: PathBuf,
    build_dir: PathBuf,
    source_maps_enabled: bool,
    package_dir: PathBuf,
}

impl Environment {
    /// Create an environment from already resolved values.
    ///
    /// Relative directories are resolved against the package directory.
    pub fn new<P: AsRef<Path>>(
        mode: BuildMode,
        source_dir: P,
        build_dir: P,
        source_maps_enabled: bool,
        package_dir: P,
    ) -> Self {
        let package_dir = join_normalized("/", package_dir);
        let source_dir = join_normalized(&package_dir, source_dir);
        let build_dir = join_normalized(&package_dir, build_dir);
        Self {
            mode,
            project_root: package_dir.clone(),
            source_dir,
            build_dir,
            source_maps_enabled,
            package_dir,
        }
    }

    /// Resolve an environment from a map of raw environment variables.
    ///
    /// `package_dir` is the directory that owns the cache, the DLL
    /// bundle and the `node_modules` used for module resolution;
    /// it must be absolute.
    pub fn from_vars<P: AsRef<Path>>(
        vars: &HashMap<String, String>,
        package_dir: P,
    ) -> Result<Self, ConfigError> {
        let package_dir = join_normalized("/", package_dir);
        let root = required(vars, INIT_CWD)?;
        let source = required(vars, SOURCE_DIR)?;
        let build = required(vars, BUILD_DIR)?;

        let project_root = join_normalized(&package_dir, root);
        let source_dir = join_normalized(&project_root, source);
        let build_dir = join_normalized(&project_root, build);

        let mode = BuildMode::parse(vars.get(NODE_ENV).map(|s| s.as_str()));
        let source_maps_enabled =
            source_maps_enabled(vars.get(SOURCEMAPS).map(|s| s.as_str()));

        log::debug!(
            "Resolved {} environment (source {}, build {})",
            mode,
            source_dir.display(),
            build_dir.display()
        );

        Ok(Self {
            mode,
            project_root,
            source_dir,
            build_dir,
            source_maps_enabled,
            package_dir,
        })
    }

    /// The build mode.
    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    /// Name of the build mode.
    pub fn mode_name(&self) -> &'static str {
        self.mode.name()
    }

    /// Determine if this is a development build.
    pub fn is_dev(&self) -> bool {
        self.mode == BuildMode::Development
    }

    /// Determine if this is a production build.
    pub fn is_prod(&self) -> bool {
        !self.is_dev()
    }

    /// Project root directory.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Application source directory.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Output directory for production builds.
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Directory owning caches, the DLL bundle and `node_modules`.
    pub fn package_dir(&self) -> &Path {
        &self.package_dir
    }

    /// Raw source map toggle.
    pub fn source_maps_enabled(&self) -> bool {
        self.source_maps_enabled
    }

    /// Whether emitted assets carry source maps; only production
    /// builds honor the toggle.
    pub fn source_maps(&self) -> bool {
        self.is_prod() && self.source_maps_enabled
    }

    /// Directory holding the precompiled DLL bundle and its manifest.
    pub fn dll_dir(&self) -> PathBuf {
        self.package_dir.join("dll")
    }
}

/// Source maps are only disabled by an explicit, case-insensitive `false`.
pub fn source_maps_enabled(value: Option<&str>) -> bool {
    !matches!(value, Some(v) if v.eq_ignore_ascii_case("false"))
}

fn required<'a>(
    vars: &'a HashMap<String, String>,
    name: &'static str,
) -> Result<&'a str, ConfigError> {
    match vars.get(name) {
        Some(value) if !value.is_empty() => Ok(value.as_str()),
        _ => Err(ConfigError::MissingVariable(name)),
    }
}
