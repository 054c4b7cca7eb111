//! Compile the build pipeline configuration for a front-end bundler.
//!
//! A single synchronous pass resolves the environment, reads the DLL
//! manifest when developing and composes the rule table, plugins and
//! output naming into one [PipelineConfig](config::PipelineConfig).
use std::collections::HashMap;
use std::path::Path;

pub mod asset;
pub mod cache;
pub mod cli;
pub mod config;
pub mod dev_server;
pub mod environment;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod plugins;
pub mod rules;
mod utils;

pub use config::{compile, PipelineConfig};
pub use environment::{BuildMode, Environment};
pub use error::ConfigError;
pub use manifest::DllManifest;

/// Resolve the environment from raw variables and compile the configuration.
///
/// The manifest at `manifest_path` is only read for development builds.
pub fn generate<P: AsRef<Path>, M: AsRef<Path>>(
    vars: &HashMap<String, String>,
    package_dir: P,
    manifest_path: M,
) -> Result<PipelineConfig, ConfigError> {
    let env = Environment::from_vars(vars, package_dir)?;
    let manifest = if env.is_dev() {
        Some(DllManifest::load(manifest_path)?)
    } else {
        None
    };
    compile(&env, manifest.as_ref())
}
