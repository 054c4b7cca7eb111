//! Compose the pipeline configuration handed to the bundler engine.
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    asset::NameTemplate,
    dev_server::DevServerConfig,
    environment::{BuildMode, Environment},
    error::ConfigError,
    manifest::DllManifest,
    plugins::{Plugin, PluginSelector},
    rules::{RuleTable, RuleTableBuilder},
};

/// Entry that patches the UI framework for hot reloading.
pub const HOT_PATCH_ENTRY: &str = "react-hot-loader/patch";

/// Name of the single entry chunk.
pub const APP_ENTRY: &str = "app";

/// Node core modules replaced with empty shims in the browser.
const NODE_SHIMS: &[&str] = &["dgram", "fs", "net", "tls", "child_process"];

/// Complete, immutable pipeline configuration.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    pub mode: BuildMode,
    pub optimization: Optimization,
    pub entry: IndexMap<String, Vec<PathBuf>>,
    pub output: Output,
    pub plugins: Vec<Plugin>,
    pub module: RuleTable,
    pub resolve: Resolve,
    pub stats: Stats,
    pub node: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_server: Option<DevServerConfig>,
}

impl PipelineConfig {
    /// Ids of the selected plugins in order.
    pub fn plugin_ids(&self) -> Vec<&'static str> {
        self.plugins.iter().map(Plugin::id).collect()
    }
}

/// Output location and naming.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    /// Only set for production, development serves from memory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub filename: NameTemplate,
    pub chunk_filename: NameTemplate,
}

impl Output {
    /// Content hashed names in production, stable names in development.
    pub fn new(env: &Environment) -> Self {
        if env.is_prod() {
            Self {
                path: Some(env.build_dir().to_path_buf()),
                filename: "[name].[contenthash:6].js".into(),
                chunk_filename: "[name].[contenthash:6].chunk.js".into(),
            }
        } else {
            Self {
                path: None,
                filename: "[name].js".into(),
                chunk_filename: "[chunkname].chunk.js".into(),
            }
        }
    }
}

/// Optimization switches.
#[derive(Serialize, Copy, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Optimization {
    pub named_modules: bool,
    pub no_emit_on_errors: bool,
}

/// Module resolution settings.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
pub struct Resolve {
    pub modules: Vec<PathBuf>,
    pub symlinks: bool,
}

/// Build reporting switches.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub assets: bool,
    pub children: bool,
    pub chunks: bool,
    pub hash: bool,
    pub modules: bool,
    pub public_path: bool,
    pub timings: bool,
    pub version: bool,
    pub warnings: bool,
    pub colors: IndexMap<String, String>,
}

impl Default for Stats {
    fn default() -> Self {
        let mut colors = IndexMap::new();
        colors.insert("green".to_string(), "\u{1b}[32m".to_string());
        Self {
            assets: true,
            children: false,
            chunks: false,
            hash: false,
            modules: false,
            public_path: false,
            timings: true,
            version: false,
            warnings: true,
            colors,
        }
    }
}

/// Compose the configuration for an environment.
///
/// The manifest is required in development and ignored in production.
pub fn compile(
    env: &Environment,
    manifest: Option<&DllManifest>,
) -> Result<PipelineConfig, ConfigError> {
    let module = RuleTableBuilder::new(env).build()?;
    let plugins = PluginSelector::new(env).select(manifest)?;

    let mut app = Vec::new();
    if env.is_dev() {
        app.push(PathBuf::from(HOT_PATCH_ENTRY));
    }
    app.push(env.source_dir().to_path_buf());
    let mut entry = IndexMap::new();
    entry.insert(APP_ENTRY.to_string(), app);

    let node = NODE_SHIMS
        .iter()
        .map(|name| (name.to_string(), "empty".to_string()))
        .collect();

    let dev_server = if env.is_dev() {
        Some(DevServerConfig::new(env)?)
    } else {
        None
    };

    log::info!("Compiled {} pipeline configuration", env.mode());

    Ok(PipelineConfig {
        mode: env.mode(),
        optimization: Optimization {
            named_modules: true,
            no_emit_on_errors: true,
        },
        entry,
        output: Output::new(env),
        plugins,
        module,
        resolve: Resolve {
            modules: vec![
                env.package_dir().join("node_modules"),
                env.source_dir().to_path_buf(),
            ],
            symlinks: false,
        },
        stats: Stats::default(),
        node,
        dev_server,
    })
}
