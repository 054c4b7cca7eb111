//! Descriptor handed to the development server.
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    config::Stats, environment::Environment, error::ConfigError, rules::Pattern,
};

/// Document served for any path not matched by a real file.
pub const INDEX: &str = "/index.html";

/// Development server settings.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DevServerConfig {
    pub content_base: PathBuf,
    pub public_path: String,
    pub history_api_fallback: HistoryFallback,
    pub headers: IndexMap<String, String>,
    pub watch_options: WatchOptions,
    pub hot: bool,
    pub inline: bool,
    pub compress: bool,
    pub disable_host_check: bool,
    pub stats: Stats,
}

impl DevServerConfig {
    /// Server for the single page application in the source directory.
    pub fn new(env: &Environment) -> Result<Self, ConfigError> {
        let mut headers = IndexMap::new();
        headers.insert(
            "Access-Control-Allow-Origin".to_string(),
            "*".to_string(),
        );
        Ok(Self {
            content_base: env.source_dir().to_path_buf(),
            public_path: "/".to_string(),
            history_api_fallback: HistoryFallback {
                rewrites: vec![Rewrite {
                    from: Pattern::new(".")?,
                    to: INDEX.to_string(),
                }],
            },
            headers,
            watch_options: WatchOptions {
                ignored: vec!["node_modules".to_string(), "*.svg".to_string()],
            },
            hot: true,
            inline: true,
            compress: false,
            disable_host_check: true,
            stats: Stats::default(),
        })
    }

    /// Path served for a request that matched no file.
    pub fn rewrite<'a>(&'a self, request: &'a str) -> &'a str {
        self.history_api_fallback
            .rewrites
            .iter()
            .find(|r| r.matches(request))
            .map(|r| r.to.as_str())
            .unwrap_or(request)
    }
}

/// Single page application fallback.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
pub struct HistoryFallback {
    pub rewrites: Vec<Rewrite>,
}

/// Rewrites requests matching `from` to `to`.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
pub struct Rewrite {
    /// Regular expression tested against the request path.
    pub from: Pattern,
    pub to: String,
}

impl Rewrite {
    fn matches(&self, request: &str) -> bool {
        self.from.is_match_str(request)
    }
}

/// Paths the server's file watcher skips, passed through as globs.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
pub struct WatchOptions {
    pub ignored: Vec<String>,
}
