//! Manifest of the precompiled DLL bundle.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;

/// File name of the manifest inside the DLL directory.
pub const MANIFEST_FILE: &str = "libs-manifest.json";
/// File name of the precompiled bundle inside the DLL directory.
pub const BUNDLE_FILE: &str = "libs.dll.js";

/// Reference table of modules provided by the DLL bundle.
///
/// Module metadata is opaque and passed through unchanged; insertion
/// order is preserved so serialization is stable.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DllManifest {
    pub name: String,
    pub content: IndexMap<String, Value>,
}

impl DllManifest {
    /// Read the manifest from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|source| ConfigError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(f);
        let manifest: DllManifest =
            serde_json::from_reader(reader).map_err(|source| {
                ConfigError::ManifestParse {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        log::info!(
            "Loaded DLL manifest {} with {} module(s)",
            manifest.name,
            manifest.content.len()
        );
        Ok(manifest)
    }
}
