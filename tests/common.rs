#![allow(dead_code)]

use std::collections::HashMap;

use anyhow::Result;

use pumice::{BuildMode, DllManifest, Environment};

pub const MANIFEST: &str = "tests/fixtures/dll/libs-manifest.json";

pub fn env(mode: BuildMode, source_maps: bool) -> Environment {
    Environment::new(
        mode,
        "/project/src",
        "/project/build",
        source_maps,
        "/project",
    )
}

pub fn dev() -> Environment {
    env(BuildMode::Development, false)
}

pub fn prod() -> Environment {
    env(BuildMode::Production, true)
}

pub fn manifest() -> Result<DllManifest> {
    Ok(DllManifest::load(MANIFEST)?)
}

pub fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
