//! Select the bundler plugins for an environment.
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    environment::Environment,
    error::ConfigError,
    manifest::{DllManifest, BUNDLE_FILE},
};

/// Bundler plugin with its options.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "plugin", content = "options")]
pub enum Plugin {
    /// Replaces `process.env.NODE_ENV` with the resolved mode.
    #[serde(rename = "define")]
    Define(DefineOptions),
    /// Binds imports to the precompiled DLL bundle.
    #[serde(rename = "dll-reference")]
    DllReference(DllReferenceOptions),
    /// Generates the HTML document.
    #[serde(rename = "html")]
    HtmlDocument(HtmlOptions),
    /// Adds the DLL bundle `<script>` to the generated HTML.
    #[serde(rename = "add-asset-html")]
    AddAssetHtml(AddAssetHtmlOptions),
    /// Hot module replacement.
    #[serde(rename = "hot-module-replacement")]
    HotModuleReplacement,
}

impl Plugin {
    /// Identifier of the plugin.
    pub fn id(&self) -> &'static str {
        match self {
            Plugin::Define(_) => "define",
            Plugin::DllReference(_) => "dll-reference",
            Plugin::HtmlDocument(_) => "html",
            Plugin::AddAssetHtml(_) => "add-asset-html",
            Plugin::HotModuleReplacement => "hot-module-replacement",
        }
    }
}

/// Constants replaced in the bundle.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
pub struct DefineOptions {
    /// Expression mapped to its JSON encoded replacement.
    #[serde(flatten)]
    pub definitions: IndexMap<String, String>,
}

/// Options for referencing the DLL bundle.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DllReferenceOptions {
    pub context: PathBuf,
    pub manifest: DllManifest,
}

/// Options for HTML generation.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
pub struct HtmlOptions {
    pub inject: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minify: Option<MinifyOptions>,
}

/// HTML minification switches.
#[derive(Serialize, Copy, Clone, Debug, Default, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MinifyOptions {
    pub remove_comments: bool,
    pub collapse_whitespace: bool,
    pub remove_redundant_attributes: bool,
    pub use_short_doctype: bool,
    pub remove_empty_attributes: bool,
    pub remove_style_link_type_attributes: bool,
    pub keep_closing_slash: bool,
    #[serde(rename = "minifyJS")]
    pub minify_js: bool,
    #[serde(rename = "minifyCSS")]
    pub minify_css: bool,
    #[serde(rename = "minifyURLs")]
    pub minify_urls: bool,
}

impl MinifyOptions {
    /// Every minification enabled.
    pub fn all() -> Self {
        Self {
            remove_comments: true,
            collapse_whitespace: true,
            remove_redundant_attributes: true,
            use_short_doctype: true,
            remove_empty_attributes: true,
            remove_style_link_type_attributes: true,
            keep_closing_slash: true,
            minify_js: true,
            minify_css: true,
            minify_urls: true,
        }
    }

    /// Determine if every minification is enabled.
    pub fn is_all(&self) -> bool {
        self == &Self::all()
    }
}

/// Options for adding assets to the generated HTML.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
pub struct AddAssetHtmlOptions {
    pub assets: Vec<HtmlAsset>,
}

/// Asset referenced from the generated HTML.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HtmlAsset {
    pub filepath: PathBuf,
    pub include_sourcemap: bool,
}

/// Chooses plugins for an environment.
pub struct PluginSelector<'a> {
    env: &'a Environment,
}

impl<'a> PluginSelector<'a> {
    /// Create a selector.
    pub fn new(env: &'a Environment) -> Self {
        Self { env }
    }

    /// Development binds against the precompiled DLL bundle.
    pub fn wants_dll(&self) -> bool {
        self.env.is_dev()
    }

    /// Development swaps modules in place.
    pub fn wants_hot_reload(&self) -> bool {
        self.env.is_dev()
    }

    /// Production minifies the generated HTML.
    pub fn wants_minify(&self) -> bool {
        self.env.is_prod()
    }

    /// Ordered plugin list.
    ///
    /// The manifest is only required when the DLL bundle is used.
    pub fn select(
        &self,
        manifest: Option<&DllManifest>,
    ) -> Result<Vec<Plugin>, ConfigError> {
        let mut plugins = vec![self.define()];

        if self.wants_dll() {
            let manifest = manifest.ok_or(ConfigError::ManifestRequired)?;
            plugins.push(Plugin::DllReference(DllReferenceOptions {
                context: self.env.package_dir().to_path_buf(),
                manifest: manifest.clone(),
            }));
        }

        plugins.push(Plugin::HtmlDocument(HtmlOptions {
            inject: true,
            minify: if self.wants_minify() {
                Some(MinifyOptions::all())
            } else {
                None
            },
        }));

        if self.wants_dll() {
            plugins.push(Plugin::AddAssetHtml(AddAssetHtmlOptions {
                assets: vec![HtmlAsset {
                    filepath: self.env.dll_dir().join(BUNDLE_FILE),
                    include_sourcemap: false,
                }],
            }));
        }

        if self.wants_hot_reload() {
            plugins.push(Plugin::HotModuleReplacement);
        }

        log::debug!(
            "Selected plugins {:?}",
            plugins.iter().map(Plugin::id).collect::<Vec<_>>()
        );
        Ok(plugins)
    }

    fn define(&self) -> Plugin {
        let mut definitions = IndexMap::new();
        definitions.insert(
            "process.env.NODE_ENV".to_string(),
            serde_json::Value::from(self.env.mode_name()).to_string(),
        );
        Plugin::Define(DefineOptions { definitions })
    }
}
