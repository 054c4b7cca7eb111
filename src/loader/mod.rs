//! Typed transformation steps and the chains built from them.
//!
//! A chain is declared in the order the bundler engine lists loaders:
//! the last step runs first on the raw input.
use std::path::{Path, PathBuf};

use serde::{ser::SerializeStruct, Serialize, Serializer};

use crate::asset::{data_url, AssetOutput, NameTemplate, TemplateContext};

pub mod style;

pub use style::{CssModules, StyleChainBuilder};

/// Size in bytes at or below which media is inlined.
pub const INLINE_LIMIT: u64 = 10_000;

/// Ordered sequence of steps applied to one asset.
pub type Chain = Vec<Step>;

/// One transformation stage with its options.
///
/// Serialized as `{"loader": <tool id>, "options": {...}}`; steps
/// without options omit the `options` field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Step {
    /// Caches the output of the steps that follow it.
    Cache(CacheOptions),
    /// Injects styles into the document through `<style>` tags.
    StyleInject,
    /// Collects styles into a separately emitted file.
    StyleExtract,
    /// Resolves `@import` and `url()` in stylesheets.
    Css(CssOptions),
    /// Post-processes stylesheets.
    PostCss(PostCssOptions),
    /// Compiles a style preprocessor language to CSS.
    Preprocess(PreprocessOptions),
    /// Inlines small files as data URLs, emits the rest.
    Url(UrlOptions),
    /// Transpiles scripts.
    Transpile(TranspileOptions),
    /// Emits the file as is.
    File(FileOptions),
}

impl Step {
    /// Identifier of the tool that performs this step.
    pub fn tool_id(&self) -> &'static str {
        match self {
            Step::Cache(_) => "cache-loader",
            Step::StyleInject => "style-loader",
            Step::StyleExtract => "mini-css-extract-plugin/loader",
            Step::Css(_) => "css-loader",
            Step::PostCss(_) => "postcss-loader",
            Step::Preprocess(options) => options.preprocessor.tool_id(),
            Step::Url(_) => "url-loader",
            Step::Transpile(_) => "babel-loader",
            Step::File(_) => "file-loader",
        }
    }
}

impl Serialize for Step {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Step", 2)?;
        state.serialize_field("loader", self.tool_id())?;
        match self {
            Step::Cache(options) => state.serialize_field("options", options)?,
            Step::Css(options) => state.serialize_field("options", options)?,
            Step::PostCss(options) => {
                state.serialize_field("options", options)?
            }
            Step::Preprocess(options) => {
                state.serialize_field("options", options)?
            }
            Step::Url(options) => state.serialize_field("options", options)?,
            Step::Transpile(options) => {
                state.serialize_field("options", options)?
            }
            Step::File(options) => state.serialize_field("options", options)?,
            Step::StyleInject | Step::StyleExtract => {
                state.skip_field("options")?
            }
        }
        state.end()
    }
}

/// Options for the caching step.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CacheOptions {
    pub cache_directory: PathBuf,
}

/// Options for CSS resolution.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CssOptions {
    /// Number of steps after this one that also process `@import`ed files.
    pub import_loaders: usize,
    pub source_map: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub modules: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_ident_name: Option<String>,
}

/// Options for post-processing.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostCssOptions {
    pub ident: &'static str,
    pub plugins: Vec<PostCssPlugin>,
    pub source_map: bool,
}

impl PostCssOptions {
    /// The fixed plugin set.
    pub fn new(source_map: bool) -> Self {
        Self {
            ident: "postcss",
            plugins: vec![
                PostCssPlugin::FlexbugsFixes,
                PostCssPlugin::PresetEnv {
                    autoprefixer_flexbox: "no-2009",
                    stage: 3,
                },
            ],
            source_map,
        }
    }
}

/// Post-processing plugin.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum PostCssPlugin {
    #[serde(rename = "postcss-flexbugs-fixes")]
    FlexbugsFixes,
    #[serde(rename = "postcss-preset-env", rename_all = "camelCase")]
    PresetEnv {
        autoprefixer_flexbox: &'static str,
        stage: u8,
    },
}

/// Supported style preprocessors.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Preprocessor {
    Sass,
}

impl Preprocessor {
    /// Tool id of the preprocessing step.
    pub fn tool_id(&self) -> &'static str {
        match self {
            Preprocessor::Sass => "sass-loader",
        }
    }
}

/// Options for the preprocessor step.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreprocessOptions {
    #[serde(skip)]
    pub preprocessor: Preprocessor,
    pub source_map: bool,
}

/// Options for inlining media.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
pub struct UrlOptions {
    pub limit: u64,
    pub name: NameTemplate,
}

impl UrlOptions {
    /// Inline the contents when they fit under the limit,
    /// otherwise name the emitted file.
    pub fn dispose(&self, file: &Path, contents: &[u8]) -> AssetOutput {
        if contents.len() as u64 <= self.limit {
            AssetOutput::Inline {
                data_url: data_url(file, contents),
            }
        } else {
            AssetOutput::Emit {
                path: self.name.render(&TemplateContext::for_file(file, contents)),
            }
        }
    }
}

/// Options for emitting a file unchanged.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
pub struct FileOptions {
    pub name: NameTemplate,
}

impl FileOptions {
    /// Path of the emitted file.
    pub fn emit_path(&self, file: &Path, contents: &[u8]) -> String {
        self.name.render(&TemplateContext::for_file(file, contents))
    }
}

/// Language features enabled when transpiling.
#[derive(Serialize, Copy, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum SyntaxPreset {
    /// JSX, type stripping and proposals for application code.
    Application,
    /// Standard syntax only, for dependencies.
    Standard,
}

/// Options for the transpile step.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TranspileOptions {
    pub preset: SyntaxPreset,
    pub cache_directory: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_compression: Option<bool>,
    pub compact: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_maps: Option<bool>,
}
