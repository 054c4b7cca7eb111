//! Build the step chain for a stylesheet.
use crate::{
    cache::{cache_directory, CachePurpose},
    environment::Environment,
};

use super::{
    CacheOptions, Chain, CssOptions, PostCssOptions, PreprocessOptions,
    Preprocessor, Step,
};

/// Whether class names are scoped locally to the stylesheet.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CssModules {
    /// Plain, global stylesheet.
    Global,
    /// CSS Modules with the template used to name local identifiers.
    Local { ident_name: String },
}

impl CssModules {
    /// CSS Modules using the identifier template for the mode:
    /// short hashes in production, readable names in development.
    pub fn local(env: &Environment) -> Self {
        let ident_name = if env.is_prod() {
            "[hash:base64:5]"
        } else {
            "[path][name]__[local]"
        };
        CssModules::Local {
            ident_name: ident_name.to_string(),
        }
    }

    /// Determine if CSS Modules are enabled.
    pub fn is_local(&self) -> bool {
        matches!(self, CssModules::Local { .. })
    }
}

/// Builds stylesheet chains for an environment.
pub struct StyleChainBuilder<'a> {
    env: &'a Environment,
}

impl<'a> StyleChainBuilder<'a> {
    /// Create a builder.
    pub fn new(env: &'a Environment) -> Self {
        Self { env }
    }

    /// Development caches pre-transform results.
    pub fn wants_cache(&self) -> bool {
        self.env.is_dev()
    }

    /// Development injects `<style>` tags for hot editing.
    pub fn wants_inject(&self) -> bool {
        self.env.is_dev()
    }

    /// Production extracts styles into an emitted file.
    pub fn wants_extract(&self) -> bool {
        self.env.is_prod()
    }

    /// Build the chain for a stylesheet.
    pub fn build(
        &self,
        modules: CssModules,
        preprocessor: Option<Preprocessor>,
    ) -> Chain {
        let source_map = self.env.source_maps();
        let mut chain = Chain::new();

        if self.wants_cache() {
            chain.push(Step::Cache(CacheOptions {
                cache_directory: cache_directory(
                    self.env.package_dir(),
                    self.env.mode(),
                    CachePurpose::PreTransform,
                ),
            }));
        }
        if self.wants_inject() {
            chain.push(Step::StyleInject);
        }
        if self.wants_extract() {
            chain.push(Step::StyleExtract);
        }

        // Post-processing always follows, plus the preprocessor if any.
        let import_loaders = 1 + preprocessor.iter().count();
        let (modules, local_ident_name) = match modules {
            CssModules::Global => (false, None),
            CssModules::Local { ident_name } => (true, Some(ident_name)),
        };
        chain.push(Step::Css(CssOptions {
            import_loaders,
            source_map,
            modules,
            local_ident_name,
        }));
        chain.push(Step::PostCss(PostCssOptions::new(source_map)));

        if let Some(preprocessor) = preprocessor {
            chain.push(Step::Preprocess(PreprocessOptions {
                preprocessor,
                source_map,
            }));
        }

        chain
    }
}
