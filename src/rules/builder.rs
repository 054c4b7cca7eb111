//! Build the rule table for an environment.
use crate::{
    asset::{NameTemplate, MEDIA_NAME},
    cache::{cache_directory, CachePurpose},
    environment::Environment,
    error::ConfigError,
    loader::{
        CacheOptions, Chain, CssModules, FileOptions, Preprocessor,
        StyleChainBuilder, Step, SyntaxPreset, TranspileOptions, UrlOptions,
        INLINE_LIMIT,
    },
};

use super::{Condition, Pattern, Rule, RuleKind, RuleTable};

const MEDIA: &[&str] = &[r"\.bmp$", r"\.gif$", r"\.jpe?g$", r"\.png$"];
const SCRIPT: &str = r"\.(js|mjs|jsx|ts|tsx)$";
const PLAIN_SCRIPT: &str = r"\.(js|mjs)$";
const RUNTIME_HELPERS: &str = r"@babel(?:/|\\{1,2})runtime";
const CSS: &str = r"\.css$";
const CSS_MODULE: &str = r"\.module\.css$";
const SASS: &str = r"\.(scss|sass)$";
const SASS_MODULE: &str = r"\.module\.(scss|sass)$";
const HTML: &str = r"\.html$";
const JSON: &str = r"\.json$";

/// Assembles the ordered rules.
///
/// Any rule added to the table must come before the catch-all.
pub struct RuleTableBuilder<'a> {
    env: &'a Environment,
    styles: StyleChainBuilder<'a>,
}

impl<'a> RuleTableBuilder<'a> {
    /// Create a builder.
    pub fn new(env: &'a Environment) -> Self {
        Self {
            env,
            styles: StyleChainBuilder::new(env),
        }
    }

    /// Build the table.
    pub fn build(&self) -> Result<RuleTable, ConfigError> {
        let rules = vec![
            self.media_inline()?,
            self.application_script()?,
            self.dependency_script()?,
            self.style(false, None)?,
            self.style(true, None)?,
            self.style(false, Some(Preprocessor::Sass))?,
            self.style(true, Some(Preprocessor::Sass))?,
            self.catch_all()?,
        ];
        log::debug!("Built {} rules for {}", rules.len(), self.env.mode());
        Ok(RuleTable::new(rules))
    }

    fn media_inline(&self) -> Result<Rule, ConfigError> {
        Ok(Rule {
            kind: RuleKind::MediaInline,
            test: patterns(MEDIA)?,
            include: vec![],
            exclude: vec![],
            side_effects: false,
            chain: vec![Step::Url(UrlOptions {
                limit: INLINE_LIMIT,
                name: NameTemplate::new(MEDIA_NAME),
            })],
        })
    }

    fn application_script(&self) -> Result<Rule, ConfigError> {
        Ok(Rule {
            kind: RuleKind::ApplicationScript,
            test: patterns(&[SCRIPT])?,
            include: vec![Condition::Directory(
                self.env.source_dir().to_path_buf(),
            )],
            exclude: vec![],
            side_effects: false,
            chain: self.script_chain(TranspileOptions {
                preset: SyntaxPreset::Application,
                cache_directory: self.cache(CachePurpose::Transpile),
                cache_compression: None,
                compact: self.env.is_prod(),
                source_maps: None,
            }),
        })
    }

    fn dependency_script(&self) -> Result<Rule, ConfigError> {
        Ok(Rule {
            kind: RuleKind::DependencyScript,
            test: patterns(&[PLAIN_SCRIPT])?,
            include: vec![],
            exclude: vec![
                Condition::Directory(self.env.source_dir().to_path_buf()),
                Condition::Pattern(Pattern::new(RUNTIME_HELPERS)?),
            ],
            side_effects: false,
            chain: self.script_chain(TranspileOptions {
                preset: SyntaxPreset::Standard,
                cache_directory: self.cache(CachePurpose::TranspileDependencies),
                cache_compression: Some(self.env.is_prod()),
                compact: self.env.is_prod(),
                source_maps: Some(false),
            }),
        })
    }

    fn style(
        &self,
        modular: bool,
        preprocessor: Option<Preprocessor>,
    ) -> Result<Rule, ConfigError> {
        let (kind, test, module_test) = match preprocessor {
            None => (RuleKind::Style, CSS, CSS_MODULE),
            Some(Preprocessor::Sass) => {
                (RuleKind::PreprocessedStyle, SASS, SASS_MODULE)
            }
        };

        let rule = if modular {
            let kind = match kind {
                RuleKind::Style => RuleKind::StyleModule,
                _ => RuleKind::PreprocessedStyleModule,
            };
            Rule {
                kind,
                test: patterns(&[module_test])?,
                include: vec![],
                exclude: vec![],
                side_effects: false,
                chain: self.styles.build(CssModules::local(self.env), preprocessor),
            }
        } else {
            // Global stylesheets are imported for their side effects only.
            Rule {
                kind,
                test: patterns(&[test])?,
                include: vec![],
                exclude: vec![Condition::Pattern(Pattern::new(module_test)?)],
                side_effects: true,
                chain: self.styles.build(CssModules::Global, preprocessor),
            }
        };
        Ok(rule)
    }

    fn catch_all(&self) -> Result<Rule, ConfigError> {
        let exclude = patterns(&[SCRIPT, HTML, JSON])?
            .into_iter()
            .map(Condition::Pattern)
            .collect();
        Ok(Rule {
            kind: RuleKind::CatchAll,
            test: vec![],
            include: vec![],
            exclude,
            side_effects: false,
            chain: vec![Step::File(FileOptions {
                name: NameTemplate::new(MEDIA_NAME),
            })],
        })
    }

    fn script_chain(&self, transpile: TranspileOptions) -> Chain {
        vec![
            Step::Cache(CacheOptions {
                cache_directory: self.cache(CachePurpose::PreTransform),
            }),
            Step::Transpile(transpile),
        ]
    }

    fn cache(&self, purpose: CachePurpose) -> std::path::PathBuf {
        cache_directory(self.env.package_dir(), self.env.mode(), purpose)
    }
}

fn patterns(sources: &[&str]) -> Result<Vec<Pattern>, ConfigError> {
    Ok(sources
        .iter()
        .map(|s| Pattern::new(s))
        .collect::<Result<Vec<_>, _>>()?)
}
