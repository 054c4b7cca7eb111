//! First match wins dispatch from file paths to step chains.
//!
//! Rules are scanned in declaration order and the scan stops at the
//! first rule that accepts a path. The table ends with a catch-all
//! that accepts any path not excluded by its fixed negative set, so
//! a scan only falls off the end for scripts, markup and data which
//! the bundler engine handles itself.
use std::fmt;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::{
    asset::AssetOutput,
    loader::{Chain, Step},
    utils::normalize,
};

pub mod builder;

pub use builder::RuleTableBuilder;

/// Regular expression matched against the full path.
#[derive(Clone, Debug)]
pub struct Pattern(Regex);

impl Pattern {
    /// Compile a pattern.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self(Regex::new(pattern)?))
    }

    /// Test a path.
    pub fn is_match(&self, path: &Path) -> bool {
        self.is_match_str(&path.to_string_lossy())
    }

    /// Test a request path or any other text.
    pub fn is_match_str(&self, text: &str) -> bool {
        self.0.is_match(text)
    }

    /// The source of the pattern.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Pattern {}

impl Serialize for Pattern {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Scope condition for a rule.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
#[serde(untagged)]
pub enum Condition {
    /// Path lies inside the directory.
    Directory(PathBuf),
    /// Path matches the pattern.
    Pattern(Pattern),
}

impl Condition {
    /// Test a path.
    pub fn is_match(&self, path: &Path) -> bool {
        match self {
            Condition::Directory(dir) => path.starts_with(dir),
            Condition::Pattern(pattern) => pattern.is_match(path),
        }
    }
}

/// Identifies each rule of the table.
#[derive(Serialize, Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    MediaInline,
    ApplicationScript,
    DependencyScript,
    Style,
    StyleModule,
    PreprocessedStyle,
    PreprocessedStyleModule,
    CatchAll,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleKind::MediaInline => "media-inline",
            RuleKind::ApplicationScript => "application-script",
            RuleKind::DependencyScript => "dependency-script",
            RuleKind::Style => "style",
            RuleKind::StyleModule => "style-module",
            RuleKind::PreprocessedStyle => "preprocessed-style",
            RuleKind::PreprocessedStyleModule => "preprocessed-style-module",
            RuleKind::CatchAll => "catch-all",
        };
        f.write_str(name)
    }
}

/// Matchers, scope and chain for one class of files.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub kind: RuleKind,
    /// A path must match one of these; empty accepts everything.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub test: Vec<Pattern>,
    /// When not empty a path must satisfy one of these.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<Condition>,
    /// A path satisfying any of these is rejected.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<Condition>,
    /// Imports matched by this rule are never tree-shaken.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub side_effects: bool,
    #[serde(rename = "use")]
    pub chain: Chain,
}

impl Rule {
    /// Determine if this rule accepts a path.
    pub fn accepts(&self, path: &Path) -> bool {
        let tested =
            self.test.is_empty() || self.test.iter().any(|p| p.is_match(path));
        let included = self.include.is_empty()
            || self.include.iter().any(|c| c.is_match(path));
        let excluded = self.exclude.iter().any(|c| c.is_match(path));
        tested && included && !excluded
    }

    /// Determine if this is the terminal catch-all rule.
    pub fn is_catch_all(&self) -> bool {
        self.kind == RuleKind::CatchAll
    }

    /// Tool ids of the chain in declaration order.
    pub fn tool_ids(&self) -> Vec<&'static str> {
        self.chain.iter().map(Step::tool_id).collect()
    }

    /// Decide how a file accepted by this rule is output,
    /// or `None` when the chain neither inlines nor emits it as is.
    pub fn output(&self, file: &Path, contents: &[u8]) -> Option<AssetOutput> {
        self.chain.iter().find_map(|step| match step {
            Step::Url(options) => Some(options.dispose(file, contents)),
            Step::File(options) => Some(AssetOutput::Emit {
                path: options.emit_path(file, contents),
            }),
            _ => None,
        })
    }
}

/// Ordered rules terminated by the catch-all.
#[derive(Serialize, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RuleTable {
    pub strict_export_presence: bool,
    pub require_ensure: bool,
    #[serde(rename = "oneOf")]
    rules: Vec<Rule>,
}

impl RuleTable {
    pub(crate) fn new(rules: Vec<Rule>) -> Self {
        Self {
            strict_export_presence: true,
            require_ensure: false,
            rules,
        }
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Find a rule by kind.
    pub fn get(&self, kind: RuleKind) -> Option<&Rule> {
        self.rules.iter().find(|r| r.kind == kind)
    }

    /// The first rule that accepts the path.
    ///
    /// The path is normalized first so `..` cannot step out of a
    /// directory condition.
    pub fn resolve<P: AsRef<Path>>(&self, path: P) -> Option<&Rule> {
        let path = normalize(path.as_ref());
        self.rules.iter().find(|r| r.accepts(&path))
    }

    /// Every rule that accepts the path, ignoring first match semantics.
    pub fn matching<'a, P: AsRef<Path> + 'a>(
        &'a self,
        path: P,
    ) -> impl Iterator<Item = &'a Rule> + 'a {
        let path = normalize(path.as_ref());
        self.rules.iter().filter(move |r| r.accepts(&path))
    }
}
