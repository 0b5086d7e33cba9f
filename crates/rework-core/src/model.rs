//! Typed configuration model

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::error::ConfigurationError;

/// The external tool a configuration targets. Rule-set identifiers are
/// looked up in this tool's namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// PHP version and framework upgrades
    Rector,
    /// TypoScript, FlexForm, YAML, Fluid and .htaccess migrations
    Fractor,
    /// Coding-style fixer
    Fixer,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::Rector, Tool::Fractor, Tool::Fixer];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rector" => Some(Tool::Rector),
            "fractor" => Some(Tool::Fractor),
            "fixer" | "php-cs-fixer" | "php_cs_fixer" => Some(Tool::Fixer),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Rector => "rector",
            Tool::Fractor => "fractor",
            Tool::Fixer => "fixer",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single addressable transformation rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(String);

impl RuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RuleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RuleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for RuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Name of a rule bundle in the catalog (e.g. `LevelSetList::UP_TO_PHP_82`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSetReference {
    pub id: String,
}

impl RuleSetReference {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl fmt::Display for RuleSetReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathRuleKind {
    Include,
    Skip,
}

impl PathRuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathRuleKind::Include => "include",
            PathRuleKind::Skip => "skip",
        }
    }
}

/// An ordered group of path patterns tagged include or skip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRule {
    pub kind: PathRuleKind,
    pub patterns: Vec<String>,
}

impl PathRule {
    pub fn include<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: PathRuleKind::Include,
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn skip<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: PathRuleKind::Skip,
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }
}

/// Value of a rule option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    String(String),
    List(Vec<OptionValue>),
    Map(BTreeMap<String, OptionValue>),
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::String(s.to_string())
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

/// Options attached to a rule, keyed by option name
pub type RuleOptions = BTreeMap<String, OptionValue>;

/// What an override does to its rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum OverrideAction {
    /// Drop the rule. With paths, only drop it for files under those paths.
    Skip {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        paths: Vec<String>,
    },
    /// Keep the rule and attach options to it
    Configure { options: RuleOptions },
}

impl OverrideAction {
    /// Build an action from its loosely-typed parts, as read from a
    /// configuration file
    pub fn from_parts(
        rule: &str,
        action: &str,
        options: Option<RuleOptions>,
        paths: Vec<String>,
    ) -> Result<Self, ConfigurationError> {
        match action.to_lowercase().as_str() {
            "skip" => {
                if options.is_some_and(|o| !o.is_empty()) {
                    return Err(ConfigurationError::ConflictingOverride {
                        rule: rule.to_string(),
                        reason: "a skip override cannot carry options".to_string(),
                    });
                }
                Ok(OverrideAction::Skip { paths })
            }
            "configure" => {
                if !paths.is_empty() {
                    return Err(ConfigurationError::ConflictingOverride {
                        rule: rule.to_string(),
                        reason: "a configure override cannot be scoped to paths".to_string(),
                    });
                }
                Ok(OverrideAction::Configure {
                    options: options.unwrap_or_default(),
                })
            }
            _ => Err(ConfigurationError::UnknownAction {
                rule: rule.to_string(),
                action: action.to_string(),
            }),
        }
    }
}

/// A rule-specific override
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOverride {
    pub rule: RuleId,
    #[serde(flatten)]
    pub action: OverrideAction,
}

impl RuleOverride {
    pub fn skip(rule: impl Into<RuleId>) -> Self {
        Self {
            rule: rule.into(),
            action: OverrideAction::Skip { paths: Vec::new() },
        }
    }

    pub fn skip_paths<I, S>(rule: impl Into<RuleId>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rule: rule.into(),
            action: OverrideAction::Skip {
                paths: paths.into_iter().map(Into::into).collect(),
            },
        }
    }

    pub fn configure(rule: impl Into<RuleId>, options: RuleOptions) -> Self {
        Self {
            rule: rule.into(),
            action: OverrideAction::Configure { options },
        }
    }

    /// True for a skip that applies to every file
    pub fn is_unconditional_skip(&self) -> bool {
        matches!(&self.action, OverrideAction::Skip { paths } if paths.is_empty())
    }
}

/// Tool toggles and Finder-style file filters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolOptions {
    /// Import fully qualified names (`importNames()`)
    pub import_names: bool,
    /// Remove unused imports (`removeUnusedImports()`)
    pub remove_unused_imports: bool,
    /// Allow rules flagged as risky
    pub risky_allowed: bool,
    /// PHPStan configuration handed to the engine
    pub phpstan_config: Option<PathBuf>,
    /// Keep only files whose name matches one of these globs (`->name()`)
    pub file_name_patterns: Vec<String>,
    /// Drop files whose name matches one of these globs (`->notName()`)
    pub not_name_patterns: Vec<String>,
    /// Drop files with a dot-prefixed path component below the include root
    pub ignore_dot_files: bool,
    /// Drop files inside version control directories
    pub ignore_vcs: bool,
}

/// A complete tool configuration. Built once per invocation and never
/// mutated while a resolution is running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub tool: Tool,
    pub paths: Vec<PathRule>,
    pub sets: Vec<RuleSetReference>,
    /// Individually selected rules, expanded after all sets
    pub rules: Vec<RuleId>,
    pub overrides: Vec<RuleOverride>,
    pub options: ToolOptions,
}

impl Configuration {
    pub fn new(tool: Tool) -> Self {
        Self {
            tool,
            paths: Vec::new(),
            sets: Vec::new(),
            rules: Vec::new(),
            overrides: Vec::new(),
            options: ToolOptions::default(),
        }
    }

    pub fn include<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths.push(PathRule::include(patterns));
        self
    }

    pub fn skip<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths.push(PathRule::skip(patterns));
        self
    }

    pub fn set(mut self, id: impl Into<String>) -> Self {
        self.sets.push(RuleSetReference::new(id));
        self
    }

    pub fn rule(mut self, id: impl Into<RuleId>) -> Self {
        self.rules.push(id.into());
        self
    }

    pub fn with_override(mut self, rule_override: RuleOverride) -> Self {
        self.overrides.push(rule_override);
        self
    }

    pub fn with_options(mut self, options: ToolOptions) -> Self {
        self.options = options;
        self
    }

    /// Include patterns in declaration order
    pub fn include_patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns_of(PathRuleKind::Include)
    }

    /// Skip patterns in declaration order
    pub fn skip_patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns_of(PathRuleKind::Skip)
    }

    fn patterns_of(&self, kind: PathRuleKind) -> impl Iterator<Item = &str> {
        self.paths
            .iter()
            .filter(move |rule| rule.kind == kind)
            .flat_map(|rule| rule.patterns.iter().map(String::as_str))
    }

    /// Structural checks that need no catalog or filesystem
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for rule in &self.paths {
            if rule.patterns.iter().any(|p| p.trim().is_empty()) {
                return Err(ConfigurationError::EmptyPattern {
                    kind: rule.kind.as_str(),
                });
            }
        }

        if self.sets.iter().any(|s| s.id.trim().is_empty()) {
            return Err(ConfigurationError::EmptySetId);
        }

        let override_rules = self.overrides.iter().map(|o| &o.rule);
        if self
            .rules
            .iter()
            .chain(override_rules)
            .any(|r| r.as_str().trim().is_empty())
        {
            return Err(ConfigurationError::EmptyRuleId);
        }

        for rule_override in &self.overrides {
            if let OverrideAction::Skip { paths } = &rule_override.action {
                if paths.iter().any(|p| p.trim().is_empty()) {
                    return Err(ConfigurationError::EmptyPattern { kind: "rule skip" });
                }
            }
        }

        Ok(())
    }
}

/// One scheduled transformation: apply `rule` to `file`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct WorkItem {
    pub file: PathBuf,
    pub rule: RuleId,
}

impl WorkItem {
    pub fn new(file: impl Into<PathBuf>, rule: impl Into<RuleId>) -> Self {
        Self {
            file: file.into(),
            rule: rule.into(),
        }
    }
}
