//! Configuration resolver
//!
//! Turns a `Configuration` and a `FileListing` into the ordered work list:
//!
//! 1. `resolve_paths`: include patterns build the candidate set, skip
//!    patterns remove from it, Finder filters apply last. Sorted by path
//!    component.
//! 2. `resolve_rules`: sets expand in declaration order, first occurrence of
//!    a rule wins, unconditional skips remove, configure overrides attach
//!    options.
//! 3. `build_work_items`: file-major, rule-minor pairs filtered by the
//!    applicability predicate and path-scoped rule skips.
//!
//! Every step is a pure function of its inputs; running it twice yields the
//! same output in the same order.

use glob::Pattern;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::applicability::Applicability;
use crate::catalog::Catalog;
use crate::error::ConfigurationError;
use crate::listing::FileListing;
use crate::logging;
use crate::model::{Configuration, OverrideAction, RuleId, RuleOptions, Tool, WorkItem};
use crate::pattern::{compile_name_patterns, file_name_matches, PathPattern};

const VCS_DIRECTORIES: [&str; 3] = [".git", ".svn", ".hg"];

/// Non-fatal findings surfaced to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// An include pattern matched no file
    EmptyInclude { pattern: String },
    /// The applicability predicate failed; the pair was skipped
    ApplicabilityFailed {
        file: PathBuf,
        rule: RuleId,
        reason: String,
    },
    /// A risky rule was dropped because risky rules are not allowed
    RiskyRuleDropped { rule: RuleId },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::EmptyInclude { pattern } => {
                write!(f, "Include path matched no files: {}", pattern)
            }
            Diagnostic::ApplicabilityFailed { file, rule, reason } => write!(
                f,
                "Skipped {} for {}: {}",
                rule,
                file.display(),
                reason
            ),
            Diagnostic::RiskyRuleDropped { rule } => {
                write!(f, "Risky rule {} dropped (risky rules not allowed)", rule)
            }
        }
    }
}

/// Result of path resolution
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PathResolution {
    pub files: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

/// A selected rule with its effective options
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedRule {
    pub id: RuleId,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub options: RuleOptions,
    /// Paths this rule must not touch
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skip_paths: Vec<String>,
    #[serde(skip)]
    skip_patterns: Vec<PathPattern>,
}

impl ResolvedRule {
    pub fn new(id: impl Into<RuleId>) -> Self {
        Self {
            id: id.into(),
            options: RuleOptions::new(),
            skip_paths: Vec::new(),
            skip_patterns: Vec::new(),
        }
    }

    /// Whether a path-scoped skip excludes this file
    pub fn is_skipped_for(&self, file: &Path) -> bool {
        self.skip_patterns.iter().any(|p| p.matches(file))
    }
}

impl PartialEq for ResolvedRule {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.options == other.options && self.skip_paths == other.skip_paths
    }
}

/// Result of rule resolution
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RuleResolution {
    pub rules: Vec<ResolvedRule>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of work item construction
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkItemBuild {
    pub items: Vec<WorkItem>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Everything a processing engine needs for one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub tool: Tool,
    pub files: Vec<PathBuf>,
    pub rules: Vec<ResolvedRule>,
    pub items: Vec<WorkItem>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Plan {
    /// Effective options of a rule in this plan
    pub fn options_for(&self, rule: &RuleId) -> Option<&RuleOptions> {
        self.rules.iter().find(|r| &r.id == rule).map(|r| &r.options)
    }
}

/// Compute the ordered set of files to process. Files come out in `Path`
/// order, which compares component by component: a directory's files stay
/// together ahead of siblings such as `a-b/` or `a.b/`.
pub fn resolve_paths(
    config: &Configuration,
    listing: &FileListing,
) -> Result<PathResolution, ConfigurationError> {
    config.validate()?;

    let includes = compile_patterns(config.include_patterns())?;
    let skips = compile_patterns(config.skip_patterns())?;
    let filters = FinderFilters::compile(config)?;

    // Each include pattern is matched independently; declaration order is
    // restored when merging, so parallelism never changes the result.
    let matched: Vec<Vec<&PathBuf>> = includes
        .par_iter()
        .map(|pattern| match_include(pattern, listing))
        .collect();

    let mut candidates: BTreeMap<&PathBuf, &Path> = BTreeMap::new();
    let mut diagnostics = Vec::new();

    for (pattern, files) in includes.iter().zip(matched) {
        if files.is_empty() {
            logging::log_include_empty(pattern.as_str());
            diagnostics.push(Diagnostic::EmptyInclude {
                pattern: pattern.as_str().to_string(),
            });
            continue;
        }
        for file in files {
            candidates.entry(file).or_insert(pattern.base());
        }
    }

    let mut files = Vec::with_capacity(candidates.len());
    for (file, root) in candidates {
        if let Some(skip) = skips.iter().find(|s| s.matches(file)) {
            logging::log_path_skipped(file, &format!("matched skip {}", skip.as_str()));
            continue;
        }
        if let Some(reason) = filters.rejects(file, root) {
            logging::log_path_skipped(file, reason);
            continue;
        }
        files.push(file.clone());
    }

    Ok(PathResolution { files, diagnostics })
}

/// Compute the ordered, deduplicated set of rules to apply
pub fn resolve_rules<C: Catalog + ?Sized>(
    config: &Configuration,
    catalog: &C,
) -> Result<RuleResolution, ConfigurationError> {
    config.validate()?;
    let tool = config.tool;

    let mut seen: HashSet<RuleId> = HashSet::new();
    let mut ordered: Vec<RuleId> = Vec::new();

    for set in &config.sets {
        for rule in catalog.expand_set(tool, &set.id)? {
            if seen.insert(rule.clone()) {
                ordered.push(rule);
            }
        }
    }

    for rule in &config.rules {
        if catalog.rule_info(tool, rule).is_none() {
            return Err(ConfigurationError::UnknownRule {
                tool,
                rule: rule.to_string(),
            });
        }
        if seen.insert(rule.clone()) {
            ordered.push(rule.clone());
        }
    }

    let mut skipped: HashSet<&RuleId> = HashSet::new();
    let mut path_skips: HashMap<&RuleId, Vec<String>> = HashMap::new();
    let mut configured: HashMap<&RuleId, RuleOptions> = HashMap::new();

    for rule_override in &config.overrides {
        if !seen.contains(&rule_override.rule) {
            logging::log_override_unused(rule_override.rule.as_str());
            continue;
        }
        if rule_override.is_unconditional_skip() {
            skipped.insert(&rule_override.rule);
            continue;
        }
        match &rule_override.action {
            OverrideAction::Skip { paths } => {
                path_skips
                    .entry(&rule_override.rule)
                    .or_default()
                    .extend(paths.iter().cloned());
            }
            OverrideAction::Configure { options } => {
                configured
                    .entry(&rule_override.rule)
                    .or_default()
                    .extend(options.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
    }

    let mut rules = Vec::with_capacity(ordered.len());
    let mut diagnostics = Vec::new();

    for id in ordered {
        if skipped.contains(&id) {
            logging::log_rule_skipped(id.as_str(), "skip override");
            continue;
        }

        let info = catalog.rule_info(tool, &id);
        if info.as_ref().is_some_and(|i| i.risky) && !config.options.risky_allowed {
            logging::log_rule_skipped(id.as_str(), "risky rules not allowed");
            diagnostics.push(Diagnostic::RiskyRuleDropped { rule: id });
            continue;
        }

        let mut options = info.map(|i| i.default_options).unwrap_or_default();
        if let Some(overrides) = configured.remove(&id) {
            options.extend(overrides);
        }

        let skip_paths = path_skips.remove(&id).unwrap_or_default();
        let skip_patterns = compile_patterns(skip_paths.iter().map(String::as_str))?;

        rules.push(ResolvedRule {
            id,
            options,
            skip_paths,
            skip_patterns,
        });
    }

    Ok(RuleResolution { rules, diagnostics })
}

/// Pair every resolved file with every resolved rule that applies to it
pub fn build_work_items<A: Applicability + ?Sized>(
    files: &[PathBuf],
    rules: &[ResolvedRule],
    predicate: &A,
) -> WorkItemBuild {
    let mut items = Vec::new();
    let mut diagnostics = Vec::new();

    for file in files {
        for rule in rules {
            if rule.is_skipped_for(file) {
                logging::log_path_skipped(file, &format!("rule skip for {}", rule.id));
                continue;
            }

            match predicate.applies(file, &rule.id) {
                Ok(true) => items.push(WorkItem::new(file.clone(), rule.id.clone())),
                Ok(false) => {}
                Err(e) => {
                    logging::log_applicability_error(file, rule.id.as_str(), &e.to_string());
                    diagnostics.push(Diagnostic::ApplicabilityFailed {
                        file: file.clone(),
                        rule: rule.id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    WorkItemBuild { items, diagnostics }
}

/// Runs the three resolution steps against one catalog
pub struct Resolver<'c, C: Catalog + ?Sized> {
    catalog: &'c C,
}

impl<'c, C: Catalog + ?Sized> Resolver<'c, C> {
    pub fn new(catalog: &'c C) -> Self {
        Self { catalog }
    }

    /// Resolve a configuration into a plan. Configuration errors are
    /// reported before any path or predicate work happens.
    pub fn resolve<A: Applicability + ?Sized>(
        &self,
        config: &Configuration,
        listing: &FileListing,
        predicate: &A,
    ) -> Result<Plan, ConfigurationError> {
        logging::subsection("RULE RESOLUTION");
        let rules = resolve_rules(config, self.catalog)?;

        logging::subsection("PATH RESOLUTION");
        let paths = resolve_paths(config, listing)?;

        logging::subsection("WORK ITEMS");
        let built = build_work_items(&paths.files, &rules.rules, predicate);

        let mut diagnostics = paths.diagnostics;
        diagnostics.extend(rules.diagnostics);
        diagnostics.extend(built.diagnostics);

        logging::log_resolution_summary(
            paths.files.len(),
            rules.rules.len(),
            built.items.len(),
            diagnostics.len(),
        );

        Ok(Plan {
            tool: config.tool,
            files: paths.files,
            rules: rules.rules,
            items: built.items,
            diagnostics,
        })
    }
}

fn compile_patterns<'a>(
    raw: impl Iterator<Item = &'a str>,
) -> Result<Vec<PathPattern>, ConfigurationError> {
    raw.map(PathPattern::parse).collect()
}

fn match_include<'l>(pattern: &PathPattern, listing: &'l FileListing) -> Vec<&'l PathBuf> {
    let base = pattern.base();
    if !pattern.is_glob() {
        return listing.under(base).collect();
    }
    if base.as_os_str().is_empty() {
        listing.iter().filter(|f| pattern.matches(f)).collect()
    } else {
        listing.under(base).filter(|f| pattern.matches(f)).collect()
    }
}

/// Finder-style filters from `ToolOptions`
struct FinderFilters {
    names: Vec<Pattern>,
    not_names: Vec<Pattern>,
    ignore_dot_files: bool,
    ignore_vcs: bool,
}

impl FinderFilters {
    fn compile(config: &Configuration) -> Result<Self, ConfigurationError> {
        Ok(Self {
            names: compile_name_patterns(&config.options.file_name_patterns)?,
            not_names: compile_name_patterns(&config.options.not_name_patterns)?,
            ignore_dot_files: config.options.ignore_dot_files,
            ignore_vcs: config.options.ignore_vcs,
        })
    }

    /// Reason the file is filtered out, if any. Dot-file and VCS checks only
    /// look at components below the include root.
    fn rejects(&self, file: &Path, root: &Path) -> Option<&'static str> {
        if !self.names.is_empty() && !file_name_matches(&self.names, file) {
            return Some("file name not selected");
        }
        if file_name_matches(&self.not_names, file) {
            return Some("file name excluded");
        }

        if !self.ignore_dot_files && !self.ignore_vcs {
            return None;
        }

        let relative = file.strip_prefix(root).unwrap_or(file);
        for component in relative.components() {
            let Component::Normal(name) = component else {
                continue;
            };
            let name = name.to_string_lossy();
            if self.ignore_vcs && VCS_DIRECTORIES.contains(&name.as_ref()) {
                return Some("version control directory");
            }
            if self.ignore_dot_files && name.starts_with('.') {
                return Some("dot file");
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MemoryCatalog, RuleInfo};
    use crate::error::ApplicabilityError;
    use crate::model::{RuleOverride, ToolOptions};

    fn always(_: &Path, _: &RuleId) -> Result<bool, ApplicabilityError> {
        Ok(true)
    }

    fn paths(resolution: &PathResolution) -> Vec<&str> {
        resolution
            .files
            .iter()
            .map(|p| p.to_str().unwrap())
            .collect()
    }

    fn rule_ids(resolution: &RuleResolution) -> Vec<&str> {
        resolution.rules.iter().map(|r| r.id.as_str()).collect()
    }

    fn listing() -> FileListing {
        FileListing::from_paths([
            "/ext/Classes/Controller/ListController.php",
            "/ext/Classes/Service/Mailer.php",
            "/ext/Configuration/TCA/tx_ext_item.php",
            "/ext/Configuration/Services.yaml",
            "/ext/Tests/Unit/MailerTest.php",
            "/ext/ext_emconf.php",
            "/ext/vendor/autoload.php",
        ])
    }

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::new()
            .with_set(Tool::Rector, "first", ["A", "B", "C"])
            .with_set(Tool::Rector, "second", ["B", "D"])
            .with_rule(Tool::Rector, RuleInfo::new("A", "a"))
            .with_rule(Tool::Rector, RuleInfo::new("B", "b"))
            .with_rule(Tool::Rector, RuleInfo::new("C", "c"))
            .with_rule(Tool::Rector, RuleInfo::new("D", "d").with_default("mode", "strict"))
            .with_rule(Tool::Rector, RuleInfo::new("E", "e"))
            .with_rule(Tool::Rector, RuleInfo::new("R", "risky").risky())
    }

    #[test]
    fn test_include_directories_sorted() {
        let config = Configuration::new(Tool::Rector).include(["/ext/Tests", "/ext/Classes"]);
        let resolved = resolve_paths(&config, &listing()).unwrap();
        assert_eq!(
            paths(&resolved),
            vec![
                "/ext/Classes/Controller/ListController.php",
                "/ext/Classes/Service/Mailer.php",
                "/ext/Tests/Unit/MailerTest.php",
            ]
        );
        assert!(resolved.diagnostics.is_empty());
    }

    #[test]
    fn test_files_order_by_path_component() {
        let listing = FileListing::from_paths(["/ext/a.b/y.php", "/ext/a-b/x.php", "/ext/a/x.php"]);
        let config = Configuration::new(Tool::Rector).include(["/ext"]);
        let resolved = resolve_paths(&config, &listing).unwrap();
        assert_eq!(paths(&resolved), vec!["/ext/a/x.php", "/ext/a-b/x.php", "/ext/a.b/y.php"]);
    }

    #[test]
    fn test_overlapping_includes_deduplicated() {
        let config = Configuration::new(Tool::Rector)
            .include(["/ext/Classes"])
            .include(["/ext/Classes/Service", "/ext/Classes/Service/Mailer.php"]);
        let resolved = resolve_paths(&config, &listing()).unwrap();
        assert_eq!(
            paths(&resolved),
            vec![
                "/ext/Classes/Controller/ListController.php",
                "/ext/Classes/Service/Mailer.php",
            ]
        );
    }

    #[test]
    fn test_skip_wins_regardless_of_order() {
        let skip_first = Configuration::new(Tool::Rector)
            .skip(["/ext/vendor", "/ext/ext_emconf.php"])
            .include(["/ext"]);
        let skip_last = Configuration::new(Tool::Rector)
            .include(["/ext"])
            .skip(["/ext/vendor", "/ext/ext_emconf.php"]);

        let a = resolve_paths(&skip_first, &listing()).unwrap();
        let b = resolve_paths(&skip_last, &listing()).unwrap();
        assert_eq!(a, b);
        assert!(!a.files.iter().any(|f| f.starts_with("/ext/vendor")));
        assert!(!a.files.contains(&PathBuf::from("/ext/ext_emconf.php")));
        assert_eq!(a.files.len(), 5);
    }

    #[test]
    fn test_skip_outside_includes_is_noop() {
        let config = Configuration::new(Tool::Rector)
            .include(["/ext/Classes"])
            .skip(["/elsewhere"]);
        let resolved = resolve_paths(&config, &listing()).unwrap();
        assert_eq!(resolved.files.len(), 2);
        assert!(resolved.diagnostics.is_empty());
    }

    #[test]
    fn test_glob_include_and_skip() {
        let config = Configuration::new(Tool::Rector)
            .include(["/ext/**/*.php"])
            .skip(["*Test.php", "/ext/vendor"]);
        let resolved = resolve_paths(&config, &listing()).unwrap();
        assert_eq!(
            paths(&resolved),
            vec![
                "/ext/Classes/Controller/ListController.php",
                "/ext/Classes/Service/Mailer.php",
                "/ext/Configuration/TCA/tx_ext_item.php",
                "/ext/ext_emconf.php",
            ]
        );
    }

    #[test]
    fn test_empty_include_warns_and_continues() {
        let config = Configuration::new(Tool::Rector).include(["/ext/Missing", "/ext/Classes"]);
        let resolved = resolve_paths(&config, &listing()).unwrap();
        assert_eq!(resolved.files.len(), 2);
        assert_eq!(
            resolved.diagnostics,
            vec![Diagnostic::EmptyInclude {
                pattern: "/ext/Missing".to_string()
            }]
        );
    }

    #[test]
    fn test_invalid_skip_glob_is_fatal() {
        let config = Configuration::new(Tool::Rector)
            .include(["/ext"])
            .skip(["/ext/[oops"]);
        assert!(matches!(
            resolve_paths(&config, &listing()),
            Err(ConfigurationError::InvalidGlob { .. })
        ));
    }

    #[test]
    fn test_finder_filters() {
        let listing = FileListing::from_paths([
            "/ext/.git/hooks/pre-commit.php",
            "/ext/.Build/bin/tool.php",
            "/ext/Classes/Foo.php",
            "/ext/Classes/Foo.generated.php",
            "/ext/README.md",
        ]);
        let config = Configuration::new(Tool::Fixer)
            .include(["/ext"])
            .with_options(ToolOptions {
                file_name_patterns: vec!["*.php".to_string()],
                not_name_patterns: vec!["*.generated.php".to_string()],
                ignore_dot_files: true,
                ignore_vcs: true,
                ..Default::default()
            });

        let resolved = resolve_paths(&config, &listing).unwrap();
        assert_eq!(paths(&resolved), vec!["/ext/Classes/Foo.php"]);
    }

    #[test]
    fn test_dot_files_only_checked_below_root() {
        let listing = FileListing::from_paths(["/home/.projects/ext/Classes/Foo.php"]);
        let config = Configuration::new(Tool::Fixer)
            .include(["/home/.projects/ext"])
            .with_options(ToolOptions {
                ignore_dot_files: true,
                ..Default::default()
            });
        let resolved = resolve_paths(&config, &listing).unwrap();
        assert_eq!(resolved.files.len(), 1);
    }

    #[test]
    fn test_resolve_paths_is_idempotent() {
        let config = Configuration::new(Tool::Rector)
            .include(["/ext/Tests", "/ext/**/*.php", "/ext/Classes"])
            .skip(["/ext/vendor"]);
        let listing = listing();
        let first = resolve_paths(&config, &listing).unwrap();
        let second = resolve_paths(&config, &listing).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rules_dedup_first_occurrence() {
        let config = Configuration::new(Tool::Rector).set("second").set("first");
        let resolved = resolve_rules(&config, &catalog()).unwrap();
        assert_eq!(rule_ids(&resolved), vec!["B", "D", "A", "C"]);
    }

    #[test]
    fn test_rules_skip_override() {
        let config = Configuration::new(Tool::Rector)
            .set("first")
            .set("second")
            .with_override(RuleOverride::skip("C"));
        let resolved = resolve_rules(&config, &catalog()).unwrap();
        assert_eq!(rule_ids(&resolved), vec!["A", "B", "D"]);
    }

    #[test]
    fn test_override_for_absent_rule_is_noop() {
        let base = Configuration::new(Tool::Rector).set("first");
        let with_override = base
            .clone()
            .with_override(RuleOverride::skip("Z"))
            .with_override(RuleOverride::configure("Y", RuleOptions::new()));

        let expected = resolve_rules(&base, &catalog()).unwrap();
        let actual = resolve_rules(&with_override, &catalog()).unwrap();
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_configure_merges_over_defaults() {
        let mut first = RuleOptions::new();
        first.insert("mode".to_string(), "loose".into());
        first.insert("level".to_string(), "1".into());
        let mut second = RuleOptions::new();
        second.insert("level".to_string(), "2".into());

        let config = Configuration::new(Tool::Rector)
            .set("second")
            .with_override(RuleOverride::configure("D", first))
            .with_override(RuleOverride::configure("D", second));
        let resolved = resolve_rules(&config, &catalog()).unwrap();

        let d = resolved.rules.iter().find(|r| r.id.as_str() == "D").unwrap();
        assert_eq!(d.options.get("mode"), Some(&"loose".into()));
        assert_eq!(d.options.get("level"), Some(&"2".into()));
    }

    #[test]
    fn test_skip_wins_over_configure() {
        let config = Configuration::new(Tool::Rector)
            .set("first")
            .with_override(RuleOverride::configure("A", RuleOptions::new()))
            .with_override(RuleOverride::skip("A"));
        let resolved = resolve_rules(&config, &catalog()).unwrap();
        assert_eq!(rule_ids(&resolved), vec!["B", "C"]);
    }

    #[test]
    fn test_explicit_rules_appended_after_sets() {
        let config = Configuration::new(Tool::Rector)
            .rule("E")
            .rule("A")
            .set("first");
        let resolved = resolve_rules(&config, &catalog()).unwrap();
        assert_eq!(rule_ids(&resolved), vec!["A", "B", "C", "E"]);
    }

    #[test]
    fn test_unknown_explicit_rule_is_fatal() {
        let config = Configuration::new(Tool::Rector).rule("Nope");
        assert!(matches!(
            resolve_rules(&config, &catalog()),
            Err(ConfigurationError::UnknownRule { .. })
        ));
    }

    #[test]
    fn test_unknown_set_is_fatal() {
        let config = Configuration::new(Tool::Rector).set("missing");
        assert!(matches!(
            resolve_rules(&config, &catalog()),
            Err(ConfigurationError::Catalog(_))
        ));
    }

    #[test]
    fn test_risky_rules_need_permission() {
        let config = Configuration::new(Tool::Rector).rule("R").rule("A");
        let resolved = resolve_rules(&config, &catalog()).unwrap();
        assert_eq!(rule_ids(&resolved), vec!["A"]);
        assert_eq!(
            resolved.diagnostics,
            vec![Diagnostic::RiskyRuleDropped { rule: "R".into() }]
        );

        let allowed = config.with_options(ToolOptions {
            risky_allowed: true,
            ..Default::default()
        });
        let resolved = resolve_rules(&allowed, &catalog()).unwrap();
        assert_eq!(rule_ids(&resolved), vec!["R", "A"]);
    }

    #[test]
    fn test_work_items_file_major() {
        let files = vec![PathBuf::from("/a.php"), PathBuf::from("/b.php")];
        let rules = vec![ResolvedRule::new("X"), ResolvedRule::new("Y")];
        let built = build_work_items(&files, &rules, &always);
        assert_eq!(
            built.items,
            vec![
                WorkItem::new("/a.php", "X"),
                WorkItem::new("/a.php", "Y"),
                WorkItem::new("/b.php", "X"),
                WorkItem::new("/b.php", "Y"),
            ]
        );
    }

    #[test]
    fn test_work_items_respect_predicate() {
        let files = vec![PathBuf::from("/a.php"), PathBuf::from("/b.yaml")];
        let rules = vec![ResolvedRule::new("php_only")];
        let predicate = |file: &Path, _: &RuleId| -> Result<bool, ApplicabilityError> {
            Ok(file.extension().is_some_and(|e| e == "php"))
        };
        let built = build_work_items(&files, &rules, &predicate);
        assert_eq!(built.items, vec![WorkItem::new("/a.php", "php_only")]);
    }

    #[test]
    fn test_applicability_errors_are_isolated() {
        let files = vec![PathBuf::from("/bad.xml"), PathBuf::from("/good.xml")];
        let rules = vec![ResolvedRule::new("X")];
        let predicate = |file: &Path, _: &RuleId| -> Result<bool, ApplicabilityError> {
            if file.ends_with("bad.xml") {
                Err(ApplicabilityError::Other("unreadable".to_string()))
            } else {
                Ok(true)
            }
        };

        let built = build_work_items(&files, &rules, &predicate);
        assert_eq!(built.items, vec![WorkItem::new("/good.xml", "X")]);
        assert_eq!(built.diagnostics.len(), 1);
        assert!(matches!(
            &built.diagnostics[0],
            Diagnostic::ApplicabilityFailed { file, .. } if file == Path::new("/bad.xml")
        ));
    }

    #[test]
    fn test_path_scoped_rule_skip() {
        let config = Configuration::new(Tool::Rector)
            .include(["/ext/Classes", "/ext/Tests"])
            .set("second")
            .with_override(RuleOverride::skip_paths("D", ["/ext/Tests"]));

        let catalog = catalog();
        let plan = Resolver::new(&catalog)
            .resolve(&config, &listing(), &always)
            .unwrap();

        assert!(plan
            .items
            .contains(&WorkItem::new("/ext/Tests/Unit/MailerTest.php", "B")));
        assert!(!plan
            .items
            .contains(&WorkItem::new("/ext/Tests/Unit/MailerTest.php", "D")));
        assert!(plan
            .items
            .contains(&WorkItem::new("/ext/Classes/Service/Mailer.php", "D")));
    }

    #[test]
    fn test_resolve_reports_config_errors_first() {
        let config = Configuration::new(Tool::Rector)
            .include(["/ext/Missing"])
            .set("missing");
        let catalog = catalog();
        let err = Resolver::new(&catalog)
            .resolve(&config, &listing(), &always)
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::Catalog(_)));
    }

    #[test]
    fn test_plan_options_for() {
        let config = Configuration::new(Tool::Rector)
            .include(["/ext/Classes"])
            .set("second");
        let catalog = catalog();
        let plan = Resolver::new(&catalog)
            .resolve(&config, &listing(), &always)
            .unwrap();

        assert_eq!(
            plan.options_for(&"D".into()).and_then(|o| o.get("mode")),
            Some(&"strict".into())
        );
        assert!(plan.options_for(&"A".into()).is_none());
    }

    #[test]
    fn test_diagnostics_serialize_with_kind_tag() {
        let diagnostic = Diagnostic::RiskyRuleDropped {
            rule: "declare_strict_types".into(),
        };
        let json = serde_json::to_string(&diagnostic).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"risky_rule_dropped","rule":"declare_strict_types"}"#
        );
    }
}
