//! End-to-end resolution scenarios against a real directory tree

use rework_core::{
    resolve_paths, resolve_rules, run_work_items, Configuration, Diagnostic, Engine,
    EngineFailure, FileKind, FileListing, KindApplicability, MemoryCatalog, Outcome, Resolver,
    RuleInfo, RuleOptions, RuleOverride, RunMode, Tool, WorkItem,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn touch(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn p(root: &Path, relative: &str) -> String {
    root.join(relative).to_string_lossy().into_owned()
}

/// An extension tree shaped like a typical TYPO3 package
fn extension() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    touch(root, "Configuration/TCA/x.php", "<?php return [];");
    touch(root, "Configuration/Cache/y.php", "<?php return [];");
    touch(
        root,
        "Configuration/FlexForms/List.xml",
        "<T3DataStructure><sheets/></T3DataStructure>",
    );
    touch(root, "Configuration/phpunit.xml", "<phpunit/>");
    touch(root, "Resources/Private/z.fluid", "<f:render/>");
    touch(root, "Classes/Service/Mailer.php", "<?php class Mailer {}");
    touch(root, "vendor/autoload.php", "<?php");
    temp
}

#[test]
fn test_include_and_skip_directories() {
    let temp = extension();
    let root = temp.path();
    let listing = FileListing::scan(&[root]).unwrap();

    let config = Configuration::new(Tool::Fractor)
        .include([p(root, "Configuration"), p(root, "Resources")])
        .skip([p(root, "Configuration/Cache")]);

    let resolved = resolve_paths(&config, &listing).unwrap();
    assert_eq!(
        resolved.files,
        vec![
            root.join("Configuration/FlexForms/List.xml"),
            root.join("Configuration/TCA/x.php"),
            root.join("Configuration/phpunit.xml"),
            root.join("Resources/Private/z.fluid"),
        ]
    );
    assert!(resolved.diagnostics.is_empty());
}

#[test]
fn test_sets_deduplicate_and_skip() {
    let catalog = MemoryCatalog::new()
        .with_set(Tool::Rector, "S1", ["A", "B", "C"])
        .with_set(Tool::Rector, "S2", ["B", "D"]);

    let config = Configuration::new(Tool::Rector)
        .set("S1")
        .set("S2")
        .with_override(RuleOverride::skip("C"));

    let resolved = resolve_rules(&config, &catalog).unwrap();
    let ids: Vec<&str> = resolved.rules.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B", "D"]);
}

#[test]
fn test_missing_include_is_a_warning() {
    let temp = extension();
    let root = temp.path();
    let listing = FileListing::scan(&[root]).unwrap();

    let with_missing = Configuration::new(Tool::Rector)
        .include([p(root, "Tests"), p(root, "Classes")]);
    let without = Configuration::new(Tool::Rector).include([p(root, "Classes")]);

    let a = resolve_paths(&with_missing, &listing).unwrap();
    let b = resolve_paths(&without, &listing).unwrap();

    assert_eq!(a.files, b.files);
    assert_eq!(
        a.diagnostics,
        vec![Diagnostic::EmptyInclude {
            pattern: p(root, "Tests")
        }]
    );
}

#[test]
fn test_resolution_is_idempotent() {
    let temp = extension();
    let root = temp.path();
    let listing = FileListing::scan(&[root]).unwrap();
    let catalog = MemoryCatalog::new()
        .with_set(Tool::Rector, "S", ["A", "B"])
        .with_rule(Tool::Rector, RuleInfo::new("A", "a"))
        .with_rule(Tool::Rector, RuleInfo::new("B", "b"));

    let config = Configuration::new(Tool::Rector)
        .include([root.to_string_lossy().into_owned()])
        .skip([p(root, "vendor")])
        .set("S");

    let resolver = Resolver::new(&catalog);
    let predicate = KindApplicability::new(&catalog, Tool::Rector);
    let first = resolver.resolve(&config, &listing, &predicate).unwrap();
    let second = resolver.resolve(&config, &listing, &predicate).unwrap();
    assert_eq!(first, second);
    assert!(!first.files.iter().any(|f| f.starts_with(root.join("vendor"))));
}

#[test]
fn test_fractor_rules_follow_file_kind() {
    let temp = extension();
    let root = temp.path();
    let listing = FileListing::scan(&[root]).unwrap();

    let catalog = MemoryCatalog::new()
        .with_set(Tool::Fractor, "UP", ["flexform", "fluid"])
        .with_rule(
            Tool::Fractor,
            RuleInfo::new("flexform", "FlexForm migration")
                .with_kinds(&[FileKind::Xml])
                .with_marker("<T3DataStructure"),
        )
        .with_rule(
            Tool::Fractor,
            RuleInfo::new("fluid", "Fluid migration").with_kinds(&[FileKind::Fluid]),
        );

    let config = Configuration::new(Tool::Fractor)
        .include([p(root, "Configuration"), p(root, "Resources")])
        .set("UP");

    let plan = Resolver::new(&catalog)
        .resolve(&config, &listing, &KindApplicability::new(&catalog, Tool::Fractor))
        .unwrap();

    assert_eq!(
        plan.items,
        vec![
            WorkItem::new(root.join("Configuration/FlexForms/List.xml"), "flexform"),
            WorkItem::new(root.join("Resources/Private/z.fluid"), "fluid"),
        ]
    );
}

struct CountingEngine;

impl Engine for CountingEngine {
    fn apply(
        &self,
        item: &WorkItem,
        options: &RuleOptions,
        mode: RunMode,
    ) -> Result<Outcome, EngineFailure> {
        assert_eq!(mode, RunMode::DryRun);
        if item.file.ends_with("Mailer.php") {
            return Err(EngineFailure::Other("parse error".to_string()));
        }
        if options.contains_key("strict") {
            Ok(Outcome::Changed)
        } else {
            Ok(Outcome::Unchanged)
        }
    }
}

#[test]
fn test_plan_runs_through_engine() {
    let temp = extension();
    let root = temp.path();
    let listing = FileListing::scan(&[root]).unwrap();

    let catalog = MemoryCatalog::new()
        .with_set(Tool::Rector, "S", ["typed", "plain"])
        .with_rule(
            Tool::Rector,
            RuleInfo::new("typed", "typed").with_default("strict", true),
        )
        .with_rule(Tool::Rector, RuleInfo::new("plain", "plain"));

    let config = Configuration::new(Tool::Rector)
        .include([p(root, "Classes"), p(root, "Configuration/TCA")])
        .set("S");

    let plan = Resolver::new(&catalog)
        .resolve(&config, &listing, &KindApplicability::new(&catalog, Tool::Rector))
        .unwrap();
    assert_eq!(plan.items.len(), 4);

    let report = run_work_items(&plan, &CountingEngine, RunMode::DryRun);
    assert_eq!(report.items.len(), 4);
    assert_eq!(report.failed(), 2);
    assert_eq!(report.changed(), 1);
    assert_eq!(report.unchanged(), 1);
}
