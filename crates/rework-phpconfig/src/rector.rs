//! Importer for `rector.php` and `fractor.php`
//!
//! Both tools share one configuration vocabulary: the closure style
//! (`$rectorConfig->paths([...])`) and the fluent builder style
//! (`RectorConfig::configure()->withPaths([...])`).

use rework_core::logging;
use rework_core::{
    Configuration, OptionValue, PathRule, RuleId, RuleOptions, RuleOverride, RuleSetReference,
    Tool,
};

use crate::source::{find_calls, Call};
use crate::value::{parse_arguments, Argument, PhpValue};
use crate::{resolve_path, ImportError};

const CALLS: &[&str] = &[
    "paths",
    "withPaths",
    "skip",
    "withSkip",
    "sets",
    "withSets",
    "rule",
    "rules",
    "withRules",
    "ruleWithConfiguration",
    "withConfiguredRule",
    "phpstanConfig",
    "withPhpstanConfigs",
    "importNames",
    "withImportNames",
    "removeUnusedImports",
];

/// Build a configuration from comment-free `rector.php`/`fractor.php` source
pub fn import(content: &str, tool: Tool, dir: &str) -> Result<Configuration, ImportError> {
    let mut config = Configuration::new(tool);

    for call in find_calls(content, CALLS)? {
        let args = parse_arguments(&call.args, dir)?;
        apply_call(&mut config, &call, &args, dir)?;
    }

    Ok(config)
}

fn apply_call(
    config: &mut Configuration,
    call: &Call,
    args: &[Argument],
    dir: &str,
) -> Result<(), ImportError> {
    match call.method.as_str() {
        "paths" | "withPaths" => {
            let paths = path_list(first(call, args)?, dir)?;
            if !paths.is_empty() {
                config.paths.push(PathRule::include(paths));
            }
        }
        "skip" | "withSkip" => apply_skip(config, first(call, args)?, dir)?,
        "sets" | "withSets" => {
            for (_, set) in first(call, args)?.entries() {
                let id = set.as_text().ok_or_else(|| invalid(call, "set identifier"))?;
                config.sets.push(RuleSetReference::new(id));
            }
        }
        "rule" | "rules" | "withRules" => {
            for (_, rule) in first(call, args)?.entries() {
                config.rules.push(rule_id(call, rule)?);
            }
        }
        "ruleWithConfiguration" | "withConfiguredRule" => {
            let rule = rule_id(call, first(call, args)?)?;
            let options = match args.get(1).and_then(|a| a.value.to_option_value()) {
                Some(OptionValue::Map(map)) => map,
                Some(other) => RuleOptions::from([("configuration".to_string(), other)]),
                None => RuleOptions::new(),
            };
            config.rules.push(rule.clone());
            config
                .overrides
                .push(RuleOverride::configure(rule, options));
        }
        "phpstanConfig" | "withPhpstanConfigs" => {
            let first_config = first(call, args)?
                .entries()
                .into_iter()
                .find_map(|(_, v)| v.as_text());
            if let Some(path) = first_config {
                config.options.phpstan_config = Some(resolve_path(&path, dir).into());
            }
        }
        "importNames" | "withImportNames" => {
            config.options.import_names = flag(args, "importNames").unwrap_or(true);
            if let Some(remove) = named(args, "removeUnusedImports").and_then(PhpValue::as_bool) {
                config.options.remove_unused_imports = remove;
            }
        }
        "removeUnusedImports" => {
            config.options.remove_unused_imports =
                flag(args, "removeUnusedImports").unwrap_or(true);
        }
        _ => {}
    }
    Ok(())
}

/// `skip()` mixes paths, rule classes and rule classes scoped to paths
fn apply_skip(config: &mut Configuration, value: &PhpValue, dir: &str) -> Result<(), ImportError> {
    let mut skipped_paths = Vec::new();

    for (key, entry) in value.entries() {
        match (key, entry) {
            (None, PhpValue::Class(rule)) => {
                config.overrides.push(RuleOverride::skip(rule.as_str()));
            }
            (None, PhpValue::Str(path)) => skipped_paths.push(resolve_path(path, dir)),
            (Some(PhpValue::Class(rule)), PhpValue::Null) => {
                config.overrides.push(RuleOverride::skip(rule.as_str()));
            }
            (Some(PhpValue::Class(rule)), paths) => {
                let paths = path_list(paths, dir)?;
                config
                    .overrides
                    .push(RuleOverride::skip_paths(rule.as_str(), paths));
            }
            (key, entry) => logging::log(&format!(
                "Ignoring unsupported skip entry {:?} => {:?}",
                key, entry
            )),
        }
    }

    if !skipped_paths.is_empty() {
        config.paths.push(PathRule::skip(skipped_paths));
    }
    Ok(())
}

fn first<'a>(call: &Call, args: &'a [Argument]) -> Result<&'a PhpValue, ImportError> {
    args.iter()
        .find(|a| a.name.is_none())
        .or_else(|| args.first())
        .map(|a| &a.value)
        .ok_or_else(|| invalid(call, "argument"))
}

fn named<'a>(args: &'a [Argument], name: &str) -> Option<&'a PhpValue> {
    args.iter()
        .find(|a| a.name.as_deref() == Some(name))
        .map(|a| &a.value)
}

/// A boolean given either by name or as the first positional argument
fn flag(args: &[Argument], name: &str) -> Option<bool> {
    named(args, name)
        .or_else(|| args.iter().find(|a| a.name.is_none()).map(|a| &a.value))
        .and_then(PhpValue::as_bool)
}

fn path_list(value: &PhpValue, dir: &str) -> Result<Vec<String>, ImportError> {
    value
        .entries()
        .into_iter()
        .map(|(_, v)| {
            v.as_text()
                .map(|p| resolve_path(&p, dir))
                .ok_or_else(|| {
                    ImportError::InvalidFormat(format!("expected a path, found {:?}", v))
                })
        })
        .collect()
}

fn rule_id(call: &Call, value: &PhpValue) -> Result<RuleId, ImportError> {
    match value {
        PhpValue::Class(name) | PhpValue::Str(name) => Ok(RuleId::from(name.as_str())),
        _ => Err(invalid(call, "rule class")),
    }
}

fn invalid(call: &Call, what: &str) -> ImportError {
    ImportError::InvalidFormat(format!("{}() expects a {}", call.method, what))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rework_core::OverrideAction;

    #[test]
    fn test_closure_style() {
        let content = r#"
            $rectorConfig->paths([__DIR__ . '/Classes', __DIR__ . '/Tests']);
            $rectorConfig->skip([__DIR__ . '/vendor', SomeRector::class]);
            $rectorConfig->sets([LevelSetList::UP_TO_PHP_82]);
            $rectorConfig->importNames();
        "#;
        let config = import(content, Tool::Rector, "/ext").unwrap();

        assert_eq!(
            config.include_patterns().collect::<Vec<_>>(),
            vec!["/ext/Classes", "/ext/Tests"]
        );
        assert_eq!(config.skip_patterns().collect::<Vec<_>>(), vec!["/ext/vendor"]);
        assert_eq!(config.sets, vec![RuleSetReference::new("LevelSetList::UP_TO_PHP_82")]);
        assert_eq!(config.overrides, vec![RuleOverride::skip("SomeRector")]);
        assert!(config.options.import_names);
        assert!(!config.options.remove_unused_imports);
    }

    #[test]
    fn test_fluent_style() {
        let content = r#"
            return RectorConfig::configure()
                ->withPaths([__DIR__ . '/src'])
                ->withSkip([
                    StrContainsRector::class => [__DIR__ . '/src/Legacy'],
                    ReadOnlyPropertyRector::class => null,
                ])
                ->withRules([TypedPropertyFromAssignsRector::class])
                ->withConfiguredRule(RenameClassRector::class, ['Old' => 'New'])
                ->withImportNames(importShortClasses: false, removeUnusedImports: true)
                ->withPhpstanConfigs([__DIR__ . '/phpstan.neon']);
        "#;
        let config = import(content, Tool::Rector, "/proj").unwrap();

        assert_eq!(config.include_patterns().collect::<Vec<_>>(), vec!["/proj/src"]);
        assert_eq!(
            config.overrides[0],
            RuleOverride::skip_paths("StrContainsRector", ["/proj/src/Legacy"])
        );
        assert_eq!(config.overrides[1], RuleOverride::skip("ReadOnlyPropertyRector"));
        assert_eq!(
            config.rules,
            vec![
                RuleId::from("TypedPropertyFromAssignsRector"),
                RuleId::from("RenameClassRector")
            ]
        );
        match &config.overrides[2].action {
            OverrideAction::Configure { options } => {
                assert_eq!(options.get("Old"), Some(&OptionValue::String("New".to_string())));
            }
            other => panic!("expected configure, got {:?}", other),
        }
        assert!(config.options.import_names);
        assert!(config.options.remove_unused_imports);
        assert_eq!(
            config.options.phpstan_config.as_deref(),
            Some(std::path::Path::new("/proj/phpstan.neon"))
        );
    }

    #[test]
    fn test_relative_paths_resolve_against_config_dir() {
        let content = "$rectorConfig->paths(['src', '/abs/lib']);";
        let config = import(content, Tool::Rector, "/proj").unwrap();
        assert_eq!(
            config.include_patterns().collect::<Vec<_>>(),
            vec!["/proj/src", "/abs/lib"]
        );
    }

    #[test]
    fn test_missing_argument() {
        let err = import("$rectorConfig->paths();", Tool::Rector, "/proj").unwrap_err();
        assert!(matches!(err, ImportError::InvalidFormat(_)));
    }

    #[test]
    fn test_positional_import_names_flag() {
        let config = import("$rectorConfig->importNames(false);", Tool::Rector, "/p").unwrap();
        assert!(!config.options.import_names);
    }
}
