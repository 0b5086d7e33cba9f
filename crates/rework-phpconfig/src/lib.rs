//! rework-phpconfig: import upstream PHP configuration payloads
//!
//! Reads `rector.php`, `fractor.php` and `.php-cs-fixer.php` files and turns
//! them into a [`Configuration`]. Only the declarative call chains these
//! files are made of are understood; nothing is executed. `__DIR__` expands
//! to the directory the file lives in.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! let config = rework_phpconfig::import_file(Path::new("rector.php")).unwrap();
//! println!("{} sets", config.sets.len());
//! ```

pub mod fixer;
pub mod rector;
pub mod source;
pub mod value;

use std::fs;
use std::path::Path;
use thiserror::Error;

use rework_core::logging;
use rework_core::{Configuration, Tool};

/// Errors that can occur while importing a PHP payload
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration payload: {0}")]
    InvalidFormat(String),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Not a Rector, Fractor or PHP-CS-Fixer configuration")]
    UnknownTool,
}

/// Detect which tool a payload configures
pub fn detect_tool(content: &str) -> Option<Tool> {
    if content.contains("FractorConfiguration") {
        Some(Tool::Fractor)
    } else if content.contains("RectorConfig") {
        Some(Tool::Rector)
    } else if content.contains("PhpCsFixer\\Config") || content.contains("PhpCsFixer\\Finder") {
        Some(Tool::Fixer)
    } else {
        None
    }
}

/// Import a payload whose `__DIR__` is `dir`
pub fn import_str(content: &str, dir: &Path) -> Result<Configuration, ImportError> {
    let content = source::strip_comments(content);
    let tool = detect_tool(&content).ok_or(ImportError::UnknownTool)?;
    let dir = dir.to_string_lossy();

    let config = match tool {
        Tool::Rector | Tool::Fractor => rector::import(&content, tool, &dir)?,
        Tool::Fixer => fixer::import(&content, &dir)?,
    };

    logging::log(&format!(
        "Imported {} payload: {} path rules, {} sets, {} rules, {} overrides",
        tool,
        config.paths.len(),
        config.sets.len(),
        config.rules.len(),
        config.overrides.len()
    ));
    Ok(config)
}

/// Import a payload file
pub fn import_file(path: &Path) -> Result<Configuration, ImportError> {
    let content = fs::read_to_string(path)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    import_str(&content, dir)
}

/// Join a relative path onto the payload directory
pub(crate) fn resolve_path(path: &str, dir: &str) -> String {
    if Path::new(path).is_absolute() || dir.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", dir.trim_end_matches('/'), path.trim_start_matches("./"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rework_core::{OptionValue, OverrideAction, RuleId, RuleOverride, RuleSetReference};
    use tempfile::TempDir;

    const RECTOR_PHP: &str = r#"<?php

/**
 * Usage:
 *   ./vendor/bin/rector process --dry-run  # Preview changes
 */

declare(strict_types=1);

use Rector\Config\RectorConfig;
use Rector\DeadCode\Rector\StaticCall\RemoveParentCallWithoutParentRector;
use Rector\Php80\Rector\Class_\ClassPropertyAssignToConstructorPromotionRector;
use Rector\Set\ValueObject\LevelSetList;
use Ssch\TYPO3Rector\Set\Typo3LevelSetList;
use Ssch\TYPO3Rector\Set\Typo3SetList;

return static function (RectorConfig $rectorConfig): void {
    $rectorConfig->paths([
        __DIR__ . '/Classes',
        __DIR__ . '/Configuration',
        __DIR__ . '/Tests',
    ]);

    $rectorConfig->skip([
        __DIR__ . '/ext_emconf.php',
        __DIR__ . '/.Build',
        __DIR__ . '/vendor',
    ]);

    $rectorConfig->phpstanConfig(__DIR__ . '/phpstan.neon');
    $rectorConfig->importNames();
    $rectorConfig->removeUnusedImports();

    $rectorConfig->sets([
        LevelSetList::UP_TO_PHP_82,
        // Typo3LevelSetList::UP_TO_TYPO3_13 would break v12 compatibility
        Typo3LevelSetList::UP_TO_TYPO3_12,
        Typo3SetList::CODE_QUALITY,
        Typo3SetList::GENERAL,
    ]);

    $rectorConfig->skip([
        ClassPropertyAssignToConstructorPromotionRector::class,
        RemoveParentCallWithoutParentRector::class,
    ]);
};
"#;

    const FRACTOR_PHP: &str = r#"<?php

declare(strict_types=1);

use a9f\Fractor\Configuration\FractorConfiguration;
use a9f\Typo3Fractor\Set\Typo3LevelSetList;

return FractorConfiguration::configure()
    ->withPaths([
        __DIR__ . '/Configuration',
        __DIR__ . '/Resources',
    ])
    ->withSkip([
        __DIR__ . '/.Build',
        __DIR__ . '/vendor',
    ])
    ->withSets([
        Typo3LevelSetList::UP_TO_TYPO3_12,

        // Typo3LevelSetList::UP_TO_TYPO3_13,
    ]);
"#;

    const FIXER_PHP: &str = r#"<?php

$finder = PhpCsFixer\Finder::create()
    ->in(__DIR__)
    ->exclude([
        '.Build',
        '.github',
        'vendor',
        'node_modules',
    ])
    ->name('*.php')
    ->ignoreDotFiles(true)
    ->ignoreVCS(true);

return (new PhpCsFixer\Config())
    ->setRiskyAllowed(true)
    ->setRules([
        '@PER-CS2.0' => true,
        '@PER-CS2.0:risky' => true,
        '@PHP82Migration' => true,

        // Array notation
        'array_syntax' => ['syntax' => 'short'],
        'ordered_imports' => [
            'imports_order' => ['class', 'function', 'const'],
            'sort_algorithm' => 'alpha',
        ],
        'declare_strict_types' => true,
        'single_line_throw' => false,
    ])
    ->setFinder($finder);
"#;

    #[test]
    fn test_detect_tool() {
        assert_eq!(detect_tool(RECTOR_PHP), Some(Tool::Rector));
        assert_eq!(detect_tool(FRACTOR_PHP), Some(Tool::Fractor));
        assert_eq!(detect_tool(FIXER_PHP), Some(Tool::Fixer));
        assert_eq!(detect_tool("<?php return [];"), None);
    }

    #[test]
    fn test_import_rector_payload() {
        let config = import_str(RECTOR_PHP, Path::new("/ext")).unwrap();

        assert_eq!(config.tool, Tool::Rector);
        assert_eq!(
            config.include_patterns().collect::<Vec<_>>(),
            vec!["/ext/Classes", "/ext/Configuration", "/ext/Tests"]
        );
        assert_eq!(
            config.skip_patterns().collect::<Vec<_>>(),
            vec!["/ext/ext_emconf.php", "/ext/.Build", "/ext/vendor"]
        );
        assert_eq!(
            config.sets,
            vec![
                RuleSetReference::new("LevelSetList::UP_TO_PHP_82"),
                RuleSetReference::new("Typo3LevelSetList::UP_TO_TYPO3_12"),
                RuleSetReference::new("Typo3SetList::CODE_QUALITY"),
                RuleSetReference::new("Typo3SetList::GENERAL"),
            ]
        );
        assert_eq!(
            config.overrides,
            vec![
                RuleOverride::skip("ClassPropertyAssignToConstructorPromotionRector"),
                RuleOverride::skip("RemoveParentCallWithoutParentRector"),
            ]
        );
        assert!(config.options.import_names);
        assert!(config.options.remove_unused_imports);
        assert_eq!(
            config.options.phpstan_config.as_deref(),
            Some(Path::new("/ext/phpstan.neon"))
        );
    }

    #[test]
    fn test_import_fractor_payload() {
        let config = import_str(FRACTOR_PHP, Path::new("/ext")).unwrap();

        assert_eq!(config.tool, Tool::Fractor);
        assert_eq!(
            config.include_patterns().collect::<Vec<_>>(),
            vec!["/ext/Configuration", "/ext/Resources"]
        );
        assert_eq!(
            config.skip_patterns().collect::<Vec<_>>(),
            vec!["/ext/.Build", "/ext/vendor"]
        );
        assert_eq!(
            config.sets,
            vec![RuleSetReference::new("Typo3LevelSetList::UP_TO_TYPO3_12")]
        );
        assert!(config.overrides.is_empty());
    }

    #[test]
    fn test_import_fixer_payload() {
        let config = import_str(FIXER_PHP, Path::new("/ext")).unwrap();

        assert_eq!(config.tool, Tool::Fixer);
        assert_eq!(config.include_patterns().collect::<Vec<_>>(), vec!["/ext"]);
        assert_eq!(config.skip_patterns().count(), 4);
        assert_eq!(config.sets.len(), 3);
        assert_eq!(
            config.rules,
            vec![
                RuleId::from("array_syntax"),
                RuleId::from("ordered_imports"),
                RuleId::from("declare_strict_types"),
            ]
        );
        assert!(config.options.risky_allowed);

        let ordered = config
            .overrides
            .iter()
            .find(|o| o.rule.as_str() == "ordered_imports")
            .unwrap();
        match &ordered.action {
            OverrideAction::Configure { options } => {
                assert_eq!(
                    options.get("imports_order"),
                    Some(&OptionValue::List(vec![
                        "class".into(),
                        "function".into(),
                        "const".into()
                    ]))
                );
            }
            other => panic!("expected configure, got {:?}", other),
        }
        assert!(config
            .overrides
            .contains(&RuleOverride::skip("single_line_throw")));
    }

    #[test]
    fn test_unknown_payload() {
        let err = import_str("<?php return ['paths' => []];", Path::new("/x")).unwrap_err();
        assert!(matches!(err, ImportError::UnknownTool));
    }

    #[test]
    fn test_import_file_uses_parent_dir() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fractor.php");
        fs::write(&path, FRACTOR_PHP).unwrap();

        let config = import_file(&path).unwrap();
        let expected = format!("{}/Configuration", temp.path().display());
        assert_eq!(config.include_patterns().next(), Some(expected.as_str()));
    }

    #[test]
    fn test_resolve_path() {
        assert_eq!(resolve_path("src", "/proj"), "/proj/src");
        assert_eq!(resolve_path("./src", "/proj/"), "/proj/src");
        assert_eq!(resolve_path("/abs", "/proj"), "/abs");
    }
}
