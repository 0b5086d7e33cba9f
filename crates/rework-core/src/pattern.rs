//! Include/skip path patterns
//!
//! A pattern is either a literal path, matching itself and everything below
//! it, or a glob. Globs without a `/` match any single path component
//! (`vendor`, `*.generated.php`); other globs match the whole path or one of
//! its ancestors, so a glob naming directories covers their contents.

use glob::{MatchOptions, Pattern};
use std::path::{Component, Path, PathBuf};

use crate::error::ConfigurationError;

const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
enum PatternKind {
    Literal(PathBuf),
    Glob {
        pattern: Pattern,
        base: PathBuf,
        component_only: bool,
    },
}

/// A compiled include or skip pattern
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    kind: PatternKind,
}

impl PathPattern {
    pub fn parse(raw: &str) -> Result<Self, ConfigurationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConfigurationError::EmptyPattern { kind: "path" });
        }

        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };

        let kind = if is_glob(normalized) {
            let pattern =
                Pattern::new(normalized).map_err(|source| ConfigurationError::InvalidGlob {
                    pattern: raw.to_string(),
                    source,
                })?;
            PatternKind::Glob {
                pattern,
                base: literal_prefix(normalized),
                component_only: !normalized.contains('/'),
            }
        } else {
            PatternKind::Literal(PathBuf::from(normalized))
        };

        Ok(Self {
            raw: raw.to_string(),
            kind,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_glob(&self) -> bool {
        matches!(self.kind, PatternKind::Glob { .. })
    }

    /// The directory every match lives under. Empty for component globs,
    /// which can match anywhere.
    pub fn base(&self) -> &Path {
        match &self.kind {
            PatternKind::Literal(path) => path,
            PatternKind::Glob { base, .. } => base,
        }
    }

    pub fn matches(&self, path: &Path) -> bool {
        match &self.kind {
            PatternKind::Literal(literal) => path.starts_with(literal),
            PatternKind::Glob {
                pattern,
                component_only: true,
                ..
            } => path.components().any(|component| match component {
                Component::Normal(name) => {
                    pattern.matches_with(&name.to_string_lossy(), GLOB_OPTIONS)
                }
                _ => false,
            }),
            PatternKind::Glob { pattern, .. } => path
                .ancestors()
                .any(|ancestor| pattern.matches_path_with(ancestor, GLOB_OPTIONS)),
        }
    }
}

/// Match a bare file name against a glob such as `*.php`
pub fn file_name_matches(patterns: &[Pattern], path: &Path) -> bool {
    path.file_name()
        .map(|name| {
            let name = name.to_string_lossy();
            patterns.iter().any(|p| p.matches_with(&name, GLOB_OPTIONS))
        })
        .unwrap_or(false)
}

/// Compile file-name globs (`->name('*.php')`)
pub fn compile_name_patterns(raw: &[String]) -> Result<Vec<Pattern>, ConfigurationError> {
    raw.iter()
        .map(|p| {
            Pattern::new(p).map_err(|source| ConfigurationError::InvalidGlob {
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}

fn is_glob(s: &str) -> bool {
    s.contains(['*', '?', '['])
}

fn literal_prefix(pattern: &str) -> PathBuf {
    let mut base = PathBuf::new();
    for component in Path::new(pattern).components() {
        if is_glob(&component.as_os_str().to_string_lossy()) {
            break;
        }
        base.push(component);
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(raw: &str) -> PathPattern {
        PathPattern::parse(raw).unwrap()
    }

    #[test]
    fn test_literal_directory_matches_subtree() {
        let p = pattern("/ext/Configuration");
        assert!(p.matches(Path::new("/ext/Configuration/TCA/x.php")));
        assert!(p.matches(Path::new("/ext/Configuration")));
        assert!(!p.matches(Path::new("/ext/ConfigurationX/y.php")));
        assert!(!p.is_glob());
    }

    #[test]
    fn test_literal_trailing_slash() {
        let p = pattern("/ext/vendor/");
        assert!(p.matches(Path::new("/ext/vendor/autoload.php")));
        assert_eq!(p.base(), Path::new("/ext/vendor"));
    }

    #[test]
    fn test_literal_file() {
        let p = pattern("/ext/ext_emconf.php");
        assert!(p.matches(Path::new("/ext/ext_emconf.php")));
        assert!(!p.matches(Path::new("/ext/ext_localconf.php")));
    }

    #[test]
    fn test_glob_matches_files() {
        let p = pattern("/ext/Classes/*.php");
        assert!(p.is_glob());
        assert!(p.matches(Path::new("/ext/Classes/Foo.php")));
        assert!(!p.matches(Path::new("/ext/Classes/Sub/Bar.php")));
        assert_eq!(p.base(), Path::new("/ext/Classes"));
    }

    #[test]
    fn test_glob_directory_covers_contents() {
        let p = pattern("/ext/*/Cache");
        assert!(p.matches(Path::new("/ext/Configuration/Cache/y.php")));
        assert!(!p.matches(Path::new("/ext/Configuration/TCA/x.php")));
    }

    #[test]
    fn test_recursive_glob() {
        let p = pattern("/ext/**/*.html");
        assert!(p.matches(Path::new("/ext/Resources/Private/Templates/List.html")));
        assert!(!p.matches(Path::new("/ext/Resources/Private/Language/locallang.xlf")));
    }

    #[test]
    fn test_component_glob_matches_anywhere() {
        let p = pattern("*.generated.php");
        assert!(p.matches(Path::new("/ext/Classes/Foo.generated.php")));
        assert!(!p.matches(Path::new("/ext/Classes/Foo.php")));
        assert_eq!(p.base(), Path::new(""));
    }

    #[test]
    fn test_invalid_glob() {
        let err = PathPattern::parse("/ext/[abc").unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidGlob { .. }));
    }

    #[test]
    fn test_file_name_matches() {
        let patterns = compile_name_patterns(&["*.php".to_string()]).unwrap();
        assert!(file_name_matches(&patterns, Path::new("/ext/Classes/Foo.php")));
        assert!(!file_name_matches(&patterns, Path::new("/ext/README.md")));
    }
}
