//! YAML catalog loader
//!
//! Load extra sets and rules from files or strings. A document lists, per
//! tool, the sets and rules it adds:
//!
//! ```yaml
//! rector:
//!   sets:
//!     - id: Project::DEFAULT
//!       description: House rules
//!       members:
//!         - set: LevelSetList::UP_TO_PHP_82
//!         - ProjectSpecificRector
//!   rules:
//!     - id: ProjectSpecificRector
//!       description: Rewrites legacy helpers
//!       kinds: [php]
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use rework_core::{FileKind, MemoryCatalog, RuleInfo, RuleOptions, SetMember, Tool};

/// Errors that can occur when loading a catalog file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid catalog entry: {0}")]
    Validation(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ToolSection {
    sets: Vec<SetEntry>,
    rules: Vec<RuleEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SetEntry {
    id: String,
    #[serde(default)]
    description: Option<String>,
    members: Vec<MemberEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MemberEntry {
    Rule(String),
    Tagged {
        #[serde(default)]
        rule: Option<String>,
        #[serde(default)]
        set: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleEntry {
    id: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_kinds")]
    kinds: Vec<FileKind>,
    #[serde(default)]
    risky: bool,
    #[serde(default)]
    marker: Option<String>,
    #[serde(default)]
    defaults: RuleOptions,
}

fn default_kinds() -> Vec<FileKind> {
    vec![FileKind::Php]
}

impl MemberEntry {
    fn into_member(self, set: &str) -> Result<SetMember, LoadError> {
        match self {
            MemberEntry::Rule(rule) => Ok(SetMember::Rule(non_empty(rule, set)?.into())),
            MemberEntry::Tagged {
                rule: Some(rule),
                set: None,
            } => Ok(SetMember::Rule(non_empty(rule, set)?.into())),
            MemberEntry::Tagged {
                rule: None,
                set: Some(nested),
            } => Ok(SetMember::Set(non_empty(nested, set)?)),
            MemberEntry::Tagged { .. } => Err(LoadError::Validation(format!(
                "member of set '{}' must name exactly one of 'rule' or 'set'",
                set
            ))),
        }
    }
}

fn non_empty(value: String, set: &str) -> Result<String, LoadError> {
    if value.trim().is_empty() {
        return Err(LoadError::Validation(format!(
            "set '{}' has an empty member",
            set
        )));
    }
    Ok(value)
}

/// Load a catalog from a YAML string
pub fn load_catalog_str(yaml: &str) -> Result<MemoryCatalog, LoadError> {
    let document: BTreeMap<String, ToolSection> = serde_yaml::from_str(yaml)?;
    let mut catalog = MemoryCatalog::new();

    for (name, section) in document {
        let tool = Tool::from_str(&name)
            .ok_or_else(|| LoadError::Validation(format!("unknown tool '{}'", name)))?;

        for set in section.sets {
            if set.id.trim().is_empty() {
                return Err(LoadError::Validation("set with empty id".to_string()));
            }
            let members = set
                .members
                .into_iter()
                .map(|m| m.into_member(&set.id))
                .collect::<Result<Vec<_>, _>>()?;
            catalog.insert_set(tool, &set.id, set.description, members);
        }

        for rule in section.rules {
            if rule.id.trim().is_empty() {
                return Err(LoadError::Validation("rule with empty id".to_string()));
            }
            let mut info = RuleInfo::new(rule.id, rule.description).with_kinds(&rule.kinds);
            info.default_options = rule.defaults;
            if rule.risky {
                info = info.risky();
            }
            if let Some(marker) = rule.marker {
                info = info.with_marker(marker);
            }
            catalog.insert_rule(tool, info);
        }
    }

    Ok(catalog)
}

/// Load a catalog from a YAML file
pub fn load_catalog_file(path: &Path) -> Result<MemoryCatalog, LoadError> {
    let content = fs::read_to_string(path)?;
    load_catalog_str(&content)
}
