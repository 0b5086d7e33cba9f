//! Rule catalog interface
//!
//! A catalog maps rule-set identifiers to their ordered members and
//! describes individual rules. The resolver only sees the `Catalog` trait;
//! the tables themselves are data supplied by the caller.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::CatalogError;
use crate::kind::FileKind;
use crate::model::{OptionValue, RuleId, RuleOptions, Tool};

/// An entry of a rule set: a rule, or another set expanded in place
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetMember {
    Rule(RuleId),
    Set(String),
}

/// Catalog description of a single rule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleInfo {
    pub id: RuleId,
    pub description: String,
    /// File kinds the rule can transform
    pub kinds: Vec<FileKind>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub default_options: RuleOptions,
    /// Whether the rule may change behaviour, not just form
    pub risky: bool,
    /// Text a file must contain for the rule to apply (e.g. a FlexForm root)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_marker: Option<String>,
}

impl RuleInfo {
    pub fn new(id: impl Into<RuleId>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            kinds: vec![FileKind::Php],
            default_options: RuleOptions::new(),
            risky: false,
            content_marker: None,
        }
    }

    pub fn with_kinds(mut self, kinds: &[FileKind]) -> Self {
        self.kinds = kinds.to_vec();
        self
    }

    pub fn with_default(mut self, name: &str, value: impl Into<OptionValue>) -> Self {
        self.default_options.insert(name.to_string(), value.into());
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.content_marker = Some(marker.into());
        self
    }

    pub fn risky(mut self) -> Self {
        self.risky = true;
        self
    }
}

/// Source of rule-set expansions and rule descriptions
pub trait Catalog: Send + Sync {
    /// Direct members of a set, in declaration order
    fn set_members(&self, tool: Tool, set: &str) -> Option<Vec<SetMember>>;

    /// Description of a rule, if the catalog knows it
    fn rule_info(&self, tool: Tool, rule: &RuleId) -> Option<RuleInfo>;

    /// All set identifiers known for a tool
    fn set_ids(&self, tool: Tool) -> Vec<String>;

    /// All rule identifiers described for a tool
    fn rule_ids(&self, _tool: Tool) -> Vec<RuleId> {
        Vec::new()
    }

    /// Human-readable summary of a set
    fn set_description(&self, _tool: Tool, _set: &str) -> Option<String> {
        None
    }

    /// Expand a set into its rules, depth first, nested sets in place.
    /// Duplicates are kept; the resolver deduplicates across all sets.
    fn expand_set(&self, tool: Tool, set: &str) -> Result<Vec<RuleId>, CatalogError> {
        let mut rules = Vec::new();
        let mut chain = Vec::new();
        expand_into(self, tool, set, &mut chain, &mut rules)?;
        Ok(rules)
    }
}

fn expand_into<C: Catalog + ?Sized>(
    catalog: &C,
    tool: Tool,
    set: &str,
    chain: &mut Vec<String>,
    rules: &mut Vec<RuleId>,
) -> Result<(), CatalogError> {
    if chain.iter().any(|s| s == set) {
        let mut path = chain.clone();
        path.push(set.to_string());
        return Err(CatalogError::Cycle {
            set: set.to_string(),
            chain: path.join(" -> "),
        });
    }

    let members = catalog
        .set_members(tool, set)
        .ok_or_else(|| CatalogError::UnknownSet {
            tool,
            set: set.to_string(),
        })?;

    chain.push(set.to_string());
    for member in members {
        match member {
            SetMember::Rule(rule) => rules.push(rule),
            SetMember::Set(nested) => expand_into(catalog, tool, &nested, chain, rules)?,
        }
    }
    chain.pop();

    Ok(())
}

#[derive(Debug, Clone)]
struct MemorySet {
    description: Option<String>,
    members: Vec<SetMember>,
}

/// A catalog held in memory, built programmatically or loaded from data
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    sets: BTreeMap<(Tool, String), MemorySet>,
    rules: BTreeMap<(Tool, RuleId), RuleInfo>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a set whose members are all rules
    pub fn with_set<I, R>(mut self, tool: Tool, id: &str, rules: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RuleId>,
    {
        let members = rules
            .into_iter()
            .map(|r| SetMember::Rule(r.into()))
            .collect();
        self.insert_set(tool, id, None, members);
        self
    }

    pub fn with_rule(mut self, tool: Tool, info: RuleInfo) -> Self {
        self.insert_rule(tool, info);
        self
    }

    pub fn insert_set(
        &mut self,
        tool: Tool,
        id: &str,
        description: Option<String>,
        members: Vec<SetMember>,
    ) {
        self.sets.insert(
            (tool, id.to_string()),
            MemorySet {
                description,
                members,
            },
        );
    }

    pub fn insert_rule(&mut self, tool: Tool, info: RuleInfo) {
        self.rules.insert((tool, info.id.clone()), info);
    }
}

impl Catalog for MemoryCatalog {
    fn set_members(&self, tool: Tool, set: &str) -> Option<Vec<SetMember>> {
        self.sets
            .get(&(tool, set.to_string()))
            .map(|s| s.members.clone())
    }

    fn rule_info(&self, tool: Tool, rule: &RuleId) -> Option<RuleInfo> {
        self.rules.get(&(tool, rule.clone())).cloned()
    }

    fn set_ids(&self, tool: Tool) -> Vec<String> {
        self.sets
            .keys()
            .filter(|(t, _)| *t == tool)
            .map(|(_, id)| id.clone())
            .collect()
    }

    fn rule_ids(&self, tool: Tool) -> Vec<RuleId> {
        self.rules
            .keys()
            .filter(|(t, _)| *t == tool)
            .map(|(_, id)| id.clone())
            .collect()
    }

    fn set_description(&self, tool: Tool, set: &str) -> Option<String> {
        self.sets
            .get(&(tool, set.to_string()))
            .and_then(|s| s.description.clone())
    }
}

/// Several catalogs consulted in order; the first one that knows a set or
/// rule answers for it. Nested sets are looked up through all layers.
#[derive(Default)]
pub struct LayeredCatalog {
    layers: Vec<Box<dyn Catalog>>,
}

impl LayeredCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer below the existing ones
    pub fn push(&mut self, catalog: Box<dyn Catalog>) {
        self.layers.push(catalog);
    }
}

impl Catalog for LayeredCatalog {
    fn set_members(&self, tool: Tool, set: &str) -> Option<Vec<SetMember>> {
        self.layers.iter().find_map(|c| c.set_members(tool, set))
    }

    fn rule_info(&self, tool: Tool, rule: &RuleId) -> Option<RuleInfo> {
        self.layers.iter().find_map(|c| c.rule_info(tool, rule))
    }

    fn set_ids(&self, tool: Tool) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for layer in &self.layers {
            for id in layer.set_ids(tool) {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    fn rule_ids(&self, tool: Tool) -> Vec<RuleId> {
        let mut ids: Vec<RuleId> = self.layers.iter().flat_map(|c| c.rule_ids(tool)).collect();
        ids.sort();
        ids.dedup();
        ids
    }

    fn set_description(&self, tool: Tool, set: &str) -> Option<String> {
        self.layers.iter().find_map(|c| c.set_description(tool, set))
    }
}
