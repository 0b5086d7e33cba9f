//! Built-in catalog registry
//!
//! Each tool module describes its sets and rules as static tables; the
//! registry turns them into one queryable `Catalog`.

use rework_core::{Catalog, FileKind, MemoryCatalog, RuleId, RuleInfo, SetMember, Tool};

/// A statically declared rule set. Members naming another set of the same
/// table are expanded in place; every other member is a rule.
pub struct SetDef {
    pub id: &'static str,
    pub description: &'static str,
    pub members: &'static [&'static str],
}

/// A statically declared rule
pub struct RuleDef {
    pub id: &'static str,
    pub description: &'static str,
    pub kinds: &'static [FileKind],
    pub risky: bool,
    /// Text a file must contain for the rule to apply
    pub marker: Option<&'static str>,
}

impl RuleDef {
    pub const fn php(id: &'static str, description: &'static str) -> Self {
        Self {
            id,
            description,
            kinds: &[FileKind::Php],
            risky: false,
            marker: None,
        }
    }

    pub const fn risky(id: &'static str, description: &'static str) -> Self {
        Self {
            id,
            description,
            kinds: &[FileKind::Php],
            risky: true,
            marker: None,
        }
    }

    pub const fn of_kind(
        id: &'static str,
        description: &'static str,
        kinds: &'static [FileKind],
    ) -> Self {
        Self {
            id,
            description,
            kinds,
            risky: false,
            marker: None,
        }
    }

    fn to_info(&self, defaults: &[(&str, &str, &str)]) -> RuleInfo {
        let mut info = RuleInfo::new(self.id, self.description).with_kinds(self.kinds);
        if self.risky {
            info = info.risky();
        }
        if let Some(marker) = self.marker {
            info = info.with_marker(marker);
        }
        for (_, name, value) in defaults.iter().filter(|(rule, _, _)| *rule == self.id) {
            info = info.with_default(name, *value);
        }
        info
    }
}

/// The tables one tool contributes
pub struct ToolTables {
    pub tool: Tool,
    pub sets: &'static [SetDef],
    pub rules: &'static [RuleDef],
    /// `(rule, option, value)` defaults
    pub defaults: &'static [(&'static str, &'static str, &'static str)],
}

/// Catalog of all built-in sets and rules
pub struct BuiltinCatalog {
    inner: MemoryCatalog,
}

impl BuiltinCatalog {
    /// Create a catalog with the tables of every supported tool
    pub fn new() -> Self {
        let mut catalog = Self {
            inner: MemoryCatalog::new(),
        };

        catalog.register(&super::rector::TABLES);
        catalog.register(&super::fractor::TABLES);
        catalog.register(&super::fixer::TABLES);

        catalog
    }

    /// Register the tables of one tool
    pub fn register(&mut self, tables: &ToolTables) {
        for set in tables.sets {
            let members = set
                .members
                .iter()
                .map(|member| {
                    if tables.sets.iter().any(|s| s.id == *member) {
                        SetMember::Set(member.to_string())
                    } else {
                        SetMember::Rule(RuleId::from(*member))
                    }
                })
                .collect();
            self.inner.insert_set(
                tables.tool,
                set.id,
                Some(set.description.to_string()),
                members,
            );
        }

        for rule in tables.rules {
            self.inner
                .insert_rule(tables.tool, rule.to_info(tables.defaults));
        }
    }
}

impl Default for BuiltinCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog for BuiltinCatalog {
    fn set_members(&self, tool: Tool, set: &str) -> Option<Vec<SetMember>> {
        self.inner.set_members(tool, set)
    }

    fn rule_info(&self, tool: Tool, rule: &RuleId) -> Option<RuleInfo> {
        self.inner.rule_info(tool, rule)
    }

    fn set_ids(&self, tool: Tool) -> Vec<String> {
        self.inner.set_ids(tool)
    }

    fn rule_ids(&self, tool: Tool) -> Vec<RuleId> {
        self.inner.rule_ids(tool)
    }

    fn set_description(&self, tool: Tool, set: &str) -> Option<String> {
        self.inner.set_description(tool, set)
    }
}
