//! Hand-off of work items to a processing engine

use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;

use crate::error::EngineFailure;
use crate::logging;
use crate::model::{RuleOptions, WorkItem};
use crate::resolver::Plan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    /// Report what would change, write nothing
    DryRun,
    Apply,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::DryRun => "dry-run",
            RunMode::Apply => "apply",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Changed,
    Unchanged,
}

/// An engine that applies one rule to one file
pub trait Engine: Send + Sync {
    fn apply(
        &self,
        item: &WorkItem,
        options: &RuleOptions,
        mode: RunMode,
    ) -> Result<Outcome, EngineFailure>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ItemStatus {
    Changed,
    Unchanged,
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReport {
    #[serde(flatten)]
    pub item: WorkItem,
    #[serde(flatten)]
    pub status: ItemStatus,
}

/// Per-item results of a run, in work-item order
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub items: Vec<ItemReport>,
}

impl RunReport {
    pub fn changed(&self) -> usize {
        self.count(|s| matches!(s, ItemStatus::Changed))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|s| matches!(s, ItemStatus::Unchanged))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, ItemStatus::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&ItemStatus) -> bool) -> usize {
        self.items.iter().filter(|r| predicate(&r.status)).count()
    }
}

/// Run every work item of a plan through the engine.
///
/// Files are processed in parallel; the rules of one file run sequentially
/// in plan order, since each may rewrite the file the next one reads. A
/// failing item is recorded and the run continues.
pub fn run_work_items<E: Engine + ?Sized>(plan: &Plan, engine: &E, mode: RunMode) -> RunReport {
    logging::log_run_start(plan.items.len(), mode.as_str());

    let empty = RuleOptions::new();
    let groups = group_by_file(&plan.items);

    let items: Vec<ItemReport> = groups
        .par_iter()
        .map(|group| {
            group
                .iter()
                .map(|item| {
                    let options = plan.options_for(&item.rule).unwrap_or(&empty);
                    let status = match engine.apply(item, options, mode) {
                        Ok(Outcome::Changed) => ItemStatus::Changed,
                        Ok(Outcome::Unchanged) => ItemStatus::Unchanged,
                        Err(e) => ItemStatus::Failed {
                            message: e.to_string(),
                        },
                    };
                    log_status(&item.file, item.rule.as_str(), &status);
                    ItemReport {
                        item: item.clone(),
                        status,
                    }
                })
                .collect::<Vec<_>>()
        })
        .flatten()
        .collect();

    let report = RunReport { items };
    logging::log_run_complete(report.changed(), report.unchanged(), report.failed());
    report
}

/// Consecutive items for the same file. Plans are file-major, so each file
/// forms exactly one group.
fn group_by_file(items: &[WorkItem]) -> Vec<&[WorkItem]> {
    let mut groups = Vec::new();
    let mut start = 0;
    for i in 1..=items.len() {
        if i == items.len() || items[i].file != items[start].file {
            if start < i {
                groups.push(&items[start..i]);
            }
            start = i;
        }
    }
    groups
}

fn log_status(path: &Path, rule: &str, status: &ItemStatus) {
    match status {
        ItemStatus::Changed => logging::log_engine_outcome(path, rule, "CHANGED"),
        ItemStatus::Unchanged => logging::log_engine_outcome(path, rule, "UNCHANGED"),
        ItemStatus::Failed { message } => {
            logging::log_engine_outcome(path, rule, &format!("FAILED ({})", message))
        }
    }
}
