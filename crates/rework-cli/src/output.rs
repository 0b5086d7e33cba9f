//! Output formatting for rework
//!
//! Supports text (colored terminal) and JSON output formats.

use anyhow::Result;
use colored::*;
use serde::Serialize;

use rework_core::{Diagnostic, ItemReport, ItemStatus, Plan, RunMode, RunReport, Tool};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<OutputFormat> {
        match s.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub files: usize,
    pub work_items: usize,
    pub changed: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub warnings: usize,
}

/// Full JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a> {
    pub version: &'static str,
    pub tool: Option<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<RunMode>,
    pub summary: &'a Summary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<&'a Plan>,
    /// Resolution warnings, present whether or not the plan is included
    #[serde(skip_serializing_if = "is_empty")]
    pub diagnostics: &'a [Diagnostic],
    #[serde(skip_serializing_if = "is_empty")]
    pub results: &'a [ItemReport],
}

fn is_empty<T>(items: &&[T]) -> bool {
    items.is_empty()
}

/// Reporter for accumulating and outputting results
pub struct Reporter {
    format: OutputFormat,
    verbose: bool,
    plan: Option<Plan>,
    mode: Option<RunMode>,
    results: Vec<ItemReport>,
    summary: Summary,
}

impl Reporter {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self {
            format,
            verbose,
            plan: None,
            mode: None,
            results: Vec::new(),
            summary: Summary::default(),
        }
    }

    /// Report a resolved plan. With `list_items`, every work item is
    /// printed in text mode.
    pub fn report_plan(&mut self, plan: Plan, list_items: bool) {
        self.summary.files = plan.files.len();
        self.summary.work_items = plan.items.len();
        self.summary.warnings = plan.diagnostics.len();

        for diagnostic in &plan.diagnostics {
            self.report_warning(diagnostic);
        }

        if self.format == OutputFormat::Text {
            println!("{}: {}", "Tool".bold(), plan.tool);
            if self.verbose || list_items {
                println!("{}", "Rules".bold());
                for rule in &plan.rules {
                    if rule.skip_paths.is_empty() {
                        println!("  {}", rule.id.to_string().green());
                    } else {
                        println!(
                            "  {} (skipped under {})",
                            rule.id.to_string().green(),
                            rule.skip_paths.join(", ")
                        );
                    }
                }
            }
            if list_items {
                println!("{}", "Work items".bold());
                for item in &plan.items {
                    println!("  {} {}", item.rule.to_string().cyan(), item.file.display());
                }
            }
        }

        self.plan = Some(plan);
    }

    /// Report the outcome of running a plan
    pub fn report_run(&mut self, report: RunReport, mode: RunMode) {
        self.mode = Some(mode);
        self.summary.changed = report.changed();
        self.summary.unchanged = report.unchanged();
        self.summary.failed = report.failed();

        if self.format == OutputFormat::Text {
            for result in &report.items {
                match &result.status {
                    ItemStatus::Changed => println!(
                        "  {} {} {}",
                        "->".green(),
                        result.item.rule,
                        result.item.file.display()
                    ),
                    ItemStatus::Unchanged if self.verbose => println!(
                        "  {} {}: No changes needed",
                        result.item.rule,
                        result.item.file.display()
                    ),
                    ItemStatus::Unchanged => {}
                    ItemStatus::Failed { message } => eprintln!(
                        "{}: {} {} - {}",
                        "Warning".yellow(),
                        result.item.rule,
                        result.item.file.display(),
                        message
                    ),
                }
            }
        }

        self.results = report.items;
    }

    fn report_warning(&self, diagnostic: &Diagnostic) {
        if self.format == OutputFormat::Text {
            eprintln!("{}: {}", "Warning".yellow(), diagnostic);
        }
    }

    /// Print final summary/output
    pub fn finish(self) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                println!();
                println!("{}", "Summary".bold().underline());
                println!("  Files: {}", self.summary.files);
                println!("  Work items: {}", self.summary.work_items);
                if self.mode.is_some() {
                    println!("  Changed: {}", self.summary.changed);
                    println!("  Unchanged: {}", self.summary.unchanged);
                }
                if self.summary.failed > 0 {
                    println!("  Failed: {}", self.summary.failed);
                }
                if self.summary.warnings > 0 {
                    println!("  Warnings: {}", self.summary.warnings);
                }

                if self.mode == Some(RunMode::DryRun) && self.summary.changed > 0 {
                    println!();
                    println!("{}", "Run without --dry-run to apply changes".yellow());
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&self.json_output())?);
            }
        }
        Ok(())
    }

    /// The JSON document: the plan itself for `plan`, per-item results for
    /// `process`, and the diagnostics in both
    pub fn json_output(&self) -> JsonOutput<'_> {
        JsonOutput {
            version: env!("CARGO_PKG_VERSION"),
            tool: self.plan.as_ref().map(|p| p.tool),
            mode: self.mode,
            summary: &self.summary,
            plan: if self.mode.is_none() {
                self.plan.as_ref()
            } else {
                None
            },
            diagnostics: self
                .plan
                .as_ref()
                .map(|p| p.diagnostics.as_slice())
                .unwrap_or_default(),
            results: &self.results,
        }
    }

    /// Get summary for exit code determination
    pub fn summary(&self) -> &Summary {
        &self.summary
    }
}
