//! rework-core: configuration resolution for code-modification tools
//!
//! This crate turns a declarative tool configuration (include paths, skip
//! paths, rule-set selections and rule overrides) into the ordered list of
//! `(file, rule)` work items an external processing engine executes.
//!
//! - `Configuration`: the typed, immutable input
//! - `FileListing`: a sorted snapshot of the files on disk
//! - `Catalog`: the injectable rule-set tables
//! - `resolve_paths()`, `resolve_rules()`, `build_work_items()`: the resolver
//! - `Engine` / `run_work_items()`: the hand-off to a processing engine
//!
//! # Example
//!
//! ```no_run
//! use rework_core::{Configuration, FileListing, KindApplicability, MemoryCatalog, Resolver, Tool};
//! use std::path::Path;
//!
//! let catalog = MemoryCatalog::new();
//! let config = Configuration::new(Tool::Rector).include(["/ext/Classes"]);
//! let listing = FileListing::scan(&[Path::new("/ext")]).unwrap();
//!
//! let plan = Resolver::new(&catalog)
//!     .resolve(&config, &listing, &KindApplicability::new(&catalog, config.tool))
//!     .unwrap();
//! for item in &plan.items {
//!     println!("{} {}", item.rule, item.file.display());
//! }
//! ```

pub mod applicability;
pub mod catalog;
pub mod engine;
mod error;
pub mod kind;
pub mod listing;
pub mod logging;
mod model;
pub mod pattern;
pub mod resolver;

pub use applicability::{Applicability, KindApplicability};
pub use catalog::{Catalog, LayeredCatalog, MemoryCatalog, RuleInfo, SetMember};
pub use engine::{run_work_items, Engine, ItemReport, ItemStatus, Outcome, RunMode, RunReport};
pub use error::{ApplicabilityError, CatalogError, ConfigurationError, EngineFailure};
pub use kind::FileKind;
pub use listing::FileListing;
pub use model::{
    Configuration, OptionValue, OverrideAction, PathRule, PathRuleKind, RuleId, RuleOptions,
    RuleOverride, RuleSetReference, Tool, ToolOptions, WorkItem,
};
pub use pattern::PathPattern;
pub use resolver::{
    build_work_items, resolve_paths, resolve_rules, Diagnostic, PathResolution, Plan,
    ResolvedRule, Resolver, RuleResolution, WorkItemBuild,
};
