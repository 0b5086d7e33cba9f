//! rework-sets: built-in rule-set tables for rework
//!
//! Provides the catalog the resolver expands set identifiers against:
//! Rector's PHP level sets and TYPO3 sets, Fractor's TYPO3 sets for
//! FlexForm, TypoScript, Fluid, YAML and .htaccess files, and the
//! PHP-CS-Fixer presets. Extra sets can be layered on top from YAML.

pub mod fixer;
pub mod fractor;
pub mod loader;
pub mod rector;
pub mod registry;

pub use loader::{load_catalog_file, load_catalog_str, LoadError};
pub use registry::{BuiltinCatalog, RuleDef, SetDef, ToolTables};
