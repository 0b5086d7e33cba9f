//! Coarse file classification used to decide which rules apply to a file

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Php,
    /// XML, including FlexForm data structures
    Xml,
    TypoScript,
    Yaml,
    /// Fluid templates, layouts and partials
    Fluid,
    Htaccess,
    Other,
}

impl FileKind {
    pub fn of(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if file_name == ".htaccess" {
            return FileKind::Htaccess;
        }
        // Legacy TypoScript files
        if file_name == "setup.txt" || file_name == "constants.txt" {
            return FileKind::TypoScript;
        }

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "php" => FileKind::Php,
            "xml" => FileKind::Xml,
            "typoscript" | "tsconfig" => FileKind::TypoScript,
            "yaml" | "yml" => FileKind::Yaml,
            "fluid" => FileKind::Fluid,
            "html" if is_template_path(path) => FileKind::Fluid,
            _ => FileKind::Other,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "php" => Some(FileKind::Php),
            "xml" | "flexform" => Some(FileKind::Xml),
            "typoscript" => Some(FileKind::TypoScript),
            "yaml" | "yml" => Some(FileKind::Yaml),
            "fluid" => Some(FileKind::Fluid),
            "htaccess" => Some(FileKind::Htaccess),
            "other" => Some(FileKind::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Php => "php",
            FileKind::Xml => "xml",
            FileKind::TypoScript => "typoscript",
            FileKind::Yaml => "yaml",
            FileKind::Fluid => "fluid",
            FileKind::Htaccess => "htaccess",
            FileKind::Other => "other",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTML under `Resources/Private` is a Fluid template
fn is_template_path(path: &Path) -> bool {
    let names: Vec<_> = path.components().map(|c| c.as_os_str()).collect();
    names
        .windows(2)
        .any(|pair| pair[0] == "Resources" && pair[1] == "Private")
}
