//! Deciding whether a rule applies to a file

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::catalog::Catalog;
use crate::error::ApplicabilityError;
use crate::kind::FileKind;
use crate::model::{RuleId, Tool};

/// Answers "does this rule apply to this file"
pub trait Applicability {
    fn applies(&self, file: &Path, rule: &RuleId) -> Result<bool, ApplicabilityError>;
}

impl<F> Applicability for F
where
    F: Fn(&Path, &RuleId) -> Result<bool, ApplicabilityError>,
{
    fn applies(&self, file: &Path, rule: &RuleId) -> Result<bool, ApplicabilityError> {
        self(file, rule)
    }
}

/// Matches the file's kind against the kinds the catalog lists for the
/// rule. Rules with a content marker also require the file to contain it,
/// which is the only case that reads from disk.
pub struct KindApplicability<'c, C: Catalog + ?Sized> {
    catalog: &'c C,
    tool: Tool,
    contents: RefCell<HashMap<PathBuf, Rc<str>>>,
}

impl<'c, C: Catalog + ?Sized> KindApplicability<'c, C> {
    pub fn new(catalog: &'c C, tool: Tool) -> Self {
        Self {
            catalog,
            tool,
            contents: RefCell::new(HashMap::new()),
        }
    }

    fn read(&self, file: &Path) -> Result<Rc<str>, ApplicabilityError> {
        if let Some(content) = self.contents.borrow().get(file) {
            return Ok(Rc::clone(content));
        }

        let content: Rc<str> = std::fs::read_to_string(file)
            .map_err(|source| ApplicabilityError::Io {
                path: file.to_path_buf(),
                source,
            })?
            .into();
        self.contents
            .borrow_mut()
            .insert(file.to_path_buf(), Rc::clone(&content));
        Ok(content)
    }
}

impl<C: Catalog + ?Sized> Applicability for KindApplicability<'_, C> {
    fn applies(&self, file: &Path, rule: &RuleId) -> Result<bool, ApplicabilityError> {
        let info = self.catalog.rule_info(self.tool, rule).ok_or_else(|| {
            ApplicabilityError::Other(format!("no catalog entry for rule '{}'", rule))
        })?;

        if !info.kinds.contains(&FileKind::of(file)) {
            return Ok(false);
        }

        match &info.content_marker {
            Some(marker) => Ok(self.read(file)?.contains(marker.as_str())),
            None => Ok(true),
        }
    }
}
