//! Filesystem snapshot
//!
//! The resolver never touches the disk for path resolution. It works on a
//! sorted listing taken once at the start of a run.

use std::collections::BTreeSet;
use std::ops::Bound;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A sorted, deduplicated set of file paths, ordered by `Path`'s `Ord`:
/// component by component, so `/ext/a/x.php` sorts before `/ext/a-b/x.php`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileListing {
    files: BTreeSet<PathBuf>,
}

impl FileListing {
    /// Build a listing from already known paths (tests, dry runs on a
    /// recorded snapshot)
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            files: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Walk the given roots and record every regular file below them.
    /// Missing roots are ignored; the resolver reports include patterns
    /// that match nothing.
    pub fn scan<P: AsRef<Path>>(roots: &[P]) -> std::io::Result<Self> {
        let mut files = BTreeSet::new();

        for root in roots {
            let root = root.as_ref();
            if root.is_file() {
                files.insert(root.to_path_buf());
                continue;
            }
            if !root.is_dir() {
                continue;
            }

            for entry in WalkDir::new(root)
                .follow_links(false)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                files.insert(entry.into_path());
            }
        }

        Ok(Self { files })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.iter()
    }

    /// Files at or below `dir`. Paths order by component, so the subtree is
    /// one contiguous range starting at `dir` itself.
    pub fn under<'a, 'd>(&'a self, dir: &'d Path) -> impl Iterator<Item = &'a PathBuf> + 'd
    where
        'a: 'd,
    {
        self.files
            .range::<Path, _>((Bound::Included(dir), Bound::Unbounded))
            .take_while(move |path| path.starts_with(dir))
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for FileListing {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::from_paths(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_under_returns_subtree_only() {
        let listing = FileListing::from_paths([
            "/ext/Configuration/TCA/x.php",
            "/ext/Configuration/Cache/y.php",
            "/ext/ConfigurationX/z.php",
            "/ext/Resources/Private/z.fluid",
        ]);

        let under: Vec<&PathBuf> = listing.under(Path::new("/ext/Configuration")).collect();
        assert_eq!(
            under,
            vec![
                &PathBuf::from("/ext/Configuration/Cache/y.php"),
                &PathBuf::from("/ext/Configuration/TCA/x.php"),
            ]
        );
    }

    #[test]
    fn test_under_exact_file() {
        let listing = FileListing::from_paths(["/ext/ext_emconf.php", "/ext/ext_localconf.php"]);
        let under: Vec<&PathBuf> = listing.under(Path::new("/ext/ext_emconf.php")).collect();
        assert_eq!(under, vec![&PathBuf::from("/ext/ext_emconf.php")]);
    }

    #[test]
    fn test_from_paths_deduplicates() {
        let listing = FileListing::from_paths(["/a/b.php", "/a/b.php", "/a/a.php"]);
        assert_eq!(listing.len(), 2);
        assert_eq!(listing.iter().next(), Some(&PathBuf::from("/a/a.php")));
    }

    #[test]
    fn test_scan_directory() {
        let temp = TempDir::new().unwrap();
        let classes = temp.path().join("Classes");
        fs::create_dir_all(classes.join("Controller")).unwrap();
        fs::write(classes.join("Controller/ListController.php"), "<?php").unwrap();
        fs::write(classes.join("Service.php"), "<?php").unwrap();

        let listing = FileListing::scan(&[classes.clone(), temp.path().join("Missing")]).unwrap();

        assert_eq!(listing.len(), 2);
        assert!(listing.contains(&classes.join("Service.php")));
        assert!(listing.contains(&classes.join("Controller/ListController.php")));
    }

    #[test]
    fn test_scan_single_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("ext_emconf.php");
        fs::write(&file, "<?php").unwrap();

        let listing = FileListing::scan(&[file.clone()]).unwrap();
        assert_eq!(listing.len(), 1);
        assert!(listing.contains(&file));
    }
}
