//! Project enumeration: which files are reference files, which are documents.
//!
//! Both walks are sorted by file name so that batches, and the reports
//! they produce, come out in the same order on every run.

use entsync_core::Profile;
use log::warn;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Reference files under `root`: the profile's reference extension, and a
/// lower-cased path (relative to `root`) containing a reference marker.
pub fn discover_reference_files(root: &Path, profile: &Profile) -> Vec<PathBuf> {
    let markers: Vec<String> = profile
        .discovery
        .reference_markers
        .iter()
        .map(|m| m.to_lowercase())
        .collect();

    walk_files(root)
        .filter(|path| has_extension(path, &profile.reference_extension))
        .filter(|path| {
            let relative = path.strip_prefix(root).unwrap_or(path);
            let lowered = relative.to_string_lossy().to_lowercase();
            markers.iter().any(|m| lowered.contains(m.as_str()))
        })
        .collect()
}

/// Candidate documents under `root`: the document extension, a parent
/// directory named like the profile's document directory, and no skip term
/// in the lower-cased file name.
pub fn discover_documents(root: &Path, profile: &Profile) -> Vec<PathBuf> {
    let discovery = &profile.discovery;
    let skip_terms: Vec<String> = discovery.skip_terms.iter().map(|t| t.to_lowercase()).collect();

    walk_files(root)
        .filter(|path| has_extension(path, &discovery.document_extension))
        .filter(|path| {
            path.parent()
                .and_then(|p| p.file_name())
                .is_some_and(|name| name.to_str() == Some(discovery.document_directory.as_str()))
        })
        .filter(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            !skip_terms.iter().any(|term| name.contains(term.as_str()))
        })
        .collect()
}

fn walk_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable path during discovery: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    fn relative(root: &Path, paths: Vec<PathBuf>) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_reference_files_need_marker_and_extension() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "dtd/boilerplate/editboil.ent");
        touch(dir.path(), "entities/notes.ent");
        touch(dir.path(), "Entities/Tools.ENT");
        touch(dir.path(), "local/private.ent");
        touch(dir.path(), "entities/readme.txt");

        let profile = Profile::builtin().unwrap();
        let found = relative(dir.path(), discover_reference_files(dir.path(), &profile));
        assert_eq!(
            found,
            vec!["Entities/Tools.ENT", "dtd/boilerplate/editboil.ent", "entities/notes.ent"]
        );
    }

    #[test]
    fn test_documents_live_in_files_directory() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "tm/files/wp0002.xml");
        touch(dir.path(), "tm/files/wp0001.xml");
        touch(dir.path(), "tm/files/chap01.xml");
        touch(dir.path(), "tm/files/TOC.xml");
        touch(dir.path(), "tm/files/nested/wp0003.xml");
        touch(dir.path(), "tm/other/wp0004.xml");
        touch(dir.path(), "tm/files/notes.txt");

        let profile = Profile::builtin().unwrap();
        let found = relative(dir.path(), discover_documents(dir.path(), &profile));
        assert_eq!(found, vec!["tm/files/wp0001.xml", "tm/files/wp0002.xml"]);
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let dir = tempdir().unwrap();
        let profile = Profile::builtin().unwrap();
        assert!(discover_documents(&dir.path().join("absent"), &profile).is_empty());
    }
}
