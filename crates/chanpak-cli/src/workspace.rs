//! Input scanning: walk the input tree, keep supported image files, drop
//! leftovers from previous runs, and group everything by folder.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chanpak_config::ALLOWED_INPUT_EXTENSIONS;
use chanpak_core::SizeSuffixDetector;
use walkdir::WalkDir;

/// One folder's worth of input files, in scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFolder {
    /// Path relative to the scan root, `"."` for the root itself. Uses `/`
    /// separators regardless of platform.
    pub relative: String,
    pub files: Vec<PathBuf>,
}

fn has_allowed_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let lower = e.to_ascii_lowercase();
            ALLOWED_INPUT_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

/// Whether a stem looks like an output of a previous run: after stripping a
/// trailing size token, its last `_` token equals one of the mode suffixes.
fn is_already_packed(
    stem: &str,
    mode_suffixes: &BTreeSet<String>,
    size_detector: &SizeSuffixDetector,
) -> bool {
    let base = match size_detector.detect(stem) {
        Some(token) => &stem[..stem.len() - token.len() - 1],
        None => stem,
    };
    let last_token = base.rsplit('_').next().unwrap_or(base);
    mode_suffixes.contains(&last_token.to_ascii_uppercase())
}

fn relative_label(root: &Path, parent: &Path) -> String {
    match parent.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => ".".to_string(),
    }
}

/// Walk `root` and return the candidate input files grouped per folder.
///
/// Destination and backup folders are pruned from the walk so a re-run
/// never picks up its own outputs or backups.
pub fn scan_input(
    root: &Path,
    dest_folder_name: &str,
    backup_folder_name: &str,
    mode_suffixes: &BTreeSet<String>,
    size_detector: &SizeSuffixDetector,
) -> Vec<ScannedFolder> {
    let excluded: Vec<&str> = [dest_folder_name.trim(), backup_folder_name.trim()]
        .into_iter()
        .filter(|n| !n.is_empty())
        .collect();

    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

    let walker = WalkDir::new(root).follow_links(false).into_iter();
    for entry in walker.filter_entry(|e| {
        !(e.file_type().is_dir()
            && e.file_name()
                .to_str()
                .is_some_and(|name| excluded.contains(&name)))
    }) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => continue,
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !has_allowed_extension(path) {
            continue;
        }
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        if is_already_packed(&stem, mode_suffixes, size_detector) {
            continue;
        }

        let parent = path.parent().unwrap_or(root);
        groups
            .entry(relative_label(root, parent))
            .or_default()
            .push(path.to_path_buf());
    }

    groups
        .into_iter()
        .map(|(relative, mut files)| {
            files.sort();
            ScannedFolder { relative, files }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> SizeSuffixDetector {
        SizeSuffixDetector::new(&[
            "512".to_string(),
            "1k".to_string(),
            "2k".to_string(),
            "4k".to_string(),
            "8k".to_string(),
        ])
        .unwrap()
    }

    fn suffixes(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"x").unwrap();
    }

    #[test]
    fn groups_files_by_folder_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("Wall_AO.png"));
        touch(&dir.path().join("bricks/Brick_AO.png"));
        touch(&dir.path().join("bricks/old/Brick_Roughness.tga"));

        let folders = scan_input(dir.path(), "created_maps", "", &suffixes(&[]), &detector());
        let labels: Vec<&str> = folders.iter().map(|f| f.relative.as_str()).collect();
        assert_eq!(labels, vec![".", "bricks", "bricks/old"]);
        assert_eq!(folders[0].files.len(), 1);
    }

    #[test]
    fn ignores_unsupported_extensions() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("Wall_AO.png"));
        touch(&dir.path().join("Wall_AO.psd"));
        touch(&dir.path().join("notes.txt"));

        let folders = scan_input(dir.path(), "created_maps", "", &suffixes(&[]), &detector());
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].files.len(), 1);
    }

    #[test]
    fn exr_sources_are_discovered() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("Wall_Height.exr"));
        touch(&dir.path().join("Wall_AO.png"));

        let folders = scan_input(dir.path(), "created_maps", "", &suffixes(&[]), &detector());
        let names: Vec<String> = folders[0]
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Wall_AO.png", "Wall_Height.exr"]);
    }

    #[test]
    fn prunes_dest_and_backup_folders() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("Wall_AO.png"));
        touch(&dir.path().join("created_maps/Wall_ARM.png"));
        touch(&dir.path().join("used_maps/Wall_Roughness.png"));

        let folders = scan_input(
            dir.path(),
            "created_maps",
            "used_maps",
            &suffixes(&[]),
            &detector(),
        );
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].relative, ".");
    }

    #[test]
    fn filters_outputs_of_previous_runs() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("Wall_AO.png"));
        touch(&dir.path().join("Wall_ARM.png"));
        touch(&dir.path().join("Wall_ARM_2K.png"));
        touch(&dir.path().join("Wall_Roughness_2K.png"));

        let folders = scan_input(
            dir.path(),
            "created_maps",
            "",
            &suffixes(&["ARM"]),
            &detector(),
        );
        let names: Vec<String> = folders[0]
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Wall_AO.png", "Wall_Roughness_2K.png"]);
    }

    #[test]
    fn already_packed_check_is_case_insensitive() {
        let detector = detector();
        let suffixes = suffixes(&["ARM"]);
        assert!(is_already_packed("Wall_arm", &suffixes, &detector));
        assert!(is_already_packed("Wall_ARM_2k", &suffixes, &detector));
        assert!(!is_already_packed("Wall_AO", &suffixes, &detector));
        assert!(!is_already_packed("Wall_ARMOR", &suffixes, &detector));
    }
}
