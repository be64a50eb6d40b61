//! Grouping classified files into texture sets.
//!
//! A set is everything in one folder that shares a name prefix: for
//! `Wall_AO.png`, `Wall_Roughness_2K.png` and `Wall_Normal_2K.png` the set is
//! `Wall` with three typed maps. Files whose type cannot be determined still
//! join a set (by best-guess name) so the final report can list them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::matcher::{MatchOutcome, SuffixTypeMatcher};

/// One source map inside a set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureMapEntry {
    pub path: PathBuf,
    /// `None` when the file could not be probed; such maps poison every
    /// mode that needs them.
    pub resolution: Option<(u32, u32)>,
    /// Lowercase size token declared in the filename, if any.
    pub size_suffix: Option<String>,
    pub filename: String,
}

/// All maps collected for one set name within one folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureSet {
    /// Original casing from the first file that named the set.
    pub name: String,
    /// Folder label relative to the scan root (`"."` for the root itself).
    pub folder: String,
    /// Typed maps keyed by lowercase canonical type name.
    pub maps: BTreeMap<String, TextureMapEntry>,
    /// Filenames that joined the set without a recognized type.
    pub untyped: Vec<String>,
    /// At least one mode produced an output, or got far enough to fail on
    /// resolution grounds. Sets still `false` at the end of a run are
    /// listed in the missing-required-maps summary.
    pub processed: bool,
}

impl TextureSet {
    fn new(name: String, folder: String) -> Self {
        Self {
            name,
            folder,
            maps: BTreeMap::new(),
            untyped: Vec::new(),
            processed: false,
        }
    }

    /// All filenames in the set, typed and untyped, sorted case-insensitively.
    pub fn all_filenames(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .maps
            .values()
            .map(|m| m.filename.clone())
            .chain(self.untyped.iter().cloned())
            .collect();
        names.sort_by_key(|n| n.to_ascii_lowercase());
        names.dedup();
        names
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn area(resolution: Option<(u32, u32)>) -> u64 {
    resolution.map_or(0, |(w, h)| u64::from(w) * u64::from(h))
}

/// Build texture sets for one folder's files, keyed by lowercase set name.
///
/// `probe` reads the actual resolution from disk; it runs once per typed
/// file. When the same type appears twice for a set (say a stray `_1k`
/// duplicate), the larger map wins.
pub fn build_texture_sets<F>(
    folder: &str,
    files: &[PathBuf],
    matcher: &SuffixTypeMatcher,
    mut probe: F,
) -> BTreeMap<String, TextureSet>
where
    F: FnMut(&Path) -> Option<(u32, u32)>,
{
    let mut sets: BTreeMap<String, TextureSet> = BTreeMap::new();

    for path in files {
        let stem = file_stem(path);
        match matcher.classify(&stem) {
            MatchOutcome::Matched(matched) => {
                let key = matched.set_name.to_ascii_lowercase();
                let set = sets
                    .entry(key)
                    .or_insert_with(|| TextureSet::new(matched.set_name, folder.to_string()));
                let entry = TextureMapEntry {
                    path: path.clone(),
                    resolution: probe(path),
                    size_suffix: matched.size_suffix,
                    filename: file_name(path),
                };
                let type_key = matched.type_name.to_ascii_lowercase();
                match set.maps.get(&type_key) {
                    Some(existing) if area(existing.resolution) >= area(entry.resolution) => {}
                    _ => {
                        set.maps.insert(type_key, entry);
                    }
                }
            }
            MatchOutcome::Untyped { fallback_set_name } => {
                let key = fallback_set_name.to_ascii_lowercase();
                let set = sets
                    .entry(key)
                    .or_insert_with(|| TextureSet::new(fallback_set_name, folder.to_string()));
                set.untyped.push(file_name(path));
            }
        }
    }

    sets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chanpak_config::PackConfig;
    use pretty_assertions::assert_eq;

    fn matcher() -> SuffixTypeMatcher {
        let config = PackConfig::default();
        SuffixTypeMatcher::new(config.table(), &config.size_suffixes).unwrap()
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn groups_maps_by_set_name() {
        let files = paths(&[
            "Wall_AO_2K.png",
            "Wall_Roughness_2K.png",
            "Floor_AO.png",
        ]);
        let sets = build_texture_sets(".", &files, &matcher(), |_| Some((2048, 2048)));

        assert_eq!(sets.len(), 2);
        let wall = &sets["wall"];
        assert_eq!(wall.name, "Wall");
        assert_eq!(wall.maps.len(), 2);
        assert!(wall.maps.contains_key("ao"));
        assert!(wall.maps.contains_key("roughness"));
        assert_eq!(wall.maps["ao"].size_suffix.as_deref(), Some("2k"));
        assert_eq!(sets["floor"].maps["ao"].size_suffix, None);
    }

    #[test]
    fn first_file_fixes_original_casing() {
        let files = paths(&["WALL_AO.png", "wall_roughness.png"]);
        let sets = build_texture_sets(".", &files, &matcher(), |_| Some((512, 512)));
        assert_eq!(sets["wall"].name, "WALL");
        assert_eq!(sets["wall"].maps.len(), 2);
    }

    #[test]
    fn duplicate_type_keeps_larger_resolution() {
        let files = paths(&["Wall_AO_1K.png", "Wall_AO_2K.png"]);
        let sets = build_texture_sets(
            ".",
            &files,
            &matcher(),
            |p| {
                if p.to_string_lossy().contains("2K") {
                    Some((2048, 2048))
                } else {
                    Some((1024, 1024))
                }
            },
        );
        let wall = &sets["wall"];
        assert_eq!(wall.maps["ao"].resolution, Some((2048, 2048)));
        assert_eq!(wall.maps["ao"].filename, "Wall_AO_2K.png");
    }

    #[test]
    fn unreadable_duplicate_loses_to_readable() {
        let files = paths(&["Wall_AO_2K.png", "Wall_AO_1K.png"]);
        let sets = build_texture_sets(
            ".",
            &files,
            &matcher(),
            |p| {
                if p.to_string_lossy().contains("2K") {
                    None
                } else {
                    Some((1024, 1024))
                }
            },
        );
        assert_eq!(sets["wall"].maps["ao"].resolution, Some((1024, 1024)));
    }

    #[test]
    fn untyped_file_joins_set_by_guessed_name() {
        let files = paths(&["Wall_AO.png", "Wall_Photo.png"]);
        let sets = build_texture_sets(".", &files, &matcher(), |_| Some((512, 512)));
        let wall = &sets["wall"];
        assert_eq!(wall.untyped, vec!["Wall_Photo.png"]);
        assert_eq!(
            wall.all_filenames(),
            vec!["Wall_AO.png", "Wall_Photo.png"]
        );
    }

    #[test]
    fn untyped_only_file_forms_its_own_set() {
        let files = paths(&["lonesome.png"]);
        let sets = build_texture_sets(".", &files, &matcher(), |_| Some((512, 512)));
        let set = &sets["lonesome"];
        assert!(set.maps.is_empty());
        assert_eq!(set.untyped, vec!["lonesome.png"]);
    }

    #[test]
    fn probe_failure_is_recorded_as_unknown_resolution() {
        let files = paths(&["Wall_AO.png"]);
        let sets = build_texture_sets(".", &files, &matcher(), |_| None);
        assert_eq!(sets["wall"].maps["ao"].resolution, None);
    }
}
