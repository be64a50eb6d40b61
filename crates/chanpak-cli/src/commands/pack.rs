//! `chanpak pack` - the batch channel-packing pipeline.
//!
//! Per folder under the input root: classify files into texture sets,
//! decide which packing modes each set supports, composite and save the
//! packed textures, then move or delete the consumed sources.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::bail;
use chanpak_config::{normalize_modes, PackConfig, PackingMode, ResizeStrategy};
use chanpak_core::{
    build_texture_sets, candidate_modes, compose, image_io, pick_target_resolution,
    resolve::{rescale_diagnostics, suffix_mismatches},
    ComposeInput, ResolutionIssue, RunReport, SizeSuffixDetector, SuffixTypeMatcher, TextureSet,
};

use crate::output;
use crate::printer;
use crate::workspace::{self, ScannedFolder};

pub fn run(
    input: Option<&str>,
    config_path: Option<&str>,
    verbose: bool,
) -> anyhow::Result<ExitCode> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;
    let verbose = verbose || config.show_details;
    config.validate()?;

    if !config.strategy_is_known() {
        printer::warn(&format!(
            "Unknown RESIZE_STRATEGY '{}'. Defaulting to 'down'.",
            config.resize_strategy
        ));
    }

    let modes = normalize_modes(&config.packing_modes, config.table())?;
    if modes.is_empty() {
        bail!("no packing modes configured");
    }

    let input_folder = input
        .map(str::to_string)
        .unwrap_or_else(|| config.input_folder.clone());
    let input_folder = input_folder.trim().to_string();
    if input_folder.is_empty() {
        bail!("no input folder provided (pass one as an argument or set INPUT_FOLDER)");
    }
    let root = Path::new(&input_folder);
    if !root.is_dir() {
        bail!("input folder does not exist: {input_folder}");
    }
    let root = root.canonicalize()?;

    let size_detector = SizeSuffixDetector::new(&config.size_suffixes)?;
    let matcher = SuffixTypeMatcher::new(config.table(), &config.size_suffixes)?;
    let mode_suffixes: BTreeSet<String> = modes
        .iter()
        .map(|m| m.suffix.to_ascii_uppercase())
        .collect();

    let folders = workspace::scan_input(
        &root,
        &config.dest_folder_name,
        &config.backup_folder_name,
        &mode_suffixes,
        &size_detector,
    );
    if folders.is_empty() {
        let allowed = chanpak_config::ALLOWED_INPUT_EXTENSIONS
            .iter()
            .map(|e| format!(".{e}"))
            .collect::<Vec<_>>()
            .join(", ");
        bail!("no input files matching {allowed} in: {}", root.display());
    }

    let multiple_folders = folders.len() > 1;
    let strategy = config.effective_strategy();
    let mut report = RunReport::new();

    for folder in &folders {
        let folder_path = folder_absolute_path(&root, folder);
        let dest_dir = resolve_subfolder(&folder_path, &config.dest_folder_name);
        output::ensure_directory(&dest_dir)?;
        let backup_dir = {
            let name = config.backup_folder_name.trim();
            if name.is_empty() {
                None
            } else {
                let dir = folder_path.join(name);
                output::ensure_directory(&dir)?;
                Some(dir)
            }
        };

        let prefix = if multiple_folders {
            if folder.relative == "." {
                "[ROOT] ".to_string()
            } else {
                format!("[{}] ", folder.relative)
            }
        } else {
            String::new()
        };

        let mut sets = build_texture_sets(&folder.relative, &folder.files, &matcher, |p| {
            image_io::probe_dimensions(p).ok()
        });

        for set in sets.values_mut() {
            process_set(
                set,
                &modes,
                strategy,
                &config,
                &dest_dir,
                backup_dir.as_deref(),
                &prefix,
                verbose,
                &mut report,
            );
        }

        for set in sets.values() {
            if !set.processed {
                report.add_skipped_set(&set.folder, &set.name, set.all_filenames());
            }
        }
    }

    print_final_summary(&report, &config, &root, &folders, multiple_folders, verbose);
    if verbose {
        printer::info(&format!(
            "Execution time: {:.2} seconds",
            start.elapsed().as_secs_f64()
        ));
    }
    Ok(ExitCode::SUCCESS)
}

fn folder_absolute_path(root: &Path, folder: &ScannedFolder) -> PathBuf {
    if folder.relative == "." {
        root.to_path_buf()
    } else {
        root.join(&folder.relative)
    }
}

/// Empty folder names mean "write next to the sources".
fn resolve_subfolder(folder_path: &Path, name: &str) -> PathBuf {
    let name = name.trim();
    if name.is_empty() {
        folder_path.to_path_buf()
    } else {
        folder_path.join(name)
    }
}

#[allow(clippy::too_many_arguments)]
fn process_set(
    set: &mut TextureSet,
    modes: &[PackingMode],
    strategy: ResizeStrategy,
    config: &PackConfig,
    dest_dir: &Path,
    backup_dir: Option<&Path>,
    prefix: &str,
    verbose: bool,
    report: &mut RunReport,
) {
    let candidates = candidate_modes(set, modes);
    if candidates.is_empty() {
        // Leaves `processed` false; the set lands in the end-of-run summary.
        return;
    }

    printer::blank();
    printer::info(&format!("Processing: {prefix}{}", set.name));

    // Mode name to the offending resolution; (0, 0) marks
    // unreadable sources.
    let mut invalid: BTreeMap<String, (u32, u32)> = BTreeMap::new();
    let mut ready = Vec::new();
    let mut suffix_buffer = Vec::new();
    let mut shown_resolution_warning = false;

    for candidate in &candidates {
        match pick_target_resolution(&candidate.maps, strategy) {
            Err(ResolutionIssue::Unreadable) => {
                invalid.insert(candidate.mode.name.clone(), (0, 0));
            }
            Err(ResolutionIssue::NonPowerOfTwo { width, height }) => {
                invalid.insert(candidate.mode.name.clone(), (width, height));
            }
            Ok(target) => {
                let to_scale = rescale_diagnostics(&candidate.maps, target);
                if !to_scale.is_empty() {
                    if !shown_resolution_warning {
                        if verbose {
                            printer::warn(&format!(
                                "Texture set resolution mismatch. Resize strategy set to '{}'.",
                                config.resize_strategy
                            ));
                        } else {
                            printer::warn("Texture set resolution mismatch.");
                        }
                        shown_resolution_warning = true;
                    }
                    if verbose {
                        for note in &to_scale {
                            printer::info(&format!(
                                "Rescaling {} ({}x{}) to {}x{}",
                                note.filename, note.from.0, note.from.1, target.0, target.1
                            ));
                        }
                    }
                }
                suffix_buffer.extend(suffix_mismatches(&candidate.maps));
                ready.push((candidate, target));
            }
        }
    }

    if !suffix_buffer.is_empty() {
        printer::warn("Suffix resolution mismatch.");
        if verbose {
            for note in &suffix_buffer {
                printer::info(&format!(
                    "{} but it's {}x{}",
                    note.filename, note.actual.0, note.actual.1
                ));
            }
        }
    }

    for (candidate, _) in &ready {
        let missing = candidate.missing_types();
        if !missing.is_empty() {
            printer::warn(&format!(
                "Missing some texture maps for '{}'.",
                candidate.mode.name
            ));
            if verbose {
                for name in &missing {
                    printer::info(&format!("Default value: {name}"));
                }
            }
        }
    }

    let mut created: BTreeMap<String, (String, (u32, u32))> = BTreeMap::new();
    let mut consumed: BTreeSet<PathBuf> = BTreeSet::new();
    for (candidate, target) in &ready {
        let result = compose(&ComposeInput {
            set_name: &set.name,
            mode: candidate.mode,
            maps: &candidate.maps,
            target: *target,
            table: config.table(),
        });
        for failure in &result.load_failures {
            printer::warn(&format!(
                "Failed to open '{}' ({}), using default value.",
                failure.path.display(),
                failure.message
            ));
        }

        let filename = format!(
            "{}.{}",
            result.file_stem,
            config.file_type.trim().to_ascii_lowercase()
        );
        let out_path = dest_dir.join(&filename);
        match image_io::save(&result.image, &out_path) {
            Ok(()) => {
                report.add_created(&set.folder, filename.clone(), &candidate.mode.name, *target);
                created.insert(candidate.mode.name.clone(), (filename, *target));
                for entry in candidate.maps.values() {
                    // A map shared by two modes is consumed once.
                    if !consumed.insert(entry.path.clone()) {
                        continue;
                    }
                    if let Some(backup_dir) = backup_dir {
                        report.add_file_operation(output::move_to_backup(
                            &entry.path,
                            backup_dir,
                        ));
                    } else if config.delete_used {
                        report.add_file_operation(output::delete_source(&entry.path));
                    }
                }
            }
            Err(err) => {
                printer::error(&format!(
                    "Failed to save '{}': {err}",
                    out_path.display()
                ));
            }
        }
    }

    for mode in modes {
        if let Some((width, height)) = invalid.get(&mode.name) {
            if (*width, *height) == (0, 0) {
                printer::error(&format!(
                    "{prefix}'{}' Corrupted files missing resolution info - skipping mode.",
                    mode.name
                ));
            } else if verbose {
                printer::error(&format!(
                    "{prefix}'{}' Invalid resolution ({width}x{height}) - skipping mode.",
                    mode.name
                ));
            } else {
                printer::error(&format!(
                    "{prefix}'{}' Invalid resolution - skipping mode.",
                    mode.name
                ));
            }
            continue;
        }
        if let Some((filename, (width, height))) = created.get(&mode.name) {
            if verbose {
                printer::complete(&format!(
                    "{prefix}Created: {filename} ({width}x{height})"
                ));
            } else {
                printer::complete(&format!("{prefix}Created: {filename}"));
            }
        } else if verbose {
            printer::skip(&format!(
                "{prefix}'{}' for set '{}' (needs at least 2 required maps).",
                mode.name, set.name
            ));
        } else {
            printer::skip(&format!("{prefix}'{}' for set '{}'", mode.name, set.name));
        }
    }

    // All modes failing on resolution still counts as handled; the set
    // must not reappear in the missing-maps summary.
    set.processed = !created.is_empty() || !invalid.is_empty();
}

fn print_final_summary(
    report: &RunReport,
    config: &PackConfig,
    root: &Path,
    folders: &[ScannedFolder],
    multiple_folders: bool,
    verbose: bool,
) {
    if !report.skipped_sets.is_empty() {
        printer::blank();
        for skipped in &report.skipped_sets {
            let folder_prefix = if multiple_folders {
                let label = if skipped.folder == "." {
                    "ROOT"
                } else {
                    &skipped.folder
                };
                format!("[{label}] ")
            } else {
                String::new()
            };
            let details = if verbose && !skipped.files.is_empty() {
                format!(" (files: {})", skipped.files.join(", "))
            } else {
                String::new()
            };
            printer::info(&format!(
                "Info: {folder_prefix}Skipped '{}' set - missing required maps{details}",
                skipped.name
            ));
        }
    }

    printer::blank();
    printer::complete("All processing done.");

    let dest_name = config.dest_folder_name.trim();
    if !dest_name.is_empty() && report.packed_any() {
        if multiple_folders {
            printer::info(&format!(
                "Packed maps saved to '{dest_name}' subfolder(s) inside processed folders."
            ));
        } else if let Some(folder) = folders.first() {
            let dir = folder_absolute_path(root, folder).join(dest_name);
            printer::info(&format!("Packed maps saved to: {}", dir.display()));
        }
    }

    let backup_name = config.backup_folder_name.trim();
    if !backup_name.is_empty() && report.packed_any() {
        if multiple_folders {
            printer::info(&format!(
                "Source maps moved to backup folder '{backup_name}' inside processed folders."
            ));
        } else if let Some(folder) = folders.first() {
            let dir = folder_absolute_path(root, folder).join(backup_name);
            printer::info(&format!("Source maps moved to: {}", dir.display()));
        }
    }

    for op in report.failed_operations() {
        let action = match op.action {
            chanpak_core::FileAction::Backup => "back up",
            chanpak_core::FileAction::Delete => "delete",
        };
        let reason = match &op.outcome {
            chanpak_core::FileOutcome::NotFound => "file not found".to_string(),
            chanpak_core::FileOutcome::PermissionDenied => "permission denied".to_string(),
            chanpak_core::FileOutcome::Other(message) => message.clone(),
            chanpak_core::FileOutcome::Ok => continue,
        };
        printer::warn(&format!(
            "Could not {action} '{}': {reason}",
            op.path.display()
        ));
    }
}
