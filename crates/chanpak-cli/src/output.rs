//! Output-side filesystem operations: destination folders, backup moves and
//! source deletion.
//!
//! Backup and delete failures never abort a run; each operation returns a
//! [`FileOperation`] with an explicit outcome so the end-of-run summary can
//! list what went wrong.

use std::io;
use std::path::{Path, PathBuf};

use chanpak_core::{FileAction, FileOperation, FileOutcome};

pub fn ensure_directory(path: &Path) -> io::Result<()> {
    std::fs::create_dir_all(path)
}

fn classify(err: &io::Error) -> FileOutcome {
    match err.kind() {
        io::ErrorKind::NotFound => FileOutcome::NotFound,
        io::ErrorKind::PermissionDenied => FileOutcome::PermissionDenied,
        _ => FileOutcome::Other(err.to_string()),
    }
}

/// Pick a destination name inside `dir` that does not collide with an
/// existing file, appending `_1`, `_2`, ... before the extension.
fn collision_free_destination(dir: &Path, filename: &str) -> PathBuf {
    let direct = dir.join(filename);
    if !direct.exists() {
        return direct;
    }
    let (stem, extension) = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), format!(".{ext}")),
        _ => (filename.to_string(), String::new()),
    };
    let mut counter = 1u32;
    loop {
        let candidate = dir.join(format!("{stem}_{counter}{extension}"));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Move a consumed source map into the backup folder.
pub fn move_to_backup(source: &Path, backup_dir: &Path) -> FileOperation {
    let filename = source
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let destination = collision_free_destination(backup_dir, &filename);
    let outcome = match std::fs::rename(source, &destination) {
        Ok(()) => FileOutcome::Ok,
        Err(err) => classify(&err),
    };
    FileOperation {
        path: source.to_path_buf(),
        action: FileAction::Backup,
        outcome,
    }
}

/// Delete a consumed source map.
pub fn delete_source(source: &Path) -> FileOperation {
    let outcome = match std::fs::remove_file(source) {
        Ok(()) => FileOutcome::Ok,
        Err(err) => classify(&err),
    };
    FileOperation {
        path: source.to_path_buf(),
        action: FileAction::Delete,
        outcome,
    }
}
