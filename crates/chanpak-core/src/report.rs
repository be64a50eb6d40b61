//! Run report: what got created, what was skipped, and what happened to the
//! consumed source files.

use std::path::PathBuf;

/// Result of a single backup or delete operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Ok,
    NotFound,
    PermissionDenied,
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Backup,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOperation {
    pub path: PathBuf,
    pub action: FileAction,
    pub outcome: FileOutcome,
}

impl FileOperation {
    pub fn succeeded(&self) -> bool {
        self.outcome == FileOutcome::Ok
    }
}

/// One packed texture written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedOutput {
    /// Folder label relative to the scan root.
    pub folder: String,
    pub filename: String,
    pub mode: String,
    pub resolution: (u32, u32),
}

/// A set that produced nothing because no mode had its required maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSet {
    pub folder: String,
    pub name: String,
    pub files: Vec<String>,
}

/// Accumulated over a whole run; the CLI renders it at the end.
#[derive(Debug, Default)]
pub struct RunReport {
    pub created: Vec<CreatedOutput>,
    pub skipped_sets: Vec<SkippedSet>,
    pub file_operations: Vec<FileOperation>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_created(
        &mut self,
        folder: &str,
        filename: String,
        mode: &str,
        resolution: (u32, u32),
    ) {
        self.created.push(CreatedOutput {
            folder: folder.to_string(),
            filename,
            mode: mode.to_string(),
            resolution,
        });
    }

    pub fn add_skipped_set(&mut self, folder: &str, name: &str, files: Vec<String>) {
        self.skipped_sets.push(SkippedSet {
            folder: folder.to_string(),
            name: name.to_string(),
            files,
        });
    }

    pub fn add_file_operation(&mut self, operation: FileOperation) {
        self.file_operations.push(operation);
    }

    pub fn packed_any(&self) -> bool {
        !self.created.is_empty()
    }

    pub fn failed_operations(&self) -> impl Iterator<Item = &FileOperation> {
        self.file_operations.iter().filter(|op| !op.succeeded())
    }
}
