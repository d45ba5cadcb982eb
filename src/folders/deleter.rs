use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::error::FailureKind;
use crate::pool::WorkerPool;

/// Per-folder result of a delete attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    Deleted,
    Failed(FailureKind),
}

impl DeletionOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeletionOutcome::Deleted)
    }
}

/// Every folder a delete run attempted, with its outcome.
#[derive(Debug, Default)]
pub struct DeletionReport {
    pub outcomes: Vec<(PathBuf, DeletionOutcome)>,
}

impl DeletionReport {
    pub fn deleted(&self) -> Vec<PathBuf> {
        self.outcomes
            .iter()
            .filter(|(_, o)| o.is_deleted())
            .map(|(p, _)| p.clone())
            .collect()
    }

    pub fn deleted_count(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_deleted()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.deleted_count()
    }

    pub fn outcome_for(&self, path: &Path) -> Option<&DeletionOutcome> {
        self.outcomes
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, o)| o)
    }
}

pub struct FolderDeleter<'a> {
    pool: &'a WorkerPool,
    recursive: bool,
}

impl<'a> FolderDeleter<'a> {
    /// By default a folder is only removed if it is still empty when its
    /// turn comes; anything written into it after the scan survives.
    pub fn new(pool: &'a WorkerPool) -> Self {
        Self {
            pool,
            recursive: false,
        }
    }

    /// Remove whole trees without re-checking emptiness.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Delete every folder and wait for all attempts to finish. A failure
    /// is logged and recorded; it never stops the other deletions.
    pub fn delete_all(&self, folders: &[PathBuf]) -> DeletionReport {
        let mut seen = HashSet::new();
        let unique: Vec<PathBuf> = folders
            .iter()
            .filter(|p| seen.insert(p.as_path()))
            .cloned()
            .collect();

        let recursive = self.recursive;
        let outcomes = self.pool.run_all(unique, |folder| {
            let outcome = delete_folder(&folder, recursive);
            (folder, outcome)
        });
        DeletionReport { outcomes }
    }
}

fn delete_folder(folder: &Path, recursive: bool) -> DeletionOutcome {
    let result = if recursive {
        fs::remove_dir_all(folder)
    } else {
        fs::remove_dir(folder)
    };
    record_outcome(folder, result)
}

fn record_outcome(folder: &Path, result: io::Result<()>) -> DeletionOutcome {
    match result {
        Ok(()) => {
            info!("Deleted: {}", folder.display());
            DeletionOutcome::Deleted
        }
        Err(e) => {
            let kind = FailureKind::from_io(&e);
            match &kind {
                FailureKind::PermissionDenied => {
                    debug!("Permission denied: {}. Error: {}", folder.display(), e)
                }
                FailureKind::NotFound => {
                    debug!("Folder not found: {}. Error: {}", folder.display(), e)
                }
                FailureKind::NotEmpty => {
                    warn!("Skipped {}: no longer empty", folder.display())
                }
                FailureKind::Other(_) => {
                    error!("Error deleting {}: {}", folder.display(), e)
                }
            }
            DeletionOutcome::Failed(kind)
        }
    }
}
