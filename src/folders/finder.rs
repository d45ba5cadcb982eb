use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::FailureKind;
use crate::pool::WorkerPool;
use crate::utils;

/// Result of checking one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emptiness {
    Empty,
    NotEmpty,
    /// The listing failed. Treated as not empty.
    Unreadable(FailureKind),
}

/// What a scan found. Built once, never modified afterwards.
#[derive(Debug, Default)]
pub struct EmptyFolderScan {
    /// Empty directories, in completion order.
    pub folders: Vec<PathBuf>,
    /// Directories whose listing was attempted.
    pub checked: usize,
    /// Directories (or subtrees) that could not be read.
    pub unreadable: usize,
}

impl EmptyFolderScan {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}

pub struct EmptyFolderFinder<'a> {
    pool: &'a WorkerPool,
}

impl<'a> EmptyFolderFinder<'a> {
    pub fn new(pool: &'a WorkerPool) -> Self {
        Self { pool }
    }

    /// Find every empty directory strictly below `root`.
    ///
    /// The root itself is never a candidate and symlinks are not followed.
    /// Directories that can't be listed are logged and left out, so the
    /// result can miss an empty folder but never reports a non-empty one.
    pub fn find(&self, root: &Path) -> EmptyFolderScan {
        let mut unreadable = HashSet::new();
        let mut candidates = Vec::new();

        for entry in WalkDir::new(root).follow_links(false).min_depth(1) {
            match entry {
                Ok(e) if e.file_type().is_dir() => candidates.push(e.into_path()),
                Ok(_) => {}
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    match e.io_error().map(FailureKind::from_io) {
                        Some(kind) if kind.is_quiet() => {
                            debug!("Skipping {}: {}", path.display(), kind)
                        }
                        _ => warn!("Error walking {}: {}", path.display(), e),
                    }
                    unreadable.insert(path);
                }
            }
        }

        debug!(
            "Checking {} directories under {} on {} workers",
            candidates.len(),
            root.display(),
            self.pool.threads()
        );

        let checked = candidates.len();
        let results = self.pool.run_all(candidates, |dir| {
            let state = check_folder(&dir);
            (dir, state)
        });

        let mut folders = Vec::new();
        for (dir, state) in results {
            match state {
                Emptiness::Empty => folders.push(dir),
                Emptiness::NotEmpty => {}
                // an unlistable dir also fails the walk; count it once
                Emptiness::Unreadable(_) => {
                    unreadable.insert(dir);
                }
            }
        }
        EmptyFolderScan {
            folders,
            checked,
            unreadable: unreadable.len(),
        }
    }
}

/// List `dir` once and classify it.
pub fn check_folder(dir: &Path) -> Emptiness {
    classify(dir, utils::is_empty_dir(dir))
}

fn classify(dir: &Path, listing: io::Result<bool>) -> Emptiness {
    match listing {
        Ok(true) => Emptiness::Empty,
        Ok(false) => Emptiness::NotEmpty,
        Err(e) => {
            let kind = FailureKind::from_io(&e);
            if kind == FailureKind::PermissionDenied {
                debug!("Permission denied: {}. Error: {}", dir.display(), e);
            } else {
                warn!("Error accessing {}: {}", dir.display(), e);
            }
            Emptiness::Unreadable(kind)
        }
    }
}
