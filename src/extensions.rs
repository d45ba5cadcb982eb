//! Top-level extension check for one directory: report which files carry a
//! common extension, or tack a default one onto those that don't.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::error::{FailureKind, TidyError};

/// Lowercase, dot-prefixed.
pub const KNOWN_EXTENSIONS: &[&str] = &[
    ".mkv", ".txt", ".jpg", ".png", ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".mp3", ".mp4",
    ".avi", ".ppt", ".pptx", ".msi", ".exe", ".zip", ".jpeg", ".part", ".py", ".java", ".gif",
    ".bmp", ".tif", ".tiff", ".wav", ".mov", ".rar", ".tar", ".gz", ".iso", ".html", ".css",
    ".js", ".json", ".xml", ".sql", ".csv", ".log", ".svg", ".ico", ".ini", ".cfg", ".md",
    ".bat", ".dll", ".class", ".jar", ".rpm", ".deb", ".sh", ".bin", ".key", ".pem",
];

pub const DEFAULT_TARGET_EXTENSION: &str = ".mp4";

/// `mp4` and `.mp4` both mean `.mp4`.
pub fn normalize_target(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}

/// Final extension of `name` including the dot, or `None`. Leading dots
/// don't start an extension, so `.bashrc` has none.
pub fn extension_of(name: &Path) -> Option<String> {
    name.extension()
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext.to_string_lossy()))
}

pub fn has_known_extension(name: &Path) -> bool {
    extension_of(name)
        .map(|ext| {
            let lower = ext.to_lowercase();
            KNOWN_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

/// Chosen once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionStrategy {
    /// Only report what each file has.
    Report,
    /// Rename files without a known extension to `<name><target>`.
    AppendDefault { target: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionOutcome {
    Known { path: PathBuf, ext: String },
    Unrecognized { path: PathBuf },
    Renamed { from: PathBuf, to: PathBuf },
    RenameFailed { path: PathBuf, reason: FailureKind },
    NotAFile { path: PathBuf },
}

#[derive(Debug, Default)]
pub struct ExtensionReport {
    pub outcomes: Vec<ExtensionOutcome>,
}

impl ExtensionReport {
    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ExtensionOutcome::RenameFailed { .. }))
            .count()
    }

    pub fn exit_code(&self) -> u8 {
        if self.failed_count() > 0 {
            crate::exit::PARTIAL_FAILURE
        } else {
            crate::exit::SUCCESS
        }
    }

    pub fn renamed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ExtensionOutcome::Renamed { .. }))
            .count()
    }
}

/// Apply `strategy` to every entry directly inside `dir`. Entries come back
/// sorted by name; subdirectories are reported and skipped.
pub fn process_directory(
    dir: &Path,
    strategy: &ExtensionStrategy,
) -> Result<ExtensionReport, TidyError> {
    if !dir.exists() {
        return Err(TidyError::PathNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(TidyError::NotADirectory(dir.to_path_buf()));
    }

    let read_err = |source| TidyError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };
    let entries = fs::read_dir(dir).map_err(read_err)?;
    let mut paths = readable_entries(dir, entries.map(|entry| entry.map(|e| e.path())));
    paths.sort();

    let mut report = ExtensionReport::default();
    for path in paths {
        debug!("Checking file: {}", path.display());
        let outcome = if path.is_file() {
            handle_file(path, strategy)
        } else {
            debug!("{} is not a file", path.display());
            ExtensionOutcome::NotAFile { path }
        };
        report.outcomes.push(outcome);
    }
    Ok(report)
}

/// Entries that could be read; the rest are logged and skipped.
fn readable_entries(
    dir: &Path,
    entries: impl Iterator<Item = io::Result<PathBuf>>,
) -> Vec<PathBuf> {
    entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Error reading an entry of {}: {}", dir.display(), e);
                None
            }
        })
        .collect()
}

fn handle_file(path: PathBuf, strategy: &ExtensionStrategy) -> ExtensionOutcome {
    let known = has_known_extension(&path);
    match strategy {
        _ if known => {
            let ext = extension_of(&path).unwrap_or_default();
            info!("{} has a known extension: {}", path.display(), ext);
            ExtensionOutcome::Known { path, ext }
        }
        ExtensionStrategy::Report => {
            info!("{} has no known extension", path.display());
            ExtensionOutcome::Unrecognized { path }
        }
        ExtensionStrategy::AppendDefault { target } => append_extension(path, target),
    }
}

fn append_extension(path: PathBuf, target: &str) -> ExtensionOutcome {
    let mut renamed: OsString = path.clone().into_os_string();
    renamed.push(target);
    let renamed = PathBuf::from(renamed);

    // rename(2) would silently replace an existing file
    if renamed.exists() {
        error!(
            "Failed to rename {} to {}: destination exists",
            path.display(),
            renamed.display()
        );
        return ExtensionOutcome::RenameFailed {
            path,
            reason: FailureKind::Other(format!("{} already exists", renamed.display())),
        };
    }

    match fs::rename(&path, &renamed) {
        Ok(()) => {
            info!("Renamed: {} -> {}", path.display(), renamed.display());
            ExtensionOutcome::Renamed {
                from: path,
                to: renamed,
            }
        }
        Err(e) => {
            error!(
                "Failed to rename {} to {}: {}",
                path.display(),
                renamed.display(),
                e
            );
            ExtensionOutcome::RenameFailed {
                path,
                reason: FailureKind::from_io(&e),
            }
        }
    }
}
