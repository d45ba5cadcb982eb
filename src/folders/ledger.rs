use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{error, info};

use crate::error::TidyError;

/// Timestamp spliced into the ledger filename.
pub const FILENAME_STAMP: &str = "%Y-%m-%d_%H-%M-%S";
/// Timestamp written on the header line.
pub const HEADER_STAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Audit file listing the folders a run deleted. Best effort: a failure to
/// write it does not undo anything.
pub struct DeletionLedger {
    base: PathBuf,
}

impl DeletionLedger {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Write the ledger stamped with the current local time.
    pub fn write(&self, folders: &[PathBuf]) -> Result<PathBuf, TidyError> {
        self.write_at(folders, Local::now())
    }

    pub fn write_at(
        &self,
        folders: &[PathBuf],
        now: DateTime<Local>,
    ) -> Result<PathBuf, TidyError> {
        let path = stamped_path(&self.base, &now);
        match write_body(&path, folders, &now) {
            Ok(()) => {
                info!("Deleted folders list saved to: {}", path.display());
                Ok(path)
            }
            Err(source) => {
                error!("Error saving deleted folders to {}: {}", path.display(), source);
                Err(TidyError::Ledger { path, source })
            }
        }
    }
}

/// `output/deleted.txt` -> `output/deleted_2024-05-01_13-45-09.txt`
pub fn stamped_path(base: &Path, now: &DateTime<Local>) -> PathBuf {
    let stamp = now.format(FILENAME_STAMP).to_string();

    let mut name: OsString = base.file_stem().map(OsString::from).unwrap_or_default();
    name.push("_");
    name.push(&stamp);
    if let Some(ext) = base.extension() {
        name.push(".");
        name.push(ext);
    }
    base.with_file_name(name)
}

fn write_body(path: &Path, folders: &[PathBuf], now: &DateTime<Local>) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "Deleted folders on {}:", now.format(HEADER_STAMP))?;
    for folder in folders {
        writeln!(out, "{}", folder.display())?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 13, 45, 9).unwrap()
    }

    #[test]
    fn stamp_goes_before_the_extension() {
        let p = stamped_path(Path::new("output/deleted_folders.txt"), &fixed_time());
        assert_eq!(
            p,
            PathBuf::from("output/deleted_folders_2024-05-01_13-45-09.txt")
        );
    }

    #[test]
    fn stamp_without_extension_is_appended() {
        let p = stamped_path(Path::new("/var/log/sweep"), &fixed_time());
        assert_eq!(p, PathBuf::from("/var/log/sweep_2024-05-01_13-45-09"));
    }

    #[test]
    fn only_the_last_extension_counts() {
        let p = stamped_path(Path::new("ledger.tar.gz"), &fixed_time());
        assert_eq!(p, PathBuf::from("ledger.tar_2024-05-01_13-45-09.gz"));
    }

    #[test]
    fn writes_header_and_one_line_per_folder() {
        let tmp = tempfile::tempdir().unwrap();
        let ledger = DeletionLedger::new(tmp.path().join("nested/out/deleted.txt"));
        let folders = vec![PathBuf::from("/x/a"), PathBuf::from("/x/b/empty1")];

        let path = ledger.write_at(&folders, fixed_time()).unwrap();
        let body = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = body.lines().collect();

        assert_eq!(
            path,
            tmp.path().join("nested/out/deleted_2024-05-01_13-45-09.txt")
        );
        assert_eq!(
            lines,
            vec!["Deleted folders on 2024-05-01 13:45:09:", "/x/a", "/x/b/empty1"]
        );
    }

    #[test]
    fn unwritable_location_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, "not a dir").unwrap();
        let ledger = DeletionLedger::new(blocker.join("deleted.txt"));

        let err = ledger.write_at(&[], fixed_time()).unwrap_err();
        assert!(matches!(err, TidyError::Ledger { .. }));
    }
}
