//! Empty folder sweep: find, confirm, delete, record.
//!
//! Phases run strictly one after another. The scan finishes before anything
//! is shown to the user, and every deletion finishes before the ledger is
//! written.

pub mod deleter;
pub mod finder;
pub mod ledger;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use tracing::info;

use crate::error::TidyError;
use crate::exit;
use crate::output;
use crate::pool::WorkerPool;
use crate::prompt;

pub use deleter::{DeletionOutcome, DeletionReport, FolderDeleter};
pub use finder::{EmptyFolderFinder, EmptyFolderScan, Emptiness};
pub use ledger::DeletionLedger;

pub const DEFAULT_LEDGER: &str = "output/deleted_folders.txt";
pub const CONFIRM_QUESTION: &str = "Do you want to delete these folders? (yes/no): ";

#[derive(Debug, Clone)]
pub struct SweepOptions {
    pub root: PathBuf,
    pub ledger: PathBuf,
    pub jobs: usize,
    pub recursive: bool,
    pub dry_run: bool,
    /// Skip the confirmation prompt.
    pub assume_yes: bool,
}

impl SweepOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ledger: PathBuf::from(DEFAULT_LEDGER),
            jobs: crate::pool::default_jobs(),
            recursive: false,
            dry_run: false,
            assume_yes: false,
        }
    }
}

#[derive(Debug)]
pub enum SweepOutcome {
    NothingFound(EmptyFolderScan),
    /// Listed only, because of `--dry-run`.
    Listed(EmptyFolderScan),
    /// The user said something other than "yes".
    Declined(EmptyFolderScan),
    Completed(SweepReport),
}

impl SweepOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            SweepOutcome::Completed(report) => report.exit_code(),
            _ => exit::SUCCESS,
        }
    }
}

#[derive(Debug)]
pub struct SweepReport {
    pub scan: EmptyFolderScan,
    pub deletion: DeletionReport,
    pub ledger: Result<PathBuf, TidyError>,
}

impl SweepReport {
    /// A missing ledger outranks failed deletions.
    pub fn exit_code(&self) -> u8 {
        if self.ledger.is_err() {
            exit::LEDGER_FAILED
        } else if self.deletion.failed_count() > 0 {
            exit::PARTIAL_FAILURE
        } else {
            exit::SUCCESS
        }
    }
}

/// Run the whole pipeline. The found folders and the prompt go to `out`;
/// the answer is read from `input`.
pub fn sweep<R, W>(
    options: &SweepOptions,
    input: &mut R,
    out: &mut W,
) -> Result<SweepOutcome, TidyError>
where
    R: BufRead,
    W: Write,
{
    let root = &options.root;
    if !root.exists() {
        return Err(TidyError::PathNotFound(root.clone()));
    }
    if !root.is_dir() {
        return Err(TidyError::NotADirectory(root.clone()));
    }

    let pool = WorkerPool::new(options.jobs)?;
    let scan = EmptyFolderFinder::new(&pool).find(root);
    info!(
        "Checked {} directories, {} empty, {} unreadable",
        scan.checked,
        scan.folders.len(),
        scan.unreadable
    );

    if scan.is_empty() {
        info!("No empty folders found.");
        return Ok(SweepOutcome::NothingFound(scan));
    }

    output::write_found_folders(out, &scan.folders).map_err(TidyError::Console)?;

    if options.dry_run {
        return Ok(SweepOutcome::Listed(scan));
    }
    if !options.assume_yes && !prompt::confirm(input, out, CONFIRM_QUESTION)? {
        info!("Deletion aborted.");
        return Ok(SweepOutcome::Declined(scan));
    }

    let deletion = FolderDeleter::new(&pool)
        .recursive(options.recursive)
        .delete_all(&scan.folders);
    info!(
        "Deleted {} of {} folders",
        deletion.deleted_count(),
        deletion.outcomes.len()
    );

    let ledger = DeletionLedger::new(&options.ledger).write(&deletion.deleted());

    Ok(SweepOutcome::Completed(SweepReport {
        scan,
        deletion,
        ledger,
    }))
}
