use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::extensions::DEFAULT_TARGET_EXTENSION;
use crate::folders::DEFAULT_LEDGER;
use crate::retry::MAX_DELAY;

#[derive(Parser)]
#[command(
    name = "dirtidy",
    about = "Filesystem and network housekeeping: sweep empty folders, fix extensions, probe URLs",
    version
)]
pub struct Cli {
    /// Verbose logging, including permission-denied details
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Find empty folders under a path and delete them after confirmation
    EmptyFolders {
        /// Directory to search for empty folders
        path: PathBuf,

        /// Ledger file for deleted folders; a timestamp is added before the extension
        #[arg(short, long, default_value = DEFAULT_LEDGER)]
        output: PathBuf,

        /// Worker threads for scanning and deleting (defaults to cpus + 4, max 32)
        #[arg(short, long, env = "DIRTIDY_JOBS")]
        jobs: Option<usize>,

        /// Remove folders even if something appeared in them after the scan
        #[arg(long)]
        recursive: bool,

        /// List empty folders and exit without asking
        #[arg(long, conflicts_with = "yes")]
        dry_run: bool,

        /// Delete without asking for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Report file extensions in a directory, or append a default one
    Extensions {
        /// Directory whose files are checked (not recursive)
        path: PathBuf,

        /// Rename files without a known extension instead of only reporting
        #[arg(long)]
        rename: bool,

        /// Extension appended by --rename
        #[arg(long, default_value = DEFAULT_TARGET_EXTENSION)]
        target_ext: String,
    },

    /// Check that a URL answers, retrying with exponential backoff
    Ping {
        url: String,

        /// Total attempts, including the first
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=100))]
        attempts: u32,

        /// Seconds to wait before the first retry
        #[arg(long, default_value_t = 5.0, value_parser = parse_delay)]
        delay: f64,

        /// Multiplier applied to the delay after each retry
        #[arg(long, default_value_t = 2.0, value_parser = parse_backoff)]
        backoff: f64,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,
    },
}

fn parse_delay(s: &str) -> Result<f64, String> {
    let secs: f64 = s.parse().map_err(|e| format!("{e}"))?;
    let max = MAX_DELAY.as_secs_f64();
    if secs.is_finite() && (0.0..=max).contains(&secs) {
        Ok(secs)
    } else {
        Err(format!("must be between 0 and {max} seconds"))
    }
}

fn parse_backoff(s: &str) -> Result<f64, String> {
    let factor: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if factor.is_finite() && factor >= 1.0 {
        Ok(factor)
    } else {
        Err("must be a finite number of at least 1".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn empty_folders_defaults() {
        let cli = Cli::try_parse_from(["dirtidy", "empty-folders", "/tmp/x"]).unwrap();
        assert!(!cli.debug);
        match cli.command {
            Command::EmptyFolders {
                path,
                output,
                recursive,
                dry_run,
                yes,
                ..
            } => {
                assert_eq!(path, PathBuf::from("/tmp/x"));
                assert_eq!(output, PathBuf::from("output/deleted_folders.txt"));
                assert!(!recursive && !dry_run && !yes);
            }
            _ => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn debug_flag_is_global() {
        let cli = Cli::try_parse_from(["dirtidy", "empty-folders", "-o", "l.txt", "p", "--debug"])
            .unwrap();
        assert!(cli.debug);
    }

    #[test]
    fn dry_run_and_yes_conflict() {
        assert!(Cli::try_parse_from(["dirtidy", "empty-folders", "p", "--dry-run", "-y"]).is_err());
    }

    #[test]
    fn ping_rejects_zero_attempts() {
        assert!(Cli::try_parse_from(["dirtidy", "ping", "http://x", "--attempts", "0"]).is_err());
    }

    #[test]
    fn ping_rejects_unusable_delays() {
        for bad in ["-1", "inf", "NaN", "1e30"] {
            let args = ["dirtidy", "ping", "http://x", "--delay", bad];
            assert!(Cli::try_parse_from(args).is_err(), "--delay {bad}");
        }
    }

    #[test]
    fn ping_rejects_unusable_backoff() {
        for bad in ["0.5", "-2", "inf", "1e400"] {
            let args = ["dirtidy", "ping", "http://x", "--backoff", bad];
            assert!(Cli::try_parse_from(args).is_err(), "--backoff {bad}");
        }
    }

    #[test]
    fn ping_accepts_sane_timing() {
        let cli = Cli::try_parse_from([
            "dirtidy", "ping", "http://x", "--delay", "0", "--backoff", "1",
        ])
        .unwrap();
        match cli.command {
            Command::Ping { delay, backoff, .. } => {
                assert_eq!(delay, 0.0);
                assert_eq!(backoff, 1.0);
            }
            _ => panic!("wrong subcommand"),
        }
    }
}
