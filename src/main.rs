use std::io;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use dirtidy::cli::{Cli, Command};
use dirtidy::extensions::{self, ExtensionOutcome, ExtensionStrategy};
use dirtidy::folders::{self, SweepOptions, SweepOutcome};
use dirtidy::probe::HealthProbe;
use dirtidy::retry::RetryPolicy;
use dirtidy::{exit, logging, output, pool, TidyError};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.debug);

    match run(cli.command) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            let code = err
                .downcast_ref::<TidyError>()
                .map(TidyError::exit_code)
                .unwrap_or(exit::INTERNAL);
            error!("{err:#}");
            ExitCode::from(code)
        }
    }
}

fn run(command: Command) -> Result<u8> {
    match command {
        Command::EmptyFolders {
            path,
            output,
            jobs,
            recursive,
            dry_run,
            yes,
        } => {
            let options = SweepOptions {
                root: path,
                ledger: output,
                jobs: jobs.unwrap_or_else(pool::default_jobs),
                recursive,
                dry_run,
                assume_yes: yes,
            };
            empty_folders(&options)
        }
        Command::Extensions {
            path,
            rename,
            target_ext,
        } => {
            let strategy = if rename {
                ExtensionStrategy::AppendDefault {
                    target: extensions::normalize_target(&target_ext),
                }
            } else {
                ExtensionStrategy::Report
            };
            fix_extensions(&path, &strategy)
        }
        Command::Ping {
            url,
            attempts,
            delay,
            backoff,
            timeout,
        } => {
            let policy = RetryPolicy {
                max_attempts: attempts,
                initial_delay: Duration::try_from_secs_f64(delay)?,
                backoff,
            };
            Ok(ping(&url, policy, Duration::from_secs(timeout)))
        }
    }
}

fn empty_folders(options: &SweepOptions) -> Result<u8> {
    output::print_banner();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();

    let outcome = folders::sweep(options, &mut input, &mut stdout)?;
    match &outcome {
        SweepOutcome::NothingFound(scan) => {
            output::print_nothing_found(&options.root);
            output::print_unreadable(scan.unreadable);
        }
        SweepOutcome::Listed(scan) => {
            output::print_unreadable(scan.unreadable);
            output::print_dry_run_footer();
        }
        SweepOutcome::Declined(_) => output::print_aborted(),
        SweepOutcome::Completed(report) => {
            for (path, outcome) in &report.deletion.outcomes {
                if let folders::DeletionOutcome::Failed(kind) = outcome {
                    output::print_failure(path, &kind.to_string());
                }
            }
            output::print_sweep_summary(
                report.deletion.deleted_count(),
                report.deletion.failed_count(),
            );
            match &report.ledger {
                Ok(path) => output::print_ledger_saved(path),
                Err(e) => output::print_warning(&e.to_string()),
            }
        }
    }
    Ok(outcome.exit_code())
}

fn fix_extensions(path: &std::path::Path, strategy: &ExtensionStrategy) -> Result<u8> {
    output::print_section(&format!("Extensions in {}", path.display()));

    let report = extensions::process_directory(path, strategy)?;
    for outcome in &report.outcomes {
        match outcome {
            ExtensionOutcome::Known { path, ext } => output::print_known(path, ext),
            ExtensionOutcome::Unrecognized { path } => output::print_unrecognized(path),
            ExtensionOutcome::Renamed { from, to } => output::print_renamed(from, to),
            ExtensionOutcome::RenameFailed { path, reason } => {
                output::print_failure(path, &reason.to_string())
            }
            ExtensionOutcome::NotAFile { path } => output::print_not_a_file(path),
        }
    }
    Ok(report.exit_code())
}

fn ping(url: &str, policy: RetryPolicy, timeout: Duration) -> u8 {
    let probe = HealthProbe::new(policy, timeout);
    match probe.probe(url) {
        Ok(ok) => {
            output::print_probe_up(url, ok.attempts);
            exit::SUCCESS
        }
        Err(e) => {
            output::print_probe_down(url, &e.to_string());
            exit::PROBE_FAILED
        }
    }
}
