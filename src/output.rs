use std::io::{self, Write};
use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::utils;

pub fn print_banner() {
    println!(
        "{}",
        concat!("dirtidy - housekeeping tools v", env!("CARGO_PKG_VERSION"))
            .bold()
            .cyan()
    );
    println!();
}

pub fn print_section(label: &str) {
    println!("{}", format!("=== {label} ===").bold().white());
}

pub fn write_found_folders(out: &mut impl Write, folders: &[PathBuf]) -> io::Result<()> {
    writeln!(out, "{}", "=== Empty folders found ===".bold().white())?;
    for folder in folders {
        writeln!(out, "  {}", utils::display_path(folder).dimmed())?;
    }
    writeln!(
        out,
        "  {} {}",
        "Total:".bold(),
        folders.len().to_string().green()
    )?;
    writeln!(out)
}

pub fn print_nothing_found(root: &Path) {
    println!(
        "{} {}",
        "Info:".cyan().bold(),
        format!("No empty folders found under {}", utils::display_path(root))
    );
}

pub fn print_unreadable(count: usize) {
    if count > 0 {
        print_warning(&format!(
            "{count} director{} could not be read and were treated as not empty",
            if count == 1 { "y" } else { "ies" }
        ));
    }
}

pub fn print_aborted() {
    println!("{}", "Deletion aborted.".yellow().bold());
}

pub fn print_dry_run_footer() {
    println!(
        "{}",
        "This was a dry run. Run again without --dry-run to delete."
            .yellow()
            .bold()
    );
}

pub fn print_sweep_summary(deleted: usize, failed: usize) {
    print_separator();
    println!(
        "  {:<20} {}",
        "Deleted:".bold(),
        deleted.to_string().green().bold()
    );
    if failed > 0 {
        println!(
            "  {:<20} {}",
            "Failed:".bold(),
            failed.to_string().red().bold()
        );
    }
    println!();
}

pub fn print_ledger_saved(path: &Path) {
    println!("{} {}", "Ledger:".cyan().bold(), path.display());
}

pub fn print_known(path: &Path, ext: &str) {
    println!(
        "  {} {}  {}",
        "Known".green(),
        path.display().to_string().dimmed(),
        ext.yellow()
    );
}

pub fn print_unrecognized(path: &Path) {
    println!(
        "  {} {}",
        "Unknown".yellow(),
        path.display().to_string().dimmed()
    );
}

pub fn print_renamed(from: &Path, to: &Path) {
    println!(
        "  {} {} -> {}",
        "Renamed".cyan(),
        from.display().to_string().dimmed(),
        to.display()
    );
}

pub fn print_not_a_file(path: &Path) {
    println!(
        "  {} {}",
        "Skipped".dimmed(),
        format!("{} is not a file", path.display()).dimmed()
    );
}

pub fn print_failure(path: &Path, err: &str) {
    println!(
        "  {} {} - {}",
        "Failed".red().bold(),
        path.display().to_string().dimmed(),
        err.red()
    );
}

pub fn print_probe_up(url: &str, attempts: u32) {
    println!(
        "{} {} {}",
        "Up:".green().bold(),
        url,
        format!("(attempt {attempts})").dimmed()
    );
}

pub fn print_probe_down(url: &str, err: &str) {
    println!("{} {} - {}", "Down:".red().bold(), url, err.red());
}

pub fn print_separator() {
    println!("  {}", "─".repeat(45).dimmed());
}

pub fn print_warning(msg: &str) {
    println!("{} {}", "Warning:".red().bold(), msg.red());
}
