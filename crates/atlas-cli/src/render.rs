//! Console output.
//!
//! Everything here returns a `String` so that commands decide where it goes.

use std::fmt::Write;
use std::path::Path;

use atlas_core::{BranchFlag, BranchStatus, CloneReport, RepoFlag, RepositoryStatus, ScanReport};
use atlas_git::{CloneOutcome, RepoLifecycle};
use colored::Colorize;
use comfy_table::presets::NOTHING;
use comfy_table::{Cell, Table};

/// The `list` table: status markers, repository, branches.
///
/// Markers are `?` (dirty), a grey `?` (ignored files) and `*` (stashes).
pub fn status_table(listed: &[RepositoryStatus]) -> String {
    if listed.is_empty() {
        return format!("{}\n", "No repositories in the index.".dimmed());
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(vec![
        Cell::new("Status".bold()),
        Cell::new("Repository".bold()),
        Cell::new("Branches".bold()),
    ]);
    for entry in listed {
        table.add_row(status_row(entry));
    }
    // Two spaces between columns, none at the left edge
    for column in table.column_iter_mut() {
        column.set_padding((0, 2));
    }

    format!("{}\n", table.trim_fmt())
}

fn status_row(entry: &RepositoryStatus) -> Vec<Cell> {
    let record = &entry.status;
    let name = entry.relative.as_str();

    if !record.is_repo() {
        return vec![
            Cell::new("not a repo".bold()),
            Cell::new(name.bold()),
            Cell::new(""),
        ];
    }

    let marker = |flag: RepoFlag, symbol: &str| -> String {
        if !record.has(flag) {
            return "-".to_string();
        }
        match flag {
            RepoFlag::Dirty => symbol.blue().bold(),
            RepoFlag::IgnoredDirt => symbol.bright_black().bold(),
            _ => symbol.yellow().bold(),
        }
        .to_string()
    };
    let status = [
        marker(RepoFlag::Dirty, "?"),
        marker(RepoFlag::IgnoredDirt, "?"),
        marker(RepoFlag::Stashed, "*"),
    ]
    .join(" ");

    let repo = if record.attention_needed() {
        name.bold().to_string()
    } else {
        name.to_string()
    };

    let mut branches = Vec::new();
    if record.has(RepoFlag::NoRemote) {
        branches.push("no remote".red().bold().to_string());
    } else if record.has(RepoFlag::LocalBranches) {
        branches.push("local branches".red().to_string());
    }
    branches.extend(record.branches.iter().map(branch_label));

    vec![Cell::new(status), Cell::new(repo), Cell::new(branches.join(" "))]
}

fn branch_label(branch: &BranchStatus) -> String {
    match branch.flag {
        BranchFlag::InSync => format!("[{}]", branch.name).green().to_string(),
        BranchFlag::Diverged { behind, ahead } => {
            format!("[{}: -{behind}/+{ahead}]", branch.name).red().to_string()
        }
        BranchFlag::Untracked => format!("[{}: ×]", branch.name).red().bold().to_string(),
    }
}

/// Summary printed by `index` and `scan`.
pub fn scan_summary(report: &ScanReport, root: &Path) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} {} in {}",
        "Recorded".green().bold(),
        report.written.len(),
        plural(report.written.len(), "repository", "repositories"),
        report.index.display()
    );
    for path in &report.skipped {
        let shown = path.strip_prefix(root).unwrap_or(path);
        let _ = writeln!(out, "  {} {} (not a repository)", "skipped".yellow(), shown.display());
    }
    for rejected in &report.rejected {
        let _ = writeln!(out, "  {} {}", "rejected".red(), rejected.error);
    }
    out
}

/// One line per repository handled by `clone`.
pub fn clone_summary(report: &CloneReport) -> String {
    let mut out = String::new();
    if report.index_copied {
        let _ = writeln!(out, "{} {}", "Copied index to".dimmed(), report.index.display());
    }
    if report.repositories.is_empty() {
        let _ = writeln!(out, "{}", "No repositories in the index.".dimmed());
        return out;
    }

    let width = report
        .repositories
        .iter()
        .map(|repo| repo.relative.as_str().chars().count())
        .max()
        .unwrap_or(0);

    for repo in &report.repositories {
        let name = format!("{:<width$}", repo.relative.as_str());
        let line = match (&repo.lifecycle, &repo.outcome) {
            (RepoLifecycle::Failed(reason), _) => format!("  {} {}  {}", "✗".red().bold(), name.bold(), reason.red()),
            (_, Some(CloneOutcome::SkippedMirrored { remote })) => format!(
                "  {} {}  skipped, '{remote}' is a mirrored remote",
                "~".yellow().bold(),
                name
            ),
            (_, outcome) => {
                let mut detail = match outcome {
                    Some(CloneOutcome::Cloned { remote }) => format!("cloned from {remote}"),
                    _ => "already present".to_string(),
                };
                if !repo.added_remotes.is_empty() {
                    let _ = write!(detail, ", added {}", repo.added_remotes.join(", "));
                }
                format!("  {} {}  {}", "✓".green().bold(), name, detail)
            }
        };
        let _ = writeln!(out, "{line}");
    }

    let failed = report.failures().count();
    if failed > 0 {
        let _ = writeln!(
            out,
            "{} of {} {} failed to clone",
            failed.to_string().red().bold(),
            report.repositories.len(),
            plural(report.repositories.len(), "repository", "repositories")
        );
    }
    out
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
