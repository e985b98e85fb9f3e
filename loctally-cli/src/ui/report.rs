use std::fmt::Write;
use std::path::Path;

use loctally_core::{Report, format_count, percentage};

use super::theme::Theme;
use crate::app::ScanOutcome;

/// Text report for one path: files, extensions, totals
pub fn render_outcome(outcome: &ScanOutcome, theme: &Theme) -> String {
    match outcome {
        ScanOutcome::Finished(report) => render_report(report, theme),
        ScanOutcome::Failed { root, error } => render_failure(root, error, theme),
    }
}

fn header(root: &Path, theme: &Theme) -> String {
    format!(
        " --- Report for path: {}\n\n",
        theme.heading(root.display())
    )
}

pub fn render_report(report: &Report, theme: &Theme) -> String {
    let mut out = header(&report.root, theme);

    if !report.is_found() {
        let _ = writeln!(out, " * {}\n", theme.error("Path not found"));
        return out;
    }

    if !report.files.is_empty() {
        out.push_str(" * Files: \n");
        for (path, lines) in &report.files {
            let _ = writeln!(
                out,
                "FILE: {}, LINES: {}, EMPTY: {}, COMMENT: {}",
                theme.name(path.display()),
                theme.number(format_count(lines.total)),
                theme.number(format_count(lines.blank)),
                theme.number(format_count(lines.comment)),
            );
        }
        out.push('\n');
    }

    if !report.extensions.is_empty() {
        out.push_str(" * Exts: \n");
        for (ext, bucket) in &report.extensions {
            let _ = writeln!(
                out,
                "EXT: {}, LINES: {}, EMPTY: {}, COMMENT: {}, FILES: {}",
                theme.name(ext),
                theme.number(format_count(bucket.lines.total)),
                theme.number(format_count(bucket.lines.blank)),
                theme.number(format_count(bucket.lines.comment)),
                theme.number(format_count(bucket.files)),
            );
        }
        out.push('\n');
    }

    let totals = &report.totals;
    let _ = writeln!(
        out,
        " * Total: LINES: {}, EMPTY: {}, COMMENT: {} {}, FILES: {}\n",
        theme.number(format_count(totals.total)),
        theme.number(format_count(totals.blank)),
        theme.number(format_count(totals.comment)),
        theme.dim(format!(
            "({:.1}%)",
            percentage(totals.comment, totals.total)
        )),
        theme.number(format_count(report.file_count)),
    );

    out
}

pub fn render_failure(root: &Path, error: &str, theme: &Theme) -> String {
    let mut out = header(root, theme);
    let _ = writeln!(out, " * {} {}\n", theme.error("Error:"), error);
    out
}
