//! Shared output formatting for lint results.

use anyhow::Result;
use restrict_imports_core::{LintResult, Severity};
use std::io::IsTerminal;

use crate::OutputFormat;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result, std::io::stdout().is_terminal()),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
    }
    Ok(())
}

fn color(severity: Option<Severity>) -> &'static str {
    match severity {
        Some(Severity::Error) => "\x1b[31m",
        Some(Severity::Warning) => "\x1b[33m",
        Some(Severity::Info) => "\x1b[34m",
        None => "\x1b[32m",
    }
}

fn print_text(result: &LintResult, colored: bool) {
    for violation in &result.violations {
        println!("{}", violation.format());
    }
    let summary = summary_line(result);
    if colored {
        let worst = result.violations.iter().map(|v| v.severity).max();
        println!("{}{summary}\x1b[0m", color(worst));
    } else {
        println!("{summary}");
    }
}

fn summary_line(result: &LintResult) -> String {
    let (errors, warnings, infos) = result.count_by_severity();
    format!(
        "Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} file(s), {} exempt",
        result.files_checked, result.files_exempt
    )
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!("{violation}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restrict_imports_core::{Location, Violation};
    use std::path::PathBuf;

    #[test]
    fn summary_counts_exempt_files() {
        let mut result = LintResult::new();
        result.files_checked = 4;
        result.files_exempt = 1;
        result.violations.push(Violation::new(
            "RIF001",
            "expected-one-rule",
            Severity::Warning,
            Location::new(PathBuf::from("a.js"), 1, 1),
            "m",
        ));
        assert_eq!(
            summary_line(&result),
            "Found 0 error(s), 1 warning(s), 0 info(s) in 4 file(s), 1 exempt"
        );
    }

    #[test]
    fn summary_color_follows_worst_severity() {
        assert_eq!(color(Some(Severity::Error)), "\x1b[31m");
        assert_eq!(color(None), "\x1b[32m");
    }
}
