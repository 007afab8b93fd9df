//! CLI output helpers for consistent, colored formatting.

use colored::Colorize;
use inscribe_core::{ErrorResponse, Issue};

pub fn heading(text: &str) -> String {
    format!("{}", text.bright_cyan())
}

pub fn label(text: &str) -> String {
    format!("{}", text.bright_blue())
}

pub fn muted(text: &str) -> String {
    format!("{}", text.bright_black())
}

pub fn success(text: &str) -> String {
    format!("{}", text.bright_green())
}

pub fn warning(text: &str) -> String {
    format!("{}", text.yellow())
}

pub fn err_line(text: &str) -> String {
    format!("{} {}", "Error".red().bold(), text)
}

pub fn banner_invalid_input(text: &str) -> String {
    format!("{} {}", " Invalid input ".white().on_red(), text.red())
}

pub fn banner_error(text: &str) -> String {
    format!("{} {}", " Error ".white().on_red().bold(), text)
}

pub fn status_ok() -> String {
    format!("{}", "OK".green())
}

pub fn status_error() -> String {
    format!("{}", "ERROR".red())
}

/// One line per issue: `path  message (code)`.
pub fn issue_line(issue: &Issue) -> String {
    format!(
        "  {}  {} {}",
        label(&issue.path.join(".")),
        issue.message,
        muted(&format!("({})", issue.code)),
    )
}

/// Human-readable rendering of an error body, for stderr.
pub fn error_response(response: &ErrorResponse) -> String {
    let banner = match response.status {
        400..=499 => banner_invalid_input(&response.message),
        _ => banner_error(&response.message),
    };
    let mut out = format!("{banner} {}", muted(&format!("[{}]", response.status)));
    for issue in &response.error.issues {
        out.push('\n');
        out.push_str(&issue_line(issue));
    }
    out
}
