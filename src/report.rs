use std::env;
use std::fs::OpenOptions;
use std::io::Write;

use colored::Colorize;
use log::{error, info};

/// Publish a run output for downstream workflow steps. Appends to the
/// output file the CI host designates; falls back to plain stdout when run
/// outside a workflow.
pub fn set_output(name: &str, value: &str) -> std::io::Result<()> {
    if let Ok(path) = env::var("GITHUB_OUTPUT") {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{name}={value}")?;
    } else {
        println!("{name}={value}");
    }
    info!("{} output {}={}", "✓".green(), name, value);
    Ok(())
}

/// Surface a non-fatal outcome on the run's annotation channel.
pub fn notice(message: &str) {
    println!("::notice::{}", escape_data(message));
    info!("{} {}", "ℹ".blue(), message);
}

/// Mark the run failed with a message; the caller decides the exit code.
pub fn set_failed(message: &str) {
    println!("::error::{}", escape_data(message));
    error!("{} {}", "✗".red(), message);
}

/// Workflow-command payloads must not contain raw `%` or line breaks.
fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_payloads_are_escaped() {
        assert_eq!(escape_data("plain"), "plain");
        assert_eq!(escape_data("50% done\nnext"), "50%25 done%0Anext");
        assert_eq!(escape_data("a\r\nb"), "a%0D%0Ab");
    }
}
