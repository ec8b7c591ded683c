//! Workflow command output for the CI runner.
//!
//! Everything the runner renders goes to stdout: plain lines for
//! information, `::warning::` and `::error::` commands for annotations, and
//! the legacy `::set-env` command when no environment file is available.
//! Stderr is left to the `log` diagnostics.

/// Plain informational line.
pub fn info(message: &str) {
    println!("{message}");
}

/// `::warning::` annotation.
pub fn warning(message: &str) {
    issue("warning", message);
}

/// `::error::` annotation. The caller is responsible for the exit status.
pub fn error(message: &str) {
    issue("error", message);
}

/// Legacy `set-env` command, honored by runners when `GITHUB_ENV` is not
/// in play.
pub fn set_env(name: &str, value: &str) {
    println!(
        "::set-env name={}::{}",
        escape_property(name),
        escape_data(value)
    );
}

fn issue(command: &str, message: &str) {
    println!("::{command}::{}", escape_data(message));
}

/// Escape message data for a workflow command.
fn escape_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escape a command property (the `name=` side of `set-env`). Properties
/// additionally reserve `:` and `,`.
fn escape_property(property: &str) -> String {
    escape_data(property).replace(':', "%3A").replace(',', "%2C")
}
