//! Transaction envelope for rendered statements.

/// Wraps statements in `BEGIN;` / `COMMIT;`, one statement per line.
///
/// Returns an empty string when there is nothing to run, so callers can
/// skip execution without inspecting the statements.
#[must_use]
pub fn wrap(statements: &[String]) -> String {
    if statements.is_empty() {
        return String::new();
    }
    format!("BEGIN;\n{}\nCOMMIT;", statements.join("\n"))
}
