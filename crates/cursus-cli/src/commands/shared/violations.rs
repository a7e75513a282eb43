use cursus_core::issues::ValidationIssue;

/// One line per issue, for error messages.
pub fn describe(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("  - {}: {}", issue.kind, issue.message))
        .collect::<Vec<_>>()
        .join("\n")
}
