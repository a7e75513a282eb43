use cursus_core::report::{TermReport, validate_term};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ValidateArgs;
use crate::context::AppContext;
use crate::output::output_with_table;
use crate::output::table::{TableOptions, render_table};

/// Handle `cursus validate`.
pub async fn handle(
    args: &ValidateArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let bundle = ctx.load_bundle(flags).await?;
    let report = validate_term(&bundle.snapshot, &bundle.gaie);
    tracing::debug!(
        errors = report.summary.error_count,
        warnings = report.summary.warning_count,
        info = report.summary.info_count,
        "validated term"
    );

    output_with_table(&report, flags.format, |options| report_table(&report, options))?;

    if args.fail_on_error && !report.is_clean() {
        anyhow::bail!("term has {} error(s)", report.summary.error_count);
    }
    Ok(())
}

fn report_table(report: &TermReport, options: TableOptions) -> String {
    let summary = &report.summary;
    let footer = format!(
        "{} skills, {} sessions, {} coverage entries: {} errors, {} warnings, {} info",
        summary.total_skills,
        summary.total_sessions,
        summary.total_coverage_entries,
        summary.error_count,
        summary.warning_count,
        summary.info_count,
    );
    if report.issues().next().is_none() {
        return format!("no issues\n{footer}");
    }

    let rows = report
        .issues()
        .map(|issue| {
            vec![
                issue.severity().to_string(),
                issue.kind.to_string(),
                issue.skill_id.clone().unwrap_or_else(|| "-".into()),
                issue
                    .session_id
                    .clone()
                    .or_else(|| issue.module_id.clone())
                    .unwrap_or_else(|| "-".into()),
                issue.message.clone(),
            ]
        })
        .collect::<Vec<_>>();
    let table = render_table(
        &["severity", "type", "skill", "where", "message"],
        &rows,
        options,
    );
    format!("{table}\n\n{footer}")
}

#[cfg(test)]
mod tests {
    use cursus_core::entities::{CoverageEvent, SkillSummary, TermSnapshot};
    use cursus_core::enums::CoverageLevel;

    use super::*;

    const PLAIN: TableOptions = TableOptions {
        max_width: None,
        color: false,
    };

    #[test]
    fn clean_report_says_so() {
        let out = report_table(&TermReport::default(), PLAIN);
        assert!(out.starts_with("no issues"));
    }

    #[test]
    fn errors_are_listed_before_info() {
        let snapshot = TermSnapshot {
            coverages: vec![CoverageEvent {
                session_id: "ses-1".into(),
                skill_id: "skl-a".into(),
                level: CoverageLevel::Assessed,
                session_date: None,
                session_sequence: 0,
                module_sequence: 0,
            }],
            skills: vec![SkillSummary {
                id: "skl-b".into(),
                code: "B01".into(),
                description: "Never taught".into(),
                category: "basics".into(),
            }],
            ..TermSnapshot::default()
        };
        let report = validate_term(&snapshot, &[]);

        let out = report_table(&report, PLAIN);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[2].starts_with("error"));
        assert!(lines[3].starts_with("error"));
        assert!(lines[4].starts_with("info"));
        assert!(out.ends_with("2 errors, 0 warnings, 1 info"));
    }
}
