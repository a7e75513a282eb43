use std::collections::HashSet;

use serde_json::json;

use cursus_core::enums::CoverageLevel;
use cursus_core::matrix::{
    HealthStatus, MatrixColumn, MatrixFilter, MatrixRow, PlanSummary, assemble_matrix,
    filter_rows, matrix_columns, skills_at_risk_from_cancellations, summarize_plan,
};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::MatrixArgs;
use crate::context::AppContext;
use crate::output::output_with_table;
use crate::output::table::{TableOptions, render_table};

/// Handle `cursus matrix`.
pub async fn handle(
    args: &MatrixArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let filter: MatrixFilter = args
        .filter
        .parse()
        .map_err(|error: String| anyhow::anyhow!("{error} (expected all, gaps or at-risk)"))?;

    let bundle = ctx.load_bundle(flags).await?;
    let snapshot = &bundle.snapshot;

    let rows = assemble_matrix(snapshot);
    let columns = matrix_columns(snapshot);
    let at_risk: HashSet<String> = skills_at_risk_from_cancellations(snapshot)
        .into_iter()
        .collect();
    let visible = filter_rows(&rows, filter, &at_risk);
    let summary = summarize_plan(snapshot);

    output_with_table(
        &json!({
            "filter": filter,
            "columns": columns,
            "rows": visible,
            "summary": summary,
        }),
        flags.format,
        |options| matrix_table(&columns, &visible, &summary, options),
    )
}

/// Letters for the levels recorded in one cell, e.g. `IP`.
fn cell(levels: Option<&Vec<CoverageLevel>>) -> String {
    let Some(levels) = levels else {
        return "-".to_string();
    };
    let mut letters: Vec<CoverageLevel> = levels.clone();
    letters.sort_by_key(|level| level.rank());
    letters.dedup();
    letters
        .iter()
        .map(|level| match level {
            CoverageLevel::Introduced => 'I',
            CoverageLevel::Practiced => 'P',
            CoverageLevel::Assessed => 'A',
        })
        .collect()
}

fn matrix_table(
    columns: &[MatrixColumn],
    rows: &[&MatrixRow],
    summary: &PlanSummary,
    options: TableOptions,
) -> String {
    let headers: Vec<String> = ["skill".to_string(), "status".to_string()]
        .into_iter()
        .chain(columns.iter().map(|column| {
            if column.status.is_active() {
                column.session_code.clone()
            } else {
                format!("{}(x)", column.session_code)
            }
        }))
        .collect();
    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();

    let body = rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.skill.code.clone(), HealthStatus::of(row).to_string()];
            cells.extend(
                columns
                    .iter()
                    .map(|column| cell(row.coverage_by_session.get(&column.session_id))),
            );
            cells
        })
        .collect::<Vec<_>>();

    let bar = summary.health_bar;
    let footer = format!(
        "{} fully covered, {} partial, {} uncovered of {} skills; {} of {} sessions scheduled, {} canceled, {} skills at risk",
        bar.fully_covered,
        bar.partially_covered,
        bar.uncovered,
        bar.total,
        summary.scheduled_sessions,
        summary.total_sessions,
        summary.canceled_sessions,
        summary.skills_at_risk_from_cancellations,
    );

    if body.is_empty() {
        return format!("(no rows)\n\n{footer}");
    }
    format!("{}\n\n{footer}", render_table(&header_refs, &body, options))
}
