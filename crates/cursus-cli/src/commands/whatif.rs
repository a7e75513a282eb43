use cursus_core::whatif::{CancellationImpact, simulate_cancellation};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::WhatifArgs;
use crate::context::AppContext;
use crate::output::output_with_table;
use crate::output::table::{TableOptions, render_table};

/// Handle `cursus whatif`.
pub async fn handle(
    args: &WhatifArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let bundle = ctx.load_bundle(flags).await?;
    let snapshot = &bundle.snapshot;
    snapshot.require_session(&args.session)?;

    let impact = simulate_cancellation(snapshot, &args.session);
    tracing::debug!(
        session_id = %args.session,
        affected = impact.affected_coverages.len(),
        unique = impact.unique_at_risk_count(),
        "simulated cancellation"
    );
    output_with_table(&impact, flags.format, |options| impact_table(&impact, options))
}

/// At-risk skills followed by the health change.
pub fn impact_table(impact: &CancellationImpact, options: TableOptions) -> String {
    let rows = impact
        .at_risk_skills
        .iter()
        .map(|skill| {
            let others = skill
                .other_sessions
                .iter()
                .map(|other| format!("{} ({})", other.session_code, other.level))
                .collect::<Vec<_>>();
            vec![
                skill.skill_code.clone(),
                skill.level.to_string(),
                skill.unique_coverage.to_string(),
                if others.is_empty() {
                    "-".to_string()
                } else {
                    others.join(", ")
                },
            ]
        })
        .collect::<Vec<_>>();

    let body = if rows.is_empty() {
        format!("session {} carries no coverage", impact.canceled_session_id)
    } else {
        render_table(&["skill", "level", "unique", "also covered in"], &rows, options)
    };

    format!(
        "{body}\n\nfully covered: {} -> {} ({:+}), unique losses: {}, new violations: {}",
        impact.health_before.fully_covered,
        impact.health_after.fully_covered,
        impact.fully_covered_delta(),
        impact.unique_at_risk_count(),
        impact.new_violations.len(),
    )
}
