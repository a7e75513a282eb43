use cursus_core::whatif::{CancellationImpact, ScenarioComparison, compare_scenarios};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CompareArgs;
use crate::context::AppContext;
use crate::output::output_with_table;
use crate::output::table::{TableOptions, render_table};

/// Handle `cursus compare`.
pub async fn handle(
    args: &CompareArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let bundle = ctx.load_bundle(flags).await?;
    let snapshot = &bundle.snapshot;
    snapshot.require_session(&args.session_a)?;
    snapshot.require_session(&args.session_b)?;

    let comparison = compare_scenarios(snapshot, &args.session_a, &args.session_b);
    output_with_table(&comparison, flags.format, |options| {
        comparison_table(&comparison, options)
    })
}

fn comparison_table(comparison: &ScenarioComparison, options: TableOptions) -> String {
    let metrics: [(&str, fn(&CancellationImpact) -> String); 5] = [
        ("lost coverages", |i| i.affected_coverages.len().to_string()),
        ("unique losses", |i| i.unique_at_risk_count().to_string()),
        ("fully covered after", |i| i.health_after.fully_covered.to_string()),
        ("fully covered change", |i| format!("{:+}", i.fully_covered_delta())),
        ("new violations", |i| i.new_violations.len().to_string()),
    ];
    let a = &comparison.scenario_a;
    let b = &comparison.scenario_b;
    let rows = metrics
        .iter()
        .map(|(name, metric)| vec![(*name).to_string(), metric(a), metric(b)])
        .collect::<Vec<_>>();
    render_table(
        &[
            "metric",
            a.canceled_session_id.as_str(),
            b.canceled_session_id.as_str(),
        ],
        &rows,
        options,
    )
}
