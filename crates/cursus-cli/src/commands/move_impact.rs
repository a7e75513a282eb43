use serde_json::json;

use cursus_core::moves::compute_move_impact;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::MoveImpactArgs;
use crate::commands::shared::parse::parse_date_change;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cursus move-impact`.
///
/// Omitted coordinates keep the session's current value. Only active
/// coverage takes part.
pub async fn handle(
    args: &MoveImpactArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let date = parse_date_change(args.date.as_deref(), args.clear_date)?;
    let bundle = ctx.load_bundle(flags).await?;
    let snapshot = &bundle.snapshot;
    let session = snapshot.require_session(&args.session)?;

    let from = session.position();
    let mut to = from;
    if let Some(date) = date {
        to.date = date;
    }
    if let Some(sequence) = args.module_sequence {
        to.module_sequence = sequence;
    }
    if let Some(sequence) = args.session_sequence {
        to.session_sequence = sequence;
    }

    let events = snapshot.active_coverages(&snapshot.canceled_session_ids());
    let impact = compute_move_impact(&args.session, to, &events);
    output(
        &json!({
            "from": from,
            "to": to,
            "impact": impact,
        }),
        flags.format,
    )
}
