use serde_json::json;

use cursus_core::whatif::validate_redistribution;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RedistributeArgs;
use crate::commands::shared::parse::parse_relocations;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cursus redistribute`.
pub async fn handle(
    args: &RedistributeArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let relocations = parse_relocations(&args.to, &args.session)?;
    let bundle = ctx.load_bundle(flags).await?;
    let snapshot = &bundle.snapshot;
    snapshot.check_relocation_targets(&args.session, &relocations)?;

    let issues = validate_redistribution(&snapshot.active_view(), &args.session, &relocations);
    output(
        &json!({
            "canceled_session_id": args.session,
            "relocations": relocations,
            "valid": issues.is_empty(),
            "issues": issues,
        }),
        flags.format,
    )
}
