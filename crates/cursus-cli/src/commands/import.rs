use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ImportArgs;
use crate::context::{AppContext, read_bundle_file};
use crate::output::output;

/// Handle `cursus import`.
pub async fn handle(
    args: &ImportArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let bundle = read_bundle_file(&args.file)?;
    let name = args
        .name
        .clone()
        .or_else(|| {
            args.file
                .file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "Imported term".to_string());

    let term = ctx.db().await?.import_bundle(&name, &bundle).await?;
    output(
        &json!({
            "term": term,
            "sessions": bundle.snapshot.sessions.len(),
            "coverages": bundle.snapshot.coverages.len(),
            "skills": bundle.snapshot.skills.len(),
            "gaie": bundle.gaie.len(),
        }),
        flags.format,
    )
}
