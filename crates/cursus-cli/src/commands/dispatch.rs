use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;
use crate::planner::HeuristicPlanner;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Validate(args) => commands::validate::handle(&args, ctx, flags).await,
        Commands::Whatif(args) => commands::whatif::handle(&args, ctx, flags).await,
        Commands::Compare(args) => commands::compare::handle(&args, ctx, flags).await,
        Commands::Redistribute(args) => commands::redistribute::handle(&args, ctx, flags).await,
        Commands::MoveImpact(args) => commands::move_impact::handle(&args, ctx, flags).await,
        Commands::Matrix(args) => commands::matrix::handle(&args, ctx, flags).await,
        Commands::Suggest(args) => {
            let planner = HeuristicPlanner::new(&ctx.config.planner);
            commands::suggest::handle(&args, ctx, flags, &planner).await
        }
        Commands::Cancel(args) => commands::cancel::handle(&args, ctx, flags).await,
        Commands::Move(args) => commands::move_session::handle(&args, ctx, flags).await,
        Commands::Import(args) => commands::import::handle(&args, ctx, flags).await,
        Commands::Terms => commands::terms::handle(ctx, flags).await,
    }
}
