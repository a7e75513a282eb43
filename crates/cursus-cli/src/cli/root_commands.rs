use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Validate coverage ordering and plan hygiene for one term.
    Validate(ValidateArgs),
    /// Simulate canceling a session.
    Whatif(WhatifArgs),
    /// Compare canceling one session against canceling another.
    Compare(CompareArgs),
    /// Check a redistribution of a canceled session's coverage.
    Redistribute(RedistributeArgs),
    /// Analyse moving a session without applying the move.
    #[command(name = "move-impact")]
    MoveImpact(MoveImpactArgs),
    /// Skill by session coverage matrix with health summary.
    Matrix(MatrixArgs),
    /// Suggest where a session's uniquely covered skills could go.
    Suggest(SuggestArgs),
    /// Cancel a stored session, optionally redistributing its coverage.
    Cancel(CancelArgs),
    /// Move a stored session to a new date, module or sequence.
    Move(MoveArgs),
    /// Import a JSON snapshot into the term store as a new term.
    Import(ImportArgs),
    /// List stored terms.
    Terms,
}

impl Commands {
    /// Command name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Validate(_) => "validate",
            Self::Whatif(_) => "whatif",
            Self::Compare(_) => "compare",
            Self::Redistribute(_) => "redistribute",
            Self::MoveImpact(_) => "move-impact",
            Self::Matrix(_) => "matrix",
            Self::Suggest(_) => "suggest",
            Self::Cancel(_) => "cancel",
            Self::Move(_) => "move",
            Self::Import(_) => "import",
            Self::Terms => "terms",
        }
    }
}

/// Arguments for `cursus validate`.
#[derive(Clone, Debug, Args)]
pub struct ValidateArgs {
    /// Exit with an error when the report contains errors.
    #[arg(long)]
    pub fail_on_error: bool,
}

/// Arguments for `cursus whatif`.
#[derive(Clone, Debug, Args)]
pub struct WhatifArgs {
    /// Session to cancel hypothetically.
    pub session: String,
}

/// Arguments for `cursus compare`.
#[derive(Clone, Debug, Args)]
pub struct CompareArgs {
    pub session_a: String,
    pub session_b: String,
}

/// Arguments for `cursus redistribute`.
#[derive(Clone, Debug, Args)]
pub struct RedistributeArgs {
    /// Session being canceled.
    pub session: String,
    /// Relocation as `skill:level:target_session`; repeatable.
    #[arg(long = "to", value_name = "SKILL:LEVEL:TARGET")]
    pub to: Vec<String>,
}

/// New temporal coordinates for `cursus move-impact`.
#[derive(Clone, Debug, Args)]
pub struct MoveImpactArgs {
    pub session: String,
    /// New date (RFC 3339 or YYYY-MM-DD).
    #[arg(long, conflicts_with = "clear_date")]
    pub date: Option<String>,
    /// Make the session undated.
    #[arg(long)]
    pub clear_date: bool,
    /// New module sequence.
    #[arg(long)]
    pub module_sequence: Option<i64>,
    /// New session sequence within the module.
    #[arg(long)]
    pub session_sequence: Option<i64>,
}

/// Arguments for `cursus matrix`.
#[derive(Clone, Debug, Args)]
pub struct MatrixArgs {
    /// Row filter: all, gaps, at-risk.
    #[arg(long, default_value = "all")]
    pub filter: String,
}

/// Arguments for `cursus suggest`.
#[derive(Clone, Debug, Args)]
pub struct SuggestArgs {
    pub session: String,
    /// Cap on suggestions (defaults to planner.max_suggestions).
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Arguments for `cursus cancel`.
#[derive(Clone, Debug, Args)]
pub struct CancelArgs {
    pub session: String,
    #[arg(long)]
    pub reason: Option<String>,
    /// Relocation as `skill:level:target_session`; repeatable.
    #[arg(long = "to", value_name = "SKILL:LEVEL:TARGET")]
    pub to: Vec<String>,
    /// Apply even if the cancellation introduces ordering violations.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `cursus move`.
#[derive(Clone, Debug, Args)]
pub struct MoveArgs {
    pub session: String,
    /// New date (RFC 3339 or YYYY-MM-DD).
    #[arg(long, conflicts_with = "clear_date")]
    pub date: Option<String>,
    /// Make the session undated.
    #[arg(long)]
    pub clear_date: bool,
    /// Target module id.
    #[arg(long)]
    pub module: Option<String>,
    /// New session sequence within the module.
    #[arg(long)]
    pub sequence: Option<i64>,
    /// Apply even if the move introduces ordering violations.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `cursus import`.
#[derive(Clone, Debug, Args)]
pub struct ImportArgs {
    /// Snapshot file (a `TermBundle` JSON document).
    pub file: PathBuf,
    /// Term name (defaults to the file stem).
    #[arg(long)]
    pub name: Option<String>,
}
