use serde_json::json;

use cursus_core::entities::{CoverageEvent, TemporalPosition};
use cursus_core::issues::ValidationIssue;
use cursus_core::moves::{MoveImpact, compute_move_impact};
use cursus_core::rules::validate_all_ordering;
use cursus_core::whatif::new_violations;
use cursus_db::repos::SessionMove;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::MoveArgs;
use crate::commands::shared::parse::parse_date_change;
use crate::commands::shared::violations::describe;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cursus move`.
pub async fn handle(
    args: &MoveArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let change = SessionMove {
        date: parse_date_change(args.date.as_deref(), args.clear_date)?,
        module_id: args.module.clone(),
        sequence: args.sequence,
    };
    if change.is_empty() {
        anyhow::bail!("nothing to move: pass --date, --clear-date, --module or --sequence");
    }

    let db = ctx.db().await?;
    let term_id = db.term_id_for_session(&args.session).await?;
    let snapshot = db.load_term_snapshot(&term_id).await?;
    let position = db.resolve_move(&args.session, &change).await?;

    let events = snapshot.active_coverages(&snapshot.canceled_session_ids());
    let (impact, introduced) = check_move(&args.session, position, &events, args.force)?;
    let session = db.move_session(&args.session, &change).await?;

    output(
        &json!({
            "session": session,
            "impact": impact,
            "introduced_violations": introduced,
        }),
        flags.format,
    )
}

/// Move impact plus the violations the move would introduce; a non-empty
/// list is only accepted with `force`.
pub fn check_move(
    session_id: &str,
    position: TemporalPosition,
    events: &[CoverageEvent],
    force: bool,
) -> anyhow::Result<(MoveImpact, Vec<ValidationIssue>)> {
    let before = validate_all_ordering(events);
    let impact = compute_move_impact(session_id, position, events);
    let introduced = new_violations(&before, impact.new_violations.clone());
    if !introduced.is_empty() && !force {
        anyhow::bail!(
            "moving {session_id} would introduce {} ordering violation(s):\n{}\npass --force to move anyway",
            introduced.len(),
            describe(&introduced)
        );
    }
    Ok((impact, introduced))
}

#[cfg(test)]
mod tests {
    use cursus_core::enums::CoverageLevel;

    use super::*;

    fn event(session: &str, seq: i64, level: CoverageLevel) -> CoverageEvent {
        CoverageEvent {
            session_id: session.into(),
            skill_id: "sk-x".into(),
            level,
            session_date: None,
            session_sequence: seq,
            module_sequence: 0,
        }
    }

    fn at(seq: i64) -> TemporalPosition {
        TemporalPosition {
            date: None,
            module_sequence: 0,
            session_sequence: seq,
        }
    }

    #[test]
    fn move_past_later_levels_is_refused() {
        let events = vec![
            event("s1", 1, CoverageLevel::Introduced),
            event("s2", 2, CoverageLevel::Practiced),
        ];
        let err = check_move("s1", at(5), &events, false).unwrap_err();
        assert!(err.to_string().contains("practiced_before_introduced"));

        let (impact, introduced) = check_move("s1", at(5), &events, true).unwrap();
        assert_eq!(introduced.len(), 1);
        assert_eq!(impact.affected_skill_ids, vec!["sk-x".to_string()]);
    }

    #[test]
    fn existing_violations_do_not_block_a_move() {
        // Already broken: practiced before introduced.
        let events = vec![
            event("s1", 1, CoverageLevel::Practiced),
            event("s2", 2, CoverageLevel::Introduced),
            event("s3", 3, CoverageLevel::Assessed),
        ];
        let (impact, introduced) = check_move("s3", at(4), &events, false).unwrap();
        assert!(introduced.is_empty());
        assert_eq!(impact.new_violations.len(), 1);
    }
}
