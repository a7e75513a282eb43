use serde_json::json;

use cursus_core::entities::{Relocation, TermSnapshot};
use cursus_core::issues::ValidationIssue;
use cursus_core::rules::validate_all_ordering;
use cursus_core::whatif::{new_violations, simulate_cancellation, validate_redistribution};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CancelArgs;
use crate::commands::shared::parse::parse_relocations;
use crate::commands::shared::violations::describe;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cursus cancel`.
///
/// Always works on the stored term that owns the session.
pub async fn handle(
    args: &CancelArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let relocations = parse_relocations(&args.to, &args.session)?;
    let db = ctx.db().await?;
    let term_id = db.term_id_for_session(&args.session).await?;
    let snapshot = db.load_term_snapshot(&term_id).await?;

    let introduced = check_cancellation(&snapshot, &args.session, &relocations, args.force)?;
    let impact = simulate_cancellation(&snapshot, &args.session);
    let session = db
        .cancel_session(&args.session, args.reason.as_deref(), &relocations)
        .await?;

    output(
        &json!({
            "session": session,
            "relocations": relocations,
            "impact": impact,
            "introduced_violations": introduced,
        }),
        flags.format,
    )
}

/// Reject a cancellation the store must not apply.
///
/// Returns the ordering violations the cancellation would introduce; a
/// non-empty result is only accepted with `force`. Coverage still stored on
/// sessions canceled earlier does not count on either side.
pub fn check_cancellation(
    snapshot: &TermSnapshot,
    session_id: &str,
    relocations: &[Relocation],
    force: bool,
) -> anyhow::Result<Vec<ValidationIssue>> {
    let session = snapshot.require_session(session_id)?;
    if session.is_canceled() {
        anyhow::bail!("session {session_id} is already canceled");
    }
    snapshot.check_relocation_targets(session_id, relocations)?;

    let active = snapshot.active_view();
    let before = validate_all_ordering(&active.coverages);
    let after = validate_redistribution(&active, session_id, relocations);
    let introduced = new_violations(&before, after);
    if !introduced.is_empty() && !force {
        anyhow::bail!(
            "canceling {session_id} would introduce {} ordering violation(s):\n{}\nrelocate the coverage with --to or pass --force",
            introduced.len(),
            describe(&introduced)
        );
    }
    Ok(introduced)
}

#[cfg(test)]
mod tests {
    use cursus_core::entities::{CoverageEvent, SessionSummary};
    use cursus_core::enums::{CoverageLevel, SessionStatus};

    use super::*;
    use crate::commands::shared::parse::parse_relocation;

    fn snapshot() -> TermSnapshot {
        let session = |id: &str, seq: i64| SessionSummary {
            id: id.into(),
            code: id.to_uppercase(),
            title: id.into(),
            date: None,
            module_id: "mod-a".into(),
            module_sequence: 0,
            session_sequence: seq,
            status: SessionStatus::Scheduled,
        };
        let event = |session: &str, seq: i64, level| CoverageEvent {
            session_id: session.into(),
            skill_id: "sk-x".into(),
            level,
            session_date: None,
            session_sequence: seq,
            module_sequence: 0,
        };
        let mut canceled = session("s0", 0);
        canceled.status = SessionStatus::Canceled;
        TermSnapshot {
            sessions: vec![canceled, session("s1", 1), session("s2", 2), session("s3", 3)],
            coverages: vec![
                event("s1", 1, CoverageLevel::Introduced),
                event("s3", 3, CoverageLevel::Practiced),
            ],
            ..TermSnapshot::default()
        }
    }

    #[test]
    fn cancel_that_breaks_order_needs_force() {
        let snapshot = snapshot();
        let err = check_cancellation(&snapshot, "s1", &[], false).unwrap_err();
        assert!(err.to_string().contains("practiced_before_introduced"));

        let forced = check_cancellation(&snapshot, "s1", &[], true).unwrap();
        assert_eq!(forced.len(), 1);
    }

    #[test]
    fn relocation_that_repairs_order_is_accepted() {
        let snapshot = snapshot();
        let relocation = parse_relocation("sk-x:introduced:s2", "s1").unwrap();
        let introduced = check_cancellation(&snapshot, "s1", &[relocation], false).unwrap();
        assert!(introduced.is_empty());
    }

    #[test]
    fn coverage_left_on_a_canceled_session_does_not_satisfy_order() {
        let mut snapshot = snapshot();
        // s0 was canceled earlier; its introduction row is still stored.
        snapshot.coverages.push(CoverageEvent {
            session_id: "s0".into(),
            skill_id: "sk-x".into(),
            level: CoverageLevel::Introduced,
            session_date: None,
            session_sequence: 0,
            module_sequence: 0,
        });

        let expected: Vec<_> = simulate_cancellation(&snapshot, "s1")
            .new_violations
            .iter()
            .map(ValidationIssue::key)
            .collect();
        assert_eq!(expected.len(), 1);

        let err = check_cancellation(&snapshot, "s1", &[], false).unwrap_err();
        assert!(err.to_string().contains("practiced_before_introduced"));

        let forced = check_cancellation(&snapshot, "s1", &[], true).unwrap();
        let keys: Vec<_> = forced.iter().map(ValidationIssue::key).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn harmless_cancel_is_accepted() {
        let snapshot = snapshot();
        assert!(check_cancellation(&snapshot, "s2", &[], false).unwrap().is_empty());
    }

    #[test]
    fn already_canceled_and_bad_targets_are_rejected() {
        let snapshot = snapshot();
        let err = check_cancellation(&snapshot, "s0", &[], true).unwrap_err();
        assert!(err.to_string().contains("already canceled"));

        let onto_canceled = parse_relocation("sk-x:introduced:s0", "s1").unwrap();
        let err = check_cancellation(&snapshot, "s1", &[onto_canceled], true).unwrap_err();
        assert!(err.to_string().contains("target session is canceled"));

        assert!(check_cancellation(&snapshot, "missing", &[], true).is_err());
    }
}
