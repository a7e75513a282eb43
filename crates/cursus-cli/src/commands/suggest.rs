use serde::Serialize;

use cursus_core::entities::{Relocation, TermSnapshot};
use cursus_core::issues::ValidationIssue;
use cursus_core::whatif::{simulate_cancellation, validate_redistribution};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SuggestArgs;
use crate::context::AppContext;
use crate::output::output_with_table;
use crate::output::table::{TableOptions, render_table};
use crate::planner::{PlannerRequest, RelocationPlanner, RelocationSuggestion};

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub canceled_session_id: String,
    pub unique_losses: usize,
    pub suggestions: Vec<RelocationSuggestion>,
    /// Ordering issues left if every suggestion were applied.
    pub issues: Vec<ValidationIssue>,
}

/// Handle `cursus suggest`.
pub async fn handle(
    args: &SuggestArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
    planner: &dyn RelocationPlanner,
) -> anyhow::Result<()> {
    let bundle = ctx.load_bundle(flags).await?;
    let snapshot = &bundle.snapshot;
    snapshot.require_session(&args.session)?;

    let response = plan(snapshot, &args.session, args.limit, planner);
    output_with_table(&response, flags.format, |options| {
        suggestion_table(&response, options)
    })
}

/// Simulate the cancellation, ask the planner, then check its proposal.
pub fn plan(
    snapshot: &TermSnapshot,
    session_id: &str,
    limit: Option<usize>,
    planner: &dyn RelocationPlanner,
) -> SuggestResponse {
    let impact = simulate_cancellation(snapshot, session_id);
    let suggestions = planner.suggest(&PlannerRequest {
        snapshot,
        impact: &impact,
        limit,
    });
    let relocations: Vec<Relocation> = suggestions.iter().map(|s| s.relocation.clone()).collect();
    let issues = validate_redistribution(&snapshot.active_view(), session_id, &relocations);

    SuggestResponse {
        canceled_session_id: session_id.to_string(),
        unique_losses: impact.unique_at_risk_count(),
        suggestions,
        issues,
    }
}

fn suggestion_table(response: &SuggestResponse, options: TableOptions) -> String {
    let rows = response
        .suggestions
        .iter()
        .map(|s| {
            vec![
                s.relocation.skill_id.clone(),
                s.relocation.level.to_string(),
                s.target_session_code.clone(),
                format!("{:.1}", s.confidence),
                s.rationale.clone(),
            ]
        })
        .collect::<Vec<_>>();
    let body = if rows.is_empty() {
        "(no suggestions)".to_string()
    } else {
        render_table(
            &["skill", "level", "target", "confidence", "rationale"],
            &rows,
            options,
        )
    };
    format!(
        "{body}\n\n{} of {} unique losses placed, {} ordering issue(s) remain",
        response.suggestions.len(),
        response.unique_losses,
        response.issues.len(),
    )
}

#[cfg(test)]
mod tests {
    use cursus_core::entities::{CoverageEvent, SessionSummary};
    use cursus_core::enums::{CoverageLevel, IssueKind, SessionStatus};
    use pretty_assertions::assert_eq;

    use super::*;

    /// Always proposes the same fixed target.
    struct FixedPlanner(&'static str);

    impl RelocationPlanner for FixedPlanner {
        fn suggest(&self, request: &PlannerRequest<'_>) -> Vec<RelocationSuggestion> {
            request
                .impact
                .at_risk_skills
                .iter()
                .filter(|s| s.unique_coverage)
                .map(|s| RelocationSuggestion {
                    relocation: Relocation {
                        skill_id: s.skill_id.clone(),
                        level: s.level,
                        from_session_id: request.impact.canceled_session_id.clone(),
                        to_session_id: self.0.to_string(),
                    },
                    target_session_code: self.0.to_uppercase(),
                    confidence: 1.0,
                    rationale: "fixed".into(),
                })
                .collect()
        }
    }

    /// sk-x introduced in s1, practiced in s3, assessed in s4.
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
        TermSnapshot {
            sessions: vec![session("s1", 1), session("s2", 2), session("s3", 3), session("s4", 4)],
            coverages: vec![
                event("s1", 1, CoverageLevel::Introduced),
                event("s3", 3, CoverageLevel::Practiced),
                event("s4", 4, CoverageLevel::Assessed),
            ],
            ..TermSnapshot::default()
        }
    }

    #[test]
    fn suggestions_that_keep_order_leave_no_issues() {
        let response = plan(&snapshot(), "s1", None, &FixedPlanner("s2"));
        assert_eq!(response.unique_losses, 1);
        assert_eq!(response.suggestions.len(), 1);
        assert!(response.issues.is_empty());
    }

    #[test]
    fn suggestions_that_break_order_are_reported() {
        let response = plan(&snapshot(), "s1", None, &FixedPlanner("s4"));
        let kinds: Vec<IssueKind> = response.issues.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![IssueKind::PracticedBeforeIntroduced]);
    }

    #[test]
    fn table_footer_counts_placements() {
        let response = plan(&snapshot(), "s1", None, &FixedPlanner("s2"));
        let out = suggestion_table(
            &response,
            TableOptions {
                max_width: None,
                color: false,
            },
        );
        assert!(out.ends_with("1 of 1 unique losses placed, 0 ordering issue(s) remain"));
    }
}
