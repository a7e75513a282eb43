use std::collections::{HashMap, HashSet};

use cursus_config::PlannerConfig;
use cursus_core::entities::{Relocation, SessionSummary, TermSnapshot};
use cursus_core::enums::CoverageLevel;
use cursus_core::ordering::compare_positions;

use super::{PlannerRequest, RelocationPlanner, RelocationSuggestion};

/// Proposes targets by closeness to the canceled session.
///
/// For each uniquely lost `(skill, level)` the first non-empty group wins:
/// same module and category, same module, same category, any active
/// session. With `prefer_same_module` off, category is tried before module.
/// Targets rotate within a group so one session does not absorb everything.
#[derive(Clone, Copy, Debug)]
pub struct HeuristicPlanner {
    max_suggestions: usize,
    prefer_same_module: bool,
}

impl HeuristicPlanner {
    #[must_use]
    pub const fn new(config: &PlannerConfig) -> Self {
        Self {
            max_suggestions: config.max_suggestions,
            prefer_same_module: config.prefer_same_module,
        }
    }

    const fn tiers(self) -> [Tier; 4] {
        if self.prefer_same_module {
            [Tier::ModuleAndCategory, Tier::Module, Tier::Category, Tier::Any]
        } else {
            [Tier::ModuleAndCategory, Tier::Category, Tier::Module, Tier::Any]
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tier {
    ModuleAndCategory,
    Module,
    Category,
    Any,
}

impl Tier {
    const fn confidence(self) -> f64 {
        match self {
            Self::ModuleAndCategory => 0.9,
            Self::Module => 0.8,
            Self::Category => 0.7,
            Self::Any => 0.5,
        }
    }

    fn rationale(self, module_id: &str, category: Option<&str>) -> String {
        let category = category.unwrap_or("unknown");
        match self {
            Self::ModuleAndCategory => {
                format!("same module ({module_id}) and already teaches {category} skills")
            }
            Self::Module => format!("same module ({module_id})"),
            Self::Category => format!("already teaches {category} skills"),
            Self::Any => "next available active session".to_string(),
        }
    }

    fn matches(
        self,
        session: &SessionSummary,
        module_id: &str,
        category: Option<&str>,
        taught: &HashMap<&str, HashSet<&str>>,
    ) -> bool {
        let same_module = session.module_id == module_id;
        let same_category = category.is_some_and(|category| {
            taught
                .get(session.id.as_str())
                .is_some_and(|categories| categories.contains(category))
        });
        match self {
            Self::ModuleAndCategory => same_module && same_category,
            Self::Module => same_module,
            Self::Category => same_category,
            Self::Any => true,
        }
    }
}

/// Categories of the skills each active session covers.
fn taught_categories(snapshot: &TermSnapshot) -> HashMap<&str, HashSet<&str>> {
    let canceled = snapshot.canceled_session_ids();
    let mut taught: HashMap<&str, HashSet<&str>> = HashMap::new();
    for event in &snapshot.coverages {
        if canceled.contains(&event.session_id) {
            continue;
        }
        if let Some(skill) = snapshot.skill(&event.skill_id) {
            taught
                .entry(event.session_id.as_str())
                .or_default()
                .insert(skill.category.as_str());
        }
    }
    taught
}

impl RelocationPlanner for HeuristicPlanner {
    fn suggest(&self, request: &PlannerRequest<'_>) -> Vec<RelocationSuggestion> {
        let snapshot = request.snapshot;
        let canceled_id = request.impact.canceled_session_id.as_str();
        let Some(canceled) = snapshot.session(canceled_id) else {
            tracing::warn!(session_id = canceled_id, "canceled session not in snapshot");
            return Vec::new();
        };
        let limit = request.limit.unwrap_or(self.max_suggestions);

        let mut candidates: Vec<&SessionSummary> = snapshot
            .sessions
            .iter()
            .filter(|s| s.status.is_active() && s.id != canceled.id)
            .collect();
        candidates.sort_by(|a, b| compare_positions(&a.position(), &b.position()));

        let taught = taught_categories(snapshot);
        let tiers = self.tiers();
        let mut cursors = [0usize; 4];
        let mut seen: HashSet<(&str, CoverageLevel)> = HashSet::new();
        let mut suggestions = Vec::new();

        for lost in request.impact.at_risk_skills.iter().filter(|s| s.unique_coverage) {
            if suggestions.len() >= limit {
                break;
            }
            if !seen.insert((lost.skill_id.as_str(), lost.level)) {
                continue;
            }

            let category = snapshot.skill(&lost.skill_id).map(|s| s.category.as_str());
            let pick = tiers.iter().enumerate().find_map(|(idx, tier)| {
                let group: Vec<&SessionSummary> = candidates
                    .iter()
                    .copied()
                    .filter(|s| tier.matches(s, &canceled.module_id, category, &taught))
                    .collect();
                (!group.is_empty()).then_some((idx, *tier, group))
            });
            let Some((idx, tier, group)) = pick else {
                tracing::warn!(
                    skill_id = %lost.skill_id,
                    level = %lost.level,
                    "no active session can take relocated coverage"
                );
                continue;
            };

            let target = group[cursors[idx] % group.len()];
            cursors[idx] += 1;

            suggestions.push(RelocationSuggestion {
                relocation: Relocation {
                    skill_id: lost.skill_id.clone(),
                    level: lost.level,
                    from_session_id: canceled.id.clone(),
                    to_session_id: target.id.clone(),
                },
                target_session_code: target.code.clone(),
                confidence: tier.confidence(),
                rationale: tier.rationale(&canceled.module_id, category),
            });
        }

        tracing::debug!(
            session_id = canceled_id,
            suggestions = suggestions.len(),
            "planned relocations"
        );
        suggestions
    }
}

#[cfg(test)]
mod tests {
    use cursus_core::entities::{CoverageEvent, SkillSummary};
    use cursus_core::enums::SessionStatus;
    use cursus_core::whatif::simulate_cancellation;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn session(id: &str, module: &str, module_seq: i64, seq: i64) -> SessionSummary {
        SessionSummary {
            id: id.into(),
            code: id.to_uppercase(),
            title: id.into(),
            date: None,
            module_id: module.into(),
            module_sequence: module_seq,
            session_sequence: seq,
            status: SessionStatus::Scheduled,
        }
    }

    fn skill(id: &str, category: &str) -> SkillSummary {
        SkillSummary {
            id: id.into(),
            code: id.to_uppercase(),
            description: id.into(),
            category: category.into(),
        }
    }

    fn cover(snapshot: &mut TermSnapshot, session_id: &str, skill_id: &str, level: CoverageLevel) {
        let session = snapshot
            .session(session_id)
            .cloned()
            .unwrap_or_else(|| panic!("unknown session {session_id}"));
        snapshot.coverages.push(CoverageEvent {
            session_id: session.id,
            skill_id: skill_id.into(),
            level,
            session_date: session.date,
            session_sequence: session.session_sequence,
            module_sequence: session.module_sequence,
        });
    }

    /// `s1` is canceled. It alone introduces x (control), y (basics),
    /// t (tooling) and z (art).
    fn term() -> TermSnapshot {
        let mut canceled = session("s0", "mod-a", 0, 1);
        canceled.status = SessionStatus::Canceled;
        let mut snapshot = TermSnapshot {
            sessions: vec![
                session("s1", "mod-a", 0, 0),
                canceled,
                session("s2", "mod-a", 0, 2),
                session("s3", "mod-a", 0, 3),
                session("s4", "mod-b", 1, 0),
                session("s5", "mod-b", 1, 1),
            ],
            skills: vec![
                skill("x", "control"),
                skill("y", "basics"),
                skill("t", "tooling"),
                skill("z", "art"),
                skill("k", "control"),
                skill("b", "basics"),
                skill("g", "tooling"),
            ],
            ..TermSnapshot::default()
        };
        for id in ["x", "y", "t", "z"] {
            cover(&mut snapshot, "s1", id, CoverageLevel::Introduced);
        }
        cover(&mut snapshot, "s0", "k", CoverageLevel::Practiced);
        cover(&mut snapshot, "s2", "k", CoverageLevel::Practiced);
        cover(&mut snapshot, "s3", "b", CoverageLevel::Practiced);
        cover(&mut snapshot, "s4", "k", CoverageLevel::Assessed);
        cover(&mut snapshot, "s5", "g", CoverageLevel::Practiced);
        snapshot
    }

    fn planner(prefer_same_module: bool) -> HeuristicPlanner {
        HeuristicPlanner::new(&PlannerConfig {
            max_suggestions: 20,
            prefer_same_module,
        })
    }

    fn plan(
        planner: &HeuristicPlanner,
        snapshot: &TermSnapshot,
        limit: Option<usize>,
    ) -> Vec<(String, String, f64)> {
        let impact = simulate_cancellation(snapshot, "s1");
        planner
            .suggest(&PlannerRequest {
                snapshot,
                impact: &impact,
                limit,
            })
            .into_iter()
            .map(|s| (s.relocation.skill_id, s.relocation.to_session_id, s.confidence))
            .collect()
    }

    fn owned(rows: &[(&str, &str, f64)]) -> Vec<(String, String, f64)> {
        rows.iter()
            .map(|(skill, target, confidence)| {
                ((*skill).to_string(), (*target).to_string(), *confidence)
            })
            .collect()
    }

    #[test]
    fn same_module_is_preferred_over_category() {
        let snapshot = term();
        assert_eq!(
            plan(&planner(true), &snapshot, None),
            owned(&[
                ("x", "s2", 0.9),
                ("y", "s3", 0.9),
                ("t", "s2", 0.8),
                ("z", "s3", 0.8),
            ])
        );
    }

    #[test]
    fn category_is_preferred_when_module_preference_is_off() {
        let snapshot = term();
        assert_eq!(
            plan(&planner(false), &snapshot, None),
            owned(&[
                ("x", "s2", 0.9),
                ("y", "s3", 0.9),
                ("t", "s5", 0.7),
                ("z", "s2", 0.8),
            ])
        );
    }

    #[test]
    fn any_active_session_is_the_last_resort() {
        let mut snapshot = TermSnapshot {
            sessions: vec![session("s1", "mod-a", 0, 0), session("s9", "mod-z", 4, 0)],
            skills: vec![skill("x", "control")],
            ..TermSnapshot::default()
        };
        cover(&mut snapshot, "s1", "x", CoverageLevel::Introduced);

        assert_eq!(
            plan(&planner(true), &snapshot, None),
            owned(&[("x", "s9", 0.5)])
        );
    }

    #[test]
    fn canceled_sessions_are_never_targets() {
        let snapshot = term();
        let targets: Vec<String> = plan(&planner(true), &snapshot, None)
            .into_iter()
            .map(|(_, target, _)| target)
            .collect();
        assert!(!targets.iter().any(|t| t == "s0" || t == "s1"));
    }

    #[rstest]
    #[case(Some(1), 1)]
    #[case(Some(3), 3)]
    #[case(None, 4)]
    fn limit_caps_suggestions(#[case] limit: Option<usize>, #[case] expected: usize) {
        let snapshot = term();
        assert_eq!(plan(&planner(true), &snapshot, limit).len(), expected);
    }

    #[test]
    fn shared_coverage_is_not_relocated() {
        let mut snapshot = term();
        cover(&mut snapshot, "s4", "x", CoverageLevel::Introduced);
        let skills: Vec<String> = plan(&planner(true), &snapshot, None)
            .into_iter()
            .map(|(skill, _, _)| skill)
            .collect();
        assert_eq!(skills, vec!["y", "t", "z"]);
    }

    #[test]
    fn unknown_canceled_session_yields_nothing() {
        let snapshot = term();
        let impact = simulate_cancellation(&snapshot, "missing");
        let out = planner(true).suggest(&PlannerRequest {
            snapshot: &snapshot,
            impact: &impact,
            limit: None,
        });
        assert!(out.is_empty());
    }
}
