//! Ordering validator and plan hygiene checks.
//!
//! A skill must be introduced before it is practiced, and practiced before
//! it is assessed. Events sharing a module and session sequence are checked
//! as one co-located group: a session may introduce and practice the same
//! skill.

use std::collections::{HashMap, HashSet};

use crate::entities::{CoverageEvent, GaieEntry};
use crate::enums::{CoverageLevel, IssueKind};
use crate::issues::ValidationIssue;
use crate::ordering::{is_co_located, sort_events};

/// Check the precedence chain for one skill.
#[must_use]
pub fn validate_skill_order(skill_id: &str, events: &[CoverageEvent]) -> Vec<ValidationIssue> {
    let mut skill_events: Vec<&CoverageEvent> =
        events.iter().filter(|e| e.skill_id == skill_id).collect();
    sort_events(&mut skill_events);

    let mut issues = Vec::new();
    let mut seen_introduced = false;
    let mut seen_practiced = false;

    for group in skill_events.chunk_by(|a, b| is_co_located(&a.position(), &b.position())) {
        seen_introduced |= group.iter().any(|e| e.level == CoverageLevel::Introduced);
        let group_practiced = group.iter().any(|e| e.level == CoverageLevel::Practiced);

        for event in group {
            match event.level {
                CoverageLevel::Introduced => {}
                CoverageLevel::Practiced => {
                    if !seen_introduced {
                        issues.push(ValidationIssue::ordering(
                            IssueKind::PracticedBeforeIntroduced,
                            event,
                        ));
                    }
                }
                CoverageLevel::Assessed => {
                    if !seen_introduced {
                        issues.push(ValidationIssue::ordering(
                            IssueKind::AssessedBeforeIntroduced,
                            event,
                        ));
                    }
                    if !(seen_practiced || group_practiced) {
                        issues.push(ValidationIssue::ordering(
                            IssueKind::AssessedBeforePracticed,
                            event,
                        ));
                    }
                }
            }
        }

        seen_practiced |= group_practiced;
    }

    issues
}

/// Check the precedence chain for every skill present in `events`.
///
/// Skills are visited in order of first appearance.
#[must_use]
pub fn validate_all_ordering(events: &[CoverageEvent]) -> Vec<ValidationIssue> {
    distinct_skill_ids(events)
        .into_iter()
        .flat_map(|skill_id| validate_skill_order(skill_id, events))
        .collect()
}

/// Skills in `all_skill_ids` with no coverage at all.
#[must_use]
pub fn find_orphan_skills(
    all_skill_ids: &[String],
    events: &[CoverageEvent],
) -> Vec<ValidationIssue> {
    let covered: HashSet<&str> = events.iter().map(|e| e.skill_id.as_str()).collect();
    all_skill_ids
        .iter()
        .filter(|id| !covered.contains(id.as_str()))
        .map(|id| ValidationIssue::orphan_skill(id))
        .collect()
}

/// Skills that are covered but never assessed.
#[must_use]
pub fn find_unassessed_skills(events: &[CoverageEvent]) -> Vec<ValidationIssue> {
    let mut assessed: HashMap<&str, bool> = HashMap::new();
    for event in events {
        *assessed.entry(event.skill_id.as_str()).or_default() |=
            event.level == CoverageLevel::Assessed;
    }

    distinct_skill_ids(events)
        .into_iter()
        .filter(|id| !assessed.get(id).copied().unwrap_or(false))
        .map(ValidationIssue::skill_not_assessed)
        .collect()
}

/// GAIE assessments must never regress: copy-paste → modify → write-own.
///
/// Entries are ordered by sequence, then date. Repeating a stage is fine;
/// only an entry below the highest stage seen so far is flagged.
#[must_use]
pub fn validate_gaie_progression(entries: &[GaieEntry]) -> Vec<ValidationIssue> {
    let mut sorted: Vec<&GaieEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| (e.sequence, e.date));

    let mut issues = Vec::new();
    let mut max_rank: Option<u8> = None;
    for entry in sorted {
        let rank = entry.progression_stage.rank();
        if max_rank.is_some_and(|max| rank < max) {
            issues.push(ValidationIssue::gaie_progression_broken(
                &entry.assessment_id,
                entry.progression_stage.as_str(),
            ));
        }
        max_rank = Some(max_rank.map_or(rank, |max| max.max(rank)));
    }
    issues
}

/// Distinct skill ids in order of first appearance.
pub(crate) fn distinct_skill_ids(events: &[CoverageEvent]) -> Vec<&str> {
    let mut seen = HashSet::new();
    events
        .iter()
        .map(|e| e.skill_id.as_str())
        .filter(|id| seen.insert(*id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::ProgressionStage;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn entry(
        skill: &str,
        level: CoverageLevel,
        module: i64,
        session: i64,
        id: &str,
    ) -> CoverageEvent {
        CoverageEvent {
            session_id: id.to_string(),
            skill_id: skill.to_string(),
            level,
            session_date: None,
            session_sequence: session,
            module_sequence: module,
        }
    }

    fn kinds(issues: &[ValidationIssue]) -> Vec<IssueKind> {
        issues.iter().map(|i| i.kind).collect()
    }

    use CoverageLevel::{Assessed, Introduced, Practiced};

    // -----------------------------------------------------------------------
    // validate_skill_order
    // -----------------------------------------------------------------------

    #[test]
    fn passes_when_order_is_introduced_practiced_assessed() {
        let events = vec![
            entry("A01", Introduced, 0, 0, "s1"),
            entry("A01", Practiced, 0, 1, "s2"),
            entry("A01", Assessed, 1, 0, "s3"),
        ];
        assert!(validate_skill_order("A01", &events).is_empty());
    }

    #[test]
    fn input_order_does_not_matter() {
        let events = vec![
            entry("A01", Assessed, 1, 0, "s3"),
            entry("A01", Introduced, 0, 0, "s1"),
            entry("A01", Practiced, 0, 1, "s2"),
        ];
        assert!(validate_skill_order("A01", &events).is_empty());
    }

    #[test]
    fn errors_when_practiced_before_introduced() {
        let events = vec![
            entry("A01", Practiced, 0, 0, "s1"),
            entry("A01", Introduced, 0, 1, "s2"),
        ];
        let issues = validate_skill_order("A01", &events);
        assert_eq!(kinds(&issues), vec![IssueKind::PracticedBeforeIntroduced]);
        assert_eq!(issues[0].session_id.as_deref(), Some("s1"));
    }

    #[test]
    fn lone_assessment_raises_both_assessed_errors() {
        let events = vec![entry("A01", Assessed, 0, 0, "s1")];
        let issues = validate_skill_order("A01", &events);
        assert_eq!(
            kinds(&issues),
            vec![
                IssueKind::AssessedBeforeIntroduced,
                IssueKind::AssessedBeforePracticed
            ]
        );
    }

    #[test]
    fn errors_when_assessed_before_practiced() {
        let events = vec![
            entry("A01", Introduced, 0, 0, "s1"),
            entry("A01", Assessed, 0, 1, "s2"),
            entry("A01", Practiced, 0, 2, "s3"),
        ];
        let issues = validate_skill_order("A01", &events);
        assert_eq!(kinds(&issues), vec![IssueKind::AssessedBeforePracticed]);
    }

    #[rstest]
    #[case(Introduced, Practiced)]
    #[case(Practiced, Introduced)]
    #[case(Assessed, Introduced)]
    #[case(Practiced, Assessed)]
    fn co_located_pair_with_introduction_never_conflicts(
        #[case] first: CoverageLevel,
        #[case] second: CoverageLevel,
    ) {
        let events = vec![
            entry("A01", first, 0, 0, "s1"),
            entry("A01", second, 0, 0, "s1"),
        ];
        let issues = validate_skill_order("A01", &events);
        // Only a missing prerequisite outside the pair may be reported.
        for issue in &issues {
            let pair_has_prereq = match issue.kind {
                IssueKind::PracticedBeforeIntroduced | IssueKind::AssessedBeforeIntroduced => {
                    first == Introduced || second == Introduced
                }
                IssueKind::AssessedBeforePracticed => first == Practiced || second == Practiced,
                _ => false,
            };
            assert!(!pair_has_prereq, "co-located events conflicted: {issue:?}");
        }
    }

    #[test]
    fn co_located_double_booking_from_different_sessions_is_permissive() {
        let events = vec![
            entry("A01", Practiced, 0, 3, "s-lab"),
            entry("A01", Introduced, 0, 3, "s-lec"),
        ];
        assert!(validate_skill_order("A01", &events).is_empty());
    }

    #[test]
    fn returns_empty_for_no_entries() {
        assert!(validate_skill_order("A01", &[]).is_empty());
    }

    #[test]
    fn filters_to_only_the_specified_skill() {
        let events = vec![
            entry("A01", Introduced, 0, 0, "s1"),
            entry("B01", Practiced, 0, 0, "s1"),
        ];
        assert!(validate_skill_order("A01", &events).is_empty());
        assert_eq!(validate_skill_order("B01", &events).len(), 1);
    }

    // -----------------------------------------------------------------------
    // validate_all_ordering
    // -----------------------------------------------------------------------

    #[test]
    fn validates_multiple_skills_at_once() {
        let events = vec![
            entry("A01", Practiced, 0, 0, "s1"),
            entry("B01", Assessed, 0, 0, "s1"),
            entry("C01", Introduced, 0, 0, "s1"),
        ];
        let issues = validate_all_ordering(&events);
        assert_eq!(issues.len(), 3);
        assert_eq!(issues[0].skill_id.as_deref(), Some("A01"));
        assert!(issues[1..].iter().all(|i| i.skill_id.as_deref() == Some("B01")));
    }

    #[test]
    fn validate_all_is_idempotent() {
        let events = vec![
            entry("A01", Assessed, 0, 0, "s1"),
            entry("A01", Practiced, 0, 1, "s2"),
        ];
        assert_eq!(validate_all_ordering(&events), validate_all_ordering(&events));
    }

    // -----------------------------------------------------------------------
    // find_orphan_skills / find_unassessed_skills
    // -----------------------------------------------------------------------

    #[test]
    fn finds_skills_with_no_coverage() {
        let all = vec!["A01".to_string(), "B01".to_string(), "C01".to_string()];
        let events = vec![entry("A01", Introduced, 0, 0, "s1")];
        let orphans: Vec<_> = find_orphan_skills(&all, &events)
            .into_iter()
            .filter_map(|i| i.skill_id)
            .collect();
        assert_eq!(orphans, vec!["B01".to_string(), "C01".to_string()]);
    }

    #[test]
    fn no_orphans_when_all_skills_are_covered() {
        let all = vec!["A01".to_string()];
        let events = vec![entry("A01", Introduced, 0, 0, "s1")];
        assert!(find_orphan_skills(&all, &events).is_empty());
    }

    #[test]
    fn finds_skills_never_assessed() {
        let events = vec![
            entry("A01", Introduced, 0, 0, "s1"),
            entry("A01", Practiced, 0, 1, "s2"),
            entry("B01", Introduced, 0, 0, "s1"),
            entry("B01", Assessed, 0, 2, "s3"),
            entry("C01", Practiced, 0, 1, "s2"),
        ];
        let unassessed: Vec<_> = find_unassessed_skills(&events)
            .into_iter()
            .map(|i| {
                assert_eq!(i.kind, IssueKind::SkillNotAssessed);
                i.skill_id.unwrap()
            })
            .collect();
        assert_eq!(unassessed, vec!["A01".to_string(), "C01".to_string()]);
    }

    // -----------------------------------------------------------------------
    // validate_gaie_progression
    // -----------------------------------------------------------------------

    fn gaie(id: &str, stage: ProgressionStage, sequence: i64) -> GaieEntry {
        GaieEntry {
            assessment_id: id.to_string(),
            progression_stage: stage,
            date: None,
            sequence,
        }
    }

    #[test]
    fn passes_for_correct_progression() {
        let entries = vec![
            gaie("g1", ProgressionStage::CopyPaste, 0),
            gaie("g2", ProgressionStage::Modify, 1),
            gaie("g3", ProgressionStage::WriteOwn, 2),
        ];
        assert!(validate_gaie_progression(&entries).is_empty());
    }

    #[test]
    fn errors_when_progression_goes_backwards() {
        let entries = vec![
            gaie("g1", ProgressionStage::Modify, 0),
            gaie("g2", ProgressionStage::CopyPaste, 1),
        ];
        let issues = validate_gaie_progression(&entries);
        assert_eq!(kinds(&issues), vec![IssueKind::GaieProgressionBroken]);
        assert!(issues[0].message.contains("g2"));
    }

    #[test]
    fn allows_repeated_stages() {
        let entries = vec![
            gaie("g1", ProgressionStage::CopyPaste, 0),
            gaie("g2", ProgressionStage::CopyPaste, 1),
            gaie("g3", ProgressionStage::Modify, 2),
            gaie("g4", ProgressionStage::Modify, 3),
        ];
        assert!(validate_gaie_progression(&entries).is_empty());
    }

    #[test]
    fn gaie_order_comes_from_sequence_not_input_order() {
        let entries = vec![
            gaie("g2", ProgressionStage::WriteOwn, 2),
            gaie("g1", ProgressionStage::CopyPaste, 0),
            gaie("g3", ProgressionStage::Modify, 3),
        ];
        let issues = validate_gaie_progression(&entries);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("g3"));
    }
}
