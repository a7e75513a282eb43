//! Coverage levels, session status, progression stages and issue kinds.
//!
//! Enums use `snake_case` serialization, except [`ProgressionStage`] whose
//! stage names are hyphenated on the wire (`copy-paste`, `write-own`).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// CoverageLevel
// ---------------------------------------------------------------------------

/// Pedagogical depth at which a session covers a skill.
///
/// ```text
/// introduced → practiced → assessed
/// ```
///
/// The derived `Ord` follows the precedence chain.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum CoverageLevel {
    Introduced,
    Practiced,
    Assessed,
}

impl CoverageLevel {
    pub const ALL: [Self; 3] = [Self::Introduced, Self::Practiced, Self::Assessed];

    /// Position in the precedence chain (0, 1, 2).
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Introduced => 0,
            Self::Practiced => 1,
            Self::Assessed => 2,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Introduced => "introduced",
            Self::Practiced => "practiced",
            Self::Assessed => "assessed",
        }
    }
}

impl fmt::Display for CoverageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CoverageLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "introduced" | "i" => Ok(Self::Introduced),
            "practiced" | "p" => Ok(Self::Practiced),
            "assessed" | "a" => Ok(Self::Assessed),
            other => Err(format!(
                "unknown coverage level '{other}' (expected introduced, practiced or assessed)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

/// Scheduling status of a teaching session.
///
/// ```text
/// scheduled → canceled
///           → moved → canceled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Scheduled,
    Canceled,
    Moved,
}

impl SessionStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Scheduled | Self::Moved => &[Self::Canceled, Self::Moved],
            Self::Canceled => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Whether events on a session with this status count as active coverage.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Canceled)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Canceled => "canceled",
            Self::Moved => "moved",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ProgressionStage
// ---------------------------------------------------------------------------

/// Scaffolding stage of a GAIE assessment.
///
/// ```text
/// copy-paste → modify → write-own
/// ```
///
/// Stages may repeat but must never regress over the term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressionStage {
    CopyPaste,
    Modify,
    WriteOwn,
}

impl ProgressionStage {
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::CopyPaste => 0,
            Self::Modify => 1,
            Self::WriteOwn => 2,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CopyPaste => "copy-paste",
            Self::Modify => "modify",
            Self::WriteOwn => "write-own",
        }
    }
}

impl fmt::Display for ProgressionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// IssueKind
// ---------------------------------------------------------------------------

/// Every finding the validators can report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    PracticedBeforeIntroduced,
    AssessedBeforePracticed,
    AssessedBeforeIntroduced,
    GaieProgressionBroken,
    OrphanSkill,
    ModuleNoSkills,
    SkillNotAssessed,
}

impl IssueKind {
    /// Which bucket of the term report this kind belongs to.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::PracticedBeforeIntroduced
            | Self::AssessedBeforePracticed
            | Self::AssessedBeforeIntroduced
            | Self::GaieProgressionBroken => Severity::Error,
            Self::SkillNotAssessed | Self::ModuleNoSkills => Severity::Warning,
            Self::OrphanSkill => Severity::Info,
        }
    }

    /// Whether this kind is one of the three precedence-chain breaches.
    #[must_use]
    pub const fn is_ordering(self) -> bool {
        matches!(
            self,
            Self::PracticedBeforeIntroduced
                | Self::AssessedBeforePracticed
                | Self::AssessedBeforeIntroduced
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PracticedBeforeIntroduced => "practiced_before_introduced",
            Self::AssessedBeforePracticed => "assessed_before_practiced",
            Self::AssessedBeforeIntroduced => "assessed_before_introduced",
            Self::GaieProgressionBroken => "gaie_progression_broken",
            Self::OrphanSkill => "orphan_skill",
            Self::ModuleNoSkills => "module_no_skills",
            Self::SkillNotAssessed => "skill_not_assessed",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Serde roundtrip tests
    // -----------------------------------------------------------------------

    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected_str:expr) => {
            #[test]
            fn $name() {
                let val = $variant;
                let json = serde_json::to_string(&val).unwrap();
                assert_eq!(json, format!("\"{}\"", $expected_str));
                let recovered: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(recovered, val);
            }
        };
    }

    test_serde_roundtrip!(
        level_introduced,
        CoverageLevel,
        CoverageLevel::Introduced,
        "introduced"
    );
    test_serde_roundtrip!(
        level_assessed,
        CoverageLevel,
        CoverageLevel::Assessed,
        "assessed"
    );
    test_serde_roundtrip!(
        status_canceled,
        SessionStatus,
        SessionStatus::Canceled,
        "canceled"
    );
    test_serde_roundtrip!(
        stage_copy_paste,
        ProgressionStage,
        ProgressionStage::CopyPaste,
        "copy-paste"
    );
    test_serde_roundtrip!(
        stage_write_own,
        ProgressionStage,
        ProgressionStage::WriteOwn,
        "write-own"
    );
    test_serde_roundtrip!(
        issue_practiced_before_introduced,
        IssueKind,
        IssueKind::PracticedBeforeIntroduced,
        "practiced_before_introduced"
    );
    test_serde_roundtrip!(
        issue_gaie_progression_broken,
        IssueKind,
        IssueKind::GaieProgressionBroken,
        "gaie_progression_broken"
    );

    // -----------------------------------------------------------------------
    // as_str / Display consistency with serde
    // -----------------------------------------------------------------------

    #[test]
    fn as_str_matches_serde_for_all_issue_kinds() {
        for kind in [
            IssueKind::PracticedBeforeIntroduced,
            IssueKind::AssessedBeforePracticed,
            IssueKind::AssessedBeforeIntroduced,
            IssueKind::GaieProgressionBroken,
            IssueKind::OrphanSkill,
            IssueKind::ModuleNoSkills,
            IssueKind::SkillNotAssessed,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn levels_order_along_precedence_chain() {
        assert!(CoverageLevel::Introduced < CoverageLevel::Practiced);
        assert!(CoverageLevel::Practiced < CoverageLevel::Assessed);
        let ranks: Vec<u8> = CoverageLevel::ALL.iter().map(|l| l.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2]);
    }

    #[test]
    fn level_parses_short_and_long_names() {
        assert_eq!("i".parse::<CoverageLevel>(), Ok(CoverageLevel::Introduced));
        assert_eq!(
            "practiced".parse::<CoverageLevel>(),
            Ok(CoverageLevel::Practiced)
        );
        assert!("mastered".parse::<CoverageLevel>().is_err());
    }

    // -----------------------------------------------------------------------
    // State machine tests
    // -----------------------------------------------------------------------

    #[test]
    fn session_status_transitions() {
        assert!(SessionStatus::Scheduled.can_transition_to(SessionStatus::Canceled));
        assert!(SessionStatus::Scheduled.can_transition_to(SessionStatus::Moved));
        assert!(SessionStatus::Moved.can_transition_to(SessionStatus::Canceled));
        assert!(!SessionStatus::Canceled.can_transition_to(SessionStatus::Scheduled));
        assert!(!SessionStatus::Canceled.can_transition_to(SessionStatus::Moved));
    }

    #[test]
    fn only_canceled_sessions_are_inactive() {
        assert!(SessionStatus::Scheduled.is_active());
        assert!(SessionStatus::Moved.is_active());
        assert!(!SessionStatus::Canceled.is_active());
    }

    #[test]
    fn severities_bucket_issue_kinds() {
        assert_eq!(IssueKind::AssessedBeforeIntroduced.severity(), Severity::Error);
        assert_eq!(IssueKind::GaieProgressionBroken.severity(), Severity::Error);
        assert_eq!(IssueKind::SkillNotAssessed.severity(), Severity::Warning);
        assert_eq!(IssueKind::ModuleNoSkills.severity(), Severity::Warning);
        assert_eq!(IssueKind::OrphanSkill.severity(), Severity::Info);
        assert!(IssueKind::PracticedBeforeIntroduced.is_ordering());
        assert!(!IssueKind::GaieProgressionBroken.is_ordering());
    }
}
