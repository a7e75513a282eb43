//! Temporal ordering policy shared by every check.
//!
//! Events are ordered by module sequence, then session sequence, then by
//! session date when both sides have one. Events with equal module and
//! session sequence are co-located: their relative order carries no meaning
//! and they are never flagged against each other.
//!
//! [`compare_positions`] is the policy itself. It is not a total order (an
//! undated event ties with every dated one at the same sequence), so sorting
//! goes through [`sort_key`], which refines it with undated events first.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::entities::{CoverageEvent, TemporalPosition};

/// Compare two positions under the ordering policy.
#[must_use]
pub fn compare_positions(a: &TemporalPosition, b: &TemporalPosition) -> Ordering {
    a.module_sequence
        .cmp(&b.module_sequence)
        .then(a.session_sequence.cmp(&b.session_sequence))
        .then_with(|| match (a.date, b.date) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => Ordering::Equal,
        })
}

/// Compare two events under the ordering policy.
#[must_use]
pub fn compare_events(a: &CoverageEvent, b: &CoverageEvent) -> Ordering {
    compare_positions(&a.position(), &b.position())
}

/// Whether two positions share module and session sequence.
#[must_use]
pub const fn is_co_located(a: &TemporalPosition, b: &TemporalPosition) -> bool {
    a.module_sequence == b.module_sequence && a.session_sequence == b.session_sequence
}

/// Total sort key consistent with [`compare_positions`].
#[must_use]
pub const fn sort_key(position: &TemporalPosition) -> (i64, i64, Option<DateTime<Utc>>) {
    (
        position.module_sequence,
        position.session_sequence,
        position.date,
    )
}

/// Stable sort of events into policy order.
pub fn sort_events(events: &mut [&CoverageEvent]) {
    events.sort_by_key(|e| sort_key(&e.position()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(module: i64, session: i64, day: Option<u32>) -> TemporalPosition {
        TemporalPosition {
            date: day.map(|d| Utc.with_ymd_and_hms(2026, 1, d, 9, 0, 0).unwrap()),
            module_sequence: module,
            session_sequence: session,
        }
    }

    #[test]
    fn module_sequence_dominates() {
        assert_eq!(
            compare_positions(&at(0, 9, Some(30)), &at(1, 0, Some(1))),
            Ordering::Less
        );
    }

    #[test]
    fn session_sequence_breaks_module_ties() {
        assert_eq!(
            compare_positions(&at(1, 2, None), &at(1, 1, None)),
            Ordering::Greater
        );
    }

    #[test]
    fn date_only_breaks_exact_sequence_ties() {
        assert_eq!(
            compare_positions(&at(1, 1, Some(5)), &at(1, 1, Some(6))),
            Ordering::Less
        );
        assert_eq!(
            compare_positions(&at(1, 1, Some(30)), &at(1, 2, Some(1))),
            Ordering::Less
        );
    }

    #[test]
    fn missing_date_ties() {
        assert_eq!(
            compare_positions(&at(1, 1, None), &at(1, 1, Some(6))),
            Ordering::Equal
        );
    }

    #[test]
    fn co_location_ignores_dates() {
        assert!(is_co_located(&at(2, 3, Some(1)), &at(2, 3, None)));
        assert!(!is_co_located(&at(2, 3, None), &at(2, 4, None)));
    }

    #[test]
    fn sort_key_agrees_with_policy_when_policy_is_strict() {
        let positions = [
            at(0, 0, None),
            at(0, 0, Some(3)),
            at(0, 1, Some(1)),
            at(1, 0, None),
            at(1, 0, Some(2)),
        ];
        for a in &positions {
            for b in &positions {
                let policy = compare_positions(a, b);
                if policy != Ordering::Equal {
                    assert_eq!(sort_key(a).cmp(&sort_key(b)), policy);
                }
            }
        }
    }
}
