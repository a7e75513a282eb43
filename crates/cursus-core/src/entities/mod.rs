//! Value types for every entity the engine reads.
//!
//! These are read-only projections built by the collaborator immediately
//! before a call and discarded after it. All structs derive `Serialize`,
//! `Deserialize` and `JsonSchema` so snapshots can be exchanged as JSON files
//! and validated against a generated schema.

mod coverage;
mod gaie;
mod module;
mod relocation;
mod session;
mod skill;
mod snapshot;

pub use coverage::{CoverageEvent, TemporalPosition};
pub use gaie::GaieEntry;
pub use module::ModuleSummary;
pub use relocation::Relocation;
pub use session::SessionSummary;
pub use skill::SkillSummary;
pub use snapshot::{TermBundle, TermSnapshot};
