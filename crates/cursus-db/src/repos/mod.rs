//! Repository methods, implemented as `impl CursusDb` blocks.

pub mod plan;
pub mod snapshot;
pub mod term;

pub use plan::SessionMove;
pub use term::{NewSession, TermRecord};
