pub mod cancel;
pub mod compare;
pub mod dispatch;
pub mod import;
pub mod matrix;
pub mod move_impact;
pub mod move_session;
pub mod redistribute;
pub mod shared;
pub mod suggest;
pub mod terms;
pub mod validate;
pub mod whatif;
