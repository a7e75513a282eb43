pub mod parse;
pub mod violations;
