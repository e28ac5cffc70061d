pub mod banking;
pub mod duplicates;
