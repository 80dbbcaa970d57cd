pub mod metadata;
pub mod parse;
