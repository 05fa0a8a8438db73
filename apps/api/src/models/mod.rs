pub mod recommendation;
pub mod survey;
