pub mod extract;
pub mod score;
