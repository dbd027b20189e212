pub mod board;
pub mod transform;

pub use board::{find_card, find_column, Card, CardLocation, Column};
