pub mod assistant;
pub mod eta;
pub mod speed;
