pub mod board;
pub mod games;
pub mod moves;
pub mod players;
pub mod pool;
