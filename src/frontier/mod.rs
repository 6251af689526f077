pub mod engine;
pub mod heuristic;
pub mod outcome;
pub mod problem;
pub mod strategy;
