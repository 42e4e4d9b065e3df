pub mod common;
pub mod config;
pub mod heuristic;
pub mod map;
pub mod planner;
pub mod stat;
pub mod task;

pub use common::{Agent, Constraint, Interval, Move, Node, Path};
pub use heuristic::Heuristic;
pub use map::Map;
pub use planner::Sipp;
