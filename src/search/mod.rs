pub mod pruning;
pub mod executor;
pub mod results;
