pub mod aggregation;
pub mod classifier;
pub mod finalize;
pub mod salary;

