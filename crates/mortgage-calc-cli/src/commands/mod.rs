pub mod calculators;
pub mod schedule;
