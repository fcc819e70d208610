pub mod baseline;
pub mod stress_testing;
pub mod templates;
