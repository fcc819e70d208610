pub mod config;
pub mod error;
pub mod types;

#[cfg(feature = "stress_testing")]
pub mod stress_testing;

#[cfg(feature = "templates")]
pub mod templates;

pub use config::StressConfig;
pub use error::BankabilityError;
pub use types::*;

/// Standard result type for all bankability operations
pub type BankabilityResult<T> = Result<T, BankabilityError>;
