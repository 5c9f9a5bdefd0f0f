pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "sip")]
pub mod sip;

#[cfg(feature = "lump_sum")]
pub mod lump_sum;

#[cfg(feature = "scenarios")]
pub mod scenarios;

#[cfg(feature = "risk_profile")]
pub mod risk_profile;

#[cfg(feature = "goals")]
pub mod goals;

#[cfg(feature = "portfolio")]
pub mod portfolio;

pub use error::PlannerError;
pub use types::*;

/// Standard result type for all planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;
