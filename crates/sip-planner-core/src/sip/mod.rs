//! Systematic investment plans: monthly contributions compounded monthly,
//! each contribution invested at the start of its month (annuity-due).

pub mod annuity;
pub mod inverse;
pub mod projection;

/// Longest horizon accepted by any SIP calculation (100 years).
pub const MAX_PERIOD_MONTHS: u32 = 1200;
