pub mod allocation;
pub mod questionnaire;

pub use questionnaire::RiskProfile;
