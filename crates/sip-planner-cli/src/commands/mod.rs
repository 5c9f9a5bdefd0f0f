pub mod lump_sum;
pub mod planning;
pub mod sip;
