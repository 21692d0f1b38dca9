pub mod cache;
pub mod lead;
pub mod market;
pub mod sip;
