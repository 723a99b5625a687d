pub mod filter;
pub mod handoff;
pub mod json_detector;
pub mod traits;
