pub mod optimization;
pub mod sweep;
pub mod traits;
