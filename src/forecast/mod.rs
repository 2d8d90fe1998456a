pub mod engine;
pub mod remote;
pub mod smoothing;
