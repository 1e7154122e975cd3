pub mod analyzer;
pub mod app;
pub mod core;
pub mod queue;
pub mod workers;
