pub mod input;
pub mod rate_limit;
pub mod runner;

// Re-export common types
pub use input::load_companies;
pub use runner::BatchRunner;
