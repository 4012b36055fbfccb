pub mod export;
pub mod report;

// Re-export common types
pub use export::save_results_in_background;
pub use report::Summary;
