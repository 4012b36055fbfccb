pub mod classifier;
pub mod engine;
pub mod error;
pub mod http;
pub mod resolver;
pub mod result;

// Re-export common types
pub use engine::DiscoveryEngine;
pub use result::DiscoveryResult;
