// All core functionality is in journalfmt-core
// This CLI acts as a thin wrapper around the core library

// CLI-specific modules
pub mod review;

// Re-export core types for convenience
pub use journalfmt_core::*;

// Re-export CLI utilities
pub use review::{describe_sections, load_sections, save_sections, ReviewError};
