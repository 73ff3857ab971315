//! booklib application library
//!
//! Project modules (book catalog, URL processor), the bootstrap that wires
//! them to storage and HTTP, and shared utilities.

pub mod bootstrap;
pub mod modules;
pub mod utils;

/// Re-export commonly used types
pub use modules::*;
