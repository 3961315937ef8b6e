//! WebGL Developer Tools Library
//!
//! Tooling for working on the WebGL conformance suite: test page generation,
//! closure compiler builds of the dEQP port, IDL extraction from the HTML
//! specifications and a local static server with caching disabled.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
