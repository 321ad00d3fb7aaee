//! Shared vocabulary for the `specgen` test-suite generator.

pub mod config;
pub mod error;
pub mod types;

pub use config::{LayoutConfig, Options};
pub use error::TransformError;
pub use types::{RunSummary, TestCase};
