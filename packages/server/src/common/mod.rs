// Common types shared across the application

pub mod classify;
pub mod error;
pub mod pii;

pub use error::{PipelineError, PipelineResult};
