pub mod engine;
pub mod error;
pub mod outcome;

pub use engine::{AuditEngine, LighthouseEngine};
pub use error::RunnerError;
pub use outcome::{AuditRequest, EngineOutcome, OutputFormat};
