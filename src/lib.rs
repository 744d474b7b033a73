pub mod cli;
pub mod config;
pub mod crew;
pub mod generator;
pub mod llm;
pub mod logging;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use generator::pipeline::{BlogDraft, PipelineError};
pub use generator::request::{BlogRequest, Credentials};
pub use generator::workflow::BlogWorkflow;
