pub mod cli;
pub mod config;
pub mod generator;
pub mod llm;
pub mod search;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use generator::context::ResearchContext;
pub use generator::workflow::{generate_report, launch, run_workflow};
