pub mod clarifier;
pub mod query_planner;
pub mod report_writer;
pub mod search_executor;

pub use clarifier::generate_clarifying_questions;
pub use query_planner::{QueryPlanner, plan_queries};
pub use report_writer::{ReportWriter, synthesize_report};
pub use search_executor::{SearchExecutor, execute_search};
