//! Report generation: document types, prompt construction, orchestration

pub mod generator;
pub mod prompt;
pub mod types;

pub use generator::{GeneratorTiming, ReportGenerator, ScheduledReports};
pub use types::{AiStatus, DataSnapshot, ReportDocument, ReportKind, ReportPeriod, ReportSummary};
