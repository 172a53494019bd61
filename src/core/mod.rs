//! Core subsystems: quota, AI client, aggregation, report generation

pub mod aggregator;
pub mod ai;
pub mod quota;
pub mod report;
