pub mod report;
pub mod tips;
