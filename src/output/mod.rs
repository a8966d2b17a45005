//! Output: saved JSON, rendered PDFs and console summaries

pub mod pdf;
pub mod report;
pub mod storage;
