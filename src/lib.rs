//! Job tailor library: scrape postings, filter titles, tailor résumés

pub mod cli;
pub mod config;
pub mod error;
pub mod jobs;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod resume;
pub mod scraping;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use error::{JobTailorError, Result};
