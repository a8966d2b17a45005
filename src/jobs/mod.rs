//! Job postings and the deterministic selection logic
//! Handles the posting model, title filtering, deduplication and ordering

pub mod posting;
pub mod filter;
pub mod dedup;

pub use posting::{JobPosting, JobSource};
