//! Generative model integration for résumé tailoring

pub mod client;
pub mod prompts;
pub mod tailor;
