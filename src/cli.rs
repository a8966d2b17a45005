//! CLI interface for the job tailor

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "job-tailor")]
#[command(about = "Scrape fresh job postings and tailor a resume for each match")]
#[command(long_about = "Search job boards for entry-level AI/ML roles, filter titles with strict rules, and generate a tailored CV (JSON and PDF) per posting with a generative model")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline: scrape, tailor, render and summarise
    Run {
        /// Maximum number of CVs to generate
        #[arg(short, long)]
        max_cvs: Option<usize>,

        /// Only include postings from the last N hours (24, 168 or 720)
        #[arg(long)]
        hours_old: Option<u32>,

        /// Save tailored JSON only, without rendering PDFs
        #[arg(long)]
        skip_pdf: bool,
    },

    /// Scrape job links and save them without tailoring
    Scrape {
        /// Only include postings from the last N hours (24, 168 or 720)
        #[arg(long)]
        hours_old: Option<u32>,
    },

    /// Check job titles against the title rules
    Filter {
        /// Titles to check
        titles: Vec<String>,

        /// Read titles from a file, one per line
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Use the lenient rules applied while parsing search results
        #[arg(long)]
        inline: bool,
    },

    /// Tailor CVs for a previously saved links file
    Tailor {
        /// Path to a scraped_links_*.json file
        #[arg(short, long)]
        jobs: PathBuf,

        /// Maximum number of CVs to generate
        #[arg(short, long)]
        max_cvs: Option<usize>,

        /// Save tailored JSON only, without rendering PDFs
        #[arg(long)]
        skip_pdf: bool,
    },

    /// Render a PDF from a saved tailored CV
    Render {
        /// Path to a tailored CV JSON file
        #[arg(long)]
        cv: PathBuf,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Reset configuration to defaults
    Reset,
}

/// Validate file extension
pub fn validate_file_extension(path: &PathBuf, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
