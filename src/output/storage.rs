//! JSON persistence for scraped links, tailored CVs and run results

use crate::error::{JobTailorError, Result};
use crate::jobs::posting::JobPosting;
use crate::output::report::RunResults;
use crate::resume::TailoredResult;
use chrono::Local;
use log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use unicode_segmentation::UnicodeSegmentation;

/// Run timestamp used in file names
pub fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Keep alphanumerics, spaces and hyphens, then cut to `max` characters
pub fn safe_component(text: &str, max: usize) -> String {
    text.graphemes(true)
        .filter(|g| g.chars().all(|c| c.is_alphanumeric() || c == ' ' || c == '-'))
        .take(max)
        .collect()
}

/// `003_Acme Labs_AI Intern.json`
pub fn tailored_json_name(index: usize, company: &str, title: &str) -> String {
    format!(
        "{:03}_{}_{}.json",
        index,
        safe_component(company, 30),
        safe_component(title, 40)
    )
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content)?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(JobTailorError::InvalidInput(format!(
            "File does not exist: {}",
            path.display()
        )));
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_links(jobs: &[JobPosting], jobs_dir: &Path, timestamp: &str) -> Result<PathBuf> {
    let path = jobs_dir.join(format!("scraped_links_{}.json", timestamp));
    write_json(&path, jobs)?;
    println!("\n💾 Saved {} job links to {}", jobs.len(), path.display());
    Ok(path)
}

pub fn load_links(path: &Path) -> Result<Vec<JobPosting>> {
    read_json(path)
}

pub fn save_tailored(result: &TailoredResult, dir: &Path, index: usize) -> Result<PathBuf> {
    let name = tailored_json_name(index, &result.job.company, &result.job.title);
    let path = dir.join(&name);
    write_json(&path, result)?;
    println!("  💾 Saved: {}", name);
    Ok(path)
}

/// Load a saved tailored CV result; JSON without a `job` entry is rejected
pub fn load_tailored(path: &Path) -> Result<TailoredResult> {
    let value: serde_json::Value = read_json(path)?;
    if value.get("job").is_some() {
        return Ok(serde_json::from_value(value)?);
    }
    Err(JobTailorError::InvalidInput(format!(
        "{} is not a tailored CV result (missing \"job\")",
        path.display()
    )))
}

pub fn save_results(results: &RunResults, results_dir: &Path) -> Result<PathBuf> {
    let path = results_dir.join(format!("results_{}.json", results.timestamp));
    write_json(&path, results)?;
    info!("Saved run results to {}", path.display());
    Ok(path)
}
