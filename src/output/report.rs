//! Run results and console summaries

use crate::jobs::posting::JobPosting;
use crate::resume::TailoredResult;
use colored::{Color, Colorize};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

const TOP_MATCHES: usize = 5;

/// Everything a full run produced, saved as `results_{timestamp}.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResults {
    pub timestamp: String,
    pub jobs_scraped: usize,
    pub cvs_generated: usize,
    pub job_links: Vec<JobPosting>,
    pub tailored_cvs: Vec<TailoredResult>,
}

impl RunResults {
    pub fn new(timestamp: String, job_links: Vec<JobPosting>, tailored_cvs: Vec<TailoredResult>) -> Self {
        Self {
            timestamp,
            jobs_scraped: job_links.len(),
            cvs_generated: tailored_cvs.len(),
            job_links,
            tailored_cvs,
        }
    }

    /// Mean match score, or `None` when nothing was tailored
    pub fn average_score(&self) -> Option<f64> {
        if self.tailored_cvs.is_empty() {
            return None;
        }
        let total: f64 = self.tailored_cvs.iter().map(TailoredResult::match_score).sum();
        Some(total / self.tailored_cvs.len() as f64)
    }

    /// Highest-scoring results, best first
    pub fn top_matches(&self, n: usize) -> Vec<&TailoredResult> {
        let mut ranked: Vec<&TailoredResult> = self.tailored_cvs.iter().collect();
        ranked.sort_by(|a, b| b.match_score().total_cmp(&a.match_score()));
        ranked.truncate(n);
        ranked
    }
}

/// Counts shown after scraping
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeSummary {
    pub total: usize,
    pub priority: usize,
    pub secondary: usize,
    /// Per-source counts, largest first
    pub by_source: Vec<(String, usize)>,
}

impl ScrapeSummary {
    pub fn from_jobs(jobs: &[JobPosting]) -> Self {
        let priority = jobs.iter().filter(|j| j.priority).count();

        let mut counts: HashMap<String, usize> = HashMap::new();
        for job in jobs {
            *counts.entry(job.source.to_string()).or_insert(0) += 1;
        }
        let mut by_source: Vec<(String, usize)> = counts.into_iter().collect();
        by_source.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            total: jobs.len(),
            priority,
            secondary: jobs.len() - priority,
            by_source,
        }
    }
}

/// Console rendering of run summaries
pub struct ConsoleReport {
    use_colors: bool,
}

impl ConsoleReport {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn header(&self, title: &str) -> String {
        let rule = "=".repeat(60);
        if self.use_colors {
            format!("\n{}\n{}\n{}", rule.color(Color::Blue), title.color(Color::Blue).bold(), rule.color(Color::Blue))
        } else {
            format!("\n{}\n{}\n{}", rule, title, rule)
        }
    }

    fn score(&self, score: f64) -> String {
        let text = format!("{:.0}", score);
        if !self.use_colors {
            return text;
        }
        let color = match score {
            s if s >= 80.0 => Color::Green,
            s if s >= 60.0 => Color::Yellow,
            _ => Color::Red,
        };
        text.color(color).bold().to_string()
    }

    pub fn scrape_summary(&self, summary: &ScrapeSummary) -> String {
        let mut out = self.header("📊 SCRAPING SUMMARY");
        out.push('\n');
        out.push_str(&format!("Total unique jobs: {}\n", summary.total));
        out.push_str(&format!("  ⭐ Priority matches: {}\n", summary.priority));
        out.push_str(&format!("  📌 Other matches: {}\n", summary.secondary));
        if !summary.by_source.is_empty() {
            out.push_str("By source:\n");
            for (source, count) in &summary.by_source {
                out.push_str(&format!("  {}: {}\n", source, count));
            }
        }
        out
    }

    /// Final summary; `locations` are labelled output paths
    pub fn run_summary(&self, results: &RunResults, locations: &[(&str, PathBuf)]) -> String {
        let mut out = self.header("✅ PIPELINE COMPLETE");
        out.push('\n');
        out.push_str(&format!("📊 Jobs scraped: {}\n", results.jobs_scraped));
        out.push_str(&format!("📄 CVs generated: {}\n", results.cvs_generated));

        match results.average_score() {
            Some(avg) => out.push_str(&format!("🎯 Average match score: {:.1}\n", avg)),
            None => out.push_str("🎯 Average match score: N/A\n"),
        }

        if !locations.is_empty() {
            out.push_str("\n📁 Files saved in:\n");
            for (label, path) in locations {
                out.push_str(&format!("  - {}: {}\n", label, path.display()));
            }
        }

        let top = results.top_matches(TOP_MATCHES);
        if !top.is_empty() {
            out.push_str(&format!("\n🏆 Top {} matches:\n", top.len()));
            for (i, result) in top.iter().enumerate() {
                out.push_str(&format!(
                    "{}. [{}] {} at {}\n",
                    i + 1,
                    self.score(result.match_score()),
                    result.job.title,
                    result.job.company
                ));
                out.push_str(&format!("   {}\n", result.job.url));
            }
        }
        out
    }
}
