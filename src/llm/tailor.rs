//! Résumé tailoring: description fetch, prompt, model call and parsing

use crate::config::ProfileConfig;
use crate::error::Result;
use crate::jobs::dedup::prioritize;
use crate::jobs::posting::JobPosting;
use crate::llm::client::{strip_json_fences, TextGenerator};
use crate::llm::prompts::{PromptParams, PromptTemplates};
use crate::output::storage::save_tailored;
use crate::resume::{TailoredCv, TailoredResult};
use crate::scraping::description::DescriptionSource;
use crate::scraping::http::pause;
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, warn};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// The candidate's base CV and project pool
#[derive(Debug, Clone)]
pub struct Profile {
    pub current_cv: Value,
    pub project_pool: Value,
}

impl Profile {
    /// Load the profile files; a missing file warns and falls back to empty
    pub fn load(config: &ProfileConfig) -> Result<Self> {
        let current_cv = load_or(&config.current_cv, Value::Object(Default::default()))?;
        let project_pool = match &config.project_pool {
            Some(path) => load_or(path, Value::Array(Vec::new()))?,
            None => Value::Array(Vec::new()),
        };
        Ok(Self {
            current_cv,
            project_pool,
        })
    }
}

fn load_or(path: &Path, fallback: Value) -> Result<Value> {
    if !path.exists() {
        println!("⚠️  Warning: File not found at {}", path.display());
        return Ok(fallback);
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Placeholder description used when the posting page yields nothing
pub fn fallback_description(job: &JobPosting) -> String {
    format!(
        "Job Title: {} at {}. Location: {}. (Full description could not be fetched).",
        job.title, job.company, job.location
    )
}

/// Parse a model reply into a tailored CV, filling in personal details
/// from the base CV when the model dropped them
pub fn parse_reply(reply: &str, base_cv: &Value) -> Result<TailoredCv> {
    let cleaned = strip_json_fences(reply);
    let mut cv: TailoredCv = serde_json::from_str(&cleaned)?;
    cv.tailored_cv.merge_personal_info(base_cv);
    Ok(cv)
}

pub struct CvTailor<G, D> {
    generator: G,
    descriptions: D,
    profile: Profile,
    templates: PromptTemplates,
    request_delay: f64,
    output_dir: PathBuf,
}

impl<G, D> CvTailor<G, D>
where
    G: TextGenerator,
    D: DescriptionSource,
{
    pub fn new(generator: G, descriptions: D, profile: Profile, output_dir: PathBuf) -> Self {
        Self {
            generator,
            descriptions,
            profile,
            templates: PromptTemplates::default(),
            request_delay: 2.0,
            output_dir,
        }
    }

    pub fn with_request_delay(mut self, seconds: f64) -> Self {
        self.request_delay = seconds;
        self
    }

    async fn try_generate(&self, job: &JobPosting) -> Result<TailoredResult> {
        println!("  📄 Fetching job description...");
        let mut job_description = self.descriptions.fetch(&job.url).await;

        if job_description.is_empty() {
            println!("  ⚠️  No job description found (or blocked), using title only...");
            job_description = fallback_description(job);
        } else {
            println!("  ✓ Got JD ({} chars)", job_description.chars().count());
        }

        let prompt = self.templates.render_tailor_cv(&PromptParams {
            current_cv: &self.profile.current_cv,
            project_pool: &self.profile.project_pool,
            job,
            job_description: &job_description,
        });

        println!("  🤖 Calling {}...", self.generator.model_name());
        let reply = self.generator.generate_json(&prompt).await?;
        let tailored_cv = parse_reply(&reply, &self.profile.current_cv)?;

        println!(
            "  ✅ CV tailored! Match score: {}",
            tailored_cv.job_analysis.match_score
        );

        Ok(TailoredResult {
            job: job.clone(),
            job_description,
            tailored_cv,
            generated_at: Local::now().to_rfc3339(),
        })
    }

    /// Tailor the CV for one posting; failures are reported and yield `None`
    pub async fn generate_tailored_cv(&self, job: &JobPosting) -> Option<TailoredResult> {
        println!("\n🎯 Tailoring CV for: {}", job);
        match self.try_generate(job).await {
            Ok(result) => Some(result),
            Err(e) => {
                println!("  ❌ Error generating CV: {}", e);
                None
            }
        }
    }

    /// Tailor CVs for up to `max_cvs` postings, priority postings first.
    /// Each success is written to the output directory as it completes.
    pub async fn generate_all(&self, jobs: &[JobPosting], max_cvs: usize) -> Vec<TailoredResult> {
        let queue = prioritize(jobs, max_cvs);
        println!("\n🎨 Starting CV generation for {} of {} jobs...", queue.len(), jobs.len());

        let progress = ProgressBar::new(queue.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}") {
            progress.set_style(style);
        }

        let mut results = Vec::new();
        let total = queue.len();

        for (i, job) in queue.iter().enumerate() {
            let index = i + 1;
            progress.set_message(format!("{}", job));
            println!("\n[{}/{}] Processing: {}", index, total, job);

            if let Some(result) = self.generate_tailored_cv(job).await {
                if let Err(e) = save_tailored(&result, &self.output_dir, index) {
                    error!("Failed to save tailored CV for {}: {}", job, e);
                }
                results.push(result);
            }
            progress.inc(1);

            if index < total {
                pause(self.request_delay).await;
            }
        }

        progress.finish_and_clear();
        if results.len() < total {
            warn!("{} of {} CVs could not be generated", total - results.len(), total);
        }
        println!("\n✅ Generated {} tailored CVs!", results.len());
        results
    }
}
