//! End-to-end workflows behind each CLI command

use crate::config::Config;
use crate::error::{JobTailorError, Result};
use crate::jobs::filter::{TitleFilter, TitleVerdict};
use crate::jobs::posting::JobPosting;
use crate::llm::client::GeminiClient;
use crate::llm::tailor::{CvTailor, Profile};
use crate::output::pdf::generate_resume_pdf;
use crate::output::report::{ConsoleReport, RunResults, ScrapeSummary};
use crate::output::storage::{self, load_links, load_tailored, save_links, save_results};
use crate::resume::TailoredResult;
use crate::scraping::description::DescriptionFetcher;
use crate::scraping::http::build_client;
use crate::scraping::JobScraper;
use anyhow::Context;
use log::{error, info};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy)]
pub struct TailorOptions {
    pub max_cvs: usize,
    pub skip_pdf: bool,
}

pub struct Pipeline {
    config: Config,
    report: ConsoleReport,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        let report = ConsoleReport::new(config.output.color_output);
        Self { config, report }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Scrape all enabled boards and save the links under the run timestamp
    pub async fn scrape(&self, timestamp: &str) -> Result<(Vec<JobPosting>, PathBuf)> {
        let client = build_client(&self.config.http)?;
        let scraper = JobScraper::from_config(&self.config, client)?;

        let jobs = scraper.scrape_all().await;
        let path = save_links(&jobs, &self.config.jobs_dir(), timestamp)?;
        println!("{}", self.report.scrape_summary(&ScrapeSummary::from_jobs(&jobs)));
        Ok((jobs, path))
    }

    /// Tailor CVs for the given postings and optionally render their PDFs
    pub async fn tailor(&self, jobs: &[JobPosting], options: TailorOptions) -> Result<Vec<TailoredResult>> {
        let api_key = self.config.resolve_api_key()?;
        let generator = GeminiClient::new(&self.config.llm, api_key)?;
        let descriptions = DescriptionFetcher::new(build_client(&self.config.http)?);
        let profile = Profile::load(&self.config.profile)?;

        let tailor = CvTailor::new(generator, descriptions, profile, self.config.tailored_json_dir())
            .with_request_delay(self.config.delays.request_delay);
        let results = tailor.generate_all(jobs, options.max_cvs).await;

        if !options.skip_pdf {
            self.render_pdfs(&results);
        }
        Ok(results)
    }

    /// Render a PDF per result; failures are logged and skipped
    pub fn render_pdfs(&self, results: &[TailoredResult]) -> usize {
        if results.is_empty() {
            return 0;
        }
        println!("\n📄 Generating PDFs for {} CVs...", results.len());

        let out_dir = self.config.generated_pdf_dir();
        let mut rendered = 0;
        for result in results {
            match generate_resume_pdf(&result.tailored_cv.tailored_cv, &result.job.title, &result.job.company, &out_dir) {
                Ok(_) => rendered += 1,
                Err(e) => error!("Failed to render PDF for {}: {}", result.job, e),
            }
        }
        info!("Rendered {} of {} PDFs", rendered, results.len());
        rendered
    }

    /// Full pipeline. Returns `None` when no postings survived filtering.
    pub async fn run(&self, options: TailorOptions) -> Result<Option<RunResults>> {
        // The key must resolve before any scraping starts
        self.config.resolve_api_key()?;

        println!("🚀 Job tailor pipeline");
        println!("🔎 Roles: {}", self.config.all_roles().join(", "));
        println!("⏱️  Posted within: {}h", self.config.search.hours_old);

        let timestamp = storage::timestamp();
        let (jobs, _) = self.scrape(&timestamp).await?;

        if jobs.is_empty() {
            println!("\n⚠️  No jobs found. Links saved; nothing to tailor.");
            return Ok(None);
        }

        let tailored = self.tailor(&jobs, options).await?;
        let results = RunResults::new(timestamp, jobs, tailored);
        let results_path = save_results(&results, &self.config.results_dir())?;

        let mut locations = vec![
            ("Job links", self.config.jobs_dir()),
            ("Tailored CVs", self.config.tailored_json_dir()),
            ("Run results", results_path),
        ];
        if !options.skip_pdf {
            locations.push(("PDFs", self.config.generated_pdf_dir()));
        }
        println!("{}", self.report.run_summary(&results, &locations));
        Ok(Some(results))
    }

    /// Tailor from a saved links file
    pub async fn tailor_saved(&self, links: &Path, options: TailorOptions) -> Result<Vec<TailoredResult>> {
        let jobs = load_links(links)?;
        if jobs.is_empty() {
            return Err(JobTailorError::InvalidInput(format!(
                "No job postings in {}",
                links.display()
            )));
        }
        println!("📂 Loaded {} postings from {}", jobs.len(), links.display());
        self.tailor(&jobs, options).await
    }

    /// Render one saved tailored CV
    pub fn render_saved(&self, path: &Path) -> Result<PathBuf> {
        let result = load_tailored(path)?;
        generate_resume_pdf(
            &result.tailored_cv.tailored_cv,
            &result.job.title,
            &result.job.company,
            &self.config.generated_pdf_dir(),
        )
    }

    pub fn title_filter(&self, inline: bool) -> Result<TitleFilter> {
        let rules = if inline { &self.config.filter.inline } else { &self.config.filter.strict };
        Ok(TitleFilter::from_rules(rules)?.with_drop_logging(false))
    }
}

/// Titles from the command line plus one per non-blank line of `file`
pub fn collect_titles(titles: Vec<String>, file: Option<&Path>) -> Result<Vec<String>> {
    let mut all = titles;
    if let Some(path) = file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read titles from {}", path.display()))?;
        all.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }
    if all.is_empty() {
        return Err(JobTailorError::InvalidInput(
            "No titles given; pass titles or --file".to_string(),
        ));
    }
    Ok(all)
}

pub fn evaluate_titles(filter: &TitleFilter, titles: &[String]) -> Vec<(String, TitleVerdict)> {
    titles
        .iter()
        .map(|title| (title.clone(), filter.evaluate(title)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::posting::JobSource;
    use crate::output::storage::save_tailored;
    use crate::resume::TailoredCv;
    use tempfile::TempDir;

    fn pipeline_in(dir: &Path) -> Pipeline {
        let mut config = Config::default();
        config.output.data_dir = dir.to_path_buf();
        config.output.color_output = false;
        Pipeline::new(config)
    }

    #[test]
    fn test_collect_titles_from_args_and_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("titles.txt");
        std::fs::write(&file, "ML Intern\n\n  AI Trainee  \n").unwrap();

        let titles = collect_titles(vec!["AI Intern".to_string()], Some(&file)).unwrap();
        assert_eq!(titles, vec!["AI Intern", "ML Intern", "AI Trainee"]);
    }

    #[test]
    fn test_collect_titles_errors() {
        assert!(matches!(collect_titles(Vec::new(), None), Err(JobTailorError::InvalidInput(_))));
        let missing = PathBuf::from("/nonexistent/titles.txt");
        assert!(collect_titles(Vec::new(), Some(&missing)).is_err());
    }

    #[test]
    fn test_evaluate_titles_strict() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline = pipeline_in(temp_dir.path());
        let filter = pipeline.title_filter(false).unwrap();

        let titles = vec!["AI Intern".to_string(), "Senior AI Intern".to_string()];
        let verdicts = evaluate_titles(&filter, &titles);
        assert!(verdicts[0].1.is_accepted());
        assert!(!verdicts[1].1.is_accepted());
    }

    #[test]
    fn test_render_saved_writes_pdf() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline = pipeline_in(temp_dir.path());

        let result = TailoredResult {
            job: JobPosting::new("AI Intern", "Acme", "https://example.com", JobSource::LinkedIn),
            job_description: String::new(),
            tailored_cv: TailoredCv::default(),
            generated_at: String::new(),
        };
        let json = save_tailored(&result, &pipeline.config().tailored_json_dir(), 1).unwrap();

        let pdf = pipeline.render_saved(&json).unwrap();
        assert_eq!(pdf, temp_dir.path().join("resumes/generated/CV_Acme_AI_Intern.pdf"));
        assert!(pdf.exists());
    }

    #[test]
    fn test_render_pdfs_empty() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(pipeline_in(temp_dir.path()).render_pdfs(&[]), 0);
    }
}
