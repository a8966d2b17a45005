//! Public applicant-tracking-system boards (Greenhouse and Lever JSON APIs)

use crate::config::AtsConfig;
use crate::error::Result;
use crate::jobs::posting::{JobPosting, JobSource};
use crate::scraping::JobBoard;
use log::{info, warn};
use reqwest::Client;
use serde::Deserialize;

pub const GREENHOUSE_API: &str = "https://boards-api.greenhouse.io/v1/boards";
pub const LEVER_API: &str = "https://api.lever.co/v0/postings";

#[derive(Debug, Deserialize)]
pub struct GreenhouseResponse {
    #[serde(default)]
    pub jobs: Vec<GreenhouseJob>,
}

#[derive(Debug, Deserialize)]
pub struct GreenhouseJob {
    pub title: String,
    pub absolute_url: String,
    #[serde(default)]
    pub location: Option<GreenhouseLocation>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GreenhouseLocation {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LeverPosting {
    pub text: String,
    #[serde(rename = "hostedUrl")]
    pub hosted_url: String,
    #[serde(default)]
    pub categories: LeverCategories,
}

#[derive(Debug, Default, Deserialize)]
pub struct LeverCategories {
    #[serde(default)]
    pub location: Option<String>,
}

/// `"acme-labs"` -> `"Acme-Labs"`
pub fn company_display_name(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut start_of_word = true;
    for c in token.chars() {
        if start_of_word {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        start_of_word = !c.is_alphanumeric();
    }
    out
}

/// True when the location mentions any of the wanted keywords
pub fn location_matches(location: &str, wanted: &[String]) -> bool {
    let location = location.to_lowercase();
    wanted.iter().any(|w| location.contains(&w.to_lowercase()))
}

pub fn greenhouse_postings(token: &str, response: GreenhouseResponse, wanted: &[String]) -> Vec<JobPosting> {
    let company = company_display_name(token);
    response
        .jobs
        .into_iter()
        .filter_map(|job| {
            let location = job.location.map(|l| l.name).unwrap_or_default();
            if !location_matches(&location, wanted) {
                return None;
            }
            let mut posting = JobPosting::new(job.title, company.clone(), job.absolute_url, JobSource::Greenhouse)
                .with_location(location);
            if let Some(updated) = job.updated_at {
                posting = posting.with_date_posted(updated);
            }
            Some(posting)
        })
        .collect()
}

pub fn lever_postings(token: &str, postings: Vec<LeverPosting>, wanted: &[String]) -> Vec<JobPosting> {
    let company = company_display_name(token);
    postings
        .into_iter()
        .filter_map(|p| {
            let location = p.categories.location.unwrap_or_default();
            if !location_matches(&location, wanted) {
                return None;
            }
            Some(
                JobPosting::new(p.text, company.clone(), p.hosted_url, JobSource::Lever)
                    .with_location(location),
            )
        })
        .collect()
}

pub struct GreenhouseBoard {
    client: Client,
    config: AtsConfig,
}

impl GreenhouseBoard {
    pub fn new(client: Client, config: AtsConfig) -> Self {
        Self { client, config }
    }

    async fn fetch(&self, token: &str) -> Result<Vec<JobPosting>> {
        let url = format!("{}/{}/jobs", GREENHOUSE_API, token);
        let response: GreenhouseResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(greenhouse_postings(token, response, &self.config.locations))
    }
}

impl JobBoard for GreenhouseBoard {
    fn source(&self) -> JobSource {
        JobSource::Greenhouse
    }

    fn per_role(&self) -> bool {
        false
    }

    async fn search(&self, _role: &str) -> Result<Vec<JobPosting>> {
        let mut jobs = Vec::new();
        for token in &self.config.greenhouse {
            match self.fetch(token).await {
                Ok(found) => {
                    info!("Greenhouse board {}: {} postings in range", token, found.len());
                    jobs.extend(found);
                }
                Err(e) => warn!("Greenhouse board {} failed: {}", token, e),
            }
        }
        Ok(jobs)
    }
}

pub struct LeverBoard {
    client: Client,
    config: AtsConfig,
}

impl LeverBoard {
    pub fn new(client: Client, config: AtsConfig) -> Self {
        Self { client, config }
    }

    async fn fetch(&self, token: &str) -> Result<Vec<JobPosting>> {
        let url = format!("{}/{}", LEVER_API, token);
        let postings: Vec<LeverPosting> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(lever_postings(token, postings, &self.config.locations))
    }
}

impl JobBoard for LeverBoard {
    fn source(&self) -> JobSource {
        JobSource::Lever
    }

    fn per_role(&self) -> bool {
        false
    }

    async fn search(&self, _role: &str) -> Result<Vec<JobPosting>> {
        let mut jobs = Vec::new();
        for token in &self.config.lever {
            match self.fetch(token).await {
                Ok(found) => {
                    info!("Lever board {}: {} postings in range", token, found.len());
                    jobs.extend(found);
                }
                Err(e) => warn!("Lever board {} failed: {}", token, e),
            }
        }
        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wanted() -> Vec<String> {
        vec!["uk".to_string(), "london".to_string(), "remote".to_string()]
    }

    #[test]
    fn test_company_display_name() {
        assert_eq!(company_display_name("stripe"), "Stripe");
        assert_eq!(company_display_name("acme-labs"), "Acme-Labs");
        assert_eq!(company_display_name("NETFLIX"), "Netflix");
    }

    #[test]
    fn test_location_matches() {
        assert!(location_matches("London, England", &wanted()));
        assert!(location_matches("Remote - EMEA", &wanted()));
        assert!(!location_matches("San Francisco, CA", &wanted()));
        assert!(!location_matches("", &wanted()));
    }

    #[test]
    fn test_greenhouse_postings_filter_by_location() {
        let json = r#"{"jobs": [
            {"title": "AI Intern", "absolute_url": "https://gh/1", "location": {"name": "London"}, "updated_at": "2026-10-01"},
            {"title": "ML Intern", "absolute_url": "https://gh/2", "location": {"name": "New York"}},
            {"title": "Data Intern", "absolute_url": "https://gh/3"}
        ]}"#;
        let response: GreenhouseResponse = serde_json::from_str(json).unwrap();
        let jobs = greenhouse_postings("stripe", response, &wanted());

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].company, "Stripe");
        assert_eq!(jobs[0].location, "London");
        assert_eq!(jobs[0].date_posted, "2026-10-01");
        assert_eq!(jobs[0].source, JobSource::Greenhouse);
    }

    #[test]
    fn test_lever_postings_filter_by_location() {
        let json = r#"[
            {"text": "Machine Learning Intern", "hostedUrl": "https://lever/1", "categories": {"location": "Remote UK"}},
            {"text": "AI Intern", "hostedUrl": "https://lever/2", "categories": {}},
            {"text": "AI Trainee", "hostedUrl": "https://lever/3"}
        ]"#;
        let postings: Vec<LeverPosting> = serde_json::from_str(json).unwrap();
        let jobs = lever_postings("spotify", postings, &wanted());

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Machine Learning Intern");
        assert_eq!(jobs[0].company, "Spotify");
        assert_eq!(jobs[0].source, JobSource::Lever);
    }
}
