//! Job board scraping
//! Handles listing searches, ATS boards, description fetching and the
//! scrape → dedup → filter orchestration

pub mod http;
pub mod linkedin;
pub mod ats;
pub mod description;

use crate::config::{BoardKind, Config};
use crate::error::{JobTailorError, Result};
use crate::jobs::dedup::{mark_priority, remove_duplicates};
use crate::jobs::filter::TitleFilter;
use crate::jobs::posting::{JobPosting, JobSource};
use ats::{GreenhouseBoard, LeverBoard};
use linkedin::LinkedInBoard;
use log::{info, warn};
use reqwest::Client;
use scraper::{ElementRef, Selector};
use std::future::Future;

/// A source of job postings
pub trait JobBoard {
    fn source(&self) -> JobSource;

    /// Whether the board is queried once per search role or once per run
    fn per_role(&self) -> bool;

    fn search(&self, role: &str) -> impl Future<Output = Result<Vec<JobPosting>>> + Send;
}

/// The configured boards
pub enum Board {
    LinkedIn(LinkedInBoard),
    Greenhouse(GreenhouseBoard),
    Lever(LeverBoard),
}

impl JobBoard for Board {
    fn source(&self) -> JobSource {
        match self {
            Board::LinkedIn(b) => b.source(),
            Board::Greenhouse(b) => b.source(),
            Board::Lever(b) => b.source(),
        }
    }

    fn per_role(&self) -> bool {
        match self {
            Board::LinkedIn(b) => b.per_role(),
            Board::Greenhouse(b) => b.per_role(),
            Board::Lever(b) => b.per_role(),
        }
    }

    async fn search(&self, role: &str) -> Result<Vec<JobPosting>> {
        match self {
            Board::LinkedIn(b) => b.search(role).await,
            Board::Greenhouse(b) => b.search(role).await,
            Board::Lever(b) => b.search(role).await,
        }
    }
}

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| JobTailorError::Scraping(format!("Invalid selector '{}': {:?}", css, e)))
}

/// Element text with whitespace runs collapsed
pub(crate) fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs every board for every role, then dedups and filters the results
pub struct JobScraper<B = Board> {
    boards: Vec<B>,
    roles: Vec<String>,
    priority_roles: Vec<String>,
    strict_filter: TitleFilter,
    role_delay: (f64, f64),
}

impl JobScraper<Board> {
    pub fn from_config(config: &Config, client: Client) -> Result<Self> {
        let mut boards = Vec::new();
        for kind in &config.search.boards {
            let board = match kind {
                BoardKind::LinkedIn => Board::LinkedIn(LinkedInBoard::new(
                    client.clone(),
                    config.search.clone(),
                    config.delays.page_delay,
                    TitleFilter::from_rules(&config.filter.inline)?.with_drop_logging(false),
                )),
                BoardKind::Greenhouse => {
                    Board::Greenhouse(GreenhouseBoard::new(client.clone(), config.ats.clone()))
                }
                BoardKind::Lever => Board::Lever(LeverBoard::new(client.clone(), config.ats.clone())),
            };
            boards.push(board);
        }

        if boards.is_empty() {
            return Err(JobTailorError::Configuration(
                "No job boards enabled in search.boards".to_string(),
            ));
        }

        let scraper = Self::new(
            boards,
            config.all_roles().into_iter().map(str::to_string).collect(),
            config.search.priority_roles.clone(),
            TitleFilter::from_rules(&config.filter.strict)?,
        );
        Ok(scraper.with_role_delay(config.delays.role_delay_min, config.delays.role_delay_max))
    }
}

impl<B: JobBoard + Sync> JobScraper<B> {
    pub fn new(boards: Vec<B>, roles: Vec<String>, priority_roles: Vec<String>, strict_filter: TitleFilter) -> Self {
        Self {
            boards,
            roles,
            priority_roles,
            strict_filter,
            role_delay: (2.0, 5.0),
        }
    }

    pub fn with_role_delay(mut self, min: f64, max: f64) -> Self {
        self.role_delay = (min, max);
        self
    }

    /// Scrape every board, returning deduplicated, filtered, priority-marked postings
    pub async fn scrape_all(&self) -> Vec<JobPosting> {
        println!("🔍 Starting job link scraping...");
        let mut all_jobs = Vec::new();

        for board in self.boards.iter().filter(|b| b.per_role()) {
            println!("\n=== {} ===", board.source());
            for (i, role) in self.roles.iter().enumerate() {
                match board.search(role).await {
                    Ok(jobs) => all_jobs.extend(jobs),
                    Err(e) => warn!("{} search for '{}' failed: {}", board.source(), role, e),
                }

                if i + 1 < self.roles.len() {
                    http::pause(http::random_delay(self.role_delay.0, self.role_delay.1)).await;
                }
            }
        }

        for board in self.boards.iter().filter(|b| !b.per_role()) {
            println!("\n=== {} ===", board.source());
            match board.search("").await {
                Ok(jobs) => all_jobs.extend(jobs),
                Err(e) => warn!("{} search failed: {}", board.source(), e),
            }
        }

        info!("Collected {} raw postings", all_jobs.len());
        println!("\n🧹 Filtering jobs (strict title rules)...");
        finalize(all_jobs, &self.strict_filter, &self.priority_roles)
    }
}

/// Dedup, strict-filter and priority-mark raw scrape results
pub fn finalize(
    raw: Vec<JobPosting>,
    strict_filter: &TitleFilter,
    priority_roles: &[String],
) -> Vec<JobPosting> {
    let unique = remove_duplicates(raw);
    let mut relevant = strict_filter.filter(unique);
    mark_priority(&mut relevant, priority_roles);
    relevant
}
