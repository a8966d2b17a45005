//! Job posting model shared by scrapers, filters and the tailoring stage

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a posting was scraped from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobSource {
    LinkedIn,
    Greenhouse,
    Lever,
}

impl fmt::Display for JobSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobSource::LinkedIn => write!(f, "LinkedIn"),
            JobSource::Greenhouse => write!(f, "Greenhouse"),
            JobSource::Lever => write!(f, "Lever"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    #[serde(default = "default_location")]
    pub location: String,
    pub url: String,
    #[serde(default)]
    pub date_posted: String,
    pub source: JobSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_role: Option<String>,
    #[serde(default)]
    pub scraped_at: String,
    #[serde(default)]
    pub priority: bool,
}

pub const DEFAULT_LOCATION: &str = "Remote/UK";

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

impl JobPosting {
    /// Create a posting stamped with the current local time
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        url: impl Into<String>,
        source: JobSource,
    ) -> Self {
        Self {
            title: title.into(),
            company: company.into(),
            location: default_location(),
            url: url.into(),
            date_posted: String::new(),
            source,
            search_role: None,
            scraped_at: Local::now().to_rfc3339(),
            priority: false,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_date_posted(mut self, date_posted: impl Into<String>) -> Self {
        self.date_posted = date_posted.into();
        self
    }

    pub fn with_search_role(mut self, role: impl Into<String>) -> Self {
        self.search_role = Some(role.into());
        self
    }
}

impl fmt::Display for JobPosting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.title, self.company)
    }
}
