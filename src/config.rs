//! Configuration management for the job tailor

use crate::error::{JobTailorError, Result};
use crate::jobs::filter::TitleFilter;
use crate::scraping::linkedin::SEARCH_ENDPOINT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub search: SearchConfig,
    pub ats: AtsConfig,
    pub filter: FilterConfig,
    pub http: HttpConfig,
    pub delays: DelayConfig,
    pub llm: LlmConfig,
    pub profile: ProfileConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub priority_roles: Vec<String>,
    pub secondary_roles: Vec<String>,
    pub location: String,
    pub geo_id: String,
    pub experience_levels: String,
    pub job_types: String,
    pub hours_old: u32,
    pub max_pages: u32,
    pub page_size: u32,
    pub boards: Vec<BoardKind>,
    /// Guest search endpoint for LinkedIn listings
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
}

fn default_search_endpoint() -> String {
    SEARCH_ENDPOINT.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardKind {
    LinkedIn,
    Greenhouse,
    Lever,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsConfig {
    pub greenhouse: Vec<String>,
    pub lever: Vec<String>,
    pub locations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub strict: RuleSetConfig,
    pub inline: RuleSetConfig,
}

/// One title rule set. Phrase and term entries are regexes; blacklist
/// entries are plain substrings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSetConfig {
    pub valid_phrases: Vec<String>,
    pub domain_terms: Vec<String>,
    pub level_terms: Vec<String>,
    #[serde(default)]
    pub blacklist: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayConfig {
    pub role_delay_min: f64,
    pub role_delay_max: f64,
    pub page_delay: f64,
    pub request_delay: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key_file: PathBuf,
    /// Retries after the first attempt on 429 and 5xx replies
    pub max_retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub current_cv: PathBuf,
    pub project_pool: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub data_dir: PathBuf,
    pub max_cvs: usize,
    pub color_output: bool,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl RuleSetConfig {
    /// Rules applied to the deduplicated scrape results
    pub fn strict() -> Self {
        Self {
            valid_phrases: strings(&[
                r"\bai intern\b",
                r"\bai trainee\b",
                r"\bai research intern\b",
                r"\bartificial intelligence intern\b",
                r"\bmachine learning intern\b",
                r"\bml intern\b",
                r"\bai placement\b",
                r"\bartificial intelligence placement\b",
            ]),
            domain_terms: strings(&[
                r"\bai\b",
                r"\bartificial intelligence\b",
                r"\bmachine learning\b",
                r"\bml\b",
                r"\bdeep learning\b",
                r"\bcomputer vision\b",
                r"\bnlp\b",
                r"\bllm\b",
                r"\bgenerative ai\b",
            ]),
            level_terms: strings(&[
                r"\bintern\b",
                r"\binternship\b",
                r"\btrainee\b",
                r"\bplacement\b",
                r"\bstudent\b",
                r"\bundergraduate\b",
            ]),
            blacklist: strings(&[
                "senior", "manager", "lead", "director", "marketing", "sales", "hr", "recruiter",
                "agent", "attorney", "counsel",
            ]),
        }
    }

    /// Rules applied to each listing card as it is parsed
    pub fn inline() -> Self {
        Self {
            valid_phrases: strings(&[
                r"\bai intern\b",
                r"\bai trainee\b",
                r"\bai research intern\b",
                r"\bartificial intelligence intern\b",
                r"\bmachine learning intern\b",
                r"\bml intern\b",
            ]),
            domain_terms: strings(&[r"\bai\b", r"\bartificial intelligence\b", r"\bml\b"]),
            level_terms: strings(&[r"\bintern\b", r"\binternship\b", r"\btrainee\b"]),
            blacklist: Vec::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig {
                priority_roles: strings(&["AI Intern", "AI Research Intern"]),
                secondary_roles: Vec::new(),
                location: "United Kingdom".to_string(),
                geo_id: "101165590".to_string(),
                experience_levels: "1,2".to_string(),
                job_types: "F,I".to_string(),
                hours_old: 24,
                max_pages: 4,
                page_size: 25,
                boards: vec![BoardKind::LinkedIn],
                endpoint: default_search_endpoint(),
            },
            ats: AtsConfig {
                greenhouse: strings(&["airbnb", "stripe", "notion", "figma"]),
                lever: strings(&["spotify", "netflix"]),
                locations: strings(&["uk", "london", "remote"]),
            },
            filter: FilterConfig {
                strict: RuleSetConfig::strict(),
                inline: RuleSetConfig::inline(),
            },
            http: HttpConfig {
                user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
                timeout_secs: 10,
            },
            delays: DelayConfig {
                role_delay_min: 2.0,
                role_delay_max: 5.0,
                page_delay: 1.5,
                request_delay: 2.0,
            },
            llm: LlmConfig {
                endpoint: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
                model: "gemini-2.5-flash".to_string(),
                api_key_file: PathBuf::from("config/api_keys.json"),
                max_retries: 3,
            },
            profile: ProfileConfig {
                current_cv: PathBuf::from("data/profile/my_current_cv.json"),
                project_pool: Some(PathBuf::from("data/profile/project_pool.json")),
            },
            output: OutputConfig {
                data_dir: PathBuf::from("data"),
                max_cvs: 5,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first use
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| JobTailorError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| JobTailorError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("job-tailor")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if self.search.priority_roles.is_empty() && self.search.secondary_roles.is_empty() {
            return Err(JobTailorError::Configuration(
                "At least one search role is required".to_string(),
            ));
        }
        if self.search.max_pages == 0 || self.search.page_size == 0 {
            return Err(JobTailorError::Configuration(
                "search.max_pages and search.page_size must be positive".to_string(),
            ));
        }
        if self.delays.role_delay_min < 0.0
            || self.delays.role_delay_min > self.delays.role_delay_max
        {
            return Err(JobTailorError::Configuration(format!(
                "Invalid role delay range: {}..{}",
                self.delays.role_delay_min, self.delays.role_delay_max
            )));
        }
        if self.delays.page_delay < 0.0 || self.delays.request_delay < 0.0 {
            return Err(JobTailorError::Configuration(
                "Delays must not be negative".to_string(),
            ));
        }

        TitleFilter::from_rules(&self.filter.strict)?;
        TitleFilter::from_rules(&self.filter.inline)?;
        Ok(())
    }

    /// Priority roles first, then secondary roles
    pub fn all_roles(&self) -> Vec<&str> {
        self.search
            .priority_roles
            .iter()
            .chain(self.search.secondary_roles.iter())
            .map(|r| r.as_str())
            .collect()
    }

    /// Resolve the Gemini API key from the environment, then the key file
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                return Ok(key.trim().to_string());
            }
        }
        read_api_key_file(&self.llm.api_key_file)
    }

    pub fn jobs_dir(&self) -> PathBuf {
        self.output.data_dir.join("jobs")
    }

    pub fn results_dir(&self) -> PathBuf {
        self.output.data_dir.join("results")
    }

    pub fn tailored_json_dir(&self) -> PathBuf {
        self.output.data_dir.join("resumes").join("tailored_json")
    }

    pub fn generated_pdf_dir(&self) -> PathBuf {
        self.output.data_dir.join("resumes").join("generated")
    }
}

fn read_api_key_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(JobTailorError::Configuration(format!(
            "No API key: set {} or create {} with a gemini_api_key field",
            API_KEY_ENV,
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)?;
    let keys: serde_json::Value = serde_json::from_str(&content)?;
    keys.get("gemini_api_key")
        .and_then(|k| k.as_str())
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            JobTailorError::Configuration(format!(
                "gemini_api_key not found in {}",
                path.display()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.all_roles(), vec!["AI Intern", "AI Research Intern"]);
        assert_eq!(config.filter.strict.blacklist.len(), 11);
    }

    #[test]
    fn test_load_writes_defaults_then_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let first = Config::load_from(&path).unwrap();
        assert!(path.exists());

        let second = Config::load_from(&path).unwrap();
        assert_eq!(first.search.priority_roles, second.search.priority_roles);
        assert_eq!(first.filter.strict, second.filter.strict);
        assert_eq!(second.search.boards, vec![BoardKind::LinkedIn]);
    }

    #[test]
    fn test_validate_rejects_bad_delay_range() {
        let mut config = Config::default();
        config.delays.role_delay_min = 6.0;
        assert!(matches!(config.validate(), Err(JobTailorError::Configuration(_))));
    }

    #[test]
    fn test_validate_rejects_no_roles() {
        let mut config = Config::default();
        config.search.priority_roles.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_regex() {
        let mut config = Config::default();
        config.filter.inline.valid_phrases.push("(".to_string());
        assert!(matches!(config.validate(), Err(JobTailorError::Rule(_))));
    }

    #[test]
    fn test_api_key_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("api_keys.json");

        assert!(read_api_key_file(&path).is_err());

        std::fs::write(&path, r#"{"gemini_api_key": "  abc123 "}"#).unwrap();
        assert_eq!(read_api_key_file(&path).unwrap(), "abc123");

        std::fs::write(&path, r#"{"gemini_api_key": ""}"#).unwrap();
        assert!(read_api_key_file(&path).is_err());
    }
}
