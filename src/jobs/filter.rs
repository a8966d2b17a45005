//! Title relevance filtering with regex rule sets and a substring blacklist

use crate::config::RuleSetConfig;
use crate::error::{JobTailorError, Result};
use crate::jobs::posting::JobPosting;
use aho_corasick::{AhoCorasick, MatchKind};
use log::{debug, info};
use regex::RegexSet;
use std::fmt;

/// Why a title was accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptReason {
    /// A target phrase matched; holds the pattern
    Phrase(String),
    /// A domain term and a level term both matched
    Components,
}

/// Why a title was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// A blacklisted substring occurs in the title
    Blacklisted(String),
    Mismatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleVerdict {
    Accepted(AcceptReason),
    Rejected(RejectReason),
}

impl TitleVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, TitleVerdict::Accepted(_))
    }
}

impl fmt::Display for TitleVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TitleVerdict::Accepted(AcceptReason::Phrase(p)) => write!(f, "accepted (phrase {})", p),
            TitleVerdict::Accepted(AcceptReason::Components) => {
                write!(f, "accepted (domain + level terms)")
            }
            TitleVerdict::Rejected(RejectReason::Blacklisted(term)) => {
                write!(f, "rejected (blacklisted '{}')", term)
            }
            TitleVerdict::Rejected(RejectReason::Mismatch) => write!(f, "rejected (no match)"),
        }
    }
}

/// Compiled title rules.
///
/// Evaluation order matters: the blacklist wins over everything, then a
/// target phrase accepts on its own, and only then are domain and level
/// terms required together. All checks run on the lower-cased title.
pub struct TitleFilter {
    phrases: RegexSet,
    domain_terms: RegexSet,
    level_terms: RegexSet,
    blacklist: AhoCorasick,
    blacklist_terms: Vec<String>,
    log_drops: bool,
}

impl TitleFilter {
    /// Build a filter from a rule set; fails on any invalid regex
    pub fn from_rules(rules: &RuleSetConfig) -> Result<Self> {
        let phrases = RegexSet::new(&rules.valid_phrases)?;
        let domain_terms = RegexSet::new(&rules.domain_terms)?;
        let level_terms = RegexSet::new(&rules.level_terms)?;

        let blacklist_terms: Vec<String> =
            rules.blacklist.iter().map(|t| t.to_lowercase()).collect();
        let blacklist = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostFirst)
            .build(&blacklist_terms)
            .map_err(|e| {
                JobTailorError::Configuration(format!("Failed to build blacklist matcher: {}", e))
            })?;

        Ok(Self {
            phrases,
            domain_terms,
            level_terms,
            blacklist,
            blacklist_terms,
            log_drops: true,
        })
    }

    /// The full post-scrape rule set
    pub fn strict() -> Result<Self> {
        Self::from_rules(&RuleSetConfig::strict())
    }

    /// The lenient rule set applied to cards while scraping; drops are silent
    pub fn inline() -> Result<Self> {
        Ok(Self::from_rules(&RuleSetConfig::inline())?.with_drop_logging(false))
    }

    pub fn with_drop_logging(mut self, enabled: bool) -> Self {
        self.log_drops = enabled;
        self
    }

    pub fn evaluate(&self, title: &str) -> TitleVerdict {
        let title = title.to_lowercase();

        if let Some(m) = self.blacklist.find(&title) {
            let term = self.blacklist_terms[m.pattern().as_usize()].clone();
            return TitleVerdict::Rejected(RejectReason::Blacklisted(term));
        }

        if let Some(idx) = self.phrases.matches(&title).iter().next() {
            let pattern = self.phrases.patterns()[idx].clone();
            return TitleVerdict::Accepted(AcceptReason::Phrase(pattern));
        }

        if self.domain_terms.is_match(&title) && self.level_terms.is_match(&title) {
            TitleVerdict::Accepted(AcceptReason::Components)
        } else {
            TitleVerdict::Rejected(RejectReason::Mismatch)
        }
    }

    pub fn is_relevant(&self, title: &str) -> bool {
        self.evaluate(title).is_accepted()
    }

    /// Keep accepted postings, preserving input order
    pub fn filter(&self, jobs: Vec<JobPosting>) -> Vec<JobPosting> {
        let before = jobs.len();
        let kept: Vec<JobPosting> = jobs
            .into_iter()
            .filter(|job| {
                let verdict = self.evaluate(&job.title);
                if self.log_drops {
                    self.log_drop(&job.title, &verdict);
                }
                verdict.is_accepted()
            })
            .collect();

        debug!("Title filter kept {}/{} postings", kept.len(), before);
        kept
    }

    fn log_drop(&self, title: &str, verdict: &TitleVerdict) {
        match verdict {
            TitleVerdict::Rejected(RejectReason::Blacklisted(term)) => {
                info!("Dropped (blacklist '{}'): {}", term, title);
            }
            TitleVerdict::Rejected(RejectReason::Mismatch) => {
                // Only near misses are worth reporting
                let lower = title.to_lowercase();
                if lower.contains("trainee") || lower.contains("intern") {
                    info!("Dropped (strict mismatch): {}", title);
                }
            }
            TitleVerdict::Accepted(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::posting::JobSource;

    fn job(title: &str) -> JobPosting {
        JobPosting::new(title, "Acme", "https://example.com", JobSource::LinkedIn)
    }

    #[test]
    fn test_phrase_acceptance() {
        let filter = TitleFilter::strict().unwrap();
        assert_eq!(
            filter.evaluate("AI Research Intern - Summer 2026"),
            TitleVerdict::Accepted(AcceptReason::Phrase(r"\bai research intern\b".to_string()))
        );
        assert!(filter.is_relevant("Machine Learning Intern"));
        assert!(filter.is_relevant("AI Placement Year"));
    }

    #[test]
    fn test_component_acceptance() {
        let filter = TitleFilter::strict().unwrap();
        assert_eq!(
            filter.evaluate("Internship - Computer Vision"),
            TitleVerdict::Accepted(AcceptReason::Components)
        );
        assert!(filter.is_relevant("NLP Undergraduate Researcher"));
        assert!(filter.is_relevant("Student Engineer, Generative AI"));
    }

    #[test]
    fn test_blacklist_beats_phrase() {
        let filter = TitleFilter::strict().unwrap();
        assert_eq!(
            filter.evaluate("Senior AI Intern"),
            TitleVerdict::Rejected(RejectReason::Blacklisted("senior".to_string()))
        );
    }

    #[test]
    fn test_blacklist_is_substring_based() {
        let filter = TitleFilter::strict().unwrap();
        assert_eq!(
            filter.evaluate("AI Agentic Systems Intern"),
            TitleVerdict::Rejected(RejectReason::Blacklisted("agent".to_string()))
        );
        assert!(!filter.is_relevant("Trainee Patent Attorney"));
    }

    #[test]
    fn test_ai_must_be_whole_word() {
        let filter = TitleFilter::strict().unwrap();
        assert_eq!(
            filter.evaluate("Training Intern"),
            TitleVerdict::Rejected(RejectReason::Mismatch)
        );
        assert!(!filter.is_relevant("Email Campaign Intern"));
    }

    #[test]
    fn test_domain_without_level_rejected() {
        let filter = TitleFilter::strict().unwrap();
        assert!(!filter.is_relevant("Machine Learning Engineer"));
        assert!(!filter.is_relevant("Software Engineering Intern"));
    }

    #[test]
    fn test_inline_rules_are_narrower() {
        let inline = TitleFilter::inline().unwrap();
        let strict = TitleFilter::strict().unwrap();

        // placement and nlp are only known to the strict set
        assert!(!inline.is_relevant("NLP Placement"));
        assert!(strict.is_relevant("NLP Placement"));

        // no blacklist inline
        assert!(inline.is_relevant("Senior AI Intern"));
    }

    #[test]
    fn test_filter_preserves_order() {
        let filter = TitleFilter::strict().unwrap();
        let jobs = vec![
            job("ML Intern"),
            job("Sales Intern"),
            job("Data Analyst"),
            job("AI Trainee"),
        ];

        let kept = filter.filter(jobs);
        let titles: Vec<&str> = kept.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["ML Intern", "AI Trainee"]);
    }

    #[test]
    fn test_invalid_rule_is_error() {
        let mut rules = RuleSetConfig::strict();
        rules.domain_terms.push(r"\b(ai".to_string());
        assert!(matches!(TitleFilter::from_rules(&rules), Err(JobTailorError::Rule(_))));
    }

    #[test]
    fn test_blacklist_config_case_insensitive() {
        let mut rules = RuleSetConfig::strict();
        rules.blacklist = vec!["PRINCIPAL".to_string()];
        let filter = TitleFilter::from_rules(&rules).unwrap();
        assert!(!filter.is_relevant("Principal AI Intern"));
    }
}
