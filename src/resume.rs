//! Tailored résumé structures as returned by the model.
//!
//! Model output is loosely shaped, so every field defaults and a few fields
//! accept more than one layout (a skills map or a flat list, a single
//! education entry or several).

use crate::jobs::posting::JobPosting;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TailoredCv {
    #[serde(default)]
    pub job_analysis: JobAnalysis,
    #[serde(default)]
    pub tailored_cv: CvDocument,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobAnalysis {
    #[serde(default, deserialize_with = "lenient_score")]
    pub match_score: f64,
    #[serde(default)]
    pub key_requirements: Vec<String>,
    #[serde(default)]
    pub selected_projects_reasoning: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CvDocument {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub personal_info: Value,
    #[serde(default)]
    pub professional_summary: String,
    #[serde(default)]
    pub skills: Skills,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub education: OneOrMany<Education>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Skills {
    Categorized(Map<String, Value>),
    Flat(Vec<String>),
}

impl Default for Skills {
    fn default() -> Self {
        Skills::Categorized(Map::new())
    }
}

impl Skills {
    /// Non-empty categories in document order
    pub fn categories(&self) -> Vec<(String, Vec<String>)> {
        match self {
            Skills::Categorized(map) => map
                .iter()
                .map(|(category, value)| (category.clone(), string_list(value)))
                .filter(|(_, items)| !items.is_empty())
                .collect(),
            Skills::Flat(items) if items.is_empty() => Vec::new(),
            Skills::Flat(items) => vec![("Skills".to_string(), items.clone())],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default, alias = "role", alias = "position")]
    pub title: String,
    #[serde(default, alias = "organization")]
    pub company: String,
    #[serde(default, alias = "dates")]
    pub date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "bullets", alias = "responsibilities")]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, alias = "name")]
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, alias = "company_or_context")]
    pub context: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Education {
    #[serde(default, alias = "institution")]
    pub university: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default, alias = "date")]
    pub graduation: String,
    #[serde(default)]
    pub relevant_coursework: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    pub fn items(&self) -> Vec<&T> {
        match self {
            OneOrMany::Many(items) => items.iter().collect(),
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Certification {
    Named {
        #[serde(default)]
        name: String,
        #[serde(default)]
        issuer: String,
    },
    Plain(String),
}

impl Certification {
    pub fn label(&self) -> String {
        match self {
            Certification::Named { name, issuer } if issuer.is_empty() => name.clone(),
            Certification::Named { name, issuer } => format!("{} ({})", name, issuer),
            Certification::Plain(text) => text.clone(),
        }
    }
}

/// Header lines pulled out of the free-form `personal_info` object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactHeader {
    pub name: String,
    pub contact_line: String,
}

impl CvDocument {
    pub fn contact_header(&self) -> Option<ContactHeader> {
        let info = self.personal_info.as_object()?;
        let name = ["name", "full_name"]
            .iter()
            .find_map(|k| info.get(*k).and_then(Value::as_str))
            .map(str::trim)
            .filter(|n| !n.is_empty())?;

        let contact_line = ["email", "phone", "location", "linkedin", "github", "website", "portfolio"]
            .iter()
            .filter_map(|k| info.get(*k).and_then(Value::as_str))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect::<Vec<_>>()
            .join(" | ");

        Some(ContactHeader {
            name: name.to_string(),
            contact_line,
        })
    }

    /// Copy `personal_info` from the base CV when the model left it out
    pub fn merge_personal_info(&mut self, base_cv: &Value) {
        let missing = match &self.personal_info {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        };
        if missing {
            if let Some(info) = base_cv.get("personal_info") {
                self.personal_info = info.clone();
            }
        }
    }
}

/// One tailoring outcome, as saved to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailoredResult {
    pub job: JobPosting,
    pub job_description: String,
    pub tailored_cv: TailoredCv,
    pub generated_at: String,
}

impl TailoredResult {
    pub fn match_score(&self) -> f64 {
        self.tailored_cv.job_analysis.match_score
    }
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Accept `85`, `85.5` or `"85"`; anything else scores zero
fn lenient_score<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().trim_end_matches('%').parse().unwrap_or(0.0),
        _ => 0.0,
    })
}
