//! Résumé tailoring prompt

use crate::jobs::posting::JobPosting;
use log::debug;
use serde_json::Value;

/// Prompt template with `{placeholder}` substitution
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub tailor_cv: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            tailor_cv: TAILOR_CV_TEMPLATE.to_string(),
        }
    }
}

/// Parameters for prompt template substitution
#[derive(Debug, Clone)]
pub struct PromptParams<'a> {
    pub current_cv: &'a Value,
    pub project_pool: &'a Value,
    pub job: &'a JobPosting,
    pub job_description: &'a str,
}

impl PromptTemplates {
    pub fn render_tailor_cv(&self, params: &PromptParams<'_>) -> String {
        let cv = serde_json::to_string_pretty(params.current_cv).unwrap_or_default();
        let pool = serde_json::to_string_pretty(params.project_pool).unwrap_or_default();

        // Description goes last so text inside it is never re-substituted
        let prompt = self
            .tailor_cv
            .replace("{cv}", &cv)
            .replace("{projects}", &pool)
            .replace("{title}", &params.job.title)
            .replace("{company}", &params.job.company)
            .replace("{location}", &params.job.location)
            .replace("{url}", &params.job.url)
            .replace("{description}", params.job_description);

        debug!("Tailoring prompt: {} chars", prompt.len());
        prompt
    }
}

const TAILOR_CV_TEMPLATE: &str = r#"You are an expert ATS resume optimizer for graduate AI/ML positions.

MY GENERIC CV CONTENT:
{cv}

AVAILABLE PROJECT POOL (Select the best 2-3 for this job):
{projects}

JOB I'M APPLYING TO:
Title: {title}
Company: {company}
Location: {location}
URL: {url}

FULL JOB DESCRIPTION:
{description}

YOUR TASK:
Create a tailored version of my CV specifically for this job.

STEP 1: PROJECT SELECTION
- Analyze the Job Description to identify the most relevant technical skills and domain requirements.
- From the "AVAILABLE PROJECT POOL", select the 2 (or max 3) projects that BEST demonstrate these skills.
- DO NOT use projects that are irrelevant if better options exist in the pool.
- You may also use the experiences from the Generic CV if they are highly relevant.

STEP 2: TAILORING
- Summary: Customize the professional summary to highlight the specific tech stack and soft skills asked for in the JD.
- Skills: Reorder my skills to put the ones mentioned in the JD at the top.
- Projects: Write the project descriptions for the SELECTED projects.
    - Focus on the contributions that match the job.
    - Use strong action verbs.
    - Highlight the specific technologies the JD asks for.
- Experience: Tailor the experience bullets similarly.

OUTPUT FORMAT:
Return ONLY valid JSON.

{
  "job_analysis": {
    "match_score": 85,
    "key_requirements": ["req1", "req2"],
    "selected_projects_reasoning": "Selected X because..."
  },
  "tailored_cv": {
    "personal_info": { ... (same as generic) ... },
    "professional_summary": "...",
    "skills": { "Category": ["skill1", "skill2"] },
    "experience": [
      {
        "title": "Role",
        "company": "Company",
        "date": "Date",
        "achievements": ["bullet 1", "bullet 2"]
      }
    ],
    "projects": [
      {
        "title": "Title",
        "date": "Date",
        "technologies": ["tech1", "tech2"],
        "description": "One line summary",
        "achievements": ["bullet 1", "bullet 2", "bullet 3"]
      }
    ],
    "education": { "university": "...", "degree": "...", "graduation": "...", "relevant_coursework": ["..."] },
    "certifications": [ { "name": "...", "issuer": "..." } ]
  }
}"#;
