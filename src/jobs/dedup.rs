//! Deduplication and priority ordering of scraped postings

use crate::jobs::posting::JobPosting;
use regex::Regex;
use std::collections::HashSet;

fn dedup_key(job: &JobPosting) -> String {
    format!("{}|{}", job.title.to_lowercase(), job.company.to_lowercase())
}

/// Drop repeated title/company pairs (case-insensitive), keeping the first
pub fn remove_duplicates(jobs: Vec<JobPosting>) -> Vec<JobPosting> {
    let mut seen = HashSet::new();
    jobs.into_iter()
        .filter(|job| seen.insert(dedup_key(job)))
        .collect()
}

/// Flag postings that belong to one of the priority roles.
///
/// A posting qualifies when it was found by searching a priority role, or
/// when its title contains a priority role as a whole phrase.
pub fn mark_priority(jobs: &mut [JobPosting], priority_roles: &[String]) {
    let role_patterns: Vec<(String, Option<Regex>)> = priority_roles
        .iter()
        .map(|role| {
            let lower = role.to_lowercase();
            let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(&lower))).ok();
            (lower, pattern)
        })
        .collect();

    for job in jobs.iter_mut() {
        let title = job.title.to_lowercase();
        let from_role = job
            .search_role
            .as_ref()
            .map(|r| r.to_lowercase())
            .map_or(false, |r| role_patterns.iter().any(|(role, _)| *role == r));
        let in_title = role_patterns
            .iter()
            .any(|(_, re)| re.as_ref().map_or(false, |re| re.is_match(&title)));

        if from_role || in_title {
            job.priority = true;
        }
    }
}

/// Priority postings first, then the rest, each group in original order,
/// truncated to `max`
pub fn prioritize(jobs: &[JobPosting], max: usize) -> Vec<JobPosting> {
    let (priority, other): (Vec<&JobPosting>, Vec<&JobPosting>) =
        jobs.iter().partition(|job| job.priority);

    priority
        .into_iter()
        .chain(other)
        .take(max)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::posting::JobSource;

    fn job(title: &str, company: &str) -> JobPosting {
        JobPosting::new(title, company, format!("https://example.com/{}", title), JobSource::LinkedIn)
    }

    #[test]
    fn test_remove_duplicates_case_insensitive() {
        let jobs = vec![
            job("AI Intern", "Acme"),
            job("ML Intern", "Beta"),
            job("ai intern", "ACME"),
            job("AI Intern", "Gamma"),
        ];

        let unique = remove_duplicates(jobs);
        let pairs: Vec<(&str, &str)> = unique
            .iter()
            .map(|j| (j.title.as_str(), j.company.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("AI Intern", "Acme"), ("ML Intern", "Beta"), ("AI Intern", "Gamma")]
        );
    }

    #[test]
    fn test_remove_duplicates_keeps_first_occurrence() {
        let mut first = job("AI Intern", "Acme");
        first.location = "London".to_string();
        let mut second = job("AI Intern", "Acme");
        second.location = "Leeds".to_string();

        let unique = remove_duplicates(vec![first, second]);
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].location, "London");
    }

    #[test]
    fn test_mark_priority_by_role_and_title() {
        let roles = vec!["AI Intern".to_string()];
        let mut jobs = vec![
            job("Graduate ML Trainee", "A").with_search_role("ai intern"),
            job("Summer AI Intern", "B"),
            job("ML Intern", "C"),
            job("AI Internship", "D"),
        ];

        mark_priority(&mut jobs, &roles);
        let flags: Vec<bool> = jobs.iter().map(|j| j.priority).collect();
        assert_eq!(flags, vec![true, true, false, false]);
    }

    #[test]
    fn test_prioritize_is_stable_and_truncates() {
        let mut jobs = vec![job("a", "1"), job("b", "2"), job("c", "3"), job("d", "4")];
        jobs[1].priority = true;
        jobs[3].priority = true;

        let ordered = prioritize(&jobs, 3);
        let titles: Vec<&str> = ordered.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "d", "a"]);

        assert!(prioritize(&jobs, 0).is_empty());
        assert_eq!(prioritize(&jobs, 10).len(), 4);
    }
}
