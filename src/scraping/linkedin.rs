//! LinkedIn guest job search scraping

use crate::config::SearchConfig;
use crate::error::{JobTailorError, Result};
use crate::jobs::filter::TitleFilter;
use crate::jobs::posting::{JobPosting, JobSource};
use crate::scraping::http::pause;
use crate::scraping::{element_text, selector, JobBoard};
use log::{debug, warn};
use reqwest::{Client, StatusCode, Url};
use scraper::Html;

pub const SEARCH_ENDPOINT: &str =
    "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search";

/// Map a posting age in hours to LinkedIn's time-posted filter
pub fn time_filter(hours_old: u32) -> &'static str {
    match hours_old {
        24 => "r86400",
        168 => "r604800",
        720 => "r2592000",
        _ => "r86400",
    }
}

/// One parsed result page
#[derive(Debug, Default)]
pub struct SearchPage {
    /// Number of `<li>` elements; zero means the listing ran out
    pub card_count: usize,
    pub jobs: Vec<JobPosting>,
}

pub struct LinkedInBoard {
    client: Client,
    search: SearchConfig,
    page_delay: f64,
    inline_filter: TitleFilter,
}

impl LinkedInBoard {
    pub fn new(client: Client, search: SearchConfig, page_delay: f64, inline_filter: TitleFilter) -> Self {
        Self {
            client,
            search,
            page_delay,
            inline_filter,
        }
    }

    /// Exact-phrase search URL for one result page
    pub fn search_url(&self, role: &str, page: u32) -> Result<Url> {
        let params: Vec<(&str, String)> = vec![
            ("keywords", format!("\"{}\"", role)),
            ("location", self.search.location.clone()),
            ("geoId", self.search.geo_id.clone()),
            ("f_E", self.search.experience_levels.clone()),
            ("f_TPR", time_filter(self.search.hours_old).to_string()),
            ("f_JT", self.search.job_types.clone()),
            ("sortBy", "DD".to_string()),
            ("start", (page * self.search.page_size).to_string()),
        ];

        Url::parse_with_params(&self.search.endpoint, &params)
            .map_err(|e| JobTailorError::Scraping(format!("Invalid search URL: {}", e)))
    }

    async fn fetch_page(&self, url: Url) -> Option<String> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("LinkedIn request failed: {}", e);
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            println!("  ⚠️  Status {} from LinkedIn", response.status());
            return None;
        }

        match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!("Failed to read LinkedIn response: {}", e);
                None
            }
        }
    }
}

impl JobBoard for LinkedInBoard {
    fn source(&self) -> JobSource {
        JobSource::LinkedIn
    }

    fn per_role(&self) -> bool {
        true
    }

    async fn search(&self, role: &str) -> Result<Vec<JobPosting>> {
        let mut jobs = Vec::new();
        println!("\n🔎 Query: \"{}\" (last {}h)", role, self.search.hours_old);

        for page in 0..self.search.max_pages {
            let url = self.search_url(role, page)?;
            debug!("Fetching {}", url);

            let Some(body) = self.fetch_page(url).await else {
                break;
            };

            let parsed = parse_search_page(&body, role, self.search.hours_old, &self.inline_filter)?;
            if parsed.card_count == 0 {
                debug!("No cards on page {}, stopping", page);
                break;
            }

            for job in parsed.jobs {
                println!("  ✓ {}", job);
                jobs.push(job);
            }

            pause(self.page_delay).await;
        }

        println!("  ✅ Found {} jobs for \"{}\"", jobs.len(), role);
        Ok(jobs)
    }
}

/// Parse a guest search result fragment into postings.
///
/// Cards missing a title, company or link are skipped, as are titles the
/// inline filter rejects.
pub fn parse_search_page(
    html: &str,
    role: &str,
    hours_old: u32,
    inline_filter: &TitleFilter,
) -> Result<SearchPage> {
    let document = Html::parse_fragment(html);

    let li = selector("li")?;
    let base_card = selector("div.base-card")?;
    let title_sel = selector("h3.base-search-card__title")?;
    let company_sel = selector("h4.base-search-card__subtitle")?;
    let location_sel = selector("span.job-search-card__location")?;
    let link_sel = selector("a.base-card__full-link")?;
    let date_sel = selector("time.job-search-card__listdate, time.job-search-card__listdate--new")?;

    let mut page = SearchPage::default();

    for card in document.select(&li) {
        page.card_count += 1;

        let Some(base) = card.select(&base_card).next() else {
            continue;
        };

        let title = base.select(&title_sel).next().map(element_text);
        let company = base.select(&company_sel).next().map(element_text);
        let href = base
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"));

        let (Some(title), Some(company), Some(href)) = (title, company, href) else {
            continue;
        };

        if !inline_filter.is_relevant(&title) {
            continue;
        }

        let url = href.split('?').next().unwrap_or(href).to_string();
        let location = base
            .select(&location_sel)
            .next()
            .map(element_text)
            .filter(|l| !l.is_empty());
        let date_posted = base
            .select(&date_sel)
            .next()
            .and_then(|t| t.value().attr("datetime"))
            .map(str::to_string)
            .unwrap_or_else(|| format!("Last {}h", hours_old));

        let mut job = JobPosting::new(title, company, url, JobSource::LinkedIn)
            .with_date_posted(date_posted)
            .with_search_role(role);
        if let Some(location) = location {
            job = job.with_location(location);
        }
        page.jobs.push(job);
    }

    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::test_support as stub;

    fn board() -> LinkedInBoard {
        let config = Config::default();
        LinkedInBoard::new(
            Client::new(),
            config.search,
            0.0,
            TitleFilter::inline().unwrap(),
        )
    }

    fn card(title: &str, company: &str, href: &str, extra: &str) -> String {
        format!(
            r#"<li><div class="base-card">
                <a class="base-card__full-link" href="{href}"></a>
                <h3 class="base-search-card__title">
                    {title}
                </h3>
                <h4 class="base-search-card__subtitle"><a>{company}</a></h4>
                {extra}
            </div></li>"#
        )
    }

    #[test]
    fn test_time_filter_mapping() {
        assert_eq!(time_filter(24), "r86400");
        assert_eq!(time_filter(168), "r604800");
        assert_eq!(time_filter(720), "r2592000");
        assert_eq!(time_filter(48), "r86400");
    }

    #[test]
    fn test_search_url_params() {
        let url = board().search_url("AI Intern", 2).unwrap();
        let pairs: std::collections::HashMap<String, String> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(pairs["keywords"], "\"AI Intern\"");
        assert_eq!(pairs["geoId"], "101165590");
        assert_eq!(pairs["f_TPR"], "r86400");
        assert_eq!(pairs["f_E"], "1,2");
        assert_eq!(pairs["f_JT"], "F,I");
        assert_eq!(pairs["sortBy"], "DD");
        assert_eq!(pairs["start"], "50");
        assert!(url.as_str().starts_with(SEARCH_ENDPOINT));
    }

    #[test]
    fn test_parse_card_with_all_fields() {
        let html = card(
            "AI Intern",
            "Acme Labs",
            "https://uk.linkedin.com/jobs/view/ai-intern-123?refId=abc&trackingId=x",
            r#"<span class="job-search-card__location">London, England</span>
               <time class="job-search-card__listdate" datetime="2026-10-15">1 day ago</time>"#,
        );
        let filter = TitleFilter::inline().unwrap();
        let page = parse_search_page(&html, "AI Intern", 24, &filter).unwrap();

        assert_eq!(page.card_count, 1);
        let job = &page.jobs[0];
        assert_eq!(job.title, "AI Intern");
        assert_eq!(job.company, "Acme Labs");
        assert_eq!(job.url, "https://uk.linkedin.com/jobs/view/ai-intern-123");
        assert_eq!(job.location, "London, England");
        assert_eq!(job.date_posted, "2026-10-15");
        assert_eq!(job.search_role.as_deref(), Some("AI Intern"));
        assert_eq!(job.source, JobSource::LinkedIn);
    }

    #[test]
    fn test_parse_card_defaults_and_new_listdate() {
        let html = format!(
            "{}{}",
            card("ML Intern", "Beta", "https://example.com/a", ""),
            card(
                "AI Trainee",
                "Gamma",
                "https://example.com/b",
                r#"<time class="job-search-card__listdate--new" datetime="2026-10-16"></time>"#
            ),
        );
        let filter = TitleFilter::inline().unwrap();
        let page = parse_search_page(&html, "AI Intern", 168, &filter).unwrap();

        assert_eq!(page.jobs.len(), 2);
        assert_eq!(page.jobs[0].location, "Remote/UK");
        assert_eq!(page.jobs[0].date_posted, "Last 168h");
        assert_eq!(page.jobs[1].date_posted, "2026-10-16");
    }

    #[test]
    fn test_parse_skips_incomplete_and_irrelevant_cards() {
        let html = format!(
            "{}{}{}",
            r#"<li><div class="base-card"><h3 class="base-search-card__title">AI Intern</h3></div></li>"#,
            r#"<li><div class="other">AI Intern</div></li>"#,
            card("Marketing Assistant", "Delta", "https://example.com/c", ""),
        );
        let filter = TitleFilter::inline().unwrap();
        let page = parse_search_page(&html, "AI Intern", 24, &filter).unwrap();

        assert_eq!(page.card_count, 3);
        assert!(page.jobs.is_empty());
    }

    fn board_at(endpoint: String) -> LinkedInBoard {
        let mut search = Config::default().search;
        search.endpoint = endpoint;
        search.max_pages = 4;
        LinkedInBoard::new(Client::new(), search, 0.0, TitleFilter::inline().unwrap())
    }

    fn listing(titles: &[&str]) -> String {
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| card(t, &format!("Company {}", i), &format!("https://example.com/{}", t.replace(' ', "-")), ""))
            .collect()
    }

    #[tokio::test]
    async fn test_search_stops_on_error_status() {
        let stub = stub::serve(vec![
            (200, listing(&["AI Intern"])),
            (429, String::new()),
            (200, listing(&["ML Intern"])),
        ])
        .await;
        let board = board_at(format!("{}/search", stub.base_url));

        let jobs = board.search("AI Intern").await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "AI Intern");

        let requests = stub.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].contains("start=0"));
        assert!(requests[1].contains("start=25"));
    }

    #[tokio::test]
    async fn test_search_stops_on_empty_page() {
        let stub = stub::serve(vec![
            (200, listing(&["AI Intern", "ML Intern"])),
            (200, String::new()),
            (200, listing(&["AI Trainee"])),
        ])
        .await;
        let board = board_at(format!("{}/search", stub.base_url));

        let jobs = board.search("AI Intern").await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(stub.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_search_runs_all_pages_then_stops() {
        let stub = stub::serve(vec![
            (200, listing(&["AI Intern"])),
            (200, listing(&["ML Intern"])),
            (200, listing(&["AI Trainee"])),
            (200, listing(&["AI Research Intern"])),
            (200, listing(&["Machine Learning Intern"])),
        ])
        .await;
        let board = board_at(format!("{}/search", stub.base_url));

        let jobs = board.search("AI Intern").await.unwrap();
        assert_eq!(jobs.len(), 4);
        assert!(stub.requests()[3].contains("start=75"));
    }

    #[tokio::test]
    async fn test_search_survives_transport_error() {
        let board = board_at(format!("{}/search", stub::refused_url().await));
        let jobs = board.search("AI Intern").await.unwrap();
        assert!(jobs.is_empty());
    }

    #[test]
    fn test_parse_empty_page() {
        let filter = TitleFilter::inline().unwrap();
        let page = parse_search_page("", "AI Intern", 24, &filter).unwrap();
        assert_eq!(page.card_count, 0);
    }
}
