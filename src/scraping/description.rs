//! Job description fetching with host-specific selectors

use crate::error::Result;
use crate::scraping::{element_text, selector};
use log::warn;
use reqwest::{Client, StatusCode};
use scraper::Html;
use std::future::Future;

/// Minimum length for a paragraph to count in the fallback extraction
const MIN_PARAGRAPH_CHARS: usize = 50;

/// Something that can turn a posting URL into description text.
/// An empty string means nothing could be fetched.
pub trait DescriptionSource {
    fn fetch(&self, url: &str) -> impl Future<Output = String> + Send;
}

pub struct DescriptionFetcher {
    client: Client,
}

impl DescriptionFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn fetch_html(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                println!("  ❌ Error fetching JD: {}", e);
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            println!("  ⚠️  Status {} fetching JD", response.status());
            return None;
        }

        match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!("Failed to read JD body from {}: {}", url, e);
                None
            }
        }
    }
}

impl DescriptionSource for DescriptionFetcher {
    async fn fetch(&self, url: &str) -> String {
        let Some(html) = self.fetch_html(url).await else {
            return String::new();
        };

        match extract_description(&html, url) {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to extract description from {}: {}", url, e);
                String::new()
            }
        }
    }
}

/// Candidate selectors for a posting URL, tried in order
pub fn selectors_for(url: &str) -> &'static [&'static str] {
    if url.contains("linkedin.com") {
        &[
            "div.description__text",
            "div.show-more-less-html__markup",
            "section.description",
        ]
    } else if url.contains("indeed.com") || url.contains("indeed.co.uk") {
        &["div#jobDescriptionText"]
    } else if url.contains("glassdoor") {
        &["div.jobDescriptionContent"]
    } else {
        &["div.description", "div#job-description"]
    }
}

/// Pull description text out of a posting page.
///
/// Falls back to the page's long paragraphs when no selector yields text.
pub fn extract_description(html: &str, url: &str) -> Result<String> {
    let document = Html::parse_document(html);

    for css in selectors_for(url) {
        let sel = selector(css)?;
        if let Some(el) = document.select(&sel).next() {
            let text = el.text().collect::<String>().trim().to_string();
            if !text.is_empty() {
                return Ok(text);
            }
        }
    }

    let p = selector("p")?;
    let paragraphs: Vec<String> = document
        .select(&p)
        .map(element_text)
        .filter(|t| t.chars().count() > MIN_PARAGRAPH_CHARS)
        .collect();

    Ok(paragraphs.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support as stub;

    const LONG: &str = "This paragraph is comfortably longer than fifty characters in total.";

    #[test]
    fn test_selectors_by_host() {
        assert_eq!(selectors_for("https://uk.linkedin.com/jobs/view/1").len(), 3);
        assert_eq!(selectors_for("https://uk.indeed.com/viewjob?jk=1"), &["div#jobDescriptionText"]);
        assert_eq!(selectors_for("https://www.indeed.co.uk/x"), &["div#jobDescriptionText"]);
        assert_eq!(selectors_for("https://www.glassdoor.co.uk/job"), &["div.jobDescriptionContent"]);
        assert_eq!(selectors_for("https://boards.greenhouse.io/x")[1], "div#job-description");
    }

    #[test]
    fn test_linkedin_second_selector() {
        let html = r#"<html><body>
            <div class="description__text">   </div>
            <div class="show-more-less-html__markup"> Build <b>LLM</b> tools. </div>
        </body></html>"#;
        let text = extract_description(html, "https://www.linkedin.com/jobs/view/42").unwrap();
        assert_eq!(text, "Build LLM tools.");
    }

    #[test]
    fn test_host_specific_selector_ignored_elsewhere() {
        let html = r#"<div id="jobDescriptionText">Indeed text</div><div class="description">Generic text</div>"#;
        assert_eq!(extract_description(html, "https://careers.example.com/1").unwrap(), "Generic text");
        assert_eq!(extract_description(html, "https://uk.indeed.com/1").unwrap(), "Indeed text");
    }

    #[test]
    fn test_paragraph_fallback() {
        let html = format!("<p>short</p><p>{LONG}</p><p>  {LONG}  </p>");
        let text = extract_description(&html, "https://example.com").unwrap();
        assert_eq!(text, format!("{LONG} {LONG}"));
    }

    #[test]
    fn test_nothing_found() {
        let text = extract_description("<html><p>tiny</p></html>", "https://example.com").unwrap();
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_reads_description() {
        let page = format!("<html><body><p>{LONG}</p></body></html>");
        let server = stub::serve(vec![(200, page)]).await;
        let fetcher = DescriptionFetcher::new(Client::new());

        let text = fetcher.fetch(&format!("{}/jobs/1", server.base_url)).await;
        assert_eq!(text, LONG);
        assert!(server.requests()[0].starts_with("GET /jobs/1 "));
    }

    #[tokio::test]
    async fn test_fetch_failures_yield_empty() {
        let fetcher = DescriptionFetcher::new(Client::new());

        let missing = stub::serve(vec![(404, format!("<p>{LONG}</p>"))]).await;
        assert_eq!(fetcher.fetch(&missing.base_url).await, "");

        let truncated = stub::serve_raw(vec![format!(
            "HTTP/1.1 200 OK\r\nContent-Length: 4096\r\nConnection: close\r\n\r\n<p>{LONG}"
        )])
        .await;
        assert_eq!(fetcher.fetch(&truncated.base_url).await, "");
        assert_eq!(truncated.requests().len(), 1);

        assert_eq!(fetcher.fetch(&stub::refused_url().await).await, "");
    }
}
