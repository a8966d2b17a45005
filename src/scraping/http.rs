//! Shared HTTP client and rate-limiting helpers

use crate::config::HttpConfig;
use crate::error::Result;
use rand::Rng;
use reqwest::Client;
use std::time::Duration;

/// Build the client used for every scraping request
pub fn build_client(config: &HttpConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Sleep for a fixed number of seconds; zero or negative skips the sleep
pub async fn pause(seconds: f64) {
    if seconds > 0.0 {
        tokio::time::sleep(Duration::from_secs_f64(seconds)).await;
    }
}

/// Pick a delay uniformly from `[min, max]`
pub fn random_delay(min: f64, max: f64) -> f64 {
    if max <= min {
        return min.max(0.0);
    }
    rand::thread_rng().gen_range(min..=max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_delay_bounds() {
        for _ in 0..100 {
            let d = random_delay(2.0, 5.0);
            assert!((2.0..=5.0).contains(&d));
        }
        assert_eq!(random_delay(0.0, 0.0), 0.0);
        assert_eq!(random_delay(3.0, 1.0), 3.0);
    }

    #[tokio::test]
    async fn test_pause_zero_returns_immediately() {
        let start = std::time::Instant::now();
        pause(0.0).await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn test_build_client() {
        let config = HttpConfig {
            user_agent: "job-tailor-test".to_string(),
            timeout_secs: 5,
        };
        assert!(build_client(&config).is_ok());
    }
}
