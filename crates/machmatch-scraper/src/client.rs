use std::time::Duration;

use reqwest::Client;

use machmatch_core::{Confidence, MachinerySignal, Provider};

use crate::error::ScraperError;
use crate::parse::{parse_category_listing, parse_directory_listing, strip_html_text};
use crate::rate_limit::retry_with_backoff;

const DEFAULT_BASE_URL: &str = "https://www.k-online.com";

/// Alphabetical sample pages fetched when the category search comes up short.
const DIRECTORY_LETTER_SAMPLE: [char; 6] = ['a', 'b', 'e', 'k', 'm', 's'];

/// Cap on listings taken from one category search page.
const CATEGORY_LISTING_CAP: usize = 100;
/// Cap on listings taken from one directory letter page.
const PER_LETTER_CAP: usize = 50;

/// How many characters of a prospect's page text the brand scan reads.
const BRAND_SCAN_TEXT_CAP: usize = 3000;

/// Machinery brands the website scan looks for on prospect sites.
const MACHINERY_BRANDS: [&str; 10] = [
    "ENGEL",
    "Arburg",
    "KraussMaffei",
    "Sumitomo",
    "Demag",
    "Husky",
    "Wittmann",
    "Battenfeld",
    "Haitian",
    "Negri Bossi",
];

/// HTTP client for the trade-fair exhibitor directory.
///
/// Handles rate limiting (429), not-found (404), and other non-2xx responses
/// as typed errors, retrying transient failures with exponential backoff.
/// Use [`DirectoryClient::new`] for production or
/// [`DirectoryClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug)]
pub struct DirectoryClient {
    client: Client,
    base_url: String,
    max_retries: u32,
    backoff_base_secs: u64,
    inter_request_delay_ms: u64,
}

impl DirectoryClient {
    /// Creates a client pointed at the production directory.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
        inter_request_delay_ms: u64,
    ) -> Result<Self, ScraperError> {
        Self::with_base_url(
            DEFAULT_BASE_URL,
            timeout_secs,
            user_agent,
            max_retries,
            backoff_base_secs,
            inter_request_delay_ms,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ScraperError::InvalidBaseUrl`] when
    /// `base_url` does not parse.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
        inter_request_delay_ms: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        reqwest::Url::parse(base_url).map_err(|e| ScraperError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            max_retries,
            backoff_base_secs,
            inter_request_delay_ms,
        })
    }

    /// Scrapes exhibitor listings: the machinery category search first, then
    /// the alphabetical directory sample when the category page yields fewer
    /// than [`CATEGORY_LISTING_CAP`] listings.
    ///
    /// Per-letter failures are logged and skipped; the category page failing
    /// outright falls through to the directory rather than aborting.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] only when every source failed to produce a
    /// single listing.
    pub async fn scrape_exhibitors(&self) -> Result<Vec<Provider>, ScraperError> {
        let mut exhibitors = match self.fetch_category_listing().await {
            Ok(listings) => listings,
            Err(error) => {
                tracing::warn!(%error, "category search failed, trying directory pages");
                Vec::new()
            }
        };

        if exhibitors.len() < CATEGORY_LISTING_CAP {
            exhibitors.extend(self.fetch_directory_sample().await);
        }

        if exhibitors.is_empty() {
            return Err(ScraperError::NotFound {
                url: format!("{}/vis/v1/en/search", self.base_url),
            });
        }
        tracing::info!(count = exhibitors.len(), "scraped exhibitor listings");
        Ok(exhibitors)
    }

    /// Fetches the machinery category search page and parses its listings,
    /// capped at [`CATEGORY_LISTING_CAP`].
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`] — HTTP 429 after all retries.
    /// - [`ScraperError::NotFound`] — HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`ScraperError::Http`] — network failure after all retries.
    pub async fn fetch_category_listing(&self) -> Result<Vec<Provider>, ScraperError> {
        let url = format!("{}/vis/v1/en/search?f_prod=k2025.03*", self.base_url);
        let body = self.fetch_page(&url).await?;
        let mut listings = parse_category_listing(&body, &url);
        listings.truncate(CATEGORY_LISTING_CAP);
        tracing::debug!(count = listings.len(), "category search parsed");
        Ok(listings)
    }

    /// Fetches the sampled directory letter pages, with an inter-request
    /// delay between pages. A letter that fails is logged and skipped.
    pub async fn fetch_directory_sample(&self) -> Vec<Provider> {
        let mut exhibitors = Vec::new();
        let mut first = true;
        for letter in DIRECTORY_LETTER_SAMPLE {
            if !first && self.inter_request_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.inter_request_delay_ms)).await;
            }
            first = false;

            let url = format!("{}/vis/v1/en/directory/{letter}", self.base_url);
            match self.fetch_page(&url).await {
                Ok(body) => {
                    let mut listings = parse_directory_listing(&body, &url);
                    listings.truncate(PER_LETTER_CAP);
                    exhibitors.extend(listings);
                }
                Err(error) => {
                    tracing::warn!(letter = %letter, %error, "directory page failed, skipping");
                }
            }
        }
        exhibitors
    }

    /// Scans a prospect's website for known machinery brand names.
    ///
    /// The page is reduced to plain text, truncated to
    /// [`BRAND_SCAN_TEXT_CAP`] characters, and searched case-insensitively
    /// for each brand in [`MACHINERY_BRANDS`]. Hits come back at medium
    /// confidence; a text-only scan cannot tell an installed press from a
    /// press mentioned in passing.
    ///
    /// # Errors
    ///
    /// Propagates the same errors as [`Self::fetch_category_listing`].
    pub async fn detect_machinery(&self, website: &str) -> Result<Vec<MachinerySignal>, ScraperError> {
        let body = self.fetch_page(website).await?;
        let text = strip_html_text(&body);
        let truncated: String = text.chars().take(BRAND_SCAN_TEXT_CAP).collect();
        let haystack = truncated.to_lowercase();

        let signals: Vec<MachinerySignal> = MACHINERY_BRANDS
            .iter()
            .filter(|brand| haystack.contains(&brand.to_lowercase()))
            .map(|brand| MachinerySignal {
                brand: (*brand).to_string(),
                confidence: Confidence::Medium,
            })
            .collect();
        if !signals.is_empty() {
            tracing::debug!(website, brands = signals.len(), "machinery brands detected");
        }
        Ok(signals)
    }

    /// GETs one page with retry, returning its body text.
    async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.to_owned();
            async move {
                let response = self.client.get(&url).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(ScraperError::RateLimited {
                        domain: extract_domain(&url),
                        retry_after_secs,
                    });
                }
                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ScraperError::NotFound { url });
                }
                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                Ok(response.text().await?)
            }
        })
        .await
    }
}

/// Hostname for error messages; falls back to the whole URL when it does not
/// parse.
fn extract_domain(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
