use crate::oauth::{authorization_header, encode, Credentials};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use time::Date;
use tokio::time::sleep;
use tweets_core::config::{format_date, RunConfig};
use tweets_core::{Post, StatusId};
use url::Url;

pub const SEARCH_URL: &str = "https://api.twitter.com/1.1/search/tweets.json";
/// Largest page the search endpoint returns.
pub const MAX_PAGE_SIZE: usize = 100;
/// Length of a rate-limit window, used when the reset header is missing.
const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub words: String,
    pub language: String,
    /// Inclusive.
    pub since: Date,
    /// Exclusive.
    pub until: Date,
}

impl From<&RunConfig> for SearchQuery {
    fn from(cfg: &RunConfig) -> Self {
        Self {
            words: cfg.search_words.clone(),
            language: cfg.language.clone(),
            since: cfg.date_since,
            until: cfg.date_until,
        }
    }
}

impl SearchQuery {
    /// Request parameters for one page, excluding OAuth fields.
    pub fn params(&self, max_id: Option<StatusId>, count: usize) -> Vec<(String, String)> {
        let mut params = vec![
            ("q".to_string(), format!("{} since:{}", self.words, format_date(self.since))),
            ("lang".to_string(), self.language.clone()),
            ("until".to_string(), format_date(self.until)),
            ("count".to_string(), count.min(MAX_PAGE_SIZE).to_string()),
            ("result_type".to_string(), "recent".to_string()),
        ];
        if let Some(id) = max_id {
            params.push(("max_id".to_string(), id.to_string()));
        }
        params
    }
}

#[derive(Debug, Default)]
pub struct SearchPage {
    pub posts: Vec<Post>,
    /// Cursor for the next (older) page; `None` once results are exhausted.
    pub next_max_id: Option<StatusId>,
}

/// Something that can answer paged search requests.
#[async_trait]
pub trait SearchSource {
    async fn search(&self, query: &SearchQuery, max_id: Option<StatusId>, count: usize) -> Result<SearchPage>;
}

#[derive(Deserialize)]
struct SearchResponse {
    statuses: Vec<Post>,
    #[serde(default)]
    search_metadata: Option<SearchMetadata>,
}

#[derive(Deserialize)]
struct SearchMetadata {
    #[serde(default)]
    next_results: Option<String>,
}

/// Decode a search response body into a page.
pub fn parse_search_response(body: &str) -> Result<SearchPage> {
    let resp: SearchResponse = serde_json::from_str(body).context("decoding search response")?;
    let next_max_id = resp
        .search_metadata
        .and_then(|m| m.next_results)
        .and_then(|next| next_max_id(&next));
    Ok(SearchPage { posts: resp.statuses, next_max_id })
}

/// `next_results` looks like `?max_id=1353...&q=...`.
fn next_max_id(next_results: &str) -> Option<StatusId> {
    let url = Url::parse(SEARCH_URL).ok()?.join(next_results).ok()?;
    url.query_pairs().find(|(k, _)| k == "max_id").and_then(|(_, v)| v.parse().ok())
}

/// Seconds to wait given an `x-rate-limit-reset` epoch value.
fn rate_limit_wait(reset: Option<u64>, now: u64) -> Duration {
    match reset {
        Some(reset) => Duration::from_secs(reset.saturating_sub(now) + 1),
        None => RATE_LIMIT_WINDOW,
    }
}

fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

pub struct TwitterClient {
    client: Client,
    creds: Credentials,
}

impl TwitterClient {
    pub fn new(creds: Credentials, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("tweet-collector/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client, creds })
    }

    async fn get_once(&self, params: &[(String, String)]) -> Result<reqwest::Response> {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let auth = authorization_header(&self.creds, "GET", SEARCH_URL, params, &nonce, unix_now())?;
        // encoded by hand so the wire form matches what was signed
        let query = params.iter().map(|(k, v)| format!("{}={}", encode(k), encode(v))).collect::<Vec<_>>().join("&");
        let resp = self
            .client
            .get(format!("{SEARCH_URL}?{query}"))
            .header(header::AUTHORIZATION, auth)
            .send()
            .await
            .context("search request failed")?;
        Ok(resp)
    }
}

#[async_trait]
impl SearchSource for TwitterClient {
    async fn search(&self, query: &SearchQuery, max_id: Option<StatusId>, count: usize) -> Result<SearchPage> {
        let params = query.params(max_id, count);
        loop {
            let resp = self.get_once(&params).await?;
            let status = resp.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                let reset = resp
                    .headers()
                    .get("x-rate-limit-reset")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok());
                let wait = rate_limit_wait(reset, unix_now());
                tracing::warn!(wait_secs = wait.as_secs(), "rate limit reached, sleeping");
                sleep(wait).await;
                continue;
            }
            let body = resp.text().await.context("reading search response")?;
            if !status.is_success() {
                return Err(anyhow!("search failed with {status}: {body}"));
            }
            return parse_search_response(&body);
        }
    }
}
