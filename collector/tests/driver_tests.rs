use anyhow::{anyhow, Result};
use async_trait::async_trait;
use collector::driver::collect;
use collector::twitter::{SearchPage, SearchQuery, SearchSource};
use serde_json::json;
use std::sync::Mutex;
use tempfile::tempdir;
use time::macros::date;
use tweets_core::config::RunConfig;
use tweets_core::locale::LocaleFilter;
use tweets_core::persist::load_dataset;
use tweets_core::{Post, StatusId};

fn post(id: u64, location: &str) -> Post {
    serde_json::from_value(json!({
        "id": id,
        "created_at": "Mon Jan 25 10:00:00 +0000 2021",
        "text": format!("tweet {id} #vaksin"),
        "entities": {"hashtags": [{"text": "vaksin"}]},
        "user": {
            "name": "someone",
            "location": location,
            "description": null,
            "created_at": "Sat Mar 07 01:02:03 +0000 2015"
        },
        "source": "Twitter for iPhone"
    }))
    .unwrap()
}

/// Serves ids `total, total-1, ..., 1` newest first, like the search endpoint.
struct FakeSource {
    total: u64,
    calls: Mutex<Vec<(Option<StatusId>, usize)>>,
}

impl FakeSource {
    fn new(total: u64) -> Self {
        Self { total, calls: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl SearchSource for FakeSource {
    async fn search(&self, _query: &SearchQuery, max_id: Option<StatusId>, count: usize) -> Result<SearchPage> {
        self.calls.lock().unwrap().push((max_id, count));
        let top = max_id.unwrap_or(self.total);
        let posts: Vec<Post> = (1..=top).rev().take(count).map(|id| post(id, "Jakarta")).collect();
        let next_max_id = posts.last().map(|p| p.id - 1).filter(|id| *id > 0);
        Ok(SearchPage { posts, next_max_id })
    }
}

struct FailingSource;

#[async_trait]
impl SearchSource for FailingSource {
    async fn search(&self, _query: &SearchQuery, _max_id: Option<StatusId>, _count: usize) -> Result<SearchPage> {
        Err(anyhow!("401 Unauthorized"))
    }
}

fn query() -> SearchQuery {
    SearchQuery::from(&RunConfig::default())
}

#[tokio::test]
async fn stops_at_the_item_cap() {
    let source = FakeSource::new(1_000);
    let posts = collect(&source, &query(), 250).await.unwrap();
    assert_eq!(posts.len(), 250);
    assert_eq!(posts[0].id, 1_000);
    assert_eq!(posts[249].id, 751);
    let calls = source.calls.lock().unwrap().clone();
    assert_eq!(calls, vec![(None, 100), (Some(900), 100), (Some(800), 50)]);
}

#[tokio::test]
async fn stops_when_the_source_is_exhausted() {
    let source = FakeSource::new(130);
    let posts = collect(&source, &query(), 3_000).await.unwrap();
    assert_eq!(posts.len(), 130);
    let ids: Vec<u64> = posts.iter().map(|p| p.id).collect();
    assert!(ids.windows(2).all(|w| w[0] > w[1]));
    assert_eq!(source.calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn empty_source_yields_nothing() {
    let source = FakeSource::new(0);
    assert!(collect(&source, &query(), 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn source_errors_propagate() {
    let err = collect(&FailingSource, &query(), 10).await.unwrap_err();
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn run_merges_collected_posts_into_the_dataset() {
    let dir = tempdir().unwrap();
    let cfg = RunConfig {
        items_limit: 5,
        dataset_path: dir.path().join("tweets.csv"),
        date_since: date!(2021 - 01 - 25),
        date_until: date!(2021 - 01 - 26),
        ..RunConfig::default()
    };

    let report = collector::run(&FakeSource::new(5), &cfg, &LocaleFilter::default()).await.unwrap();
    assert_eq!(report.final_rows, 5);

    // a second run sees the same ids again and adds one foreign tweet
    struct WithForeign;
    #[async_trait]
    impl SearchSource for WithForeign {
        async fn search(&self, _q: &SearchQuery, _max_id: Option<StatusId>, _count: usize) -> Result<SearchPage> {
            Ok(SearchPage { posts: vec![post(3, "Jakarta"), post(6, "Kuching, Sarawak")], next_max_id: None })
        }
    }
    let report = collector::run(&WithForeign, &cfg, &LocaleFilter::default()).await.unwrap();
    assert_eq!(report.old_rows, 5);
    assert_eq!(report.deduped_rows, 6);
    assert_eq!(report.final_rows, 5);

    let rows = load_dataset(&cfg.dataset_path).unwrap();
    let ids: Vec<u64> = rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![5, 4, 2, 1, 3]);
    assert_eq!(rows[0].hashtags, Some(vec!["vaksin".to_string()]));
}
