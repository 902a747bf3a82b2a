pub mod driver;
pub mod oauth;
pub mod twitter;

use anyhow::Result;
use tweets_core::config::RunConfig;
use tweets_core::dataset::{merge, MergeReport};
use tweets_core::extract::extract_all;
use tweets_core::locale::LocaleFilter;
use twitter::{SearchQuery, SearchSource};

/// One full run: collect, flatten, merge into the dataset file.
pub async fn run<S: SearchSource + ?Sized>(source: &S, cfg: &RunConfig, filter: &LocaleFilter) -> Result<MergeReport> {
    cfg.validate()?;
    let query = SearchQuery::from(cfg);
    tracing::info!(
        query = %query.words,
        since = %query.since,
        until = %query.until,
        lang = %query.language,
        limit = cfg.items_limit,
        "searching"
    );
    let posts = driver::collect(source, &query, cfg.items_limit).await?;
    let records = extract_all(&posts);
    tracing::info!(records = records.len(), "built batch");
    merge(&cfg.dataset_path, records, filter)
}
