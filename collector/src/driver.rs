use crate::twitter::{SearchQuery, SearchSource, MAX_PAGE_SIZE};
use anyhow::Result;
use std::time::Instant;
use tweets_core::Post;

/// Page through `source` until it runs dry or `limit` posts are collected.
/// Posts are returned in the order the source produced them.
pub async fn collect<S: SearchSource + ?Sized>(source: &S, query: &SearchQuery, limit: usize) -> Result<Vec<Post>> {
    let started = Instant::now();
    let mut posts: Vec<Post> = Vec::new();
    let mut cursor = None;
    let mut pages = 0usize;

    while posts.len() < limit {
        let want = (limit - posts.len()).min(MAX_PAGE_SIZE);
        let page = source.search(query, cursor, want).await?;
        pages += 1;
        if page.posts.is_empty() {
            break;
        }
        let take = page.posts.len().min(limit - posts.len());
        posts.extend(page.posts.into_iter().take(take));
        tracing::info!(page = pages, collected = posts.len(), limit, "fetched page");
        match page.next_max_id {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    tracing::info!(
        posts = posts.len(),
        pages,
        elapsed_s = started.elapsed().as_secs_f64(),
        "collection finished"
    );
    Ok(posts)
}
