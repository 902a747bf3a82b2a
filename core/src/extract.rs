use crate::{Post, Record};
use serde_json::Value;

/// Flatten one post into a dataset row. Never fails.
pub fn extract(post: &Post) -> Record {
    Record {
        id: post.id,
        date: post.created_at,
        text: post.text.clone(),
        hashtags: hashtag_texts(post.entities.as_ref()),
        user_name: post.user.name.clone(),
        user_location: non_empty(post.user.location.as_deref()),
        user_description: non_empty(post.user.description.as_deref()),
        user_created: post.user.created_at,
        user_followers: post.user.followers_count,
        user_friends: post.user.friends_count,
        user_favourites: post.user.favourites_count,
        user_verified: post.user.verified,
        source: post.source.clone(),
        retweets: post.retweet_count,
        favorites: post.favorite_count,
        is_retweet: post.retweeted,
        reply_to_status: post.in_reply_to_status_id,
    }
}

/// The API sends `""` for an unset profile field; stored as null.
fn non_empty(field: Option<&str>) -> Option<String> {
    field.filter(|s| !s.is_empty()).map(str::to_owned)
}

pub fn extract_all(posts: &[Post]) -> Vec<Record> {
    posts.iter().map(extract).collect()
}

/// Hashtag texts in source order.
///
/// An absent `hashtags` array, a non-array value, or any element without a
/// string `text` makes the whole collection count as empty. Empty maps to
/// `None`.
pub fn hashtag_texts(entities: Option<&Value>) -> Option<Vec<String>> {
    let tags = entities
        .and_then(|e| e.get("hashtags"))
        .and_then(Value::as_array)
        .and_then(|arr| {
            arr.iter()
                .map(|h| h.get("text").and_then(Value::as_str).map(str::to_owned))
                .collect::<Option<Vec<String>>>()
        })
        .unwrap_or_default();
    if tags.is_empty() { None } else { Some(tags) }
}
