pub mod config;
pub mod dataset;
pub mod extract;
pub mod locale;
pub mod persist;
pub mod post;

use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

pub use post::{Post, PostUser};

pub type StatusId = u64;

/// Column order of the persisted dataset.
pub const COLUMNS: [&str; 17] = [
    "id",
    "date",
    "text",
    "hashtags",
    "user_name",
    "user_location",
    "user_description",
    "user_created",
    "user_followers",
    "user_friends",
    "user_favourites",
    "user_verified",
    "source",
    "retweets",
    "favorites",
    "is_retweet",
    "reply_to_status",
];

/// One flattened post, as stored in the dataset file. Timestamps are naive UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: StatusId,
    #[serde(with = "persist::datetime")]
    pub date: PrimitiveDateTime,
    pub text: String,
    /// `None` when the post carried no hashtags.
    #[serde(with = "persist::hashtags")]
    pub hashtags: Option<Vec<String>>,
    pub user_name: String,
    pub user_location: Option<String>,
    pub user_description: Option<String>,
    #[serde(with = "persist::datetime")]
    pub user_created: PrimitiveDateTime,
    pub user_followers: u64,
    pub user_friends: u64,
    pub user_favourites: u64,
    #[serde(with = "persist::pybool")]
    pub user_verified: bool,
    pub source: String,
    pub retweets: u64,
    pub favorites: u64,
    #[serde(with = "persist::pybool")]
    pub is_retweet: bool,
    #[serde(with = "persist::status_id")]
    pub reply_to_status: Option<StatusId>,
}
