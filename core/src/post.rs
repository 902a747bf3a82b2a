use crate::StatusId;
use serde::{Deserialize, Deserializer};
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// A status as returned by the v1.1 search endpoint. Only the fields the
/// dataset needs are kept; everything else in the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    pub id: StatusId,
    #[serde(deserialize_with = "api_datetime")]
    pub created_at: PrimitiveDateTime,
    pub text: String,
    /// Raw entities object; its shape is checked at extraction time.
    #[serde(default)]
    pub entities: Option<serde_json::Value>,
    pub user: PostUser,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub favorite_count: u64,
    #[serde(default)]
    pub retweeted: bool,
    #[serde(default)]
    pub in_reply_to_status_id: Option<StatusId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostUser {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "api_datetime")]
    pub created_at: PrimitiveDateTime,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub friends_count: u64,
    #[serde(default)]
    pub favourites_count: u64,
    #[serde(default)]
    pub verified: bool,
}

/// Parse the API's `Mon Jan 25 23:59:57 +0000 2021` format into naive UTC.
pub fn parse_api_datetime(s: &str) -> Result<PrimitiveDateTime, time::error::Parse> {
    let fmt = format_description!(
        "[weekday repr:short] [month repr:short] [day] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute] [year]"
    );
    let dt = OffsetDateTime::parse(s, &fmt)?.to_offset(UtcOffset::UTC);
    Ok(PrimitiveDateTime::new(dt.date(), dt.time()))
}

fn api_datetime<'de, D: Deserializer<'de>>(d: D) -> Result<PrimitiveDateTime, D::Error> {
    let s = String::deserialize(d)?;
    parse_api_datetime(&s).map_err(serde::de::Error::custom)
}
