use std::path::PathBuf;
use time::macros::date;
use time::Date;

pub const DEFAULT_SEARCH_WORDS: &str = "#vaksin OR #vaksinasi -filter:retweets";
pub const DEFAULT_LANGUAGE: &str = "id";
pub const DEFAULT_ITEMS_LIMIT: usize = 3000;
pub const DEFAULT_DATASET_PATH: &str = "indonesian_vaccination_tweets.csv";

/// Parameters of one collection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub search_words: String,
    pub language: String,
    /// Inclusive.
    pub date_since: Date,
    /// Exclusive.
    pub date_until: Date,
    pub items_limit: usize,
    pub dataset_path: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            search_words: DEFAULT_SEARCH_WORDS.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            date_since: date!(2021 - 01 - 25),
            date_until: date!(2021 - 01 - 26),
            items_limit: DEFAULT_ITEMS_LIMIT,
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.date_since < self.date_until,
            "date_since ({}) must be before date_until ({})",
            self.date_since,
            self.date_until
        );
        anyhow::ensure!(!self.search_words.trim().is_empty(), "search words must not be empty");
        Ok(())
    }
}

/// `YYYY-MM-DD`, as used on the command line and in search queries.
pub fn parse_date(s: &str) -> anyhow::Result<Date> {
    Ok(Date::parse(s, time::macros::format_description!("[year]-[month]-[day]"))?)
}

pub fn format_date(d: Date) -> String {
    d.format(time::macros::format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| d.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_a_one_day_window() {
        let cfg = RunConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(format_date(cfg.date_since), "2021-01-25");
        assert_eq!(parse_date("2021-01-26").unwrap(), cfg.date_until);
    }

    #[test]
    fn inverted_window_is_rejected() {
        let cfg = RunConfig { date_since: date!(2021 - 02 - 01), ..RunConfig::default() };
        assert!(cfg.validate().is_err());
    }
}
