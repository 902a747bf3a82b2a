use crate::Record;
use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

/// Place names that mark a post as coming from outside the target locale.
pub const DEFAULT_KEYWORDS: &[&str] = &["malaysia", "kuala lumpur", "sabah", "negeri sembilan", "sarawak"];

lazy_static! {
    static ref DEFAULT_FILTER: LocaleFilter =
        LocaleFilter::new(DEFAULT_KEYWORDS).expect("valid default keyword pattern");
}

/// Case-insensitive substring classifier over a record's body text, author
/// location and author description.
#[derive(Debug, Clone)]
pub struct LocaleFilter {
    /// `None` for an empty keyword list, which matches nothing.
    pattern: Option<Regex>,
}

impl Default for LocaleFilter {
    fn default() -> Self { DEFAULT_FILTER.clone() }
}

impl LocaleFilter {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> anyhow::Result<Self> {
        if keywords.is_empty() {
            return Ok(Self { pattern: None });
        }
        let alternation = keywords
            .iter()
            .map(|k| regex::escape(k.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = RegexBuilder::new(&alternation).case_insensitive(true).build()?;
        Ok(Self { pattern: Some(pattern) })
    }

    fn matches(&self, field: Option<&str>) -> bool {
        match (&self.pattern, field) {
            (Some(p), Some(s)) => p.is_match(s),
            _ => false,
        }
    }

    /// True when any of the three text fields mentions any keyword.
    pub fn is_foreign(&self, rec: &Record) -> bool {
        self.matches(Some(&rec.text))
            || self.matches(rec.user_location.as_deref())
            || self.matches(rec.user_description.as_deref())
    }

    /// Split into (kept, excluded), both in input order.
    pub fn partition(&self, records: Vec<Record>) -> (Vec<Record>, Vec<Record>) {
        let (excluded, kept): (Vec<Record>, Vec<Record>) = records.into_iter().partition(|r| self.is_foreign(r));
        (kept, excluded)
    }

    pub fn retain_local(&self, records: Vec<Record>) -> Vec<Record> {
        self.partition(records).0
    }
}
