use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UNTITLED: &str = "Untitled";
pub const MISSING_URL: &str = "#";
pub const NO_DESCRIPTION: &str = "No description available";
pub const UNKNOWN_DATE: &str = "Unknown";
pub const UNCATEGORIZED: &str = "Uncategorized";
pub const NO_IMAGE: &str = "Image Not Available";

/// One record of the `results` array as the news API sends it.
///
/// Every field may be missing or `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawArticle {
    #[serde(default)]
    pub article_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "pubDate")]
    pub pub_date: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<Vec<String>>,
}

/// The listing body: `{ "results": [...] }`. Other fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsResponse {
    pub results: Vec<RawArticle>,
}

impl NewsResponse {
    pub fn into_articles(self) -> Vec<Article> {
        self.results.into_iter().map(Article::from).collect()
    }
}

/// Publication time as received, plus its parsed value when it parses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedAt {
    pub raw: String,
    pub parsed: Option<DateTime<Utc>>,
}

impl PublishedAt {
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            parsed: parse_timestamp(raw),
        }
    }

    pub fn unknown() -> Self {
        Self::parse(UNKNOWN_DATE)
    }

    pub fn is_known(&self) -> bool {
        self.parsed.is_some()
    }

    /// Chronological comparison. An unparseable date is earlier than every
    /// parseable one, and two unparseable dates compare equal.
    pub fn chronological(&self, other: &Self) -> Ordering {
        self.parsed.cmp(&other.parsed)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub id: Option<String>,
    pub title: String,
    pub url: String,
    pub description: String,
    pub published_at: PublishedAt,
    pub image_url: Option<String>,
    pub section: String,
}

impl Article {
    /// What the narrator reads for this article.
    pub fn narration_text(&self) -> String {
        narration_text(&self.title, &self.description)
    }
}

pub fn narration_text(title: &str, description: &str) -> String {
    format!("{}. {}", title, description)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<RawArticle> for Article {
    fn from(raw: RawArticle) -> Self {
        let published_at = match non_empty(raw.pub_date) {
            Some(date) => PublishedAt::parse(&date),
            None => PublishedAt::unknown(),
        };
        let section = raw
            .category
            .and_then(|categories| categories.into_iter().next())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| UNCATEGORIZED.to_string());

        Self {
            id: non_empty(raw.article_id),
            title: non_empty(raw.title).unwrap_or_else(|| UNTITLED.to_string()),
            url: non_empty(raw.link).unwrap_or_else(|| MISSING_URL.to_string()),
            description: non_empty(raw.description).unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            published_at,
            image_url: non_empty(raw.image_url),
            section,
        }
    }
}
