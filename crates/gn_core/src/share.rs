use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use url::Url;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SharePlatform {
    Twitter,
    Facebook,
    LinkedIn,
}

impl SharePlatform {
    pub const ALL: [SharePlatform; 3] = [
        SharePlatform::Twitter,
        SharePlatform::Facebook,
        SharePlatform::LinkedIn,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SharePlatform::Twitter => "Twitter",
            SharePlatform::Facebook => "Facebook",
            SharePlatform::LinkedIn => "LinkedIn",
        }
    }

    /// Share endpoint and the query parameter carrying the article URL.
    fn endpoint(&self) -> (&'static str, &'static str) {
        match self {
            SharePlatform::Twitter => ("https://twitter.com/intent/tweet", "url"),
            SharePlatform::Facebook => ("https://www.facebook.com/sharer/sharer.php", "u"),
            SharePlatform::LinkedIn => ("https://www.linkedin.com/sharing/share-offsite/", "url"),
        }
    }

    pub fn share_url(&self, article_url: &str) -> Result<Url> {
        let (base, param) = self.endpoint();
        Url::parse_with_params(base, &[(param, article_url)])
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", base, e)))
    }
}

impl fmt::Display for SharePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SharePlatform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "twitter" | "x" => Ok(SharePlatform::Twitter),
            "facebook" | "fb" => Ok(SharePlatform::Facebook),
            "linkedin" => Ok(SharePlatform::LinkedIn),
            other => Err(format!("Unknown share platform: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLink {
    pub platform: SharePlatform,
    pub url: String,
}

/// Share links for every platform, in display order.
pub fn share_links(article_url: &str) -> Result<Vec<ShareLink>> {
    SharePlatform::ALL
        .iter()
        .map(|platform| {
            Ok(ShareLink {
                platform: *platform,
                url: platform.share_url(article_url)?.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_urls() {
        let article = "https://example.com/news?id=1&lang=en";
        let twitter = SharePlatform::Twitter.share_url(article).unwrap();
        assert_eq!(twitter.host_str(), Some("twitter.com"));
        assert_eq!(twitter.path(), "/intent/tweet");
        let (key, value) = twitter.query_pairs().next().unwrap();
        assert_eq!(key, "url");
        assert_eq!(value, article);

        let facebook = SharePlatform::Facebook.share_url(article).unwrap();
        assert_eq!(facebook.path(), "/sharer/sharer.php");
        assert_eq!(facebook.query_pairs().next().unwrap().0, "u");

        let linkedin = SharePlatform::LinkedIn.share_url(article).unwrap();
        assert_eq!(linkedin.path(), "/sharing/share-offsite/");
    }

    #[test]
    fn test_article_url_is_encoded() {
        let url = SharePlatform::Twitter
            .share_url("https://example.com/a?b=c&d=e")
            .unwrap();
        assert!(!url.as_str().contains("&d=e"));
        assert_eq!(url.query_pairs().count(), 1);
    }

    #[test]
    fn test_share_links_cover_all_platforms() {
        let links = share_links("#").unwrap();
        let platforms: Vec<_> = links.iter().map(|l| l.platform).collect();
        assert_eq!(platforms, SharePlatform::ALL.to_vec());
    }

    #[test]
    fn test_platform_parsing() {
        assert_eq!("X".parse::<SharePlatform>().unwrap(), SharePlatform::Twitter);
        assert_eq!("linkedin".parse::<SharePlatform>().unwrap(), SharePlatform::LinkedIn);
        assert!("myspace".parse::<SharePlatform>().is_err());
    }
}
