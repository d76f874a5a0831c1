use std::fmt;

use async_trait::async_trait;
use gn_core::config::ApiConfig;
use gn_core::{Article, Error, FetchError, NewsResponse, NewsSource, Result};
use reqwest::Client;
use url::Url;

use crate::logging::Logger;

/// Parse a listing body into articles.
pub fn parse_response(body: &str) -> std::result::Result<Vec<Article>, FetchError> {
    let response: NewsResponse = serde_json::from_str(body)?;
    Ok(response.into_articles())
}

/// The newsdata.io `news` endpoint, or anything that answers the same way.
pub struct NewsDataSource {
    client: Client,
    config: ApiConfig,
    logger: Logger,
}

impl NewsDataSource {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        let logger = Logger::new()
            .with_prefix("[newsdata]".to_string())
            .with_prefix(format!("[{}]", config.country));
        if config.api_key.is_empty() {
            logger.warn("No API key configured, the server will most likely reject the request");
        }
        Ok(Self {
            client,
            config,
            logger,
        })
    }

    pub fn request_url(&self) -> Result<Url> {
        Url::parse_with_params(
            &self.config.endpoint,
            &[
                ("apikey", self.config.api_key.as_str()),
                ("q", self.config.keyword.as_str()),
                ("country", self.config.country.as_str()),
            ],
        )
        .map_err(|e| Error::InvalidUrl(format!("{}: {}", self.config.endpoint, e)))
    }
}

impl fmt::Debug for NewsDataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsDataSource")
            .field("client", &"<reqwest::Client>")
            .field("endpoint", &self.config.endpoint)
            .field("api_key", &"<redacted>")
            .field("keyword", &self.config.keyword)
            .field("country", &self.config.country)
            .finish()
    }
}

#[async_trait]
impl NewsSource for NewsDataSource {
    fn name(&self) -> &str {
        "newsdata.io"
    }

    async fn fetch_articles(&self) -> std::result::Result<Vec<Article>, FetchError> {
        let url = self
            .request_url()
            .map_err(|e| FetchError::Unknown(e.to_string()))?;
        self.logger.debug(&format!(
            "GET {} q={} country={}",
            self.config.endpoint, self.config.keyword, self.config.country
        ));

        let response = self.client.get(url).send().await.map_err(|e| {
            self.logger.error(&format!("Request failed: {}", e));
            FetchError::from(e)
        })?;
        let status = response.status();
        let body = response.text().await?;

        match parse_response(&body) {
            Ok(articles) => {
                self.logger.info(&format!("📰 Received {} articles", articles.len()));
                Ok(articles)
            }
            Err(e) => {
                self.logger.error(&format!("Unusable response (HTTP {}): {}", status, e));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> NewsDataSource {
        NewsDataSource::new(ApiConfig {
            api_key: "pub_test".to_string(),
            keyword: "Port Harcourt".to_string(),
            ..ApiConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_request_url_carries_query() {
        let url = source().request_url().unwrap();
        assert_eq!(url.host_str(), Some("newsdata.io"));
        assert_eq!(url.path(), "/api/1/news");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("apikey".to_string(), "pub_test".to_string()),
                ("q".to_string(), "Port Harcourt".to_string()),
                ("country".to_string(), "ng".to_string()),
            ]
        );
    }

    #[test]
    fn test_debug_hides_api_key() {
        let debug = format!("{:?}", source());
        assert!(!debug.contains("pub_test"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_invalid_endpoint() {
        let source = NewsDataSource::new(ApiConfig {
            endpoint: "not a url".to_string(),
            ..ApiConfig::default()
        })
        .unwrap();
        assert!(matches!(source.request_url(), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_parse_response() {
        assert!(parse_response(r#"{"results": []}"#).unwrap().is_empty());

        let articles = parse_response(r#"{"results": [{"title": "Hello"}, {}]}"#).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Hello");
        assert_eq!(articles[1].title, "Untitled");

        assert!(matches!(
            parse_response(r#"{"status": "error", "results": {"message": "bad key"}}"#),
            Err(FetchError::InvalidResponseShape(_))
        ));
        assert!(matches!(
            parse_response(r#"{"status": "ok"}"#),
            Err(FetchError::InvalidResponseShape(_))
        ));
        assert!(matches!(parse_response("<html>502</html>"), Err(FetchError::Unknown(_))));
    }
}
