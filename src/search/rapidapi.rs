use super::SearchBackend;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{SearchPage, Section};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

const KEY_HEADER: &str = "x-rapidapi-key";
const HOST_HEADER: &str = "x-rapidapi-host";

/// Longest slice of an error body carried into the error message
const MAX_ERROR_BODY: usize = 200;

/// Search client for the RapidAPI Twitter endpoint
pub struct RapidApiClient {
    client: Client,
    endpoint: Url,
    api_host: String,
    api_key_env: String,
    api_key: Option<String>,
}

impl RapidApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let endpoint = config.search_url()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            endpoint,
            api_host: config.api_host.clone(),
            api_key_env: config.api_key_env.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            Error::Config(format!("{} environment variable is not set", self.api_key_env))
        })
    }
}

#[async_trait]
impl SearchBackend for RapidApiClient {
    async fn fetch_page(
        &self,
        query: &str,
        section: Section,
        page_size: usize,
        continuation_token: Option<&str>,
    ) -> Result<SearchPage> {
        let api_key = self.api_key()?;

        let mut params = vec![
            ("query", query.to_string()),
            ("section", section.to_string()),
            ("limit", page_size.to_string()),
        ];
        if let Some(token) = continuation_token {
            params.push(("continuation_token", token.to_string()));
        }

        debug!(url = %self.endpoint, section = %section, page_size, "GET search page");

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&params)
            .header(KEY_HEADER, api_key)
            .header(HOST_HEADER, &self.api_host)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(Error::Remote(if snippet.is_empty() {
                format!("Request failed with status code {}", status.as_u16())
            } else {
                format!(
                    "Request failed with status code {}: {}",
                    status.as_u16(),
                    snippet
                )
            }));
        }

        Ok(response.json::<SearchPage>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchRequest;
    use crate::search::paginate;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server: &MockServer) -> Config {
        let mut config = Config::default().with_api_key("test-key");
        config.base_url = server.uri();
        config.timeout_secs = 5;
        config
    }

    fn tweets(prefix: &str, count: usize) -> Vec<serde_json::Value> {
        (0..count)
            .map(|i| json!({ "tweet_id": format!("{}{}", prefix, i), "text": "hello" }))
            .collect()
    }

    #[tokio::test]
    async fn test_sends_credentials_and_params() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/search"))
            .and(query_param("query", "rust lang"))
            .and(query_param("section", "top"))
            .and(query_param("limit", "5"))
            .and(header("x-rapidapi-key", "test-key"))
            .and(header("x-rapidapi-host", "twitter154.p.rapidapi.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": tweets("a", 5),
                "continuation_token": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = RapidApiClient::new(&test_config(&server)).unwrap();
        let page = client
            .fetch_page("rust lang", Section::Top, 5, None)
            .await
            .unwrap();

        assert_eq!(page.results.len(), 5);
        assert!(page.continuation_token.is_none());
    }

    #[tokio::test]
    async fn test_follows_continuation_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/search"))
            .and(query_param("continuation_token", "page2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": tweets("b", 20),
                "continuation_token": "page3"
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/search/search"))
            .and(query_param("limit", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": tweets("a", 20),
                "continuation_token": "page2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = RapidApiClient::new(&test_config(&server)).unwrap();
        let request = SearchRequest::new("rust", Section::Latest, 40).unwrap();
        let results = paginate(&client, &request).await.unwrap();

        assert_eq!(results.len(), 40);
        assert_eq!(results[0].id(), Some(&json!("a0")));
        assert_eq!(results[20].id(), Some(&json!("b0")));
    }

    #[tokio::test]
    async fn test_non_success_status_is_remote_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Too many requests"))
            .mount(&server)
            .await;

        let client = RapidApiClient::new(&test_config(&server)).unwrap();
        let err = client
            .fetch_page("rust", Section::Latest, 20, None)
            .await
            .unwrap_err();

        assert!(err.is_remote());
        let message = err.to_string();
        assert!(message.contains("429"));
        assert!(message.contains("Too many requests"));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .expect(0)
            .mount(&server)
            .await;

        let mut config = test_config(&server);
        config.api_key = None;
        let client = RapidApiClient::new(&config).unwrap();
        let err = client
            .fetch_page("rust", Section::Latest, 20, None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Config(_)));
        assert!(err
            .to_string()
            .contains("RAPIDAPI_KEY environment variable is not set"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = RapidApiClient::new(&test_config(&server)).unwrap();
        let err = client
            .fetch_page("rust", Section::Latest, 20, None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Http(_)));
    }
}
