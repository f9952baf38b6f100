//! Paginated tweet search
//!
//! The remote API returns at most [`MAX_PAGE_SIZE`] tweets per call and hands
//! back an opaque continuation token for the next page. [`paginate`] chains
//! those calls sequentially until the requested limit is met or the service
//! stops issuing tokens.

mod rapidapi;

pub use rapidapi::RapidApiClient;

use crate::error::Result;
use crate::models::{SearchPage, SearchRequest, Section, TweetRecord};
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Largest page the remote API will serve
pub const MAX_PAGE_SIZE: usize = 20;

/// A source of search result pages
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Fetch a single page of results
    async fn fetch_page(
        &self,
        query: &str,
        section: Section,
        page_size: usize,
        continuation_token: Option<&str>,
    ) -> Result<SearchPage>;
}

/// Upper bound on the number of calls needed to satisfy `limit`
pub fn requests_needed(limit: usize) -> usize {
    limit.div_ceil(MAX_PAGE_SIZE)
}

/// Run a search, following continuation tokens until `limit` records have
/// been collected, the service stops returning a token, or the call budget of
/// `ceil(limit / 20)` is spent. Any failed call aborts the whole search.
pub async fn paginate<B>(backend: &B, request: &SearchRequest) -> Result<Vec<TweetRecord>>
where
    B: SearchBackend + ?Sized,
{
    let limit = request.limit();
    let max_requests = requests_needed(limit);
    let mut tweets: Vec<TweetRecord> = Vec::new();
    let mut token: Option<String> = None;

    info!(
        query = request.query(),
        section = %request.section(),
        limit,
        "Twitter search"
    );

    for page in 0..max_requests {
        let page_size = MAX_PAGE_SIZE.min(limit - tweets.len());

        let result = backend
            .fetch_page(request.query(), request.section(), page_size, token.as_deref())
            .await;

        let SearchPage {
            results,
            continuation_token,
        } = match result {
            Ok(page) => page,
            Err(e) => {
                if !tweets.is_empty() {
                    warn!(
                        page = page + 1,
                        discarded = tweets.len(),
                        "Search page failed; discarding earlier pages"
                    );
                }
                return Err(e);
            }
        };

        debug!(
            page = page + 1,
            page_size,
            received = results.len(),
            has_token = continuation_token.is_some(),
            "Fetched search page"
        );

        tweets.extend(results);
        token = continuation_token;

        if token.is_none() || tweets.len() >= limit {
            break;
        }
    }

    tweets.truncate(limit);
    debug!(returned = tweets.len(), "Search complete");
    Ok(tweets)
}

/// Binds a backend so callers only deal with requests
pub struct Paginator<B> {
    backend: B,
}

impl<B: SearchBackend> Paginator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<TweetRecord>> {
        paginate(&self.backend, request).await
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
