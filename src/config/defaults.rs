//! Default values for configuration

/// Default environment variable holding the RapidAPI key
pub fn default_api_key_env() -> String {
    "RAPIDAPI_KEY".to_string()
}

/// Default RapidAPI host header value
pub fn default_api_host() -> String {
    "twitter154.p.rapidapi.com".to_string()
}

/// Default base URL of the search API
pub fn default_base_url() -> String {
    "https://twitter154.p.rapidapi.com".to_string()
}

/// Default search endpoint path
pub fn default_search_path() -> String {
    "/search/search".to_string()
}

/// Default request timeout in seconds
pub fn default_timeout_secs() -> u64 {
    30
}

/// Default user agent
pub fn default_user_agent() -> String {
    format!("tweetscout/{}", env!("CARGO_PKG_VERSION"))
}
