//! Rendering of search results into the text block returned to MCP clients

mod date;

pub use date::PostedDate;

use crate::models::{display_value, is_truthy, Section, TweetRecord};
use serde_json::Value;

const TWITTER_BASE: &str = "https://twitter.com";

/// Format search results as a markdown report, one block per tweet in
/// arrival order. Pure: the same input always yields the same text.
pub fn format_results(query: &str, _section: Section, tweets: &[TweetRecord]) -> String {
    if tweets.is_empty() {
        return format!("No tweets found for query: {}", query);
    }

    let mut output: Vec<String> = Vec::new();
    for (index, tweet) in tweets.iter().enumerate() {
        format_tweet(&mut output, index + 1, tweet);
    }
    output.join("\n")
}

fn format_tweet(output: &mut Vec<String>, position: usize, tweet: &TweetRecord) {
    let username = display_value(tweet.username());

    output.push(format!("## [{}] Tweet by @{}", position, username));

    let mut user_line = format!(
        "**User:** {} (@{})",
        display_value(tweet.user_field("name")),
        username
    );
    if tweet.is_verified() {
        user_line.push_str(" [Verified]");
    }
    output.push(user_line);

    if let Some(stats) = account_stats(tweet) {
        output.push(format!("**Account stats:** {}", stats));
    }

    output.push(format!("\n**Content:** {}\n", display_value(tweet.text())));
    output.push(format!("**Engagement:** {}", engagement(tweet)));
    output.push(format!("**Posted:** {}", PostedDate::parse(tweet.posted_at())));

    if let Some(reply_to) = tweet.reply_to_id() {
        output.push(format!(
            "**Reply to:** {}/status/{}",
            TWITTER_BASE,
            display_value(Some(reply_to))
        ));
    }

    if let Some(media) = tweet.media().filter(|m| !m.is_empty()) {
        output.push(format!("**Media:** {} attachment(s)", media.len()));
        for item in media {
            output.push(format!("  - {}", media_url(item)));
        }
    }

    if tweet.has_extended_video() || tweet.video_url().is_some() {
        let video = tweet
            .video_url()
            .map(video_text)
            .unwrap_or_else(|| "Multiple formats available".to_string());
        output.push(format!("**Video:** {}", video));
    }

    let handle = tweet.username().filter(|v| is_truthy(v));
    match (tweet.id(), handle) {
        (Some(id), Some(handle)) => output.push(format!(
            "**URL:** {}/{}/status/{}",
            TWITTER_BASE,
            display_value(Some(handle)),
            display_value(Some(id))
        )),
        _ => output.push("**URL:** Unable to construct URL (missing id or username)".to_string()),
    }

    output.push("\n---\n".to_string());
}

/// Follower/following counts; each part only when its key is present
fn account_stats(tweet: &TweetRecord) -> Option<String> {
    let user = tweet.user()?;
    let mut parts = Vec::new();
    if let Some(followers) = user.get("follower_count") {
        parts.push(format!("{} followers", display_value(Some(followers))));
    }
    if let Some(following) = user.get("following_count") {
        parts.push(format!("{} following", display_value(Some(following))));
    }
    (!parts.is_empty()).then(|| parts.join(", "))
}

/// Likes, retweets and replies are always printed. Quotes, bookmarks and
/// views only when truthy, so a zero there is dropped.
fn engagement(tweet: &TweetRecord) -> String {
    let mut metrics = vec![
        format!("{} likes", display_value(tweet.get("favorite_count"))),
        format!("{} retweets", display_value(tweet.get("retweet_count"))),
        format!("{} replies", display_value(tweet.get("reply_count"))),
    ];

    for (key, label) in [
        ("quote_count", "quotes"),
        ("bookmark_count", "bookmarks"),
        ("views", "views"),
    ] {
        if let Some(value) = tweet.get(key).filter(|v| is_truthy(v)) {
            metrics.push(format!("{} {}", display_value(Some(value)), label));
        }
    }

    metrics.join(" | ")
}

/// Prefer the https URL, then the plain one
fn media_url(item: &Value) -> String {
    if let Value::String(url) = item {
        return url.clone();
    }
    let url = item
        .get("media_url_https")
        .filter(|v| is_truthy(v))
        .or_else(|| item.get("media_url"));
    display_value(url)
}

fn video_text(value: &Value) -> String {
    match value {
        Value::Array(variants) => variants
            .iter()
            .filter_map(|variant| match variant {
                Value::String(url) => Some(url.clone()),
                other => other.get("url").and_then(Value::as_str).map(String::from),
            })
            .collect::<Vec<_>>()
            .join(", "),
        other => display_value(Some(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tweet(value: Value) -> TweetRecord {
        TweetRecord::from_value(value).unwrap()
    }

    fn full_tweet() -> TweetRecord {
        tweet(json!({
            "tweet_id": "1790000000000000000",
            "creation_date": "Wed Oct 10 20:19:24 +0000 2018",
            "text": "Shipping a new release today",
            "favorite_count": 10,
            "retweet_count": 4,
            "reply_count": 1,
            "views": 900,
            "user": {
                "username": "ferris",
                "name": "Ferris the Crab",
                "is_blue_verified": true,
                "follower_count": 1200,
                "following_count": 80
            }
        }))
    }

    fn line<'a>(text: &'a str, prefix: &str) -> &'a str {
        text.lines()
            .find(|l| l.starts_with(prefix))
            .unwrap_or_else(|| panic!("no line starting with {prefix:?} in:\n{text}"))
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(
            format_results("rustlang", Section::Latest, &[]),
            "No tweets found for query: rustlang"
        );
    }

    #[test]
    fn test_full_record_layout() {
        let text = format_results("release", Section::Top, &[full_tweet()]);
        let expected = [
            "## [1] Tweet by @ferris",
            "**User:** Ferris the Crab (@ferris) [Verified]",
            "**Account stats:** 1200 followers, 80 following",
            "",
            "**Content:** Shipping a new release today",
            "",
            "**Engagement:** 10 likes | 4 retweets | 1 replies | 900 views",
            "**Posted:** 10/10/2018 20:19:24",
            "**URL:** https://twitter.com/ferris/status/1790000000000000000",
            "",
            "---",
            "",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn test_records_are_numbered_and_separated() {
        let text = format_results("q", Section::Latest, &[full_tweet(), full_tweet()]);
        assert!(text.contains("## [1] Tweet by @ferris"));
        assert!(text.contains("## [2] Tweet by @ferris"));
        assert_eq!(text.matches("\n---\n").count(), 2);
    }

    #[test]
    fn test_formatting_is_deterministic() {
        let tweets = vec![full_tweet(), tweet(json!({"user": {"username": "a"}}))];
        assert_eq!(
            format_results("q", Section::Latest, &tweets),
            format_results("q", Section::Latest, &tweets)
        );
    }

    #[test]
    fn test_engagement_zero_asymmetry() {
        let t = tweet(json!({
            "user": {"username": "u", "name": "U"},
            "favorite_count": 5,
            "retweet_count": 0,
            "reply_count": 2,
            "quote_count": 0,
            "bookmark_count": 3
        }));
        let text = format_results("q", Section::Latest, &[t]);
        assert_eq!(
            line(&text, "**Engagement:**"),
            "**Engagement:** 5 likes | 0 retweets | 2 replies | 3 bookmarks"
        );
        assert!(!text.contains("quotes"));
    }

    #[test]
    fn test_missing_mandatory_counters_render_undefined() {
        let t = tweet(json!({"user": {"username": "u"}, "reply_count": null}));
        let text = format_results("q", Section::Latest, &[t]);
        assert_eq!(
            line(&text, "**Engagement:**"),
            "**Engagement:** undefined likes | undefined retweets | null replies"
        );
    }

    #[test]
    fn test_single_verified_marker() {
        let both = tweet(json!({
            "user": {"username": "u", "name": "U", "is_blue_verified": true, "is_verified": true}
        }));
        let legacy = tweet(json!({
            "user": {"username": "u", "name": "U", "is_verified": true}
        }));
        for t in [both, legacy] {
            let text = format_results("q", Section::Latest, &[t]);
            assert_eq!(text.matches("[Verified]").count(), 1);
        }
    }

    #[test]
    fn test_account_stats_partial_and_absent() {
        let followers_only = tweet(json!({"user": {"username": "u", "follower_count": 7}}));
        let text = format_results("q", Section::Latest, &[followers_only]);
        assert_eq!(line(&text, "**Account stats:**"), "**Account stats:** 7 followers");

        let none = tweet(json!({"user": {"username": "u"}}));
        let text = format_results("q", Section::Latest, &[none]);
        assert!(!text.contains("Account stats"));
    }

    #[test]
    fn test_posted_date_failure_paths() {
        let unparseable = tweet(json!({"user": {"username": "u"}, "created_at": "not a date"}));
        let text = format_results("q", Section::Latest, &[unparseable]);
        assert_eq!(line(&text, "**Posted:**"), "**Posted:** Date unavailable");

        let wrong_type = tweet(json!({"user": {"username": "u"}, "created_at": {"seconds": 12}}));
        let text = format_results("q", Section::Latest, &[wrong_type]);
        assert_eq!(line(&text, "**Posted:**"), "**Posted:** Date format error");
    }

    #[test]
    fn test_posted_date_falls_back_to_creation_date() {
        let t = tweet(json!({
            "user": {"username": "u"},
            "created_at": null,
            "creation_date": "2024-02-29T12:00:00Z"
        }));
        let text = format_results("q", Section::Latest, &[t]);
        assert_eq!(line(&text, "**Posted:**"), "**Posted:** 29/02/2024 12:00:00");
    }

    #[test]
    fn test_reply_media_and_video() {
        let t = tweet(json!({
            "id_str": "42",
            "user": {"username": "u"},
            "in_reply_to_status_id_str": "41",
            "media": [
                {"media_url_https": "https://pbs.twimg.com/a.jpg", "media_url": "http://pbs.twimg.com/a.jpg"},
                {"media_url": "http://pbs.twimg.com/b.jpg"}
            ],
            "extended_entities": {"media": [{"type": "video"}]}
        }));
        let text = format_results("q", Section::Latest, &[t]);

        assert!(text.contains("**Reply to:** https://twitter.com/status/41"));
        assert!(text.contains(
            "**Media:** 2 attachment(s)\n  - https://pbs.twimg.com/a.jpg\n  - http://pbs.twimg.com/b.jpg"
        ));
        assert!(text.contains("**Video:** Multiple formats available"));
        assert!(text.contains("**URL:** https://twitter.com/u/status/42"));
    }

    #[test]
    fn test_direct_video_url_wins() {
        let t = tweet(json!({
            "user": {"username": "u"},
            "video_url": "https://video.twimg.com/v.mp4"
        }));
        let text = format_results("q", Section::Latest, &[t]);
        assert_eq!(line(&text, "**Video:**"), "**Video:** https://video.twimg.com/v.mp4");

        let variants = tweet(json!({
            "user": {"username": "u"},
            "video_url": [{"url": "https://v/1.mp4"}, {"url": "https://v/2.mp4"}]
        }));
        let text = format_results("q", Section::Latest, &[variants]);
        assert_eq!(
            line(&text, "**Video:**"),
            "**Video:** https://v/1.mp4, https://v/2.mp4"
        );
    }

    #[test]
    fn test_optional_blocks_omitted() {
        let t = tweet(json!({
            "user": {"username": "u"},
            "media": [],
            "extended_entities": {"media": [{"type": "photo"}]},
            "in_reply_to_status_id_str": null
        }));
        let text = format_results("q", Section::Latest, &[t]);
        assert!(!text.contains("**Media:**"));
        assert!(!text.contains("**Video:**"));
        assert!(!text.contains("**Reply to:**"));
    }

    #[test]
    fn test_url_placeholder_when_id_or_user_missing() {
        let no_id = tweet(json!({"user": {"username": "u"}}));
        let no_user = tweet(json!({"tweet_id": "9", "text": "orphan"}));
        for t in [no_id, no_user] {
            let text = format_results("q", Section::Latest, &[t]);
            assert_eq!(
                line(&text, "**URL:**"),
                "**URL:** Unable to construct URL (missing id or username)"
            );
        }
    }

    #[test]
    fn test_record_without_user_is_tolerated() {
        let t = tweet(json!({"tweet_id": "9", "text": "orphan"}));
        let text = format_results("q", Section::Latest, &[t]);
        assert!(text.starts_with("## [1] Tweet by @undefined"));
        assert!(text.contains("**User:** undefined (@undefined)"));
        assert!(text.contains("**Content:** orphan"));
    }
}
