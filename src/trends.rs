//! YouTube trend discovery.
//!
//! Thin client over the YouTube Data API v3: keyword search (search →
//! details → rank by views) and the `mostPopular` chart, both reshaped into
//! [`TrendingVideo`].

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// YouTube Data API v3 base.
const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// How many results the search endpoint asks for before ranking.
const SEARCH_POOL_SIZE: u32 = 20;
/// How many video IDs get a details lookup.
const DETAIL_LOOKUP_LIMIT: usize = 10;
/// How many ranked videos a search returns.
const SEARCH_RESULT_LIMIT: usize = 5;

/// Errors from trend discovery.
#[derive(Debug, thiserror::Error)]
pub enum TrendsError {
    #[error(
        "YouTube API key not configured. Please add YOUTUBE_API_KEY to your environment variables."
    )]
    MissingApiKey,

    #[error("{context} failed: {status} - {message}")]
    Upstream {
        context: &'static str,
        status: u16,
        message: String,
    },

    #[error("No videos found for this search query. Try a different keyword.")]
    NoSearchResults,

    #[error("No video details found. The videos may be private or unavailable.")]
    NoDetails,

    #[error("No popular videos found. This might be due to regional restrictions or API limits.")]
    NoPopularResults,

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// A trending video, reshaped from YouTube API response fields.
///
/// `shares` is an estimate (YouTube does not expose share counts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingVideo {
    pub id: String,
    pub url: String,
    pub caption: String,
    pub author: String,
    pub thumbnail: String,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub views: u64,
    /// Duration in seconds.
    pub duration: u64,
    pub published_at: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Raw API payloads
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    snippet: Snippet,
    #[serde(default)]
    statistics: Statistics,
    #[serde(default)]
    content_details: ContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    channel_title: String,
    published_at: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

/// YouTube returns counters as decimal strings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    error: ApiErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// Client for the YouTube Data API v3.
#[derive(Debug, Clone)]
pub struct TrendsClient {
    http: reqwest::Client,
    api_key: Option<String>,
    api_base: String,
}

impl TrendsClient {
    /// Create a client. A missing key only fails at call time.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base(api_key, API_BASE)
    }

    /// Create a client against a non-default API base (used by tests).
    #[must_use]
    pub fn with_base(api_key: Option<String>, api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            api_base: api_base.into(),
        }
    }

    fn key(&self) -> Result<&str, TrendsError> {
        self.api_key.as_deref().ok_or(TrendsError::MissingApiKey)
    }

    /// Search for trending videos by keyword.
    ///
    /// Searches by relevance, fetches details for the top candidates, then
    /// ranks by view count and keeps the top five.
    pub async fn search(&self, query: &str) -> Result<Vec<TrendingVideo>, TrendsError> {
        let key = self.key()?;

        tracing::debug!(query = %query, "Searching YouTube");

        let resp = self
            .http
            .get(format!("{}/search", self.api_base))
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("order", "relevance"),
                ("maxResults", &SEARCH_POOL_SIZE.to_string()),
                ("key", key),
            ])
            .send()
            .await?;

        let search: SearchResponse = check_status(resp, "YouTube search").await?;

        let ids: Vec<String> = search
            .items
            .into_iter()
            .take(DETAIL_LOOKUP_LIMIT)
            .filter_map(|item| item.id.video_id)
            .collect();

        if ids.is_empty() {
            return Err(TrendsError::NoSearchResults);
        }

        let resp = self
            .http
            .get(format!("{}/videos", self.api_base))
            .query(&[
                ("part", "snippet,contentDetails,statistics"),
                ("id", &ids.join(",")),
                ("key", key),
            ])
            .send()
            .await?;

        let videos: VideosResponse = check_status(resp, "YouTube videos API").await?;

        if videos.items.is_empty() {
            return Err(TrendsError::NoDetails);
        }

        Ok(rank_by_views(videos.items, SEARCH_RESULT_LIMIT))
    }

    /// Fetch the `mostPopular` chart for a category and region.
    pub async fn popular(
        &self,
        category_id: &str,
        region_code: &str,
        max_results: u32,
    ) -> Result<Vec<TrendingVideo>, TrendsError> {
        let key = self.key()?;

        tracing::debug!(
            category_id = %category_id,
            region_code = %region_code,
            max_results = max_results,
            "Fetching popular YouTube videos"
        );

        let resp = self
            .http
            .get(format!("{}/videos", self.api_base))
            .query(&[
                ("part", "snippet,contentDetails,statistics"),
                ("chart", "mostPopular"),
                ("videoCategoryId", category_id),
                ("maxResults", &max_results.to_string()),
                ("regionCode", region_code),
                ("key", key),
            ])
            .send()
            .await?;

        let videos: VideosResponse = check_status(resp, "YouTube API").await?;

        if videos.items.is_empty() {
            return Err(TrendsError::NoPopularResults);
        }

        Ok(videos.items.into_iter().map(reshape).collect())
    }
}

/// Read an upstream error body into a typed error.
async fn check_status<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
    context: &'static str,
) -> Result<T, TrendsError> {
    let status = resp.status();
    if !status.is_success() {
        let detail: ApiError = resp.json().await.unwrap_or_else(|_| ApiError {
            error: ApiErrorBody::default(),
        });
        return Err(TrendsError::Upstream {
            context,
            status: status.as_u16(),
            message: detail
                .error
                .message
                .unwrap_or_else(|| "Unknown error".to_string()),
        });
    }
    Ok(resp.json().await?)
}

/// Reshape an API item into the service model.
fn reshape(video: VideoItem) -> TrendingVideo {
    let likes = parse_count(video.statistics.like_count.as_deref());

    TrendingVideo {
        url: format!("https://www.youtube.com/watch?v={}", video.id),
        id: video.id,
        caption: video.snippet.title,
        author: video.snippet.channel_title,
        thumbnail: video
            .snippet
            .thumbnails
            .high
            .map(|t| t.url)
            .unwrap_or_default(),
        likes,
        comments: parse_count(video.statistics.comment_count.as_deref()),
        // YouTube does not expose shares; estimate from likes.
        shares: likes / 10,
        views: parse_count(video.statistics.view_count.as_deref()),
        duration: parse_duration(video.content_details.duration.as_deref().unwrap_or_default()),
        published_at: video.snippet.published_at,
    }
}

/// Sort by view count descending, keep the top `limit`.
fn rank_by_views(items: Vec<VideoItem>, limit: usize) -> Vec<TrendingVideo> {
    let mut videos: Vec<TrendingVideo> = items.into_iter().map(reshape).collect();
    videos.sort_by(|a, b| b.views.cmp(&a.views));
    videos.truncate(limit);
    videos
}

fn parse_count(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.parse().ok()).unwrap_or(0)
}

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").expect("valid duration pattern")
});

/// Parse an ISO-8601 duration (`PT4M13S`) to seconds. Malformed input is `0`.
#[must_use]
pub fn parse_duration(duration: &str) -> u64 {
    let Some(caps) = DURATION_RE.captures(duration) else {
        return 0;
    };

    let field = |i: usize| {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };

    field(1) * 3600 + field(2) * 60 + field(3)
}
