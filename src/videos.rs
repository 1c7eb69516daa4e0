use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper::{Method, Request, StatusCode};
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

use crate::models::VideoSummary;
use crate::{GoogleAPIRequestFields, YouTubeError};

pub struct GetVideoSummaryRequest<'a> {
    pub client: &'a mut Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
    pub host: &'a str,
    pub fields: GoogleAPIRequestFields<'a>,
    pub video_id: String,
}

impl<'a> AsMut<GoogleAPIRequestFields<'a>> for GetVideoSummaryRequest<'a> {
    fn as_mut(&mut self) -> &mut GoogleAPIRequestFields<'a> {
        &mut self.fields
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    items: Option<Vec<ApiVideo>>,
}

#[derive(Debug, Deserialize)]
struct ApiVideo {
    id: String,
    snippet: Option<VideoSnippet>,
    statistics: Option<VideoStatistics>,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    #[serde(rename = "publishedAt")]
    published_at: Option<DateTime<Utc>>,
    title: Option<String>,
    #[serde(rename = "channelTitle")]
    channel_title: Option<String>,
}

// Statistics arrive as decimal strings, not numbers.
#[derive(Debug, Deserialize)]
struct VideoStatistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
    #[serde(rename = "likeCount")]
    like_count: Option<String>,
    #[serde(rename = "commentCount")]
    comment_count: Option<String>,
}

impl<'a> GetVideoSummaryRequest<'a> {
    /// Fetches title and counters for the analyzed video. Returns `None`
    /// when the video is missing or hidden rather than failing the run.
    pub async fn send(self) -> Result<Option<VideoSummary>, YouTubeError> {
        let url = format!(
            "https://{}/youtube/v3/videos?part=snippet,statistics&id={}",
            self.host, self.video_id
        );

        let mut request_builder = Request::builder()
            .method(Method::GET)
            .uri(url)
            .header(
                "X-Goog-Fieldmask",
                "items(id,snippet(publishedAt,title,channelTitle),statistics(viewCount,likeCount,commentCount))",
            );

        if let Some(key) = self.fields.key {
            request_builder = request_builder.header("X-Goog-Api-Key", key);
        }

        if let Some(referrer) = self.fields.referrer {
            if !referrer.is_empty() {
                request_builder = request_builder.header("Referer", referrer);
            }
        }

        let req = request_builder
            .body(Empty::new())
            .map_err(|e| YouTubeError::Other(Box::new(e)))?;

        let resp = self.client.request(req).await?;

        match resp.status() {
            StatusCode::OK => (),
            StatusCode::TOO_MANY_REQUESTS => return Err(YouTubeError::Ratelimited),
            StatusCode::FORBIDDEN => return Err(YouTubeError::Forbidden),
            StatusCode::NOT_FOUND => return Err(YouTubeError::NotFound),
            StatusCode::UNAUTHORIZED => return Err(YouTubeError::Unauthorized),
            StatusCode::INTERNAL_SERVER_ERROR | StatusCode::SERVICE_UNAVAILABLE => {
                return Err(YouTubeError::InternalServerError)
            }
            status => {
                let body_bytes = resp.into_body().collect().await?.to_bytes();
                warn!(
                    status = status.as_u16(),
                    body = %String::from_utf8_lossy(&body_bytes),
                    "unknown status code"
                );
                return Err(YouTubeError::UnknownStatusCode(status));
            }
        };

        let body_bytes = resp.into_body().collect().await?.to_bytes();
        let api_response: ApiResponse = serde_json::from_slice(&body_bytes)?;

        let api_video = match api_response
            .items
            .and_then(|items| items.into_iter().find(|v| v.id == self.video_id))
        {
            Some(video) => video,
            None => return Ok(None),
        };

        let parse_count =
            |s: Option<&String>| -> u64 { s.and_then(|s| s.parse::<u64>().ok()).unwrap_or(0) };

        let statistics = api_video.statistics.as_ref();
        let view_count = parse_count(statistics.and_then(|s| s.view_count.as_ref()));
        let like_count = parse_count(statistics.and_then(|s| s.like_count.as_ref()));
        let comment_count = parse_count(statistics.and_then(|s| s.comment_count.as_ref()));

        let snippet = api_video.snippet;
        Ok(Some(VideoSummary {
            video_id: api_video.id,
            title: snippet
                .as_ref()
                .and_then(|s| s.title.clone())
                .unwrap_or_default(),
            channel_title: snippet
                .as_ref()
                .and_then(|s| s.channel_title.clone())
                .unwrap_or_default(),
            view_count,
            like_count,
            comment_count,
            published_at: snippet.as_ref().and_then(|s| s.published_at),
        }))
    }
}
