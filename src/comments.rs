use async_trait::async_trait;
use chrono::{DateTime, Utc};
use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper::{Method, Request, StatusCode};
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::Comment;
use crate::{GoogleAPIRequestFields, YouTubeClient, YouTubeError};

/// Upstream page size cap for the commentThreads endpoint.
pub const PAGE_SIZE: usize = 100;

/// Default ceiling on the number of comments fetched per run.
pub const DEFAULT_MAX_COMMENTS: usize = 500;

pub struct ListCommentThreadsRequest<'a> {
    pub client: &'a mut Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
    pub host: &'a str,
    pub fields: GoogleAPIRequestFields<'a>,
    pub video_id: String,
    pub page_size: u32,
    pub page_token: Option<String>,
}

impl<'a> AsMut<GoogleAPIRequestFields<'a>> for ListCommentThreadsRequest<'a> {
    fn as_mut(&mut self) -> &mut GoogleAPIRequestFields<'a> {
        &mut self.fields
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
    items: Vec<ThreadItem>,
}

#[derive(Debug, Deserialize)]
struct ThreadItem {
    snippet: ThreadSnippet,
}

#[derive(Debug, Deserialize)]
struct ThreadSnippet {
    #[serde(rename = "topLevelComment")]
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
struct CommentSnippet {
    #[serde(rename = "authorDisplayName")]
    author_display_name: String,
    #[serde(rename = "textDisplay")]
    text_display: String,
    #[serde(rename = "likeCount")]
    like_count: u32,
    #[serde(rename = "publishedAt")]
    published_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// One page of comments plus the continuation token, if any.
#[derive(Debug)]
pub struct CommentPage {
    pub next_page_token: Option<String>,
    pub comments: Vec<Comment>,
}

impl<'a> ListCommentThreadsRequest<'a> {
    pub async fn send(self) -> Result<CommentPage, YouTubeError> {
        let mut url = format!(
            "https://{}/youtube/v3/commentThreads?part=snippet&textFormat=plainText&videoId={}&maxResults={}",
            self.host, self.video_id, self.page_size
        );

        if let Some(page_token) = self.page_token {
            url = format!("{}&pageToken={}", url, page_token);
        }

        let mut request_builder = Request::builder()
            .method(Method::GET)
            .uri(url)
            .header(
                "X-Goog-Fieldmask",
                "nextPageToken,items.snippet.topLevelComment.snippet(authorDisplayName,textDisplay,likeCount,publishedAt,updatedAt)",
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
            StatusCode::TOO_MANY_REQUESTS => return Err(YouTubeError::Ratelimited),
            StatusCode::FORBIDDEN => {
                let body_bytes = resp.into_body().collect().await?.to_bytes();
                match serde_json::from_slice::<ErrorResponse>(&body_bytes) {
                    Ok(error_response) => {
                        match error_response.error.message.as_str() {
                            msg if msg.contains("has disabled comments") => {
                                return Err(YouTubeError::CommentsDisabled)
                            }
                            msg if msg.starts_with("The request cannot be completed because you have exceeded your") => {
                                return Err(YouTubeError::Ratelimited)
                            }
                            msg => {
                                warn!(body = msg, "unknown forbidden error message");
                                return Err(YouTubeError::Forbidden);
                            }
                        }
                    }
                    Err(_) => return Err(YouTubeError::Forbidden),
                }
            }
            StatusCode::NOT_FOUND => return Err(YouTubeError::NotFound),
            StatusCode::UNAUTHORIZED => return Err(YouTubeError::Unauthorized),
            StatusCode::INTERNAL_SERVER_ERROR | StatusCode::SERVICE_UNAVAILABLE => {
                return Err(YouTubeError::InternalServerError)
            }
            StatusCode::OK => (),
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

        let comments = api_response
            .items
            .into_iter()
            .map(|item| {
                let snippet = item.snippet.top_level_comment.snippet;
                Comment {
                    author: snippet.author_display_name,
                    published_at: snippet.published_at,
                    updated_at: snippet.updated_at,
                    like_count: snippet.like_count,
                    text: snippet.text_display,
                }
            })
            .collect();

        Ok(CommentPage {
            next_page_token: api_response.next_page_token,
            comments,
        })
    }
}

/// Paginated source of comments for a video. The production implementation
/// is [`YouTubeClient`]; tests substitute a scripted source.
#[async_trait]
pub trait CommentSource {
    async fn comment_page(
        &mut self,
        video_id: &str,
        page_size: u32,
        page_token: Option<String>,
    ) -> Result<CommentPage, YouTubeError>;
}

#[async_trait]
impl CommentSource for YouTubeClient {
    async fn comment_page(
        &mut self,
        video_id: &str,
        page_size: u32,
        page_token: Option<String>,
    ) -> Result<CommentPage, YouTubeError> {
        self.list_comment_threads(video_id.to_string(), page_size, page_token)
            .send()
            .await
    }
}

/// Fetches up to `max_results` comments for `video_id`, oldest-requested
/// first as delivered by the source. Pages are requested one at a time and
/// never larger than the remaining deficit; the loop stops when the source
/// runs out of continuation tokens. Any source error aborts the whole fetch.
pub async fn fetch_comments<S: CommentSource>(
    source: &mut S,
    video_id: &str,
    max_results: usize,
) -> Result<Vec<Comment>, YouTubeError> {
    let mut all_comments = Vec::new();
    let mut page_token = None;

    while all_comments.len() < max_results {
        let page_size = PAGE_SIZE.min(max_results - all_comments.len()) as u32;
        let page = source
            .comment_page(video_id, page_size, page_token.take())
            .await?;
        all_comments.extend(page.comments);
        debug!(fetched = all_comments.len(), "fetched comment page");

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    all_comments.truncate(max_results);
    Ok(all_comments)
}
