use std::error::Error;

use hyper::body::Bytes;
use hyper::StatusCode;
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use http_body_util::Empty;
use native_tls::TlsConnector;
use thiserror::Error;

#[cfg(test)]
mod tests;

pub mod models;
pub mod utils;
pub mod comments;
pub use comments::{fetch_comments, CommentPage, CommentSource, ListCommentThreadsRequest};
pub mod videos;
pub use videos::GetVideoSummaryRequest;
pub mod classify;
pub use classify::{categorize_comments, classify_sentiment, QUESTION_MARKERS};
pub mod knowledge_graph;
pub mod pie_chart;
pub mod word_cloud;

pub type HttpsClient = Client<HttpsConnector<HttpConnector>, Empty<Bytes>>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("TLS error: {0}")]
    TlsError(#[from] native_tls::Error),
}

pub fn initialize_client() -> Result<HttpsClient, ClientError> {
    let mut http = HttpConnector::new();
    http.enforce_http(false);

    let tls = TlsConnector::builder().build()?;
    let https = HttpsConnector::from((http, tls.into()));

    let client = Client::builder(TokioExecutor::new())
        .build::<_, Empty<Bytes>>(https);

    Ok(client)
}

pub struct GoogleAPIRequestFields<'a> {
    pub key: Option<&'a str>,
    pub referrer: Option<&'a str>,
}

pub trait GoogleAPIRequest<'a> {
    fn key(&mut self) -> &mut Option<&'a str>;

    fn referrer(&mut self) -> &mut Option<&'a str>;

    fn with_key(mut self, key: &'a str) -> Self
    where
        Self: Sized,
    {
        *self.key() = Some(key);
        self
    }

    fn with_referrer(mut self, referrer: &'a str) -> Self
    where
        Self: Sized,
    {
        *self.referrer() = Some(referrer);
        self
    }
}

impl<'a, T> GoogleAPIRequest<'a> for T
where
    T: AsMut<GoogleAPIRequestFields<'a>>,
{
    fn key(&mut self) -> &mut Option<&'a str> {
        &mut self.as_mut().key
    }

    fn referrer(&mut self) -> &mut Option<&'a str> {
        &mut self.as_mut().referrer
    }
}

#[derive(Error, Debug)]
pub enum YouTubeError {
    #[error("Not found")]
    NotFound,
    #[error("Comments are disabled for this video")]
    CommentsDisabled,
    #[error("Ratelimited")]
    Ratelimited,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden")]
    Forbidden,
    #[error("Internal server error")]
    InternalServerError,
    #[error("Unknown status code {0}")]
    UnknownStatusCode(StatusCode),
    #[error("HTTP error: {0}")]
    HttpError(#[from] hyper::Error),
    #[error("Legacy HTTP error: {0}")]
    LegacyHttpError(#[from] hyper_util::client::legacy::Error),
    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    #[error("Other error: {0}")]
    Other(Box<dyn Error + Send + Sync>),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Chart backend error: {0}")]
    Backend(String),
}

// Plotters error types are generic over the backend; the renderers flatten
// them into RenderError at the call site.
pub(crate) fn to_render_error<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Backend(err.to_string())
}

/// Handle to the YouTube Data API v3. Constructed once at startup and passed
/// into the fetch layer explicitly; the credential travels with it.
pub struct YouTubeClient {
    client: HttpsClient,
    host: String,
    api_key: String,
    referrer: Option<String>,
}

impl YouTubeClient {
    pub fn new(host: impl Into<String>, client: HttpsClient, api_key: impl Into<String>) -> Self {
        YouTubeClient {
            client,
            host: host.into(),
            api_key: api_key.into(),
            referrer: None,
        }
    }

    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    pub fn list_comment_threads<'a>(
        &'a mut self,
        video_id: String,
        page_size: u32,
        page_token: Option<String>,
    ) -> ListCommentThreadsRequest<'a> {
        ListCommentThreadsRequest {
            client: &mut self.client,
            host: &self.host,
            fields: GoogleAPIRequestFields {
                key: Some(&self.api_key),
                referrer: self.referrer.as_deref(),
            },
            video_id,
            page_size,
            page_token,
        }
    }

    pub fn get_video_summary<'a>(&'a mut self, video_id: String) -> GetVideoSummaryRequest<'a> {
        GetVideoSummaryRequest {
            client: &mut self.client,
            host: &self.host,
            fields: GoogleAPIRequestFields {
                key: Some(&self.api_key),
                referrer: self.referrer.as_deref(),
            },
            video_id,
        }
    }
}
