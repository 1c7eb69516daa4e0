use thiserror::Error;
use url::Url;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum UrlError {
    #[error("unrecognized video URL: {0}")]
    Unrecognized(String),
    #[error("watch URL is missing the v parameter")]
    MissingVideoParam,
}

/// Extracts the video identifier from any of the known YouTube URL shapes:
/// `youtu.be/<id>`, `youtube.com/watch?v=<id>`, `youtube.com/embed/<id>`
/// and `youtube.com/v/<id>` (with or without the `www` prefix).
pub fn extract_video_id(input: &str) -> Result<String, UrlError> {
    let parsed = Url::parse(input).map_err(|_| UrlError::Unrecognized(input.to_string()))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| UrlError::Unrecognized(input.to_string()))?;

    if host == "youtu.be" {
        return Ok(parsed.path().trim_start_matches('/').to_string());
    }

    if host == "youtube.com" || host == "www.youtube.com" {
        let path = parsed.path();
        if path == "/watch" {
            return parsed
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned())
                .ok_or(UrlError::MissingVideoParam);
        }
        if let Some(rest) = path.strip_prefix("/embed/") {
            return Ok(first_segment(rest));
        }
        if let Some(rest) = path.strip_prefix("/v/") {
            return Ok(first_segment(rest));
        }
    }

    Err(UrlError::Unrecognized(input.to_string()))
}

fn first_segment(path: &str) -> String {
    path.split('/').next().unwrap_or_default().to_string()
}
