use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::Utc;
use vader_sentiment::SentimentIntensityAnalyzer;

use crate::classify::{categorize_comments, classify_sentiment, is_question};
use crate::comments::{fetch_comments, CommentPage, CommentSource};
use crate::knowledge_graph::{render_knowledge_graph, spring_layout};
use crate::models::{Comment, CommentCategory, Sentiment};
use crate::pie_chart::render_pie_chart;
use crate::utils::{extract_video_id, UrlError};
use crate::word_cloud::{render_word_cloud, word_frequencies};
use crate::{initialize_client, GoogleAPIRequest, YouTubeClient, YouTubeError};

fn comment(text: &str) -> Comment {
    let now = Utc::now();
    Comment {
        author: "someone".to_string(),
        published_at: now,
        updated_at: now,
        like_count: 0,
        text: text.to_string(),
    }
}

fn comments(count: usize) -> Vec<Comment> {
    (0..count)
        .map(|index| comment(&format!("comment number {}", index)))
        .collect()
}

// --- URL parser ---

#[test]
fn extract_from_short_url() {
    assert_eq!(
        extract_video_id("https://youtu.be/abc123").unwrap(),
        "abc123"
    );
}

#[test]
fn extract_from_watch_url_with_extra_params() {
    assert_eq!(
        extract_video_id("https://www.youtube.com/watch?v=abc123&t=5s").unwrap(),
        "abc123"
    );
}

#[test]
fn extract_from_embed_url_without_www() {
    assert_eq!(
        extract_video_id("https://youtube.com/embed/abc123").unwrap(),
        "abc123"
    );
}

#[test]
fn extract_from_embed_url_ignores_trailing_segments() {
    assert_eq!(
        extract_video_id("https://www.youtube.com/embed/abc123/extra").unwrap(),
        "abc123"
    );
}

#[test]
fn extract_from_v_url() {
    assert_eq!(
        extract_video_id("https://www.youtube.com/v/abc123").unwrap(),
        "abc123"
    );
}

#[test]
fn extract_rejects_other_hosts() {
    assert!(matches!(
        extract_video_id("https://example.com/abc123"),
        Err(UrlError::Unrecognized(_))
    ));
}

#[test]
fn extract_rejects_watch_without_v_param() {
    assert_eq!(
        extract_video_id("https://www.youtube.com/watch?t=5s"),
        Err(UrlError::MissingVideoParam)
    );
}

#[test]
fn extract_rejects_unknown_youtube_paths() {
    assert!(extract_video_id("https://youtube.com/playlist?list=xyz").is_err());
}

#[test]
fn extract_rejects_non_urls() {
    assert!(extract_video_id("definitely not a url").is_err());
}

// --- Sentiment classifier ---

#[test]
fn positive_polarity_is_positive() {
    let analyzer = SentimentIntensityAnalyzer::new();
    assert_eq!(
        classify_sentiment(&analyzer, "I love this!"),
        Sentiment::Positive
    );
}

#[test]
fn negative_polarity_is_negative() {
    let analyzer = SentimentIntensityAnalyzer::new();
    assert_eq!(
        classify_sentiment(&analyzer, "I hate this."),
        Sentiment::Negative
    );
}

#[test]
fn zero_polarity_is_neutral() {
    let analyzer = SentimentIntensityAnalyzer::new();
    assert_eq!(
        classify_sentiment(&analyzer, "The video was uploaded yesterday."),
        Sentiment::Neutral
    );
}

#[test]
fn marker_detection_is_case_insensitive() {
    assert!(is_question("WHAT is going on"));
    assert!(is_question("Tell me more?"));
    assert!(!is_question("I love this!"));
}

// --- Categorizer ---

#[test]
fn negative_question_lands_in_questions() {
    let analyzer = SentimentIntensityAnalyzer::new();
    let categorized =
        categorize_comments(&analyzer, &[comment("This is terrible, what happened?")]);
    assert_eq!(categorized.count(CommentCategory::Question), 1);
    assert_eq!(categorized.count(CommentCategory::Negative), 0);
}

#[test]
fn neutral_text_with_marker_lands_in_questions() {
    let analyzer = SentimentIntensityAnalyzer::new();
    let categorized = categorize_comments(&analyzer, &[comment("It is what it is.")]);
    assert_eq!(categorized.count(CommentCategory::Question), 1);
    assert_eq!(categorized.count(CommentCategory::Neutral), 0);
}

#[test]
fn positive_text_without_marker_lands_in_positive() {
    let analyzer = SentimentIntensityAnalyzer::new();
    let categorized = categorize_comments(&analyzer, &[comment("I love this!")]);
    assert_eq!(categorized.count(CommentCategory::Positive), 1);
}

#[test]
fn every_comment_lands_in_exactly_one_group() {
    let analyzer = SentimentIntensityAnalyzer::new();
    let input = vec![
        comment("I love this!"),
        comment("I hate this."),
        comment("The video was uploaded yesterday."),
        comment("This is terrible, what happened?"),
        comment("It is what it is."),
        comment("Great editing, truly great."),
    ];
    let categorized = categorize_comments(&analyzer, &input);

    let group_sum: usize = CommentCategory::ALL
        .iter()
        .map(|category| categorized.count(*category))
        .sum();
    assert_eq!(group_sum, input.len());
    assert_eq!(categorized.total(), input.len());

    for original in &input {
        let occurrences: usize = CommentCategory::ALL
            .iter()
            .map(|category| {
                categorized
                    .group(*category)
                    .iter()
                    .filter(|c| c.text == original.text)
                    .count()
            })
            .sum();
        assert_eq!(occurrences, 1, "comment {:?} not in exactly one group", original.text);
    }
}

#[test]
fn fetch_order_is_preserved_within_groups() {
    let analyzer = SentimentIntensityAnalyzer::new();
    let input = vec![
        comment("I love this!"),
        comment("The video was uploaded yesterday."),
        comment("Absolutely wonderful editing."),
    ];
    let categorized = categorize_comments(&analyzer, &input);

    let positive = categorized.group(CommentCategory::Positive);
    assert_eq!(positive.len(), 2);
    assert_eq!(positive[0].text, "I love this!");
    assert_eq!(positive[1].text, "Absolutely wonderful editing.");
}

#[test]
fn request_builder_carries_and_overrides_credentials() {
    let client = initialize_client().unwrap();
    let mut youtube = YouTubeClient::new("youtube.googleapis.com", client, "configured-key")
        .with_referrer("https://example.com");

    let request = youtube
        .list_comment_threads("abc123".to_string(), 100, None)
        .with_key("override-key");

    assert_eq!(request.fields.key, Some("override-key"));
    assert_eq!(request.fields.referrer, Some("https://example.com"));
    assert_eq!(request.page_size, 100);
}

// --- Fetcher ---

struct ScriptedSource {
    pages: VecDeque<CommentPage>,
    requested_sizes: Vec<u32>,
    requested_tokens: Vec<Option<String>>,
}

impl ScriptedSource {
    fn new(pages: Vec<CommentPage>) -> Self {
        ScriptedSource {
            pages: pages.into(),
            requested_sizes: Vec::new(),
            requested_tokens: Vec::new(),
        }
    }
}

#[async_trait]
impl CommentSource for ScriptedSource {
    async fn comment_page(
        &mut self,
        _video_id: &str,
        page_size: u32,
        page_token: Option<String>,
    ) -> Result<CommentPage, YouTubeError> {
        self.requested_sizes.push(page_size);
        self.requested_tokens.push(page_token);
        self.pages.pop_front().ok_or(YouTubeError::NotFound)
    }
}

#[tokio::test]
async fn fetch_requests_only_the_remaining_deficit() {
    let mut source = ScriptedSource::new(vec![
        CommentPage {
            next_page_token: Some("page-2".to_string()),
            comments: comments(100),
        },
        CommentPage {
            next_page_token: Some("page-3".to_string()),
            comments: comments(50),
        },
    ]);

    let fetched = fetch_comments(&mut source, "abc123", 150).await.unwrap();

    assert_eq!(fetched.len(), 150);
    assert_eq!(source.requested_sizes, vec![100, 50]);
    assert_eq!(
        source.requested_tokens,
        vec![None, Some("page-2".to_string())]
    );
}

#[tokio::test]
async fn fetch_stops_when_the_source_runs_dry() {
    let mut source = ScriptedSource::new(vec![CommentPage {
        next_page_token: None,
        comments: comments(30),
    }]);

    let fetched = fetch_comments(&mut source, "abc123", 150).await.unwrap();

    assert_eq!(fetched.len(), 30);
    assert_eq!(source.requested_sizes, vec![100]);
}

#[tokio::test]
async fn fetch_truncates_an_overfull_final_page() {
    let mut source = ScriptedSource::new(vec![
        CommentPage {
            next_page_token: Some("page-2".to_string()),
            comments: comments(100),
        },
        CommentPage {
            next_page_token: Some("page-3".to_string()),
            comments: comments(100),
        },
    ]);

    let fetched = fetch_comments(&mut source, "abc123", 150).await.unwrap();

    assert_eq!(fetched.len(), 150);
    assert_eq!(source.requested_sizes, vec![100, 50]);
}

#[tokio::test]
async fn fetch_propagates_source_errors() {
    let mut source = ScriptedSource::new(Vec::new());
    let result = fetch_comments(&mut source, "abc123", 150).await;
    assert!(matches!(result, Err(YouTubeError::NotFound)));
}

// --- Renderers ---

#[test]
fn renderers_write_the_documented_filenames_and_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let analyzer = SentimentIntensityAnalyzer::new();
    let input = vec![
        comment("I love this!"),
        comment("I hate this."),
        comment("What is the song called?"),
        comment("The video was uploaded yesterday."),
    ];
    let categorized = categorize_comments(&analyzer, &input);

    let graph = render_knowledge_graph(&categorized, "abc123", dir.path()).unwrap();
    let pie = render_pie_chart(&categorized, "abc123", dir.path()).unwrap();
    let cloud = render_word_cloud(&input, "abc123", dir.path()).unwrap();

    assert_eq!(graph.file_name().unwrap(), "abc123_knowledge_graph.png");
    assert_eq!(pie.file_name().unwrap(), "abc123_Pie_chart.png");
    assert_eq!(cloud.file_name().unwrap(), "abc123_Word_Cloud.png");
    for path in [&graph, &pie, &cloud] {
        assert!(path.exists());
    }

    // Re-running with the same identifier replaces the same files.
    render_knowledge_graph(&categorized, "abc123", dir.path()).unwrap();
    render_pie_chart(&categorized, "abc123", dir.path()).unwrap();
    render_word_cloud(&input, "abc123", dir.path()).unwrap();
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
}

#[test]
fn renderers_handle_an_empty_run() {
    let dir = tempfile::tempdir().unwrap();
    let analyzer = SentimentIntensityAnalyzer::new();
    let categorized = categorize_comments(&analyzer, &[]);

    assert!(render_pie_chart(&categorized, "empty", dir.path()).is_ok());
    assert!(render_knowledge_graph(&categorized, "empty", dir.path()).is_ok());
    assert!(render_word_cloud(&[], "empty", dir.path()).is_ok());
}

#[test]
fn word_frequencies_are_counted_case_insensitively() {
    let frequencies = word_frequencies("Great video! great Video indeed");
    assert_eq!(
        frequencies,
        vec![
            ("great".to_string(), 2),
            ("video".to_string(), 2),
            ("indeed".to_string(), 1),
        ]
    );
}

#[test]
fn word_frequencies_drop_stopwords_and_single_letters() {
    let frequencies = word_frequencies("the cat and a b cat");
    assert_eq!(frequencies, vec![("cat".to_string(), 2)]);
}

#[test]
fn spring_layout_normalizes_positions() {
    let edges: Vec<(usize, usize)> = (1..6).map(|leaf| (0, leaf)).collect();
    let layout = spring_layout(6, &edges, 1.3, 60);

    assert_eq!(layout.len(), 6);
    for (x, y) in layout {
        assert!(x.is_finite() && y.is_finite());
        assert!((-1.0..=1.0).contains(&x));
        assert!((-1.0..=1.0).contains(&y));
    }
}
