mod config;

use std::io::{self, Write as _};
use std::path::PathBuf;

use clap::Parser;
use tabled::{Table, Tabled};
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use vader_sentiment::SentimentIntensityAnalyzer;

use tubescope::classify::categorize_comments;
use tubescope::comments::{fetch_comments, DEFAULT_MAX_COMMENTS};
use tubescope::knowledge_graph::render_knowledge_graph;
use tubescope::models::{Comment, CommentCategory, VideoSummary};
use tubescope::pie_chart::render_pie_chart;
use tubescope::utils::extract_video_id;
use tubescope::word_cloud::render_word_cloud;
use tubescope::{initialize_client, ClientError, RenderError, YouTubeClient, YouTubeError};

use crate::config::{AppConfig, ConfigError};

#[derive(Debug, Parser)]
#[command(author, version, about = "YouTube comment sentiment analysis")]
struct Cli {
    /// Video URL; prompted for interactively when omitted
    url: Option<String>,

    /// Maximum number of comments to fetch
    #[arg(long, default_value_t = DEFAULT_MAX_COMMENTS)]
    max_comments: usize,

    /// Directory the three chart images are written into
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Debug, Error)]
enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("client error: {0}")]
    Client(#[from] ClientError),
    #[error("api error: {0}")]
    Api(#[from] YouTubeError),
    #[error("render error: {0}")]
    Render(#[from] RenderError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    let url = match cli.url {
        Some(url) => url,
        None => prompt_url()?,
    };
    let url = url.trim().to_string();

    if url.is_empty() {
        warn!("please enter a YouTube video URL");
        return Ok(());
    }

    let video_id = match extract_video_id(&url) {
        Ok(video_id) => video_id,
        Err(err) => {
            error!(%url, "invalid YouTube URL: {}", err);
            return Ok(());
        }
    };

    let client = initialize_client()?;
    let mut youtube = YouTubeClient::new(config.api_host, client, config.api_key);

    let summary = match youtube.get_video_summary(video_id.clone()).send().await {
        Ok(summary) => summary,
        Err(err) => {
            warn!("could not fetch video metadata: {}", err);
            None
        }
    };

    info!(%video_id, max_comments = cli.max_comments, "fetching comments");
    let comments = fetch_comments(&mut youtube, &video_id, cli.max_comments).await?;
    info!(count = comments.len(), "comments fetched");

    let analyzer = SentimentIntensityAnalyzer::new();
    let categorized = categorize_comments(&analyzer, &comments);

    if let Some(summary) = &summary {
        print_video_header(summary);
    }

    print_comment_table("All Comments", &comments);
    for category in CommentCategory::ALL {
        let heading = match category {
            CommentCategory::Question => "Questions".to_string(),
            other => format!("{} Comments", other.label()),
        };
        print_comment_table(&heading, categorized.group(category));
    }

    let graph = render_knowledge_graph(&categorized, &video_id, &cli.out_dir)?;
    let pie = render_pie_chart(&categorized, &video_id, &cli.out_dir)?;
    let cloud = render_word_cloud(&comments, &video_id, &cli.out_dir)?;

    println!();
    println!("Knowledge graph: {}", graph.display());
    println!("Pie chart:       {}", pie.display());
    println!("Word cloud:      {}", cloud.display());

    Ok(())
}

fn prompt_url() -> io::Result<String> {
    print!("Enter YouTube Video URL: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}

#[derive(Tabled)]
struct CommentRow {
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Published")]
    published: String,
    #[tabled(rename = "Updated")]
    updated: String,
    #[tabled(rename = "Likes")]
    likes: u32,
    #[tabled(rename = "Comment")]
    text: String,
}

impl From<&Comment> for CommentRow {
    fn from(comment: &Comment) -> Self {
        CommentRow {
            author: comment.author.clone(),
            published: comment.published_at.format("%Y-%m-%d %H:%M").to_string(),
            updated: comment.updated_at.format("%Y-%m-%d %H:%M").to_string(),
            likes: comment.like_count,
            text: elide(&comment.text, 96),
        }
    }
}

fn print_video_header(summary: &VideoSummary) {
    println!();
    println!("{} — {}", summary.title, summary.channel_title);
    let published = summary
        .published_at
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    println!(
        "views: {}  likes: {}  comments: {}  published: {}",
        summary.view_count, summary.like_count, summary.comment_count, published
    );
}

fn print_comment_table(heading: &str, comments: &[Comment]) {
    println!();
    println!("== {} ({}) ==", heading, comments.len());
    if comments.is_empty() {
        println!("(none)");
        return;
    }
    let rows: Vec<CommentRow> = comments.iter().map(CommentRow::from).collect();
    println!("{}", Table::new(rows));
}

// Keeps long comment bodies from wrecking the table layout.
fn elide(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut shortened: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    shortened.push_str("...");
    shortened
}
