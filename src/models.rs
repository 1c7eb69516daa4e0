use chrono::{DateTime, Utc};

/// A single top-level comment as delivered by the commentThreads endpoint.
/// Immutable once fetched; duplicates are possible and not deduplicated.
#[derive(Debug, Clone)]
pub struct Comment {
    pub author: String,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub like_count: u32,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Final label for a comment. Question takes precedence over sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentCategory {
    Positive,
    Negative,
    Neutral,
    Question,
}

impl CommentCategory {
    pub const ALL: [CommentCategory; 4] = [
        CommentCategory::Positive,
        CommentCategory::Negative,
        CommentCategory::Neutral,
        CommentCategory::Question,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CommentCategory::Positive => "Positive",
            CommentCategory::Negative => "Negative",
            CommentCategory::Neutral => "Neutral",
            CommentCategory::Question => "Questions",
        }
    }
}

impl From<Sentiment> for CommentCategory {
    fn from(sentiment: Sentiment) -> Self {
        match sentiment {
            Sentiment::Positive => CommentCategory::Positive,
            Sentiment::Negative => CommentCategory::Negative,
            Sentiment::Neutral => CommentCategory::Neutral,
        }
    }
}

/// Comments partitioned by category, preserving fetch order within each
/// group. Built once per run and read-only afterwards.
#[derive(Debug, Default)]
pub struct CategorizedComments {
    pub positive: Vec<Comment>,
    pub negative: Vec<Comment>,
    pub neutral: Vec<Comment>,
    pub questions: Vec<Comment>,
}

impl CategorizedComments {
    pub fn push(&mut self, category: CommentCategory, comment: Comment) {
        match category {
            CommentCategory::Positive => self.positive.push(comment),
            CommentCategory::Negative => self.negative.push(comment),
            CommentCategory::Neutral => self.neutral.push(comment),
            CommentCategory::Question => self.questions.push(comment),
        }
    }

    pub fn group(&self, category: CommentCategory) -> &[Comment] {
        match category {
            CommentCategory::Positive => &self.positive,
            CommentCategory::Negative => &self.negative,
            CommentCategory::Neutral => &self.neutral,
            CommentCategory::Question => &self.questions,
        }
    }

    pub fn count(&self, category: CommentCategory) -> usize {
        self.group(category).len()
    }

    pub fn total(&self) -> usize {
        CommentCategory::ALL
            .iter()
            .map(|category| self.count(*category))
            .sum()
    }
}

/// Header metadata for the analyzed video, displayed above the comment
/// tables. Missing upstream fields fall back to defaults.
#[derive(Debug, Clone)]
pub struct VideoSummary {
    pub video_id: String,
    pub title: String,
    pub channel_title: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub published_at: Option<DateTime<Utc>>,
}
