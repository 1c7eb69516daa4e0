use vader_sentiment::SentimentIntensityAnalyzer;

use crate::models::{CategorizedComments, Comment, CommentCategory, Sentiment};

/// Markers that place a comment in the Questions group, checked as
/// case-insensitive substrings. The question check wins over sentiment.
pub const QUESTION_MARKERS: [&str; 6] = ["how", "where", "what", "when", "?", "who"];

/// Compound polarity above this is Positive, below its negation Negative.
/// An exact zero stays Neutral.
pub const NEUTRAL_POLARITY: f64 = 0.0;

/// Maps the lexicon compound score, in [-1, 1], onto the three sentiment
/// buckets.
pub fn classify_sentiment(analyzer: &SentimentIntensityAnalyzer, text: &str) -> Sentiment {
    let scores = analyzer.polarity_scores(text);
    let polarity = scores.get("compound").copied().unwrap_or(0.0);

    if polarity > NEUTRAL_POLARITY {
        Sentiment::Positive
    } else if polarity < NEUTRAL_POLARITY {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

pub fn is_question(text: &str) -> bool {
    let lowered = text.to_lowercase();
    QUESTION_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// Assigns exactly one category per comment. The sentiment pass always runs,
/// even when the marker check then overrides it; a comment that is both
/// negative and question-like lands in Questions.
pub fn categorize_comments(
    analyzer: &SentimentIntensityAnalyzer,
    comments: &[Comment],
) -> CategorizedComments {
    let mut categorized = CategorizedComments::default();

    for comment in comments {
        let sentiment = classify_sentiment(analyzer, &comment.text);

        let category = if is_question(&comment.text) {
            CommentCategory::Question
        } else {
            CommentCategory::from(sentiment)
        };

        categorized.push(category, comment.clone());
    }

    categorized
}
