use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::{AppError, AppResult},
    models::{DayAnalysis, Recommendation, WatchHistoryEntry},
    services::llm::LlmClient,
};

/// Number of movies the prompt asks for
pub const RECOMMENDATION_COUNT: usize = 5;

/// Start of a numbered block: `1.` at the beginning of a line, possibly bolded
static ORDINAL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*[*_]{0,2}\d+\.[ \t]*").expect("ordinal regex should compile")
});

/// One block's `Title / Year / Reason` fields, emphasis markers allowed around labels
static BLOCK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)\A[*_]*\s*Title[*_]*\s*:[*_]*\s*(?P<title>.+?)\s+[*_]*\s*Year[*_]*\s*:[*_]*\s*[*_]*(?P<year>\d{4})[*_]*\s+[*_]*\s*Reason[*_]*\s*:[*_]*\s*(?P<reason>.+)\z",
    )
    .expect("recommendation block regex should compile")
});

fn format_history(history: &[WatchHistoryEntry]) -> String {
    if history.is_empty() {
        return "None".to_string();
    }
    history
        .iter()
        .map(|entry| entry.movie.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds the recommendation prompt from an analysis and the watch history
pub fn build_recommendation_prompt(
    analysis: &DayAnalysis,
    history: &[WatchHistoryEntry],
) -> AppResult<String> {
    let analysis_json = serde_json::to_string_pretty(analysis)
        .map_err(|e| AppError::Internal(format!("Failed to serialize analysis: {}", e)))?;

    Ok(format!(
        r#"Using the analysis of someone's day below, recommend {count} movies for them to watch tonight.
Take their mood, activities, interests, energy level and emotional needs into account.
Do not recommend anything from their watch history.

Analysis:
{analysis}

Watch History:
{history}

For each movie give the title, the year of release, and a reason of at least 3 sentences
explaining why it suits the day they had.

Use exactly this format:
1. **Title:** [Movie Title]
   **Year:** [Year]
   **Reason:** [Detailed explanation]

2. **Title:** [Movie Title]
   **Year:** [Year]
   **Reason:** [Detailed explanation]

Continue the same way for all {count} recommendations.
"#,
        count = RECOMMENDATION_COUNT,
        analysis = analysis_json,
        history = format_history(history),
    ))
}

fn strip_emphasis(value: &str) -> &str {
    value
        .trim()
        .trim_matches(|c: char| c == '*' || c == '_')
        .trim()
}

fn parse_block(block: &str) -> Option<Recommendation> {
    let caps = BLOCK_PATTERN.captures(block.trim())?;

    let title = strip_emphasis(&caps["title"]);
    let reason = strip_emphasis(&caps["reason"]);

    if title.is_empty() || reason.is_empty() {
        return None;
    }

    Some(Recommendation::new(title, &caps["year"], reason))
}

/// Extracts every well-formed numbered block, in order of appearance
///
/// Text before the first ordinal is ignored, and blocks missing a title, a
/// four-digit year or a reason are skipped.
pub fn parse_recommendations(text: &str) -> Vec<Recommendation> {
    let starts: Vec<(usize, usize)> = ORDINAL_PATTERN
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect();

    starts
        .iter()
        .enumerate()
        .filter_map(|(i, &(_, body_start))| {
            let body_end = starts.get(i + 1).map_or(text.len(), |&(next, _)| next);
            parse_block(&text[body_start..body_end])
        })
        .collect()
}

/// Asks the LLM for movies suited to the analyzed day
///
/// All or nothing: a response with no readable block is a parse error carrying
/// the raw text, never an empty list.
pub async fn get_recommendations(
    llm: &dyn LlmClient,
    analysis: &DayAnalysis,
    history: &[WatchHistoryEntry],
) -> AppResult<Vec<Recommendation>> {
    let prompt = build_recommendation_prompt(analysis, history)?;
    let response = llm.complete(&prompt).await?;

    let recommendations = parse_recommendations(&response);
    if recommendations.is_empty() {
        tracing::warn!(response = %response, "No recommendations found in the response");
        return Err(AppError::parse(
            "No recommendations found in the response",
            response,
        ));
    }

    tracing::info!(
        count = recommendations.len(),
        history = history.len(),
        llm = llm.name(),
        "Recommendations generated"
    );

    Ok(recommendations)
}
