use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::{AppError, AppResult},
    models::{AnalysisWarning, DayAnalysis},
    services::llm::LlmClient,
};

/// Tail shared by every bracketed field: `: [a, b, c]` on one line
const LIST_SUFFIX: &str = r#"[*_"' \t]*:[*_ \t]*\[([^\]\n]*)\]"#;

fn list_pattern(label: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b{}{}", label, LIST_SUFFIX))
        .expect("analysis field regex should compile")
}

static MOOD_PATTERN: Lazy<Regex> = Lazy::new(|| list_pattern("moods?"));
static ACTIVITIES_PATTERN: Lazy<Regex> = Lazy::new(|| list_pattern("activit(?:y|ies)"));
static INTERESTS_PATTERN: Lazy<Regex> = Lazy::new(|| list_pattern("interests?"));
static ENERGY_PATTERN: Lazy<Regex> = Lazy::new(|| list_pattern("energy[ _]?levels?"));
static NEEDS_PATTERN: Lazy<Regex> = Lazy::new(|| list_pattern("emotional[ _]?needs?"));
static ENERGY_BARE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\benergy[ _]?levels?[*_"' \t]*:[*_ \t]*["']?([A-Za-z][A-Za-z \t-]*)"#)
        .expect("energy level regex should compile")
});

/// Outcome of reading an analysis response
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedAnalysis {
    /// Decoded as JSON, or scraped with at least one field found
    Parsed(DayAnalysis),
    /// Nothing recognizable; carries the raw response text
    Unparsed(String),
}

/// Analysis plus any non-fatal warning the caller should surface
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedDay {
    pub analysis: DayAnalysis,
    pub warning: Option<AnalysisWarning>,
}

/// Builds the instruction prompt for a day description
pub fn build_analysis_prompt(day_description: &str) -> String {
    format!(
        r#"Read the following description of someone's day and work out:
1. Their overall mood (for example happy, stressed, relaxed)
2. The main activities or events they mention
3. Interests or preferences the description implies
4. Their likely energy level (high, medium or low)
5. Emotional needs a movie could help with tonight

Day description: "{}"

Answer with JSON only, in exactly this shape:
{{
    "mood": ["mood1", "mood2"],
    "activities": ["activity1", "activity2"],
    "interests": ["interest1", "interest2"],
    "energy_level": "energy level",
    "emotional_needs": ["need1", "need2"]
}}
"#,
        day_description.trim()
    )
}

fn split_items(list: &str) -> Vec<String> {
    list.split(',')
        .map(|item| item.trim_matches(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '*')))
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn scrape_list(pattern: &Regex, text: &str) -> Vec<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| split_items(m.as_str()))
        .unwrap_or_default()
}

/// `Energy level: low` with no brackets. The value ends at punctuation, a line
/// break, or the next `label:` on the same line.
fn scrape_bare_energy(text: &str) -> Vec<String> {
    let Some(m) = ENERGY_BARE_PATTERN.captures(text).and_then(|caps| caps.get(1)) else {
        return Vec::new();
    };

    let mut value = m.as_str().trim();
    let rest = text[m.end()..].trim_start_matches(|c: char| c == '*' || c == '_');
    if rest.starts_with(':') {
        // last word is the next label
        value = value
            .rsplit_once(|c: char| c.is_whitespace())
            .map_or("", |(head, _)| head.trim());
    }

    if value.is_empty() {
        Vec::new()
    } else {
        vec![value.to_string()]
    }
}

/// Best-effort extraction from text that is not valid JSON
///
/// Looks for `label: [a, b]` on a single line, case-insensitively. A field with
/// no match stays empty.
pub fn scrape_analysis(text: &str) -> DayAnalysis {
    let mut energy_level = scrape_list(&ENERGY_PATTERN, text);
    if energy_level.is_empty() {
        energy_level = scrape_bare_energy(text);
    }

    DayAnalysis {
        mood: scrape_list(&MOOD_PATTERN, text),
        activities: scrape_list(&ACTIVITIES_PATTERN, text),
        interests: scrape_list(&INTERESTS_PATTERN, text),
        energy_level,
        emotional_needs: scrape_list(&NEEDS_PATTERN, text),
    }
}

/// Reads an analysis response: strict JSON first, line scraping second
pub fn parse_analysis(text: &str) -> ParsedAnalysis {
    if let Ok(analysis) = serde_json::from_str::<DayAnalysis>(text) {
        return ParsedAnalysis::Parsed(analysis);
    }

    let scraped = scrape_analysis(text);
    if scraped.is_empty() {
        ParsedAnalysis::Unparsed(text.to_string())
    } else {
        tracing::debug!("Analysis response was not JSON, used scraped fields");
        ParsedAnalysis::Parsed(scraped)
    }
}

/// Asks the LLM what kind of day the user had
///
/// Fails when the LLM call fails or nothing at all could be read from the
/// answer. An answer that decodes but is empty succeeds with
/// [`AnalysisWarning::NoDetailsExtracted`].
pub async fn analyze_day(llm: &dyn LlmClient, day_description: &str) -> AppResult<AnalyzedDay> {
    if day_description.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Please describe your day before requesting recommendations".to_string(),
        ));
    }

    let response = llm.complete(&build_analysis_prompt(day_description)).await?;

    match parse_analysis(&response) {
        ParsedAnalysis::Parsed(analysis) => {
            let warning = analysis
                .is_empty()
                .then_some(AnalysisWarning::NoDetailsExtracted);

            tracing::info!(
                moods = analysis.mood.len(),
                activities = analysis.activities.len(),
                interests = analysis.interests.len(),
                empty = warning.is_some(),
                llm = llm.name(),
                "Day analyzed"
            );

            Ok(AnalyzedDay { analysis, warning })
        }
        ParsedAnalysis::Unparsed(raw) => {
            tracing::warn!(response = %raw, "Could not read day analysis");
            Err(AppError::parse(
                "Could not extract an analysis of your day from the response",
                raw,
            ))
        }
    }
}
