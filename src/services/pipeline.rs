use serde::Serialize;

use crate::{
    error::AppResult,
    models::{AnalysisWarning, DayAnalysis, Recommendation, SessionState},
    services::{
        analysis::analyze_day, llm::LlmClient, recommendations::get_recommendations,
    },
};

/// Everything one recommendation cycle produced
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CycleOutcome {
    pub analysis: DayAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<AnalysisWarning>,
    pub recommendations: Vec<Recommendation>,
}

/// Runs analysis then recommendation for one day description
///
/// The session's watch history feeds the recommendation prompt. On success the
/// session's current recommendations are replaced; on any failure the state is
/// left exactly as it was.
pub async fn run_cycle(
    llm: &dyn LlmClient,
    state: &mut SessionState,
    day_description: &str,
) -> AppResult<CycleOutcome> {
    let analyzed = analyze_day(llm, day_description).await?;

    let recommendations =
        get_recommendations(llm, &analyzed.analysis, state.watch_history()).await?;

    state.set_recommendations(recommendations.clone());

    Ok(CycleOutcome {
        analysis: analyzed.analysis,
        warning: analyzed.warning,
        recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::llm::MockLlmClient;
    use mockall::Sequence;

    const ANALYSIS: &str = r#"{"mood": ["drained"], "activities": ["exams"], "interests": ["space"], "energy_level": "low", "emotional_needs": ["wonder"]}"#;
    const RECS: &str = "1. **Title:** Apollo 13\n   **Year:** 1995\n   **Reason:** Gripping. Hopeful. Real.\n\n2. **Title:** The Martian\n   **Year:** 2015\n   **Reason:** Funny. Smart. Uplifting.";

    fn llm_with(answers: Vec<AppResult<String>>) -> MockLlmClient {
        let mut llm = MockLlmClient::new();
        let mut seq = Sequence::new();
        for answer in answers {
            let mut slot = Some(answer);
            llm.expect_complete()
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_| slot.take().unwrap_or_else(|| Ok(String::new())));
        }
        llm.expect_name().return_const("mock");
        llm
    }

    #[tokio::test]
    async fn test_cycle_replaces_recommendations() {
        let llm = llm_with(vec![Ok(ANALYSIS.to_string()), Ok(RECS.to_string())]);
        let mut state = SessionState::new();
        state.set_recommendations(vec![Recommendation::new("Old", "1950", "Stale.")]);

        let outcome = run_cycle(&llm, &mut state, "Three exams in a row.").await.unwrap();

        assert_eq!(outcome.analysis.mood, vec!["drained"]);
        assert_eq!(outcome.warning, None);
        assert_eq!(outcome.recommendations.len(), 2);
        assert_eq!(state.recommendations(), outcome.recommendations.as_slice());
        assert_eq!(state.recommendations()[1].title, "The Martian");
    }

    #[tokio::test]
    async fn test_failed_recommendation_keeps_previous_set() {
        let llm = llm_with(vec![
            Ok(ANALYSIS.to_string()),
            Ok("I'd rather not say.".to_string()),
        ]);
        let mut state = SessionState::new();
        let previous = vec![Recommendation::new("Heat", "1995", "Tense.")];
        state.set_recommendations(previous.clone());

        let err = run_cycle(&llm, &mut state, "Rough day.").await.unwrap_err();

        assert!(matches!(err, AppError::Parse { .. }));
        assert_eq!(state.recommendations(), previous.as_slice());
    }

    #[tokio::test]
    async fn test_failed_analysis_skips_recommendation_call() {
        let llm = llm_with(vec![Err(AppError::ExternalApi("unavailable".to_string()))]);
        let mut state = SessionState::new();

        let err = run_cycle(&llm, &mut state, "Rough day.").await.unwrap_err();

        assert!(matches!(err, AppError::ExternalApi(_)));
        assert!(state.recommendations().is_empty());
    }

    #[tokio::test]
    async fn test_empty_analysis_still_recommends_with_warning() {
        let llm = llm_with(vec![Ok("{}".to_string()), Ok(RECS.to_string())]);
        let mut state = SessionState::new();

        let outcome = run_cycle(&llm, &mut state, "Nothing much.").await.unwrap();

        assert_eq!(outcome.warning, Some(AnalysisWarning::NoDetailsExtracted));
        assert_eq!(state.recommendations().len(), 2);
    }
}
