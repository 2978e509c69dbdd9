use serde::{Deserialize, Deserializer, Serialize};

/// What the LLM made of someone's description of their day
///
/// Every field is a sequence. `energy_level` is usually a single word but the
/// model sometimes answers with a list, so both shapes decode into a `Vec`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayAnalysis {
    #[serde(default, deserialize_with = "string_list")]
    pub mood: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub activities: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub interests: Vec<String>,
    #[serde(default, alias = "energyLevel", deserialize_with = "string_list")]
    pub energy_level: Vec<String>,
    #[serde(default, alias = "emotionalNeeds", deserialize_with = "string_list")]
    pub emotional_needs: Vec<String>,
}

impl DayAnalysis {
    /// True when no field carries anything
    pub fn is_empty(&self) -> bool {
        self.mood.is_empty()
            && self.activities.is_empty()
            && self.interests.is_empty()
            && self.energy_level.is_empty()
            && self.emotional_needs.is_empty()
    }
}

/// Non-fatal findings about an analysis
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisWarning {
    /// The response decoded but every field was empty
    NoDetailsExtracted,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) if value.trim().is_empty() => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_json_decodes_exactly() {
        let json = r#"{
            "mood": ["tired", "content"],
            "activities": ["long meeting", "gym"],
            "interests": ["sci-fi"],
            "energy_level": "low",
            "emotional_needs": ["comfort", "escape"]
        }"#;

        let analysis: DayAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.mood, vec!["tired", "content"]);
        assert_eq!(analysis.activities, vec!["long meeting", "gym"]);
        assert_eq!(analysis.interests, vec!["sci-fi"]);
        assert_eq!(analysis.energy_level, vec!["low"]);
        assert_eq!(analysis.emotional_needs, vec!["comfort", "escape"]);
    }

    #[test]
    fn test_energy_level_list_and_camel_case() {
        let json = r#"{"energyLevel": ["medium", "rising"], "emotionalNeeds": ["calm"]}"#;

        let analysis: DayAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.energy_level, vec!["medium", "rising"]);
        assert_eq!(analysis.emotional_needs, vec!["calm"]);
        assert!(analysis.mood.is_empty());
    }

    #[test]
    fn test_missing_and_null_fields_default_to_empty() {
        let analysis: DayAnalysis =
            serde_json::from_str(r#"{"mood": null, "energy_level": ""}"#).unwrap();
        assert!(analysis.is_empty());
    }

    #[test]
    fn test_serializes_snake_case() {
        let analysis = DayAnalysis {
            energy_level: vec!["high".to_string()],
            ..Default::default()
        };
        let value = serde_json::to_value(&analysis).unwrap();
        assert_eq!(value["energy_level"], serde_json::json!(["high"]));
        assert_eq!(value["emotional_needs"], serde_json::json!([]));
    }

    #[test]
    fn test_warning_serialization() {
        let json = serde_json::to_string(&AnalysisWarning::NoDetailsExtracted).unwrap();
        assert_eq!(json, "\"no_details_extracted\"");
    }
}
