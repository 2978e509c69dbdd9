use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{FavoriteEntry, Recommendation, WatchHistoryEntry, UNKNOWN_GENRE};

/// Result of an append to favorites or watch history
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

/// How many watched movies carry a genre
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}

/// Per-session recommendations, favorites and watch history
///
/// Favorites and history are append-only. Recommendations are replaced as a
/// whole and never merged with a previous set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionState {
    recommendations: Vec<Recommendation>,
    favorites: Vec<FavoriteEntry>,
    watch_history: Vec<WatchHistoryEntry>,
}

impl SessionState {
    /// Creates an empty session state
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    pub fn favorites(&self) -> &[FavoriteEntry] {
        &self.favorites
    }

    pub fn watch_history(&self) -> &[WatchHistoryEntry] {
        &self.watch_history
    }

    /// Replaces the current recommendation set
    pub fn set_recommendations(&mut self, recommendations: Vec<Recommendation>) {
        self.recommendations = recommendations;
    }

    /// Empties the current recommendation set, leaving favorites and history alone
    pub fn clear_recommendations(&mut self) {
        self.recommendations.clear();
    }

    /// Adds a favorite unless an identical one is already saved
    pub fn add_favorite(&mut self, rec: &Recommendation) -> AddOutcome {
        let entry = FavoriteEntry::from(rec);
        if self.favorites.contains(&entry) {
            return AddOutcome::AlreadyPresent;
        }
        self.favorites.push(entry);
        AddOutcome::Added
    }

    /// True when the movie is already in the watch history, whatever the date
    pub fn has_watched(&self, rec: &Recommendation) -> bool {
        self.watch_history.iter().any(|entry| &entry.movie == rec)
    }

    /// Records a movie as watched on `watch_date`
    ///
    /// Duplicates are detected on the recommendation fields only, so the same
    /// movie marked on a different day is still a duplicate.
    pub fn add_watched(
        &mut self,
        rec: &Recommendation,
        genre: Option<&str>,
        watch_date: NaiveDate,
    ) -> AddOutcome {
        if self.has_watched(rec) {
            return AddOutcome::AlreadyPresent;
        }
        self.watch_history.push(WatchHistoryEntry {
            movie: rec.clone(),
            watch_date,
            genre: genre.unwrap_or(UNKNOWN_GENRE).to_string(),
        });
        AddOutcome::Added
    }

    /// Counts genres across the watch history, most watched first
    pub fn genre_distribution(&self) -> Vec<GenreCount> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for entry in &self.watch_history {
            for genre in entry.genre.split(',').map(str::trim).filter(|g| !g.is_empty()) {
                *counts.entry(genre).or_insert(0) += 1;
            }
        }

        let mut distribution: Vec<GenreCount> = counts
            .into_iter()
            .map(|(genre, count)| GenreCount {
                genre: genre.to_string(),
                count,
            })
            .collect();
        distribution.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.genre.cmp(&b.genre)));
        distribution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(title: &str, year: &str) -> Recommendation {
        Recommendation::new(title, year, format!("{} suits a slow evening.", title))
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = SessionState::new();
        assert!(state.recommendations().is_empty());
        assert!(state.favorites().is_empty());
        assert!(state.watch_history().is_empty());
    }

    #[test]
    fn test_set_recommendations_replaces_wholesale() {
        let mut state = SessionState::new();
        state.set_recommendations(vec![rec("Heat", "1995"), rec("Ronin", "1998")]);
        state.set_recommendations(vec![rec("Up", "2009")]);
        assert_eq!(state.recommendations(), &[rec("Up", "2009")]);
    }

    #[test]
    fn test_add_favorite_twice_keeps_one() {
        let mut state = SessionState::new();
        assert_eq!(state.add_favorite(&rec("Heat", "1995")), AddOutcome::Added);
        assert_eq!(
            state.add_favorite(&rec("Heat", "1995")),
            AddOutcome::AlreadyPresent
        );
        assert_eq!(state.favorites().len(), 1);
    }

    #[test]
    fn test_add_favorite_different_reason_is_distinct() {
        let mut state = SessionState::new();
        state.add_favorite(&rec("Heat", "1995"));
        state.add_favorite(&Recommendation::new("Heat", "1995", "Another reason."));
        assert_eq!(state.favorites().len(), 2);
    }

    #[test]
    fn test_add_watched_dedups_on_base_fields() {
        let mut state = SessionState::new();
        let heat = rec("Heat", "1995");
        assert_eq!(
            state.add_watched(&heat, Some("Action, Crime"), day(1)),
            AddOutcome::Added
        );
        assert_eq!(
            state.add_watched(&heat, Some("Drama"), day(2)),
            AddOutcome::AlreadyPresent
        );

        assert_eq!(state.watch_history().len(), 1);
        assert_eq!(state.watch_history()[0].watch_date, day(1));
        assert_eq!(state.watch_history()[0].genre, "Action, Crime");
    }

    #[test]
    fn test_has_watched() {
        let mut state = SessionState::new();
        let heat = rec("Heat", "1995");
        assert!(!state.has_watched(&heat));

        state.add_watched(&heat, None, day(1));
        assert!(state.has_watched(&heat));
        assert!(!state.has_watched(&rec("Ronin", "1998")));
    }

    #[test]
    fn test_add_watched_without_genre_uses_unknown() {
        let mut state = SessionState::new();
        state.add_watched(&rec("Primer", "2004"), None, day(3));
        assert_eq!(state.watch_history()[0].genre, UNKNOWN_GENRE);
    }

    #[test]
    fn test_clear_keeps_favorites_and_history() {
        let mut state = SessionState::new();
        state.add_favorite(&rec("Amélie", "2001"));
        state.add_watched(&rec("Heat", "1995"), None, day(4));
        state.set_recommendations(vec![rec("Up", "2009"), rec("Coco", "2017")]);

        state.clear_recommendations();

        assert!(state.recommendations().is_empty());
        assert_eq!(state.favorites().len(), 1);
        assert_eq!(state.watch_history().len(), 1);
    }

    #[test]
    fn test_genre_distribution() {
        let mut state = SessionState::new();
        state.add_watched(&rec("Heat", "1995"), Some("Action, Crime, Drama"), day(1));
        state.add_watched(&rec("Up", "2009"), Some("Animation, Adventure, Drama"), day(2));
        state.add_watched(&rec("Primer", "2004"), None, day(3));

        let distribution = state.genre_distribution();
        assert_eq!(
            distribution[0],
            GenreCount {
                genre: "Drama".to_string(),
                count: 2
            }
        );
        assert_eq!(distribution.len(), 6);
        assert!(distribution
            .iter()
            .any(|g| g.genre == UNKNOWN_GENRE && g.count == 1));
        // ties are ordered by name
        assert_eq!(distribution[1].genre, "Action");
    }

    #[test]
    fn test_genre_distribution_empty_history() {
        assert!(SessionState::new().genre_distribution().is_empty());
    }
}
