use serde::{Deserialize, Serialize};

use super::Recommendation;

/// Value OMDb uses for fields it has no data for
pub const NOT_AVAILABLE: &str = "N/A";

/// Metadata for a recommended movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    pub title: String,
    pub year: String,
    /// Poster URL, `None` when the provider has no image
    pub poster: Option<String>,
    pub director: String,
    pub actors: String,
    /// Comma-separated, e.g. "Comedy, Drama"
    pub genre: String,
    pub imdb_rating: String,
    pub plot: String,
}

/// A recommendation with whatever metadata could be found for it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationView {
    #[serde(flatten)]
    pub recommendation: Recommendation,
    pub details: Option<MovieDetail>,
}

// ============================================================================
// OMDb API Types
// ============================================================================

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

/// Raw API response from `GET /?t=...&y=...`
///
/// Misses come back with HTTP 200 and `"Response": "False"`.
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbMovie {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
    #[serde(rename = "Title", default = "not_available")]
    pub title: String,
    #[serde(rename = "Year", default = "not_available")]
    pub year: String,
    #[serde(rename = "Poster", default = "not_available")]
    pub poster: String,
    #[serde(rename = "Director", default = "not_available")]
    pub director: String,
    #[serde(rename = "Actors", default = "not_available")]
    pub actors: String,
    #[serde(rename = "Genre", default = "not_available")]
    pub genre: String,
    #[serde(rename = "imdbRating", default = "not_available")]
    pub imdb_rating: String,
    #[serde(rename = "Plot", default = "not_available")]
    pub plot: String,
}

impl OmdbMovie {
    pub fn is_found(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }
}

impl From<OmdbMovie> for MovieDetail {
    fn from(movie: OmdbMovie) -> Self {
        let poster = match movie.poster.trim() {
            "" | NOT_AVAILABLE => None,
            url => Some(url.to_string()),
        };

        MovieDetail {
            title: movie.title,
            year: movie.year,
            poster,
            director: movie.director,
            actors: movie.actors,
            genre: movie.genre,
            imdb_rating: movie.imdb_rating,
            plot: movie.plot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_omdb_movie_deserialization() {
        let json = r#"{
            "Title": "Inception",
            "Year": "2010",
            "Genre": "Action, Adventure, Sci-Fi",
            "Director": "Christopher Nolan",
            "Actors": "Leonardo DiCaprio, Joseph Gordon-Levitt, Elliot Page",
            "Plot": "A thief who steals corporate secrets through dream-sharing technology.",
            "Poster": "https://m.media-amazon.com/images/M/inception.jpg",
            "imdbRating": "8.8",
            "imdbID": "tt1375666",
            "Response": "True"
        }"#;

        let movie: OmdbMovie = serde_json::from_str(json).unwrap();
        assert!(movie.is_found());

        let detail = MovieDetail::from(movie);
        assert_eq!(detail.title, "Inception");
        assert_eq!(detail.director, "Christopher Nolan");
        assert_eq!(detail.genre, "Action, Adventure, Sci-Fi");
        assert_eq!(detail.imdb_rating, "8.8");
        assert_eq!(
            detail.poster.as_deref(),
            Some("https://m.media-amazon.com/images/M/inception.jpg")
        );
    }

    #[test]
    fn test_omdb_not_found() {
        let json = r#"{"Response": "False", "Error": "Movie not found!"}"#;

        let movie: OmdbMovie = serde_json::from_str(json).unwrap();
        assert!(!movie.is_found());
        assert_eq!(movie.error.as_deref(), Some("Movie not found!"));
    }

    #[test]
    fn test_missing_poster_becomes_none() {
        let json = r#"{"Response": "True", "Title": "Obscure Short", "Poster": "N/A"}"#;

        let detail = MovieDetail::from(serde_json::from_str::<OmdbMovie>(json).unwrap());
        assert_eq!(detail.poster, None);
        assert_eq!(detail.director, NOT_AVAILABLE);
        assert_eq!(detail.plot, NOT_AVAILABLE);
    }
}
