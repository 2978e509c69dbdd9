pub mod analysis;
pub mod movie_detail;
pub mod recommendation;
pub mod session_state;

pub use analysis::{AnalysisWarning, DayAnalysis};
pub use movie_detail::{MovieDetail, OmdbMovie, RecommendationView, NOT_AVAILABLE};
pub use recommendation::{FavoriteEntry, Recommendation, WatchHistoryEntry, UNKNOWN_GENRE};
pub use session_state::{AddOutcome, GenreCount, SessionState};
