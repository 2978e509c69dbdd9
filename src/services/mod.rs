pub mod analysis;
pub mod llm;
pub mod pipeline;
pub mod providers;
pub mod recommendations;

pub use analysis::{analyze_day, parse_analysis, AnalyzedDay, ParsedAnalysis};
pub use llm::{GeminiClient, LlmClient};
pub use pipeline::{run_cycle, CycleOutcome};
pub use providers::{enrich, fetch_all, MetadataProvider, OmdbProvider};
pub use recommendations::{get_recommendations, parse_recommendations};
