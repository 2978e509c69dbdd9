//! Movie metadata provider abstraction
//!
//! Recommendations only carry a title and a year. Providers turn that pair into
//! poster, cast, genre and rating details. A lookup that finds nothing is a
//! per-item miss, never a failure of the batch it belongs to.

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{MovieDetail, Recommendation, RecommendationView},
};

pub mod omdb;

pub use omdb::OmdbProvider;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Looks up one movie by exact title and year
    ///
    /// Returns `AppError::LookupMiss` when the provider answers but has no match.
    async fn lookup(&self, title: &str, year: &str) -> AppResult<MovieDetail>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Fetches details for every `(title, year)` pair concurrently
///
/// The result has the same length and order as `items`. Each lookup runs in its
/// own task and all of them are awaited; a failed, missing or panicked lookup
/// yields `None` for that position only.
pub async fn fetch_all(
    provider: Arc<dyn MetadataProvider>,
    items: Vec<(String, String)>,
) -> Vec<Option<MovieDetail>> {
    let total = items.len();

    let tasks: Vec<_> = items
        .into_iter()
        .map(|(title, year)| {
            let provider = Arc::clone(&provider);
            tokio::spawn(async move {
                match provider.lookup(&title, &year).await {
                    Ok(detail) => Some(detail),
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            title = %title,
                            year = %year,
                            provider = provider.name(),
                            "Metadata lookup failed"
                        );
                        None
                    }
                }
            })
        })
        .collect();

    let results: Vec<Option<MovieDetail>> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|joined| match joined {
            Ok(detail) => detail,
            Err(e) => {
                tracing::error!(error = %e, "Metadata task join error");
                None
            }
        })
        .collect();

    let found = results.iter().filter(|r| r.is_some()).count();
    if found < total {
        tracing::warn!(
            success_count = found,
            miss_count = total - found,
            "Partial metadata fetch"
        );
    }

    results
}

/// Pairs each recommendation with its fetched details
pub async fn enrich(
    provider: Arc<dyn MetadataProvider>,
    recommendations: &[Recommendation],
) -> Vec<RecommendationView> {
    let items = recommendations
        .iter()
        .map(|rec| (rec.title.clone(), rec.year.clone()))
        .collect();

    let details = fetch_all(provider, items).await;

    recommendations
        .iter()
        .cloned()
        .zip(details)
        .map(|(recommendation, details)| RecommendationView {
            recommendation,
            details,
        })
        .collect()
}
