/// Read-through caching over an optional [`Cache`](crate::db::Cache).
///
/// With `None` the block simply runs. With `Some(cache)` a hit is returned
/// directly; otherwise the block runs and its `Ok` value is queued for writing.
/// Errors from the block are returned as-is and never cached, and a failed
/// cache read is treated as a miss.
///
/// # Arguments
/// * `$cache`: An `Option<&Cache>`.
/// * `$key`: The [`CacheKey`](crate::db::CacheKey) for the value.
/// * `$ttl`: The time-to-live (TTL) for the cached value in seconds.
/// * `$block`: A future producing `AppResult<T>`.
///
/// # Example
/// ```rust,ignore
/// let detail = cached!(self.cache.as_ref(), key, ttl, async move {
///     self.fetch_from_api(title, year).await
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache {
            Some(cache) => {
                if let Some(hit) = cache.get_or_miss(&$key).await {
                    Ok(hit)
                } else {
                    let value = $block.await?;
                    cache.set_in_background(&$key, &value, $ttl);
                    Ok(value)
                }
            }
            None => $block.await,
        }
    }};
}
