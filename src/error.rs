use thiserror::Error;

/// Everything that can go wrong between the live page and an answered query.
///
/// Transport and layout failures (`Network`, `Extraction`) are recoverable by
/// falling back to the cache; `DataUnavailable` means both tiers failed.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport or timeout problem reaching the live page.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// A structural anchor is missing from the page. Signals an upstream
    /// layout change, not a transient fault.
    #[error("page layout mismatch: {0}")]
    Extraction(String),

    /// No prior snapshot exists (or the cache file was unreadable).
    #[error("no cached data found")]
    CacheMiss,

    /// The cache could not be written. The previous cache, if any, is intact.
    #[error("failed to write cache: {0}")]
    CacheWrite(#[source] std::io::Error),

    #[error("country not found: {0:?}")]
    CountryNotFound(String),

    #[error("invalid slice {0:?}, expected N or START:END")]
    InvalidSlice(String),

    /// Both the live fetch and the cache fallback failed.
    #[error("no data available (live: {live}; cache: {cache})")]
    DataUnavailable {
        live: Box<Error>,
        cache: Box<Error>,
    },
}
