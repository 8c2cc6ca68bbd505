//! Orchestration: fetch → extract → cache, with the offline and fallback
//! policies from the CLI's point of view.

use crate::api::Fetch;
use crate::error::Error;
use crate::extract;
use crate::models::Snapshot;
use crate::storage::CacheStore;
use chrono::Utc;

/// Where a returned snapshot came from. Callers can tell fresh data from a
/// cache fallback, and a fallback from an explicit offline request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Live fetch and extraction succeeded.
    Fresh,
    /// Live fetch failed; this is the last cached snapshot.
    StaleFallback,
    /// Offline mode was requested; cache read directly, no fetch attempted.
    Offline,
}

/// A snapshot plus its provenance.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub snapshot: Snapshot,
    pub provenance: Provenance,
}

pub struct DataService<F> {
    fetcher: F,
    cache: CacheStore,
}

impl<F: Fetch> DataService<F> {
    pub fn new(fetcher: F, cache: CacheStore) -> Self {
        Self { fetcher, cache }
    }

    /// Resolve the current dataset.
    ///
    /// Offline mode reads the cache only; a miss propagates untouched —
    /// offline is an explicit user choice and must not mask missing data.
    /// Online mode fetches and extracts, persists the result, and falls back
    /// to the cache on any live failure. [`Error::DataUnavailable`] means
    /// both tiers failed.
    pub fn get_snapshot(&self, offline: bool) -> Result<Dataset, Error> {
        if offline {
            let snapshot = self.cache.load()?;
            return Ok(Dataset {
                snapshot,
                provenance: Provenance::Offline,
            });
        }

        match self.fetch_live() {
            Ok(snapshot) => {
                // A failed cache write must not cost the user today's data.
                if let Err(e) = self.cache.save(&snapshot) {
                    log::warn!("cache write failed, continuing with fresh data: {e}");
                }
                Ok(Dataset {
                    snapshot,
                    provenance: Provenance::Fresh,
                })
            }
            Err(live) => {
                log::info!("live fetch failed, trying cache: {live}");
                match self.cache.load() {
                    Ok(snapshot) => Ok(Dataset {
                        snapshot,
                        provenance: Provenance::StaleFallback,
                    }),
                    Err(cache) => Err(Error::DataUnavailable {
                        live: Box::new(live),
                        cache: Box::new(cache),
                    }),
                }
            }
        }
    }

    fn fetch_live(&self) -> Result<Snapshot, Error> {
        let html = self.fetcher.fetch()?;
        extract::extract(&html, Utc::now())
    }
}
