use chrono::Utc;
use corona_rs::api::Fetch;
use corona_rs::models::{CountryRecord, Snapshot};
use corona_rs::service::{DataService, Provenance};
use corona_rs::storage::CacheStore;
use corona_rs::Error;
use tempfile::tempdir;

const PAGE: &str = r#"<html><body>
<div id="news_block">
  <div class="news_post">598 new cases reported.</div>
</div>
<table id="main_table_countries_today"><tbody>
<tr><td>China</td><td>80,026</td><td>+11</td><td>2,912</td><td>+13</td><td>44,810</td><td>32,304</td><td>6,806</td></tr>
<tr><td>Total:</td><td>90,943</td><td>+598</td><td>3,117</td><td>+32</td><td>48,084</td><td>39,742</td><td>7,434</td></tr>
</tbody></table>
</body></html>"#;

enum Stub {
    Page,
    Down,
}

impl Fetch for Stub {
    fn fetch(&self) -> Result<String, Error> {
        match self {
            Stub::Page => Ok(PAGE.to_string()),
            Stub::Down => Err(Error::Extraction("stub transport down".into())),
        }
    }
}

fn cached_snapshot() -> Snapshot {
    Snapshot {
        fetched_at: Utc::now(),
        countries: vec![CountryRecord {
            name: "Total".into(),
            cases: 42,
            ..Default::default()
        }],
        news: Vec::new(),
    }
}

#[test]
fn offline_with_no_cache_is_a_visible_miss() {
    let dir = tempdir().unwrap();
    let service = DataService::new(Stub::Page, CacheStore::new(dir.path()));
    assert!(matches!(
        service.get_snapshot(true),
        Err(Error::CacheMiss)
    ));
}

#[test]
fn offline_reads_cache_without_fetching() {
    let dir = tempdir().unwrap();
    let store = CacheStore::new(dir.path());
    store.save(&cached_snapshot()).unwrap();
    // Stub::Down would fail any fetch attempt; offline must not make one.
    let service = DataService::new(Stub::Down, store);
    let dataset = service.get_snapshot(true).unwrap();
    assert_eq!(dataset.provenance, Provenance::Offline);
    assert_eq!(dataset.snapshot.countries[0].cases, 42);
}

#[test]
fn successful_fetch_returns_fresh_and_writes_the_cache() {
    let dir = tempdir().unwrap();
    let store = CacheStore::new(dir.path());
    let service = DataService::new(Stub::Page, CacheStore::new(dir.path()));
    let dataset = service.get_snapshot(false).unwrap();
    assert_eq!(dataset.provenance, Provenance::Fresh);
    assert_eq!(dataset.snapshot.countries.len(), 2);
    assert_eq!(store.load().unwrap(), dataset.snapshot);
}

#[test]
fn fetch_failure_falls_back_to_cache_tagged_stale() {
    let dir = tempdir().unwrap();
    let store = CacheStore::new(dir.path());
    store.save(&cached_snapshot()).unwrap();
    let service = DataService::new(Stub::Down, store);
    let dataset = service.get_snapshot(false).unwrap();
    assert_eq!(dataset.provenance, Provenance::StaleFallback);
    assert_eq!(dataset.snapshot.countries[0].cases, 42);
}

#[test]
fn fetch_failure_without_cache_exhausts_both_tiers() {
    let dir = tempdir().unwrap();
    let service = DataService::new(Stub::Down, CacheStore::new(dir.path()));
    match service.get_snapshot(false) {
        Err(Error::DataUnavailable { live, cache }) => {
            assert!(matches!(*live, Error::Extraction(_)));
            assert!(matches!(*cache, Error::CacheMiss));
        }
        other => panic!("expected DataUnavailable, got {other:?}"),
    }
}

#[test]
fn cache_write_failure_still_returns_fresh_data() {
    // Point the cache "directory" at an existing file so create_dir_all fails.
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("occupied");
    std::fs::write(&blocker, "not a directory").unwrap();
    let service = DataService::new(Stub::Page, CacheStore::new(&blocker));
    let dataset = service.get_snapshot(false).unwrap();
    assert_eq!(dataset.provenance, Provenance::Fresh);
    assert_eq!(dataset.snapshot.countries.len(), 2);
}
