//! corona-rs
//!
//! A small Rust library for retrieving, caching, and querying Coronavirus
//! outbreak statistics scraped from worldometers.info. Pairs with the
//! `corona` CLI.
//!
//! ### Features
//! - Extract per-country counts and the chronological news feed from the page
//! - Persist the last successful extraction and fall back to it offline
//! - Query the data: single-country lookups, sorted/sliced tables, news views
//!
//! ### Example
//! ```no_run
//! use corona_rs::{Client, DataService, storage::CacheStore};
//!
//! let cache = CacheStore::default_location().expect("cache dir");
//! let service = DataService::new(Client::default(), cache);
//! let dataset = service.get_snapshot(false)?;
//! let world = corona_rs::query::resolve_country(&dataset.snapshot, "total")?;
//! println!("{} cases world-wide", world.cases);
//! # Ok::<(), corona_rs::Error>(())
//! ```

pub mod api;
pub mod error;
pub mod extract;
pub mod models;
pub mod query;
pub mod service;
pub mod storage;

pub use api::{Client, Fetch};
pub use error::Error;
pub use models::{CountryRecord, NewsItem, Snapshot};
pub use service::{DataService, Dataset, Provenance};
