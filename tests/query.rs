use chrono::Utc;
use corona_rs::models::{CountryRecord, NewsItem, Snapshot};
use corona_rs::query::{
    SliceSpec, SortKey, SortSpec, filter_important, metric_value, resolve_country, slice,
    sort_table,
};
use corona_rs::{Error, query::Metric};

fn record(name: &str, cases: u64, deaths: u64) -> CountryRecord {
    CountryRecord {
        name: name.into(),
        cases,
        deaths,
        recovered: cases / 2,
        active: cases - cases / 2 - deaths,
        ..Default::default()
    }
}

fn snapshot() -> Snapshot {
    Snapshot {
        fetched_at: Utc::now(),
        countries: vec![
            record("Total", 1000, 30),
            record("China", 800, 25),
            record("Italy", 150, 4),
            record("South Korea", 50, 1),
        ],
        news: Vec::new(),
    }
}

#[test]
fn total_alias_is_case_and_whitespace_insensitive() {
    let snap = snapshot();
    let a = resolve_country(&snap, "TOTAL").unwrap();
    let b = resolve_country(&snap, "total").unwrap();
    let c = resolve_country(&snap, "  Total ").unwrap();
    let d = resolve_country(&snap, "").unwrap();
    assert_eq!(a, b);
    assert_eq!(b, c);
    assert_eq!(c, d);
    assert_eq!(a.cases, 1000);
}

#[test]
fn country_lookup_ignores_case_and_padding() {
    let snap = snapshot();
    assert_eq!(resolve_country(&snap, " south korea ").unwrap().cases, 50);
}

#[test]
fn unknown_country_is_an_error() {
    let snap = snapshot();
    assert!(matches!(
        resolve_country(&snap, "Atlantis"),
        Err(Error::CountryNotFound(_))
    ));
}

#[test]
fn numeric_sort_is_descending_by_default() {
    let snap = snapshot();
    let sorted = sort_table(&snap.countries, SortSpec::parse("deaths"));
    let deaths: Vec<u64> = sorted.iter().map(|r| r.deaths).collect();
    assert_eq!(deaths, vec![30, 25, 4, 1]);
}

#[test]
fn asc_modifier_flips_direction() {
    let snap = snapshot();
    let sorted = sort_table(&snap.countries, SortSpec::parse("deaths:asc"));
    let deaths: Vec<u64> = sorted.iter().map(|r| r.deaths).collect();
    assert_eq!(deaths, vec![1, 4, 25, 30]);
}

#[test]
fn name_sort_is_descending_alphabetically() {
    let snap = snapshot();
    let sorted = sort_table(&snap.countries, SortSpec::parse("name"));
    let names: Vec<&str> = sorted.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Total", "South Korea", "Italy", "China"]);
}

#[test]
fn unrecognized_key_degrades_to_cases_descending() {
    let spec = SortSpec::parse("bogus");
    assert_eq!(spec, SortSpec::default());
    assert_eq!(spec.key, SortKey::Cases);
    assert!(!spec.reversed);
}

#[test]
fn sorting_is_idempotent() {
    let snap = snapshot();
    let spec = SortSpec::parse("cases");
    let once = sort_table(&snap.countries, spec);
    let twice = sort_table(&once, spec);
    assert_eq!(once, twice);
}

#[test]
fn ties_keep_snapshot_order() {
    let rows = vec![record("A", 10, 0), record("B", 10, 0), record("C", 10, 0)];
    let sorted = sort_table(&rows, SortSpec::parse("cases"));
    let names: Vec<&str> = sorted.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[test]
fn slice_start_end_is_half_open() {
    let items: Vec<i32> = (0..10).collect();
    let spec: SliceSpec = "2:5".parse().unwrap();
    assert_eq!(slice(&items, spec), vec![2, 3, 4]);
}

#[test]
fn bare_count_equals_prefix_slice() {
    let items: Vec<i32> = (0..10).collect();
    let bare: SliceSpec = "5".parse().unwrap();
    let prefixed: SliceSpec = ":5".parse().unwrap();
    assert_eq!(slice(&items, bare), slice(&items, prefixed));
    assert_eq!(slice(&items, bare), vec![0, 1, 2, 3, 4]);
}

#[test]
fn negative_endpoints_count_from_the_back() {
    let items: Vec<i32> = (0..10).collect();
    let tail: SliceSpec = "-3:".parse().unwrap();
    assert_eq!(slice(&items, tail), vec![7, 8, 9]);
    let trim: SliceSpec = ":-8".parse().unwrap();
    assert_eq!(slice(&items, trim), vec![0, 1]);
}

#[test]
fn out_of_bounds_clamps_instead_of_failing() {
    let items: Vec<i32> = (0..3).collect();
    let spec: SliceSpec = "1:99".parse().unwrap();
    assert_eq!(slice(&items, spec), vec![1, 2]);
    let empty: SliceSpec = "5:9".parse().unwrap();
    assert!(slice(&items, empty).is_empty());
    let inverted: SliceSpec = "2:1".parse().unwrap();
    assert!(slice(&items, inverted).is_empty());
}

#[test]
fn garbage_slice_spec_is_rejected() {
    assert!(matches!(
        "abc".parse::<SliceSpec>(),
        Err(Error::InvalidSlice(_))
    ));
    assert!(matches!(
        "1:2:3".parse::<SliceSpec>(),
        Err(Error::InvalidSlice(_))
    ));
}

#[test]
fn filter_important_keeps_relative_order() {
    let news: Vec<NewsItem> = (0..10)
        .map(|i| NewsItem {
            text: format!("item {i}"),
            important: matches!(i, 2 | 5 | 9),
        })
        .collect();
    let important = filter_important(&news);
    let texts: Vec<&str> = important.iter().map(|n| n.text.as_str()).collect();
    assert_eq!(texts, vec!["item 2", "item 5", "item 9"]);
}

#[test]
fn scalar_metrics_match_record_fields() {
    let row = CountryRecord {
        name: "X".into(),
        cases: 100,
        new_cases: 7,
        deaths: 10,
        new_deaths: 2,
        recovered: 40,
        active: 50,
        serious: 5,
        cases_per_million: 0.9,
    };
    assert_eq!(metric_value(&row, Metric::Latest), 7);
    assert_eq!(metric_value(&row, Metric::Active), 50);
    assert_eq!(metric_value(&row, Metric::Closed), 50);
    assert_eq!(metric_value(&row, Metric::Dead), 10);
    assert_eq!(metric_value(&row, Metric::Recovered), 40);
    assert_eq!(metric_value(&row, Metric::Serious), 5);
}

#[test]
fn oversized_counts_saturate_instead_of_wrapping() {
    let row = CountryRecord {
        name: "X".into(),
        cases: u64::MAX,
        active: u64::MAX,
        ..Default::default()
    };
    assert_eq!(metric_value(&row, Metric::Active), i64::MAX);
    assert_eq!(metric_value(&row, Metric::Closed), 0);
    assert_eq!(metric_value(&row, Metric::Dead), 0);
}
