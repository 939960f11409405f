//! Integration tests for the date filter over normalized records.

use chrono::{NaiveDate, TimeZone, Utc};
use complist_core::{ComponentRecord, DateRange, Timestamp};
use serde_json::json;

#[test]
fn test_filter_over_mixed_upstream_timestamps() {
    let day = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
    let range = DateRange::from_days(Some(day), Some(day)).unwrap();

    let in_range_millis = Utc.with_ymd_and_hms(2024, 7, 15, 9, 30, 0).unwrap().timestamp_millis();
    let records = vec![
        ComponentRecord {
            updated_at: Timestamp::from_json(&json!(in_range_millis)),
            ..ComponentRecord::new(1, "millis")
        },
        ComponentRecord {
            updated_at: Timestamp::from_json(&json!("2024-07-16T00:00:00Z")),
            ..ComponentRecord::new(2, "next day")
        },
        ComponentRecord {
            updated_at: Timestamp::from_json(&json!("not a date")),
            ..ComponentRecord::new(3, "garbled")
        },
        ComponentRecord::new(4, "missing"),
    ];

    let kept: Vec<String> = range.filter(records).into_iter().map(|r| r.name).collect();
    assert_eq!(kept, ["millis", "garbled", "missing"]);
}

#[test]
fn test_filter_preserves_order() {
    let range = DateRange::parse_in(Some("2020-01-01"), None, &Utc).unwrap();
    let records: Vec<ComponentRecord> = (0..5)
        .rev()
        .map(|i| {
            ComponentRecord::new(i, format!("r{i}"))
                .with_updated_at(Utc.with_ymd_and_hms(2021, 1, 1 + u32::try_from(i).unwrap(), 0, 0, 0).unwrap())
        })
        .collect();

    let ids: Vec<String> = range.filter(records).iter().map(|r| r.id.to_string()).collect();
    assert_eq!(ids, ["4", "3", "2", "1", "0"]);
}
