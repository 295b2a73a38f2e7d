// Record filtering by device and trailing date window
use super::metric::{DEVICE_ID, TIMESTAMP};
use super::record::{ColumnCatalog, SensorRecord};
use super::timestamp::parse_timestamp;
use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

/// Optional device restriction. `None` keeps every device.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceFilter(pub Option<String>);

impl DeviceFilter {
    pub fn device(id: impl Into<String>) -> Self {
        Self(Some(id.into()))
    }

    /// Blank selections from the UI mean "no restriction".
    pub fn from_param(param: Option<String>) -> Self {
        match param.filter(|p| !p.trim().is_empty()) {
            Some(id) => Self::device(id),
            None => Self::default(),
        }
    }
}

/// Optional trailing-day window. `None` is "all time".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateWindow(pub Option<u32>);

impl DateWindow {
    pub fn all_time() -> Self {
        Self(None)
    }

    pub fn last_days(days: u32) -> Self {
        Self(Some(days))
    }

    /// Earliest time kept by the window. A window reaching past the earliest
    /// representable time keeps everything, same as "all time".
    pub fn cutoff(self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let days = TimeDelta::try_days(i64::from(self.0?))?;
        now.checked_sub_signed(days)
    }
}

/// A preset offered by the date range selector.
#[derive(Debug, Clone, Serialize)]
pub struct DateRangePreset {
    pub label: &'static str,
    pub days: Option<u32>,
}

pub const DATE_RANGE_PRESETS: [DateRangePreset; 5] = [
    DateRangePreset { label: "Last 24h", days: Some(1) },
    DateRangePreset { label: "Last 7 Days", days: Some(7) },
    DateRangePreset { label: "Last 30 Days", days: Some(30) },
    DateRangePreset { label: "Last 90 Days", days: Some(90) },
    DateRangePreset { label: "All Time", days: None },
];

/// Which columns hold the device identifier and the reading time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterColumns {
    pub device: Option<String>,
    pub timestamp: Option<String>,
}

impl FilterColumns {
    pub fn resolve(catalog: &ColumnCatalog) -> Self {
        Self {
            device: DEVICE_ID.resolve(catalog),
            timestamp: TIMESTAMP.resolve(catalog),
        }
    }
}

/// Keep records matching both predicates, preserving their relative order.
///
/// Records whose timestamp is absent or unparseable are kept (fail-open). When the
/// device column is unknown every record fails a device restriction.
pub fn filter_records(
    records: &[SensorRecord],
    columns: &FilterColumns,
    device: &DeviceFilter,
    window: DateWindow,
    now: NaiveDateTime,
) -> Vec<SensorRecord> {
    let cutoff = window.cutoff(now);

    records
        .iter()
        .filter(|record| matches_device(record, columns.device.as_deref(), device))
        .filter(|record| within_window(record, columns.timestamp.as_deref(), cutoff))
        .cloned()
        .collect()
}

fn matches_device(record: &SensorRecord, column: Option<&str>, filter: &DeviceFilter) -> bool {
    let Some(wanted) = filter.0.as_deref() else {
        return true;
    };
    column
        .and_then(|c| record.text(c))
        .is_some_and(|id| id == wanted)
}

fn within_window(record: &SensorRecord, column: Option<&str>, cutoff: Option<NaiveDateTime>) -> bool {
    let Some(cutoff) = cutoff else {
        return true;
    };
    match column.and_then(|c| record.text(c)).and_then(|t| parse_timestamp(&t)) {
        Some(ts) => ts >= cutoff,
        None => true,
    }
}

/// Sort records by timestamp without moving unparseable ones.
///
/// Records with a parseable timestamp are stably sorted among the slots they already
/// occupy; every other record keeps its position.
pub fn sort_chronologically(records: &mut [SensorRecord], timestamp_column: &str) {
    let mut dated: Vec<(usize, NaiveDateTime)> = records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| {
            r.text(timestamp_column)
                .and_then(|t| parse_timestamp(&t))
                .map(|ts| (i, ts))
        })
        .collect();

    let slots: Vec<usize> = dated.iter().map(|(i, _)| *i).collect();
    dated.sort_by_key(|(_, ts)| *ts);

    let originals: Vec<SensorRecord> = dated.iter().map(|(i, _)| records[*i].clone()).collect();
    for (slot, record) in slots.into_iter().zip(originals) {
        records[slot] = record;
    }
}

/// Keep only the newest `max` records, assuming arrival order.
pub fn keep_most_recent(records: &mut Vec<SensorRecord>, max: usize) {
    if records.len() > max {
        records.drain(..records.len() - max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::FieldValue;
    use chrono::NaiveDate;

    fn record(device: &str, ts: &str) -> SensorRecord {
        SensorRecord::new(vec![
            ("Timestamp".to_string(), FieldValue::Text(ts.to_string())),
            ("Device_ID".to_string(), FieldValue::Text(device.to_string())),
        ])
    }

    fn columns() -> FilterColumns {
        FilterColumns {
            device: Some("Device_ID".to_string()),
            timestamp: Some("Timestamp".to_string()),
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_device_filter_keeps_order() {
        let records = vec![
            record("A", "28/09/2025 05:36:18"),
            record("B", "28/09/2025 05:46:18"),
            record("A", "28/09/2025 05:56:18"),
        ];

        let filtered = filter_records(
            &records,
            &columns(),
            &DeviceFilter::device("A"),
            DateWindow::all_time(),
            now(),
        );
        assert_eq!(filtered, vec![records[0].clone(), records[2].clone()]);
    }

    #[test]
    fn test_no_filters_keep_everything() {
        let records = vec![record("A", "x"), record("B", "y")];
        let filtered = filter_records(&records, &columns(), &DeviceFilter::default(), DateWindow::all_time(), now());
        assert_eq!(filtered, records);
    }

    #[test]
    fn test_date_window_is_fail_open() {
        let records = vec![
            record("A", "01/01/2025 00:00:00"),
            record("A", "garbage"),
            record("A", "30/09/2025 12:00:00"),
        ];

        let filtered = filter_records(&records, &columns(), &DeviceFilter::default(), DateWindow::last_days(7), now());
        assert_eq!(filtered, vec![records[1].clone(), records[2].clone()]);
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let records = vec![record("A", "24/09/2025 12:00:00"), record("A", "24/09/2025 11:59:59")];
        let filtered = filter_records(&records, &columns(), &DeviceFilter::default(), DateWindow::last_days(7), now());
        assert_eq!(filtered, vec![records[0].clone()]);
    }

    #[test]
    fn test_huge_window_keeps_everything() {
        let records = vec![record("A", "01/01/1970 00:00:00"), record("A", "30/09/2025 12:00:00")];
        let window = DateWindow::last_days(100_000_000);
        assert_eq!(window.cutoff(now()), None);

        let filtered = filter_records(&records, &columns(), &DeviceFilter::default(), window, now());
        assert_eq!(filtered, records);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let records = vec![
            record("A", "01/01/2025 00:00:00"),
            record("B", "30/09/2025 10:00:00"),
            record("A", "30/09/2025 11:00:00"),
            record("A", "bad"),
        ];
        let device = DeviceFilter::device("A");
        let window = DateWindow::last_days(30);

        let once = filter_records(&records, &columns(), &device, window, now());
        let twice = filter_records(&once, &columns(), &device, window, now());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unknown_device_column_matches_nothing() {
        let records = vec![record("A", "x")];
        let columns = FilterColumns {
            device: None,
            timestamp: Some("Timestamp".to_string()),
        };
        let filtered = filter_records(&records, &columns, &DeviceFilter::device("A"), DateWindow::all_time(), now());
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_filter_columns_resolve() {
        let catalog = ColumnCatalog::new(vec![
            "Timestamp".to_string(),
            "Device_Health".to_string(),
            "Device_ID".to_string(),
        ]);
        assert_eq!(FilterColumns::resolve(&catalog), columns());
    }

    #[test]
    fn test_health_column_is_not_a_device_id() {
        let catalog = ColumnCatalog::new(vec!["Timestamp".to_string(), "Device_Health".to_string()]);
        assert_eq!(FilterColumns::resolve(&catalog).device, None);
    }

    #[test]
    fn test_blank_device_param_means_all() {
        assert_eq!(DeviceFilter::from_param(Some("  ".to_string())), DeviceFilter::default());
        assert_eq!(DeviceFilter::from_param(Some("A".to_string())), DeviceFilter::device("A"));
    }

    #[test]
    fn test_sort_keeps_unparseable_in_place() {
        let mut records = vec![
            record("A", "30/09/2025 12:00:00"),
            record("A", "unknown"),
            record("A", "28/09/2025 12:00:00"),
            record("A", "29/09/2025 12:00:00"),
        ];

        sort_chronologically(&mut records, "Timestamp");
        let stamps: Vec<String> = records.iter().map(|r| r.text("Timestamp").unwrap()).collect();
        assert_eq!(
            stamps,
            vec!["28/09/2025 12:00:00", "unknown", "29/09/2025 12:00:00", "30/09/2025 12:00:00"]
        );
    }

    #[test]
    fn test_keep_most_recent() {
        let mut records = vec![record("A", "1"), record("A", "2"), record("A", "3")];
        keep_most_recent(&mut records, 2);
        assert_eq!(records[0].text("Timestamp").as_deref(), Some("2"));
        assert_eq!(records.len(), 2);
    }
}
