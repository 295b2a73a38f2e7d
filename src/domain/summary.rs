// Latest-reading summary: parameter table, alerts and update status
use super::metric::{MetricDescriptor, AQI, HUMIDITY, TEMPERATURE};
use super::record::{ColumnCatalog, SensorRecord};
use super::timestamp::parse_timestamp;
use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

pub const ALERT_TEMPERATURE_C: f64 = 30.0;
pub const ALERT_AQI: f64 = 600.0;
const WARNING_RATIO: f64 = 0.8;

const DEVICE_HEALTH: MetricDescriptor = MetricDescriptor {
    name: "Device Health",
    keywords: &["device_health", "health"],
};
const AQI_VALUE: MetricDescriptor = MetricDescriptor {
    name: "AQI Value",
    keywords: &["aqi_value", "aqi value"],
};
const AQI_STATUS: MetricDescriptor = MetricDescriptor {
    name: "AQI Status",
    keywords: &["aqi_status", "aqi status"],
};
const ECO2: MetricDescriptor = MetricDescriptor {
    name: "eCO₂",
    keywords: &["eco₂", "eco2", "co2"],
};
const SMOKE: MetricDescriptor = MetricDescriptor {
    name: "Smoke Status",
    keywords: &["smoke"],
};
const LIGHT_LUX: MetricDescriptor = MetricDescriptor {
    name: "Light",
    keywords: &["light"],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLevel {
    Good,
    Alert,
    Neutral,
}

impl StatusLevel {
    pub fn classify(status: &str) -> Self {
        if status == "Alert" || status == "Hazardous" || status.contains("Alert") {
            StatusLevel::Alert
        } else if matches!(status, "Good" | "GOOD" | "Normal" | "No smoke detected") {
            StatusLevel::Good
        } else {
            StatusLevel::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterRow {
    pub label: &'static str,
    pub value: Option<f64>,
    pub unit: &'static str,
    pub status: Option<String>,
    pub level: Option<StatusLevel>,
}

impl ParameterRow {
    fn value(label: &'static str, value: Option<f64>, unit: &'static str) -> Self {
        Self {
            label,
            value,
            unit,
            status: None,
            level: None,
        }
    }

    fn status(label: &'static str, status: String) -> Self {
        let level = StatusLevel::classify(&status);
        Self {
            label,
            value: None,
            unit: "",
            status: Some(status),
            level: Some(level),
        }
    }
}

/// Parameter table for the newest record of a filtered record set.
pub fn parameter_table(latest: &SensorRecord, catalog: &ColumnCatalog) -> Vec<ParameterRow> {
    let number = |d: &MetricDescriptor| d.resolve(catalog).and_then(|c| latest.number(&c));
    let text = |d: &MetricDescriptor, default: &str| {
        d.resolve(catalog)
            .and_then(|c| latest.text(&c))
            .unwrap_or_else(|| default.to_string())
    };

    vec![
        ParameterRow::status("Device Health", text(&DEVICE_HEALTH, "GOOD")),
        ParameterRow::value("Temperature", number(&TEMPERATURE), "°C"),
        ParameterRow::value("Humidity", number(&HUMIDITY), "%"),
        ParameterRow::value("Light (Lux)", number(&LIGHT_LUX), ""),
        ParameterRow::value("AQI Value", number(&AQI_VALUE).or_else(|| number(&AQI)), ""),
        ParameterRow::status("AQI Status", text(&AQI_STATUS, "Unknown")),
        ParameterRow::value("eCO₂ (ppm)", Some(number(&ECO2).unwrap_or(0.0)), ""),
        ParameterRow::status("Smoke Status", text(&SMOKE, "No smoke detected")),
    ]
}

/// Severity of a value against an alert threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdLevel {
    Normal,
    Warning,
    Alert,
}

impl ThresholdLevel {
    pub fn of(value: f64, threshold: f64) -> Self {
        if value >= threshold {
            ThresholdLevel::Alert
        } else if value >= threshold * WARNING_RATIO {
            ThresholdLevel::Warning
        } else {
            ThresholdLevel::Normal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertSummary {
    pub alerts: Vec<&'static str>,
    pub text: String,
    pub temperature: Option<ThresholdLevel>,
    pub aqi: Option<ThresholdLevel>,
}

/// Alerts raised by the newest temperature and AQI readings.
pub fn evaluate_alerts(temperature: Option<f64>, aqi: Option<f64>) -> AlertSummary {
    let mut alerts = Vec::new();
    if temperature.is_some_and(|t| t > ALERT_TEMPERATURE_C) {
        alerts.push("High Temp");
    }
    if aqi.is_some_and(|a| a >= ALERT_AQI) {
        alerts.push("High AQI");
    }

    let text = if alerts.is_empty() {
        "Normal".to_string()
    } else {
        alerts.join(" | ")
    };

    AlertSummary {
        alerts,
        text,
        temperature: temperature.map(|t| ThresholdLevel::of(t, ALERT_TEMPERATURE_C)),
        aqi: aqi.map(|a| ThresholdLevel::of(a, ALERT_AQI)),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateStatus {
    pub last_reading: Option<String>,
    pub next_fetch: Option<NaiveDateTime>,
}

impl UpdateStatus {
    /// Next fetch is expected `fetch_minutes` after the newest reading.
    pub fn from_last_reading(last_reading: Option<String>, fetch_minutes: i64) -> Self {
        let next_fetch = last_reading
            .as_deref()
            .and_then(parse_timestamp)
            .and_then(|ts| ts.checked_add_signed(TimeDelta::try_minutes(fetch_minutes)?));
        Self {
            last_reading,
            next_fetch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::FieldValue;
    use chrono::Timelike;

    fn farm_record() -> (SensorRecord, ColumnCatalog) {
        let record = SensorRecord::new(vec![
            ("Timestamp".to_string(), FieldValue::Text("28/09/2025 05:36:18".to_string())),
            ("Device_ID".to_string(), FieldValue::Text("indoor-farm-01".to_string())),
            ("Temperature_°C".to_string(), FieldValue::Number(31.2)),
            ("Humidity_%".to_string(), FieldValue::Number(55.0)),
            ("Light".to_string(), FieldValue::Number(420.0)),
            ("AQI_Value".to_string(), FieldValue::Number(120.0)),
            ("AQI_Status".to_string(), FieldValue::Text("Good".to_string())),
        ]);
        let catalog = ColumnCatalog::from_records(std::slice::from_ref(&record));
        (record, catalog)
    }

    #[test]
    fn test_parameter_table_reads_latest_record() {
        let (record, catalog) = farm_record();
        let rows = parameter_table(&record, &catalog);

        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0].status.as_deref(), Some("GOOD"));
        assert_eq!(rows[1].value, Some(31.2));
        assert_eq!(rows[1].unit, "°C");
        assert_eq!(rows[3].value, Some(420.0));
        assert_eq!(rows[4].value, Some(120.0));
        assert_eq!(rows[5].level, Some(StatusLevel::Good));
        // eCO₂ reads as zero when the sensor column is absent
        assert_eq!(rows[6].value, Some(0.0));
        assert_eq!(rows[7].status.as_deref(), Some("No smoke detected"));
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(StatusLevel::classify("Hazardous"), StatusLevel::Alert);
        assert_eq!(StatusLevel::classify("Smoke Alert!"), StatusLevel::Alert);
        assert_eq!(StatusLevel::classify("Normal"), StatusLevel::Good);
        assert_eq!(StatusLevel::classify("Moderate"), StatusLevel::Neutral);
    }

    #[test]
    fn test_alerts() {
        let summary = evaluate_alerts(Some(31.0), Some(600.0));
        assert_eq!(summary.text, "High Temp | High AQI");
        assert_eq!(summary.aqi, Some(ThresholdLevel::Alert));

        let summary = evaluate_alerts(Some(30.0), None);
        assert_eq!(summary.text, "Normal");
        assert_eq!(summary.temperature, Some(ThresholdLevel::Alert));
        assert_eq!(summary.aqi, None);
    }

    #[test]
    fn test_threshold_warning_band() {
        assert_eq!(ThresholdLevel::of(480.0, ALERT_AQI), ThresholdLevel::Warning);
        assert_eq!(ThresholdLevel::of(479.0, ALERT_AQI), ThresholdLevel::Normal);
    }

    #[test]
    fn test_update_status_next_fetch() {
        let status = UpdateStatus::from_last_reading(Some("28/09/2025 05:36:18".to_string()), 120);
        let next = status.next_fetch.unwrap();
        assert_eq!((next.hour(), next.minute()), (7, 36));

        let status = UpdateStatus::from_last_reading(Some("soon".to_string()), 120);
        assert_eq!(status.next_fetch, None);

        let status = UpdateStatus::from_last_reading(Some("28/09/2025 05:36:18".to_string()), i64::MAX);
        assert_eq!(status.next_fetch, None);
    }
}
