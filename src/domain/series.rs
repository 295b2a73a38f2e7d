// Metric series domain model
use super::metric::infer_unit;
use super::record::SensorRecord;
use serde::{Serialize, Serializer};

pub const NO_DATA: &str = "no data";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SeriesError {
    #[error("missing metric: no record carries column {0:?}")]
    MissingMetric(String),
}

/// Most recent reading of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Latest {
    Value(f64),
    NoData,
}

impl Latest {
    pub fn value(self) -> Option<f64> {
        match self {
            Latest::Value(v) => Some(v),
            Latest::NoData => None,
        }
    }
}

impl Serialize for Latest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Latest::Value(v) => serializer.serialize_f64(*v),
            Latest::NoData => serializer.serialize_str(NO_DATA),
        }
    }
}

/// Chart-ready series for one metric. `values` and `labels` always have equal length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSeries {
    pub title: String,
    pub unit: String,
    pub values: Vec<Option<f64>>,
    pub labels: Vec<String>,
    pub latest: Latest,
}

impl MetricSeries {
    /// Build the series for `column` over already-filtered records.
    ///
    /// Labels come from `label_column` when given; a record without a label gets its
    /// 1-based position instead. Missing values stay `None` so charts render gaps.
    pub fn build(
        records: &[SensorRecord],
        column: &str,
        label_column: Option<&str>,
    ) -> Result<Self, SeriesError> {
        if column.is_empty() || (!records.is_empty() && !records.iter().any(|r| r.has_column(column))) {
            return Err(SeriesError::MissingMetric(column.to_string()));
        }

        let values: Vec<Option<f64>> = records.iter().map(|r| r.number(column)).collect();
        let labels: Vec<String> = records
            .iter()
            .enumerate()
            .map(|(i, r)| {
                label_column
                    .and_then(|label| r.text(label))
                    .unwrap_or_else(|| (i + 1).to_string())
            })
            .collect();

        let latest = values
            .iter()
            .rev()
            .find_map(|v| *v)
            .map(Latest::Value)
            .unwrap_or(Latest::NoData);

        Ok(Self {
            title: column.to_string(),
            unit: infer_unit(column).to_string(),
            values,
            labels,
            latest,
        })
    }
}
