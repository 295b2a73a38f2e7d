// Dashboard aggregation - resolve and build every metric from one filtered record set
use crate::domain::dashboard::Dashboard;
use crate::domain::metric::{MetricKind, TIMESTAMP};
use crate::domain::record::{ColumnCatalog, SensorRecord};
use crate::domain::series::MetricSeries;
use std::collections::BTreeMap;

/// Build a series for every metric that resolves against `catalog`.
///
/// Metrics that do not resolve are left out of the map. An empty record set is
/// "no data" and yields an empty dashboard.
pub fn aggregate(records: &[SensorRecord], catalog: &ColumnCatalog) -> Dashboard {
    if records.is_empty() {
        return Dashboard::default();
    }

    let label_column = TIMESTAMP.resolve(catalog);
    let mut metrics = BTreeMap::new();

    for kind in MetricKind::ALL {
        let Some(column) = kind.resolve(catalog) else {
            tracing::debug!(metric = kind.as_str(), "No column matches metric, skipping");
            continue;
        };

        match MetricSeries::build(records, &column, label_column.as_deref()) {
            Ok(series) => {
                metrics.insert(kind, series);
            }
            Err(e) => {
                tracing::debug!(metric = kind.as_str(), error = %e, "Skipping metric");
            }
        }
    }

    Dashboard::new(metrics)
}
