// Dashboard service - Use case for building dashboards from the latest snapshot
use crate::application::aggregator::aggregate;
use crate::application::record_source::RecordSource;
use crate::domain::dashboard::Dashboard;
use crate::domain::filter::{
    filter_records, keep_most_recent, sort_chronologically, DateWindow, DeviceFilter, FilterColumns,
};
use crate::domain::metric::MetricKind;
use crate::domain::record::{ColumnCatalog, RecordSet};
use crate::domain::series::MetricSeries;
use crate::domain::summary::{evaluate_alerts, parameter_table, AlertSummary, ParameterRow, UpdateStatus};
use crate::domain::timestamp::short_axis_label;
use crate::infrastructure::config::DashboardSettings;
use chrono::{DateTime, Local, NaiveDateTime};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Records and columns from one successful fetch. Replaced wholesale, never patched.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub records: RecordSet,
    pub catalog: ColumnCatalog,
    pub generation: u64,
    pub fetched_at: Option<DateTime<Local>>,
}

/// What the user is looking at.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub device: DeviceFilter,
    pub window: DateWindow,
    pub focus: Option<MetricKind>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub device: Option<String>,
    pub days: Option<u32>,
    pub record_count: usize,
    pub fetched_at: Option<DateTime<Local>>,
    #[serde(flatten)]
    pub dashboard: Dashboard,
    pub parameters: Vec<ParameterRow>,
    pub alerts: AlertSummary,
    pub update: UpdateStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct FocusView {
    pub metric: MetricKind,
    #[serde(flatten)]
    pub series: MetricSeries,
    pub axis_labels: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied { records: usize },
    /// A newer fetch was started while this one was in flight.
    Stale,
}

#[derive(Clone)]
pub struct DashboardService {
    source: Arc<dyn RecordSource>,
    settings: DashboardSettings,
    snapshot: Arc<RwLock<Arc<Snapshot>>>,
    generation: Arc<AtomicU64>,
}

impl DashboardService {
    pub fn new(source: Arc<dyn RecordSource>, settings: DashboardSettings) -> Self {
        Self {
            source,
            settings,
            snapshot: Arc::new(RwLock::new(Arc::new(Snapshot::default()))),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    /// Refetch records and columns. Only the most recently started fetch may commit.
    pub async fn refresh(&self) -> anyhow::Result<RefreshOutcome> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(generation = ticket, "Fetching sensor records");

        let mut records = self.source.fetch_records().await?;
        let catalog = match self.source.fetch_columns().await {
            Ok(catalog) if !catalog.is_empty() => catalog,
            Ok(_) => ColumnCatalog::from_records(&records),
            Err(e) => {
                tracing::warn!(error = %e, "Column catalog unavailable, deriving it from records");
                ColumnCatalog::from_records(&records)
            }
        };

        keep_most_recent(&mut records, self.settings.max_records);
        if self.settings.sort_chronologically {
            if let Some(column) = FilterColumns::resolve(&catalog).timestamp {
                sort_chronologically(&mut records, &column);
            }
        }

        let snapshot = Snapshot {
            records,
            catalog,
            generation: ticket,
            fetched_at: Some(Local::now()),
        };
        Ok(self.commit(snapshot).await)
    }

    async fn commit(&self, snapshot: Snapshot) -> RefreshOutcome {
        let mut current = self.snapshot.write().await;
        let latest = self.generation.load(Ordering::SeqCst);
        if snapshot.generation != latest {
            tracing::debug!(
                generation = snapshot.generation,
                latest,
                "Discarding records from a superseded fetch"
            );
            return RefreshOutcome::Stale;
        }

        let records = snapshot.records.len();
        tracing::info!(
            generation = snapshot.generation,
            records,
            columns = snapshot.catalog.len(),
            "Sensor snapshot updated"
        );
        *current = Arc::new(snapshot);
        RefreshOutcome::Applied { records }
    }

    pub async fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.read().await.clone()
    }

    /// Build the full dashboard for a selection from the current snapshot.
    pub async fn dashboard(&self, selection: &Selection) -> DashboardView {
        let snapshot = self.snapshot().await;
        self.build_view(&snapshot, selection, Local::now().naive_local())
    }

    /// Enlarged view of a single metric, if it resolved for this selection.
    pub async fn focus(&self, selection: &Selection, metric: MetricKind) -> Option<FocusView> {
        let snapshot = self.snapshot().await;
        let records = self.filtered(&snapshot, selection, Local::now().naive_local());
        let dashboard = aggregate(&records, &snapshot.catalog).with_focus(Some(metric));
        let (metric, series) = dashboard.focused()?;

        Some(FocusView {
            metric,
            axis_labels: series.labels.iter().map(|l| short_axis_label(l)).collect(),
            series: series.clone(),
        })
    }

    fn filtered(&self, snapshot: &Snapshot, selection: &Selection, now: NaiveDateTime) -> RecordSet {
        let columns = FilterColumns::resolve(&snapshot.catalog);
        filter_records(&snapshot.records, &columns, &selection.device, selection.window, now)
    }

    fn build_view(&self, snapshot: &Snapshot, selection: &Selection, now: NaiveDateTime) -> DashboardView {
        let records = self.filtered(snapshot, selection, now);
        let dashboard = aggregate(&records, &snapshot.catalog).with_focus(selection.focus);
        if dashboard.is_empty() {
            tracing::debug!(
                device = ?selection.device.0,
                days = ?selection.window.0,
                records = records.len(),
                "No metrics for selection"
            );
        }

        let parameters = records
            .last()
            .map(|latest| parameter_table(latest, &snapshot.catalog))
            .unwrap_or_default();

        let latest_of = |kind| dashboard.get(kind).and_then(|s: &MetricSeries| s.latest.value());
        let alerts = evaluate_alerts(latest_of(MetricKind::Temperature), latest_of(MetricKind::Aqi));

        let last_reading = FilterColumns::resolve(&snapshot.catalog)
            .timestamp
            .and_then(|column| records.last().and_then(|r| r.text(&column)));
        let update = UpdateStatus::from_last_reading(last_reading, self.settings.next_fetch_minutes);

        DashboardView {
            device: selection.device.0.clone(),
            days: selection.window.0,
            record_count: records.len(),
            fetched_at: snapshot.fetched_at,
            dashboard,
            parameters,
            alerts,
            update,
        }
    }
}
