// HTTP request handlers
use crate::application::dashboard_service::{DashboardView, FocusView, RefreshOutcome, Selection};
use crate::application::record_source::DeviceStatus;
use crate::domain::filter::{DateRangePreset, DateWindow, DeviceFilter, DATE_RANGE_PRESETS};
use crate::domain::metric::MetricKind;
use crate::infrastructure::config::DashboardSettings;
use crate::presentation::app_state::AppState;
use crate::presentation::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub device: Option<String>,
    /// Trailing days, or "all". Absent means the configured default.
    pub days: Option<String>,
    pub focus: Option<String>,
}

impl DashboardQuery {
    fn selection(self, settings: &DashboardSettings) -> ApiResult<Selection> {
        let window = match self.days.as_deref().map(str::trim) {
            None | Some("") => DateWindow(settings.default_days),
            Some(days) if days.eq_ignore_ascii_case("all") => DateWindow::all_time(),
            Some(days) => days
                .parse::<u32>()
                .map(DateWindow::last_days)
                .map_err(|_| ApiError::BadRequest(format!("invalid days: {}", days)))?,
        };

        let focus = match self.focus.as_deref().filter(|f| !f.is_empty()) {
            Some(name) => Some(parse_metric(name)?),
            None => None,
        };

        Ok(Selection {
            device: DeviceFilter::from_param(self.device),
            window,
            focus,
        })
    }
}

fn parse_metric(name: &str) -> ApiResult<MetricKind> {
    MetricKind::from_name(name).ok_or_else(|| ApiError::NotFound(format!("unknown metric: {}", name)))
}

#[derive(Debug, Deserialize)]
pub struct IntervalRequest {
    pub minutes: u32,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub applied: bool,
    pub records: usize,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List all devices
pub async fn list_devices(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    match state.device_service.list_devices().await {
        Ok(devices) => Json(devices),
        Err(e) => {
            tracing::warn!(error = %e, "Error fetching devices");
            // Empty list keeps the selector rendered while waiting for data
            Json(Vec::new())
        }
    }
}

pub async fn date_ranges() -> Json<Vec<DateRangePreset>> {
    Json(DATE_RANGE_PRESETS.to_vec())
}

/// Dashboard for the selected device and date window
pub async fn get_dashboard(
    Query(query): Query<DashboardQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DashboardView>> {
    let selection = query.selection(state.dashboard_service.settings())?;
    Ok(Json(state.dashboard_service.dashboard(&selection).await))
}

/// Enlarged view of one metric
pub async fn get_focus(
    Path(metric): Path<String>,
    Query(query): Query<DashboardQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<FocusView>> {
    let metric = parse_metric(&metric)?;
    let selection = query.selection(state.dashboard_service.settings())?;

    state
        .dashboard_service
        .focus(&selection, metric)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no data for metric {}", metric.as_str())))
}

pub async fn refresh(State(state): State<Arc<AppState>>) -> ApiResult<Json<RefreshResponse>> {
    let response = match state.dashboard_service.refresh().await? {
        RefreshOutcome::Applied { records } => RefreshResponse {
            applied: true,
            records,
        },
        RefreshOutcome::Stale => RefreshResponse {
            applied: false,
            records: 0,
        },
    };
    Ok(Json(response))
}

pub async fn device_status(State(state): State<Arc<AppState>>) -> ApiResult<Json<DeviceStatus>> {
    Ok(Json(state.device_service.status().await?))
}

pub async fn set_interval(
    State(state): State<Arc<AppState>>,
    Json(request): Json<IntervalRequest>,
) -> ApiResult<StatusCode> {
    if request.minutes == 0 {
        return Err(ApiError::BadRequest("interval must be at least one minute".to_string()));
    }
    state.device_service.set_interval(request.minutes);
    Ok(StatusCode::ACCEPTED)
}

pub async fn calibrate(State(state): State<Arc<AppState>>) -> StatusCode {
    state.device_service.calibrate();
    StatusCode::ACCEPTED
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(device: Option<&str>, days: Option<&str>, focus: Option<&str>) -> DashboardQuery {
        DashboardQuery {
            device: device.map(str::to_string),
            days: days.map(str::to_string),
            focus: focus.map(str::to_string),
        }
    }

    #[test]
    fn test_selection_defaults() {
        let settings = DashboardSettings {
            default_days: Some(7),
            ..DashboardSettings::default()
        };

        let selection = DashboardQuery::default().selection(&settings).unwrap();
        assert_eq!(selection.window, DateWindow::last_days(7));
        assert_eq!(selection.device, DeviceFilter::default());
        assert_eq!(selection.focus, None);
    }

    #[test]
    fn test_selection_parses_params() {
        let settings = DashboardSettings::default();

        let selection = query(Some("farm-01"), Some("30"), Some("aqi")).selection(&settings).unwrap();
        assert_eq!(selection.device, DeviceFilter::device("farm-01"));
        assert_eq!(selection.window, DateWindow::last_days(30));
        assert_eq!(selection.focus, Some(MetricKind::Aqi));

        let selection = query(None, Some("all"), None).selection(&settings).unwrap();
        assert_eq!(selection.window, DateWindow::all_time());
    }

    #[test]
    fn test_selection_rejects_bad_params() {
        let settings = DashboardSettings::default();
        assert!(matches!(
            query(None, Some("week"), None).selection(&settings),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            query(None, None, Some("pressure")).selection(&settings),
            Err(ApiError::NotFound(_))
        ));
    }
}
