// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::device_service::DeviceService;

#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
    pub device_service: DeviceService,
}
