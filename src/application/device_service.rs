// Device service - Use cases for listing devices and device management
use crate::application::record_source::{DeviceStatus, RecordSource};
use std::sync::Arc;

#[derive(Clone)]
pub struct DeviceService {
    source: Arc<dyn RecordSource>,
}

impl DeviceService {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }

    /// Device identifiers, deduplicated in the order the upstream reports them.
    pub async fn list_devices(&self) -> anyhow::Result<Vec<String>> {
        let ids = self.source.list_devices().await?;
        let mut devices: Vec<String> = Vec::with_capacity(ids.len());
        for id in ids.into_iter().map(|id| id.trim().to_string()) {
            if !id.is_empty() && !devices.contains(&id) {
                devices.push(id);
            }
        }
        Ok(devices)
    }

    pub async fn status(&self) -> anyhow::Result<DeviceStatus> {
        self.source.fetch_status().await
    }

    /// Fire-and-forget: the request runs in the background and failures are only logged.
    pub fn set_interval(&self, minutes: u32) {
        let source = self.source.clone();
        tokio::spawn(async move {
            match source.set_interval(minutes).await {
                Ok(()) => tracing::info!(minutes, "Capture interval updated"),
                Err(e) => tracing::warn!(minutes, error = %e, "Failed to update capture interval"),
            }
        });
    }

    /// Fire-and-forget, like [`DeviceService::set_interval`].
    pub fn calibrate(&self) {
        let source = self.source.clone();
        tokio::spawn(async move {
            match source.calibrate().await {
                Ok(()) => tracing::info!("Air-quality sensor calibration requested"),
                Err(e) => tracing::warn!(error = %e, "Failed to request calibration"),
            }
        });
    }
}
