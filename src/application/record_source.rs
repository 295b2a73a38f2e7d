// Source trait for upstream sensor data
use crate::domain::record::{ColumnCatalog, RecordSet};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Capture schedule reported by the device-management endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DeviceStatus {
    #[serde(default)]
    pub interval: Option<u32>,
    #[serde(default)]
    pub last_captured: Option<String>,
    #[serde(default)]
    pub next_capture: Option<String>,
}

#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Latest readings in arrival order
    async fn fetch_records(&self) -> anyhow::Result<RecordSet>;

    /// Column names known across the readings
    async fn fetch_columns(&self) -> anyhow::Result<ColumnCatalog>;

    /// Identifiers of every reporting device
    async fn list_devices(&self) -> anyhow::Result<Vec<String>>;

    async fn fetch_status(&self) -> anyhow::Result<DeviceStatus>;

    /// Change the capture interval of the devices, in minutes
    async fn set_interval(&self, minutes: u32) -> anyhow::Result<()>;

    /// Ask the devices to recalibrate their air-quality sensor
    async fn calibrate(&self) -> anyhow::Result<()>;
}
