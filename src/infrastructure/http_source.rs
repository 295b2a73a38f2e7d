// HTTP record source - talks to the upstream sensor data API
use crate::application::record_source::{DeviceStatus, RecordSource};
use crate::domain::record::{ColumnCatalog, RecordSet};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpRecordSource {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ColumnsResponse {
    #[serde(default)]
    columns: Vec<String>,
}

/// The devices endpoint answers either a bare array or `{"devices": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DevicesResponse {
    List(Vec<serde_json::Value>),
    Wrapped {
        #[serde(default)]
        devices: Vec<serde_json::Value>,
    },
}

impl DevicesResponse {
    fn into_ids(self) -> Vec<String> {
        let values = match self {
            DevicesResponse::List(values) => values,
            DevicesResponse::Wrapped { devices } => devices,
        };
        values
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(s),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect()
    }
}

impl HttpRecordSource {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(%url, "Fetching from upstream");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Upstream request {} failed with status {}: {}", path, status, body);
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse upstream response from {}", path))
    }

    async fn post_json(&self, path: &str, body: serde_json::Value) -> Result<()> {
        let url = self.url(path);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Upstream request {} failed with status {}: {}", path, status, body);
        }

        Ok(())
    }
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    async fn fetch_records(&self) -> Result<RecordSet> {
        // Upstream may answer `null` when its log is empty.
        let records: Option<RecordSet> = self.get_json("data/json").await?;
        Ok(records.unwrap_or_default())
    }

    async fn fetch_columns(&self) -> Result<ColumnCatalog> {
        let response: ColumnsResponse = self.get_json("data/columns").await?;
        Ok(ColumnCatalog::new(response.columns))
    }

    async fn list_devices(&self) -> Result<Vec<String>> {
        let response: DevicesResponse = self.get_json("devices").await?;
        Ok(response.into_ids())
    }

    async fn fetch_status(&self) -> Result<DeviceStatus> {
        self.get_json("status").await
    }

    async fn set_interval(&self, minutes: u32) -> Result<()> {
        self.post_json("control/interval", serde_json::json!({ "interval": minutes }))
            .await
    }

    async fn calibrate(&self) -> Result<()> {
        self.post_json("control/calibrate", serde_json::json!({})).await
    }
}
