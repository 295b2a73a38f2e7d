// Metric descriptors and column resolution
use super::record::ColumnCatalog;
use serde::Serialize;

/// Logical metrics charted on the dashboard, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Temperature,
    Humidity,
    Light,
    Aqi,
    DeviceHealth,
}

impl MetricKind {
    pub const ALL: [MetricKind; 5] = [
        MetricKind::Temperature,
        MetricKind::Humidity,
        MetricKind::Light,
        MetricKind::Aqi,
        MetricKind::DeviceHealth,
    ];

    /// Descriptors tried in order; the first one that resolves wins.
    pub fn descriptors(self) -> &'static [MetricDescriptor] {
        match self {
            MetricKind::Temperature => &[TEMPERATURE],
            MetricKind::Humidity => &[HUMIDITY],
            MetricKind::Light => &[LIGHT],
            MetricKind::Aqi => &[AQI],
            MetricKind::DeviceHealth => &DEVICE_HEALTH_CHAIN,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Temperature => "temperature",
            MetricKind::Humidity => "humidity",
            MetricKind::Light => "light",
            MetricKind::Aqi => "aqi",
            MetricKind::DeviceHealth => "device_health",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
    }

    /// Resolve the metric against a catalog, walking its descriptor chain.
    pub fn resolve(self, catalog: &ColumnCatalog) -> Option<String> {
        self.descriptors()
            .iter()
            .find_map(|descriptor| descriptor.resolve(catalog))
    }
}

/// A logical metric plus the ordered keywords used to find its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDescriptor {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

pub const TEMPERATURE: MetricDescriptor = MetricDescriptor {
    name: "Temperature",
    keywords: &["temperature"],
};

pub const HUMIDITY: MetricDescriptor = MetricDescriptor {
    name: "Humidity",
    keywords: &["humidity"],
};

pub const LIGHT: MetricDescriptor = MetricDescriptor {
    name: "Light",
    keywords: &["light"],
};

pub const AQI: MetricDescriptor = MetricDescriptor {
    name: "AQI",
    keywords: &["aqi"],
};

pub const DEVICE_HEALTH_CHAIN: [MetricDescriptor; 3] = [
    MetricDescriptor {
        name: "Heap",
        keywords: &["heap"],
    },
    MetricDescriptor {
        name: "Health",
        keywords: &["health"],
    },
    MetricDescriptor {
        name: "Device",
        keywords: &["device"],
    },
];

/// Columns that carry the reading time, used for labels and the date window.
pub const TIMESTAMP: MetricDescriptor = MetricDescriptor {
    name: "Timestamp",
    keywords: &["timestamp", "time", "date"],
};

/// Columns that identify the reporting device.
pub const DEVICE_ID: MetricDescriptor = MetricDescriptor {
    name: "Device ID",
    keywords: &["device_id", "device id", "deviceid"],
};

impl MetricDescriptor {
    /// First keyword first, then first matching column in catalog order.
    pub fn resolve(&self, catalog: &ColumnCatalog) -> Option<String> {
        for keyword in self.keywords {
            let keyword = keyword.to_lowercase();
            for column in catalog.iter() {
                if column.to_lowercase().contains(&keyword) {
                    tracing::trace!(metric = self.name, column, "Resolved column");
                    return Some(column.to_string());
                }
            }
        }
        None
    }
}

/// Display unit inferred from a resolved column title.
pub fn infer_unit(title: &str) -> &'static str {
    let lower = title.to_lowercase();
    if lower.contains("temp") {
        "°C"
    } else if lower.contains("humid") {
        "%"
    } else if lower.contains("light") {
        " Lux"
    } else {
        ""
    }
}
