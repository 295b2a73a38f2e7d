// Dashboard domain model
use super::metric::MetricKind;
use super::series::MetricSeries;
use serde::Serialize;
use std::collections::BTreeMap;

/// Every metric that resolved for one render pass, plus the metric focused for detail view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dashboard {
    pub metrics: BTreeMap<MetricKind, MetricSeries>,
    pub focus: Option<MetricKind>,
}

impl Dashboard {
    pub fn new(metrics: BTreeMap<MetricKind, MetricSeries>) -> Self {
        Self {
            metrics,
            focus: None,
        }
    }

    /// Select the metric shown enlarged. Selecting a metric that did not resolve clears focus.
    pub fn with_focus(mut self, focus: Option<MetricKind>) -> Self {
        self.focus = focus.filter(|kind| self.metrics.contains_key(kind));
        self
    }

    pub fn focused(&self) -> Option<(MetricKind, &MetricSeries)> {
        let kind = self.focus?;
        self.metrics.get(&kind).map(|series| (kind, series))
    }

    pub fn get(&self, kind: MetricKind) -> Option<&MetricSeries> {
        self.metrics.get(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}
