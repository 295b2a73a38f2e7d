// Domain layer - Sensor records and the metric pipeline's pure types
pub mod dashboard;
pub mod filter;
pub mod metric;
pub mod record;
pub mod series;
pub mod summary;
pub mod timestamp;
