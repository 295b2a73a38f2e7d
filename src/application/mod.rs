// Application layer - Use cases over the record source
pub mod aggregator;
pub mod dashboard_service;
pub mod device_service;
pub mod poller;
pub mod record_source;
