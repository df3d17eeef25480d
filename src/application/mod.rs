// Application layer - the polling view and the services built on it
pub mod dashboard_service;
pub mod polling_view;
pub mod telemetry_source;
