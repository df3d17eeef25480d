// Domain layer - telemetry data, view state and its chart projection
pub mod chart;
pub mod dashboard;
pub mod reading;
pub mod view_state;
