// Presentation layer - HTTP routes, page markup and the update stream
pub mod app_state;
pub mod handlers;
pub mod page;
pub mod routes;
