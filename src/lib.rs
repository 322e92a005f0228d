// ShipSearch - lib.rs
//
// Library entry point, exposing the query engine, loader, exporter and
// configuration for the CLI and for integration testing.

pub mod app;
pub mod core;
pub mod platform;
pub mod ui;
pub mod util;
