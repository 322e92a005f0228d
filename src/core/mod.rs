// ShipSearch - core/mod.rs
//
// Core query-and-presentation engine.
// Pure logic over in-memory tables; writes only to caller-supplied writers.
// Must NOT depend on: ui, platform, app.

pub mod date;
pub mod export;
pub mod model;
pub mod policy;
pub mod present;
pub mod query;
