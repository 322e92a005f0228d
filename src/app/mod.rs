// ShipSearch - app/mod.rs
//
// Application layer: dataset loading, caching, the query pipeline and
// interactive session state.
// Dependencies: core layer, util.
// Must NOT depend on: ui.

pub mod cache;
pub mod loader;
pub mod pipeline;
pub mod session;
