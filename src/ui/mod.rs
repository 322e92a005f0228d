// ShipSearch - ui/mod.rs
//
// UI layer: terminal presentation only.
// Dependencies: app (pipeline responses), core (read-only models).
// Must NOT depend on: platform, direct I/O beyond the writer it is given.

pub mod text_table;
