//! `vcu-dbc` library: fixed-schema CAN decoding for VCU-driven battery
//! display panels in a `no_std` environment. The crate exposes the bus
//! primitives (frame type, source/timer traits), the versioned message
//! registry with its decoders, the live telemetry state store, and the
//! ingestion loop tying them together.
#![no_std]
//==================================================================================
/// Raw frame representation and the traits the bus driver must provide.
pub mod bus;
/// Domain errors (registry construction, frame construction).
pub mod error;
/// Frame ingestion loop and the bounded raw-frame handoff queue.
pub mod ingest;
/// Versioned message schema: signal values, registry, and the three
/// wire generations of the VCU display message set.
pub mod schema;
/// Live telemetry state store with per-slot freshness tracking.
pub mod state;
//==================================================================================
