//! Bus-facing primitives: the in-memory frame representation and the
//! contracts a transceiver driver must fulfil to feed the ingestion loop.
pub mod frame;
pub mod traits;
