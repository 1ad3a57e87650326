//! Contracts between the library and the platform: frame reception and
//! delay primitives. Implementations live in the firmware, not here.
pub mod frame_source;
pub mod timer;
