//! The "DBC": the closed set of VCU display messages this panel understands.
//!
//! Three incompatible wire generations of the same message set exist in the
//! field. Each lives in its own module with its own state type, so exactly
//! one generation is selected at build time and definitions from different
//! generations can never end up in the same registry.
pub mod registry;
pub mod signal;
pub mod v1;
pub mod v2;
pub mod v3;
