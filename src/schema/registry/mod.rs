//! Message definition registry and the decode dispatcher.
//!
//! Hardware-level filtering is accept-all; every bit of selectivity lives
//! here. The registry is a static table of [`MessageDef`] entries matched by
//! exact (identifier, extended) equality. A sequential scan is deliberate:
//! real registries hold two entries.
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::Instant;

use crate::bus::frame::Frame;
use crate::error::RegistryError;
use crate::state::LiveState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Registry lookup key. Base and extended identifier spaces are disjoint.
pub struct MessageKey {
    pub id: u32,
    pub extended: bool,
}

/// Static description of one recognized message.
///
/// `S` is the state struct of the schema generation this definition belongs
/// to. The decode function is a pure payload transform: it reads only the
/// validated payload, builds the full value set for its message, and writes
/// it into its own slot of `S` as one assignment. It must never depend on
/// frames of a different message.
///
/// Decoders receive the frame's full zero-padded 8-byte buffer with at
/// least `min_len` valid bytes; bytes past the DLC read as zero, matching
/// the driver's zero-fill on reception.
pub struct MessageDef<S: 'static> {
    /// Message name, used in diagnostics only.
    pub name: &'static str,
    pub key: MessageKey,
    /// Frames with a DLC below this are dropped before the decoder runs.
    pub min_len: usize,
    pub decode: fn(payload: &[u8], received_at: Instant, state: &mut S),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// What the dispatcher did with a frame. Unknown traffic is expected and
/// not an error; only `TooShort` warrants a diagnostic.
pub enum DispatchOutcome {
    /// A definition matched and its decoder updated the state.
    Decoded { message: &'static str },
    /// No definition matched the (identifier, extended) pair.
    Unknown,
    /// Remote-request frame, dropped before lookup.
    Remote,
    /// A definition matched but the frame is shorter than it requires.
    TooShort {
        message: &'static str,
        len: usize,
        min_len: usize,
    },
}

/// Ordered set of message definitions for one schema generation.
pub struct Registry<S: 'static> {
    defs: &'static [MessageDef<S>],
}

impl<S: Copy> Registry<S> {
    /// Validate and wrap a definition table.
    ///
    /// Rejects duplicate (identifier, extended) keys: a duplicate means the
    /// deployment merged message sets from incompatible schema revisions,
    /// which must fail at startup rather than silently pick a layout.
    pub fn new(defs: &'static [MessageDef<S>]) -> Result<Self, RegistryError> {
        for (i, def) in defs.iter().enumerate() {
            if defs[..i].iter().any(|prior| prior.key == def.key) {
                return Err(RegistryError::DuplicateKey {
                    id: def.key.id,
                    extended: def.key.extended,
                });
            }
        }
        Ok(Self { defs })
    }

    /// Look up the definition for an (identifier, extended) pair.
    pub fn find(&self, id: u32, extended: bool) -> Option<&MessageDef<S>> {
        let key = MessageKey { id, extended };
        self.defs.iter().find(|def| def.key == key)
    }

    /// Route one frame: match, length-check, decode into the store.
    ///
    /// The decoder runs under the store lock, so the slot it writes becomes
    /// visible to readers as a whole. Decoders are short, allocation-free
    /// transforms, which keeps the critical section bounded.
    pub fn dispatch<M: RawMutex>(
        &self,
        frame: &Frame,
        state: &LiveState<M, S>,
    ) -> DispatchOutcome {
        if frame.remote {
            return DispatchOutcome::Remote;
        }

        let Some(def) = self.find(frame.id, frame.extended) else {
            return DispatchOutcome::Unknown;
        };

        if frame.len < def.min_len {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "[dbc] {}: DLC {} below minimum {}, frame dropped",
                def.name,
                frame.len,
                def.min_len
            );
            return DispatchOutcome::TooShort {
                message: def.name,
                len: frame.len,
                min_len: def.min_len,
            };
        }

        state.with_mut(|s| (def.decode)(&frame.data, frame.received_at, s));

        #[cfg(feature = "defmt")]
        defmt::trace!("[dbc] {} decoded", def.name);

        DispatchOutcome::Decoded { message: def.name }
    }
}
