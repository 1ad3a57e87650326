//! In-memory representation of a classic CAN frame as read from the bus.
use embassy_time::Instant;
use embedded_can::Id;

use crate::error::FrameError;

/// Classic CAN payload limit in bytes.
pub const MAX_FRAME_PAYLOAD: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Raw CAN frame plus its arrival timestamp.
///
/// Frames are plain values: the driver copies hardware data into a `Frame`
/// once, and every hop after that (dispatch, handoff queue) copies the value
/// again. Nothing is ever shared by reference across an execution context.
pub struct Frame {
    /// Raw identifier: 11 bits for base frames, 29 bits for extended ones.
    pub id: u32,
    /// Extended (29-bit) identifier flag.
    pub extended: bool,
    /// Remote transmission request flag. RTR frames carry no payload.
    pub remote: bool,
    /// Payload buffer. Bytes past `len` are zeroed.
    pub data: [u8; MAX_FRAME_PAYLOAD],
    /// Number of valid payload bytes (Data Length Code, 0 to 8).
    pub len: usize,
    /// Monotonic timestamp taken by the driver when the frame arrived.
    pub received_at: Instant,
}

impl Frame {
    /// Build a data frame from a payload slice.
    pub fn new(
        id: u32,
        extended: bool,
        payload: &[u8],
        received_at: Instant,
    ) -> Result<Self, FrameError> {
        if payload.len() > MAX_FRAME_PAYLOAD {
            return Err(FrameError::PayloadTooLong { len: payload.len() });
        }
        let mut data = [0u8; MAX_FRAME_PAYLOAD];
        data[..payload.len()].copy_from_slice(payload);
        Ok(Self {
            id,
            extended,
            remote: false,
            data,
            len: payload.len(),
            received_at,
        })
    }

    /// Build a remote-request frame. Its DLC is advisory and its payload empty.
    pub fn remote(id: u32, extended: bool, received_at: Instant) -> Self {
        Self {
            id,
            extended,
            remote: true,
            data: [0u8; MAX_FRAME_PAYLOAD],
            len: 0,
            received_at,
        }
    }

    /// Build a data frame from an [`embedded_can::Id`], the seam most Rust
    /// CAN drivers expose.
    pub fn from_can_id(
        id: Id,
        payload: &[u8],
        received_at: Instant,
    ) -> Result<Self, FrameError> {
        let (raw, extended) = match id {
            Id::Standard(id) => (id.as_raw() as u32, false),
            Id::Extended(id) => (id.as_raw(), true),
        };
        Self::new(raw, extended, payload, received_at)
    }

    /// Immutable view over the valid payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len]
    }
}
