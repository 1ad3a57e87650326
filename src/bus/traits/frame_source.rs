//! Minimal abstraction over a receiving CAN transceiver driver. Allows the
//! ingestion loop to plug into various transports (TWAI, SocketCAN, mocks).
use embassy_time::Duration;

use crate::bus::frame::Frame;

/// Contract to pull raw frames from the bus with a bounded wait.
///
/// `recv` resolves to `Ok(Some(frame))` when a frame arrived within
/// `timeout`, `Ok(None)` when the timeout elapsed with no traffic, and
/// `Err` on a driver-level failure. The driver stamps `received_at` on each
/// frame it hands out; the library never reads the clock itself.
pub trait FrameSource {
    type Error: core::fmt::Debug;

    /// Wait up to `timeout` for the next frame.
    fn recv<'a>(
        &'a mut self,
        timeout: Duration,
    ) -> impl core::future::Future<Output = Result<Option<Frame>, Self::Error>> + 'a;
}
