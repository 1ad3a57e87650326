//! Frame ingestion loop.
//!
//! One dedicated execution context owns the bus driver, pulls frames with a
//! bounded timeout, routes them through the registry into the live state,
//! and optionally republishes every received frame on a bounded handoff
//! queue for independent consumers (raw logging, diagnostics).
//!
//! Firmware decides whether it wants the handoff by providing a
//! pre-allocated [`embassy_sync::channel::Channel`]. No allocation is
//! performed by the library and there is no dependency on a particular BSP.
use embassy_sync::{
    blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex},
    channel::{Channel, Receiver},
};
use embassy_time::Duration;

use crate::bus::frame::Frame;
use crate::bus::traits::{frame_source::FrameSource, timer::BusTimer};
use crate::schema::registry::Registry;
use crate::state::LiveState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Timing knobs of the ingestion loop.
pub struct IngestConfig {
    /// Upper bound on one blocking receive call.
    pub recv_timeout: Duration,
    /// Pause after a driver-level receive error before retrying.
    pub error_backoff: Duration,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            recv_timeout: Duration::from_millis(1_000),
            error_backoff: Duration::from_millis(100),
        }
    }
}

/// Assembles the ingestion components before splitting them apart.
pub struct IngestService<'a, C, T, M, S, const FRAME_CAP: usize>
where
    C: FrameSource,
    T: BusTimer,
    M: RawMutex,
    S: Copy + 'static,
{
    source: C,
    timer: T,
    registry: Registry<S>,
    state: &'a LiveState<M, S>,
    frame_channel: Option<&'a Channel<CriticalSectionRawMutex, Frame, FRAME_CAP>>,
    config: IngestConfig,
}

impl<'a, C, T, M, S, const FRAME_CAP: usize> IngestService<'a, C, T, M, S, FRAME_CAP>
where
    C: FrameSource,
    T: BusTimer,
    M: RawMutex,
    S: Copy + 'static,
{
    pub fn new(
        source: C,
        timer: T,
        registry: Registry<S>,
        state: &'a LiveState<M, S>,
        frame_channel: Option<&'a Channel<CriticalSectionRawMutex, Frame, FRAME_CAP>>,
        config: IngestConfig,
    ) -> Self {
        Self {
            source,
            timer,
            registry,
            state,
            frame_channel,
            config,
        }
    }

    /// Split into the raw-frame tap and the runner that must be driven.
    pub fn into_parts(self) -> IngestServiceParts<'a, C, T, M, S, FRAME_CAP> {
        let tap = self.frame_channel.map(|channel| FrameTap {
            receiver: channel.receiver(),
        });
        IngestServiceParts {
            tap,
            runner: IngestRunner {
                source: self.source,
                timer: self.timer,
                registry: self.registry,
                state: self.state,
                frame_channel: self.frame_channel,
                config: self.config,
            },
        }
    }
}

/// Bundle returned by [`IngestService::into_parts`].
pub struct IngestServiceParts<'a, C, T, M, S, const FRAME_CAP: usize>
where
    C: FrameSource,
    T: BusTimer,
    M: RawMutex,
    S: Copy + 'static,
{
    pub tap: Option<FrameTap<'a, FRAME_CAP>>,
    pub runner: IngestRunner<'a, C, T, M, S, FRAME_CAP>,
}

/// Consumer handle on the raw-frame handoff queue.
pub struct FrameTap<'a, const FRAME_CAP: usize> {
    receiver: Receiver<'a, CriticalSectionRawMutex, Frame, FRAME_CAP>,
}

impl<const FRAME_CAP: usize> FrameTap<'_, FRAME_CAP> {
    /// Wait for the next republished frame.
    pub async fn recv(&self) -> Frame {
        self.receiver.receive().await
    }

    /// Non-blocking poll of the queue.
    pub fn try_recv(&self) -> Option<Frame> {
        self.receiver.try_receive().ok()
    }
}

/// Runner that drives the ingestion loop.
pub struct IngestRunner<'a, C, T, M, S, const FRAME_CAP: usize>
where
    C: FrameSource,
    T: BusTimer,
    M: RawMutex,
    S: Copy + 'static,
{
    source: C,
    timer: T,
    registry: Registry<S>,
    state: &'a LiveState<M, S>,
    frame_channel: Option<&'a Channel<CriticalSectionRawMutex, Frame, FRAME_CAP>>,
    config: IngestConfig,
}

impl<C, T, M, S, const FRAME_CAP: usize> IngestRunner<'_, C, T, M, S, FRAME_CAP>
where
    C: FrameSource,
    T: BusTimer,
    M: RawMutex,
    S: Copy + 'static,
{
    /// Receive, dispatch, republish; forever.
    ///
    /// Frames are handled strictly in arrival order. A receive timeout is
    /// normal silence on the bus. A driver error is logged and retried
    /// after the configured backoff; the loop never terminates on it. The
    /// handoff enqueue never blocks: when the queue is full the newest
    /// frame is dropped, because ingestion latency outranks completeness
    /// of that side channel.
    pub async fn drive(mut self) {
        #[cfg(feature = "defmt")]
        defmt::info!("[ingest] loop started");

        loop {
            match self.source.recv(self.config.recv_timeout).await {
                Ok(Some(frame)) => {
                    self.registry.dispatch(&frame, self.state);

                    if let Some(channel) = self.frame_channel {
                        if channel.try_send(frame).is_err() {
                            #[cfg(feature = "defmt")]
                            defmt::trace!("[ingest] handoff queue full, frame dropped");
                        }
                    }
                }
                Ok(None) => {
                    // Timeout with no traffic. Block again.
                }
                Err(_err) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("[ingest] receive error: {}", defmt::Debug2Format(&_err));
                    let backoff_ms = self.config.error_backoff.as_millis() as u32;
                    self.timer.delay_ms(backoff_ms).await;
                }
            }
        }
    }
}
