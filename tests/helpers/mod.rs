/// Test doubles to simulate the bus driver and timer during integration tests.
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use embassy_time::Duration;
use tokio::time::{sleep, Duration as TokioDuration};
use vcu_dbc::bus::frame::Frame;
use vcu_dbc::bus::traits::{frame_source::FrameSource, timer::BusTimer};

#[allow(dead_code)]
/// One scripted outcome of a `recv` call.
pub enum SourceEvent {
    Frame(Frame),
    Timeout,
    Error(&'static str),
}

/// Frame source replaying a fixed script, then going silent.
pub struct ScriptedSource {
    events: VecDeque<SourceEvent>,
}

#[allow(dead_code)]
impl ScriptedSource {
    pub fn new(events: impl IntoIterator<Item = SourceEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

impl FrameSource for ScriptedSource {
    type Error = &'static str;

    async fn recv(&mut self, _timeout: Duration) -> Result<Option<Frame>, Self::Error> {
        match self.events.pop_front() {
            Some(SourceEvent::Frame(frame)) => Ok(Some(frame)),
            Some(SourceEvent::Timeout) => Ok(None),
            Some(SourceEvent::Error(message)) => Err(message),
            None => {
                // Script exhausted: behave like a quiet bus so the loop
                // parks on timeouts instead of spinning.
                sleep(TokioDuration::from_millis(10)).await;
                Ok(None)
            }
        }
    }
}

#[derive(Clone, Default)]
/// Timer that records requested backoff delays instead of sleeping them.
pub struct RecordingTimer {
    delays_ms: Arc<Mutex<Vec<u32>>>,
}

#[allow(dead_code)]
impl RecordingTimer {
    pub fn recorded(&self) -> Vec<u32> {
        self.delays_ms.lock().unwrap().clone()
    }
}

impl BusTimer for RecordingTimer {
    async fn delay_ms(&mut self, millis: u32) {
        self.delays_ms.lock().unwrap().push(millis);
        // Yield so the observing branch of the test gets to run.
        sleep(TokioDuration::from_millis(1)).await;
    }
}
