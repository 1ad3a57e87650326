//! End-to-end ingestion: scripted bus traffic through the loop into the
//! live state and the raw-frame handoff queue.
mod helpers;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Instant};
use helpers::{RecordingTimer, ScriptedSource, SourceEvent};
use static_cell::StaticCell;
use tokio::time::{sleep, Duration as TokioDuration};
use vcu_dbc::bus::frame::Frame;
use vcu_dbc::ingest::{IngestConfig, IngestService};
use vcu_dbc::schema::v3::{self, OperatingMode, V3State, AC_STATUS_ID, DISPLAY_STATUS_ID};
use vcu_dbc::state::LiveState;

fn status_frame(at_ms: u64) -> Frame {
    Frame::new(
        DISPLAY_STATUS_ID,
        true,
        &[50, 0x00, 0x00, 1, 10, 20, 0xE8, 0x03],
        Instant::from_millis(at_ms),
    )
    .unwrap()
}

fn ac_frame(at_ms: u64) -> Frame {
    Frame::new(
        AC_STATUS_ID,
        true,
        &[0xFD, 0x08, 0x3E, 0xFE],
        Instant::from_millis(at_ms),
    )
    .unwrap()
}

#[tokio::test]
async fn ingest_decodes_traffic_and_republishes_raw_frames() {
    static FRAME_CHANNEL: StaticCell<Channel<CriticalSectionRawMutex, Frame, 8>> =
        StaticCell::new();
    let frame_channel = FRAME_CHANNEL.init(Channel::new());

    let state: LiveState<CriticalSectionRawMutex, V3State> = LiveState::default();
    let unknown = Frame::new(0x42, false, &[1, 2, 3], Instant::from_millis(15)).unwrap();
    let source = ScriptedSource::new([
        SourceEvent::Frame(status_frame(10)),
        SourceEvent::Timeout,
        SourceEvent::Frame(unknown),
        SourceEvent::Frame(ac_frame(30)),
    ]);

    let service = IngestService::new(
        source,
        RecordingTimer::default(),
        v3::registry().unwrap(),
        &state,
        Some(frame_channel),
        IngestConfig::default(),
    );
    let parts = service.into_parts();
    let tap = parts.tap.expect("tap must exist when a channel is provided");
    let runner_future = parts.runner.drive();

    tokio::select! {
        _ = runner_future => {
            panic!("ingest loop ended unexpectedly");
        }
        _ = async {
            sleep(TokioDuration::from_millis(50)).await;

            let snapshot = state.snapshot();
            let status = snapshot.status.value().expect("status must be decoded");
            assert_eq!(status.soc_percent, 50);
            assert_eq!(status.mode, OperatingMode::Charge);
            assert_eq!(status.dc_power_w, 1000);
            assert_eq!(snapshot.status.updated_at(), Some(Instant::from_millis(10)));

            let ac = snapshot.ac_status.value().expect("AC status must be decoded");
            assert_eq!(ac.ac_power_w, -450);

            // Every received frame is republished, including unknown ids.
            assert_eq!(tap.recv().await.id, DISPLAY_STATUS_ID);
            assert_eq!(tap.recv().await.id, 0x42);
            assert_eq!(tap.recv().await.id, AC_STATUS_ID);
            assert!(tap.try_recv().is_none());
        } => {}
    }
}

#[tokio::test]
async fn ingest_drops_newest_frame_when_handoff_queue_is_full() {
    static FRAME_CHANNEL: StaticCell<Channel<CriticalSectionRawMutex, Frame, 2>> =
        StaticCell::new();
    let frame_channel = FRAME_CHANNEL.init(Channel::new());

    let state: LiveState<CriticalSectionRawMutex, V3State> = LiveState::default();
    let source = ScriptedSource::new([
        SourceEvent::Frame(status_frame(1)),
        SourceEvent::Frame(status_frame(2)),
        SourceEvent::Frame(status_frame(3)),
    ]);

    let service = IngestService::new(
        source,
        RecordingTimer::default(),
        v3::registry().unwrap(),
        &state,
        Some(frame_channel),
        IngestConfig::default(),
    );
    let parts = service.into_parts();
    let tap = parts.tap.unwrap();
    let runner_future = parts.runner.drive();

    tokio::select! {
        _ = runner_future => panic!("ingest loop ended unexpectedly"),
        _ = async {
            sleep(TokioDuration::from_millis(50)).await;

            // The queue held two frames; the third (newest) was dropped.
            assert_eq!(tap.recv().await.received_at, Instant::from_millis(1));
            assert_eq!(tap.recv().await.received_at, Instant::from_millis(2));
            assert!(tap.try_recv().is_none());

            // Decoding was not throttled by the full queue: the state
            // reflects the last frame.
            assert_eq!(
                state.snapshot().status.updated_at(),
                Some(Instant::from_millis(3))
            );
        } => {}
    }
}

#[tokio::test]
async fn ingest_backs_off_on_driver_errors_and_keeps_running() {
    let state: LiveState<CriticalSectionRawMutex, V3State> = LiveState::default();
    let source = ScriptedSource::new([
        SourceEvent::Error("bus off"),
        SourceEvent::Error("bus off"),
        SourceEvent::Frame(status_frame(40)),
    ]);
    let timer = RecordingTimer::default();
    let timer_probe = timer.clone();

    let config = IngestConfig {
        recv_timeout: Duration::from_millis(1_000),
        error_backoff: Duration::from_millis(100),
    };
    let service = IngestService::<_, _, _, _, 0>::new(
        source,
        timer,
        v3::registry().unwrap(),
        &state,
        None,
        config,
    );
    let parts = service.into_parts();
    assert!(parts.tap.is_none());
    let runner_future = parts.runner.drive();

    tokio::select! {
        _ = runner_future => panic!("ingest loop ended unexpectedly"),
        _ = async {
            sleep(TokioDuration::from_millis(50)).await;

            // Two transient errors, each followed by the configured backoff,
            // then normal decoding resumed.
            assert_eq!(timer_probe.recorded(), vec![100, 100]);
            assert_eq!(
                state.snapshot().status.updated_at(),
                Some(Instant::from_millis(40))
            );
        } => {}
    }
}

#[tokio::test]
async fn reader_side_staleness_policy() {
    let state: LiveState<CriticalSectionRawMutex, V3State> = LiveState::default();
    let source = ScriptedSource::new([SourceEvent::Frame(status_frame(1_000))]);

    let service = IngestService::<_, _, _, _, 0>::new(
        source,
        RecordingTimer::default(),
        v3::registry().unwrap(),
        &state,
        None,
        IngestConfig::default(),
    );
    let runner_future = service.into_parts().runner.drive();

    tokio::select! {
        _ = runner_future => panic!("ingest loop ended unexpectedly"),
        _ = async {
            sleep(TokioDuration::from_millis(50)).await;

            let snapshot = state.snapshot();
            let max_age = Duration::from_millis(500);

            // Fresh shortly after reception, stale past the display's
            // chosen max age, and "no data" for the never-seen message.
            assert!(snapshot.status.is_fresh(Instant::from_millis(1_200), max_age));
            assert!(!snapshot.status.is_fresh(Instant::from_millis(2_000), max_age));
            assert!(!snapshot.ac_status.is_fresh(Instant::from_millis(1_200), max_age));
            assert_eq!(snapshot.ac_status.value(), None);
        } => {}
    }
}
