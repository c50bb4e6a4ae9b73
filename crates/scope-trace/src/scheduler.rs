//! 60Hz render scheduler
//!
//! A dedicated thread drives the read -> locate -> sample pipeline at a
//! fixed rate and publishes finished trace frames over a plain mpsc channel
//! for whatever front end cares to poll it. Ticks are skipped - not errored -
//! while the display is hidden or has never been given a viewport, so the
//! scheduler can be started before layout without wasted work.
//!
//! Teardown contract: call [`SchedulerHandle::stop`] (or drop the handle)
//! before the session that owns the capture buffer ends. The buffer must
//! not be replaced or resized while the scheduler runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use scope_core::capture::CaptureBuffer;

use crate::command::{command_channel, TraceCommand, TraceControls};
use crate::display::{DisplayConfig, Viewport};
use crate::pipeline::TracePipeline;
use crate::trace::ChannelTrace;

/// Render tick rate
pub const TICK_HZ: u32 = 60;

/// One published render pass: every channel's polyline plus a tick counter
/// (monotonic over the scheduler's lifetime, counting rendered ticks only).
#[derive(Debug, Clone)]
pub struct TraceFrame {
    pub tick: u64,
    pub traces: Vec<ChannelTrace>,
}

/// Everything `start` hands back: the thread handle, the control surface,
/// and the frame stream.
pub struct RenderScheduler {
    pub handle: SchedulerHandle,
    pub controls: TraceControls,
    pub frames: mpsc::Receiver<TraceFrame>,
}

impl RenderScheduler {
    /// Spawn the render thread against a capture buffer.
    ///
    /// The thread starts idle: no frame is produced until the display is
    /// visible (default) AND a viewport has been set at least once.
    pub fn start(buffer: Arc<CaptureBuffer>) -> RenderScheduler {
        let (command_tx, mut command_rx) = command_channel();
        let (frame_tx, frame_rx) = mpsc::channel();
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = Arc::clone(&shutdown);

        let thread = thread::Builder::new()
            .name("scope-render".to_string())
            .spawn(move || {
                let tick_period = Duration::from_secs_f64(1.0 / TICK_HZ as f64);
                let mut pipeline = TracePipeline::new(buffer);
                let mut config = DisplayConfig::default();
                let mut viewport = Viewport::default();
                let mut visible = true;
                let mut tick: u64 = 0;
                let mut receiver_gone = false;

                log::info!("Render scheduler started at {}Hz", TICK_HZ);

                while !shutdown_flag.load(Ordering::Relaxed) {
                    let tick_start = Instant::now();

                    while let Ok(command) = command_rx.pop() {
                        apply_command(command, &mut config, &mut viewport, &mut visible);
                    }

                    // Never render before the first layout: a zero viewport
                    // stays zero until SetViewport arrives.
                    if visible && viewport.is_drawable() {
                        let traces = pipeline.render(&config, viewport);
                        tick += 1;

                        if !receiver_gone {
                            let frame = TraceFrame {
                                tick,
                                traces: traces.to_vec(),
                            };
                            if frame_tx.send(frame).is_err() {
                                receiver_gone = true;
                                log::debug!("Frame receiver dropped, discarding traces");
                            }
                        }
                    }

                    let elapsed = tick_start.elapsed();
                    if elapsed < tick_period {
                        thread::sleep(tick_period - elapsed);
                    }
                }

                log::info!("Render scheduler stopped after {} ticks", tick);
            })
            .expect("failed to spawn render thread");

        RenderScheduler {
            handle: SchedulerHandle {
                shutdown,
                thread: Some(thread),
            },
            controls: TraceControls::new(command_tx),
            frames: frame_rx,
        }
    }
}

fn apply_command(
    command: TraceCommand,
    config: &mut DisplayConfig,
    viewport: &mut Viewport,
    visible: &mut bool,
) {
    match command {
        TraceCommand::SetTimeScale(scale) => config.set_time_scale(scale),
        TraceCommand::SetAmplitudeScale(scale) => config.set_amplitude_scale(scale),
        TraceCommand::SetTriggerLevel(level) => config.set_trigger_level(level),
        TraceCommand::SetTriggerEnabled(enabled) => config.trigger_enabled = enabled,
        TraceCommand::SetChannelMode(mode) => config.channel_mode = mode,
        TraceCommand::SetFrozen(frozen) => config.frozen = frozen,
        TraceCommand::SetViewport { width, height } => {
            *viewport = Viewport::new(width, height);
        }
        TraceCommand::SetVisible(shown) => *visible = shown,
    }
}

/// Owns the render thread; stopping signals shutdown and joins.
pub struct SchedulerHandle {
    shutdown: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Signal the render thread and wait for it to exit.
    pub fn stop(mut self) {
        self.shutdown_and_join();
    }

    fn shutdown_and_join(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("Render thread panicked");
            }
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.shutdown_and_join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scope_core::types::{ScopeChannel, NUM_SCOPE_CHANNELS};

    fn test_buffer() -> Arc<CaptureBuffer> {
        let buffer = Arc::new(CaptureBuffer::new(64));
        for k in 0..64 {
            let v = if k % 8 < 4 { -0.5 } else { 0.5 };
            buffer.write(ScopeChannel::Left, v);
            buffer.write(ScopeChannel::Right, v);
        }
        buffer
    }

    #[test]
    fn test_no_frames_before_first_viewport() {
        let scheduler = RenderScheduler::start(test_buffer());

        // A few tick periods pass with no layout: nothing may be published.
        thread::sleep(Duration::from_millis(80));
        assert!(scheduler.frames.try_recv().is_err());

        scheduler.handle.stop();
    }

    #[test]
    fn test_frames_flow_once_sized() {
        let mut scheduler = RenderScheduler::start(test_buffer());
        scheduler.controls.set_viewport(64.0, 32.0);

        let frame = scheduler
            .frames
            .recv_timeout(Duration::from_secs(2))
            .expect("expected a frame after viewport was set");

        assert_eq!(frame.traces.len(), NUM_SCOPE_CHANNELS);
        assert!(!frame.traces[0].points.is_empty());
        assert!(frame.tick >= 1);

        scheduler.handle.stop();
    }

    #[test]
    fn test_hidden_display_skips_ticks() {
        let mut scheduler = RenderScheduler::start(test_buffer());
        scheduler.controls.set_viewport(64.0, 32.0);
        // Wait for rendering to start, then hide and drain.
        scheduler
            .frames
            .recv_timeout(Duration::from_secs(2))
            .expect("expected a frame before hiding");
        scheduler.controls.set_visible(false);

        thread::sleep(Duration::from_millis(100));
        while scheduler.frames.try_recv().is_ok() {}
        thread::sleep(Duration::from_millis(80));
        assert!(scheduler.frames.try_recv().is_err());

        scheduler.handle.stop();
    }

    #[test]
    fn test_stop_joins_cleanly() {
        let scheduler = RenderScheduler::start(test_buffer());
        scheduler.handle.stop();
    }

    #[test]
    fn test_dropped_receiver_does_not_kill_thread() {
        let mut scheduler = RenderScheduler::start(test_buffer());
        scheduler.controls.set_viewport(32.0, 16.0);
        drop(scheduler.frames);

        thread::sleep(Duration::from_millis(80));
        // Still running and responsive to commands.
        scheduler.controls.set_frozen(true);
        scheduler.handle.stop();
    }
}
