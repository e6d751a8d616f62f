//! The producer worker.
//!
//! One task owns the coordinator and the drawing engine and runs the whole
//! per-frame pipeline. Consumers never touch the live canvas: after each
//! frame or control the worker publishes an immutable [`PublishedFrame`]
//! into a single latest-wins slot, and readers take whatever is newest.
//! A slow reader simply misses intermediate frames.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use airsketch_common::clock::{FpsMeter, SessionClock};
use airsketch_common::config::SessionConfig;
use airsketch_common::error::{SketchError, SketchResult};
use airsketch_render_engine::{DrawingEngine, PixelBuffer, VideoFrame};
use airsketch_sketch_model::geometry::Rgb;
use airsketch_sketch_model::landmark::FrameObservations;

use crate::control::{apply_control, Control};
use crate::coordinator::{DualHandCoordinator, FrameReport};

/// Capacity of the observation queue between the caller and the worker.
const INPUT_QUEUE: usize = 4;

/// How often an idle worker checks its stop flag.
const STOP_POLL: tokio::time::Duration = tokio::time::Duration::from_millis(10);

/// One frame of input: hand observations plus the camera frame they were
/// detected in, if the caller wants a composited output.
#[derive(Debug, Clone)]
pub struct WorkerInput {
    pub observations: FrameObservations,
    pub frame: Option<VideoFrame>,
}

/// The newest pipeline output, shared read-only with consumers.
#[derive(Debug, Clone)]
pub struct PublishedFrame {
    /// Increments on every publication.
    pub sequence: u64,
    pub report: FrameReport,
    /// Canvas over the last camera frame, when one was supplied.
    pub composited: Option<VideoFrame>,
    pub canvas: Arc<PixelBuffer>,
    pub fps: f64,
    pub color: Rgb,
    pub brush_width: u32,
    pub undo_depth: usize,
    pub redo_depth: usize,
}

/// Latest-wins publication slot.
#[derive(Debug, Clone, Default)]
pub struct LatestFrame {
    inner: Arc<Mutex<Option<Arc<PublishedFrame>>>>,
}

impl LatestFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the published value.
    pub fn publish(&self, frame: Arc<PublishedFrame>) {
        match self.inner.lock() {
            Ok(mut slot) => *slot = Some(frame),
            Err(poisoned) => *poisoned.into_inner() = Some(frame),
        }
    }

    /// The newest published value, if any.
    pub fn latest(&self) -> Option<Arc<PublishedFrame>> {
        match self.inner.lock() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

/// Totals reported when the worker stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub frames: u64,
    pub controls: u64,
    pub commands_applied: u64,
    pub commands_discarded: u64,
    pub dropped_observations: u64,
}

/// State of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Running,
    Stopped,
}

/// The single producer: serializes frames and controls against the canvas.
pub struct SketchWorker {
    coordinator: DualHandCoordinator,
    engine: DrawingEngine,
    clock: SessionClock,
    fps: FpsMeter,
    latest: LatestFrame,
    stop_flag: Arc<AtomicBool>,
    state: WorkerState,
    sequence: u64,
    last_report: FrameReport,
    last_frame: Option<VideoFrame>,
    stats: WorkerStats,
}

impl SketchWorker {
    /// Build a worker. Fails fast on an invalid configuration.
    pub fn new(config: &SessionConfig) -> SketchResult<Self> {
        config.validate()?;
        Ok(Self {
            coordinator: DualHandCoordinator::new(config),
            engine: DrawingEngine::from_config(config),
            clock: SessionClock::start(),
            fps: FpsMeter::default(),
            latest: LatestFrame::new(),
            stop_flag: Arc::new(AtomicBool::new(false)),
            state: WorkerState::Idle,
            sequence: 0,
            last_report: FrameReport::default(),
            last_frame: None,
            stats: WorkerStats::default(),
        })
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Publication slot readers should poll.
    pub fn latest(&self) -> LatestFrame {
        self.latest.clone()
    }

    /// Get the stop flag for external coordination.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    pub fn engine(&self) -> &DrawingEngine {
        &self.engine
    }

    pub fn coordinator(&self) -> &DualHandCoordinator {
        &self.coordinator
    }

    pub fn stats(&self) -> WorkerStats {
        self.stats
    }

    /// Run one frame through the pipeline and publish the result.
    pub fn process(&mut self, input: WorkerInput) -> Arc<PublishedFrame> {
        let fps = self.fps.tick(self.clock.elapsed_secs());
        let report = self
            .coordinator
            .process(&input.observations, &mut self.engine);

        self.stats.frames += 1;
        self.stats.commands_applied += report.commands.len() as u64;
        self.stats.commands_discarded += report.discarded_commands as u64;
        self.stats.dropped_observations += report.dropped_observations as u64;

        self.last_report = report;
        if input.frame.is_some() {
            self.last_frame = input.frame;
        }
        tracing::trace!(sequence = self.sequence, fps, "Frame processed");
        self.publish(fps)
    }

    /// Apply a control between frames and publish the result.
    pub fn control(&mut self, control: Control) -> Arc<PublishedFrame> {
        apply_control(control, &mut self.engine, &mut self.coordinator);
        self.stats.controls += 1;
        self.publish(self.fps.fps())
    }

    /// Consume inputs and controls until the input channel closes or the
    /// stop flag is set. Per-hand state is discarded on exit.
    pub async fn run(
        &mut self,
        mut inputs: mpsc::Receiver<WorkerInput>,
        mut controls: mpsc::UnboundedReceiver<Control>,
    ) -> SketchResult<WorkerStats> {
        if self.state == WorkerState::Running {
            return Err(SketchError::session("Worker already running"));
        }
        self.state = WorkerState::Running;
        tracing::info!(epoch = %self.clock.epoch_wall(), "Sketch worker started");

        let mut controls_open = true;
        while !self.stop_flag.load(Ordering::Relaxed) {
            tokio::select! {
                biased;
                control = controls.recv(), if controls_open => match control {
                    Some(control) => {
                        self.control(control);
                    }
                    None => controls_open = false,
                },
                input = inputs.recv() => match input {
                    Some(input) => {
                        self.process(input);
                    }
                    None => break,
                },
                _ = tokio::time::sleep(STOP_POLL) => {}
            }
        }

        // Controls queued before the input stream ended still apply.
        while let Ok(control) = controls.try_recv() {
            self.control(control);
        }

        self.coordinator.reset();
        self.fps.reset();
        self.state = WorkerState::Stopped;
        tracing::info!(
            frames = self.stats.frames,
            controls = self.stats.controls,
            commands = self.stats.commands_applied,
            dropped = self.stats.dropped_observations,
            "Sketch worker stopped"
        );
        Ok(self.stats)
    }

    /// Spawn the worker on the tokio runtime and return a handle to it.
    pub fn spawn(mut self) -> SketchHandle {
        let (input_tx, input_rx) = mpsc::channel(INPUT_QUEUE);
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let latest = self.latest();
        let stop_flag = self.stop_flag();
        let task = tokio::spawn(async move {
            let stats = self.run(input_rx, control_rx).await?;
            Ok::<_, SketchError>((stats, self.engine))
        });
        SketchHandle {
            inputs: input_tx,
            controls: control_tx,
            latest,
            stop_flag,
            task,
        }
    }

    fn publish(&mut self, fps: f64) -> Arc<PublishedFrame> {
        self.sequence += 1;
        let frame = Arc::new(PublishedFrame {
            sequence: self.sequence,
            report: self.last_report.clone(),
            composited: self.last_frame.as_ref().map(|f| self.engine.composite(f)),
            canvas: self.engine.snapshot(),
            fps,
            color: self.engine.color(),
            brush_width: self.engine.brush_width(),
            undo_depth: self.engine.undo_len(),
            redo_depth: self.engine.redo_len(),
        });
        self.latest.publish(Arc::clone(&frame));
        frame
    }
}

/// Caller side of a spawned worker.
pub struct SketchHandle {
    inputs: mpsc::Sender<WorkerInput>,
    controls: mpsc::UnboundedSender<Control>,
    latest: LatestFrame,
    stop_flag: Arc<AtomicBool>,
    task: JoinHandle<SketchResult<(WorkerStats, DrawingEngine)>>,
}

impl SketchHandle {
    /// Queue one frame. Waits while the worker is behind.
    pub async fn submit(&self, input: WorkerInput) -> SketchResult<()> {
        self.inputs
            .send(input)
            .await
            .map_err(|_| SketchError::session("Worker is no longer accepting frames"))
    }

    /// Queue observations without a camera frame.
    pub async fn submit_observations(&self, observations: FrameObservations) -> SketchResult<()> {
        self.submit(WorkerInput {
            observations,
            frame: None,
        })
        .await
    }

    /// Queue a control; it is applied before the next frame.
    pub fn control(&self, control: Control) -> SketchResult<()> {
        self.controls
            .send(control)
            .map_err(|_| SketchError::session("Worker is no longer accepting controls"))
    }

    /// The newest published output.
    pub fn latest(&self) -> Option<Arc<PublishedFrame>> {
        self.latest.latest()
    }

    /// Ask the worker to stop after its current step.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    /// Close the input stream and wait for the worker to drain it.
    /// Returns the final totals and the engine, for export.
    pub async fn finish(self) -> SketchResult<(WorkerStats, DrawingEngine)> {
        drop(self.inputs);
        drop(self.controls);
        self.task
            .await
            .map_err(|e| SketchError::session(format!("Worker task failed: {e}")))?
    }
}
