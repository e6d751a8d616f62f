//! Dual-hand coordination.
//!
//! Per frame, each observed hand runs through finger classification,
//! gesture debouncing, and (for pointing gestures) fingertip smoothing in
//! its own slot. The resulting commands are then applied to the drawing
//! engine in one authoritative order:
//!
//! 1. While any tracked slot's stabilized gesture is ClearAll, every other
//!    canvas command of the frame is discarded. The canvas itself is reset
//!    (with one history snapshot) on the frame a hand enters ClearAll.
//! 2. Otherwise commands are applied sequentially in slot order, so slot 1
//!    paints over slot 0 where they overlap.
//!
//! Per-hand state lives only while a hand stays tracked. A slot with no
//! observation is dropped immediately; a slot whose observation was
//! malformed is held unchanged for that frame.
//!
//! When a shape is armed, slot 0 places it: the first time that hand enters
//! Navigate sets the anchor, the next time completes the shape.

use serde::Serialize;

use airsketch_common::config::{
    FilterConfig, GestureThresholds, HistoryGranularity, SessionConfig,
};
use airsketch_processing_core::{FingerClassifier, GestureRecognizer, PointSmoother};
use airsketch_render_engine::{DrawingEngine, Palette};
use airsketch_sketch_model::command::{DrawingCommand, ShapeKind, SlotCommand};
use airsketch_sketch_model::geometry::{PixelPoint, Point2D, Rgb};
use airsketch_sketch_model::gesture::GestureLabel;
use airsketch_sketch_model::landmark::{FrameObservations, HandLandmarks, Handedness};

use crate::tracker::{assign_slots, claim_for_malformed, TrackedSlot, SLOT_COUNT};

/// The slot whose Navigate gesture places shape anchors.
const SHAPE_SLOT: usize = 0;

/// Per-slot state visible to the GUI for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandReport {
    pub handedness: Handedness,
    /// Stabilized gesture.
    pub gesture: GestureLabel,
    /// This frame's undebounced classification; `None` when the slot was
    /// held over a malformed observation.
    pub raw: Option<GestureLabel>,
    /// Pointer ring position for Draw, Navigate, Erase, and Pause.
    pub cursor: Option<PixelPoint>,
    /// PinchSettings indicator.
    pub pinch: bool,
    pub held: bool,
}

/// Everything the coordinator decided for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameReport {
    pub timestamp_secs: f64,
    pub hands: [Option<HandReport>; SLOT_COUNT],
    /// Commands applied to the canvas, in application order.
    pub commands: Vec<SlotCommand>,
    /// Commands dropped because a held or entered ClearAll dominated the
    /// frame.
    pub discarded_commands: usize,
    /// Observations rejected for not carrying 21 landmarks.
    pub dropped_observations: usize,
    pub acquired: Vec<usize>,
    pub lost: Vec<usize>,
    /// Active color after this frame, if a pinch changed it.
    pub color_changed: Option<Rgb>,
    /// Armed shape after this frame.
    pub shape: Option<ShapeKind>,
    /// First point of the armed shape, once placed.
    pub shape_anchor: Option<PixelPoint>,
}

impl FrameReport {
    pub fn gesture(&self, slot: usize) -> Option<GestureLabel> {
        self.hands.get(slot)?.map(|h| h.gesture)
    }

    pub fn cursor(&self, slot: usize) -> Option<PixelPoint> {
        self.hands.get(slot)?.and_then(|h| h.cursor)
    }

    pub fn pinch_active(&self) -> bool {
        self.hands.iter().flatten().any(|h| h.pinch)
    }

    pub fn tracked_hands(&self) -> usize {
        self.hands.iter().flatten().count()
    }
}

/// Brush values sampled from the engine before any of this frame's
/// commands are applied.
#[derive(Debug, Clone, Copy)]
struct StepContext {
    t_secs: f64,
    canvas_width: f64,
    canvas_height: f64,
    ink: Rgb,
    brush_width: u32,
    eraser_radius: u32,
    smoothing: bool,
}

/// What one hand asks for on one frame.
#[derive(Debug, Clone, Copy)]
struct HandStep {
    report: HandReport,
    command: Option<DrawingCommand>,
    cycle_color: bool,
    entered_navigate: bool,
}

/// State for one continuously tracked hand.
#[derive(Debug, Clone)]
struct HandTrack {
    handedness: Handedness,
    wrist: Point2D,
    recognizer: GestureRecognizer,
    smoother: PointSmoother,
    /// Smoothed control point, frozen while paused.
    pen: Option<PixelPoint>,
    /// End of the previous Draw segment.
    last_point: Option<PixelPoint>,
    /// Whether the current Draw or Erase run has already been applied once.
    stroke_open: bool,
}

impl HandTrack {
    fn new(
        handedness: Handedness,
        hand: &HandLandmarks,
        thresholds: &GestureThresholds,
        filter: FilterConfig,
    ) -> Self {
        Self {
            handedness,
            wrist: hand.wrist(),
            recognizer: GestureRecognizer::from_thresholds(thresholds),
            smoother: PointSmoother::new(filter),
            pen: None,
            last_point: None,
            stroke_open: false,
        }
    }

    fn tracked(&self) -> TrackedSlot {
        TrackedSlot {
            wrist: self.wrist,
            handedness: self.handedness,
        }
    }

    fn step(
        &mut self,
        slot: usize,
        ctx: &StepContext,
        classifier: &FingerClassifier,
        hand: &HandLandmarks,
        handedness: Handedness,
    ) -> HandStep {
        self.handedness = handedness;
        self.wrist = hand.wrist();

        let fingers = classifier.classify(hand, handedness);
        let update = self.recognizer.update(fingers, hand.pinch_distance());
        if update.changed() {
            tracing::debug!(
                slot,
                from = %update.previous,
                to = %update.stable,
                "Gesture changed"
            );
            self.stroke_open = false;
        }

        let stable = update.stable;
        if !stable.tracks_pointer() {
            self.smoother.reset();
            if stable != GestureLabel::Pause {
                self.pen = None;
            }
        }
        if stable != GestureLabel::Draw {
            self.last_point = None;
        }

        let command = match stable {
            GestureLabel::Draw => {
                let pen = self.track_pen(ctx, hand);
                let from = self.last_point.replace(pen).unwrap_or(pen);
                Some(DrawingCommand::Draw {
                    from,
                    to: pen,
                    color: ctx.ink,
                    width: ctx.brush_width,
                })
            }
            GestureLabel::Navigate => {
                self.track_pen(ctx, hand);
                None
            }
            GestureLabel::Erase => {
                let center = self.track_pen(ctx, hand);
                Some(DrawingCommand::Erase {
                    center,
                    radius: ctx.eraser_radius,
                })
            }
            GestureLabel::ClearAll => update
                .entered(GestureLabel::ClearAll)
                .then_some(DrawingCommand::Clear),
            GestureLabel::Idle | GestureLabel::Pause | GestureLabel::PinchSettings => None,
        };

        HandStep {
            report: HandReport {
                handedness,
                gesture: stable,
                raw: Some(update.raw),
                cursor: self.cursor(),
                pinch: stable == GestureLabel::PinchSettings,
                held: false,
            },
            command,
            cycle_color: update.entered(GestureLabel::PinchSettings),
            entered_navigate: update.entered(GestureLabel::Navigate),
        }
    }

    fn held_report(&self) -> HandReport {
        let gesture = self.recognizer.stable();
        HandReport {
            handedness: self.handedness,
            gesture,
            raw: None,
            cursor: self.cursor(),
            pinch: gesture == GestureLabel::PinchSettings,
            held: true,
        }
    }

    fn cursor(&self) -> Option<PixelPoint> {
        match self.recognizer.stable() {
            GestureLabel::Draw | GestureLabel::Navigate | GestureLabel::Erase => self.pen,
            GestureLabel::Pause => self.pen,
            _ => None,
        }
    }

    /// Move the pen to the index fingertip in canvas pixels, smoothed unless
    /// smoothing is off.
    fn track_pen(&mut self, ctx: &StepContext, hand: &HandLandmarks) -> PixelPoint {
        let tip = hand.index_tip();
        let raw = Point2D::new(tip.x * ctx.canvas_width, tip.y * ctx.canvas_height);
        let pen = if ctx.smoothing {
            self.smoother.smooth(ctx.t_secs, raw).to_pixel()
        } else {
            raw.to_pixel()
        };
        self.pen = Some(pen);
        pen
    }
}

/// Drives the per-hand pipelines and issues the frame's commands.
#[derive(Debug, Clone)]
pub struct DualHandCoordinator {
    slots: [Option<HandTrack>; SLOT_COUNT],
    classifier: FingerClassifier,
    thresholds: GestureThresholds,
    filter: FilterConfig,
    granularity: HistoryGranularity,
    pinch_cycles_color: bool,
    smoothing: bool,
    shape: Option<ShapeKind>,
    shape_anchor: Option<PixelPoint>,
}

impl DualHandCoordinator {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            slots: [None, None],
            classifier: FingerClassifier::from_thresholds(&config.gestures),
            thresholds: config.gestures,
            filter: config.filter,
            granularity: config.history.granularity,
            pinch_cycles_color: config.pinch_cycles_color,
            smoothing: config.filter.enabled,
            shape: None,
            shape_anchor: None,
        }
    }

    /// Run one frame of observations and apply the resulting commands.
    pub fn process(
        &mut self,
        frame: &FrameObservations,
        engine: &mut DrawingEngine,
    ) -> FrameReport {
        let mut report = FrameReport {
            timestamp_secs: frame.timestamp_secs,
            ..FrameReport::default()
        };

        let mut valid = Vec::with_capacity(frame.hands.len());
        let mut malformed = Vec::new();
        for observation in &frame.hands {
            match observation.validated() {
                Ok(hand) => valid.push((observation.handedness, hand)),
                Err(e) => {
                    tracing::debug!(
                        error = %e,
                        handedness = ?observation.handedness,
                        "Dropping malformed observation"
                    );
                    malformed.push(observation.handedness);
                }
            }
        }
        report.dropped_observations = malformed.len();
        if valid.len() > SLOT_COUNT {
            tracing::debug!(observed = valid.len(), "Ignoring hands beyond the slot count");
            valid.truncate(SLOT_COUNT);
        }

        // Slot association against last frame's tracks.
        let tracked: [Option<TrackedSlot>; SLOT_COUNT] =
            std::array::from_fn(|slot| self.slots[slot].as_ref().map(HandTrack::tracked));
        let wrists: Vec<Point2D> = valid.iter().map(|(_, hand)| hand.wrist()).collect();
        let assignment = assign_slots(&tracked, &wrists);

        let mut observed: [Option<(Handedness, HandLandmarks)>; SLOT_COUNT] = [None, None];
        for (entry, slot) in valid.into_iter().zip(assignment) {
            observed[slot] = Some(entry);
        }

        let mut taken: [bool; SLOT_COUNT] = std::array::from_fn(|slot| observed[slot].is_some());
        let mut held = [false; SLOT_COUNT];
        for handedness in malformed {
            if let Some(slot) = claim_for_malformed(&tracked, &taken, handedness) {
                taken[slot] = true;
                held[slot] = true;
            }
        }

        for (slot, track) in self.slots.iter_mut().enumerate() {
            if track.is_some() && !taken[slot] {
                *track = None;
                report.lost.push(slot);
                tracing::debug!(slot, "Hand lost");
            }
        }

        let ctx = StepContext {
            t_secs: frame.timestamp_secs,
            canvas_width: engine.canvas().width() as f64,
            canvas_height: engine.canvas().height() as f64,
            ink: engine.ink_color(),
            brush_width: engine.brush_width(),
            eraser_radius: engine.eraser_radius(),
            smoothing: self.smoothing,
        };
        let classifier = self.classifier;
        let thresholds = self.thresholds;
        let filter = self.filter;

        let mut requests: Vec<(usize, DrawingCommand)> = Vec::new();
        let mut color_cycles = 0usize;
        for slot in 0..SLOT_COUNT {
            if held[slot] {
                report.hands[slot] = self.slots[slot].as_ref().map(HandTrack::held_report);
                continue;
            }
            let Some((handedness, hand)) = observed[slot].take() else {
                continue;
            };

            let track = self.slots[slot].get_or_insert_with(|| {
                tracing::debug!(slot, ?handedness, "Hand acquired");
                report.acquired.push(slot);
                HandTrack::new(handedness, &hand, &thresholds, filter)
            });
            let step = track.step(slot, &ctx, &classifier, &hand, handedness);

            report.hands[slot] = Some(step.report);
            if let Some(command) = step.command {
                requests.push((slot, command));
            }
            if step.cycle_color {
                color_cycles += 1;
            }
            if slot == SHAPE_SLOT && step.entered_navigate {
                if let Some(command) = self.place_shape_point(step.report.cursor, &ctx) {
                    requests.push((slot, command));
                }
            }
        }

        self.apply(requests, engine, &mut report);

        if self.pinch_cycles_color && color_cycles > 0 {
            for _ in 0..color_cycles {
                engine.set_color(Palette::next_after(engine.color()));
            }
            let color = engine.color();
            tracing::debug!(
                color = Palette::name_of(color).unwrap_or("custom"),
                "Pinch changed draw color"
            );
            report.color_changed = Some(color);
        }

        report.shape = self.shape;
        report.shape_anchor = self.shape_anchor;
        report
    }

    /// Record a shape anchor, or complete the armed shape at `point`.
    fn place_shape_point(
        &mut self,
        point: Option<PixelPoint>,
        ctx: &StepContext,
    ) -> Option<DrawingCommand> {
        let kind = self.shape?;
        let point = point?;
        let Some(from) = self.shape_anchor else {
            tracing::debug!(shape = kind.as_str(), ?point, "Shape anchor placed");
            self.shape_anchor = Some(point);
            return None;
        };
        Some(DrawingCommand::Shape {
            kind,
            from,
            to: point,
            color: ctx.ink,
            width: ctx.brush_width,
        })
    }

    fn apply(
        &mut self,
        requests: Vec<(usize, DrawingCommand)>,
        engine: &mut DrawingEngine,
        report: &mut FrameReport,
    ) {
        let clearing = self
            .slots
            .iter()
            .flatten()
            .any(|track| track.recognizer.stable() == GestureLabel::ClearAll);
        if clearing {
            report.discarded_commands = requests.iter().filter(|(_, c)| !c.is_clear()).count();
            if let Some(&(slot, _)) = requests.iter().find(|(_, c)| c.is_clear()) {
                engine.clear();
                report.commands.push(SlotCommand {
                    slot,
                    command: DrawingCommand::Clear,
                    continues_stroke: false,
                });
                tracing::debug!(
                    slot,
                    discarded = report.discarded_commands,
                    "Clear dominates frame"
                );
            }
            // Discarded segments must not become the start of the next one.
            for track in self.slots.iter_mut().flatten() {
                track.stroke_open = false;
                track.last_point = None;
            }
            return;
        }

        for (slot, command) in requests {
            let Some(track) = self.slots[slot].as_mut() else {
                continue;
            };
            if !command.is_stroke() {
                engine.apply(&command);
                if matches!(command, DrawingCommand::Shape { .. }) {
                    self.shape = None;
                    self.shape_anchor = None;
                }
                report.commands.push(SlotCommand {
                    slot,
                    command,
                    continues_stroke: false,
                });
                continue;
            }
            let continues_stroke = track.stroke_open;
            if continues_stroke && self.granularity == HistoryGranularity::PerStroke {
                engine.apply_continuation(&command);
            } else {
                engine.apply(&command);
            }
            track.stroke_open = true;
            report.commands.push(SlotCommand {
                slot,
                command,
                continues_stroke,
            });
        }
    }

    /// End every open stroke so the next Draw or Erase records a snapshot.
    pub fn break_strokes(&mut self) {
        for track in self.slots.iter_mut().flatten() {
            track.stroke_open = false;
        }
    }

    /// Discard all per-hand state, including a half-placed shape.
    pub fn reset(&mut self) {
        let dropped = self.tracked_count();
        self.slots = [None, None];
        self.shape_anchor = None;
        tracing::debug!(dropped, "Tracking reset");
    }

    /// Arm a shape for slot 0 to place, or disarm with `None`. Any anchor
    /// already placed is dropped.
    pub fn set_shape(&mut self, shape: Option<ShapeKind>) {
        self.shape = shape;
        self.shape_anchor = None;
        tracing::debug!(shape = shape.map(|s| s.as_str()), "Shape tool set");
    }

    pub fn shape(&self) -> Option<ShapeKind> {
        self.shape
    }

    pub fn shape_anchor(&self) -> Option<PixelPoint> {
        self.shape_anchor
    }

    /// Turn fingertip smoothing on or off. Filter state is discarded either
    /// way so the next sample starts fresh.
    pub fn set_smoothing(&mut self, enabled: bool) {
        self.smoothing = enabled;
        for track in self.slots.iter_mut().flatten() {
            track.smoother.reset();
        }
        tracing::debug!(enabled, "Smoothing set");
    }

    pub fn smoothing_enabled(&self) -> bool {
        self.smoothing
    }

    pub fn is_tracking(&self, slot: usize) -> bool {
        self.slots.get(slot).is_some_and(Option::is_some)
    }

    pub fn tracked_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Stabilized gesture of a tracked slot.
    pub fn gesture(&self, slot: usize) -> Option<GestureLabel> {
        self.slots
            .get(slot)?
            .as_ref()
            .map(|track| track.recognizer.stable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airsketch_sketch_model::landmark::{HandObservation, Landmark};

    fn config() -> SessionConfig {
        let mut config = SessionConfig::default();
        config.canvas.width = 100;
        config.canvas.height = 100;
        config.gestures.debounce_window = 2;
        config
    }

    fn observation(handedness: Handedness, landmarks: Vec<Landmark>) -> HandObservation {
        HandObservation::new(handedness, landmarks)
    }

    /// An open palm (all five extended) with the wrist at `(x, 0.9)`.
    fn palm(x: f64) -> Vec<Landmark> {
        let mut points = vec![Landmark::new(x, 0.7, 0.0); 21];
        points[0] = Landmark::new(x, 0.9, 0.0);
        points[3] = Landmark::new(x - 0.05, 0.7, 0.0);
        points[4] = Landmark::new(x - 0.1, 0.7, 0.0);
        for (pip, tip) in [(6, 8), (10, 12), (14, 16), (18, 20)] {
            points[pip] = Landmark::new(x, 0.6, 0.0);
            points[tip] = Landmark::new(x, 0.4, 0.0);
        }
        points
    }

    #[test]
    fn test_empty_frame_is_quiet() {
        let config = config();
        let mut engine = DrawingEngine::from_config(&config);
        let mut coordinator = DualHandCoordinator::new(&config);

        let report = coordinator.process(&FrameObservations::empty(0.0), &mut engine);
        assert_eq!(report.tracked_hands(), 0);
        assert!(report.commands.is_empty());
        assert_eq!(engine.undo_len(), 0);
    }

    #[test]
    fn test_acquire_then_lose() {
        let config = config();
        let mut engine = DrawingEngine::from_config(&config);
        let mut coordinator = DualHandCoordinator::new(&config);

        let frame = FrameObservations::new(0.0, vec![observation(Handedness::Right, palm(0.5))]);
        let report = coordinator.process(&frame, &mut engine);
        assert_eq!(report.acquired, vec![0]);
        assert!(coordinator.is_tracking(0));

        let report = coordinator.process(&FrameObservations::empty(0.1), &mut engine);
        assert_eq!(report.lost, vec![0]);
        assert_eq!(coordinator.tracked_count(), 0);
    }

    #[test]
    fn test_open_palm_pauses() {
        let config = config();
        let mut engine = DrawingEngine::from_config(&config);
        let mut coordinator = DualHandCoordinator::new(&config);

        for i in 0..3 {
            let frame = FrameObservations::new(
                i as f64 * 0.05,
                vec![observation(Handedness::Right, palm(0.5))],
            );
            coordinator.process(&frame, &mut engine);
        }
        assert_eq!(coordinator.gesture(0), Some(GestureLabel::Pause));
        assert_eq!(engine.undo_len(), 0);
    }

    #[test]
    fn test_malformed_observation_holds_slot() {
        let config = config();
        let mut engine = DrawingEngine::from_config(&config);
        let mut coordinator = DualHandCoordinator::new(&config);

        for i in 0..2 {
            let frame = FrameObservations::new(
                i as f64 * 0.05,
                vec![observation(Handedness::Right, palm(0.5))],
            );
            coordinator.process(&frame, &mut engine);
        }
        assert_eq!(coordinator.gesture(0), Some(GestureLabel::Pause));

        let broken = observation(Handedness::Right, palm(0.5)[..20].to_vec());
        let report = coordinator.process(&FrameObservations::new(0.1, vec![broken]), &mut engine);
        assert_eq!(report.dropped_observations, 1);
        assert!(report.lost.is_empty());
        let held = report.hands[0].expect("slot held");
        assert!(held.held);
        assert_eq!(held.gesture, GestureLabel::Pause);
        assert_eq!(coordinator.gesture(0), Some(GestureLabel::Pause));
    }

    #[test]
    fn test_malformed_without_track_is_dropped() {
        let config = config();
        let mut engine = DrawingEngine::from_config(&config);
        let mut coordinator = DualHandCoordinator::new(&config);

        let broken = observation(Handedness::Left, Vec::new());
        let report = coordinator.process(&FrameObservations::new(0.0, vec![broken]), &mut engine);
        assert_eq!(report.dropped_observations, 1);
        assert_eq!(report.tracked_hands(), 0);
        assert!(report.acquired.is_empty());
    }

    #[test]
    fn test_reset_discards_tracks() {
        let config = config();
        let mut engine = DrawingEngine::from_config(&config);
        let mut coordinator = DualHandCoordinator::new(&config);

        let frame = FrameObservations::new(
            0.0,
            vec![
                observation(Handedness::Right, palm(0.3)),
                observation(Handedness::Left, palm(0.7)),
            ],
        );
        coordinator.process(&frame, &mut engine);
        assert_eq!(coordinator.tracked_count(), 2);
        coordinator.reset();
        assert_eq!(coordinator.tracked_count(), 0);
        assert_eq!(coordinator.gesture(1), None);
    }
}
