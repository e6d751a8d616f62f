//! Gesture recognition with window debouncing.
//!
//! Each frame the finger state is mapped to a raw label using a fixed
//! precedence order. The raw label goes into a ring of the last `K`
//! classifications, and the stabilized label only switches once all `K`
//! slots agree. Anything short of a full agreeing window keeps the
//! previous stabilized label.

use airsketch_common::config::GestureThresholds;
use airsketch_sketch_model::gesture::{FingerState, GestureLabel};

/// Map one frame's finger state to a raw gesture label.
///
/// Precedence when several patterns match:
/// ClearAll > Erase > PinchSettings > Draw > Navigate > Pause > Idle.
/// Draw and Navigate ignore the thumb; Erase requires it folded so an open
/// palm reaches Pause.
pub fn classify_raw(
    fingers: FingerState,
    pinch_distance: f64,
    pinch_threshold: f64,
) -> GestureLabel {
    let thumb = fingers.thumb;
    match fingers.non_thumb() {
        (false, false, false, false) if !thumb => GestureLabel::ClearAll,
        (true, true, true, true) if !thumb => GestureLabel::Erase,
        _ if pinch_distance < pinch_threshold => GestureLabel::PinchSettings,
        (true, false, false, false) => GestureLabel::Draw,
        (true, true, false, false) => GestureLabel::Navigate,
        (true, true, true, true) => GestureLabel::Pause,
        _ => GestureLabel::Idle,
    }
}

/// Fixed-capacity ring of the most recent raw classifications.
#[derive(Debug, Clone)]
pub struct GestureHistory {
    slots: Vec<GestureLabel>,
    capacity: usize,
    /// Next slot to overwrite once full.
    write_index: usize,
}

impl GestureHistory {
    /// Create an empty history. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            write_index: 0,
        }
    }

    /// Record a raw label, overwriting the oldest when full.
    pub fn push(&mut self, label: GestureLabel) {
        if self.slots.len() < self.capacity {
            self.slots.push(label);
        } else {
            self.slots[self.write_index] = label;
        }
        self.write_index = (self.write_index + 1) % self.capacity;
    }

    /// The label every slot agrees on, if the ring is full and unanimous.
    pub fn unanimous(&self) -> Option<GestureLabel> {
        if !self.is_full() {
            return None;
        }
        let first = self.slots[0];
        self.slots.iter().all(|l| *l == first).then_some(first)
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Outcome of feeding one frame to the recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureUpdate {
    /// This frame's undebounced classification.
    pub raw: GestureLabel,
    /// Stabilized label before this frame.
    pub previous: GestureLabel,
    /// Stabilized label after this frame.
    pub stable: GestureLabel,
}

impl GestureUpdate {
    pub fn changed(&self) -> bool {
        self.previous != self.stable
    }

    /// Whether the stabilized label switched to `label` on this frame.
    pub fn entered(&self, label: GestureLabel) -> bool {
        self.changed() && self.stable == label
    }

    /// Whether the stabilized label switched away from `label` on this frame.
    pub fn left(&self, label: GestureLabel) -> bool {
        self.changed() && self.previous == label
    }
}

/// Debounced gesture state machine for one hand.
///
/// Produces labels only. Side effects of transitions belong to the caller.
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    history: GestureHistory,
    stable: GestureLabel,
    pinch_threshold: f64,
}

impl GestureRecognizer {
    pub fn new(debounce_window: usize, pinch_threshold: f64) -> Self {
        Self {
            history: GestureHistory::new(debounce_window),
            stable: GestureLabel::Idle,
            pinch_threshold,
        }
    }

    pub fn from_thresholds(thresholds: &GestureThresholds) -> Self {
        Self::new(thresholds.debounce_window, thresholds.pinch_distance)
    }

    /// Classify a frame and update the stabilized label.
    pub fn update(&mut self, fingers: FingerState, pinch_distance: f64) -> GestureUpdate {
        let raw = classify_raw(fingers, pinch_distance, self.pinch_threshold);
        self.push_raw(raw)
    }

    /// Feed an already-classified raw label.
    pub fn push_raw(&mut self, raw: GestureLabel) -> GestureUpdate {
        let previous = self.stable;
        self.history.push(raw);
        if let Some(agreed) = self.history.unanimous() {
            self.stable = agreed;
        }
        GestureUpdate {
            raw,
            previous,
            stable: self.stable,
        }
    }

    /// Current stabilized label.
    pub fn stable(&self) -> GestureLabel {
        self.stable
    }

    pub fn history(&self) -> &GestureHistory {
        &self.history
    }
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::from_thresholds(&GestureThresholds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FAR: f64 = 0.3;
    const THRESHOLD: f64 = 0.06;

    fn raw(flags: [bool; 5]) -> GestureLabel {
        classify_raw(FingerState::from_array(flags), FAR, THRESHOLD)
    }

    #[test]
    fn test_raw_patterns() {
        assert_eq!(raw([false; 5]), GestureLabel::ClearAll);
        assert_eq!(raw([false, true, true, true, true]), GestureLabel::Erase);
        assert_eq!(raw([false, true, false, false, false]), GestureLabel::Draw);
        assert_eq!(raw([true, true, false, false, false]), GestureLabel::Draw);
        assert_eq!(raw([false, true, true, false, false]), GestureLabel::Navigate);
        assert_eq!(raw([true; 5]), GestureLabel::Pause);
        assert_eq!(raw([true, false, false, false, false]), GestureLabel::Idle);
        assert_eq!(raw([false, false, true, true, false]), GestureLabel::Idle);
    }

    #[test]
    fn test_raw_precedence() {
        let pinch = 0.01;
        // Fist and erase win over a pinch reading.
        assert_eq!(
            classify_raw(FingerState::default(), pinch, THRESHOLD),
            GestureLabel::ClearAll
        );
        assert_eq!(
            classify_raw(FingerState::new(false, true, true, true, true), pinch, THRESHOLD),
            GestureLabel::Erase
        );
        // Pinch wins over draw, navigate and pause regardless of other fingers.
        for flags in [
            [false, true, false, false, false],
            [true, true, true, false, false],
            [true; 5],
            [true, false, false, false, false],
        ] {
            assert_eq!(
                classify_raw(FingerState::from_array(flags), pinch, THRESHOLD),
                GestureLabel::PinchSettings,
                "{flags:?}"
            );
        }
    }

    #[test]
    fn test_starts_idle_and_needs_full_window() {
        let mut rec = GestureRecognizer::new(5, THRESHOLD);
        assert_eq!(rec.stable(), GestureLabel::Idle);

        for _ in 0..4 {
            let update = rec.push_raw(GestureLabel::Draw);
            assert_eq!(update.stable, GestureLabel::Idle);
            assert!(!update.changed());
        }
        let update = rec.push_raw(GestureLabel::Draw);
        assert!(update.entered(GestureLabel::Draw));
        assert!(update.left(GestureLabel::Idle));
    }

    #[test]
    fn test_single_frame_glitch_is_absorbed() {
        let mut rec = GestureRecognizer::new(5, THRESHOLD);
        for _ in 0..5 {
            rec.push_raw(GestureLabel::Draw);
        }
        let update = rec.push_raw(GestureLabel::ClearAll);
        assert_eq!(update.raw, GestureLabel::ClearAll);
        assert_eq!(update.stable, GestureLabel::Draw);

        // Four more Draw frames: the glitch is still in the window.
        for _ in 0..4 {
            assert_eq!(rec.push_raw(GestureLabel::Draw).stable, GestureLabel::Draw);
        }
    }

    #[test]
    fn test_switch_after_k_consecutive() {
        let mut rec = GestureRecognizer::new(3, THRESHOLD);
        for _ in 0..3 {
            rec.push_raw(GestureLabel::Navigate);
        }
        rec.push_raw(GestureLabel::Erase);
        rec.push_raw(GestureLabel::Erase);
        assert_eq!(rec.stable(), GestureLabel::Navigate);
        assert!(rec.push_raw(GestureLabel::Erase).entered(GestureLabel::Erase));
    }

    #[test]
    fn test_history_ring_overwrites_oldest() {
        let mut history = GestureHistory::new(2);
        assert!(history.is_empty());
        history.push(GestureLabel::Draw);
        assert_eq!(history.unanimous(), None);
        history.push(GestureLabel::Erase);
        assert_eq!(history.unanimous(), None);
        history.push(GestureLabel::Erase);
        assert_eq!(history.len(), 2);
        assert_eq!(history.unanimous(), Some(GestureLabel::Erase));
    }

    fn any_label() -> impl Strategy<Value = GestureLabel> {
        proptest::sample::select(GestureLabel::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_label_changes_only_after_k_identical(
            window in 1usize..8,
            labels in proptest::collection::vec(any_label(), 0..120),
        ) {
            let mut rec = GestureRecognizer::new(window, THRESHOLD);
            for (i, label) in labels.iter().enumerate() {
                let update = rec.push_raw(*label);
                if update.changed() {
                    prop_assert!(i + 1 >= window);
                    let recent = &labels[i + 1 - window..=i];
                    prop_assert!(recent.iter().all(|l| *l == update.stable));
                }
                if i + 1 >= window && labels[i + 1 - window..=i].iter().all(|l| l == label) {
                    prop_assert_eq!(update.stable, *label);
                }
            }
        }

        #[test]
        fn prop_short_runs_never_switch(
            run in 1usize..5,
            target in any_label(),
        ) {
            let mut rec = GestureRecognizer::new(5, THRESHOLD);
            for _ in 0..5 {
                rec.push_raw(GestureLabel::Pause);
            }
            for _ in 0..run {
                rec.push_raw(target);
            }
            if target != GestureLabel::Pause {
                prop_assert_eq!(rec.stable(), GestureLabel::Pause);
            }
        }
    }
}
