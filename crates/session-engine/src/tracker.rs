//! Stable hand-slot assignment.
//!
//! Detectors report hands in arbitrary order and handedness can flicker, so
//! observations are matched to the slots tracked on the previous frame by
//! wrist position instead.

use airsketch_sketch_model::geometry::Point2D;
use airsketch_sketch_model::landmark::Handedness;

/// Number of hand slots tracked per session.
pub const SLOT_COUNT: usize = 2;

/// What the tracker knows about an occupied slot from the previous frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedSlot {
    pub wrist: Point2D,
    pub handedness: Handedness,
}

/// Assign each observed wrist to a slot.
///
/// Returns one slot index per wrist, in input order. Matching to slots that
/// are already tracked takes priority; among those, the assignment with the
/// smallest total wrist displacement wins. Remaining observations take the
/// lowest free slot. Wrists beyond `SLOT_COUNT` are not assigned.
pub fn assign_slots(
    tracked: &[Option<TrackedSlot>; SLOT_COUNT],
    wrists: &[Point2D],
) -> Vec<usize> {
    let n = wrists.len().min(SLOT_COUNT);
    if n == 0 {
        return Vec::new();
    }

    let candidates: Vec<Vec<usize>> = match n {
        1 => vec![vec![0], vec![1]],
        _ => vec![vec![0, 1], vec![1, 0]],
    };

    let score = |assignment: &[usize]| {
        let mut matched = 0usize;
        let mut displacement = 0.0;
        for (wrist, slot) in wrists.iter().zip(assignment) {
            if let Some(prev) = &tracked[*slot] {
                matched += 1;
                displacement += prev.wrist.distance_to(wrist);
            }
        }
        (matched, displacement)
    };

    let mut best = &candidates[0];
    let mut best_score = score(best);
    for candidate in &candidates[1..] {
        let (matched, displacement) = score(candidate);
        if matched > best_score.0 || (matched == best_score.0 && displacement < best_score.1) {
            best = candidate;
            best_score = (matched, displacement);
        }
    }
    best.clone()
}

/// Pick a tracked slot for an observation that could not be read this
/// frame, so the slot is held instead of lost. Prefers a slot with the same
/// handedness, then the lowest index. `taken` marks slots already claimed.
pub fn claim_for_malformed(
    tracked: &[Option<TrackedSlot>; SLOT_COUNT],
    taken: &[bool; SLOT_COUNT],
    handedness: Handedness,
) -> Option<usize> {
    let free = |slot: &usize| !taken[*slot] && tracked[*slot].is_some();
    (0..SLOT_COUNT)
        .filter(free)
        .find(|slot| tracked[*slot].map(|t| t.handedness) == Some(handedness))
        .or_else(|| (0..SLOT_COUNT).find(free))
}
