use crate::{
    options::ResolvedOption,
    random::RandomSource,
};
use std::f64::consts::{
    PI,
    TAU,
};

/// Where the fixed pointer sits in the unrotated wheel frame (top of the wheel).
pub const POINTER_ANGLE: f64 = 1.5 * PI;

// Landing points fall in the middle 60% of the winning slice.
const LANDING_MARGIN: f64 = 0.2;
const LANDING_SPAN: f64 = 0.6;

const MIN_FULL_SPINS: u32 = 5;
const FULL_SPIN_CHOICES: u32 = 5;

/// Angular extent of one option on the wheel, in radians from angle 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slice {
    pub start: f64,
    pub sweep: f64,
}

impl Slice {
    pub fn end(&self) -> f64 {
        self.start + self.sweep
    }
}

/// What a spin will do, decided before any animation starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpinOutcome {
    pub winner_index: usize,
    /// Rotation measured from the unrotated wheel frame.
    pub rotation_delta: f64,
}

impl SpinOutcome {
    /// Rotation to add to a wheel currently resting at `current`.
    ///
    /// Discards the partial turn left by earlier spins so the landing point
    /// still ends under the pointer. Always positive: the wheel keeps winding
    /// forward.
    pub fn rotation_from(&self, current: f64) -> f64 {
        self.rotation_delta - current.rem_euclid(TAU)
    }
}

/// Slice geometry in option order. Widths follow `ratio`, never the chance.
pub fn slices(options: &[ResolvedOption]) -> Vec<Slice> {
    let total_ratio: f64 = options.iter().map(|opt| opt.ratio).sum();
    let mut start = 0.0;
    options
        .iter()
        .map(|opt| {
            let sweep = opt.ratio / total_ratio * TAU;
            let slice = Slice { start, sweep };
            start += sweep;
            slice
        })
        .collect()
}

/// Roulette-wheel sampling over `resolved_chance`.
///
/// Returns the last index when rounding leaves the roll past the final
/// cumulative sum, so a non-empty list always yields an index.
pub fn pick_winner_index(options: &[ResolvedOption], rng: &mut impl RandomSource) -> usize {
    let roll = rng.next_unit() * 100.0;
    let mut cumulative = 0.0;
    for (index, opt) in options.iter().enumerate() {
        cumulative += opt.resolved_chance;
        if roll <= cumulative {
            return index;
        }
    }
    options.len().saturating_sub(1)
}

/// Rotation delta that brings a random point inside the winner's slice
/// under the pointer, plus five to nine full turns.
///
/// Draws twice from `rng`: the landing fraction, then the turn count.
///
/// # Panics
///
/// Panics if `winner_index` is out of bounds, which includes an empty list.
pub fn target_angle(
    options: &[ResolvedOption],
    winner_index: usize,
    rng: &mut impl RandomSource,
) -> f64 {
    let slice = slices(options)[winner_index];
    let land_angle = slice.start + slice.sweep * (LANDING_MARGIN + rng.next_unit() * LANDING_SPAN);
    let turns = MIN_FULL_SPINS + (rng.next_unit() * f64::from(FULL_SPIN_CHOICES)).floor() as u32;
    f64::from(turns) * TAU + (POINTER_ANGLE - land_angle)
}

/// Picks the winner and its rotation in one step.
pub fn plan_spin(options: &[ResolvedOption], rng: &mut impl RandomSource) -> SpinOutcome {
    let winner_index = pick_winner_index(options, rng);
    let rotation_delta = target_angle(options, winner_index, rng);
    SpinOutcome {
        winner_index,
        rotation_delta,
    }
}

/// Index of the slice under the pointer when the wheel is rotated by `rotation`.
pub fn slice_under_pointer(options: &[ResolvedOption], rotation: f64) -> usize {
    let local = (POINTER_ANGLE - rotation).rem_euclid(TAU);
    slices(options)
        .iter()
        .position(|slice| local < slice.end())
        .unwrap_or_else(|| options.len().saturating_sub(1))
}
