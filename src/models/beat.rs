//! Fixed-point musical time, tempo and time signature value types
//!
//! All chart positions are stored as an integer tick count (`Beat`) so that
//! thousands of notes can be placed without accumulating floating point drift.
//! A quarter note is [`TICKS_PER_BEAT`] ticks, which lets a 4/4 bar divide
//! exactly into 192nds as well as the common tuplet subdivisions.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign};

use crate::utils::numeric::{gcd, lcm};

/// Ticks per quarter note
pub const TICKS_PER_BEAT: i32 = 20160 / 4;

/// Longest bar a time signature may describe (64 whole 4/4 bars)
pub const MAX_BAR_DURATION: Beat = Beat::from_bars(64);

/// Signed musical position or duration in ticks
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Beat {
    pub ticks: i32,
}

impl Beat {
    pub const ZERO: Beat = Beat { ticks: 0 };

    pub const fn zero() -> Self {
        Self::ZERO
    }

    pub const fn from_ticks(ticks: i32) -> Self {
        Self { ticks }
    }

    pub const fn from_beats(beats: i32) -> Self {
        Self::from_ticks(TICKS_PER_BEAT * beats)
    }

    /// Duration of `bars` bars with `beats_per_bar` quarter notes each
    pub const fn from_bars_with(bars: i32, beats_per_bar: i32) -> Self {
        Self::from_beats(bars * beats_per_bar)
    }

    /// Duration of `bars` 4/4 bars
    pub const fn from_bars(bars: i32) -> Self {
        Self::from_bars_with(bars, 4)
    }

    /// Nearest tick to a fractional quarter note count (half away from zero)
    pub fn from_beats_fraction(fraction: f64) -> Self {
        Self::from_ticks((fraction * TICKS_PER_BEAT as f64).round() as i32)
    }

    pub fn beats_fraction(self) -> f64 {
        self.ticks as f64 / TICKS_PER_BEAT as f64
    }

    pub const fn abs(self) -> Self {
        Self::from_ticks(self.ticks.abs())
    }

    pub fn checked_add(self, rhs: Beat) -> Option<Beat> {
        self.ticks.checked_add(rhs.ticks).map(Beat::from_ticks)
    }

    pub fn saturating_add(self, rhs: Beat) -> Beat {
        Beat::from_ticks(self.ticks.saturating_add(rhs.ticks))
    }
}

impl Add for Beat {
    type Output = Beat;
    fn add(self, rhs: Beat) -> Beat {
        Beat::from_ticks(self.ticks + rhs.ticks)
    }
}

impl Sub for Beat {
    type Output = Beat;
    fn sub(self, rhs: Beat) -> Beat {
        Beat::from_ticks(self.ticks - rhs.ticks)
    }
}

impl Mul<i32> for Beat {
    type Output = Beat;
    fn mul(self, rhs: i32) -> Beat {
        Beat::from_ticks(self.ticks * rhs)
    }
}

impl Mul<Beat> for i32 {
    type Output = Beat;
    fn mul(self, rhs: Beat) -> Beat {
        rhs * self
    }
}

impl Div<i32> for Beat {
    type Output = Beat;
    fn div(self, rhs: i32) -> Beat {
        Beat::from_ticks(self.ticks / rhs)
    }
}

/// How many whole `rhs` fit into `self` (truncating)
impl Div<Beat> for Beat {
    type Output = i32;
    fn div(self, rhs: Beat) -> i32 {
        self.ticks / rhs.ticks
    }
}

impl Rem for Beat {
    type Output = Beat;
    fn rem(self, rhs: Beat) -> Beat {
        Beat::from_ticks(self.ticks % rhs.ticks)
    }
}

impl Neg for Beat {
    type Output = Beat;
    fn neg(self) -> Beat {
        Beat::from_ticks(-self.ticks)
    }
}

impl AddAssign for Beat {
    fn add_assign(&mut self, rhs: Beat) {
        self.ticks += rhs.ticks;
    }
}

impl SubAssign for Beat {
    fn sub_assign(&mut self, rhs: Beat) {
        self.ticks -= rhs.ticks;
    }
}

impl MulAssign<i32> for Beat {
    fn mul_assign(&mut self, rhs: i32) {
        self.ticks *= rhs;
    }
}

impl DivAssign<i32> for Beat {
    fn div_assign(&mut self, rhs: i32) {
        self.ticks /= rhs;
    }
}

impl RemAssign for Beat {
    fn rem_assign(&mut self, rhs: Beat) {
        self.ticks %= rhs.ticks;
    }
}

pub fn floor_beat_to_grid(beat: Beat, grid: Beat) -> Beat {
    Beat::from_ticks((beat.ticks as f64 / grid.ticks as f64).floor() as i32 * grid.ticks)
}

/// Round to the nearest grid line, halfway cases away from zero
pub fn round_beat_to_grid(beat: Beat, grid: Beat) -> Beat {
    Beat::from_ticks((beat.ticks as f64 / grid.ticks as f64).round() as i32 * grid.ticks)
}

pub fn ceil_beat_to_grid(beat: Beat, grid: Beat) -> Beat {
    Beat::from_ticks((beat.ticks as f64 / grid.ticks as f64).ceil() as i32 * grid.ticks)
}

/// Grid spacing for dividing one 4/4 bar into `bar_division` parts
pub const fn grid_beat_snap(bar_division: i32) -> Beat {
    Beat::from_ticks(Beat::from_bars(1).ticks / bar_division)
}

pub const fn is_tuplet_bar_division(bar_division: i32) -> bool {
    bar_division % 3 == 0
}

pub const fn is_quintuplet_bar_division(bar_division: i32) -> bool {
    bar_division % 5 == 0
}

pub const fn is_septuplet_bar_division(bar_division: i32) -> bool {
    bar_division % 7 == 0
}

pub const fn is_nonuplet_bar_division(bar_division: i32) -> bool {
    bar_division % 9 == 0
}

/// Playback time in seconds
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Time {
    pub seconds: f64,
}

impl Time {
    pub const ZERO: Time = Time { seconds: 0.0 };

    pub const fn from_sec(seconds: f64) -> Self {
        Self { seconds }
    }

    pub const fn to_sec(self) -> f64 {
        self.seconds
    }
}

impl Add for Time {
    type Output = Time;
    fn add(self, rhs: Time) -> Time {
        Time::from_sec(self.seconds + rhs.seconds)
    }
}

impl Sub for Time {
    type Output = Time;
    fn sub(self, rhs: Time) -> Time {
        Time::from_sec(self.seconds - rhs.seconds)
    }
}

impl Mul<f64> for Time {
    type Output = Time;
    fn mul(self, rhs: f64) -> Time {
        Time::from_sec(self.seconds * rhs)
    }
}

impl Div<f64> for Time {
    type Output = Time;
    fn div(self, rhs: f64) -> Time {
        Time::from_sec(self.seconds / rhs)
    }
}

impl Neg for Time {
    type Output = Time;
    fn neg(self) -> Time {
        Time::from_sec(-self.seconds)
    }
}

impl AddAssign for Time {
    fn add_assign(&mut self, rhs: Time) {
        self.seconds += rhs.seconds;
    }
}

impl SubAssign for Time {
    fn sub_assign(&mut self, rhs: Time) {
        self.seconds -= rhs.seconds;
    }
}

/// Smallest BPM magnitude for which one tick still fits into `i32` seconds-per-tick math
pub const MIN_ABS_SAFE_BPM: f32 = 60.0 / i32::MAX as f32;

/// Tempo in quarter notes per minute; may be negative (scroll effects)
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tempo {
    pub bpm: f32,
}

impl Tempo {
    pub const fn new(bpm: f32) -> Self {
        Self { bpm }
    }

    /// Clamp the magnitude to at least [`MIN_ABS_SAFE_BPM`] while keeping the sign
    pub fn safety_checked(self) -> Self {
        if self.bpm < 0.0 {
            Self::new(self.bpm.min(-MIN_ABS_SAFE_BPM))
        } else {
            Self::new(self.bpm.max(MIN_ABS_SAFE_BPM))
        }
    }
}

/// Time signature as `numerator / denominator`
///
/// Signatures take part in fraction arithmetic when the exporter recombines
/// measure fragments, so both fields are signed and may be non-reduced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSignature {
    pub numerator: i32,
    pub denominator: i32,
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

impl TimeSignature {
    pub const fn new(numerator: i32, denominator: i32) -> Self {
        Self { numerator, denominator }
    }

    pub const fn beats_per_bar(self) -> i32 {
        self.numerator
    }

    pub const fn duration_per_beat(self) -> Beat {
        if self.denominator == 0 {
            return Beat::ZERO;
        }
        Beat::from_ticks(Beat::from_bars(1).ticks / self.denominator)
    }

    /// Unclamped bar length in ticks, `None` for a zero denominator
    fn bar_ticks(self) -> Option<i64> {
        let sim = self.simplified(0);
        if sim.denominator == 0 {
            return None;
        }
        Some(Beat::from_bars(1).ticks as i64 * sim.numerator as i64 / sim.denominator as i64)
    }

    /// Duration of one bar, computed from the reduced fraction
    ///
    /// Zero for a zero denominator. Clamped to `±MAX_BAR_DURATION`.
    pub fn duration_per_bar(self) -> Beat {
        let limit = MAX_BAR_DURATION.ticks as i64;
        self.bar_ticks().map_or(Beat::ZERO, |ticks| {
            let clamped = ticks.clamp(-limit, limit);
            Beat::from_ticks(i32::try_from(clamped).unwrap_or(MAX_BAR_DURATION.ticks))
        })
    }

    /// True when one bar is no longer than [`MAX_BAR_DURATION`] either way
    pub fn fits_max_bar_duration(self) -> bool {
        self.bar_ticks().map_or(true, |ticks| ticks.abs() <= MAX_BAR_DURATION.ticks as i64)
    }

    /// Reduce by GCD, then steer the denominator towards `denom_target`
    ///
    /// A target of 0 means "no preference". A zero denominator is left untouched.
    pub fn simplify(&mut self, denom_target: i32) {
        if self.denominator == 0 {
            return;
        }
        let divisor = gcd(self.numerator, self.denominator);
        self.numerator /= divisor;
        self.denominator /= divisor;

        if self.numerator == 0 && denom_target != 0 {
            self.denominator = denom_target;
        } else if denom_target != 0
            && denom_target % self.denominator == 0
            && (denom_target / self.denominator).abs() < (i32::MAX / self.numerator).abs()
        {
            self.numerator *= denom_target / self.denominator;
            self.denominator = denom_target;
        } else if (self.denominator < 0) != (denom_target < 0) {
            self.numerator = -self.numerator;
            self.denominator = -self.denominator;
        }
    }

    pub fn simplified(mut self, denom_target: i32) -> Self {
        self.simplify(denom_target);
        self
    }

    /// Sign of the fraction as a whole (-1, 0 or 1)
    pub fn sign(self) -> i32 {
        self.numerator.signum() * if self.denominator < 0 { -1 } else { 1 }
    }

    fn combine_target(self, other: TimeSignature) -> i32 {
        self.denominator.abs().min(other.denominator.abs())
    }
}

/// Rejects zero numerators, denominators that do not divide a 4/4 bar into whole ticks,
/// and bars longer than [`MAX_BAR_DURATION`]
pub fn is_time_signature_supported(sig: TimeSignature) -> bool {
    sig.numerator != 0
        && sig.denominator > 0
        && Beat::from_bars(1).ticks % sig.denominator == 0
        && sig.fits_max_bar_duration()
}

impl Add for TimeSignature {
    type Output = TimeSignature;
    fn add(self, other: TimeSignature) -> TimeSignature {
        let this_sim = self.simplified(0);
        let other_sim = other.simplified(0);
        let denom = lcm(this_sim.denominator, other_sim.denominator);
        let (factor_this, factor_other) = if denom == 0 {
            (0, 0)
        } else {
            (denom / this_sim.denominator, denom / other_sim.denominator)
        };
        TimeSignature::new(
            factor_this * this_sim.numerator + factor_other * other_sim.numerator,
            denom,
        )
        .simplified(self.combine_target(other))
    }
}

impl Sub for TimeSignature {
    type Output = TimeSignature;
    fn sub(self, other: TimeSignature) -> TimeSignature {
        self + -other
    }
}

impl Mul for TimeSignature {
    type Output = TimeSignature;
    fn mul(self, other: TimeSignature) -> TimeSignature {
        let this_sim = self.simplified(0);
        let other_sim = other.simplified(0);
        TimeSignature::new(
            this_sim.numerator * other_sim.numerator,
            this_sim.denominator * other_sim.denominator,
        )
        .simplified(self.combine_target(other))
    }
}

impl Div for TimeSignature {
    type Output = TimeSignature;
    fn div(self, other: TimeSignature) -> TimeSignature {
        self * TimeSignature::new(other.denominator, other.numerator)
    }
}

impl Mul<i32> for TimeSignature {
    type Output = TimeSignature;
    fn mul(self, rate: i32) -> TimeSignature {
        self * TimeSignature::new(rate, 1)
    }
}

impl Div<i32> for TimeSignature {
    type Output = TimeSignature;
    fn div(self, rate: i32) -> TimeSignature {
        self * TimeSignature::new(1, rate)
    }
}

impl Neg for TimeSignature {
    type Output = TimeSignature;
    fn neg(self) -> TimeSignature {
        TimeSignature::new(-self.numerator, self.denominator)
    }
}

/// Used when no tempo change is defined (empty list or before the first change)
pub const FALLBACK_TEMPO: Tempo = Tempo::new(120.0);
/// Used when no time signature change is defined
pub const FALLBACK_TIME_SIGNATURE: TimeSignature = TimeSignature::new(4, 4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_is_20160_ticks() {
        assert_eq!(Beat::from_bars(1).ticks, 20160);
        assert_eq!(grid_beat_snap(192).ticks, 105);
        assert_eq!(grid_beat_snap(4), Beat::from_beats(1));
    }

    #[test]
    fn test_beats_fraction_rounds_half_away_from_zero() {
        assert_eq!(Beat::from_beats_fraction(0.5).ticks, 2520);
        assert_eq!(Beat::from_beats_fraction(-0.5).ticks, -2520);
        assert_eq!(Beat::from_beats(3).beats_fraction(), 3.0);
    }

    #[test]
    fn test_grid_rounding() {
        let grid = Beat::from_ticks(10);
        assert_eq!(round_beat_to_grid(Beat::from_ticks(15), grid).ticks, 20);
        assert_eq!(round_beat_to_grid(Beat::from_ticks(-15), grid).ticks, -20);
        assert_eq!(floor_beat_to_grid(Beat::from_ticks(-1), grid).ticks, -10);
        assert_eq!(ceil_beat_to_grid(Beat::from_ticks(1), grid).ticks, 10);
        assert_eq!(floor_beat_to_grid(Beat::from_ticks(19), grid).ticks, 10);
    }

    #[test]
    fn test_beat_division() {
        assert_eq!(Beat::from_bars(2) / Beat::from_beats(1), 8);
        assert_eq!((Beat::from_ticks(7) % Beat::from_ticks(5)).ticks, 2);
        assert_eq!((-Beat::from_ticks(7)).abs().ticks, 7);
        assert_eq!((2 * Beat::from_ticks(7)).ticks, 14);
    }

    #[test]
    fn test_tuplet_divisions() {
        assert!(is_tuplet_bar_division(12));
        assert!(is_quintuplet_bar_division(20));
        assert!(is_septuplet_bar_division(28));
        assert!(is_nonuplet_bar_division(36));
        assert!(!is_tuplet_bar_division(16));
    }

    #[test]
    fn test_tempo_safety_keeps_sign() {
        assert_eq!(Tempo::new(0.0).safety_checked().bpm, MIN_ABS_SAFE_BPM);
        assert_eq!(Tempo::new(-0.0).safety_checked().bpm, MIN_ABS_SAFE_BPM);
        assert_eq!(Tempo::new(-1e-20).safety_checked().bpm, -MIN_ABS_SAFE_BPM);
        assert_eq!(Tempo::new(-150.0).safety_checked().bpm, -150.0);
        assert_eq!(Tempo::new(150.0).safety_checked().bpm, 150.0);
    }

    #[test]
    fn test_simplify_reduces_by_gcd() {
        assert_eq!(TimeSignature::new(6, 8).simplified(0), TimeSignature::new(3, 4));
        assert_eq!(TimeSignature::new(-6, 8).simplified(0), TimeSignature::new(-3, 4));
        assert_eq!(TimeSignature::new(4, 0).simplified(0), TimeSignature::new(4, 0));
    }

    #[test]
    fn test_simplify_scales_to_target() {
        assert_eq!(TimeSignature::new(3, 4).simplified(8), TimeSignature::new(6, 8));
        // 3/4 cannot be expressed over 6ths; falls back to the reduced form
        assert_eq!(TimeSignature::new(3, 4).simplified(6), TimeSignature::new(3, 4));
        // numerator collapsed to zero adopts the target
        assert_eq!(TimeSignature::new(0, 4).simplified(16), TimeSignature::new(0, 16));
    }

    #[test]
    fn test_simplify_normalizes_negative_denominator() {
        assert_eq!(TimeSignature::new(3, -4).simplified(0), TimeSignature::new(-3, 4));
        assert_eq!(TimeSignature::new(3, 4).simplified(-3), TimeSignature::new(-3, -4));
    }

    #[test]
    fn test_signature_addition_of_six_eight_and_one_four() {
        // 3/4 + 1/4 = 4/4 = 1/1, scaled back up to the smaller input denominator
        let sum = TimeSignature::new(6, 8) + TimeSignature::new(1, 4);
        assert_eq!(sum, TimeSignature::new(4, 4));
    }

    #[test]
    fn test_signature_arithmetic() {
        assert_eq!(TimeSignature::new(4, 4) - TimeSignature::new(1, 4), TimeSignature::new(3, 4));
        assert_eq!(TimeSignature::new(1, 4) - TimeSignature::new(1, 4), TimeSignature::new(0, 4));
        // target is min(4, 1) so 6/4 stays reduced
        assert_eq!(TimeSignature::new(3, 4) * 2, TimeSignature::new(3, 2));
        assert_eq!(TimeSignature::new(3, 4) / 3, TimeSignature::new(1, 4));
        assert_eq!(
            TimeSignature::new(3, 8) / TimeSignature::new(3, 4),
            TimeSignature::new(1, 2)
        );
        assert_eq!(-TimeSignature::new(3, 4), TimeSignature::new(-3, 4));
    }

    #[test]
    fn test_signature_sign() {
        assert_eq!(TimeSignature::new(3, 4).sign(), 1);
        assert_eq!(TimeSignature::new(-3, 4).sign(), -1);
        assert_eq!(TimeSignature::new(-3, -4).sign(), 1);
        assert_eq!(TimeSignature::new(0, 4).sign(), 0);
    }

    #[test]
    fn test_duration_per_bar() {
        assert_eq!(TimeSignature::new(4, 4).duration_per_bar(), Beat::from_bars(1));
        assert_eq!(TimeSignature::new(6, 8).duration_per_bar(), Beat::from_beats(3));
        assert_eq!(TimeSignature::new(7, 16).duration_per_bar().ticks, 8820);
        assert_eq!(TimeSignature::new(3, 4).duration_per_beat(), Beat::from_beats(1));
    }

    #[test]
    fn test_supported_signatures() {
        assert!(is_time_signature_supported(TimeSignature::new(4, 4)));
        assert!(is_time_signature_supported(TimeSignature::new(7, 64)));
        assert!(is_time_signature_supported(TimeSignature::new(5, 7)));
        assert!(!is_time_signature_supported(TimeSignature::new(4, 11)));
        assert!(!is_time_signature_supported(TimeSignature::new(0, 4)));
        assert!(!is_time_signature_supported(TimeSignature::new(4, 0)));
        assert!(!is_time_signature_supported(TimeSignature::new(4, -4)));
        assert!(is_time_signature_supported(TimeSignature::new(256, 4)));
        assert!(!is_time_signature_supported(TimeSignature::new(257, 4)));
        assert!(!is_time_signature_supported(TimeSignature::new(100000, 1)));
    }

    #[test]
    fn test_oversized_bar_is_clamped() {
        assert_eq!(TimeSignature::new(256, 4).duration_per_bar(), MAX_BAR_DURATION);
        assert_eq!(TimeSignature::new(1000000, 1).duration_per_bar(), MAX_BAR_DURATION);
        assert_eq!(TimeSignature::new(-1000000, 1).duration_per_bar(), -MAX_BAR_DURATION);
        assert_eq!(TimeSignature::new(i32::MAX, 1).duration_per_bar(), MAX_BAR_DURATION);
        assert!(TimeSignature::new(4, 0).fits_max_bar_duration());
        assert!(!TimeSignature::new(1000000, 1).fits_max_bar_duration());
    }

    #[test]
    fn test_saturating_beat_add() {
        let near_end = Beat::from_ticks(i32::MAX - 10);
        assert_eq!(near_end.checked_add(Beat::from_ticks(20)), None);
        assert_eq!(near_end.saturating_add(Beat::from_ticks(20)), Beat::from_ticks(i32::MAX));
        assert_eq!(Beat::ZERO.checked_add(Beat::from_bars(1)), Some(Beat::from_bars(1)));
    }
}
