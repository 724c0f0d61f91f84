//! Running mean/variance accumulators
//!
//! A [`MeanVarStat`] keeps the frequency, sum and sum of squares of a random
//! variable (usually a per-game win indicator or win points) and derives the
//! mean, variance and standard error of the mean from them. The aggregate
//! server ships these as `[freq, sum, sum_sq]` triples, which is also the
//! serialized form of the struct.
//!
//! [`DiffStat`] compares the means of two accumulators.

use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

use crate::render::{format_mean_var, round_to};

/// A raw `[frequency, sum, sum_of_squares]` triple
pub type StatTuple = [f64; 3];

/// Variance reported when there are too few samples for an unbiased estimate
pub const INSUFFICIENT_SAMPLES_VARIANCE: f64 = 1e10;

/// Standard errors at or above this are rendered as `-`
pub const UNUSABLE_STANDARD_ERROR: f64 = 10000.0;

/// Prior worth the win points of one two-player win and one two-player loss.
///
/// Adding it to a raw tuple keeps rare events from producing extreme
/// estimates: a card that won twice and never lost should not be reported as
/// always winning.
pub fn simple_win_prior() -> StatTuple {
    [2.0, 2.0, 4.0]
}

/// Frequency, sum and sum of squares of observed outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StatTuple", into = "StatTuple")]
pub struct MeanVarStat {
    freq: f64,
    sum: f64,
    sum_sq: f64,
}

/// Derived numbers for one accumulator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatSummary {
    pub mean: f64,
    pub standard_error: f64,
    pub freq: f64,
}

impl MeanVarStat {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an accumulator from a raw triple
    pub fn from_tuple(raw: StatTuple) -> Self {
        Self {
            freq: raw[0],
            sum: raw[1],
            sum_sq: raw[2],
        }
    }

    /// Create an accumulator from a raw triple merged with a prior
    pub fn with_prior(raw: StatTuple, prior: StatTuple) -> Self {
        Self::from_tuple(raw) + Self::from_tuple(prior)
    }

    /// Create an accumulator from a raw triple and an optional prior
    pub fn from_parts(raw: StatTuple, prior: Option<StatTuple>) -> Self {
        match prior {
            Some(prior) => Self::with_prior(raw, prior),
            None => Self::from_tuple(raw),
        }
    }

    /// The `[freq, sum, sum_sq]` triple
    pub fn to_tuple(&self) -> StatTuple {
        [self.freq, self.sum, self.sum_sq]
    }

    /// Record a single observation
    pub fn add_outcome(&mut self, val: f64) {
        self.freq += 1.0;
        self.sum += val;
        self.sum_sq += val * val;
    }

    /// Record `freq` observations of the same value
    pub fn add_many_outcomes(&mut self, val: f64, freq: f64) {
        self.freq += freq;
        self.sum += val * freq;
        self.sum_sq += val * val * freq;
    }

    /// Fold another accumulator into this one
    pub fn merge(&mut self, other: &MeanVarStat) {
        *self += *other;
    }

    /// Number of observations, prior included
    pub fn freq(&self) -> f64 {
        self.freq
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn sum_sq(&self) -> f64 {
        self.sum_sq
    }

    /// Sample mean. Callers must ensure `freq() > 0`; otherwise the result is
    /// NaN or infinite.
    pub fn mean(&self) -> f64 {
        self.sum / self.freq
    }

    /// Bias-corrected sample variance, or [`INSUFFICIENT_SAMPLES_VARIANCE`]
    /// when `freq <= 1`.
    pub fn variance(&self) -> f64 {
        if self.freq <= 1.0 {
            return INSUFFICIENT_SAMPLES_VARIANCE;
        }
        (self.sum_sq - self.sum * self.sum / self.freq) / (self.freq - 1.0)
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Standard error of the mean: `sqrt(variance / freq)`
    pub fn standard_error(&self) -> f64 {
        (self.variance() / self.freq).sqrt()
    }

    /// Snapshot of mean, standard error and frequency
    pub fn summary(&self) -> StatSummary {
        StatSummary {
            mean: self.mean(),
            standard_error: self.standard_error(),
            freq: self.freq,
        }
    }

    /// `"<mean> ± <stderr>"`, each rounded to `digits` decimal places
    pub fn render_mean_var(&self, digits: u32) -> String {
        format_mean_var(self.mean(), self.standard_error(), digits)
    }

    /// Mean with a `factor` standard error interval, two decimals, or `-`
    /// when the estimate is unusable.
    pub fn render_interval(&self, factor: f64) -> String {
        render_interval(self.mean(), self.standard_error(), factor)
    }

    /// Mean rounded to `digits` places
    pub fn rounded_mean(&self, digits: u32) -> f64 {
        round_to(self.mean(), digits)
    }

    /// Compare this distribution's mean against another's
    pub fn mean_diff<'a>(&'a self, other: &'a MeanVarStat) -> DiffStat<'a> {
        DiffStat::new(self, other)
    }
}

impl From<StatTuple> for MeanVarStat {
    fn from(raw: StatTuple) -> Self {
        Self::from_tuple(raw)
    }
}

impl From<MeanVarStat> for StatTuple {
    fn from(stat: MeanVarStat) -> Self {
        stat.to_tuple()
    }
}

impl Add for MeanVarStat {
    type Output = MeanVarStat;

    fn add(self, o: MeanVarStat) -> MeanVarStat {
        MeanVarStat {
            freq: self.freq + o.freq,
            sum: self.sum + o.sum,
            sum_sq: self.sum_sq + o.sum_sq,
        }
    }
}

impl AddAssign for MeanVarStat {
    fn add_assign(&mut self, o: MeanVarStat) {
        self.freq += o.freq;
        self.sum += o.sum;
        self.sum_sq += o.sum_sq;
    }
}

impl Sub for MeanVarStat {
    type Output = MeanVarStat;

    fn sub(self, o: MeanVarStat) -> MeanVarStat {
        MeanVarStat {
            freq: self.freq - o.freq,
            sum: self.sum - o.sum,
            sum_sq: self.sum_sq - o.sum_sq,
        }
    }
}

/// Difference in means of two distributions
#[derive(Debug, Clone, Copy)]
pub struct DiffStat<'a> {
    lhs: &'a MeanVarStat,
    rhs: &'a MeanVarStat,
}

impl<'a> DiffStat<'a> {
    pub fn new(lhs: &'a MeanVarStat, rhs: &'a MeanVarStat) -> Self {
        Self { lhs, rhs }
    }

    /// Frequency of the left-hand distribution
    pub fn freq(&self) -> f64 {
        self.lhs.freq()
    }

    pub fn mean(&self) -> f64 {
        self.lhs.mean() - self.rhs.mean()
    }

    /// Standard errors combine in quadrature
    pub fn standard_error(&self) -> f64 {
        self.lhs.standard_error().hypot(self.rhs.standard_error())
    }

    pub fn render_interval(&self, factor: f64) -> String {
        render_interval(self.mean(), self.standard_error(), factor)
    }

    /// The difference expressed in standard errors, or `-` with no samples
    pub fn render_std_devs(&self) -> String {
        if self.freq() == 0.0 {
            return "-".to_string();
        }
        format!("{:.2}", self.mean() / self.standard_error())
    }
}

fn render_interval(mean: f64, standard_error: f64, factor: f64) -> String {
    if standard_error >= UNUSABLE_STANDARD_ERROR {
        return "-".to_string();
    }
    format!("{:.2} ± {:.2}", mean, factor * standard_error)
}
