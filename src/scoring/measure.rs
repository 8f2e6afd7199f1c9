use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use crate::core::error::{Error, Result};

/// Slack applied when turning real-valued bounds into integers, so that a
/// product such as `0.7 * 10.0 = 7.000000000000001` still rounds to 7.
pub const EPSILON: f64 = 1e-9;

/// Similarity measure between two n-gram feature sets.
///
/// Every measure is written in terms of the query size `a`, the candidate
/// size `b` and their overlap `t`, is non-decreasing in `t`, and never
/// exceeds 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Measure {
    /// Identical feature sets only.
    Exact,
    /// `2t / (a + b)`
    Dice,
    /// `t / sqrt(a * b)`
    Cosine,
    /// `t / (a + b - t)`
    Jaccard,
    /// `t / min(a, b)`
    Overlap,
}

impl Measure {
    pub const ALL: [Measure; 5] = [
        Measure::Exact,
        Measure::Dice,
        Measure::Cosine,
        Measure::Jaccard,
        Measure::Overlap,
    ];

    /// Similarity of two feature sets of sizes `a` and `b` sharing `t` features.
    pub fn score(&self, t: usize, a: usize, b: usize) -> f64 {
        if a == 0 || b == 0 {
            return if a == b { 1.0 } else { 0.0 };
        }
        let (t, af, bf) = (t as f64, a as f64, b as f64);
        match self {
            Measure::Exact => {
                if t as usize == a && a == b { 1.0 } else { 0.0 }
            }
            Measure::Dice => 2.0 * t / (af + bf),
            Measure::Cosine => t / (af * bf).sqrt(),
            Measure::Jaccard => t / (af + bf - t),
            Measure::Overlap => t / af.min(bf),
        }
    }

    /// Smallest overlap `t` for which `score(t, a, b) >= threshold`.
    pub fn min_overlap(&self, a: usize, b: usize, threshold: f64) -> usize {
        let (af, bf) = (a as f64, b as f64);
        let bound = match self {
            Measure::Exact => return a,
            Measure::Dice => 0.5 * threshold * (af + bf),
            Measure::Cosine => threshold * (af * bf).sqrt(),
            Measure::Jaccard => threshold * (af + bf) / (1.0 + threshold),
            Measure::Overlap => threshold * af.min(bf),
        };
        ceil(bound).max(1)
    }

    /// Candidate sizes `b` that can reach `threshold` against a query of
    /// size `a` with any overlap `t <= min(a, b)`.
    pub fn candidate_size_range(&self, a: usize, threshold: f64) -> RangeInclusive<usize> {
        let af = a as f64;
        let (lo, hi) = match self {
            Measure::Exact => (a, a),
            Measure::Dice => (
                ceil(threshold * af / (2.0 - threshold)),
                floor((2.0 - threshold) * af / threshold),
            ),
            Measure::Cosine => (
                ceil(threshold * threshold * af),
                floor(af / (threshold * threshold)),
            ),
            Measure::Jaccard => (ceil(threshold * af), floor(af / threshold)),
            Measure::Overlap => (1, usize::MAX),
        };
        lo.max(1)..=hi
    }

    pub fn name(&self) -> &'static str {
        match self {
            Measure::Exact => "exact",
            Measure::Dice => "dice",
            Measure::Cosine => "cosine",
            Measure::Jaccard => "jaccard",
            Measure::Overlap => "overlap",
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Measure {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Measure::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid_parameter(format!("unknown similarity measure '{}'", s)))
    }
}

/// Reject thresholds outside `(0, 1]`.
pub fn validate_threshold(threshold: f64) -> Result<f64> {
    if threshold.is_finite() && threshold > 0.0 && threshold <= 1.0 {
        Ok(threshold)
    } else {
        Err(Error::invalid_parameter(format!(
            "threshold must lie in (0, 1], got {}",
            threshold
        )))
    }
}

/// True when `score` reaches `threshold` up to rounding noise.
///
/// Scores lie in [0, 1], so the absolute `EPSILON` slack is also the relative
/// one: a score at most 1e-9 below `threshold` is accepted.
pub fn meets_threshold(score: f64, threshold: f64) -> bool {
    score + EPSILON >= threshold
}

fn ceil(x: f64) -> usize {
    let v = (x - EPSILON).ceil();
    if v <= 0.0 { 0 } else if v >= usize::MAX as f64 { usize::MAX } else { v as usize }
}

fn floor(x: f64) -> usize {
    let v = (x + EPSILON).floor();
    if v <= 0.0 { 0 } else if v >= usize::MAX as f64 { usize::MAX } else { v as usize }
}
