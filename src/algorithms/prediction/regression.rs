//! Exponentially weighted linear least squares.

/// Denominators smaller than this are treated as singular.
const SINGULAR_EPSILON: f64 = 1e-12;

/// A fitted line `value(t) = slope · t + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Evaluates the line at time `t`.
    pub fn at(&self, t: f64) -> f64 {
        self.slope * t + self.intercept
    }
}

/// Weight of the `i`-th (0-indexed) of `n` samples: `exp(i - n)`.
///
/// The newest sample gets `e⁻¹` and each older one decays by a factor of `e`.
pub fn exponential_weight(i: usize, n: usize) -> f64 {
    (i as f64 - n as f64).exp()
}

#[derive(Debug, Default)]
struct WeightedSums {
    w: f64,
    wt: f64,
    wt2: f64,
    wy: f64,
    wty: f64,
}

/// Fits a line through `samples`, indexed `t = 1..=n`, with exponential
/// recency weights.
///
/// Returns `None` for fewer than two samples, singular normal equations, or
/// a non-finite solution.
pub fn weighted_fit(samples: &[f64]) -> Option<LinearFit> {
    let n = samples.len();
    if n < 2 {
        return None;
    }

    let sums = samples
        .iter()
        .enumerate()
        .fold(WeightedSums::default(), |mut acc, (i, &y)| {
            let t = (i + 1) as f64;
            let w = exponential_weight(i, n);
            acc.w += w;
            acc.wt += w * t;
            acc.wt2 += w * t * t;
            acc.wy += w * y;
            acc.wty += w * t * y;
            acc
        });

    let denominator = sums.w * sums.wt2 - sums.wt * sums.wt;
    if !denominator.is_finite() || denominator.abs() < SINGULAR_EPSILON || sums.w <= 0.0 {
        return None;
    }

    let slope = (sums.w * sums.wty - sums.wt * sums.wy) / denominator;
    let intercept = (sums.wy - slope * sums.wt) / sums.w;

    if slope.is_finite() && intercept.is_finite() {
        Some(LinearFit { slope, intercept })
    } else {
        None
    }
}
