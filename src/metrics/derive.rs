//! Daily deltas and centered moving average.
//!
//! The transform is a pure function of its input slice:
//!
//! ```text
//! daily_new[i] = max(cumulative[i] - cumulative[i-1], 0)      (cumulative[-1] = 0)
//! smoothed[i]  = (Σ_{k=i-h}^{i+h} v_k) / W                   (v_k = 0 outside [0, N-1])
//! ```
//!
//! with `W = 7` and `h = 3`. The output is "same" length as the input: near
//! both ends the window is zero-padded but the divisor stays `W`, so the first
//! and last three smoothed values are biased low. That matches a zero-padded
//! `same`-mode convolution and is kept as-is.

use crate::domain::{DerivedSeries, Revision};

/// Width of the smoothing window used by [`derive`].
pub const SMOOTHING_WINDOW: usize = 7;

/// Derive daily new counts and their 7-point centered moving average.
///
/// Empty input yields empty outputs. Ordering is not checked: out-of-order
/// input produces well-defined but meaningless numbers.
pub fn derive(cumulative: &[u64]) -> DerivedSeries {
    derive_with_window(cumulative, SMOOTHING_WINDOW)
}

/// Same as [`derive`] with a caller-chosen window width.
pub fn derive_with_window(cumulative: &[u64], window: usize) -> DerivedSeries {
    let daily_new = daily_new(cumulative);
    let smoothed = centered_moving_average(&daily_new, window);
    DerivedSeries { daily_new, smoothed }
}

/// First difference with an implicit leading zero, clamped at zero.
///
/// Downward revisions of the cumulative counter become `0` rather than a
/// negative count.
pub fn daily_new(cumulative: &[u64]) -> Vec<u64> {
    let mut prev = 0u64;
    cumulative
        .iter()
        .map(|&c| {
            let d = c.saturating_sub(prev);
            prev = c;
            d
        })
        .collect()
}

/// Zero-padded centered moving average with output length equal to input length.
///
/// For output index `i` the window covers `[i - window/2, i + (window-1)/2]`
/// (symmetric for odd widths). Out-of-range positions contribute zero and the
/// divisor is always `window`. A zero window yields all zeros.
pub fn centered_moving_average(values: &[u64], window: usize) -> Vec<f64> {
    let n = values.len();
    if window == 0 {
        return vec![0.0; n];
    }

    // Prefix sums in u128 keep window sums exact before the single division.
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0u128);
    let mut acc = 0u128;
    for &v in values {
        acc += u128::from(v);
        prefix.push(acc);
    }

    let behind = window / 2;
    let ahead = (window - 1) / 2;
    let divisor = window as f64;

    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(behind);
            let hi = (i + ahead + 1).min(n);
            (prefix[hi] - prefix[lo]) as f64 / divisor
        })
        .collect()
}

/// Every index where the cumulative counter decreased.
///
/// Index 0 is never a revision (it is compared against the implicit zero).
pub fn revisions(cumulative: &[u64]) -> Vec<Revision> {
    cumulative
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[1] < pair[0])
        .map(|(idx, pair)| Revision {
            index: idx + 1,
            previous: pair[0],
            current: pair[1],
        })
        .collect()
}
