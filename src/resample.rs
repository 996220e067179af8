//! Midpoint-to-sample resampling of derived quantities.
//!
//! Quantities computed over track segments (per-segment bearing, per-interval
//! velocity) are naturally defined at the N−1 midpoints between the N sample
//! coordinates. This module interpolates them back onto the original sample
//! coordinates (elapsed time or cumulative distance) so every derived series
//! aligns index-for-index with the raw channels.
//!
//! Angular quantities interpolate period-aware: with `period = Some(360.0)` a
//! bearing transition 359° → 1° is treated as a 2° change, not a 358° swing
//! through south. Values are unwrapped before interpolation and folded back
//! into [0, period) after.

use crate::error::{Result, TrackError};

/// Resample midpoint-defined `values` onto the `reference` coordinates.
///
/// `values` must have exactly `reference.len() - 1` entries; they are taken to
/// live at the midpoints `reference[i] + (reference[i+1] - reference[i]) / 2`.
/// Interpolation is linear, with nearest-value clamping before the first and
/// after the last midpoint.
///
/// `reference` must be non-decreasing (elapsed time and cumulative distance
/// always are); a decreasing reference is `InvalidInput`, as is a length
/// mismatch.
///
/// # Example
/// ```
/// use track_metrics::resample::resample_midpoints;
///
/// // A constant signal is invariant under resampling.
/// let resampled = resample_midpoints(&[7.5, 7.5, 7.5], &[0.0, 1.0, 2.0, 3.0], None).unwrap();
/// assert_eq!(resampled, vec![7.5; 4]);
/// ```
pub fn resample_midpoints(
    values: &[f64],
    reference: &[f64],
    period: Option<f64>,
) -> Result<Vec<f64>> {
    if reference.len() < 2 {
        return Err(TrackError::invalid(
            "resampling needs a reference of at least 2 coordinates",
        ));
    }
    if values.len() + 1 != reference.len() {
        return Err(TrackError::invalid(format!(
            "expected {} midpoint values for {} reference coordinates, got {}",
            reference.len() - 1,
            reference.len(),
            values.len()
        )));
    }
    if reference.windows(2).any(|w| w[1] < w[0]) {
        return Err(TrackError::invalid(
            "resampling reference must be non-decreasing",
        ));
    }
    if let Some(p) = period {
        if !(p > 0.0) {
            return Err(TrackError::invalid(format!(
                "resampling period must be positive, got {}",
                p
            )));
        }
    }

    let midpoints: Vec<f64> = reference
        .windows(2)
        .map(|w| w[0] + (w[1] - w[0]) / 2.0)
        .collect();

    let unwrapped = match period {
        Some(p) => unwrap_circular(values, p),
        None => values.to_vec(),
    };

    let mut out = Vec::with_capacity(reference.len());
    for &r in reference {
        let y = interpolate(&midpoints, &unwrapped, r);
        out.push(match period {
            Some(p) => y.rem_euclid(p),
            None => y,
        });
    }
    Ok(out)
}

/// Linear interpolation of `(xs, ys)` at `x`, clamped outside the domain.
fn interpolate(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    // Index of the first midpoint >= x.
    let idx = xs.partition_point(|&m| m < x);
    if idx == 0 {
        return ys[0];
    }
    if idx == xs.len() {
        return ys[xs.len() - 1];
    }
    let (x0, x1) = (xs[idx - 1], xs[idx]);
    let (y0, y1) = (ys[idx - 1], ys[idx]);
    let span = x1 - x0;
    if span == 0.0 {
        // Coincident midpoints (zero-length interval in the reference).
        return y0;
    }
    y0 + (x - x0) / span * (y1 - y0)
}

/// Unwrap a circular signal so consecutive differences fall in (−p/2, p/2].
fn unwrap_circular(values: &[f64], period: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut previous = match values.first() {
        Some(&v) => v,
        None => return out,
    };
    out.push(previous);
    for &v in &values[1..] {
        let mut delta = v - previous;
        delta -= period * (delta / period).round();
        previous += delta;
        out.push(previous);
    }
    out
}
