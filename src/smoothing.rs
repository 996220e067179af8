//! Windowed convolution smoothing with reflective boundary padding.
//!
//! The signal is extended on both ends with point-reflected copies of itself
//! (mirrored about the boundary value) before convolving with a normalized
//! window kernel, which keeps edge transients small and preserves straight
//! trends through the boundary. The output has the same length as the input
//! and no systematic phase shift.
//!
//! This filter is applied to raw position channels only (latitude, longitude,
//! elevation); derived quantities are always recomputed from the smoothed
//! channels rather than smoothed directly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackError};

/// Supported smoothing window shapes.
///
/// `Flat` is a plain moving average; the others taper towards the window
/// edges with the classic cosine/triangular weightings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    Flat,
    Hanning,
    Hamming,
    Bartlett,
    Blackman,
}

impl Window {
    /// Kernel weights of length `n`, not yet normalized.
    fn weights(self, n: usize) -> Vec<f64> {
        use std::f64::consts::PI;
        let m = (n - 1) as f64;
        (0..n)
            .map(|k| {
                let k = k as f64;
                match self {
                    Window::Flat => 1.0,
                    Window::Hanning => 0.5 - 0.5 * (2.0 * PI * k / m).cos(),
                    Window::Hamming => 0.54 - 0.46 * (2.0 * PI * k / m).cos(),
                    Window::Bartlett => {
                        let half = m / 2.0;
                        (half - (k - half).abs()) / half
                    }
                    Window::Blackman => {
                        0.42 - 0.5 * (2.0 * PI * k / m).cos()
                            + 0.08 * (4.0 * PI * k / m).cos()
                    }
                }
            })
            .collect()
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Window::Flat => "flat",
            Window::Hanning => "hanning",
            Window::Hamming => "hamming",
            Window::Bartlett => "bartlett",
            Window::Blackman => "blackman",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Window {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "flat" => Ok(Window::Flat),
            "hanning" => Ok(Window::Hanning),
            "hamming" => Ok(Window::Hamming),
            "bartlett" => Ok(Window::Bartlett),
            "blackman" => Ok(Window::Blackman),
            other => Err(TrackError::invalid(format!(
                "unknown window kind '{}' (expected one of: flat, hanning, hamming, bartlett, blackman)",
                other
            ))),
        }
    }
}

/// Smooth a 1-d signal with a window of the requested size and shape.
///
/// Returns a signal of the same length as the input. `window_size == 1` is
/// the identity. Fails with `InvalidInput` when the window is larger than
/// the signal, when `window_size == 0`, or when the requested window shape
/// has zero total weight at this size (the tapered windows at size 2).
///
/// # Example
/// ```
/// use track_metrics::smoothing::{smooth, Window};
///
/// let noisy = vec![1.0, 3.0, 2.0, 4.0, 3.0, 5.0, 4.0];
/// let smoothed = smooth(&noisy, 5, Window::Hanning).unwrap();
/// assert_eq!(smoothed.len(), noisy.len());
/// ```
pub fn smooth(x: &[f64], window_size: usize, window: Window) -> Result<Vec<f64>> {
    if window_size == 0 {
        return Err(TrackError::invalid("window size must be at least 1"));
    }
    if x.len() < window_size {
        return Err(TrackError::invalid(format!(
            "signal of length {} is shorter than window size {}",
            x.len(),
            window_size
        )));
    }
    if window_size == 1 {
        return Ok(x.to_vec());
    }

    let n = window_size;
    let len = x.len();
    let last = len - 1;

    // Point reflection about the first and last samples, window_size values
    // per side. Mirror indices are clamped for signals barely longer than
    // the window.
    let mut padded = Vec::with_capacity(len + 2 * n);
    for k in 0..n {
        padded.push(2.0 * x[0] - x[(n - k).min(last)]);
    }
    padded.extend_from_slice(x);
    for k in 0..n {
        padded.push(2.0 * x[last] - x[last - (k + 1).min(last)]);
    }

    let weights = window.weights(n);
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(TrackError::invalid(format!(
            "'{}' window of size {} has zero total weight",
            window, n
        )));
    }
    let kernel: Vec<f64> = weights.iter().map(|w| w / total).collect();

    // Valid-mode convolution; the kernels are symmetric, so correlation and
    // convolution coincide.
    let valid_len = padded.len() - n + 1;
    let mut convolved = Vec::with_capacity(valid_len);
    for j in 0..valid_len {
        let acc: f64 = kernel
            .iter()
            .zip(&padded[j..j + n])
            .map(|(w, v)| w * v)
            .sum();
        convolved.push(acc);
    }

    // Drop the leading transient; this exact offset keeps the output in
    // phase with the input.
    let start = n / 2 + 1;
    Ok(convolved[start..start + len].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_size_one_is_identity() {
        let x = vec![1.0, -2.5, 3.75, 0.0, 9.9];
        for window in [
            Window::Flat,
            Window::Hanning,
            Window::Hamming,
            Window::Bartlett,
            Window::Blackman,
        ] {
            assert_eq!(smooth(&x, 1, window).unwrap(), x);
        }
    }

    #[test]
    fn test_window_larger_than_signal_rejected() {
        let x = vec![1.0, 2.0, 3.0];
        let err = smooth(&x, 4, Window::Hanning).unwrap_err();
        assert!(matches!(err, TrackError::InvalidInput { .. }));
    }

    #[test]
    fn test_zero_window_rejected() {
        let err = smooth(&[1.0, 2.0], 0, Window::Flat).unwrap_err();
        assert!(matches!(err, TrackError::InvalidInput { .. }));
    }

    #[test]
    fn test_unknown_window_kind_rejected() {
        let err = "gaussian".parse::<Window>().unwrap_err();
        assert!(matches!(err, TrackError::InvalidInput { .. }));
        assert!(err.to_string().contains("gaussian"));
    }

    #[test]
    fn test_known_window_kinds_parse() {
        assert_eq!("flat".parse::<Window>().unwrap(), Window::Flat);
        assert_eq!("hanning".parse::<Window>().unwrap(), Window::Hanning);
        assert_eq!("hamming".parse::<Window>().unwrap(), Window::Hamming);
        assert_eq!("bartlett".parse::<Window>().unwrap(), Window::Bartlett);
        assert_eq!("blackman".parse::<Window>().unwrap(), Window::Blackman);
    }

    #[test]
    fn test_output_length_preserved() {
        let x: Vec<f64> = (0..40).map(|i| (i as f64 * 0.3).sin()).collect();
        for n in [2, 3, 5, 7, 11] {
            let y = smooth(&x, n, Window::Flat).unwrap();
            assert_eq!(y.len(), x.len(), "window size {}", n);
        }
    }

    #[test]
    fn test_constant_signal_unchanged() {
        let x = vec![4.2; 30];
        let y = smooth(&x, 7, Window::Hamming).unwrap();
        for v in y {
            assert!((v - 4.2).abs() < 1e-12);
        }
    }

    #[test]
    fn test_linear_ramp_preserved() {
        // Point-reflection padding continues a straight line exactly, so a
        // linear ramp must pass through unchanged at every index, including
        // the edges. This pins the slice offset: any phase shift would tilt
        // the comparison off.
        let x: Vec<f64> = (0..25).map(|i| 0.5 * i as f64 - 3.0).collect();
        for window in [Window::Flat, Window::Hanning, Window::Blackman] {
            let y = smooth(&x, 5, window).unwrap();
            for (i, (a, b)) in x.iter().zip(&y).enumerate() {
                assert!((a - b).abs() < 1e-9, "index {}: {} vs {}", i, a, b);
            }
        }
    }

    #[test]
    fn test_smoothing_reduces_oscillation() {
        let x: Vec<f64> = (0..60)
            .map(|i| if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let y = smooth(&x, 9, Window::Hanning).unwrap();
        let max_abs = y[10..50].iter().fold(0.0f64, |m, v| m.max(v.abs()));
        assert!(max_abs < 0.5, "interior still oscillates at {}", max_abs);
    }

    #[test]
    fn test_tapered_window_size_two_rejected() {
        // Hanning/bartlett/blackman weights vanish at both ends of a
        // 2-sample window, leaving nothing to normalize.
        let x = vec![1.0, 2.0, 3.0, 4.0];
        assert!(smooth(&x, 2, Window::Hanning).is_err());
        assert!(smooth(&x, 2, Window::Flat).is_ok());
    }
}
