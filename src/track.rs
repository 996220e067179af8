//! Track container and the derived-series builder.
//!
//! A [`Track`] owns the raw channels of a parsed GPS track (latitude,
//! longitude, optional elevation, optional timestamps) and an eagerly
//! computed snapshot of every derived series: cumulative distance, compass
//! bearing, and — when timestamps are present — elapsed seconds and velocity.
//!
//! Derived series are rebuilt wholesale whenever the raw channels change
//! ([`Track::smooth`] is the only mutator), so raw and derived data can never
//! drift apart.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackError};
use crate::geodesy::{bearing, distance_km};
use crate::resample::resample_midpoints;
use crate::smoothing::{smooth, Window};
use crate::table::TrackData;
use crate::{GeoPoint, TrackPoint};

/// Minimum number of samples for segment-based derivation.
const MIN_POINTS: usize = 2;

/// Compass period in degrees, used for circular bearing resampling.
const BEARING_PERIOD: f64 = 360.0;

/// A GPS track with raw position channels and derived motion series.
///
/// Channel presence is all-or-nothing and decided once at construction: the
/// elevation channel exists if any input point carries elevation, the time
/// channel if any point carries a timestamp. Accessors for series that
/// depend on an absent channel return [`TrackError::MissingChannel`].
///
/// # Example
/// ```
/// use track_metrics::{Track, TrackPoint};
///
/// let points = vec![
///     TrackPoint::new(45.011, 5.883),
///     TrackPoint::new(45.013, 5.887),
///     TrackPoint::new(45.015, 5.891),
/// ];
/// let track = Track::new(&points).unwrap();
/// assert_eq!(track.distance()[0], 0.0);
/// assert!(track.velocity().is_err()); // no timestamps
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Track {
    latitude: Vec<f64>,
    longitude: Vec<f64>,
    elevation: Option<Vec<f64>>,
    time: Option<Vec<DateTime<Utc>>>,
    #[serde(flatten)]
    derived: DerivedSeries,
}

/// Snapshot of all series derived from the raw channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DerivedSeries {
    distance: Vec<f64>,
    bearing: Vec<f64>,
    elapsed_seconds: Option<Vec<f64>>,
    velocity: Option<Vec<f64>>,
}

impl Track {
    /// Build a track from parsed point records and derive all series.
    ///
    /// Fails with `DegenerateInput` for fewer than 2 points, and with
    /// `InvalidInput` for non-finite coordinates, decreasing timestamps, or
    /// a time channel with per-point gaps (timestamps are all-or-nothing).
    pub fn new(points: &[TrackPoint]) -> Result<Self> {
        if points.len() < MIN_POINTS {
            return Err(TrackError::degenerate(format!(
                "track has {} points, at least {} required",
                points.len(),
                MIN_POINTS
            )));
        }
        for (i, pt) in points.iter().enumerate() {
            if !pt.position().is_valid() {
                return Err(TrackError::invalid(format!(
                    "point {} has invalid coordinates ({}, {})",
                    i, pt.latitude, pt.longitude
                )));
            }
        }

        let latitude: Vec<f64> = points.iter().map(|p| p.latitude).collect();
        let longitude: Vec<f64> = points.iter().map(|p| p.longitude).collect();

        // Elevation channel exists if any point has one; gaps inside a
        // present channel become NaN.
        let elevation = if points.iter().any(|p| p.elevation.is_some()) {
            Some(
                points
                    .iter()
                    .map(|p| p.elevation.unwrap_or(f64::NAN))
                    .collect(),
            )
        } else {
            None
        };

        // The time channel is stricter: a partially timestamped track has no
        // usable elapsed-time axis, so gaps are rejected outright.
        let time = if points.iter().any(|p| p.time.is_some()) {
            let mut stamps = Vec::with_capacity(points.len());
            for (i, pt) in points.iter().enumerate() {
                match pt.time {
                    Some(t) => stamps.push(t),
                    None => {
                        return Err(TrackError::invalid(format!(
                            "point {} lacks a timestamp while the track has a time channel",
                            i
                        )))
                    }
                }
            }
            if stamps.windows(2).any(|w| w[1] < w[0]) {
                return Err(TrackError::invalid("timestamps must be non-decreasing"));
            }
            Some(stamps)
        } else {
            None
        };

        let derived = DerivedSeries::build(&latitude, &longitude, time.as_deref())?;
        Ok(Track {
            latitude,
            longitude,
            elevation,
            time,
            derived,
        })
    }

    /// Number of samples in the track.
    pub fn len(&self) -> usize {
        self.latitude.len()
    }

    /// Always false: construction requires at least 2 samples.
    pub fn is_empty(&self) -> bool {
        self.latitude.is_empty()
    }

    /// Whether the track carries a timestamp channel.
    pub fn has_time(&self) -> bool {
        self.time.is_some()
    }

    /// Whether the track carries an elevation channel.
    pub fn has_elevation(&self) -> bool {
        self.elevation.is_some()
    }

    /// Raw latitude channel, degrees.
    pub fn latitude(&self) -> &[f64] {
        &self.latitude
    }

    /// Raw longitude channel, degrees.
    pub fn longitude(&self) -> &[f64] {
        &self.longitude
    }

    /// Position of sample `i`.
    ///
    /// # Panics
    /// Panics if `i` is out of bounds.
    pub fn point(&self, i: usize) -> GeoPoint {
        GeoPoint::new(self.latitude[i], self.longitude[i])
    }

    /// Elevation channel in meters, or `MissingChannel` if absent.
    pub fn elevation(&self) -> Result<&[f64]> {
        self.elevation
            .as_deref()
            .ok_or_else(|| TrackError::missing("elevation (m)", "elevation"))
    }

    /// Timestamp channel, or `MissingChannel` if absent.
    pub fn time(&self) -> Result<&[DateTime<Utc>]> {
        self.time
            .as_deref()
            .ok_or_else(|| TrackError::missing("time", "time"))
    }

    /// Cumulative geodesic distance in kilometers; starts at 0 and never
    /// decreases.
    pub fn distance(&self) -> &[f64] {
        &self.derived.distance
    }

    /// Compass bearing in [0, 360) at each sample, resampled from segment
    /// bearings.
    pub fn bearing(&self) -> &[f64] {
        &self.derived.bearing
    }

    /// Seconds elapsed since the first sample, or `MissingChannel` if the
    /// track has no timestamps.
    pub fn elapsed_seconds(&self) -> Result<&[f64]> {
        self.derived
            .elapsed_seconds
            .as_deref()
            .ok_or_else(|| TrackError::missing("duration (s)", "time"))
    }

    /// Velocity in km/h at each sample, or `MissingChannel` if the track has
    /// no timestamps.
    ///
    /// Samples adjacent to an interval with zero elapsed time carry the NaN
    /// sentinel rather than failing the whole series (see
    /// [`DerivedSeries::build`] internals): velocity is undefined there.
    pub fn velocity(&self) -> Result<&[f64]> {
        self.derived
            .velocity
            .as_deref()
            .ok_or_else(|| TrackError::missing("velocity (km/h)", "time"))
    }

    /// Smooth the raw position channels in place and rebuild every derived
    /// series.
    ///
    /// Latitude, longitude and (if present) elevation are filtered
    /// independently with the same window; derived series are recomputed
    /// from the smoothed channels, never smoothed directly. On error the
    /// track is left untouched.
    pub fn smooth(&mut self, window_size: usize, window: Window) -> Result<()> {
        let latitude = smooth(&self.latitude, window_size, window)?;
        let longitude = smooth(&self.longitude, window_size, window)?;
        let elevation = match &self.elevation {
            Some(z) => Some(smooth(z, window_size, window)?),
            None => None,
        };

        let derived = DerivedSeries::build(&latitude, &longitude, self.time.as_deref())?;

        debug!(
            "smoothed {} samples with {} window of size {}",
            latitude.len(),
            window,
            window_size
        );

        self.latitude = latitude;
        self.longitude = longitude;
        self.elevation = elevation;
        self.derived = derived;
        Ok(())
    }

    /// Index of the trajectory sample closest to `pt`, by geodesic distance.
    ///
    /// Linear scan over all samples; ties break to the lowest index.
    pub fn closest_index(&self, pt: GeoPoint) -> usize {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for i in 0..self.len() {
            let d = distance_km(pt, self.point(i));
            if d < best_distance {
                best = i;
                best_distance = d;
            }
        }
        best
    }

    /// Snapshot of all raw and derived columns for external plotting and
    /// mapping collaborators.
    pub fn data(&self) -> TrackData {
        TrackData {
            latitude: self.latitude.clone(),
            longitude: self.longitude.clone(),
            distance: self.derived.distance.clone(),
            bearing: self.derived.bearing.clone(),
            elevation: self.elevation.clone(),
            time: self.time.clone(),
            elapsed_seconds: self.derived.elapsed_seconds.clone(),
            velocity: self.derived.velocity.clone(),
        }
    }
}

impl DerivedSeries {
    /// Derive every series the available channels allow.
    ///
    /// Always computes cumulative distance and resampled bearing; elapsed
    /// seconds and velocity only when timestamps are given. Bearing
    /// resampling uses elapsed time as the interpolation coordinate when
    /// available (motion is sampled more evenly in time than in space) and
    /// cumulative distance otherwise.
    fn build(
        latitude: &[f64],
        longitude: &[f64],
        time: Option<&[DateTime<Utc>]>,
    ) -> Result<DerivedSeries> {
        let n = latitude.len();

        // Cumulative geodesic path length, km.
        let mut distance = Vec::with_capacity(n);
        distance.push(0.0);
        for i in 1..n {
            let step = distance_km(
                GeoPoint::new(latitude[i - 1], longitude[i - 1]),
                GeoPoint::new(latitude[i], longitude[i]),
            );
            distance.push(distance[i - 1] + step);
        }

        let elapsed_seconds = time.map(|stamps| {
            stamps
                .iter()
                .map(|t| {
                    let delta = t.signed_duration_since(stamps[0]);
                    delta.num_milliseconds() as f64 / 1000.0
                })
                .collect::<Vec<f64>>()
        });

        // Segment bearings live at interval midpoints; bring them back onto
        // the sample coordinates.
        let segment_bearings: Vec<f64> = (1..n)
            .map(|i| {
                bearing(
                    GeoPoint::new(latitude[i - 1], longitude[i - 1]),
                    GeoPoint::new(latitude[i], longitude[i]),
                )
            })
            .collect();
        let reference = elapsed_seconds.as_deref().unwrap_or(&distance);
        let bearing = resample_midpoints(&segment_bearings, reference, Some(BEARING_PERIOD))?;

        // Velocity at interval midpoints, km/h. A zero-duration interval has
        // no defined velocity; NaN marks it without failing the series.
        let velocity = match elapsed_seconds.as_deref() {
            Some(seconds) => {
                let midpoint_velocity: Vec<f64> = (1..n)
                    .map(|i| {
                        let dt = seconds[i] - seconds[i - 1];
                        let dd = distance[i] - distance[i - 1];
                        if dt == 0.0 {
                            f64::NAN
                        } else {
                            3600.0 * dd / dt
                        }
                    })
                    .collect();
                Some(resample_midpoints(&midpoint_velocity, seconds, None)?)
            }
            None => None,
        };

        debug!(
            "derived series rebuilt: {} samples, time channel: {}",
            n,
            time.is_some()
        );

        Ok(DerivedSeries {
            distance,
            bearing,
            elapsed_seconds,
            velocity,
        })
    }
}
