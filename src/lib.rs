//! # Track Metrics
//!
//! Motion-analysis series derived from GPS track points.
//!
//! This library turns an ordered sequence of geographic samples (latitude,
//! longitude, optional elevation, optional timestamp) — as produced by any
//! GPX/FIT parser — into a consistent table of derived series:
//!
//! - **Cumulative distance** along the geodesic path (km)
//! - **Compass bearing** at every sample, period-aware resampled (°)
//! - **Elapsed time** and **velocity** when timestamps are present (s, km/h)
//!
//! plus position smoothing with reflective edge padding and a closest-point
//! query. File parsing, plotting and map rendering are deliberately outside
//! this crate; the derived table is handed to those collaborators through
//! named columns and 1-character short codes.
//!
//! ## Quick Start
//!
//! ```rust
//! use track_metrics::{Track, TrackPoint, Window};
//!
//! let points = vec![
//!     TrackPoint::new(45.011, 5.883),
//!     TrackPoint::new(45.013, 5.887),
//!     TrackPoint::new(45.015, 5.891),
//!     TrackPoint::new(45.017, 5.895),
//! ];
//!
//! let mut track = Track::new(&points).unwrap();
//! println!("total distance: {:.2} km", track.distance().last().unwrap());
//!
//! // Smooth the raw positions; every derived series is rebuilt.
//! track.smooth(3, Window::Flat).unwrap();
//!
//! // Named columns for plotting collaborators ('d' = distance, 'c' = compass).
//! let data = track.data();
//! let (x, y) = data.select_pair("dc").unwrap();
//! assert_eq!(x.label(), "distance (km)");
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{Result, TrackError};

// Geodesic distance and compass bearing primitives
pub mod geodesy;
pub use geodesy::{bearing, distance_km};

// Midpoint-to-sample resampling (period-aware for angular quantities)
pub mod resample;
pub use resample::resample_midpoints;

// Windowed smoothing with reflective boundary padding
pub mod smoothing;
pub use smoothing::{smooth, Window};

// Track container and derived-series builder
pub mod track;
pub use track::Track;

// Named-column table for plotting/mapping collaborators
pub mod table;
pub use table::{Column, TrackData};

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude, in degrees.
///
/// # Example
/// ```
/// use track_metrics::GeoPoint;
/// let point = GeoPoint::new(45.1885, 5.7245); // Grenoble
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new GPS coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check that the coordinate is finite and within valid ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// One parsed track sample: position plus optional elevation and timestamp.
///
/// This is the record an external file-format parser hands to
/// [`Track::new`]. Elevation and timestamp are optional per point; whether
/// the resulting track carries those channels at all is decided over the
/// whole sequence (see [`Track`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub elevation: Option<f64>,
    #[serde(default)]
    pub time: Option<chrono::DateTime<chrono::Utc>>,
}

impl TrackPoint {
    /// Create a bare track point with neither elevation nor timestamp.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation: None,
            time: None,
        }
    }

    /// Attach an elevation in meters.
    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    /// Attach a timestamp.
    pub fn with_time(mut self, time: chrono::DateTime<chrono::Utc>) -> Self {
        self.time = Some(time);
        self
    }

    /// Position of the sample as a [`GeoPoint`].
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}
