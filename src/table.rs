//! Named-column view of a track for external plotting and mapping.
//!
//! [`TrackData`] is an immutable snapshot of every raw and derived column,
//! addressable through the 1-character short names plotting collaborators
//! use (`'t'` = time, `'d'` = distance, `'v'` = velocity, ...). A 2-character
//! mode string such as `"tv"` selects an x/y column pair.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::{Result, TrackError};

/// Short plot codes mapped to column labels.
static SHORT_NAMES: Lazy<HashMap<char, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ('t', "time"),
        ('s', "duration (s)"),
        ('d', "distance (km)"),
        ('v', "velocity (km/h)"),
        ('z', "elevation (m)"),
        ('c', "compass (°)"),
        ('x', "longitude (°)"),
        ('y', "latitude (°)"),
    ])
});

/// Snapshot of all track columns, aligned index-for-index.
///
/// Produced by [`crate::Track::data`]. Optional columns are `None` when the
/// track lacks the backing channel. Serializes to JSON for consumers outside
/// the crate.
#[derive(Debug, Clone, Serialize)]
pub struct TrackData {
    pub latitude: Vec<f64>,
    pub longitude: Vec<f64>,
    pub distance: Vec<f64>,
    pub bearing: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<Vec<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_seconds: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity: Option<Vec<f64>>,
}

/// One selected column: either a numeric series or the timestamp series.
#[derive(Debug, Clone, Copy)]
pub enum Column<'a> {
    Values {
        label: &'static str,
        values: &'a [f64],
    },
    Time {
        label: &'static str,
        values: &'a [DateTime<Utc>],
    },
}

impl<'a> Column<'a> {
    /// Human-readable column label (axis label for plots).
    pub fn label(&self) -> &'static str {
        match self {
            Column::Values { label, .. } => label,
            Column::Time { label, .. } => label,
        }
    }

    /// Numeric values, or `None` for the timestamp column.
    pub fn as_values(&self) -> Option<&'a [f64]> {
        match self {
            Column::Values { values, .. } => Some(values),
            Column::Time { .. } => None,
        }
    }

    /// Number of entries in the column.
    pub fn len(&self) -> usize {
        match self {
            Column::Values { values, .. } => values.len(),
            Column::Time { values, .. } => values.len(),
        }
    }

    /// Whether the column is empty (never the case for track snapshots).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TrackData {
    /// Number of samples per column.
    pub fn len(&self) -> usize {
        self.latitude.len()
    }

    /// Whether the snapshot is empty (never the case for valid tracks).
    pub fn is_empty(&self) -> bool {
        self.latitude.is_empty()
    }

    /// Look up a column by its 1-character short name.
    ///
    /// Unrecognized codes fail with `UnknownColumn`; recognized codes whose
    /// backing channel is absent for this track fail with `MissingChannel`
    /// naming the missing prerequisite.
    ///
    /// # Example
    /// ```
    /// use track_metrics::{Track, TrackPoint};
    ///
    /// let track = Track::new(&[
    ///     TrackPoint::new(45.011, 5.883),
    ///     TrackPoint::new(45.013, 5.887),
    /// ]).unwrap();
    /// let data = track.data();
    /// assert_eq!(data.column('d').unwrap().label(), "distance (km)");
    /// assert!(data.column('v').is_err()); // no timestamps on this track
    /// ```
    pub fn column(&self, code: char) -> Result<Column<'_>> {
        let label = *SHORT_NAMES
            .get(&code)
            .ok_or(TrackError::UnknownColumn { code })?;

        fn numeric<'a>(
            values: &'a Option<Vec<f64>>,
            label: &'static str,
            channel: &str,
        ) -> Result<Column<'a>> {
            values
                .as_deref()
                .map(|values| Column::Values { label, values })
                .ok_or_else(|| TrackError::missing(label, channel))
        }

        match code {
            'y' => Ok(Column::Values {
                label,
                values: &self.latitude,
            }),
            'x' => Ok(Column::Values {
                label,
                values: &self.longitude,
            }),
            'd' => Ok(Column::Values {
                label,
                values: &self.distance,
            }),
            'c' => Ok(Column::Values {
                label,
                values: &self.bearing,
            }),
            'z' => numeric(&self.elevation, label, "elevation"),
            's' => numeric(&self.elapsed_seconds, label, "time"),
            'v' => numeric(&self.velocity, label, "time"),
            't' => self
                .time
                .as_deref()
                .map(|values| Column::Time { label, values })
                .ok_or_else(|| TrackError::missing(label, "time")),
            _ => unreachable!("code validated against SHORT_NAMES"),
        }
    }

    /// Select an x/y column pair from a 2-character plot mode like `"tv"`.
    ///
    /// Anything other than exactly two characters is `InvalidInput`.
    pub fn select_pair(&self, mode: &str) -> Result<(Column<'_>, Column<'_>)> {
        let mut chars = mode.chars();
        let (x, y) = match (chars.next(), chars.next(), chars.next()) {
            (Some(x), Some(y), None) => (x, y),
            _ => {
                return Err(TrackError::invalid(format!(
                    "plot mode must be two characters, e.g. 'tv', got '{}'",
                    mode
                )))
            }
        };
        Ok((self.column(x)?, self.column(y)?))
    }

    /// Serialize every present column to a JSON object.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Track, TrackPoint};
    use chrono::TimeZone;

    fn plain_track() -> Track {
        Track::new(&[
            TrackPoint::new(45.011, 5.883),
            TrackPoint::new(45.013, 5.887),
            TrackPoint::new(45.015, 5.891),
        ])
        .unwrap()
    }

    fn timed_track() -> Track {
        let start = Utc.with_ymd_and_hms(2021, 6, 12, 8, 30, 0).unwrap();
        let points: Vec<TrackPoint> = [(45.011, 5.883), (45.013, 5.887), (45.015, 5.891)]
            .iter()
            .enumerate()
            .map(|(i, &(lat, lon))| {
                TrackPoint::new(lat, lon)
                    .with_time(start + chrono::Duration::seconds(i as i64 * 30))
                    .with_elevation(800.0 + i as f64)
            })
            .collect();
        Track::new(&points).unwrap()
    }

    #[test]
    fn test_always_present_columns() {
        let data = plain_track().data();
        for code in ['x', 'y', 'd', 'c'] {
            let col = data.column(code).unwrap();
            assert_eq!(col.len(), data.len(), "column '{}'", code);
        }
        assert_eq!(data.column('y').unwrap().label(), "latitude (°)");
    }

    #[test]
    fn test_unknown_code() {
        let data = plain_track().data();
        assert_eq!(
            data.column('q').unwrap_err(),
            TrackError::UnknownColumn { code: 'q' }
        );
    }

    #[test]
    fn test_absent_channel_names_prerequisite() {
        let data = plain_track().data();
        match data.column('v').unwrap_err() {
            TrackError::MissingChannel { column, channel } => {
                assert_eq!(column, "velocity (km/h)");
                assert_eq!(channel, "time");
            }
            other => panic!("expected MissingChannel, got {:?}", other),
        }
        assert!(data.column('z').is_err());
        assert!(data.column('t').is_err());
        assert!(data.column('s').is_err());
    }

    #[test]
    fn test_time_backed_columns() {
        let data = timed_track().data();
        assert!(matches!(data.column('t').unwrap(), Column::Time { .. }));
        let seconds = data.column('s').unwrap();
        assert_eq!(seconds.as_values().unwrap()[0], 0.0);
        assert!(data.column('v').is_ok());
        assert!(data.column('z').is_ok());
    }

    #[test]
    fn test_select_pair() {
        let data = timed_track().data();
        let (x, y) = data.select_pair("tv").unwrap();
        assert_eq!(x.label(), "time");
        assert_eq!(y.label(), "velocity (km/h)");
    }

    #[test]
    fn test_select_pair_bad_mode() {
        let data = timed_track().data();
        assert!(matches!(
            data.select_pair("t"),
            Err(TrackError::InvalidInput { .. })
        ));
        assert!(matches!(
            data.select_pair("tvz"),
            Err(TrackError::InvalidInput { .. })
        ));
        assert!(matches!(
            data.select_pair("tq"),
            Err(TrackError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_json_export_skips_absent_columns() {
        let json = plain_track().data().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("distance").is_some());
        assert!(value.get("velocity").is_none());

        let timed = timed_track().data().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&timed).unwrap();
        assert!(value.get("velocity").is_some());
    }
}
