//! Synthetic geometry providers for exercising the detector and driver
//! without SGP4.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::predict::{ElevationSample, GeometryProvider, PredictError};

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 18, 0, 0).unwrap()
}

pub fn at(seconds: f64) -> DateTime<Utc> {
    t0() + Duration::milliseconds((seconds * 1000.0).round() as i64)
}

pub fn secs(time: DateTime<Utc>) -> f64 {
    (time - t0()).num_milliseconds() as f64 / 1000.0
}

/// Elevation as a closure of seconds since [`t0`]; azimuth sweeps with time.
pub struct Curve<F> {
    pub elevation: F,
    pub sun_elevation_deg: f64,
    pub valid_until: Option<f64>,
}

impl<F: Fn(f64) -> f64> Curve<F> {
    pub fn new(elevation: F) -> Self {
        Self {
            elevation,
            sun_elevation_deg: -25.0,
            valid_until: None,
        }
    }
}

impl<F: Fn(f64) -> f64> GeometryProvider for Curve<F> {
    fn position_at(&self, time: DateTime<Utc>) -> Result<ElevationSample, PredictError> {
        let s = secs(time);
        if let Some(limit) = self.valid_until {
            if s > limit {
                return Err(PredictError::PropagationOutOfRange {
                    time,
                    epoch: t0(),
                });
            }
        }
        Ok(ElevationSample {
            time,
            elevation_deg: (self.elevation)(s),
            azimuth_deg: (200.0 + s * 0.3).rem_euclid(360.0),
            range_km: 400.0 + s.abs() * 0.01,
        })
    }

    fn sun_elevation_at(&self, _time: DateTime<Utc>) -> Result<f64, PredictError> {
        Ok(self.sun_elevation_deg)
    }
}

/// Peak 60 deg at 300 s, 0 deg at 0 s and 600 s.
pub fn wide_parabola(s: f64) -> f64 {
    60.0 - 60.0 * ((s - 300.0) / 300.0).powi(2)
}

/// Peak 60 deg at 300 s, 10 deg at 255 s and 345 s.
pub fn narrow_parabola(s: f64) -> f64 {
    60.0 - 50.0 * ((s - 300.0) / 45.0).powi(2)
}

/// Repeating passes: one parabola every `period` seconds, peaking at `peak`
/// degrees with `half_width` seconds above 0 deg, far below the horizon
/// in between.
pub fn periodic(period: f64, half_width: f64, peak: f64) -> impl Fn(f64) -> f64 {
    move |s: f64| {
        let phase = s.rem_euclid(period) - period / 2.0;
        let x = phase / half_width;
        if x.abs() <= 1.5 {
            peak * (1.0 - x * x)
        } else {
            peak * (1.0 - 2.25) - (x.abs() - 1.5)
        }
    }
}
