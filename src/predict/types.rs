use chrono::{DateTime, Utc};
use serde::Serialize;
use strum_macros::Display;
use utoipa::ToSchema;

/// Look angles of the satellite from the observer at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct ElevationSample {
    pub time: DateTime<Utc>,
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
    pub range_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PassEvent {
    Rise(ElevationSample),
    Culmination(ElevationSample),
    Set(ElevationSample),
}

impl PassEvent {
    pub fn sample(&self) -> &ElevationSample {
        match self {
            PassEvent::Rise(s) | PassEvent::Culmination(s) | PassEvent::Set(s) => s,
        }
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.sample().time
    }

    pub fn name(&self) -> &'static str {
        match self {
            PassEvent::Rise(_) => "rise",
            PassEvent::Culmination(_) => "culmination",
            PassEvent::Set(_) => "set",
        }
    }
}

/// Naked-eye visibility verdict, ordered by confidence
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[strum(serialize = "NO")]
    NotVisible,
    #[strum(serialize = "Unlikely")]
    Unlikely,
    #[strum(serialize = "Possible")]
    Possible,
    #[strum(serialize = "Likely")]
    Likely,
    #[strum(serialize = "YES")]
    Visible,
}

/// A predicted satellite pass
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Pass {
    pub aos: DateTime<Utc>,
    pub tca: DateTime<Utc>,
    pub los: DateTime<Utc>,
    pub duration_seconds: i64,
    pub max_elevation_deg: f64,
    pub aos_azimuth_deg: f64,
    pub tca_azimuth_deg: f64,
    pub los_azimuth_deg: f64,
    pub tca_range_km: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sun_elevation_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
}

impl Pass {
    pub fn max_elevation_display(&self) -> f64 {
        round1(self.max_elevation_deg)
    }
}

pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
