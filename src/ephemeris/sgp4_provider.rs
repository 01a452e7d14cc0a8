use chrono::{DateTime, Duration, Utc};
use sgp4::{Constants, Elements};

use crate::ephemeris::frames::{look_angles, teme_to_ecef};
use crate::ephemeris::sun::{sun_position, SunPosition};
use crate::predict::{ElevationSample, GeometryProvider, Observer, PredictError};
use crate::tle::{SatelliteInfo, TleEntry};

pub const DEFAULT_VALIDITY: Duration = Duration::days(30);

/// SGP4 propagation of one TLE, seen from one observer.
pub struct Sgp4Provider {
    info: SatelliteInfo,
    elements: Elements,
    constants: Constants,
    observer: Observer,
    validity: Duration,
}

impl Sgp4Provider {
    pub fn new(entry: TleEntry, observer: Observer) -> Self {
        Self {
            info: entry.info,
            elements: entry.elements,
            constants: entry.constants,
            observer,
            validity: DEFAULT_VALIDITY,
        }
    }

    /// Instants further than `validity` from the TLE epoch are refused.
    pub fn with_validity(mut self, validity: Duration) -> Self {
        self.validity = validity;
        self
    }

    pub fn info(&self) -> &SatelliteInfo {
        &self.info
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    pub fn epoch(&self) -> DateTime<Utc> {
        self.info.epoch
    }

    pub fn sun_position_at(&self, time: DateTime<Utc>) -> SunPosition {
        sun_position(&self.observer, time)
    }
}

impl GeometryProvider for Sgp4Provider {
    fn position_at(&self, time: DateTime<Utc>) -> Result<ElevationSample, PredictError> {
        let epoch = self.epoch();
        if (time - epoch).abs() > self.validity {
            return Err(PredictError::PropagationOutOfRange { time, epoch });
        }

        let naive = time.naive_utc();
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&naive)
            .map_err(|e| PredictError::Propagation(e.to_string()))?;
        let prediction = self
            .constants
            .propagate(minutes)
            .map_err(|e| PredictError::Propagation(e.to_string()))?;

        let sidereal = sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&naive));
        let sat_ecef = teme_to_ecef(prediction.position, sidereal);
        let (azimuth_deg, elevation_deg, range_km) = look_angles(sat_ecef, &self.observer);

        Ok(ElevationSample {
            time,
            elevation_deg,
            azimuth_deg,
            range_km,
        })
    }

    fn sun_elevation_at(&self, time: DateTime<Utc>) -> Result<f64, PredictError> {
        Ok(self.sun_position_at(time).elevation_deg)
    }
}
