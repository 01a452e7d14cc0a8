use serde::Serialize;
use utoipa::ToSchema;

use crate::predict::PredictError;

const MIN_ALTITUDE_M: f64 = -500.0;

// WGS-84
const EARTH_RADIUS_KM: f64 = 6378.137;
const EARTH_E2: f64 = 0.00669437999014;

/// Fixed ground observer. Construct through [`Observer::new`] so the
/// coordinates are known to be physical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Observer {
    latitude_deg: f64,
    longitude_deg: f64,
    altitude_m: f64,
}

impl Observer {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Result<Self, PredictError> {
        if !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(PredictError::InvalidConfiguration(format!(
                "latitude {latitude_deg} outside [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude_deg) {
            return Err(PredictError::InvalidConfiguration(format!(
                "longitude {longitude_deg} outside [-180, 180]"
            )));
        }
        if !altitude_m.is_finite() || altitude_m < MIN_ALTITUDE_M {
            return Err(PredictError::InvalidConfiguration(format!(
                "altitude {altitude_m} m below {MIN_ALTITUDE_M} m"
            )));
        }
        Ok(Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
        })
    }

    /// Parses `"lat, lon"` as written in the station config.
    pub fn from_coordinates(coordinates: &str, altitude_m: Option<f64>) -> Result<Self, PredictError> {
        let invalid = || {
            PredictError::InvalidConfiguration(format!(
                "coordinates '{coordinates}' are not 'lat, lon'"
            ))
        };
        let parts: Vec<_> = coordinates.split(',').map(|s| s.trim()).collect();
        if parts.len() != 2 {
            return Err(invalid());
        }
        let lat = parts[0].parse().map_err(|_| invalid())?;
        let lon = parts[1].parse().map_err(|_| invalid())?;
        Self::new(lat, lon, altitude_m.unwrap_or(0.0))
    }

    pub fn latitude_deg(&self) -> f64 {
        self.latitude_deg
    }

    pub fn longitude_deg(&self) -> f64 {
        self.longitude_deg
    }

    pub fn altitude_m(&self) -> f64 {
        self.altitude_m
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        let lat = self.lat_rad();
        let lon = self.lon_rad();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let n = EARTH_RADIUS_KM / (1.0 - EARTH_E2 * sin_lat * sin_lat).sqrt();
        let alt_km = self.altitude_m / 1000.0;
        [
            (n + alt_km) * cos_lat * lon.cos(),
            (n + alt_km) * cos_lat * lon.sin(),
            (n * (1.0 - EARTH_E2) + alt_km) * sin_lat,
        ]
    }
}
