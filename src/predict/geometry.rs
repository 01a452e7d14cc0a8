use chrono::{DateTime, Utc};

use crate::predict::{ElevationSample, PredictError};

/// Source of observer-relative geometry for one satellite and one observer.
///
/// Implementations are pure: the same instant always yields the same sample.
/// All angles are in degrees.
pub trait GeometryProvider {
    fn position_at(&self, time: DateTime<Utc>) -> Result<ElevationSample, PredictError>;

    fn sun_elevation_at(&self, time: DateTime<Utc>) -> Result<f64, PredictError>;
}

impl<P: GeometryProvider + ?Sized> GeometryProvider for &P {
    fn position_at(&self, time: DateTime<Utc>) -> Result<ElevationSample, PredictError> {
        (**self).position_at(time)
    }

    fn sun_elevation_at(&self, time: DateTime<Utc>) -> Result<f64, PredictError> {
        (**self).sun_elevation_at(time)
    }
}

impl<P: GeometryProvider + ?Sized> GeometryProvider for std::sync::Arc<P> {
    fn position_at(&self, time: DateTime<Utc>) -> Result<ElevationSample, PredictError> {
        (**self).position_at(time)
    }

    fn sun_elevation_at(&self, time: DateTime<Utc>) -> Result<f64, PredictError> {
        (**self).sun_elevation_at(time)
    }
}
