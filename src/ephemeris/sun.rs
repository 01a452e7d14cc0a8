//! Low-precision solar ephemeris (Astronomical Almanac series, good to about
//! 0.01 deg between 1950 and 2050). Geometric altitude, no refraction.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::predict::Observer;

const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct SunPosition {
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
}

pub fn sun_position(observer: &Observer, time: DateTime<Utc>) -> SunPosition {
    let years = sgp4::julian_years_since_j2000(&time.naive_utc());
    let n = years * DAYS_PER_JULIAN_YEAR;

    let mean_longitude = (280.460 + 0.985_647_4 * n).rem_euclid(360.0);
    let mean_anomaly = (357.528 + 0.985_600_3 * n).rem_euclid(360.0).to_radians();
    let ecliptic_longitude = (mean_longitude
        + 1.915 * mean_anomaly.sin()
        + 0.020 * (2.0 * mean_anomaly).sin())
    .to_radians();
    let obliquity = (23.439 - 0.000_000_4 * n).to_radians();

    let right_ascension = (obliquity.cos() * ecliptic_longitude.sin()).atan2(ecliptic_longitude.cos());
    let declination = (obliquity.sin() * ecliptic_longitude.sin()).asin();

    let gmst = sgp4::iau_epoch_to_sidereal_time(years);
    let hour_angle = gmst + observer.lon_rad() - right_ascension;

    let lat = observer.lat_rad();
    let sin_elevation =
        lat.sin() * declination.sin() + lat.cos() * declination.cos() * hour_angle.cos();
    let azimuth = (-declination.cos() * hour_angle.sin()).atan2(
        declination.sin() * lat.cos() - declination.cos() * hour_angle.cos() * lat.sin(),
    );

    SunPosition {
        elevation_deg: sin_elevation.clamp(-1.0, 1.0).asin().to_degrees(),
        azimuth_deg: azimuth.to_degrees().rem_euclid(360.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn lausanne() -> Observer {
        Observer::new(46.4667, 6.8616, 500.0).unwrap()
    }

    #[test]
    fn summer_solstice_noon() {
        let noon = Utc.with_ymd_and_hms(2020, 6, 21, 11, 34, 0).unwrap();
        let sun = sun_position(&lausanne(), noon);
        // 90 - 46.47 + 23.44
        assert!((sun.elevation_deg - 66.97).abs() < 0.3, "{sun:?}");
        assert!((sun.azimuth_deg - 180.0).abs() < 3.0, "{sun:?}");
    }

    #[test]
    fn summer_solstice_midnight() {
        let midnight = Utc.with_ymd_and_hms(2020, 6, 21, 23, 34, 0).unwrap();
        let sun = sun_position(&lausanne(), midnight);
        assert!((sun.elevation_deg + 20.09).abs() < 0.3, "{sun:?}");
        assert!(sun.azimuth_deg < 3.0 || sun.azimuth_deg > 357.0, "{sun:?}");
    }

    #[test]
    fn morning_sun_is_east() {
        let morning = Utc.with_ymd_and_hms(2020, 3, 20, 7, 0, 0).unwrap();
        let sun = sun_position(&lausanne(), morning);
        assert!(sun.elevation_deg > 0.0 && sun.elevation_deg < 20.0, "{sun:?}");
        assert!(sun.azimuth_deg > 90.0 && sun.azimuth_deg < 130.0, "{sun:?}");
    }
}
