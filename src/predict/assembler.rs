use crate::predict::{ElevationSample, Pass, PassEvent, PredictError};

/// Builds a [`Pass`] from a rise, culmination and set sample.
///
/// The samples must be strictly ordered in time. The detector guarantees
/// this, so a violation is reported as [`PredictError::InvalidEventOrder`].
pub fn assemble(
    rise: &ElevationSample,
    culmination: &ElevationSample,
    set: &ElevationSample,
) -> Result<Pass, PredictError> {
    if !(rise.time < culmination.time && culmination.time < set.time) {
        return Err(PredictError::InvalidEventOrder(format!(
            "rise {} / culmination {} / set {}",
            rise.time, culmination.time, set.time
        )));
    }

    Ok(Pass {
        aos: rise.time,
        tca: culmination.time,
        los: set.time,
        duration_seconds: (set.time - rise.time).num_seconds(),
        max_elevation_deg: culmination.elevation_deg,
        aos_azimuth_deg: rise.azimuth_deg.rem_euclid(360.0),
        tca_azimuth_deg: culmination.azimuth_deg.rem_euclid(360.0),
        los_azimuth_deg: set.azimuth_deg.rem_euclid(360.0),
        tca_range_km: culmination.range_km,
        sun_elevation_deg: None,
        visibility: None,
    })
}

/// Same as [`assemble`] for a slice of exactly RISE, CULMINATION, SET.
pub fn assemble_events(events: &[PassEvent]) -> Result<Pass, PredictError> {
    match events {
        [PassEvent::Rise(rise), PassEvent::Culmination(culmination), PassEvent::Set(set)] => {
            assemble(rise, culmination, set)
        }
        _ => Err(PredictError::InvalidEventOrder(format!(
            "expected rise, culmination, set; got {:?}",
            events.iter().map(|e| e.name()).collect::<Vec<_>>()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::testing::at;

    fn sample(s: f64, elevation_deg: f64, azimuth_deg: f64) -> ElevationSample {
        ElevationSample {
            time: at(s),
            elevation_deg,
            azimuth_deg,
            range_km: 800.0,
        }
    }

    #[test]
    fn builds_pass_geometry() {
        let pass = assemble(
            &sample(255.3, 10.0, 310.0),
            &sample(300.0, 59.987_65, 40.0),
            &sample(345.2, 10.0, 120.0),
        )
        .unwrap();

        assert_eq!(pass.aos, at(255.3));
        assert_eq!(pass.tca, at(300.0));
        assert_eq!(pass.los, at(345.2));
        assert_eq!(pass.aos_azimuth_deg, 310.0);
        assert_eq!(pass.los_azimuth_deg, 120.0);
        assert_eq!(pass.max_elevation_deg, 59.987_65);
        assert_eq!(pass.max_elevation_display(), 60.0);
        assert!(pass.visibility.is_none());
    }

    #[test]
    fn duration_is_truncated() {
        let pass = assemble(
            &sample(0.0, 10.0, 0.0),
            &sample(40.0, 20.0, 0.0),
            &sample(89.9, 10.0, 0.0),
        )
        .unwrap();
        assert_eq!(pass.duration_seconds, 89);
    }

    #[test]
    fn azimuths_are_normalized() {
        let pass = assemble(
            &sample(0.0, 10.0, 360.0),
            &sample(10.0, 20.0, -10.0),
            &sample(20.0, 10.0, -90.0),
        )
        .unwrap();
        assert_eq!(pass.aos_azimuth_deg, 0.0);
        assert_eq!(pass.tca_azimuth_deg, 350.0);
        assert_eq!(pass.los_azimuth_deg, 270.0);
    }

    #[test]
    fn rejects_out_of_order_samples() {
        let rise = sample(0.0, 10.0, 0.0);
        let culmination = sample(10.0, 20.0, 0.0);
        let set = sample(20.0, 10.0, 0.0);

        assert!(matches!(
            assemble(&culmination, &rise, &set),
            Err(PredictError::InvalidEventOrder(_))
        ));
        assert!(assemble(&rise, &culmination, &culmination).is_err());
        assert!(assemble(&rise, &rise, &set).is_err());
    }

    #[test]
    fn assemble_events_checks_tags() {
        let rise = sample(0.0, 10.0, 0.0);
        let culmination = sample(10.0, 20.0, 0.0);
        let set = sample(20.0, 10.0, 0.0);

        let ok = [
            PassEvent::Rise(rise),
            PassEvent::Culmination(culmination),
            PassEvent::Set(set),
        ];
        assert!(assemble_events(&ok).is_ok());

        let swapped = [
            PassEvent::Set(rise),
            PassEvent::Culmination(culmination),
            PassEvent::Rise(set),
        ];
        assert!(matches!(
            assemble_events(&swapped),
            Err(PredictError::InvalidEventOrder(_))
        ));
        assert!(assemble_events(&ok[..2]).is_err());
    }
}
