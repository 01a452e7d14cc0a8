use chrono::{DateTime, Duration, Utc};

use crate::predict::assembler::assemble_events;
use crate::predict::events::{EventDetector, DEFAULT_STEP_SECONDS};
use crate::predict::visibility::classify;
use crate::predict::{GeometryProvider, Pass, PassEvent, PredictError};

/// Gap between a pass's LOS and the next search start.
const RESUME_EPSILON: Duration = Duration::seconds(1);
/// Coarser steps jump over whole passes.
const MAX_STEP: Duration = Duration::hours(1);

#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub min_elevation_deg: f64,
    pub count: usize,
    /// Coarse sampling step of the event detector
    pub step: Duration,
    /// Growth of the search window per iteration
    pub window: Duration,
    /// Hard cap on the searched span, from the start instant
    pub max_span: Duration,
    /// Evaluate the Sun at AOS and classify visibility
    pub with_visibility: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_elevation_deg: 10.0,
            count: 10,
            step: Duration::seconds(DEFAULT_STEP_SECONDS),
            window: Duration::days(1),
            max_span: Duration::days(30),
            with_visibility: true,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), PredictError> {
        let invalid = |msg: String| Err(PredictError::InvalidConfiguration(msg));
        if !(-90.0..=90.0).contains(&self.min_elevation_deg) {
            return invalid(format!(
                "minimum elevation {} outside [-90, 90]",
                self.min_elevation_deg
            ));
        }
        if self.count == 0 {
            return invalid("pass count must be at least 1".into());
        }
        if self.step <= Duration::zero() || self.step > MAX_STEP {
            return invalid(format!(
                "step must be positive and at most {} s",
                MAX_STEP.num_seconds()
            ));
        }
        if self.window <= Duration::zero() {
            return invalid("search window must be positive".into());
        }
        if self.max_span <= Duration::zero() {
            return invalid("maximum search span must be positive".into());
        }
        Ok(())
    }
}

/// Collects the next `count` passes after a start instant.
pub struct PassSearch<P> {
    detector: EventDetector<P>,
    config: SearchConfig,
}

impl<P: GeometryProvider> PassSearch<P> {
    pub fn new(provider: P, config: SearchConfig) -> Result<Self, PredictError> {
        config.validate()?;
        let detector = EventDetector::new(provider, config.min_elevation_deg).with_step(config.step);
        Ok(Self { detector, config })
    }

    /// Returns exactly `count` passes in AOS order, or
    /// [`PredictError::NoPassFound`] once `max_span` is searched without
    /// reaching it.
    pub fn find_passes(&self, start: DateTime<Utc>) -> Result<Vec<Pass>, PredictError> {
        let count = self.config.count;
        let horizon = start.checked_add_signed(self.config.max_span).ok_or_else(|| {
            PredictError::InvalidConfiguration(format!(
                "search span of {} days from {} is out of range",
                self.config.max_span.num_days(),
                start
            ))
        })?;
        let mut passes = Vec::new();
        let mut cursor = start;
        let mut window_end = advance(start, self.config.window, horizon);

        loop {
            log::debug!("searching passes in {} .. {}", cursor, window_end);
            let events = self.detector.detect_events(cursor, window_end)?;

            let mut trailing_rise = None;
            for chunk in events.chunks(3) {
                if let [PassEvent::Rise(rise)] = chunk {
                    trailing_rise = Some(rise.time);
                    break;
                }
                let pass = self.annotate(assemble_events(chunk)?)?;
                cursor = pass.los + RESUME_EPSILON;
                passes.push(pass);
                if passes.len() == count {
                    return Ok(passes);
                }
            }

            if window_end >= horizon {
                return Err(PredictError::NoPassFound {
                    found: passes.len(),
                    requested: count,
                    span: self.config.max_span,
                });
            }

            // An open pass is re-detected whole in the longer window.
            let resume = match trailing_rise {
                Some(rise) => rise - RESUME_EPSILON,
                None => window_end - self.config.step,
            };
            cursor = cursor.max(resume);
            window_end = advance(window_end, self.config.window, horizon);
        }
    }

    fn annotate(&self, mut pass: Pass) -> Result<Pass, PredictError> {
        if self.config.with_visibility {
            // Sun at AOS only; illumination may change before TCA on long passes.
            let sun = self.detector.provider().sun_elevation_at(pass.aos)?;
            pass.sun_elevation_deg = Some(sun);
            pass.visibility = Some(classify(sun, pass.max_elevation_deg));
        }
        Ok(pass)
    }
}

/// `from + by`, never past `horizon`.
fn advance(from: DateTime<Utc>, by: Duration, horizon: DateTime<Utc>) -> DateTime<Utc> {
    from.checked_add_signed(by).map_or(horizon, |t| t.min(horizon))
}

/// Find the next `config.count` passes after `start`
pub fn predict_passes<P: GeometryProvider>(
    provider: P,
    start: DateTime<Utc>,
    config: SearchConfig,
) -> Result<Vec<Pass>, PredictError> {
    PassSearch::new(provider, config)?.find_passes(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::testing::{at, narrow_parabola, periodic, secs, Curve};
    use crate::predict::Visibility;

    const PERIOD: f64 = 5400.0;

    fn orbit() -> Curve<impl Fn(f64) -> f64> {
        Curve::new(periodic(PERIOD, 300.0, 40.0))
    }

    fn config(count: usize) -> SearchConfig {
        SearchConfig {
            count,
            max_span: Duration::days(2),
            ..SearchConfig::default()
        }
    }

    fn check_properties(passes: &[Pass], min_elevation: f64) {
        for p in passes {
            assert!(p.aos < p.tca && p.tca < p.los, "{p:?}");
            assert!(p.duration_seconds > 0);
            assert!(p.max_elevation_deg >= min_elevation);
            assert!((0.0..360.0).contains(&p.aos_azimuth_deg));
            assert!((0.0..360.0).contains(&p.los_azimuth_deg));
        }
        for w in passes.windows(2) {
            assert!(w[0].aos < w[1].aos);
            assert!(w[0].los <= w[1].aos);
        }
    }

    #[test]
    fn finds_requested_number_of_passes() {
        let passes = predict_passes(orbit(), at(0.0), config(5)).unwrap();
        assert_eq!(passes.len(), 5);
        check_properties(&passes, 10.0);

        for (k, p) in passes.iter().enumerate() {
            let peak = PERIOD / 2.0 + k as f64 * PERIOD;
            assert!((secs(p.tca) - peak).abs() < 0.2);
            assert!((p.max_elevation_deg - 40.0).abs() < 1e-3);
            assert_eq!(p.sun_elevation_deg, Some(-25.0));
            assert_eq!(p.visibility, Some(Visibility::Visible));
        }
    }

    #[test]
    fn search_is_deterministic() {
        let a = predict_passes(orbit(), at(0.0), config(4)).unwrap();
        let b = predict_passes(orbit(), at(0.0), config(4)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn starting_mid_pass_skips_to_next_rise() {
        let start = at(PERIOD / 2.0);
        let passes = predict_passes(orbit(), start, config(2)).unwrap();
        assert!(passes[0].aos > start);
        assert!((secs(passes[0].tca) - 1.5 * PERIOD).abs() < 0.2);
        check_properties(&passes, 10.0);
    }

    #[test]
    fn small_windows_give_the_same_passes() {
        let reference = predict_passes(orbit(), at(0.0), config(4)).unwrap();
        let small = SearchConfig {
            window: Duration::seconds(1000),
            ..config(4)
        };
        let passes = predict_passes(orbit(), at(0.0), small).unwrap();
        assert_eq!(passes.len(), reference.len());
        check_properties(&passes, 10.0);
        for (a, b) in passes.iter().zip(&reference) {
            assert!((secs(a.aos) - secs(b.aos)).abs() < 0.25);
            assert!((secs(a.los) - secs(b.los)).abs() < 0.25);
        }
    }

    #[test]
    fn unreachable_threshold_fails_with_no_pass_found() {
        let cfg = SearchConfig {
            min_elevation_deg: 50.0,
            ..config(3)
        };
        match predict_passes(orbit(), at(0.0), cfg) {
            Err(PredictError::NoPassFound {
                found, requested, ..
            }) => {
                assert_eq!(found, 0);
                assert_eq!(requested, 3);
            }
            other => panic!("expected NoPassFound, got {other:?}"),
        }
    }

    #[test]
    fn span_cap_reports_partial_count() {
        let cfg = SearchConfig {
            max_span: Duration::days(1),
            ..config(100)
        };
        match predict_passes(orbit(), at(0.0), cfg) {
            Err(PredictError::NoPassFound { found, .. }) => assert_eq!(found, 16),
            other => panic!("expected NoPassFound, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_propagation_fails_fast() {
        let mut provider = orbit();
        provider.valid_until = Some(10_000.0);
        assert!(matches!(
            predict_passes(provider, at(0.0), config(5)),
            Err(PredictError::PropagationOutOfRange { .. })
        ));
    }

    #[test]
    fn visibility_can_be_skipped() {
        let cfg = SearchConfig {
            with_visibility: false,
            ..config(1)
        };
        let passes = predict_passes(orbit(), at(0.0), cfg).unwrap();
        assert!(passes[0].visibility.is_none());
        assert!(passes[0].sun_elevation_deg.is_none());
    }

    #[test]
    fn narrow_parabola_pass() {
        let passes = predict_passes(Curve::new(narrow_parabola), at(0.0), config(1)).unwrap();
        let pass = &passes[0];
        assert!((89..=90).contains(&pass.duration_seconds));
        assert!((secs(pass.tca) - 300.0).abs() < 0.2);
        assert_eq!(pass.max_elevation_display(), 60.0);
    }

    #[test]
    fn rejects_invalid_configuration() {
        let bad = [
            config(0),
            SearchConfig {
                min_elevation_deg: 95.0,
                ..config(1)
            },
            SearchConfig {
                step: Duration::zero(),
                ..config(1)
            },
            SearchConfig {
                step: Duration::hours(2),
                ..config(1)
            },
            SearchConfig {
                window: Duration::seconds(-1),
                ..config(1)
            },
            SearchConfig {
                max_span: Duration::zero(),
                ..config(1)
            },
        ];
        for cfg in bad {
            assert!(matches!(
                PassSearch::new(orbit(), cfg),
                Err(PredictError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn huge_count_ends_with_no_pass_found() {
        let cfg = SearchConfig {
            max_span: Duration::days(1),
            ..config(usize::MAX / 4)
        };
        match predict_passes(orbit(), at(0.0), cfg) {
            Err(PredictError::NoPassFound { found, .. }) => assert_eq!(found, 16),
            other => panic!("expected NoPassFound, got {other:?}"),
        }
    }

    #[test]
    fn unrepresentable_span_is_a_configuration_error() {
        let cfg = SearchConfig {
            max_span: Duration::days(365 * 300_000),
            ..config(1)
        };
        assert!(matches!(
            predict_passes(orbit(), at(0.0), cfg),
            Err(PredictError::InvalidConfiguration(_))
        ));

        // An oversized window is clipped to the span.
        let cfg = SearchConfig {
            window: Duration::days(365 * 300_000),
            ..config(2)
        };
        let passes = predict_passes(orbit(), at(0.0), cfg).unwrap();
        assert_eq!(passes.len(), 2);
    }

    /// Short spike peaking 12 deg at 997 s, 3 s before the first window
    /// boundary: neither window sees a coarse local maximum on its own side.
    fn boundary_spike(s: f64) -> f64 {
        let d = (s - 997.0).abs();
        if d < 20.0 {
            -30.0 + 42.0 * (1.0 - d / 20.0)
        } else {
            -30.0
        }
    }

    #[test]
    fn grazing_pass_at_window_boundary_found_once() {
        let wide = SearchConfig {
            max_span: Duration::seconds(3000),
            ..config(1)
        };
        let reference = predict_passes(Curve::new(boundary_spike), at(0.0), wide.clone()).unwrap();
        assert!((secs(reference[0].tca) - 997.0).abs() < 0.2);

        let small = SearchConfig {
            window: Duration::seconds(1000),
            ..wide.clone()
        };
        let passes = predict_passes(Curve::new(boundary_spike), at(0.0), small.clone()).unwrap();
        assert_eq!(passes.len(), 1);
        assert!((secs(passes[0].aos) - secs(reference[0].aos)).abs() < 0.25);
        assert!((secs(passes[0].tca) - secs(reference[0].tca)).abs() < 0.25);
        assert!((secs(passes[0].los) - secs(reference[0].los)).abs() < 0.25);

        // Never reported a second time in the following windows.
        match predict_passes(Curve::new(boundary_spike), at(0.0), SearchConfig { count: 2, ..small }) {
            Err(PredictError::NoPassFound { found, .. }) => assert_eq!(found, 1),
            other => panic!("expected NoPassFound, got {other:?}"),
        }
    }
}
