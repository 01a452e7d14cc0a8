use chrono::{DateTime, Duration, Utc};

use crate::predict::{ElevationSample, GeometryProvider, PassEvent, PredictError};

pub const DEFAULT_STEP_SECONDS: i64 = 30; // coarse scan
const REFINE_TOLERANCE_MS: i64 = 100;
const INV_PHI: f64 = 0.618_033_988_749_895;

#[derive(Debug, Clone, Copy)]
enum Crossing {
    Rising,
    Setting,
}

struct OpenPass {
    rise: ElevationSample,
    best: ElevationSample,
}

/// Finds rise, culmination and set events of the elevation curve against a
/// fixed threshold.
pub struct EventDetector<P> {
    provider: P,
    min_elevation_deg: f64,
    step: Duration,
}

impl<P: GeometryProvider> EventDetector<P> {
    pub fn new(provider: P, min_elevation_deg: f64) -> Self {
        Self {
            provider,
            min_elevation_deg,
            step: Duration::seconds(DEFAULT_STEP_SECONDS),
        }
    }

    pub fn with_step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Scans `[start, end]` and returns events in time order.
    ///
    /// Every interval above the threshold that closes inside the window yields
    /// RISE, CULMINATION, SET. An interval still open at `end` yields only its
    /// RISE. An interval already open at `start` is skipped entirely.
    pub fn detect_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PassEvent>, PredictError> {
        let mut events = Vec::new();
        if start >= end {
            return Ok(events);
        }

        let mut prev = self.provider.position_at(start)?;
        let mut skipping = self.is_above(&prev);
        // Lets the first coarse interval take part in the grazing check.
        let mut before_prev = match self.provider.position_at(start - self.step) {
            Ok(sample) => Some(sample),
            Err(PredictError::PropagationOutOfRange { .. }) => None,
            Err(e) => return Err(e),
        };
        let mut open: Option<OpenPass> = None;
        let mut cursor = start;

        while cursor < end {
            cursor = (cursor + self.step).min(end);
            let sample = self.provider.position_at(cursor)?;
            let above = self.is_above(&sample);
            let prev_above = self.is_above(&prev);

            if skipping {
                skipping = above;
            } else if above && !prev_above {
                let rise = self.refine_crossing(prev.time, sample.time, Crossing::Rising)?;
                events.push(PassEvent::Rise(rise));
                open = Some(OpenPass { rise, best: sample });
            } else if above {
                if let Some(pass) = open.as_mut() {
                    if sample.elevation_deg > pass.best.elevation_deg {
                        pass.best = sample;
                    }
                }
            } else if prev_above {
                if let Some(pass) = open.take() {
                    let set = self.refine_crossing(prev.time, sample.time, Crossing::Setting)?;
                    self.close_pass(&mut events, pass, set)?;
                }
            } else if let Some(before) = before_prev {
                // Both samples below: a coarse local maximum may hide a short pass.
                if before.elevation_deg < prev.elevation_deg
                    && prev.elevation_deg > sample.elevation_deg
                {
                    self.check_grazing(&mut events, &before, &sample, start)?;
                }
            }

            before_prev = Some(prev);
            prev = sample;
        }

        Ok(events)
    }

    fn is_above(&self, sample: &ElevationSample) -> bool {
        sample.elevation_deg >= self.min_elevation_deg
    }

    fn close_pass(
        &self,
        events: &mut Vec<PassEvent>,
        pass: OpenPass,
        set: ElevationSample,
    ) -> Result<(), PredictError> {
        if set.time <= pass.rise.time {
            // The RISE pushed for this interval is the last event.
            events.pop();
            return Ok(());
        }

        let low = pass.rise.time.max(pass.best.time - self.step);
        let high = set.time.min(pass.best.time + self.step);
        let refined = self.refine_peak(low, high)?;
        let culmination = if refined.elevation_deg < pass.best.elevation_deg
            && pass.best.time > pass.rise.time
            && pass.best.time < set.time
        {
            pass.best
        } else {
            refined
        };

        events.push(PassEvent::Culmination(culmination));
        events.push(PassEvent::Set(set));
        Ok(())
    }

    fn check_grazing(
        &self,
        events: &mut Vec<PassEvent>,
        before: &ElevationSample,
        after: &ElevationSample,
        not_before: DateTime<Utc>,
    ) -> Result<(), PredictError> {
        let peak = self.refine_peak(before.time, after.time)?;
        if !self.is_above(&peak) || peak.time <= not_before {
            return Ok(());
        }

        let rise = self.refine_crossing(before.time, peak.time, Crossing::Rising)?;
        let set = self.refine_crossing(peak.time, after.time, Crossing::Setting)?;
        // A spike rising before the window start belongs to an earlier search.
        if not_before < rise.time && rise.time < peak.time && peak.time < set.time {
            log::debug!("grazing pass peaking at {:.2} deg", peak.elevation_deg);
            events.push(PassEvent::Rise(rise));
            events.push(PassEvent::Culmination(peak));
            events.push(PassEvent::Set(set));
        }
        Ok(())
    }

    /// Bisection between a sample below and a sample above the threshold.
    /// Returns the refined sample on the above side of the crossing.
    fn refine_crossing(
        &self,
        before: DateTime<Utc>,
        after: DateTime<Utc>,
        crossing: Crossing,
    ) -> Result<ElevationSample, PredictError> {
        let tolerance = Duration::milliseconds(REFINE_TOLERANCE_MS);
        let mut low = before;
        let mut high = after;

        while high - low > tolerance {
            let mid = low + (high - low) / 2;
            let above = self.is_above(&self.provider.position_at(mid)?);
            match (crossing, above) {
                (Crossing::Rising, true) | (Crossing::Setting, false) => high = mid,
                _ => low = mid,
            }
        }

        let edge = match crossing {
            Crossing::Rising => high,
            Crossing::Setting => low,
        };
        self.provider.position_at(edge)
    }

    /// Golden-section search for the elevation maximum in `[low, high]`.
    fn refine_peak(
        &self,
        low: DateTime<Utc>,
        high: DateTime<Utc>,
    ) -> Result<ElevationSample, PredictError> {
        let tolerance = Duration::milliseconds(REFINE_TOLERANCE_MS);
        let mut a = low;
        let mut b = high;
        let mut c = b - scale(b - a, INV_PHI);
        let mut d = a + scale(b - a, INV_PHI);
        let mut fc = self.provider.position_at(c)?.elevation_deg;
        let mut fd = self.provider.position_at(d)?.elevation_deg;

        while b - a > tolerance {
            if fc > fd {
                b = d;
                d = c;
                fd = fc;
                c = b - scale(b - a, INV_PHI);
                fc = self.provider.position_at(c)?.elevation_deg;
            } else {
                a = c;
                c = d;
                fc = fd;
                d = a + scale(b - a, INV_PHI);
                fd = self.provider.position_at(d)?.elevation_deg;
            }
        }

        self.provider.position_at(a + (b - a) / 2)
    }
}

fn scale(d: Duration, factor: f64) -> Duration {
    Duration::milliseconds((d.num_milliseconds() as f64 * factor).round() as i64)
}
