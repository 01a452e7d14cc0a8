use std::fmt::{Display, Write};

use chrono::{DateTime, TimeZone, Utc};

use crate::predict::Pass;

const DIRECTIONS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// 8-point compass direction of an azimuth in degrees
pub fn azimuth_to_cardinal(azimuth_deg: f64) -> &'static str {
    let index = ((azimuth_deg.rem_euclid(360.0) + 22.5) / 45.0).floor() as usize % 8;
    DIRECTIONS[index]
}

/// `M:SS`
pub fn format_duration(seconds: i64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

fn local<Tz: TimeZone>(time: &DateTime<Utc>, tz: &Tz, fmt: &str) -> String
where
    Tz::Offset: Display,
{
    time.with_timezone(tz).format(fmt).to_string()
}

/// Table with one row per pass, times rendered in `tz`.
pub fn render_table<Tz: TimeZone>(passes: &[Pass], tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:<10} {:<10} {:<10} {:<6} {:<6} {:<6} {:<10}",
        "DATE", "AOS", "TCA", "LOS", "DUR", "MEL", "SUN", "VISIBILITY"
    );
    let _ = writeln!(out, "{}", "=".repeat(72));

    for p in passes {
        let sun = p
            .sun_elevation_deg
            .map(|s| format!("{s:.1}"))
            .unwrap_or_else(|| "-".into());
        let visibility = p
            .visibility
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".into());
        let _ = writeln!(
            out,
            "{:<8} {:<10} {:<10} {:<10} {:<6} {:<6.1} {:<6} {:<10}",
            local(&p.aos, tz, "%d.%m"),
            local(&p.aos, tz, "%H:%M:%S"),
            local(&p.tca, tz, "%H:%M:%S"),
            local(&p.los, tz, "%H:%M:%S"),
            format_duration(p.duration_seconds),
            p.max_elevation_display(),
            sun,
            visibility,
        );
    }
    out
}

/// One sentence per pass, with compass directions.
pub fn render_list<Tz: TimeZone>(passes: &[Pass], tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    let mut out = String::new();
    for (i, p) in passes.iter().enumerate() {
        let _ = write!(
            out,
            "{}. AOS: {} ({} UTC), Visible: {} min, Max Height: {:.1}°, \
             Appears: {:.1}° above {}, Disappears: {:.1}° above {}",
            i + 1,
            local(&p.aos, tz, "%d.%m.%Y %H:%M:%S"),
            p.aos.format("%H:%M:%S"),
            format_duration(p.duration_seconds),
            p.max_elevation_display(),
            p.aos_azimuth_deg,
            azimuth_to_cardinal(p.aos_azimuth_deg),
            p.los_azimuth_deg,
            azimuth_to_cardinal(p.los_azimuth_deg),
        );
        if let Some(v) = p.visibility {
            let _ = write!(out, ", Visibility: {v}");
        }
        out.push('\n');
    }
    out
}
