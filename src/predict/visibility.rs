use crate::predict::Visibility;

/// Naked-eye visibility of a pass from the Sun's elevation (at AOS) and the
/// pass's peak elevation. Both in degrees.
pub fn classify(sun_elevation_deg: f64, max_elevation_deg: f64) -> Visibility {
    if sun_elevation_deg > 0.0 {
        Visibility::NotVisible
    } else if sun_elevation_deg > -6.0 {
        Visibility::Unlikely
    } else if sun_elevation_deg > -12.0 {
        if max_elevation_deg > 20.0 {
            Visibility::Possible
        } else {
            Visibility::Unlikely
        }
    } else if sun_elevation_deg > -18.0 {
        if max_elevation_deg > 30.0 {
            Visibility::Likely
        } else {
            Visibility::Possible
        }
    } else if max_elevation_deg > 30.0 {
        Visibility::Visible
    } else {
        Visibility::Unlikely
    }
}
