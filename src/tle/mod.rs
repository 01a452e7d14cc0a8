mod error;
mod fetch;
mod loader;

pub use error::TleError;
pub use fetch::{fetch, DEFAULT_TLE_URL};
pub use loader::{load_file, parse_entry, parse_multi_tle, SatelliteInfo, TleEntry};

#[cfg(test)]
pub(crate) mod tests {
    pub const ISS_LINE1: &str =
        "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992";
    pub const ISS_LINE2: &str =
        "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";
    pub const ISS_TLE: &str = "ISS (ZARYA)
1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992
2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";
}
