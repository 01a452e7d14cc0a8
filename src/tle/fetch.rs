use std::fs;
use std::path::Path;

use crate::tle::loader::{build_entry, parse_multi_tle, select, TleEntry};
use crate::tle::TleError;

pub const DEFAULT_TLE_URL: &str = "https://www.celestrak.com/NORAD/elements/stations.txt";

/// Download a TLE catalogue, pick `name` out of it and save that entry to
/// `path` as a three-line TLE.
pub async fn fetch(url: &str, name: &str, path: &Path) -> Result<TleEntry, TleError> {
    log::info!("Downloading TLE catalogue from {}", url);
    let body = reqwest::get(url).await?.error_for_status()?.text().await?;
    store(&body, name, url, path)
}

fn store(catalogue: &str, name: &str, origin: &str, path: &Path) -> Result<TleEntry, TleError> {
    let (object, line1, line2) =
        select(parse_multi_tle(catalogue), Some(name)).ok_or_else(|| {
            TleError::SatelliteNotFound {
                name: name.to_string(),
                origin: origin.to_string(),
            }
        })?;

    let entry = build_entry(object, &line1, &line2, origin)?;
    fs::write(path, format!("{}\n{}\n{}\n", entry.info.name, line1, line2))?;
    log::info!("TLE for {} saved to {}", entry.info.name, path.display());
    Ok(entry)
}
