use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sgp4::{Constants, Elements};
use utoipa::ToSchema;

use crate::tle::TleError;

/// Information about the satellite a TLE describes
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SatelliteInfo {
    pub name: String,
    pub norad_id: u64,
    pub tle_source: String,
    pub epoch: DateTime<Utc>,
}

pub struct TleEntry {
    pub info: SatelliteInfo,
    pub elements: Elements,
    pub constants: Constants,
}

/// One raw entry: optional name line, line 1, line 2
pub type RawTle = (Option<String>, String, String);

/// Load the satellite called `name` (or the first one when `None`) from a
/// TLE file.
pub fn load_file(path: &Path, name: Option<&str>) -> Result<TleEntry, TleError> {
    if !path.is_file() {
        return Err(TleError::FileNotFound(path.display().to_string()));
    }

    let content = fs::read_to_string(path)?;
    let filename = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    parse_entry(&content, name, &filename)
}

/// Select and parse one satellite from multi-satellite TLE content.
pub fn parse_entry(content: &str, name: Option<&str>, origin: &str) -> Result<TleEntry, TleError> {
    let (object, line1, line2) =
        select(parse_multi_tle(content), name).ok_or_else(|| TleError::SatelliteNotFound {
            name: name.unwrap_or("<any>").to_string(),
            origin: origin.to_string(),
        })?;
    build_entry(object, &line1, &line2, origin)
}

pub(crate) fn select(entries: Vec<RawTle>, name: Option<&str>) -> Option<RawTle> {
    match name {
        None => entries.into_iter().next(),
        Some(wanted) => entries.into_iter().find(|(object, _, _)| {
            object
                .as_deref()
                .is_some_and(|o| o.trim().eq_ignore_ascii_case(wanted.trim()))
        }),
    }
}

pub(crate) fn build_entry(
    object: Option<String>,
    line1: &str,
    line2: &str,
    origin: &str,
) -> Result<TleEntry, TleError> {
    let invalid = |message: String| TleError::InvalidTle {
        file: origin.to_string(),
        message,
    };

    let elements = Elements::from_tle(object.clone(), line1.as_bytes(), line2.as_bytes())
        .map_err(|e| invalid(e.to_string()))?;
    let constants = Constants::from_elements(&elements).map_err(|e| invalid(e.to_string()))?;

    let name = object.unwrap_or_else(|| format!("NORAD {}", elements.norad_id));

    Ok(TleEntry {
        info: SatelliteInfo {
            name,
            norad_id: elements.norad_id,
            tle_source: origin.to_string(),
            epoch: elements.datetime.and_utc(),
        },
        elements,
        constants,
    })
}

/// Parse multi-satellite TLE content
pub fn parse_multi_tle(content: &str) -> Vec<RawTle> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            // 2-line TLE (no name)
            result.push((None, lines[i].to_string(), lines[i + 1].to_string()));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            result.push((
                Some(lines[i].to_string()),
                lines[i + 1].to_string(),
                lines[i + 2].to_string(),
            ));
            i += 3;
        } else {
            i += 1;
        }
    }

    result
}
