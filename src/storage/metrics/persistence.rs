//! Overflow file format and naming

use crate::core::models::RequestMeasurement;
use crate::utils::error::{DiagnosticsError, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

const FILE_PREFIX: &str = "metrics-";
const FILE_SUFFIX: &str = ".json";
const DATE_FORMAT: &str = "%Y-%m-%d";
const CORRUPT_SUFFIX: &str = ".corrupt";

static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9-]").expect("static pattern compiles"));

/// Replace every character outside `[a-zA-Z0-9-]` with `_`
pub fn sanitize_endpoint(endpoint: &str) -> String {
    UNSAFE_CHARS.replace_all(endpoint, "_").into_owned()
}

/// `metrics-{sanitized endpoint}-{yyyy-mm-dd}.json`
pub fn file_name_for(endpoint: &str, date: NaiveDate) -> String {
    format!(
        "{}{}-{}{}",
        FILE_PREFIX,
        sanitize_endpoint(endpoint),
        date.format(DATE_FORMAT),
        FILE_SUFFIX
    )
}

/// Date embedded in an overflow file name: the last three `-` separated parts.
///
/// Returns `None` for files that are not overflow files; an overflow-looking file
/// whose date does not parse is an error so the caller can log it.
pub fn parse_file_date(file_name: &str) -> Option<Result<NaiveDate>> {
    let stem = file_name
        .strip_prefix(FILE_PREFIX)
        .and_then(|rest| rest.strip_suffix(FILE_SUFFIX))?;

    let parts: Vec<&str> = stem.rsplitn(4, '-').collect();
    if parts.len() < 4 {
        return Some(Err(DiagnosticsError::storage(format!(
            "No date in file name: {}",
            file_name
        ))));
    }

    let date = format!("{}-{}-{}", parts[2], parts[1], parts[0]);
    Some(NaiveDate::parse_from_str(&date, DATE_FORMAT).map_err(|e| {
        DiagnosticsError::storage(format!("Bad date in file name {}: {}", file_name, e))
    }))
}

/// Read a JSON array of measurements
pub fn read_measurements(path: &Path) -> Result<Vec<RequestMeasurement>> {
    let file = fs::File::open(path).map_err(|e| {
        DiagnosticsError::storage(format!("Failed to open {}: {}", path.display(), e))
    })?;
    let measurements = serde_json::from_reader(BufReader::new(file))?;
    Ok(measurements)
}

/// Sibling name an unreadable overflow file is moved to: `<name>.corrupt`, or
/// `<name>.corrupt.<n>` when earlier ones exist
pub fn corrupt_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(CORRUPT_SUFFIX);
    let first = PathBuf::from(&name);
    if !first.exists() {
        return first;
    }
    (1u32..)
        .map(|n| {
            let mut numbered = name.clone();
            numbered.push(format!(".{}", n));
            PathBuf::from(numbered)
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

/// Existing contents of an overflow file. A file that is not a measurement
/// array is moved aside and treated as empty.
fn existing_measurements(path: &Path) -> Result<Vec<RequestMeasurement>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    match read_measurements(path) {
        Ok(measurements) => Ok(measurements),
        Err(DiagnosticsError::Serialization(e)) => {
            let aside = corrupt_path_for(path);
            warn!(
                "Unreadable metrics file {} ({}), moving it to {}",
                path.display(),
                e,
                aside.display()
            );
            fs::rename(path, &aside).map_err(|e| {
                DiagnosticsError::storage(format!(
                    "Failed to move aside {}: {}",
                    path.display(),
                    e
                ))
            })?;
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

/// Append `batch` to the array stored at `path`, creating the file if needed.
///
/// The file is rewritten through a temporary sibling and renamed into place.
pub fn append_measurements(path: &Path, batch: &[RequestMeasurement]) -> Result<usize> {
    let mut existing = existing_measurements(path)?;
    existing.extend_from_slice(batch);

    let tmp = path.with_extension("json.tmp");
    {
        let file = fs::File::create(&tmp).map_err(|e| {
            DiagnosticsError::storage(format!("Failed to create {}: {}", tmp.display(), e))
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &existing)?;
        writer.flush()?;
    }
    fs::rename(&tmp, path).map_err(|e| {
        DiagnosticsError::storage(format!("Failed to replace {}: {}", path.display(), e))
    })?;

    Ok(existing.len())
}
