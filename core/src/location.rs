//! Extraction of resource IDs from link fields such as `versionLink`.

use url::Url;

use crate::error::ApiError;

// Relative links are resolved against this so `Url` can parse them.
const LINK_BASE: &str = "http://localhost/";

/// Last path segment of `location`, ignoring query and fragment.
pub fn fetch_id_from_location(location: &str) -> Result<String, ApiError> {
    let base = Url::parse(LINK_BASE).map_err(|e| ApiError::InvalidLocation(e.to_string()))?;
    let url = base
        .join(location)
        .map_err(|e| ApiError::InvalidLocation(format!("{e}: {location}")))?;
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    Ok(segment.to_string())
}

/// Numeric version at the end of a version link.
pub fn version_from_location(location: &str) -> Result<u32, ApiError> {
    let id = fetch_id_from_location(location)?;
    id.parse::<u32>()
        .map_err(|_| ApiError::InvalidLocation(format!("version should be a number: {id}")))
}
