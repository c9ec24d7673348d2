//! IP-based geolocation with a bounded timeout.
//!
//! Resolution is best-effort by design: the daemon calls [`resolve`] at
//! startup when `auto_locate` is enabled, and any failure — timeout, non-2xx
//! response, malformed payload — collapses into the single
//! [`LocationUnavailable`] kind. Callers recover by keeping their previous
//! coordinate; a failed lookup is never fatal.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::constants::{GEOIP_PRIMARY_URL, GEOIP_SECONDARY_URL};
use crate::estimator::Coordinates;

/// The one failure kind of the lookup path.
#[derive(Debug, Error)]
#[error("location unavailable: {reason}")]
pub struct LocationUnavailable {
    reason: String,
}

impl LocationUnavailable {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Response body of the geolocation services.
///
/// Providers disagree on field naming, so both spellings are accepted.
#[derive(Debug, Deserialize)]
struct GeoIpPayload {
    #[serde(alias = "lat")]
    latitude: Option<f64>,
    #[serde(alias = "lon")]
    longitude: Option<f64>,
}

/// Resolve the machine's coordinate from its public IP.
///
/// Tries the primary endpoint, then the higher-accuracy secondary one. The
/// timeout applies per request.
pub fn resolve(timeout: Duration) -> Result<Coordinates, LocationUnavailable> {
    match resolve_from(GEOIP_PRIMARY_URL, timeout) {
        Ok(coordinates) => Ok(coordinates),
        Err(primary) => resolve_from(GEOIP_SECONDARY_URL, timeout)
            .map_err(|secondary| LocationUnavailable::new(format!("{primary}; {secondary}"))),
    }
}

/// Resolve against a single endpoint.
pub fn resolve_from(url: &str, timeout: Duration) -> Result<Coordinates, LocationUnavailable> {
    let response = ureq::get(url)
        .timeout(timeout)
        .set("Accept", "application/json")
        .call()
        .map_err(|e| match e {
            ureq::Error::Status(code, _) => {
                LocationUnavailable::new(format!("{url} returned HTTP {code}"))
            }
            other => LocationUnavailable::new(format!("{url}: {other}")),
        })?;

    let payload: GeoIpPayload = response
        .into_json()
        .map_err(|e| LocationUnavailable::new(format!("{url}: malformed payload: {e}")))?;

    coordinates_from_payload(payload)
}

fn coordinates_from_payload(payload: GeoIpPayload) -> Result<Coordinates, LocationUnavailable> {
    let (latitude, longitude) = match (payload.latitude, payload.longitude) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return Err(LocationUnavailable::new("payload missing coordinates")),
    };

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(LocationUnavailable::new(format!(
            "payload coordinates out of range: {latitude}, {longitude}"
        )));
    }

    Ok(Coordinates::new(latitude, longitude))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Coordinates, LocationUnavailable> {
        let payload: GeoIpPayload = serde_json::from_str(json).unwrap();
        coordinates_from_payload(payload)
    }

    #[test]
    fn payload_accepts_long_field_names() {
        let coords = parse(r#"{"latitude": 39.9042, "longitude": 116.4074}"#).unwrap();
        assert_eq!(coords, Coordinates::new(39.9042, 116.4074));
    }

    #[test]
    fn payload_accepts_short_field_names() {
        let coords = parse(r#"{"lat": -33.8688, "lon": 151.2093}"#).unwrap();
        assert_eq!(coords, Coordinates::new(-33.8688, 151.2093));
    }

    #[test]
    fn payload_with_missing_fields_is_unavailable() {
        assert!(parse(r#"{"latitude": 39.9042}"#).is_err());
        assert!(parse(r#"{"city": "Beijing"}"#).is_err());
    }

    #[test]
    fn payload_with_out_of_range_coordinates_is_unavailable() {
        assert!(parse(r#"{"lat": 91.0, "lon": 0.0}"#).is_err());
        assert!(parse(r#"{"lat": 0.0, "lon": 200.0}"#).is_err());
    }

    #[test]
    fn extra_payload_fields_are_ignored() {
        let coords =
            parse(r#"{"lat": 48.8566, "lon": 2.3522, "city": "Paris", "asn": 1234}"#).unwrap();
        assert_eq!(coords, Coordinates::new(48.8566, 2.3522));
    }
}
