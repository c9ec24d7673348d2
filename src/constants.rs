//! Default values and validation bounds shared across the application.

/// Default latitude when no configuration or geolocation is available (Beijing).
pub const DEFAULT_LATITUDE: f64 = 39.9042;

/// Default longitude when no configuration or geolocation is available (Beijing).
pub const DEFAULT_LONGITUDE: f64 = 116.4074;

/// Reference meridian for the longitude-derived zone offset, in degrees east.
///
/// The solar calculation converts longitude into an hour offset against this
/// meridian instead of consulting the civil time zone. Known simplification.
pub const REFERENCE_MERIDIAN_DEG: f64 = 120.0;

/// Whether IP geolocation runs at startup by default.
pub const DEFAULT_AUTO_LOCATE: bool = false;

/// Default HTTP timeout for IP geolocation lookups, in seconds.
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 3;
pub const MINIMUM_LOOKUP_TIMEOUT_SECS: u64 = 1;
pub const MAXIMUM_LOOKUP_TIMEOUT_SECS: u64 = 30;

/// Default re-check cadence while the stored preference is "system", in
/// seconds.
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 3600;
pub const MINIMUM_CHECK_INTERVAL_SECS: u64 = 60;
pub const MAXIMUM_CHECK_INTERVAL_SECS: u64 = 86400;

/// Extra sleep beyond a forecast transition so the wake-up lands on the far
/// side of the boundary rather than exactly on it.
pub const TRANSITION_WAKE_MARGIN_SECS: u64 = 60;

/// Minutes in a civil day; the wrap modulus for minutes-of-day values.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Primary IP geolocation endpoint (no authentication required).
pub const GEOIP_PRIMARY_URL: &str = "https://ip.seeip.org/geoip";

/// Secondary, higher-accuracy endpoint tried when the primary fails.
pub const GEOIP_SECONDARY_URL: &str = "https://ipapi.co/json/";

/// Configuration file name under the config directory.
pub const CONFIG_FILE: &str = "suntheme.toml";

/// Preference file name under the config directory (single theme-mode string).
pub const PREFERENCE_FILE: &str = "preference";

/// Process exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
