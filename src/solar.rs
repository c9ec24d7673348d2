//! Sunrise/sunset approximation from geographic coordinates.
//!
//! Implements the simplified NOAA solar position equations: a fractional-year
//! angle drives short Fourier expansions for the equation of time and the
//! solar declination, and the hour angle at the horizon gives the day length.
//! Accuracy is on the order of ±10 minutes, which is plenty for deciding
//! between a light and a dark theme.
//!
//! Two deliberate simplifications:
//!
//! - The zone offset is derived from the longitude against a fixed 120°E
//!   reference meridian rather than the civil time zone.
//! - At polar latitudes the cosine of the hour angle is clamped to [-1, 1],
//!   collapsing midnight-sun and polar-night days onto a 24h or 0h day
//!   length. This is an approximation, not an error.
//!
//! References:
//! - NOAA Solar Calculation: https://www.esrl.noaa.gov/gmd/grad/solcalc/
//! - Wikipedia: https://en.wikipedia.org/wiki/Sunrise_equation

use chrono::{Datelike, NaiveDate};
use std::f64::consts::PI;

use crate::constants::{MINUTES_PER_DAY, REFERENCE_MERIDIAN_DEG};

/// A local wall-clock time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    /// Hour of day, 0-23
    pub hours: u32,
    /// Minute of hour, 0-59
    pub minutes: u32,
}

impl ClockTime {
    /// Minutes elapsed since midnight, 0-1439.
    pub fn minutes_of_day(&self) -> u32 {
        self.hours * 60 + self.minutes
    }
}

impl std::fmt::Display for ClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}

/// Sunrise and sunset for one calendar day at one coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolarDay {
    pub sunrise: ClockTime,
    pub sunset: ClockTime,
}

/// Ordinal day of the year, 1-based (Jan 1 = 1, Dec 31 = 365 or 366).
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}

/// Fractional-year angle B in radians for a given ordinal day.
fn fractional_year(day: u32) -> f64 {
    (2.0 * PI / 365.0) * (day as f64 - 1.0)
}

/// Equation of time in minutes: the correction between mean solar time and
/// apparent solar time. Ranges roughly -14 to +16 minutes over the year.
fn equation_of_time_minutes(b: f64) -> f64 {
    229.18
        * (0.000075 + 0.001868 * b.cos()
            - 0.032077 * b.sin()
            - 0.014615 * (2.0 * b).cos()
            - 0.040849 * (2.0 * b).sin())
}

/// Solar declination in radians. Ranges roughly ±23.44° over the year.
fn solar_declination(b: f64) -> f64 {
    0.006918 - 0.399912 * b.cos() + 0.070257 * b.sin() - 0.006758 * (2.0 * b).cos()
        + 0.000907 * (2.0 * b).sin()
        - 0.002697 * (3.0 * b).cos()
        + 0.00111 * (3.0 * b).sin()
}

/// Normalize a minutes-of-day value into a `ClockTime`.
///
/// Rounds to the nearest minute, then wraps negative values into the previous
/// day's range and values ≥ 1440 into the next day's (Euclidean remainder):
/// -60 becomes 23:00, 1500 becomes 01:00.
pub fn minutes_to_clock_time(minutes: f64) -> ClockTime {
    let total = (minutes.round() as i64).rem_euclid(MINUTES_PER_DAY);

    ClockTime {
        hours: (total / 60) as u32,
        minutes: (total % 60) as u32,
    }
}

/// Compute sunrise and sunset for a coordinate on a calendar day.
///
/// Total for any finite input: out-of-range latitudes ride on the hour-angle
/// clamp and never panic.
pub fn sunrise_sunset(latitude: f64, longitude: f64, date: NaiveDate) -> SolarDay {
    let b = fractional_year(day_of_year(date));
    let eot = equation_of_time_minutes(b);
    let declination = solar_declination(b);

    // Hour angle at the horizon. The clamp absorbs polar day/night, where the
    // true value falls outside [-1, 1].
    let cos_h = (-latitude.to_radians().tan() * declination.tan()).clamp(-1.0, 1.0);
    let hour_angle = cos_h.acos();
    let day_length_hours = (24.0 / PI) * hour_angle;

    // Longitude-derived zone offset against the reference meridian.
    let zone_offset_hours = (REFERENCE_MERIDIAN_DEG - longitude) / 15.0;

    let solar_noon_hours = 12.0 - eot / 60.0 - zone_offset_hours;
    let sunrise_hours = solar_noon_hours - day_length_hours / 2.0;
    let sunset_hours = solar_noon_hours + day_length_hours / 2.0;

    SolarDay {
        sunrise: minutes_to_clock_time(sunrise_hours * 60.0),
        sunset: minutes_to_clock_time(sunset_hours * 60.0),
    }
}
