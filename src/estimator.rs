//! Day/night classification with per-day caching of the solar computation.
//!
//! `SolarDayNightEstimator` owns a coordinate and a single cache slot holding
//! the last computed sunrise/sunset pair. The computation is recomputed only
//! when the calendar day changes or the coordinate is updated; classification
//! against the wall clock happens on every call.

use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::constants::{DEFAULT_LATITUDE, DEFAULT_LONGITUDE, MINUTES_PER_DAY};
use crate::solar::{self, ClockTime};
use crate::time_source;

/// A geographic coordinate pair.
///
/// Latitude is expected in [-90, 90] and longitude in [-180, 180]; range
/// enforcement happens at the configuration and geolocation boundaries, the
/// solar math itself is total for any finite values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl Default for Coordinates {
    fn default() -> Self {
        Self::new(DEFAULT_LATITUDE, DEFAULT_LONGITUDE)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// One day's cached solar computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayComputation {
    pub sunrise: ClockTime,
    pub sunset: ClockTime,
    /// Calendar day this pair was computed for; the cache key.
    pub computed_for: NaiveDate,
}

/// The solar event a forecast points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEvent {
    Sunrise,
    Sunset,
}

impl TransitionEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionEvent::Sunrise => "sunrise",
            TransitionEvent::Sunset => "sunset",
        }
    }
}

/// Distance to the next day/night boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionForecast {
    pub minutes_until: u32,
    pub event: TransitionEvent,
}

impl DayComputation {
    /// True iff `time` falls in the half-open interval [sunrise, sunset):
    /// exactly at sunrise is day, exactly at sunset is already night.
    pub fn is_daytime_at(&self, time: NaiveTime) -> bool {
        let now = minutes_of_day(time);

        now >= self.sunrise.minutes_of_day() && now < self.sunset.minutes_of_day()
    }

    /// Forecast the next sunrise/sunset boundary relative to `time`.
    ///
    /// After sunset the forecast targets tomorrow's sunrise but reuses
    /// today's sunrise time rather than recomputing for tomorrow's date.
    /// Sunrise drifts by only a minute or two per day, well inside the
    /// accuracy of the underlying approximation, so the shortcut is kept.
    pub fn next_transition_at(&self, time: NaiveTime) -> TransitionForecast {
        let now = minutes_of_day(time);
        let sunrise = self.sunrise.minutes_of_day();
        let sunset = self.sunset.minutes_of_day();

        if now < sunrise {
            TransitionForecast {
                minutes_until: sunrise - now,
                event: TransitionEvent::Sunrise,
            }
        } else if now < sunset {
            TransitionForecast {
                minutes_until: sunset - now,
                event: TransitionEvent::Sunset,
            }
        } else {
            TransitionForecast {
                minutes_until: (MINUTES_PER_DAY as u32 - now) + sunrise,
                event: TransitionEvent::Sunrise,
            }
        }
    }
}

fn minutes_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Approximate sunrise/sunset estimator with a single-slot per-day cache.
///
/// Each instance owns its coordinate and cache, so independent locations can
/// coexist (and be tested) in isolation. When an instance is shared between
/// the scheduler and the theme store it is wrapped in `Arc<Mutex<_>>` by the
/// caller; the cache slot is a read-modify-write of two fields and needs the
/// lock if crossing threads.
#[derive(Debug)]
pub struct SolarDayNightEstimator {
    coordinates: Coordinates,
    cache: Option<DayComputation>,
}

impl SolarDayNightEstimator {
    pub fn new(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            cache: None,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    /// Replace the coordinate and drop the cache unconditionally, so the
    /// next computation uses the new location.
    pub fn set_location(&mut self, coordinates: Coordinates) {
        self.coordinates = coordinates;
        self.cache = None;
    }

    /// Sunrise/sunset for the given calendar day.
    ///
    /// A cache hit (same day as the last computation) returns the stored
    /// pair unchanged; anything else recomputes and overwrites the slot.
    pub fn compute_sunrise_sunset(&mut self, date: NaiveDate) -> DayComputation {
        if let Some(cached) = self.cache
            && cached.computed_for == date
        {
            return cached;
        }

        let day = solar::sunrise_sunset(self.coordinates.latitude, self.coordinates.longitude, date);
        let computation = DayComputation {
            sunrise: day.sunrise,
            sunset: day.sunset,
            computed_for: date,
        };
        self.cache = Some(computation);

        computation
    }

    /// Sunrise/sunset for the current calendar day.
    pub fn compute_today(&mut self) -> DayComputation {
        self.compute_sunrise_sunset(time_source::now().date_naive())
    }

    /// Classify the current wall-clock instant as day or night.
    pub fn is_daytime(&mut self) -> bool {
        let today = self.compute_today();

        today.is_daytime_at(time_source::now().time())
    }

    /// Minutes until the next sunrise/sunset boundary from now.
    pub fn next_transition(&mut self) -> TransitionForecast {
        let today = self.compute_today();

        today.next_transition_at(time_source::now().time())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beijing() -> SolarDayNightEstimator {
        SolarDayNightEstimator::new(Coordinates::default())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn same_day_recomputation_is_a_cache_hit() {
        let mut estimator = beijing();
        let first = estimator.compute_sunrise_sunset(date(2026, 2, 21));
        let second = estimator.compute_sunrise_sunset(date(2026, 2, 21));

        assert_eq!(first, second);
    }

    #[test]
    fn date_change_invalidates_the_cache() {
        let mut estimator = beijing();
        let winter = estimator.compute_sunrise_sunset(date(2026, 2, 21));
        let summer = estimator.compute_sunrise_sunset(date(2026, 6, 21));

        assert_ne!(winter.computed_for, summer.computed_for);
        // Beijing summer days are far longer than winter days
        let winter_len =
            winter.sunset.minutes_of_day() as i64 - winter.sunrise.minutes_of_day() as i64;
        let summer_len =
            summer.sunset.minutes_of_day() as i64 - summer.sunrise.minutes_of_day() as i64;
        assert!(summer_len > winter_len + 120);
    }

    #[test]
    fn location_update_invalidates_the_cache() {
        let mut estimator = beijing();
        let before = estimator.compute_sunrise_sunset(date(2026, 2, 21));

        // Sydney: same day, opposite hemisphere and far-off longitude
        estimator.set_location(Coordinates::new(-33.8688, 151.2093));
        let after = estimator.compute_sunrise_sunset(date(2026, 2, 21));

        assert_eq!(estimator.coordinates(), Coordinates::new(-33.8688, 151.2093));
        assert_ne!(before.sunrise, after.sunrise);
    }

    #[test]
    fn daytime_interval_is_half_open() {
        let mut estimator = beijing();
        let day = estimator.compute_sunrise_sunset(date(2026, 2, 21));

        let sunrise = time(day.sunrise.hours, day.sunrise.minutes);
        let sunset = time(day.sunset.hours, day.sunset.minutes);

        assert!(day.is_daytime_at(sunrise), "exactly at sunrise is day");
        assert!(day.is_daytime_at(time(12, 0)));
        assert!(!day.is_daytime_at(sunset), "exactly at sunset is night");
        assert!(!day.is_daytime_at(time(3, 0)));
        assert!(!day.is_daytime_at(time(23, 30)));
    }

    #[test]
    fn forecast_before_sunrise_targets_sunrise() {
        let mut estimator = beijing();
        let day = estimator.compute_sunrise_sunset(date(2026, 2, 21));

        let forecast = day.next_transition_at(time(4, 0));
        assert_eq!(forecast.event, TransitionEvent::Sunrise);
        assert_eq!(
            forecast.minutes_until,
            day.sunrise.minutes_of_day() - 4 * 60
        );
        assert!(forecast.minutes_until > 0);
    }

    #[test]
    fn forecast_during_day_targets_sunset() {
        let mut estimator = beijing();
        let day = estimator.compute_sunrise_sunset(date(2026, 2, 21));

        let forecast = day.next_transition_at(time(12, 0));
        assert_eq!(forecast.event, TransitionEvent::Sunset);
        assert_eq!(
            forecast.minutes_until,
            day.sunset.minutes_of_day() - 12 * 60
        );
    }

    #[test]
    fn forecast_after_sunset_wraps_to_tomorrows_sunrise() {
        let mut estimator = beijing();
        let day = estimator.compute_sunrise_sunset(date(2026, 2, 21));

        let forecast = day.next_transition_at(time(23, 0));
        assert_eq!(forecast.event, TransitionEvent::Sunrise);
        assert_eq!(
            forecast.minutes_until,
            (1440 - 23 * 60) + day.sunrise.minutes_of_day()
        );
        assert!(forecast.minutes_until > 0);
    }

    #[test]
    fn forecast_exactly_at_sunset_is_already_night() {
        let mut estimator = beijing();
        let day = estimator.compute_sunrise_sunset(date(2026, 2, 21));

        let sunset = time(day.sunset.hours, day.sunset.minutes);
        let forecast = day.next_transition_at(sunset);
        assert_eq!(forecast.event, TransitionEvent::Sunrise);
        assert!(forecast.minutes_until > 0);
    }
}
