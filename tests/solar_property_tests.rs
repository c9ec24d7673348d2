use chrono::NaiveDate;
use proptest::prelude::*;

use suntheme::estimator::{Coordinates, SolarDayNightEstimator, TransitionEvent};
use suntheme::solar::{minutes_to_clock_time, sunrise_sunset};

/// Generate latitudes outside the polar clamp region
fn non_polar_latitude_strategy() -> impl Strategy<Value = f64> {
    -65.9..=65.9
}

/// Generate valid longitude values
fn longitude_strategy() -> impl Strategy<Value = f64> {
    -180.0..=180.0
}

/// Generate arbitrary calendar dates (day capped at 28 to stay valid in
/// every month)
fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2000..2100i32, 1..=12u32, 1..=28u32)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

proptest! {
    /// Outside the polar regions, sunset never precedes sunrise on any day.
    #[test]
    fn sunset_is_never_before_sunrise(
        lat in non_polar_latitude_strategy(),
        lon in longitude_strategy(),
        date in date_strategy()
    ) {
        let day = sunrise_sunset(lat, lon, date);

        prop_assert!(
            day.sunset.minutes_of_day() >= day.sunrise.minutes_of_day(),
            "sunset {} before sunrise {} at ({lat}, {lon}) on {date}",
            day.sunset,
            day.sunrise,
        );
    }

    /// Clock fields stay in range even for polar latitudes, where the
    /// hour-angle clamp kicks in.
    #[test]
    fn clock_fields_stay_in_range(
        lat in -90.0..=90.0f64,
        lon in longitude_strategy(),
        date in date_strategy()
    ) {
        let day = sunrise_sunset(lat, lon, date);

        for clock in [day.sunrise, day.sunset] {
            prop_assert!(clock.hours <= 23);
            prop_assert!(clock.minutes <= 59);
        }
    }

    /// Normalization wraps any finite minute count into [0, 1440) and is
    /// stable once a value is in range.
    #[test]
    fn normalization_wraps_into_one_day(minutes in -10_000.0..10_000.0f64) {
        let clock = minutes_to_clock_time(minutes);
        prop_assert!(clock.minutes_of_day() < 1440);

        let again = minutes_to_clock_time(clock.minutes_of_day() as f64);
        prop_assert_eq!(clock, again);
    }

    /// Recomputing the same date is a cache hit returning the identical pair.
    #[test]
    fn cache_hit_returns_identical_values(
        lat in non_polar_latitude_strategy(),
        lon in longitude_strategy(),
        date in date_strategy()
    ) {
        let mut estimator = SolarDayNightEstimator::new(Coordinates::new(lat, lon));

        let first = estimator.compute_sunrise_sunset(date);
        let second = estimator.compute_sunrise_sunset(date);
        prop_assert_eq!(first, second);
    }

    /// The forecast always targets a real event a positive number of minutes
    /// away, from any wall-clock minute of the day.
    #[test]
    fn forecast_is_positive_and_well_typed(
        lat in non_polar_latitude_strategy(),
        lon in longitude_strategy(),
        date in date_strategy(),
        minute in 0..1440u32
    ) {
        let mut estimator = SolarDayNightEstimator::new(Coordinates::new(lat, lon));
        let day = estimator.compute_sunrise_sunset(date);
        let time = chrono::NaiveTime::from_hms_opt(minute / 60, minute % 60, 0).unwrap();

        let forecast = day.next_transition_at(time);
        prop_assert!(forecast.minutes_until > 0 || day.sunrise == day.sunset);
        prop_assert!(matches!(
            forecast.event,
            TransitionEvent::Sunrise | TransitionEvent::Sunset
        ));
        // Never more than a full day plus the longest possible night
        prop_assert!(forecast.minutes_until <= 2 * 1440);
    }

    /// Day classification agrees with the half-open [sunrise, sunset) window.
    #[test]
    fn classification_matches_window(
        lat in non_polar_latitude_strategy(),
        lon in longitude_strategy(),
        date in date_strategy(),
        minute in 0..1440u32
    ) {
        let mut estimator = SolarDayNightEstimator::new(Coordinates::new(lat, lon));
        let day = estimator.compute_sunrise_sunset(date);
        let time = chrono::NaiveTime::from_hms_opt(minute / 60, minute % 60, 0).unwrap();

        let expected =
            minute >= day.sunrise.minutes_of_day() && minute < day.sunset.minutes_of_day();
        prop_assert_eq!(day.is_daytime_at(time), expected);
    }
}
