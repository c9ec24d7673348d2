//! CLI subcommands: status, set, locate.
//!
//! Each handler loads the configuration on its own and logs in the
//! application's block style. The daemon path lives in `core`, not here.

use anyhow::{Context, Result};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config;
use crate::estimator::{Coordinates, SolarDayNightEstimator};
use crate::location;
use crate::theme::{FileThemeStore, ThemeMode, ThemeStore};

fn build_estimator(config: &config::Config) -> Arc<Mutex<SolarDayNightEstimator>> {
    Arc::new(Mutex::new(SolarDayNightEstimator::new(Coordinates::new(
        config.latitude(),
        config.longitude(),
    ))))
}

/// Handle the `status` subcommand.
pub fn handle_status() -> Result<()> {
    log_version!();
    let config = config::load()?;
    let estimator = build_estimator(&config);
    let store = FileThemeStore::new(
        config::get_preference_path()?,
        None,
        Arc::clone(&estimator),
    );

    let mut guard = estimator.lock().unwrap();
    let today = guard.compute_today();
    let daytime = guard.is_daytime();
    let forecast = guard.next_transition();
    let coordinates = guard.coordinates();
    drop(guard);

    log_block_start!("Solar times for {}", today.computed_for);
    log_indented!("Coordinates: {coordinates}");
    log_indented!("Sunrise: {}", today.sunrise);
    log_indented!("Sunset: {}", today.sunset);
    log_block_start!(
        "Currently {}; next {} in {} minutes",
        if daytime { "daytime" } else { "nighttime" },
        forecast.event.as_str(),
        forecast.minutes_until
    );
    log_indented!("Stored preference: {}", store.preference());
    log_end!();

    Ok(())
}

/// Handle the `set <mode>` subcommand.
pub fn handle_set(mode: &str) -> Result<()> {
    let mode: ThemeMode = mode
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))
        .context("Could not parse theme mode")?;

    log_version!();
    let config = config::load()?;
    let estimator = build_estimator(&config);
    let mut store = FileThemeStore::new(
        config::get_preference_path()?,
        config.apply_command(),
        estimator,
    );

    log_block_start!("Setting theme preference to {mode}");
    store.set_theme(mode)?;
    log_end!();

    Ok(())
}

/// Handle the `locate` subcommand: resolve coordinates over the network and
/// persist them into the configuration file.
pub fn handle_locate() -> Result<()> {
    log_version!();
    let config = config::load()?;
    let timeout = Duration::from_secs(config.lookup_timeout_secs());

    log_block_start!("Resolving location from IP geolocation...");
    let coordinates = location::resolve(timeout)?;
    log_indented!("Detected coordinates: {coordinates}");

    let path = config::get_config_path()?;
    config::update_coordinates(&path, coordinates.latitude, coordinates.longitude)?;
    log_decorated!("Saved coordinates to {}", path.display());
    log_end!();

    Ok(())
}
