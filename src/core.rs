//! Core daemon loop.
//!
//! `Core` owns the scheduler that the estimator deliberately does not have:
//! it applies the stored preference once at startup, then sleeps until the
//! next solar transition (capped at the configured check interval) and
//! re-resolves the `system` preference on each wake-up. Fixed `light`/`dark`
//! preferences are left alone until the user changes them.

use anyhow::Result;
use std::sync::mpsc::RecvTimeoutError;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::Config;
use crate::constants::TRANSITION_WAKE_MARGIN_SECS;
use crate::estimator::{SolarDayNightEstimator, TransitionForecast};
use crate::location;
use crate::signals::{SignalMessage, SignalState};
use crate::theme::{ThemeMode, ThemeStore};

/// Parameters for creating a Core instance.
pub struct CoreParams {
    pub config: Config,
    pub estimator: Arc<Mutex<SolarDayNightEstimator>>,
    pub store: Box<dyn ThemeStore>,
    pub signal_state: SignalState,
    pub debug_enabled: bool,
}

/// Runtime state of the daemon loop.
pub struct Core {
    config: Config,
    estimator: Arc<Mutex<SolarDayNightEstimator>>,
    store: Box<dyn ThemeStore>,
    signal_state: SignalState,
    debug_enabled: bool,
}

impl Core {
    /// Create a new Core instance from parameters.
    pub fn new(params: CoreParams) -> Self {
        Self {
            config: params.config,
            estimator: params.estimator,
            store: params.store,
            signal_state: params.signal_state,
            debug_enabled: params.debug_enabled,
        }
    }

    /// Execute the daemon: startup lookup, initial apply, then the loop.
    pub fn run(mut self) -> Result<()> {
        self.resolve_startup_location();
        self.log_solar_day();
        self.apply_stored_preference();

        loop {
            let sleep = self.sleep_duration();
            if self.debug_enabled {
                log_debug!("Sleeping {} seconds until next check", sleep.as_secs());
            }

            match self.signal_state.receiver.recv_timeout(sleep) {
                Ok(SignalMessage::Shutdown) => break,
                Err(RecvTimeoutError::Timeout) => self.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        log_block_start!("Shutting down suntheme...");
        log_end!();
        Ok(())
    }

    /// Run the optional startup geolocation, keeping the configured
    /// coordinate on any failure.
    fn resolve_startup_location(&mut self) {
        if !self.config.auto_locate() {
            return;
        }

        log_block_start!("Resolving location from IP geolocation...");
        let timeout = Duration::from_secs(self.config.lookup_timeout_secs());

        match location::resolve(timeout) {
            Ok(coordinates) => {
                log_indented!("Using detected coordinates: {coordinates}");
                self.estimator.lock().unwrap().set_location(coordinates);
            }
            Err(e) => {
                log_pipe!();
                log_warning!("{e}");
                let kept = self.estimator.lock().unwrap().coordinates();
                log_indented!("Keeping previous coordinates: {kept}");
            }
        }
    }

    fn log_solar_day(&mut self) {
        let mut estimator = self.estimator.lock().unwrap();
        let today = estimator.compute_today();
        let daytime = estimator.is_daytime();
        let forecast = estimator.next_transition();
        drop(estimator);

        log_block_start!("Solar times for {}", today.computed_for);
        log_indented!("Sunrise: {}", today.sunrise);
        log_indented!("Sunset: {}", today.sunset);
        log_indented!(
            "Currently {}; next {} in {} minutes",
            if daytime { "daytime" } else { "nighttime" },
            forecast.event.as_str(),
            forecast.minutes_until
        );
    }

    fn apply_stored_preference(&mut self) {
        let preference = self.store.preference();
        log_block_start!("Applying stored preference: {preference}");

        if let Err(e) = self.store.set_theme(preference) {
            log_pipe!();
            log_warning!("Failed to apply theme: {e:#}");
        }
    }

    /// Re-resolve the `system` preference on a scheduled wake-up. Fixed
    /// preferences need no periodic attention.
    fn tick(&mut self) {
        if self.store.preference() != ThemeMode::System {
            return;
        }

        if let Err(e) = self.store.set_theme(ThemeMode::System) {
            log_pipe!();
            log_warning!("Failed to apply theme: {e:#}");
        }
    }

    fn sleep_duration(&self) -> Duration {
        let forecast = self.estimator.lock().unwrap().next_transition();

        sleep_until_next_event(forecast, self.config.check_interval_secs())
    }
}

/// Sleep until just past the forecast transition, never longer than the
/// configured check interval.
fn sleep_until_next_event(forecast: TransitionForecast, check_interval_secs: u64) -> Duration {
    let until_transition = forecast.minutes_until as u64 * 60 + TRANSITION_WAKE_MARGIN_SECS;

    Duration::from_secs(until_transition.min(check_interval_secs))
}
