//! Binary entry point: CLI dispatch and daemon wiring.
//!
//! Argument parsing happens first; help and version exit before any
//! configuration is touched. The daemon path wires together the estimator,
//! the theme store, and the signal channel, then hands control to `Core`.

use anyhow::Result;
use std::sync::{Arc, Mutex};

use suntheme::args::{self, CliAction, ParsedArgs};
use suntheme::constants::EXIT_FAILURE;
use suntheme::core::{Core, CoreParams};
use suntheme::estimator::{Coordinates, SolarDayNightEstimator};
use suntheme::theme::FileThemeStore;
use suntheme::{commands, config, signals};
use suntheme::{log_block_start, log_debug, log_end, log_error, log_indented, log_pipe, log_version};

fn main() {
    let ParsedArgs { action } = ParsedArgs::parse(std::env::args());

    let result = match action {
        CliAction::ShowHelp => {
            args::display_help();
            return;
        }
        CliAction::ShowVersion => {
            args::display_version();
            return;
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Run {
            debug_enabled,
            config_dir,
        } => run_daemon(debug_enabled, config_dir),
        CliAction::StatusCommand { config_dir } => {
            config::set_config_dir(config_dir).and_then(|_| commands::handle_status())
        }
        CliAction::SetCommand { mode, config_dir } => {
            config::set_config_dir(config_dir).and_then(|_| commands::handle_set(&mode))
        }
        CliAction::LocateCommand {
            debug_enabled: _,
            config_dir,
        } => config::set_config_dir(config_dir).and_then(|_| commands::handle_locate()),
    };

    if let Err(e) = result {
        log_pipe!();
        log_error!("{e:#}");
        log_end!();
        std::process::exit(EXIT_FAILURE);
    }
}

/// Run the daemon loop until a shutdown signal arrives.
fn run_daemon(debug_enabled: bool, config_dir: Option<String>) -> Result<()> {
    config::set_config_dir(config_dir)?;

    log_version!();
    if debug_enabled {
        log_pipe!();
        log_debug!("Debug mode enabled - showing scheduler detail");
    }

    log_block_start!("Loading configuration...");
    let config = config::load()?;
    log_indented!("Config: {}", config::get_config_path()?.display());
    log_indented!(
        "Coordinates: {:.4}, {:.4}",
        config.latitude(),
        config.longitude()
    );

    let estimator = Arc::new(Mutex::new(SolarDayNightEstimator::new(Coordinates::new(
        config.latitude(),
        config.longitude(),
    ))));
    let store = FileThemeStore::new(
        config::get_preference_path()?,
        config.apply_command(),
        Arc::clone(&estimator),
    );
    let signal_state = signals::setup_signal_handler()?;

    Core::new(CoreParams {
        config,
        estimator,
        store: Box::new(store),
        signal_state,
        debug_enabled,
    })
    .run()
}
