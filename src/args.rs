//! Command-line argument parsing and processing.
//!
//! This module handles parsing of command-line arguments and provides a clean
//! interface for the main application logic. It supports the standard help,
//! version, and debug flags while gracefully handling unknown options.

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the daemon loop with these settings
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Print today's solar times, classification, and stored preference
    StatusCommand { config_dir: Option<String> },
    /// Persist and apply a theme preference once
    SetCommand {
        mode: String,
        config_dir: Option<String>,
    },
    /// Resolve coordinates from IP geolocation and store them in the config
    LocateCommand {
        debug_enabled: bool,
        config_dir: Option<String>,
    },

    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// Flags may appear before or after the subcommand; an unknown flag or
    /// subcommand switches the action to `ShowHelpDueToError`.
    ///
    /// # Arguments
    /// * `args` - Iterator over command-line arguments (typically from std::env::args())
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut debug_enabled = false;
        let mut config_dir: Option<String> = None;
        let mut command: Option<String> = None;
        let mut command_value: Option<String> = None;

        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut idx = 0;
        while idx < args_vec.len() {
            let arg = args_vec[idx].as_str();
            match arg {
                "--help" | "-h" => return ParsedArgs { action: CliAction::ShowHelp },
                "--version" | "-V" => {
                    return ParsedArgs {
                        action: CliAction::ShowVersion,
                    };
                }
                "--debug" | "-d" => debug_enabled = true,
                "--config" | "-c" => {
                    idx += 1;
                    match args_vec.get(idx) {
                        Some(dir) => config_dir = Some(dir.clone()),
                        None => {
                            return ParsedArgs {
                                action: CliAction::ShowHelpDueToError,
                            };
                        }
                    }
                }
                _ if arg.starts_with('-') => {
                    return ParsedArgs {
                        action: CliAction::ShowHelpDueToError,
                    };
                }
                _ if command.is_none() => command = Some(arg.to_string()),
                _ if command.as_deref() == Some("set") && command_value.is_none() => {
                    command_value = Some(arg.to_string())
                }
                _ => {
                    return ParsedArgs {
                        action: CliAction::ShowHelpDueToError,
                    };
                }
            }
            idx += 1;
        }

        let action = match command.as_deref() {
            None => CliAction::Run {
                debug_enabled,
                config_dir,
            },
            Some("status") => CliAction::StatusCommand { config_dir },
            Some("set") => match command_value {
                Some(mode) => CliAction::SetCommand { mode, config_dir },
                None => CliAction::ShowHelpDueToError,
            },
            Some("locate") => CliAction::LocateCommand {
                debug_enabled,
                config_dir,
            },
            Some(_) => CliAction::ShowHelpDueToError,
        };

        ParsedArgs { action }
    }
}

/// Print usage information.
pub fn display_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!("suntheme v{version} - sunrise/sunset based theme switching");
    println!();
    println!("Usage: suntheme [OPTIONS] [COMMAND]");
    println!();
    println!("Commands:");
    println!("  (none)             Run the daemon");
    println!("  status             Show today's solar times and the stored preference");
    println!("  set <MODE>         Persist and apply a preference (light, dark, system)");
    println!("  locate             Resolve coordinates from IP geolocation into the config");
    println!();
    println!("Options:");
    println!("  -c, --config DIR   Use an alternate configuration directory");
    println!("  -d, --debug        Enable detailed debug output");
    println!("  -h, --help         Print help");
    println!("  -V, --version      Print version");
}

/// Print the version line.
pub fn display_version() {
    println!("suntheme v{}", env!("CARGO_PKG_VERSION"));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliAction {
        let mut full = vec!["suntheme"];
        full.extend_from_slice(args);
        ParsedArgs::parse(full).action
    }

    #[test]
    fn bare_invocation_runs_the_daemon() {
        assert_eq!(
            parse(&[]),
            CliAction::Run {
                debug_enabled: false,
                config_dir: None,
            }
        );
    }

    #[test]
    fn flags_combine_with_run() {
        assert_eq!(
            parse(&["--debug", "--config", "/tmp/conf"]),
            CliAction::Run {
                debug_enabled: true,
                config_dir: Some("/tmp/conf".to_string()),
            }
        );
    }

    #[test]
    fn subcommands_parse() {
        assert_eq!(
            parse(&["status"]),
            CliAction::StatusCommand { config_dir: None }
        );
        assert_eq!(
            parse(&["set", "dark"]),
            CliAction::SetCommand {
                mode: "dark".to_string(),
                config_dir: None,
            }
        );
        assert_eq!(
            parse(&["locate", "-d"]),
            CliAction::LocateCommand {
                debug_enabled: true,
                config_dir: None,
            }
        );
    }

    #[test]
    fn flags_may_precede_the_subcommand() {
        assert_eq!(
            parse(&["-c", "/tmp/conf", "status"]),
            CliAction::StatusCommand {
                config_dir: Some("/tmp/conf".to_string()),
            }
        );
    }

    #[test]
    fn help_and_version_take_precedence() {
        assert_eq!(parse(&["--help"]), CliAction::ShowHelp);
        assert_eq!(parse(&["status", "-V"]), CliAction::ShowVersion);
    }

    #[test]
    fn errors_fall_back_to_help() {
        assert_eq!(parse(&["--bogus"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["frobnicate"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["set"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["--config"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["status", "extra"]), CliAction::ShowHelpDueToError);
    }
}
