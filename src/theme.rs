//! Theme preference model, persistence, and the apply hook.
//!
//! The stored preference is one of `light`, `dark`, or `system`, kept as a
//! single string in a preference file under the config directory. `system`
//! resolves to light or dark through the estimator's day/night
//! classification at apply time; the estimator itself never mutates theme
//! state.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::{fs, str::FromStr};

use crate::estimator::SolarDayNightEstimator;

/// A theme preference as stored and as passed to `set_theme`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
    /// Follow the computed day/night state.
    System,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::System => "system",
        }
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "system" => Ok(ThemeMode::System),
            other => Err(format!(
                "invalid theme mode '{other}' (expected light, dark, or system)"
            )),
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete theme after `system` has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedTheme {
    Light,
    Dark,
}

impl ResolvedTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolvedTheme::Light => "light",
            ResolvedTheme::Dark => "dark",
        }
    }
}

impl std::fmt::Display for ResolvedTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve a preference against a day/night classification.
pub fn resolve_mode(mode: ThemeMode, daytime: bool) -> ResolvedTheme {
    match mode {
        ThemeMode::Light => ResolvedTheme::Light,
        ThemeMode::Dark => ResolvedTheme::Dark,
        ThemeMode::System => {
            if daytime {
                ResolvedTheme::Light
            } else {
                ResolvedTheme::Dark
            }
        }
    }
}

/// The theme store capability consumed by the scheduler.
///
/// `set_theme` persists the preference and applies the resolved theme;
/// `preference` reads back what is currently stored.
pub trait ThemeStore {
    fn preference(&self) -> ThemeMode;
    fn set_theme(&mut self, mode: ThemeMode) -> Result<()>;
}

/// File-backed store that applies themes by running a user command.
///
/// The command template may contain `{theme}`, replaced with `light` or
/// `dark`. Re-applying the already-active resolved theme is a no-op so the
/// hourly re-check doesn't spawn redundant processes.
pub struct FileThemeStore {
    preference_path: PathBuf,
    apply_command: Option<String>,
    estimator: Arc<Mutex<SolarDayNightEstimator>>,
    last_applied: Option<ResolvedTheme>,
}

impl FileThemeStore {
    pub fn new(
        preference_path: PathBuf,
        apply_command: Option<String>,
        estimator: Arc<Mutex<SolarDayNightEstimator>>,
    ) -> Self {
        Self {
            preference_path,
            apply_command,
            estimator,
            last_applied: None,
        }
    }

    fn load_preference(&self) -> ThemeMode {
        // Missing or unparseable content falls back to following day/night
        fs::read_to_string(&self.preference_path)
            .ok()
            .and_then(|content| content.trim().parse().ok())
            .unwrap_or(ThemeMode::System)
    }

    fn store_preference(&self, mode: ThemeMode) -> Result<()> {
        if let Some(parent) = self.preference_path.parent() {
            fs::create_dir_all(parent).context("Failed to create preference directory")?;
        }

        fs::write(&self.preference_path, format!("{}\n", mode.as_str())).with_context(|| {
            format!(
                "Failed to write preference to {}",
                self.preference_path.display()
            )
        })
    }

    fn apply(&mut self, resolved: ResolvedTheme) -> Result<()> {
        if self.last_applied == Some(resolved) {
            return Ok(());
        }

        if let Some(template) = &self.apply_command {
            let command = template.replace("{theme}", resolved.as_str());
            let status = Command::new("/bin/sh")
                .arg("-c")
                .arg(&command)
                .status()
                .with_context(|| format!("Failed to run apply command: {command}"))?;

            if !status.success() {
                anyhow::bail!("Apply command exited with {status}: {command}");
            }
            log_indented!("Ran apply command for {resolved} theme");
        }

        self.last_applied = Some(resolved);
        log_decorated!("Theme set to {resolved}");

        Ok(())
    }
}

impl ThemeStore for FileThemeStore {
    fn preference(&self) -> ThemeMode {
        self.load_preference()
    }

    fn set_theme(&mut self, mode: ThemeMode) -> Result<()> {
        self.store_preference(mode)?;

        let resolved = match mode {
            ThemeMode::System => {
                let daytime = self.estimator.lock().unwrap().is_daytime();
                resolve_mode(mode, daytime)
            }
            fixed => resolve_mode(fixed, false),
        };

        self.apply(resolved)
    }
}
