//! Configuration system for suntheme with validation and default generation.
//!
//! Settings load from `suntheme.toml` under the XDG config directory (or a
//! custom directory given with `--config`). A missing file is created with a
//! commented default. All fields are optional in the file; defaults come from
//! [`crate::constants`].
//!
//! ```toml
//! #[Location]
//! latitude = 39.9042       # Geographic latitude (-90.0 to 90.0)
//! longitude = 116.4074     # Geographic longitude (-180.0 to 180.0)
//! auto_locate = false      # Resolve coordinates from IP geolocation at startup
//!
//! #[Lookup]
//! lookup_timeout_secs = 3  # HTTP timeout for IP geolocation (1-30) seconds
//!
//! #[Scheduler]
//! check_interval_secs = 3600 # Re-check cadence for "system" preference (60-86400) seconds
//!
//! #[Theme]
//! apply_command = ""       # Command run on theme change; "{theme}" -> "light"/"dark"
//! ```

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::constants::*;

/// Global configuration directory, set once at startup
static CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Set the configuration directory for the current process.
/// This can only be called once, typically at startup.
pub fn set_config_dir(dir: Option<String>) -> Result<()> {
    CONFIG_DIR
        .set(dir.map(PathBuf::from))
        .map_err(|_| anyhow::anyhow!("Configuration directory already set"))
}

/// Get the base configuration directory.
pub fn get_config_base_dir() -> Result<PathBuf> {
    if let Some(Some(custom)) = CONFIG_DIR.get() {
        return Ok(custom.clone());
    }

    dirs::config_dir()
        .map(|d| d.join("suntheme"))
        .context("Could not determine config directory")
}

/// Full path of the configuration file.
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_base_dir()?.join(CONFIG_FILE))
}

/// Full path of the preference file (the stored theme-mode string).
pub fn get_preference_path() -> Result<PathBuf> {
    Ok(get_config_base_dir()?.join(PREFERENCE_FILE))
}

/// Application settings loaded from `suntheme.toml`.
///
/// Every field is optional; accessor methods apply the documented defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Geographic latitude in degrees (-90 to +90)
    pub latitude: Option<f64>,
    /// Geographic longitude in degrees (-180 to +180)
    pub longitude: Option<f64>,
    /// Whether to resolve coordinates from IP geolocation at startup
    pub auto_locate: Option<bool>,
    /// HTTP timeout for geolocation lookups, in seconds
    pub lookup_timeout_secs: Option<u64>,
    /// Re-check cadence while the stored preference is "system", in seconds
    pub check_interval_secs: Option<u64>,
    /// Command run when the resolved theme changes ("{theme}" placeholder)
    pub apply_command: Option<String>,
}

impl Config {
    pub fn latitude(&self) -> f64 {
        self.latitude.unwrap_or(DEFAULT_LATITUDE)
    }

    pub fn longitude(&self) -> f64 {
        self.longitude.unwrap_or(DEFAULT_LONGITUDE)
    }

    pub fn auto_locate(&self) -> bool {
        self.auto_locate.unwrap_or(DEFAULT_AUTO_LOCATE)
    }

    pub fn lookup_timeout_secs(&self) -> u64 {
        self.lookup_timeout_secs
            .unwrap_or(DEFAULT_LOOKUP_TIMEOUT_SECS)
    }

    pub fn check_interval_secs(&self) -> u64 {
        self.check_interval_secs
            .unwrap_or(DEFAULT_CHECK_INTERVAL_SECS)
    }

    /// The apply command, with an empty string treated as unset.
    pub fn apply_command(&self) -> Option<String> {
        self.apply_command
            .as_deref()
            .map(str::trim)
            .filter(|cmd| !cmd.is_empty())
            .map(str::to_string)
    }
}

/// Load configuration using automatic path detection.
///
/// Creates a default configuration file if none exists.
pub fn load() -> Result<Config> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        create_default_config(&config_path)
            .context("Failed to create default config during load")?;
        log_indented!("Created default configuration: {}", config_path.display());
    }

    load_from_path(&config_path)
}

/// Load and validate configuration from a specific path.
pub fn load_from_path(path: &PathBuf) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    validate_config(&config)?;
    Ok(config)
}

/// Validate ranges and report the first violation with its accepted range.
pub fn validate_config(config: &Config) -> Result<()> {
    let latitude = config.latitude();
    if !(-90.0..=90.0).contains(&latitude) {
        anyhow::bail!("latitude must be between -90.0 and 90.0 (got {latitude})");
    }

    let longitude = config.longitude();
    if !(-180.0..=180.0).contains(&longitude) {
        anyhow::bail!("longitude must be between -180.0 and 180.0 (got {longitude})");
    }

    let timeout = config.lookup_timeout_secs();
    if !(MINIMUM_LOOKUP_TIMEOUT_SECS..=MAXIMUM_LOOKUP_TIMEOUT_SECS).contains(&timeout) {
        anyhow::bail!(
            "lookup_timeout_secs must be between {MINIMUM_LOOKUP_TIMEOUT_SECS} and \
             {MAXIMUM_LOOKUP_TIMEOUT_SECS} (got {timeout})"
        );
    }

    let interval = config.check_interval_secs();
    if !(MINIMUM_CHECK_INTERVAL_SECS..=MAXIMUM_CHECK_INTERVAL_SECS).contains(&interval) {
        anyhow::bail!(
            "check_interval_secs must be between {MINIMUM_CHECK_INTERVAL_SECS} and \
             {MAXIMUM_CHECK_INTERVAL_SECS} (got {interval})"
        );
    }

    Ok(())
}

/// Builder assembling the commented default configuration file.
struct ConfigBuilder {
    content: String,
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            content: String::new(),
        }
    }

    fn add_section(mut self, name: &str) -> Self {
        if !self.content.is_empty() {
            self.content.push('\n');
        }
        self.content.push_str(&format!("#[{name}]\n"));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        let entry = format!("{key} = {value}");
        self.content.push_str(&format!("{entry:<28}# {comment}\n"));
        self
    }

    fn build(self) -> String {
        self.content
    }
}

/// Create the default configuration file at the given path.
pub fn create_default_config(path: &PathBuf) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let content = ConfigBuilder::new()
        .add_section("Location")
        .add_setting(
            "latitude",
            &format!("{DEFAULT_LATITUDE}"),
            "Geographic latitude (-90.0 to 90.0)",
        )
        .add_setting(
            "longitude",
            &format!("{DEFAULT_LONGITUDE}"),
            "Geographic longitude (-180.0 to 180.0)",
        )
        .add_setting(
            "auto_locate",
            &format!("{DEFAULT_AUTO_LOCATE}"),
            "Resolve coordinates from IP geolocation at startup",
        )
        .add_section("Lookup")
        .add_setting(
            "lookup_timeout_secs",
            &format!("{DEFAULT_LOOKUP_TIMEOUT_SECS}"),
            &format!(
                "HTTP timeout for IP geolocation ({MINIMUM_LOOKUP_TIMEOUT_SECS}-{MAXIMUM_LOOKUP_TIMEOUT_SECS}) seconds"
            ),
        )
        .add_section("Scheduler")
        .add_setting(
            "check_interval_secs",
            &format!("{DEFAULT_CHECK_INTERVAL_SECS}"),
            &format!(
                "Re-check cadence for \"system\" preference ({MINIMUM_CHECK_INTERVAL_SECS}-{MAXIMUM_CHECK_INTERVAL_SECS}) seconds"
            ),
        )
        .add_section("Theme")
        .add_setting(
            "apply_command",
            "\"\"",
            "Command run on theme change; \"{theme}\" -> \"light\"/\"dark\"",
        )
        .build();

    fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))
}

/// Rewrite the latitude/longitude fields of an existing config file in place,
/// preserving the surrounding comments and layout.
pub fn update_coordinates(path: &PathBuf, latitude: f64, longitude: f64) -> Result<()> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let updated = replace_field(&contents, "latitude", &format!("{latitude:.4}"))?;
    let updated = replace_field(&updated, "longitude", &format!("{longitude:.4}"))?;

    fs::write(path, updated)
        .with_context(|| format!("Failed to write config file: {}", path.display()))
}

fn replace_field(contents: &str, key: &str, value: &str) -> Result<String> {
    let pattern = Regex::new(&format!(r"(?m)^{key}\s*=\s*[^#\n]*"))
        .context("Failed to compile config field pattern")?;

    if pattern.is_match(contents) {
        // Pad to keep trailing comments roughly aligned with the default layout
        let entry = format!("{key} = {value}");
        Ok(pattern
            .replace(contents, format!("{entry:<27} ").as_str())
            .into_owned())
    } else {
        Ok(format!("{contents}{key} = {value}\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn empty_config() -> Config {
        toml::from_str("").unwrap()
    }

    #[test]
    fn empty_file_yields_all_defaults() {
        let config = empty_config();

        assert_eq!(config.latitude(), DEFAULT_LATITUDE);
        assert_eq!(config.longitude(), DEFAULT_LONGITUDE);
        assert!(!config.auto_locate());
        assert_eq!(config.lookup_timeout_secs(), DEFAULT_LOOKUP_TIMEOUT_SECS);
        assert_eq!(config.check_interval_secs(), DEFAULT_CHECK_INTERVAL_SECS);
        assert_eq!(config.apply_command(), None);
    }

    #[test]
    fn default_config_file_parses_and_validates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("suntheme.toml");

        create_default_config(&path).unwrap();
        let config = load_from_path(&path).unwrap();

        assert_eq!(config.latitude(), DEFAULT_LATITUDE);
        assert_eq!(config.longitude(), DEFAULT_LONGITUDE);
        assert_eq!(config.apply_command(), None);
    }

    #[test]
    fn blank_apply_command_counts_as_unset() {
        let config: Config = toml::from_str(r#"apply_command = "  ""#).unwrap();
        assert_eq!(config.apply_command(), None);

        let config: Config = toml::from_str(r#"apply_command = "notify {theme}""#).unwrap();
        assert_eq!(config.apply_command(), Some("notify {theme}".to_string()));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let config: Config = toml::from_str("latitude = 91.0").unwrap();
        assert!(validate_config(&config).is_err());

        let config: Config = toml::from_str("longitude = -181.0").unwrap();
        assert!(validate_config(&config).is_err());

        let config: Config = toml::from_str("lookup_timeout_secs = 0").unwrap();
        assert!(validate_config(&config).is_err());

        let config: Config = toml::from_str("check_interval_secs = 5").unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn unparseable_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("suntheme.toml");
        fs::write(&path, "latitude = \"north\"").unwrap();

        assert!(load_from_path(&path).is_err());
    }

    #[test]
    fn update_coordinates_rewrites_existing_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("suntheme.toml");
        create_default_config(&path).unwrap();

        update_coordinates(&path, -33.8688, 151.2093).unwrap();
        let config = load_from_path(&path).unwrap();

        assert!((config.latitude() - -33.8688).abs() < 1e-6);
        assert!((config.longitude() - 151.2093).abs() < 1e-6);
        // Comments survive the rewrite
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("#[Location]"));
        assert!(contents.contains("# Geographic latitude"));
    }

    #[test]
    fn update_coordinates_appends_missing_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("suntheme.toml");
        fs::write(&path, "auto_locate = true\n").unwrap();

        update_coordinates(&path, 48.8566, 2.3522).unwrap();
        let config = load_from_path(&path).unwrap();

        assert!(config.auto_locate());
        assert!((config.latitude() - 48.8566).abs() < 1e-6);
        assert!((config.longitude() - 2.3522).abs() < 1e-6);
    }
}
