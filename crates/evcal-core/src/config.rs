use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// A problem found in one config field, such as `host.click_script`.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors block loading; warnings are only logged.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigIssue>,
    pub warnings: Vec<ConfigIssue>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn add_error(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(ConfigIssue {
            field,
            message: message.into(),
        });
    }

    fn add_warning(&mut self, field: &'static str, message: impl Into<String>) {
        self.warnings.push(ConfigIssue {
            field,
            message: message.into(),
        });
    }

    /// All errors joined with `; `.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(ConfigIssue::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Options handed to the rendering component
    #[serde(default)]
    pub view: ViewConfig,

    /// Handling of absent or unreadable host data
    #[serde(default)]
    pub data: DataConfig,

    /// Script names used for host call-outs
    #[serde(default)]
    pub host: HostConfig,

    /// Event styling defaults
    #[serde(default)]
    pub style: StyleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// View shown when the calendar is created (month, week or day grid)
    #[serde(default = "default_initial_view")]
    pub initial_view: String,

    /// Date shown when the calendar is created; today when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_date: Option<NaiveDate>,

    /// Allow drag and drop editing
    #[serde(default)]
    pub editable: bool,

    /// Allow date range selection
    #[serde(default)]
    pub selectable: bool,

    /// Maximum events per day cell; unlimited when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_max_events: Option<u32>,

    /// Show days of adjacent months in the month grid
    #[serde(default = "default_true")]
    pub show_non_current_dates: bool,

    /// Always show six weeks in the month grid
    #[serde(default)]
    pub fixed_week_count: bool,

    /// Show event times inside month cells
    #[serde(default)]
    pub display_event_time: bool,

    #[serde(default = "default_true")]
    pub weekends: bool,
}

fn default_initial_view() -> String {
    "dayGridMonth".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            initial_view: default_initial_view(),
            initial_date: None,
            editable: false,
            selectable: false,
            day_max_events: None,
            show_non_current_dates: true,
            fixed_week_count: false,
            display_event_time: false,
            weekends: true,
        }
    }
}

/// What Load installs when the host sends nothing usable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingDataPolicy {
    #[default]
    Empty,
    Sample,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default)]
    pub missing_data: MissingDataPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Script performed when an event is clicked
    #[serde(default = "default_click_script")]
    pub click_script: String,

    /// Script performed when the visible date range changes
    #[serde(default = "default_range_script")]
    pub range_script: String,
}

fn default_click_script() -> String {
    "Event Calendar - Handle Click".to_string()
}

fn default_range_script() -> String {
    "Event Calendar - handle dateSet".to_string()
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            click_script: default_click_script(),
            range_script: default_range_script(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Fill color for background events that do not carry their own
    #[serde(default = "default_background_color")]
    pub background_color: String,
}

fn default_background_color() -> String {
    "#ffebee".to_string()
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: default_background_color(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, falling back to defaults
    /// when no file exists yet.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit TOML file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::NotFound(format!("{}: {}", path.display(), e)))?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult), ConfigError> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.view.initial_view.trim().is_empty() {
            result.add_error("view.initial_view", "Initial view must not be empty");
        }

        if self.view.day_max_events == Some(0) {
            result.add_warning(
                "view.day_max_events",
                "Day cells limited to 0 events will only show a \"more\" link",
            );
        }

        if self.host.click_script.trim().is_empty() {
            result.add_error("host.click_script", "Click script name must not be empty");
        }

        if self.host.range_script.trim().is_empty() {
            result.add_error("host.range_script", "Range script name must not be empty");
        }

        if !is_css_color(&self.style.background_color) {
            result.add_error(
                "style.background_color",
                format!(
                    "Expected a hex color like #ffebee, got: {}",
                    self.style.background_color
                ),
            );
        }

        result
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Invalid(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, contents)
            .map_err(|e| ConfigError::Invalid(format!("Failed to write config file: {}", e)))
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::MissingSetting("config directory".into()))?
            .join("evcal");

        Ok(config_dir.join("config.toml"))
    }
}

/// `#rgb` / `#rrggbb` hex colors plus `transparent`.
fn is_css_color(value: &str) -> bool {
    if value == "transparent" {
        return true;
    }
    match value.strip_prefix('#') {
        Some(hex) => {
            (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}
