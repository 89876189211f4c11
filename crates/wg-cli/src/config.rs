//! Configuration loading and management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use wg_core::scheduler::{MAX_PERIOD, MIN_PERIOD};
use wg_core::{GridMetrics, InitialActive, LayoutConfig, ValidationError, VisibleWindow};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the JSON file holding calendar events.
    pub events_path: PathBuf,

    /// First hour drawn on the grid.
    pub start_hour: u32,

    /// Last hour drawn on the grid (inclusive).
    pub end_hour: u32,

    /// Height of one hour row in pixels.
    pub row_height_px: f32,

    /// Minimum drawn event height in pixels.
    pub min_height_px: f32,

    /// Gap between side-by-side columns, in percent of the day width.
    pub column_gutter_pct: f32,

    /// Seconds between automatic stack rotations.
    pub rotation_interval_secs: u64,

    /// Which member of a new stack starts on top.
    pub initial_active: InitialActive,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        let metrics = GridMetrics::default();
        let window = VisibleWindow::default();
        Self {
            events_path: data_dir.join("events.json"),
            start_hour: window.start_hour(),
            end_hour: window.end_hour(),
            row_height_px: metrics.row_height,
            min_height_px: metrics.min_height,
            column_gutter_pct: metrics.column_gutter,
            rotation_interval_secs: 60,
            initial_active: InitialActive::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (WG_*)
        figment = figment.merge(Env::prefixed("WG_"));

        figment.extract()
    }

    /// Validates the grid settings and builds the engine configuration.
    pub fn layout_config(&self) -> Result<LayoutConfig, ValidationError> {
        Ok(LayoutConfig {
            window: VisibleWindow::new(self.start_hour, self.end_hour)?,
            metrics: GridMetrics::new(self.row_height_px, self.min_height_px, self.column_gutter_pct)?,
            initial_active: self.initial_active,
            rotation_period: rotation_period(self.rotation_interval_secs)?,
        })
    }
}

fn rotation_period(secs: u64) -> Result<Duration, ValidationError> {
    let period = Duration::from_secs(secs);
    if (MIN_PERIOD..=MAX_PERIOD).contains(&period) {
        Ok(period)
    } else {
        Err(ValidationError::PeriodOutOfRange {
            value: secs,
            max: MAX_PERIOD.as_secs(),
        })
    }
}

/// Returns the platform-specific config directory for wg.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("wg"))
}

/// Returns the platform-specific data directory for wg.
///
/// On Linux: `~/.local/share/wg`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("wg"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_dirs_data_path_ends_with_wg() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "wg");
    }

    #[test]
    fn test_default_config_uses_data_dir_for_events() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.events_path, data_dir.join("events.json"));
    }

    #[test]
    fn test_default_config_matches_engine_defaults() {
        let layout = Config::default().layout_config().unwrap();
        assert_eq!(layout, LayoutConfig::default());
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "start_hour = 8").unwrap();
        writeln!(file, "end_hour = 18").unwrap();
        writeln!(file, "initial_active = \"highest-priority\"").unwrap();
        writeln!(file, "events_path = \"/tmp/wg-events.json\"").unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.start_hour, 8);
        assert_eq!(config.end_hour, 18);
        assert_eq!(config.initial_active, InitialActive::HighestPriority);
        assert_eq!(config.events_path, PathBuf::from("/tmp/wg-events.json"));
        assert_eq!(config.rotation_interval_secs, 60);
    }

    #[test]
    fn test_invalid_window_is_rejected() {
        let config = Config {
            start_hour: 20,
            end_hour: 8,
            ..Config::default()
        };
        assert_eq!(
            config.layout_config(),
            Err(ValidationError::InvertedWindow { start: 20, end: 8 })
        );
    }

    #[test]
    fn test_rotation_interval_is_bounded() {
        for secs in [0, 86_401, u64::MAX] {
            let config = Config {
                rotation_interval_secs: secs,
                ..Config::default()
            };
            assert_eq!(
                config.layout_config(),
                Err(ValidationError::PeriodOutOfRange {
                    value: secs,
                    max: 86_400
                })
            );
        }

        let config = Config {
            rotation_interval_secs: 86_400,
            ..Config::default()
        };
        assert_eq!(
            config.layout_config().unwrap().rotation_period,
            Duration::from_secs(86_400)
        );
    }
}
