use std::{env, path::PathBuf};

use crate::catalog::ThemeColor;
use crate::error::SettingsError;

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `GRAMOPHONE__`),
/// then an optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, SettingsError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("GRAMOPHONE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Reject settings that load fine but cannot drive the player.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |msg: &str| Err(SettingsError::Invalid(msg.to_string()));

        if !(0.0..=1.0).contains(&self.audio.volume) {
            return invalid("audio.volume must be between 0.0 and 1.0");
        }
        if !(0.0..=1.0).contains(&self.audio.ambient_volume) {
            return invalid("audio.ambient_volume must be between 0.0 and 1.0");
        }
        if self.audio.time_update_ms == 0 {
            return invalid("audio.time_update_ms must be >= 1");
        }
        if self.ui.cell_width_px == 0 || self.ui.cell_height_px == 0 {
            return invalid("ui.cell_width_px and ui.cell_height_px must be >= 1");
        }
        if self.transition.particles == 0 {
            return invalid("transition.particles must be >= 1");
        }
        if ThemeColor::new(self.transition.back_color.as_str()).rgb().is_none() {
            return invalid("transition.back_color must be a #RRGGBB or #RGB color");
        }
        if let Some(tracks) = &self.tracks {
            if tracks.is_empty() {
                return invalid("tracks must not be empty when set");
            }
            let mut ids: Vec<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
            ids.sort_unstable();
            if ids.windows(2).any(|w| w[0] == w[1]) {
                return invalid("track ids must be unique");
            }
        }
        Ok(())
    }
}

/// Resolve the config path from `GRAMOPHONE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("GRAMOPHONE_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/gramophone/config.toml`
/// or `~/.config/gramophone/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("gramophone").join("config.toml"))
}

/// Compute the default log path under `$XDG_STATE_HOME/gramophone/gramophone.log`
/// or `~/.local/state/gramophone/gramophone.log`.
pub fn default_log_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("gramophone").join("gramophone.log"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
