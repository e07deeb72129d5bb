use crate::config;
use crate::error::SettingsError;

/// Load and validate settings. Config is optional: on any failure the
/// defaults are used and the problem is handed back for logging once the
/// log file is open.
pub fn load_settings() -> (config::Settings, Option<SettingsError>) {
    match config::Settings::load().and_then(|s| s.validate().map(|()| s)) {
        Ok(s) => (s, None),
        Err(e) => (config::Settings::default(), Some(e)),
    }
}
