use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load_from` reads an optional config file, then environment
/// variables (prefix `FOLIO__`) on top, and falls back to struct defaults.
impl Settings {
    /// Load settings from the resolved config path and the environment.
    #[cfg(test)]
    pub fn load() -> Result<Self, ::config::ConfigError> {
        Self::load_from(resolve_config_path())
    }

    /// Load settings from an explicit (optional) config file and the environment.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("FOLIO")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("catalog.extensions")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if let Err(e) = url::Url::parse(&self.catalog.root_url) {
            return Err(format!("catalog.root_url is not a valid url: {e}"));
        }
        if self
            .catalog
            .extensions
            .iter()
            .all(|e| e.trim().trim_start_matches('.').is_empty())
        {
            return Err("catalog.extensions must name at least one extension".to_string());
        }
        if self.audio.initial_volume > 100 {
            return Err("audio.initial_volume must be <= 100".to_string());
        }
        if self.audio.unmute_fallback_volume == 0 || self.audio.unmute_fallback_volume > 100 {
            return Err("audio.unmute_fallback_volume must be within 1..=100".to_string());
        }
        if self.controls.volume_step == 0 {
            return Err("controls.volume_step must be >= 1".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `FOLIO_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("FOLIO_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/folio/config.toml`
/// or `~/.config/folio/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("folio").join("config.toml"))
}

/// Compute the default log directory under `$XDG_STATE_HOME/folio` or
/// `~/.local/state/folio`, falling back to the system temp dir.
pub fn default_state_dir() -> PathBuf {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };

    state_home
        .unwrap_or_else(env::temp_dir)
        .join("folio")
}
