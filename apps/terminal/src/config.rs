use std::{collections::HashMap, fs, path::PathBuf};

use client_core::Pacing;

pub const SETTINGS_FILE: &str = "terminal.toml";
const SETTINGS_DIR: &str = "terminal-archives";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PacingMode {
    #[default]
    Scripted,
    Instant,
}

impl PacingMode {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "scripted" => Some(Self::Scripted),
            "instant" => Some(Self::Instant),
            _ => None,
        }
    }

    pub fn pacing(self) -> Pacing {
        match self {
            Self::Scripted => Pacing::default(),
            Self::Instant => Pacing::instant(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub pacing: PacingMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            pacing: PacingMode::Scripted,
        }
    }
}

/// `<config dir>/terminal-archives/terminal.toml`, when the platform has one.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

/// Defaults, then the settings file, then the process environment. Command
/// line flags are applied by the caller.
pub fn load_settings(path: Option<PathBuf>) -> Settings {
    let mut settings = Settings::default();
    if let Some(path) = path.or_else(default_settings_path) {
        if let Ok(raw) = fs::read_to_string(&path) {
            tracing::debug!(path = %path.display(), "loading terminal settings");
            apply_file(&mut settings, &raw);
        }
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings
}

pub(crate) fn apply_file(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) else {
        tracing::warn!(file = SETTINGS_FILE, "ignoring unparseable settings file");
        return;
    };

    if let Some(v) = file_cfg.get("server_url").and_then(toml::Value::as_str) {
        settings.server_url = v.to_string();
    }
    if let Some(mode) = file_cfg
        .get("pacing")
        .and_then(toml::Value::as_str)
        .and_then(PacingMode::parse)
    {
        settings.pacing = mode;
    }
}

pub(crate) fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("ARCHIVES_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = var("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = var("APP__PACING") {
        match PacingMode::parse(&v) {
            Some(mode) => settings.pacing = mode,
            None => tracing::warn!(value = %v, "ignoring unknown APP__PACING"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
