use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app::infrastructure::error::AppError;
use crate::app::services::normalizer::{NormalizeOptions, OutputStyle};
use crate::app::services::validator::ValidatorOptions;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ThemeMode {
    Light,
    Dark,
    SystemDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FontChoice {
    ScreenBold,
    Courier,
    HelveticaMono,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_line_numbers")]
    pub line_numbers_enabled: bool,

    #[serde(default = "default_word_wrap")]
    pub word_wrap_enabled: bool,

    #[serde(default = "default_theme_mode")]
    pub theme_mode: ThemeMode,

    #[serde(default = "default_font")]
    pub font: FontChoice,

    #[serde(default = "default_font_size")]
    pub font_size: u32,

    #[serde(default)]
    pub output_style: OutputStyle,

    /// Spaces per nesting level in pretty output
    #[serde(default = "default_indent_width")]
    pub indent_width: u32,

    #[serde(default)]
    pub warn_missing_doctype: bool,

    #[serde(default)]
    pub start_fullscreen: bool,
}

fn default_line_numbers() -> bool {
    true
}

fn default_word_wrap() -> bool {
    false
}

fn default_theme_mode() -> ThemeMode {
    ThemeMode::SystemDefault
}

fn default_font() -> FontChoice {
    FontChoice::Courier
}

fn default_font_size() -> u32 {
    14
}

fn default_indent_width() -> u32 {
    2
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            line_numbers_enabled: default_line_numbers(),
            word_wrap_enabled: default_word_wrap(),
            theme_mode: default_theme_mode(),
            font: default_font(),
            font_size: default_font_size(),
            output_style: OutputStyle::default(),
            indent_width: default_indent_width(),
            warn_missing_doctype: false,
            start_fullscreen: false,
        }
    }
}

impl AppSettings {
    /// Load settings from disk, or create default if not exists
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                // First run: write the defaults out for next time
                let default = Self::default();
                if let Err(e) = default.save_to(path) {
                    tracing::debug!(error = %e, "could not write default settings");
                }
                default
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;

        Ok(())
    }

    /// Reject values the editor cannot display sensibly.
    pub fn validate(&self) -> Result<(), AppError> {
        if !(6..=72).contains(&self.font_size) {
            return Err(AppError::Settings(format!(
                "font size {} is outside 6..=72",
                self.font_size
            )));
        }
        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("htmlforge");
        path.push("settings.json");
        path
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            style: self.output_style,
            indent_width: self.indent_width.clamp(1, 8) as usize,
        }
    }

    pub fn validator_options(&self) -> ValidatorOptions {
        ValidatorOptions {
            warn_missing_doctype: self.warn_missing_doctype,
        }
    }
}
