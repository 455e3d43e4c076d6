use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app::infrastructure::error::{AppError, Result};

/// CSS classes that encode the filled/outline state of the two vote icons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconClasses {
    pub up_filled: String,
    pub up_outline: String,
    pub down_filled: String,
    pub down_outline: String,
}

impl Default for IconClasses {
    fn default() -> Self {
        Self {
            up_filled: "bi-arrow-up-square-fill".to_string(),
            up_outline: "bi-arrow-up-square".to_string(),
            down_filled: "bi-arrow-down-square-fill".to_string(),
            down_outline: "bi-arrow-down-square".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownSettings {
    #[serde(default = "default_true")]
    pub tables: bool,

    #[serde(default = "default_true")]
    pub strikethrough: bool,

    /// Pass raw HTML blocks through instead of escaping them
    #[serde(default)]
    pub allow_raw_html: bool,
}

impl Default for MarkdownSettings {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            allow_raw_html: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetSettings {
    #[serde(default = "default_editor_class")]
    pub editor_class: String,

    #[serde(default = "default_preview_suffix")]
    pub preview_suffix: String,

    #[serde(default = "default_upvote_selector")]
    pub upvote_form_selector: String,

    #[serde(default = "default_downvote_selector")]
    pub downvote_form_selector: String,

    #[serde(default = "default_csrf_field")]
    pub csrf_field: String,

    #[serde(default)]
    pub icons: IconClasses,

    /// Base URL that relative form actions resolve against
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub markdown: MarkdownSettings,

    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_true() -> bool {
    true
}

fn default_editor_class() -> String {
    "markdown-editor".to_string()
}

fn default_preview_suffix() -> String {
    "-preview".to_string()
}

fn default_upvote_selector() -> String {
    ".comment-upvote-form".to_string()
}

fn default_downvote_selector() -> String {
    ".comment-downvote-form".to_string()
}

fn default_csrf_field() -> String {
    "csrfmiddlewaretoken".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("blog-widgets/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            editor_class: default_editor_class(),
            preview_suffix: default_preview_suffix(),
            upvote_form_selector: default_upvote_selector(),
            downvote_form_selector: default_downvote_selector(),
            csrf_field: default_csrf_field(),
            icons: IconClasses::default(),
            base_url: None,
            request_timeout_secs: default_request_timeout(),
            user_agent: default_user_agent(),
            markdown: MarkdownSettings::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl WidgetSettings {
    /// Load settings from the config dir, or fall back to defaults
    pub fn load() -> Self {
        let config_path = Self::get_config_path();
        let (settings, error) = Self::load_or_default(&config_path);
        if let Some(e) = error {
            tracing::warn!(path = %config_path.display(), error = %e, "failed to parse settings, using defaults");
        }
        settings
    }

    /// Like [`WidgetSettings::load`], but hands a parse or validation error
    /// back instead of logging it, for callers that have no subscriber yet.
    /// A missing file is not an error.
    pub fn load_or_default(path: &Path) -> (Self, Option<AppError>) {
        match Self::load_from(path) {
            Ok(settings) => (settings, None),
            Err(AppError::Io(_)) => (Self::default(), None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load settings from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&contents)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(AppError::Settings("request_timeout_secs must be positive".to_string()));
        }
        if self.csrf_field.is_empty() {
            return Err(AppError::Settings("csrf_field must not be empty".to_string()));
        }
        Ok(())
    }

    /// Save settings to the config dir
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;

        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("blog-widgets");
        path.push("settings.json");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = WidgetSettings::default();
        assert_eq!(settings.editor_class, "markdown-editor");
        assert_eq!(settings.preview_suffix, "-preview");
        assert_eq!(settings.csrf_field, "csrfmiddlewaretoken");
        assert_eq!(settings.icons.up_filled, "bi-arrow-up-square-fill");
        assert_eq!(settings.request_timeout_secs, 10);
        assert!(settings.base_url.is_none());
        assert!(!settings.markdown.allow_raw_html);
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{"base_url": "https://blog.example.com/post/3/"}"#;
        let settings: WidgetSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.base_url.as_deref(), Some("https://blog.example.com/post/3/"));
        assert_eq!(settings.upvote_form_selector, ".comment-upvote-form");
        assert!(settings.markdown.tables);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = WidgetSettings {
            request_timeout_secs: 3,
            log_filter: "debug".to_string(),
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        let loaded = WidgetSettings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_from_rejects_zero_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"request_timeout_secs": 0}"#).unwrap();
        let err = WidgetSettings::load_from(&path).unwrap_err();
        assert!(matches!(err, AppError::Settings(_)));
    }

    #[test]
    fn test_load_from_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(WidgetSettings::load_from(&path), Err(AppError::Json(_))));
    }

    #[test]
    fn test_load_or_default_hands_back_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let (settings, error) = WidgetSettings::load_or_default(&path);
        assert_eq!(settings, WidgetSettings::default());
        assert!(error.is_none());

        fs::write(&path, "{not json").unwrap();
        let (settings, error) = WidgetSettings::load_or_default(&path);
        assert_eq!(settings, WidgetSettings::default());
        assert!(matches!(error, Some(AppError::Json(_))));
    }
}
