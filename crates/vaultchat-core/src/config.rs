use anyhow::{anyhow, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::appearance::{ButtonMetrics, ButtonShape, ButtonType, DEFAULT_BUTTON_CONTENT};
use crate::color::Color;
use crate::error::ConfigError;
use crate::theme::Theme;

pub const DEFAULT_ENDPOINT: &str = "https://api.vaultchat.io/askChatbot";
pub const DEFAULT_CHAT_TITLE: &str = "Powered by VaultChat";
pub const DEFAULT_PRIMARY_COLOR: &str = "#1E88E5";

/// Environment variable that overrides the saved API key
pub const API_KEY_ENV: &str = "VAULTCHAT_API_KEY";

/// Startup parameters for the widget.
///
/// Built once through [`Config::builder`] and shared read-only (usually as
/// `Arc<Config>`) with the client and the chat session.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    api_key: String,
    primary_color: Color,
    theme: Theme,
    button_content: String,
    button_type: ButtonType,
    button_shape: ButtonShape,
    chat_title: String,
    endpoint: Url,
    floating_button_size: u16,
    bottom_padding: u16,
    trailing_padding: u16,
}

impl Config {
    pub fn builder(api_key: impl Into<String>) -> ConfigBuilder {
        ConfigBuilder::new(api_key)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn primary_color(&self) -> Color {
        self.primary_color
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn button_content(&self) -> &str {
        &self.button_content
    }

    pub fn button_type(&self) -> ButtonType {
        self.button_type
    }

    pub fn button_shape(&self) -> ButtonShape {
        self.button_shape
    }

    pub fn chat_title(&self) -> &str {
        &self.chat_title
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn floating_button_size(&self) -> u16 {
        self.floating_button_size
    }

    pub fn bottom_padding(&self) -> u16 {
        self.bottom_padding
    }

    pub fn trailing_padding(&self) -> u16 {
        self.trailing_padding
    }

    pub fn corner_radius(&self) -> u16 {
        self.button_shape.corner_radius(self.floating_button_size)
    }

    /// Button geometry in points
    pub fn button_metrics(&self) -> ButtonMetrics {
        ButtonMetrics {
            width: self.floating_button_size,
            height: self.floating_button_size,
            horizontal_padding: self.trailing_padding,
            vertical_padding: self.bottom_padding,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    api_key: String,
    primary_color: Color,
    theme: Theme,
    button_content: String,
    button_type: ButtonType,
    button_shape: ButtonShape,
    chat_title: String,
    endpoint: String,
}

impl ConfigBuilder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            primary_color: Color::from_hex(DEFAULT_PRIMARY_COLOR),
            theme: Theme::default(),
            button_content: DEFAULT_BUTTON_CONTENT.to_string(),
            button_type: ButtonType::default(),
            button_shape: ButtonShape::default(),
            chat_title: DEFAULT_CHAT_TITLE.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn primary_color_hex(mut self, hex: &str) -> Self {
        self.primary_color = Color::from_hex(hex);
        self
    }

    pub fn primary_color(mut self, color: Color) -> Self {
        self.primary_color = color;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn button_content(mut self, content: impl Into<String>) -> Self {
        self.button_content = content.into();
        self
    }

    pub fn button_type(mut self, button_type: ButtonType) -> Self {
        self.button_type = button_type;
        self
    }

    pub fn button_shape(mut self, shape: ButtonShape) -> Self {
        self.button_shape = shape;
        self
    }

    pub fn chat_title(mut self, title: impl Into<String>) -> Self {
        self.chat_title = title.into();
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        // Sent exactly as configured; only a blank key is refused
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        let endpoint = parse_endpoint(&self.endpoint)?;

        Ok(Config {
            api_key: self.api_key,
            primary_color: self.primary_color,
            theme: self.theme,
            button_content: self.button_content,
            button_type: self.button_type,
            button_shape: self.button_shape,
            chat_title: self.chat_title,
            endpoint,
            floating_button_size: 56,
            bottom_padding: 24,
            trailing_padding: 16,
        })
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEndpoint {
        endpoint: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme {other}"))),
    }
}

/// Saved widget settings, `~/.config/vaultchat/config.json`
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub primary_color: Option<String>,
    pub theme: Option<Theme>,
    pub button_content: Option<String>,
    pub button_type: Option<ButtonType>,
    pub button_shape: Option<ButtonShape>,
    pub endpoint: Option<String>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Build a [`Config`]. A non-empty `env_api_key` wins over the saved key.
    pub fn into_config(self, env_api_key: Option<String>) -> Result<Config, ConfigError> {
        let api_key = env_api_key
            .filter(|k| !k.trim().is_empty())
            .or(self.api_key)
            .unwrap_or_default();

        let mut builder = Config::builder(api_key);
        if let Some(hex) = self.primary_color {
            builder = builder.primary_color_hex(&hex);
        }
        if let Some(theme) = self.theme {
            builder = builder.theme(theme);
        }
        if let Some(content) = self.button_content {
            builder = builder.button_content(content);
        }
        if let Some(button_type) = self.button_type {
            builder = builder.button_type(button_type);
        }
        if let Some(shape) = self.button_shape {
            builder = builder.button_shape(shape);
        }
        if let Some(endpoint) = self.endpoint {
            builder = builder.endpoint(endpoint);
        }
        builder.build()
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("vaultchat").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = Config::builder("key-123").build().unwrap();
        assert_eq!(config.api_key(), "key-123");
        assert_eq!(config.theme(), Theme::System);
        assert_eq!(config.button_content(), "💬");
        assert_eq!(config.button_type(), ButtonType::Text);
        assert_eq!(config.button_shape(), ButtonShape::Circle);
        assert_eq!(config.chat_title(), "Powered by VaultChat");
        assert_eq!(config.endpoint().as_str(), DEFAULT_ENDPOINT);
        assert_eq!(config.floating_button_size(), 56);
        assert_eq!(config.corner_radius(), 28);
    }

    #[test]
    fn test_blank_api_key_is_rejected() {
        assert_eq!(Config::builder("   ").build(), Err(ConfigError::MissingApiKey));
    }

    #[test]
    fn test_api_key_is_kept_verbatim() {
        let config = Config::builder(" key-with-padding ").build().unwrap();
        assert_eq!(config.api_key(), " key-with-padding ");
    }

    #[test]
    fn test_bad_endpoint_is_rejected() {
        let err = Config::builder("k").endpoint("not a url").build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEndpoint { .. }));

        let err = Config::builder("k").endpoint("ftp://example.com/ask").build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_square_button_radius() {
        let config = Config::builder("k").button_shape(ButtonShape::Square).build().unwrap();
        assert_eq!(config.corner_radius(), 12);
    }

    #[test]
    fn test_settings_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_settings_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let settings = Settings {
            api_key: Some("saved".to_string()),
            primary_color: Some("#FF0000".to_string()),
            theme: Some(Theme::Dark),
            button_shape: Some(ButtonShape::Square),
            ..Default::default()
        };
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"theme\": \"dark\""));
    }

    #[test]
    fn test_env_key_overrides_saved_key() {
        let settings = Settings {
            api_key: Some("saved".to_string()),
            primary_color: Some("00FF00".to_string()),
            ..Default::default()
        };
        let config = settings.clone().into_config(Some("from-env".to_string())).unwrap();
        assert_eq!(config.api_key(), "from-env");
        assert_eq!(config.primary_color(), Color::rgb(0, 255, 0));

        let config = settings.into_config(Some("  ".to_string())).unwrap();
        assert_eq!(config.api_key(), "saved");
    }

    #[test]
    fn test_settings_without_key_fail_loudly() {
        assert_eq!(Settings::default().into_config(None), Err(ConfigError::MissingApiKey));
    }
}
