use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "blacksquare.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub screens: Vec<Screen>,
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub props: Vec<Prop>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default = "default_unit")]
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Screen {
    pub name: String,
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Content {
    #[serde(default = "default_source_dir")]
    pub source_dir: String,
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
    #[serde(default = "default_output_file")]
    pub output_file: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Prop {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PropKind,
    pub property: String,
    pub value: TokenValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropKind {
    Range,
    Color,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TokenValue {
    Number(f64),
    Literal(String),
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Number(value) => write!(f, "{}", value),
            TokenValue::Literal(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub message: String,
}

pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|err| ConfigError {
        message: format!("failed to read config {}: {}", path.display(), err),
    })?;
    toml::from_str(&text).map_err(|err| ConfigError {
        message: format!("failed to parse config {}: {}", path.display(), err),
    })
}

pub fn default_config() -> Config {
    let sides = || {
        Some(vec![
            "-top".to_string(),
            "-bottom".to_string(),
            "-left".to_string(),
            "-right".to_string(),
        ])
    };

    Config {
        settings: Settings::default(),
        screens: vec![
            screen("sm", "480px"),
            screen("md", "768px"),
            screen("lg", "1024px"),
        ],
        content: Content::default(),
        props: vec![
            range("margin", 1.0, sides()),
            range("padding", 1.0, sides()),
            range("border-width", 0.1, None),
            range("border-radius", 0.1, None),
            color("background-color-primary", "background-color", "black"),
            color("background-color-success", "background-color", "blue"),
            color("background-color-danger", "background-color", "red"),
            color("border-color", "border-color", "black"),
            color("text-color-primary", "color", "black"),
            color("text-color-success", "color", "blue"),
            color("text-color-danger", "color", "red"),
        ],
    }
}

fn screen(name: &str, size: &str) -> Screen {
    Screen {
        name: name.to_string(),
        size: size.to_string(),
    }
}

fn range(name: &str, value: f64, direction: Option<Vec<String>>) -> Prop {
    Prop {
        name: name.to_string(),
        kind: PropKind::Range,
        property: name.to_string(),
        value: TokenValue::Number(value),
        direction,
    }
}

fn color(name: &str, property: &str, value: &str) -> Prop {
    Prop {
        name: name.to_string(),
        kind: PropKind::Color,
        property: property.to_string(),
        value: TokenValue::Literal(value.to_string()),
        direction: None,
    }
}

fn default_unit() -> String {
    "rem".to_string()
}

fn default_source_dir() -> String {
    "src".to_string()
}

fn default_file_extension() -> String {
    ".jsx".to_string()
}

fn default_output_file() -> String {
    "blacksquare.css".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            unit: default_unit(),
        }
    }
}

impl Default for Content {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            file_extension: default_file_extension(),
            output_file: default_output_file(),
        }
    }
}
