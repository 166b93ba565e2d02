//! Themes
//!
//!     A theme maps token classes to display styles. Lookup walks the dotted class name
//!     from most to least specific, so a theme can style `keyword` once and have it apply
//!     to `keyword.control.assembly`, or single out one class precisely.

use crate::lc3::token::TokenClass;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThemeError {
    #[error("invalid colour `{0}`, expected #rrggbb")]
    InvalidColor(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

impl FromStr for Color {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ThemeError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Color {
    type Error = ThemeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

impl Style {
    pub fn fg(color: Color) -> Self {
        Style {
            foreground: Some(color),
            ..Style::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    #[serde(default)]
    pub default_style: Style,
    #[serde(default)]
    pub styles: BTreeMap<String, Style>,
}

impl Theme {
    pub fn new(name: impl Into<String>, default_style: Style) -> Self {
        Theme {
            name: name.into(),
            default_style,
            styles: BTreeMap::new(),
        }
    }

    pub fn with_style(mut self, class: &str, style: Style) -> Self {
        self.styles.insert(class.to_string(), style);
        self
    }

    /// Replaces the styles of the given classes; other entries are kept.
    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, Style)>,
    {
        self.styles.extend(overrides);
        self
    }

    pub fn style_for(&self, class: &TokenClass) -> &Style {
        class
            .prefixes()
            .find_map(|prefix| self.styles.get(prefix))
            .unwrap_or(&self.default_style)
    }

    pub fn builtin(name: &str) -> Option<Theme> {
        match name {
            "light" => Some(LIGHT.clone()),
            "dark" => Some(DARK.clone()),
            _ => None,
        }
    }

    pub fn builtin_names() -> &'static [&'static str] {
        &["light", "dark"]
    }
}

pub static LIGHT: Lazy<Theme> = Lazy::new(|| {
    Theme::new("light", Style::fg(Color::rgb(0x1f, 0x1f, 0x1f)))
        .with_style("keyword", Style::fg(Color::rgb(0x00, 0x00, 0xff)).bold())
        .with_style("variable.parameter", Style::fg(Color::rgb(0x00, 0x10, 0x80)))
        .with_style("constant", Style::fg(Color::rgb(0x09, 0x86, 0x58)))
        .with_style("string", Style::fg(Color::rgb(0xa3, 0x15, 0x15)))
        .with_style("support.function", Style::fg(Color::rgb(0xff, 0x00, 0x00)))
        .with_style("entity.name.function", Style::fg(Color::rgb(0x79, 0x5e, 0x26)))
        .with_style("comment", Style::fg(Color::rgb(0x66, 0x66, 0x66)).italic())
});

pub static DARK: Lazy<Theme> = Lazy::new(|| {
    Theme::new("dark", Style::fg(Color::rgb(0xd4, 0xd4, 0xd4)))
        .with_style("keyword", Style::fg(Color::rgb(0x56, 0x9c, 0xd6)).bold())
        .with_style("variable.parameter", Style::fg(Color::rgb(0x9c, 0xdc, 0xfe)))
        .with_style("constant", Style::fg(Color::rgb(0xb5, 0xce, 0xa8)))
        .with_style("string", Style::fg(Color::rgb(0xce, 0x91, 0x78)))
        .with_style("support.function", Style::fg(Color::rgb(0xff, 0x00, 0x00)))
        .with_style("entity.name.function", Style::fg(Color::rgb(0xdc, 0xdc, 0xaa)))
        .with_style("comment", Style::fg(Color::rgb(0x66, 0x66, 0x66)).italic())
});
