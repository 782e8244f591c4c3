//! Appearance preference catalogs (color theme and border style).

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Theme id applied when no preference was chosen.
pub const DEFAULT_THEME_ID: &str = "original";
/// Border style id applied when no preference was chosen.
pub const DEFAULT_BORDER_STYLE_ID: &str = "default";

/// Color theme catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    /// Background, surface and accent colors as `#RRGGBB`.
    pub colors: [&'static str; 3],
}

/// Border style catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderStyle {
    pub id: &'static str,
    pub name: &'static str,
}

const THEMES: &[Theme] = &[
    Theme {
        id: "original",
        name: "Original",
        colors: ["#1E232B", "#2A303A", "#14B8A6"],
    },
    Theme {
        id: "ensoñacion",
        name: "Ensoñación",
        colors: ["#FDF2F8", "#FFFFFF", "#DB2777"],
    },
    Theme {
        id: "celestial",
        name: "Celestial",
        colors: ["#f0f9ff", "#ffffff", "#ca8a04"],
    },
    Theme {
        id: "oscuro",
        name: "Oscuro",
        colors: ["#171717", "#262626", "#ca8a04"],
    },
    Theme {
        id: "enfoque",
        name: "Enfoque",
        colors: ["#17252A", "#2B7A78", "#DEF2F1"],
    },
    Theme {
        id: "fantasma",
        name: "Fantasma",
        colors: ["#1C1D21", "#31353D", "#E11D48"],
    },
    Theme {
        id: "rebelde",
        name: "Rebelde",
        colors: ["#1A1A1A", "#2A2A2A", "#F7DF1E"],
    },
];

const BORDER_STYLES: &[BorderStyle] = &[
    BorderStyle {
        id: "default",
        name: "Predeterminado",
    },
    BorderStyle {
        id: "sencillo",
        name: "Sencillo",
    },
    BorderStyle {
        id: "redondeado",
        name: "Redondeado",
    },
    BorderStyle {
        id: "marcado",
        name: "Marcado",
    },
];

/// Returns every supported theme in display order.
pub fn themes() -> &'static [Theme] {
    THEMES
}

/// Returns every supported border style in display order.
pub fn border_styles() -> &'static [BorderStyle] {
    BORDER_STYLES
}

/// Parses one theme id.
pub fn parse_theme(value: &str) -> Result<&'static Theme, AppearanceError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(AppearanceError::EmptyId);
    }
    THEMES
        .iter()
        .find(|theme| theme.id == normalized)
        .ok_or_else(|| AppearanceError::UnknownTheme(normalized.to_string()))
}

/// Parses one border style id.
pub fn parse_border_style(value: &str) -> Result<&'static BorderStyle, AppearanceError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(AppearanceError::EmptyId);
    }
    BORDER_STYLES
        .iter()
        .find(|style| style.id == normalized)
        .ok_or_else(|| AppearanceError::UnknownBorderStyle(normalized.to_string()))
}

/// Appearance id parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppearanceError {
    EmptyId,
    UnknownTheme(String),
    UnknownBorderStyle(String),
}

impl Display for AppearanceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "appearance id cannot be empty"),
            Self::UnknownTheme(value) => write!(f, "unsupported theme `{value}`"),
            Self::UnknownBorderStyle(value) => {
                write!(f, "unsupported border style `{value}`")
            }
        }
    }
}

impl Error for AppearanceError {}

/// Active appearance choice for one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppearancePreferences {
    pub theme: String,
    pub border_style: String,
}

impl Default for AppearancePreferences {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME_ID.to_string(),
            border_style: DEFAULT_BORDER_STYLE_ID.to_string(),
        }
    }
}

impl AppearancePreferences {
    /// Switches theme; unknown ids leave the current choice untouched.
    pub fn set_theme(&mut self, value: &str) -> Result<(), AppearanceError> {
        let theme = parse_theme(value)?;
        self.theme = theme.id.to_string();
        Ok(())
    }

    /// Switches border style; unknown ids leave the current choice untouched.
    pub fn set_border_style(&mut self, value: &str) -> Result<(), AppearanceError> {
        let style = parse_border_style(value)?;
        self.border_style = style.id.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        border_styles, parse_border_style, parse_theme, themes, AppearanceError,
        AppearancePreferences, DEFAULT_BORDER_STYLE_ID, DEFAULT_THEME_ID,
    };

    #[test]
    fn defaults_are_in_catalogs() {
        assert!(themes().iter().any(|theme| theme.id == DEFAULT_THEME_ID));
        assert!(border_styles()
            .iter()
            .any(|style| style.id == DEFAULT_BORDER_STYLE_ID));
    }

    #[test]
    fn parse_rejects_blank_and_unknown_ids() {
        assert_eq!(parse_theme("  "), Err(AppearanceError::EmptyId));
        assert_eq!(
            parse_theme("neon"),
            Err(AppearanceError::UnknownTheme("neon".to_string()))
        );
        assert_eq!(
            parse_border_style("dotted"),
            Err(AppearanceError::UnknownBorderStyle("dotted".to_string()))
        );
        assert_eq!(parse_theme(" oscuro ").map(|theme| theme.name), Ok("Oscuro"));
    }

    #[test]
    fn failed_switch_keeps_previous_choice() {
        let mut preferences = AppearancePreferences::default();
        preferences.set_theme("rebelde").unwrap();
        assert!(preferences.set_theme("neon").is_err());
        assert_eq!(preferences.theme, "rebelde");

        preferences.set_border_style("marcado").unwrap();
        assert_eq!(preferences.border_style, "marcado");
    }
}
