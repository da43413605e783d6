use std::fs;
use std::path::Path;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub muted: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub selected_bg: String,
    pub bar_filled: String,
    pub bar_empty: String,
    pub error: String,
    pub warning: String,
    pub success: String,
}

impl Theme {
    /// Look up a theme by name, preferring `<config>/pilotprep/themes/<name>.toml`
    /// over the bundled ones.
    pub fn load(name: &str) -> Option<Self> {
        let user_dir = dirs::config_dir().map(|dir| dir.join("pilotprep").join("themes"));
        Self::load_from(user_dir.as_deref(), name)
    }

    pub fn load_from(user_dir: Option<&Path>, name: &str) -> Option<Self> {
        if let Some(dir) = user_dir {
            let user_theme_path = dir.join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path) {
                match toml::from_str::<Theme>(&content) {
                    Ok(theme) => return Some(theme),
                    Err(e) => tracing::warn!(path = %user_theme_path.display(), "bad theme file: {e}"),
                }
            }
        }

        let file = ThemeAssets::get(&format!("{name}.toml"))?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load("dark").unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#0f172a".to_string(),
            fg: "#e2e8f0".to_string(),
            muted: "#64748b".to_string(),
            accent: "#38bdf8".to_string(),
            accent_dim: "#1e3a5f".to_string(),
            border: "#334155".to_string(),
            border_focused: "#38bdf8".to_string(),
            header_bg: "#1e293b".to_string(),
            header_fg: "#e2e8f0".to_string(),
            selected_bg: "#1e3a5f".to_string(),
            bar_filled: "#38bdf8".to_string(),
            bar_empty: "#1e293b".to_string(),
            error: "#f87171".to_string(),
            warning: "#facc15".to_string(),
            success: "#4ade80".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Color::Rgb(r, g, b);
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn muted(&self) -> Color { Self::parse_color(&self.muted) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn selected_bg(&self) -> Color { Self::parse_color(&self.selected_bg) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }

    /// Traffic-light colour for a 0-100 accuracy score.
    pub fn score_color(&self, percent: u32) -> Color {
        if percent > 75 {
            self.success()
        } else if percent > 50 {
            self.warning()
        } else {
            self.error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_themes_parse() {
        let mut names = Theme::available_themes();
        names.sort();
        assert_eq!(names, vec!["dark", "light"]);
        for name in names {
            let theme = Theme::load(&name).unwrap();
            assert_eq!(theme.name, name);
        }
    }

    #[test]
    fn test_user_theme_dir_wins() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut custom = Theme::load("dark").unwrap();
        custom.name = "cockpit".to_string();
        fs::write(
            dir.path().join("cockpit.toml"),
            toml::to_string(&custom).unwrap(),
        )
        .unwrap();

        let loaded = Theme::load_from(Some(dir.path()), "cockpit").unwrap();
        assert_eq!(loaded.name, "cockpit");
        assert!(Theme::load_from(Some(dir.path()), "light").is_some());
        assert!(Theme::load_from(None, "cockpit").is_none());
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(ThemeColors::parse_color("#ff8000"), Color::Rgb(255, 128, 0));
        assert_eq!(ThemeColors::parse_color("nope"), Color::White);
    }

    #[test]
    fn test_score_color_thresholds() {
        let colors = ThemeColors::default();
        assert_eq!(colors.score_color(76), colors.success());
        assert_eq!(colors.score_color(75), colors.warning());
        assert_eq!(colors.score_color(51), colors.warning());
        assert_eq!(colors.score_color(50), colors.error());
    }
}
