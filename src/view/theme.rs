//! Color themes.
//!
//! Themes are built in; `Theme::from_name` picks one by the name given in config.

use ratatui::style::Color;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,

    // Editor area
    pub editor_bg: Color,
    pub editor_fg: Color,
    pub line_number_fg: Color,
    pub selection_bg: Color,
    pub cursor_line_number_fg: Color,

    // Tab header
    pub tab_active_fg: Color,
    pub tab_active_bg: Color,
    pub tab_inactive_fg: Color,
    pub tab_inactive_bg: Color,
    pub tab_focused_indicator: Color,
    pub tab_rule_fg: Color,

    // Layout
    pub split_separator_fg: Color,
    pub status_bar_fg: Color,
    pub status_bar_bg: Color,

    // Drop preview shown while dragging a tab
    pub drop_overlay_fg: Color,
    pub drop_overlay_bg: Color,
    pub drop_overlay_fill: Color,

    // Syntax
    pub syntax_keyword: Color,
    pub syntax_string: Color,
    pub syntax_comment: Color,
    pub syntax_function: Color,
    pub syntax_type: Color,
    pub syntax_variable: Color,
    pub syntax_constant: Color,
    pub syntax_operator: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            editor_bg: Color::Rgb(30, 30, 30),
            editor_fg: Color::Rgb(212, 212, 212),
            line_number_fg: Color::Rgb(100, 100, 100),
            selection_bg: Color::Rgb(38, 79, 120),
            cursor_line_number_fg: Color::Rgb(200, 200, 200),

            tab_active_fg: Color::Yellow,
            tab_active_bg: Color::Blue,
            tab_inactive_fg: Color::White,
            tab_inactive_bg: Color::DarkGray,
            tab_focused_indicator: Color::Cyan,
            tab_rule_fg: Color::Rgb(80, 80, 80),

            split_separator_fg: Color::Rgb(100, 100, 100),
            status_bar_fg: Color::White,
            status_bar_bg: Color::Rgb(0, 122, 204),

            drop_overlay_fg: Color::Rgb(0x00, 0xFF, 0xFF),
            drop_overlay_bg: Color::Rgb(0x00, 0x00, 0x44),
            drop_overlay_fill: Color::Rgb(0x00, 0x00, 0x88),

            syntax_keyword: Color::Rgb(86, 156, 214),
            syntax_string: Color::Rgb(206, 145, 120),
            syntax_comment: Color::Rgb(106, 153, 85),
            syntax_function: Color::Rgb(220, 220, 170),
            syntax_type: Color::Rgb(78, 201, 176),
            syntax_variable: Color::Rgb(156, 220, 254),
            syntax_constant: Color::Rgb(181, 206, 168),
            syntax_operator: Color::Rgb(212, 212, 212),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            editor_bg: Color::Rgb(255, 255, 255),
            editor_fg: Color::Rgb(0, 0, 0),
            line_number_fg: Color::Rgb(140, 140, 140),
            selection_bg: Color::Rgb(173, 214, 255),
            cursor_line_number_fg: Color::Rgb(0, 0, 0),

            tab_active_fg: Color::Rgb(40, 40, 40),
            tab_active_bg: Color::Rgb(255, 255, 255),
            tab_inactive_fg: Color::Rgb(100, 100, 100),
            tab_inactive_bg: Color::Rgb(230, 230, 230),
            tab_focused_indicator: Color::Rgb(0, 122, 204),
            tab_rule_fg: Color::Rgb(200, 200, 200),

            split_separator_fg: Color::Rgb(180, 180, 180),
            status_bar_fg: Color::White,
            status_bar_bg: Color::Rgb(0, 122, 204),

            drop_overlay_fg: Color::Rgb(0x00, 0xFF, 0xFF),
            drop_overlay_bg: Color::Rgb(0x00, 0x00, 0x44),
            drop_overlay_fill: Color::Rgb(0x00, 0x00, 0x88),

            syntax_keyword: Color::Rgb(0, 0, 255),
            syntax_string: Color::Rgb(163, 21, 21),
            syntax_comment: Color::Rgb(0, 128, 0),
            syntax_function: Color::Rgb(121, 94, 38),
            syntax_type: Color::Rgb(38, 127, 153),
            syntax_variable: Color::Rgb(0, 16, 128),
            syntax_constant: Color::Rgb(9, 134, 88),
            syntax_operator: Color::Rgb(0, 0, 0),
        }
    }

    /// Built-in theme by name; unknown names give `None`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "dark" | "default" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::highlighter::HighlightCategory;

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("Light").map(|t| t.name), Some("light".to_string()));
        assert_eq!(Theme::from_name("default"), Some(Theme::dark()));
        assert_eq!(Theme::from_name("solarized"), None);
    }

    #[test]
    fn test_categories_map_to_theme_colors() {
        let theme = Theme::dark();
        assert_eq!(HighlightCategory::Keyword.color(&theme), theme.syntax_keyword);
        assert_eq!(HighlightCategory::Number.color(&theme), theme.syntax_constant);
        assert_eq!(HighlightCategory::Property.color(&theme), theme.syntax_variable);
    }
}
