/// A complete color theme for the portfolio.
///
/// Every field is a CSS value string. The catalog below is the only source of
/// themes; an index into [`THEMES`] is what gets persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeDefinition {
    pub name: &'static str,

    /// Main accent: active navigation entry, headings, focused borders.
    pub primary: &'static str,
    pub secondary: &'static str,
    pub tertiary: &'static str,

    /// Page background, stops at 0%, 20%, 40%, 70% and 100%.
    pub gradient: &'static str,
    /// Sidebar background, same stops as `gradient` with translucent colors.
    pub sidebar_gradient: &'static str,

    /// Translucent variants of `primary`.
    pub border_color: &'static str,
    pub shadow_color: &'static str,

    pub light_color: &'static str,
}

/// Names of the style variables a theme publishes, in publication order.
pub const STYLE_VARIABLE_NAMES: [&str; 8] = [
    "primary-color",
    "secondary-color",
    "tertiary-color",
    "gradient-bg",
    "sidebar-gradient",
    "border-color",
    "shadow-color",
    "light-color",
];

impl ThemeDefinition {
    /// The eight `(variable, value)` pairs this theme publishes to the style root.
    pub fn style_variables(&self) -> [(&'static str, &'static str); 8] {
        [
            (STYLE_VARIABLE_NAMES[0], self.primary),
            (STYLE_VARIABLE_NAMES[1], self.secondary),
            (STYLE_VARIABLE_NAMES[2], self.tertiary),
            (STYLE_VARIABLE_NAMES[3], self.gradient),
            (STYLE_VARIABLE_NAMES[4], self.sidebar_gradient),
            (STYLE_VARIABLE_NAMES[5], self.border_color),
            (STYLE_VARIABLE_NAMES[6], self.shadow_color),
            (STYLE_VARIABLE_NAMES[7], self.light_color),
        ]
    }
}

pub const DEFAULT_THEME_INDEX: usize = 0;

pub static THEMES: [ThemeDefinition; 3] = [
    // ── Red ───────────────────────────────────────────────────────────────────
    ThemeDefinition {
        name: "red",
        primary: "#ff6b6b",
        secondary: "#ee5a52",
        tertiary: "#d63384",
        gradient: "linear-gradient(180deg, #ff6b6b 0%, #ee5a52 20%, #d63384 40%, #2d2d2d 70%, #1a1a1a 100%)",
        sidebar_gradient: "linear-gradient(180deg, rgba(255, 107, 107, 0.4) 0%, rgba(238, 90, 82, 0.4) 20%, rgba(214, 51, 132, 0.4) 40%, rgba(0, 0, 0, 0.5) 70%, rgba(0, 0, 0, 0.7) 100%)",
        border_color: "rgba(255, 107, 107, 0.4)",
        shadow_color: "rgba(255, 107, 107, 0.3)",
        light_color: "#ff9999",
    },
    // ── Blue ──────────────────────────────────────────────────────────────────
    ThemeDefinition {
        name: "blue",
        primary: "#667eea",
        secondary: "#764ba2",
        tertiary: "#4c63d2",
        gradient: "linear-gradient(180deg, #667eea 0%, #764ba2 20%, #4c63d2 40%, #2d2d2d 70%, #1a1a1a 100%)",
        sidebar_gradient: "linear-gradient(180deg, rgba(102, 126, 234, 0.4) 0%, rgba(118, 75, 162, 0.4) 20%, rgba(76, 99, 210, 0.4) 40%, rgba(0, 0, 0, 0.5) 70%, rgba(0, 0, 0, 0.7) 100%)",
        border_color: "rgba(102, 126, 234, 0.4)",
        shadow_color: "rgba(102, 126, 234, 0.3)",
        light_color: "#99b3ff",
    },
    // ── Grey ──────────────────────────────────────────────────────────────────
    ThemeDefinition {
        name: "grey",
        primary: "#6c757d",
        secondary: "#5a6268",
        tertiary: "#495057",
        gradient: "linear-gradient(180deg, #6c757d 0%, #5a6268 20%, #495057 40%, #2d2d2d 70%, #1a1a1a 100%)",
        sidebar_gradient: "linear-gradient(180deg, rgba(108, 117, 125, 0.4) 0%, rgba(90, 98, 104, 0.4) 20%, rgba(73, 80, 87, 0.4) 40%, rgba(0, 0, 0, 0.5) 70%, rgba(0, 0, 0, 0.7) 100%)",
        border_color: "rgba(108, 117, 125, 0.4)",
        shadow_color: "rgba(108, 117, 125, 0.3)",
        light_color: "#adb5bd",
    },
];

/// Index that follows `index` in the round-robin rotation.
pub fn next_index(index: usize) -> usize {
    (index + 1) % THEMES.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_names_are_unique() {
        let names: HashSet<_> = THEMES.iter().map(|t| t.name).collect();
        assert_eq!(names.len(), THEMES.len());
        assert_eq!(THEMES[0].name, "red");
        assert_eq!(THEMES[1].name, "blue");
        assert_eq!(THEMES[2].name, "grey");
    }

    #[test]
    fn gradients_use_fixed_stops() {
        for theme in &THEMES {
            for gradient in [theme.gradient, theme.sidebar_gradient] {
                for stop in ["0%", "20%", "40%", "70%", "100%"] {
                    assert!(gradient.contains(stop), "{} missing stop {}", theme.name, stop);
                }
            }
        }
    }

    #[test]
    fn next_index_wraps_around() {
        assert_eq!(next_index(0), 1);
        assert_eq!(next_index(1), 2);
        assert_eq!(next_index(THEMES.len() - 1), 0);
    }

    #[test]
    fn style_variables_follow_field_values() {
        let vars = THEMES[1].style_variables();
        assert_eq!(vars[0], ("primary-color", "#667eea"));
        assert_eq!(vars[4].0, "sidebar-gradient");
        assert_eq!(vars[7], ("light-color", "#99b3ff"));
    }
}
