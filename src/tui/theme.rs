use ratatui::style::Color;

/// Built-in theme names, in the order `Ctrl+t` cycles through them
pub const THEME_NAMES: [&str; 4] = ["gruvbox", "nord", "dracula", "midnight"];

pub const DEFAULT_THEME: &str = "gruvbox";

/// Parsed color theme for the TUI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub background: Color,
    /// Background of every other table row
    pub stripe_bg: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub selection_bg: Color,
}

/// Hex palette for one theme, in `Theme` field order
struct Palette {
    name: &'static str,
    colors: [&'static str; 11],
}

const PALETTES: [Palette; 4] = [
    Palette {
        name: "gruvbox",
        colors: [
            "#282828", "#32302F", "#EBDBB2", "#FBF1C7", "#FE8019", "#928374", "#FB4934",
            "#FABD2F", "#B8BB26", "#8EC07C", "#504945",
        ],
    },
    Palette {
        name: "nord",
        colors: [
            "#2E3440", "#3B4252", "#D8DEE9", "#ECEFF4", "#88C0D0", "#616E88", "#BF616A",
            "#EBCB8B", "#A3BE8C", "#8FBCBB", "#434C5E",
        ],
    },
    Palette {
        name: "dracula",
        colors: [
            "#282A36", "#303341", "#F8F8F2", "#FFFFFF", "#FF79C6", "#6272A4", "#FF5555",
            "#F1FA8C", "#50FA7B", "#8BE9FD", "#44475A",
        ],
    },
    Palette {
        name: "midnight",
        colors: [
            "#0C001B", "#150A2A", "#B0AAFF", "#FFFFFF", "#FB4196", "#7D78BF", "#FF4444",
            "#FFD700", "#44FF88", "#44DDFF", "#3D1438",
        ],
    },
];

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Palette {
    fn theme(&self) -> Theme {
        let c = |i: usize| parse_hex_color(self.colors[i]).unwrap_or(Color::Reset);
        Theme {
            name: self.name,
            background: c(0),
            stripe_bg: c(1),
            text: c(2),
            text_bright: c(3),
            highlight: c(4),
            dim: c(5),
            red: c(6),
            yellow: c(7),
            green: c(8),
            cyan: c(9),
            selection_bg: c(10),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        PALETTES[0].theme()
    }
}

impl Theme {
    /// Look up a built-in theme by name, falling back to the default
    pub fn named(name: &str) -> Self {
        match PALETTES.iter().find(|p| p.name == name) {
            Some(palette) => palette.theme(),
            None => {
                log::warn!("unknown theme {:?}, using {}", name, DEFAULT_THEME);
                Theme::default()
            }
        }
    }
}

/// The theme after `current` in [`THEME_NAMES`], wrapping around
pub fn next_theme_name(current: &str) -> &'static str {
    let idx = THEME_NAMES.iter().position(|n| *n == current);
    match idx {
        Some(i) => THEME_NAMES[(i + 1) % THEME_NAMES.len()],
        None => THEME_NAMES[0],
    }
}
