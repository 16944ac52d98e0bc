use crate::utils::any::Any;
use ratatui::style::{Color, Style};
use serde::{Deserialize, Deserializer};

#[derive(Clone, Copy, Deserialize)]
pub struct Spec {
    #[serde(deserialize_with = "Spec::deserialize_color")]
    pub fg: Color,

    #[serde(deserialize_with = "Spec::deserialize_color")]
    pub bg: Color,
}

impl Spec {
    const fn new(fg: Color, bg: Color) -> Self {
        Self { fg, bg }
    }

    // NOTE: rgb colors are mapped onto the nearest ansi-256 color so that they render on terminals without truecolor
    fn deserialize_color<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        let color = Color::deserialize(deserializer)?;
        let Color::Rgb(r, g, b) = color else { return color.ok() };
        let index = ansi_colours::ansi256_from_rgb((r, g, b));

        Color::Indexed(index).ok()
    }

    pub fn style(&self) -> Style {
        Style::new().fg(self.fg).bg(self.bg)
    }
}

#[derive(Deserialize)]
pub struct ColorScheme {
    pub title: Spec,
    pub input: Spec,
    pub options: Spec,
    pub selected: Spec,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            title: Spec::new(Color::Cyan, Color::Reset),
            input: Spec::new(Color::Reset, Color::Reset),
            options: Spec::new(Color::Reset, Color::Reset),
            selected: Spec::new(Color::Black, Color::Cyan),
        }
    }
}
