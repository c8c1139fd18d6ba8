use std::fmt;

use termpose_core::Color;

/// The fixed palette the color panel cycles through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaletteColor {
    #[default]
    LightBlue,
    LightGreen,
    LightCoral,
}

impl PaletteColor {
    pub const ALL: [PaletteColor; 3] = [
        PaletteColor::LightBlue,
        PaletteColor::LightGreen,
        PaletteColor::LightCoral,
    ];

    /// CSS color value of the same name.
    pub fn color(self) -> Color {
        match self {
            PaletteColor::LightBlue => Color::from_hex("#ADD8E6"),
            PaletteColor::LightGreen => Color::from_hex("#90EE90"),
            PaletteColor::LightCoral => Color::from_hex("#F08080"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaletteColor::LightBlue => "Light Blue",
            PaletteColor::LightGreen => "Light Green",
            PaletteColor::LightCoral => "Light Coral",
        }
    }
}

impl fmt::Display for PaletteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_and_colors_are_distinct() {
        for (i, a) in PaletteColor::ALL.iter().enumerate() {
            for b in &PaletteColor::ALL[i + 1..] {
                assert_ne!(a.label(), b.label());
                assert_ne!(a.color(), b.color());
            }
        }
    }

    #[test]
    fn default_is_light_blue() {
        assert_eq!(PaletteColor::default(), PaletteColor::LightBlue);
    }
}
