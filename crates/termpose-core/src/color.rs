/// 24-bit RGB color. Terminal cells do not blend, so there is no alpha
/// channel; "transparent" is expressed by simply not painting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0, 0, 0);
    pub const WHITE: Color = Color(255, 255, 255);

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color(r, g, b)
    }

    /// Parses `#RRGGBB` (a leading `#` is optional). Malformed components
    /// fall back to zero, matching a black-ish "obviously wrong" output
    /// rather than a panic.
    pub fn from_hex(hex: &str) -> Self {
        let s = hex.trim_start_matches('#');
        if s.len() != 6 {
            return Color::BLACK;
        }
        Color(
            u8::from_str_radix(&s[0..2], 16).unwrap_or(0),
            u8::from_str_radix(&s[2..4], 16).unwrap_or(0),
            u8::from_str_radix(&s[4..6], 16).unwrap_or(0),
        )
    }
}
