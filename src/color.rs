//! Color parsing for the surface clear color.

/// An RGBA color with straight alpha.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    #[inline]
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Parse a color string into an `Rgba`.
///
/// Supports:
/// - `transparent`
/// - Named colors: black, white, red, green, blue, yellow, cyan, magenta,
///   gray/grey, orange, purple, pink, brown
/// - Hex: `#RGB` (expanded to `#RRGGBB`), `#RRGGBB`, `#RRGGBBAA`
/// - Case-insensitive, trims whitespace
pub fn parse_color(s: &str) -> Option<Rgba> {
    let s = s.trim();
    if s.starts_with('#') {
        parse_hex(s)
    } else {
        parse_named(s)
    }
}

fn parse_hex(s: &str) -> Option<Rgba> {
    let hex = s.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let byte = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    match hex.len() {
        3 => {
            let r = byte(0..1)?;
            let g = byte(1..2)?;
            let b = byte(2..3)?;
            Some(Rgba::opaque(r * 17, g * 17, b * 17))
        }
        6 => Some(Rgba::opaque(byte(0..2)?, byte(2..4)?, byte(4..6)?)),
        8 => Some(Rgba::new(byte(0..2)?, byte(2..4)?, byte(4..6)?, byte(6..8)?)),
        _ => None,
    }
}

fn parse_named(s: &str) -> Option<Rgba> {
    let (r, g, b) = match s.to_lowercase().as_str() {
        "transparent"   => return Some(Rgba::TRANSPARENT),
        "black"         => (0, 0, 0),
        "white"         => (255, 255, 255),
        "red"           => (255, 0, 0),
        "green"         => (0, 128, 0),
        "blue"          => (0, 0, 255),
        "yellow"        => (255, 255, 0),
        "cyan"          => (0, 255, 255),
        "magenta"       => (255, 0, 255),
        "gray" | "grey" => (128, 128, 128),
        "orange"        => (255, 165, 0),
        "purple"        => (128, 0, 128),
        "pink"          => (255, 192, 203),
        "brown"         => (139, 69, 19),
        _               => return None,
    };
    Some(Rgba::opaque(r, g, b))
}

/// Composite `src` over `dst` (both straight alpha).
#[inline]
pub fn blend_over(src: [u8; 4], dst: [u8; 4]) -> [u8; 4] {
    let sa = src[3] as u32;
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }
    let da = dst[3] as u32;
    // out_a = sa + da * (1 - sa), scaled by 255
    let out_a = sa * 255 + da * (255 - sa);
    if out_a == 0 {
        return [0, 0, 0, 0];
    }
    let channel = |s: u8, d: u8| {
        let premul = s as u32 * sa * 255 + d as u32 * da * (255 - sa);
        ((premul + out_a / 2) / out_a) as u8
    };
    [
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        ((out_a + 127) / 255) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors() {
        assert_eq!(parse_color("black"),       Some(Rgba::opaque(0, 0, 0)));
        assert_eq!(parse_color("white"),       Some(Rgba::opaque(255, 255, 255)));
        assert_eq!(parse_color("red"),         Some(Rgba::opaque(255, 0, 0)));
        assert_eq!(parse_color("green"),       Some(Rgba::opaque(0, 128, 0)));
        assert_eq!(parse_color("grey"),        Some(Rgba::opaque(128, 128, 128)));
        assert_eq!(parse_color("transparent"), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn named_colors_case_and_whitespace() {
        assert_eq!(parse_color("  Black  "),     Some(Rgba::BLACK));
        assert_eq!(parse_color("\tWHITE\n"),     Some(Rgba::WHITE));
        assert_eq!(parse_color("Transparent"),   Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn hex_forms() {
        assert_eq!(parse_color("#f00"),      Some(Rgba::opaque(255, 0, 0)));
        assert_eq!(parse_color("#abc"),      Some(Rgba::opaque(170, 187, 204)));
        assert_eq!(parse_color("#1a1a2e"),   Some(Rgba::opaque(26, 26, 46)));
        assert_eq!(parse_color("#FF000080"), Some(Rgba::new(255, 0, 0, 128)));
    }

    #[test]
    fn invalid_colors() {
        assert_eq!(parse_color(""),          None);
        assert_eq!(parse_color("notacolor"), None);
        assert_eq!(parse_color("#"),         None);
        assert_eq!(parse_color("#zz"),       None);
        assert_eq!(parse_color("#12345"),    None);
        assert_eq!(parse_color("#ééé"),      None);
    }

    #[test]
    fn blend_extremes() {
        let red = [255, 0, 0, 255];
        let blue = [0, 0, 255, 255];
        assert_eq!(blend_over(red, blue), red);
        assert_eq!(blend_over([9, 9, 9, 0], blue), blue);
        assert_eq!(blend_over([0, 0, 0, 0], [0, 0, 0, 0]), [0, 0, 0, 0]);
    }

    #[test]
    fn blend_half_over_opaque() {
        let out = blend_over([255, 0, 0, 128], [0, 0, 255, 255]);
        assert_eq!(out[3], 255);
        assert!((out[0] as i32 - 128).abs() <= 1);
        assert!((out[2] as i32 - 127).abs() <= 1);
    }

    #[test]
    fn blend_onto_transparent_keeps_source_color() {
        assert_eq!(blend_over([10, 20, 30, 100], [0, 0, 0, 0]), [10, 20, 30, 100]);
    }
}
