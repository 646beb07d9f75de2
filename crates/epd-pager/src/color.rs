//! Pixel colors
//!
//! A pixel is white, black, or the panel's accent color (red on
//! the two-plane panels). In the frame buffer black wins over accent, which
//! wins over white.

/// Pixel color
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Color {
    /// No ink on either plane
    #[default]
    White,
    /// Black plane set
    Black,
    /// Accent plane set (shown as white on single-plane panels)
    Accent,
}

impl Color {
    /// Fill pattern for the (black, accent) planes
    pub(crate) fn fill_pattern(self) -> (u8, u8) {
        match self {
            Color::White => (0x00, 0x00),
            Color::Black => (0xFF, 0x00),
            Color::Accent => (0x00, 0xFF),
        }
    }
}

#[cfg(feature = "graphics")]
impl embedded_graphics_core::pixelcolor::PixelColor for Color {
    type Raw = ();
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::pixelcolor::BinaryColor> for Color {
    fn from(color: embedded_graphics_core::pixelcolor::BinaryColor) -> Self {
        match color {
            embedded_graphics_core::pixelcolor::BinaryColor::On => Color::Black,
            embedded_graphics_core::pixelcolor::BinaryColor::Off => Color::White,
        }
    }
}
