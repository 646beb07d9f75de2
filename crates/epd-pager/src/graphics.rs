//! Graphics support via embedded-graphics
//!
//! [`PagedDisplay`](crate::pager::PagedDisplay) implements the
//! [`DrawTarget`](embedded_graphics_core::draw_target::DrawTarget) trait from
//! the embedded-graphics ecosystem. Every pixel goes through
//! [`set_pixel`](crate::pager::PagedDisplay::set_pixel), so drawing the whole
//! scene on every page only stores the rows of the resident page.
//!
//! ## Example
//!
//! ```rust,ignore
//! use epd_pager::{Color, PagedDisplay};
//! use embedded_graphics::{
//!     mono_font::{ascii::FONT_6X10, MonoTextStyle},
//!     prelude::*,
//!     primitives::{Circle, PrimitiveStyle, Rectangle},
//!     text::Text,
//! };
//!
//! let mut display = PagedDisplay::new(display_driver, [0u8; 5000], Some([0u8; 5000]))?;
//! display.init(&mut delay)?;
//!
//! display.render(&mut delay, |page| {
//!     page.clear(Color::White).ok();
//!
//!     Rectangle::new(Point::new(10, 10), Size::new(50, 30))
//!         .into_styled(PrimitiveStyle::with_fill(Color::Accent))
//!         .draw(page)
//!         .ok();
//!
//!     Circle::new(Point::new(100, 50), 40)
//!         .into_styled(PrimitiveStyle::with_stroke(Color::Black, 2))
//!         .draw(page)
//!         .ok();
//!
//!     Text::new("Hello, E-Paper!", Point::new(10, 100), MonoTextStyle::new(&FONT_6X10, Color::Black))
//!         .draw(page)
//!         .ok();
//! })?;
//! ```

use core::convert::Infallible;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    prelude::Pixel,
};

use crate::color::Color;
use crate::interface::DisplayInterface;
use crate::pager::PagedDisplay;

impl<I, B> DrawTarget for PagedDisplay<I, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            self.set_pixel(x, y, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}

impl<I, B> OriginDimensions for PagedDisplay<I, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn size(&self) -> Size {
        Size::new(u32::from(self.width()), u32::from(self.height()))
    }
}
