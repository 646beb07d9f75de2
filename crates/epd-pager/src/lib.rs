//! Paged rendering and refresh engine for SPI e-paper panels
//!
//! Drives Good Display panels built on SSD16xx and UC81xx controllers
//! through `embedded-hal` 1.0 traits. Frames are drawn into a small buffer
//! that holds a band of rows at a time and streamed to the controller page
//! by page, so a 640x384 panel renders from a few kilobytes of RAM.
//!
//! ## Layers
//!
//! - [`Interface`] wraps the SPI device and the DC, RST and BUSY pins.
//! - [`Display`] sequences the controller: init, waveforms, RAM windows,
//!   refresh and power. Panel differences come from a static [`Profile`].
//! - [`PagedDisplay`] owns the frame buffer, maps logical coordinates and
//!   runs the `begin_frame` / `advance_page` loop.
//!
//! ## Example
//!
//! ```ignore
//! use epd_pager::{Builder, Color, Display, Interface, PagedDisplay, Panel, Rotation};
//!
//! let config = Builder::new()
//!     .panel(Panel::Gdew042z15)
//!     .rotation(Rotation::Rotate90)
//!     .build()?;
//! let display = Display::new(Interface::new(spi, dc, rst, busy), config);
//! let mut paged = PagedDisplay::new(display, [0u8; 5000], Some([0u8; 5000]))?;
//! paged.init(&mut delay)?;
//!
//! paged.begin_frame(&mut delay)?;
//! loop {
//!     paged.fill(Color::White);
//!     paged.set_pixel(10, 10, Color::Accent);
//!     if !paged.advance_page(&mut delay)? {
//!         break;
//!     }
//! }
//!
//! // Faster update of one area
//! paged.set_partial_window(0, 0, 64, 32);
//! paged.render(&mut delay, |page| page.fill(Color::Black))?;
//! paged.power_off(&mut delay)?;
//! ```
//!
//! ## Features
//!
//! - `graphics` (default): `DrawTarget` implementation for embedded-graphics

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(test)]
extern crate alloc;

/// Externally supplied bitmaps
pub mod bitmap;
/// Bit-packed frame buffer
pub mod buffer;
/// Pixel colors
pub mod color;
/// Controller command bytes
pub mod command;
/// Display configuration
pub mod config;
/// Controller protocol driver
pub mod display;
/// Error types
pub mod error;
/// Coordinate transforms
pub mod geometry;
/// embedded-graphics support
#[cfg(feature = "graphics")]
#[cfg_attr(docsrs, doc(cfg(feature = "graphics")))]
pub mod graphics;
/// Hardware interface
pub mod interface;
/// Waveform tables
pub mod lut;
/// Paged rendering
pub mod pager;
/// Panel profiles
pub mod profile;
/// Update window
pub mod window;

pub use bitmap::{Bitmap, BitmapSource, Image};
pub use buffer::FrameBuffer;
pub use color::Color;
pub use config::{Builder, Config, DEFAULT_BUFFER_SIZE, Dimensions, Rotation};
pub use display::{Display, RefreshMode};
pub use error::{BuilderError, Error};
pub use interface::{BusyLevel, BusyWait, DisplayInterface, Interface, InterfaceError, ResetPulse};
pub use pager::PagedDisplay;
pub use profile::{Panel, Profile};
pub use window::{UpdateWindow, Window};
