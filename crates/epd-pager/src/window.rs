//! Update window
//!
//! A pass either addresses the whole panel or a partial window. Partial
//! windows are stored in physical coordinates, clipped to the panel, with
//! x rounded down to a byte boundary and the width grown to keep the right
//! edge in place. A window with no area is valid: passes using it run the
//! controller init and send nothing.

use core::ops::Range;

/// A clipped rectangle in physical coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Window {
    /// Left edge (multiple of 8)
    pub x: u16,
    /// Top edge
    pub y: u16,
    /// Width in pixels
    pub w: u16,
    /// Height in pixels
    pub h: u16,
}

impl Window {
    /// Clip a physical rectangle to a `width` x `height` panel
    pub fn clip(x: i32, y: i32, w: i32, h: i32, width: u16, height: u16) -> Self {
        let (width, height) = (i32::from(width), i32::from(height));
        let x0 = x.clamp(0, width);
        let y0 = y.clamp(0, height);
        let w0 = w.clamp(0, width - x0);
        let h0 = h.clamp(0, height - y0);

        let xa = x0 & !7;
        let wa = if w0 == 0 { 0 } else { w0 + (x0 - xa) };

        Self {
            x: xa as u16,
            y: y0 as u16,
            w: wa as u16,
            h: h0 as u16,
        }
    }

    /// Window covering a whole `width` x `height` panel
    pub fn full(width: u16, height: u16) -> Self {
        Self {
            x: 0,
            y: 0,
            w: width,
            h: height,
        }
    }

    /// Whether the window covers no pixels
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Frame buffer byte columns touched by the window
    pub fn byte_columns(&self) -> Range<usize> {
        if self.w == 0 {
            return 0..0;
        }
        let first = self.x as usize / 8;
        let last = ((self.x as usize + self.w as usize - 1) | 7) / 8;
        first..last + 1
    }

    /// Frame rows covered by the window, as stored in the buffer
    ///
    /// Panels filled bottom-up store row `y` at `height - 1 - y`.
    pub fn rows(&self, height: u16, reverse_y: bool) -> Range<u16> {
        if reverse_y {
            height - self.y - self.h..height - self.y
        } else {
            self.y..self.y + self.h
        }
    }
}

/// Area addressed by the next render pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UpdateWindow {
    /// Whole panel, full refresh
    #[default]
    Full,
    /// Clipped partial window, partial refresh
    Partial(Window),
}

impl UpdateWindow {
    /// Whether the pass uses partial refresh
    pub fn is_partial(&self) -> bool {
        matches!(self, UpdateWindow::Partial(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_overhanging_window() {
        let window = Window::clip(-5, 0, 400 + 100, 10, 400, 300);
        assert_eq!(
            window,
            Window {
                x: 0,
                y: 0,
                w: 400,
                h: 10
            }
        );
    }

    #[test]
    fn test_clip_aligns_x_and_keeps_right_edge() {
        let window = Window::clip(13, 20, 30, 40, 200, 200);
        assert_eq!(window.x, 8);
        assert_eq!(window.w, 35);
        assert_eq!(window.x + window.w, 13 + 30);
    }

    #[test]
    fn test_clip_outside_panel_is_empty() {
        assert!(Window::clip(500, 0, 10, 10, 400, 300).is_empty());
        assert!(Window::clip(0, 300, 10, 10, 400, 300).is_empty());
        assert!(Window::clip(10, 10, 0, 10, 400, 300).is_empty());
        assert!(Window::clip(10, 10, -4, 10, 400, 300).is_empty());
    }

    #[test]
    fn test_clip_stays_inside_panel() {
        for (x, y, w, h) in [(390, 290, 50, 50), (0, 0, 1000, 1000), (7, 7, 1, 1)] {
            let window = Window::clip(x, y, w, h, 400, 300);
            assert!(window.x + window.w <= 400);
            assert!(window.y + window.h <= 300);
            assert_eq!(window.x % 8, 0);
        }
    }

    #[test]
    fn test_byte_columns() {
        let window = Window {
            x: 8,
            y: 0,
            w: 17,
            h: 1,
        };
        assert_eq!(window.byte_columns(), 1..4);
        assert_eq!(Window::full(400, 300).byte_columns(), 0..50);
        assert_eq!(Window::default().byte_columns(), 0..0);
    }

    #[test]
    fn test_rows_reverse_y() {
        let window = Window {
            x: 0,
            y: 10,
            w: 8,
            h: 20,
        };
        assert_eq!(window.rows(250, false), 10..30);
        assert_eq!(window.rows(250, true), 220..240);
    }
}
