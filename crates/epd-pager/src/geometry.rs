//! Logical to physical coordinate transforms
//!
//! Drawing happens in logical coordinates: the panel as the user sees it
//! after rotation and optional mirroring. The frame buffer and controller
//! RAM use physical coordinates, the panel's native orientation.
//!
//! Mirroring flips the logical x axis, then rotation is applied in quarter
//! turns. Panels whose RAM is filled bottom-up additionally flip y for
//! single pixels; rectangles handle that at page time instead.

use crate::config::{Dimensions, Rotation};

/// Rotation and mirroring for one panel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transform {
    width: u16,
    height: u16,
    rotation: Rotation,
    mirror: bool,
    reverse_y: bool,
}

impl Transform {
    /// Create a transform for a panel of native size `dimensions`
    pub fn new(dimensions: Dimensions, rotation: Rotation, mirror: bool, reverse_y: bool) -> Self {
        Self {
            width: dimensions.width,
            height: dimensions.height,
            rotation,
            mirror,
            reverse_y,
        }
    }

    /// Current rotation
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Change the rotation
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Whether the logical x axis is mirrored
    pub fn mirror(&self) -> bool {
        self.mirror
    }

    /// Set mirroring, returning the previous setting
    pub fn set_mirror(&mut self, mirror: bool) -> bool {
        core::mem::replace(&mut self.mirror, mirror)
    }

    /// Logical (rotated) width
    pub fn width(&self) -> u16 {
        if self.rotation.swaps_axes() {
            self.height
        } else {
            self.width
        }
    }

    /// Logical (rotated) height
    pub fn height(&self) -> u16 {
        if self.rotation.swaps_axes() {
            self.width
        } else {
            self.height
        }
    }

    /// Map a logical pixel to its physical position
    ///
    /// Returns `None` for pixels outside the logical area.
    pub fn point(&self, x: i32, y: i32) -> Option<(u16, u16)> {
        let (lw, lh) = (i32::from(self.width()), i32::from(self.height()));
        if x < 0 || x >= lw || y < 0 || y >= lh {
            return None;
        }
        let (w, h) = (i32::from(self.width), i32::from(self.height));
        let x = if self.mirror { lw - x - 1 } else { x };

        let (px, mut py) = match self.rotation {
            Rotation::Rotate0 => (x, y),
            Rotation::Rotate90 => (w - y - 1, x),
            Rotation::Rotate180 => (w - x - 1, h - y - 1),
            Rotation::Rotate270 => (y, h - x - 1),
        };
        if self.reverse_y {
            py = h - py - 1;
        }
        Some((px as u16, py as u16))
    }

    /// Map a logical rectangle to a physical one
    ///
    /// Origin and size are transformed together so the result stays axis
    /// aligned. No clipping is done; origins past the `i32` range are
    /// clamped to it.
    pub fn rect(&self, x: i32, y: i32, w: i32, h: i32) -> (i32, i32, i32, i32) {
        let (pw, ph) = (i32::from(self.width), i32::from(self.height));
        // Far edge measured back from `size`
        let flip = |size: i32, origin: i32, extent: i32| {
            let edge = i64::from(size) - i64::from(origin) - i64::from(extent);
            edge.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
        };
        let x = if self.mirror {
            flip(i32::from(self.width()), x, w)
        } else {
            x
        };

        match self.rotation {
            Rotation::Rotate0 => (x, y, w, h),
            Rotation::Rotate90 => (flip(pw, y, h), x, h, w),
            Rotation::Rotate180 => (flip(pw, x, w), flip(ph, y, h), w, h),
            Rotation::Rotate270 => (y, flip(ph, x, w), h, w),
        }
    }
}
