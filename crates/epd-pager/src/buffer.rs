//! Bit-packed frame buffer
//!
//! One plane per color, one bit per pixel, rows of `width / 8` bytes,
//! most significant bit leftmost. A set bit means ink on that plane. The
//! storage is supplied by the caller and may be smaller than a full frame;
//! it then holds one page (a band of whole rows) at a time.

use crate::color::Color;

/// Frame buffer plane
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Plane {
    /// Black ink
    Black,
    /// Accent ink
    Accent,
}

/// One or two bit planes over caller-supplied storage
#[derive(Debug)]
pub struct FrameBuffer<B> {
    black: B,
    accent: Option<B>,
    capacity: usize,
}

impl<B> FrameBuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Wrap plane storage, using as many whole rows as fit in every plane
    ///
    /// Returns `None` if a plane cannot hold a single row.
    pub fn new(black: B, accent: Option<B>, bytes_per_row: usize) -> Option<Self> {
        let len = match &accent {
            Some(accent) => black.as_ref().len().min(accent.as_ref().len()),
            None => black.as_ref().len(),
        };
        if bytes_per_row == 0 || len < bytes_per_row {
            return None;
        }
        Some(Self {
            black,
            accent,
            capacity: len / bytes_per_row * bytes_per_row,
        })
    }

    /// Usable bytes per plane (a whole number of rows)
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether an accent plane is present
    pub fn has_accent(&self) -> bool {
        self.accent.is_some()
    }

    /// Fill every plane with the pattern for `color`
    pub fn fill(&mut self, color: Color) {
        let (black, accent) = color.fill_pattern();
        let capacity = self.capacity;
        self.black.as_mut()[..capacity].fill(black);
        if let Some(plane) = self.accent.as_mut() {
            plane.as_mut()[..capacity].fill(accent);
        }
    }

    /// Reset to blank (white)
    pub fn clear(&mut self) {
        self.fill(Color::White);
    }

    /// Set the pixel at byte `index`, bit `mask`
    ///
    /// Both planes are cleared first, so black replaces accent. Accent on a
    /// single-plane buffer leaves the pixel white. Out of range indices are
    /// ignored.
    pub fn set(&mut self, index: usize, mask: u8, color: Color) {
        if index >= self.capacity {
            return;
        }
        let black = &mut self.black.as_mut()[index];
        *black &= !mask;
        if color == Color::Black {
            *black |= mask;
        }
        if let Some(plane) = self.accent.as_mut() {
            let accent = &mut plane.as_mut()[index];
            *accent &= !mask;
            if color == Color::Accent {
                *accent |= mask;
            }
        }
    }

    /// Ink byte at `index` of `plane`
    ///
    /// Indices past the capacity, and a missing accent plane, read as blank.
    pub fn byte(&self, plane: Plane, index: usize) -> u8 {
        if index >= self.capacity {
            return 0x00;
        }
        match plane {
            Plane::Black => self.black.as_ref()[index],
            Plane::Accent => self
                .accent
                .as_ref()
                .map_or(0x00, |accent| accent.as_ref()[index]),
        }
    }

    /// Give back the plane storage
    pub fn release(self) -> (B, Option<B>) {
        (self.black, self.accent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn two_plane(len: usize, bytes_per_row: usize) -> FrameBuffer<Vec<u8>> {
        FrameBuffer::new(vec![0u8; len], Some(vec![0u8; len]), bytes_per_row).unwrap()
    }

    #[test]
    fn test_capacity_rounds_to_rows() {
        let buffer = FrameBuffer::new(vec![0u8; 5010], None, 50).unwrap();
        assert_eq!(buffer.capacity(), 5000);
    }

    #[test]
    fn test_capacity_uses_smaller_plane() {
        let buffer = FrameBuffer::new(vec![0u8; 100], Some(vec![0u8; 60]), 25).unwrap();
        assert_eq!(buffer.capacity(), 50);
    }

    #[test]
    fn test_too_small_for_one_row() {
        assert!(FrameBuffer::new(vec![0u8; 10], None, 50).is_none());
    }

    #[test]
    fn test_fill_patterns() {
        let mut buffer = two_plane(8, 4);
        buffer.fill(Color::Black);
        assert_eq!(buffer.byte(Plane::Black, 0), 0xFF);
        assert_eq!(buffer.byte(Plane::Accent, 7), 0x00);
        buffer.fill(Color::Accent);
        assert_eq!(buffer.byte(Plane::Black, 3), 0x00);
        assert_eq!(buffer.byte(Plane::Accent, 3), 0xFF);
        buffer.clear();
        assert_eq!(buffer.byte(Plane::Accent, 3), 0x00);
    }

    #[test]
    fn test_black_wins_over_accent() {
        let mut buffer = two_plane(4, 4);
        buffer.set(1, 0x80, Color::Accent);
        assert_eq!(buffer.byte(Plane::Accent, 1), 0x80);
        buffer.set(1, 0x80, Color::Black);
        assert_eq!(buffer.byte(Plane::Black, 1), 0x80);
        assert_eq!(buffer.byte(Plane::Accent, 1), 0x00);
        buffer.set(1, 0x80, Color::White);
        assert_eq!(buffer.byte(Plane::Black, 1), 0x00);
    }

    #[test]
    fn test_accent_on_single_plane_is_white() {
        let mut buffer = FrameBuffer::new(vec![0xFFu8; 4], None, 4).unwrap();
        buffer.set(0, 0x01, Color::Accent);
        assert_eq!(buffer.byte(Plane::Black, 0), 0xFE);
        assert_eq!(buffer.byte(Plane::Accent, 0), 0x00);
    }

    #[test]
    fn test_reads_past_capacity_are_blank() {
        let mut buffer = two_plane(4, 4);
        buffer.fill(Color::Black);
        assert_eq!(buffer.byte(Plane::Black, 4), 0x00);
        buffer.set(4, 0x80, Color::Black);
    }
}
