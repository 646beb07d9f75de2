//! Externally supplied bitmaps
//!
//! Bulk writes take their pixels from a [`BitmapSource`]. Bytes use the
//! controller convention (bit set = white), rows are `w / 8` bytes wide.
//!
//! Constant images on some targets live in an address space that ordinary
//! loads cannot reach; [`Bitmap::Program`] routes every read through an
//! accessor function for those.

/// Byte-addressed read access to a bitmap
pub trait BitmapSource {
    /// Number of readable bytes
    fn len(&self) -> usize;

    /// Byte at `index`, `None` past the end
    fn read(&self, index: usize) -> Option<u8>;

    /// Whether the source holds no bytes
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reads one byte of a bitmap held in program memory
pub type ProgramReader = fn(&[u8], usize) -> u8;

/// Bitmap in RAM or program memory
#[derive(Clone, Copy)]
pub enum Bitmap<'a> {
    /// Plain slice read
    Ram(&'a [u8]),
    /// Every byte fetched through `read`
    Program {
        /// Backing bytes
        data: &'a [u8],
        /// Accessor for the program address space
        read: ProgramReader,
    },
}

impl<'a> Bitmap<'a> {
    /// Wrap `data`, reading through the program memory accessor if `pgm`
    pub fn new(data: &'a [u8], pgm: bool) -> Self {
        if pgm {
            Bitmap::Program {
                data,
                read: read_program_byte,
            }
        } else {
            Bitmap::Ram(data)
        }
    }

    /// Bitmap in program memory with a platform accessor
    pub fn with_reader(data: &'a [u8], read: ProgramReader) -> Self {
        Bitmap::Program { data, read }
    }
}

impl core::fmt::Debug for Bitmap<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Bitmap::Ram(data) => f.debug_tuple("Ram").field(&data.len()).finish(),
            Bitmap::Program { data, .. } => f.debug_tuple("Program").field(&data.len()).finish(),
        }
    }
}

impl BitmapSource for Bitmap<'_> {
    fn len(&self) -> usize {
        match self {
            Bitmap::Ram(data) | Bitmap::Program { data, .. } => data.len(),
        }
    }

    fn read(&self, index: usize) -> Option<u8> {
        match *self {
            Bitmap::Ram(data) => data.get(index).copied(),
            Bitmap::Program { data, read } => (index < data.len()).then(|| read(data, index)),
        }
    }
}

impl BitmapSource for &[u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn read(&self, index: usize) -> Option<u8> {
        self.get(index).copied()
    }
}

impl<const N: usize> BitmapSource for [u8; N] {
    fn len(&self) -> usize {
        N
    }

    fn read(&self, index: usize) -> Option<u8> {
        self.get(index).copied()
    }
}

/// Default program memory accessor for targets where constants are
/// addressable like RAM
///
/// Callers only pass in-bounds indices.
fn read_program_byte(data: &[u8], index: usize) -> u8 {
    data[index]
}

/// A rectangle of bitmap data to place on the panel
///
/// Coordinates are physical. `x` is rounded down to a byte boundary and
/// `w` should be a multiple of 8.
#[derive(Clone, Copy)]
pub struct Image<'a> {
    /// Black plane, or the only plane
    pub black: &'a dyn BitmapSource,
    /// Accent plane (two-plane panels; white if absent)
    pub accent: Option<&'a dyn BitmapSource>,
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub w: i32,
    /// Height in pixels
    pub h: i32,
    /// Invert every byte before sending
    pub invert: bool,
    /// Read source rows bottom-up
    pub mirror_y: bool,
}

impl<'a> Image<'a> {
    /// Single-plane image at (`x`, `y`)
    pub fn new(black: &'a dyn BitmapSource, x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            black,
            accent: None,
            x,
            y,
            w,
            h,
            invert: false,
            mirror_y: false,
        }
    }

    /// Attach an accent plane
    pub fn with_accent(mut self, accent: &'a dyn BitmapSource) -> Self {
        self.accent = Some(accent);
        self
    }

    /// Invert every byte
    pub fn inverted(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Read rows bottom-up
    pub fn mirrored_y(mut self, mirror_y: bool) -> Self {
        self.mirror_y = mirror_y;
        self
    }
}

impl core::fmt::Debug for Image<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Image")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("w", &self.w)
            .field("h", &self.h)
            .field("accent", &self.accent.is_some())
            .field("invert", &self.invert)
            .field("mirror_y", &self.mirror_y)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doubled(data: &[u8], index: usize) -> u8 {
        data[index].wrapping_mul(2)
    }

    #[test]
    fn test_ram_bitmap_reads() {
        let bitmap = Bitmap::new(&[1, 2, 3], false);
        assert!(matches!(bitmap, Bitmap::Ram(_)));
        assert_eq!(bitmap.len(), 3);
        assert_eq!(bitmap.read(2), Some(3));
        assert_eq!(bitmap.read(3), None);
    }

    #[test]
    fn test_program_bitmap_reads_through_accessor() {
        let bitmap = Bitmap::new(&[0xAA, 0x55], true);
        assert!(matches!(bitmap, Bitmap::Program { .. }));
        assert_eq!(bitmap.read(1), Some(0x55));
        assert_eq!(bitmap.read(2), None);

        let custom = Bitmap::with_reader(&[3, 4], doubled);
        assert_eq!(custom.read(1), Some(8));
        assert_eq!(custom.read(5), None);
    }

    #[test]
    fn test_slice_and_array_sources() {
        let bytes = [9u8, 8];
        let slice: &[u8] = &bytes[..1];
        assert_eq!(BitmapSource::len(&slice), 1);
        assert_eq!(BitmapSource::read(&slice, 0), Some(9));
        assert_eq!(BitmapSource::read(&slice, 1), None);
        assert_eq!(BitmapSource::len(&bytes), 2);
        assert!(!BitmapSource::is_empty(&bytes));

        let image = Image::new(&slice, 0, 0, 8, 1).with_accent(&bytes);
        assert_eq!(image.black.read(0), Some(9));
        assert_eq!(image.accent.and_then(|accent| accent.read(1)), Some(8));
    }

    #[test]
    fn test_image_builder() {
        let black = Bitmap::new(&[0u8; 4], false);
        let accent = Bitmap::new(&[0xFFu8; 4], false);
        let image = Image::new(&black, 8, 2, 16, 2)
            .with_accent(&accent)
            .inverted(true)
            .mirrored_y(true);
        assert!(image.accent.is_some());
        assert!(image.invert && image.mirror_y);
        assert_eq!((image.x, image.y, image.w, image.h), (8, 2, 16, 2));
    }
}
