//! Display configuration types and builder

pub use crate::error::BuilderError;
use crate::lut::Waveform;
use crate::profile::{Panel, Profile, Waveforms};

/// Plane size used when the caller has no better number (bytes per plane)
///
/// A 400x300 panel (50 bytes per row) fits 100 rows, so a frame takes
/// three pages.
pub const DEFAULT_BUFFER_SIZE: usize = 5000;

/// Display dimensions in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Width in pixels (source outputs)
    pub width: u16,
    /// Height in pixels (gate outputs)
    pub height: u16,
}

impl Dimensions {
    /// Bytes per row of one plane
    ///
    /// Any `width % 8` trailing pixels are discarded.
    pub fn bytes_per_row(&self) -> usize {
        self.width as usize / 8
    }

    /// Bytes needed to hold a whole frame in one plane
    pub fn buffer_size(&self) -> usize {
        self.bytes_per_row() * self.height as usize
    }
}

/// Display rotation relative to native orientation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate 90 degrees clockwise
    Rotate90,
    /// Rotate 180 degrees
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

impl Rotation {
    /// Rotation from a count of quarter turns (taken modulo 4)
    pub fn from_quarter_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => Rotation::Rotate0,
            1 => Rotation::Rotate90,
            2 => Rotation::Rotate180,
            _ => Rotation::Rotate270,
        }
    }

    /// Number of quarter turns (0-3)
    pub fn quarter_turns(self) -> u8 {
        match self {
            Rotation::Rotate0 => 0,
            Rotation::Rotate90 => 1,
            Rotation::Rotate180 => 2,
            Rotation::Rotate270 => 3,
        }
    }

    /// Whether logical x/y are swapped against the panel
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Rotate90 | Rotation::Rotate270)
    }
}

/// Display configuration
///
/// Use [`Builder`] to create a Config.
#[derive(Clone, Debug)]
pub struct Config {
    /// Panel profile
    pub profile: &'static Profile,
    /// Display rotation
    pub rotation: Rotation,
    /// Mirror the logical x axis before rotating
    pub mirror: bool,
    /// Busy wait ceiling in milliseconds
    pub busy_timeout_ms: u32,
    /// Waveform writes for full refresh (empty: controller OTP)
    pub full_waveforms: &'static [Waveform],
    /// Waveform writes for partial refresh (empty: controller OTP)
    pub partial_waveforms: &'static [Waveform],
}

impl Config {
    /// Native panel dimensions
    pub fn dimensions(&self) -> Dimensions {
        self.profile.dimensions()
    }

    /// Get the rotated dimensions based on rotation setting
    pub fn rotated_dimensions(&self) -> Dimensions {
        let native = self.dimensions();
        if self.rotation.swaps_axes() {
            Dimensions {
                width: native.height,
                height: native.width,
            }
        } else {
            native
        }
    }
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```
/// use epd_pager::{Builder, Panel, Rotation};
///
/// let config = Builder::new()
///     .panel(Panel::Gdew042t2)
///     .rotation(Rotation::Rotate90)
///     .build()
///     .expect("valid configuration");
/// assert_eq!(config.rotated_dimensions().width, 300);
/// ```
#[derive(Default)]
pub struct Builder {
    /// Panel (required)
    panel: Option<Panel>,
    /// Display rotation
    rotation: Rotation,
    /// Mirror the logical x axis
    mirror: bool,
    /// Busy timeout override
    busy_timeout_ms: Option<u32>,
    /// Caller supplied waveforms (full, partial)
    waveforms: Option<(&'static [Waveform], &'static [Waveform])>,
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the panel (required)
    pub fn panel(mut self, panel: Panel) -> Self {
        self.panel = Some(panel);
        self
    }

    /// Set display rotation
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Mirror the logical x axis
    pub fn mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Override the panel's busy wait ceiling
    pub fn busy_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.busy_timeout_ms = Some(timeout_ms);
        self
    }

    /// Supply waveform tables for full and partial refresh
    ///
    /// Required for panels whose tables are not built in (GDEW0154Z04,
    /// GDEW027C44); replaces the built-in tables on other panels.
    pub fn waveforms(mut self, full: &'static [Waveform], partial: &'static [Waveform]) -> Self {
        self.waveforms = Some((full, partial));
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingPanel` if no panel was set, and
    /// `BuilderError::MissingWaveforms` if the panel needs caller supplied
    /// waveforms and none were given.
    pub fn build(self) -> Result<Config, BuilderError> {
        let panel = self.panel.ok_or(BuilderError::MissingPanel)?;
        let profile = panel.profile();

        let (full_waveforms, partial_waveforms) = match (self.waveforms, profile.waveforms) {
            (Some(tables), _) => tables,
            (None, Waveforms::Builtin { full, partial }) => (full, partial),
            (None, Waveforms::Otp) => (&[][..], &[][..]),
            (None, Waveforms::External) => return Err(BuilderError::MissingWaveforms { panel }),
        };

        Ok(Config {
            profile,
            rotation: self.rotation,
            mirror: self.mirror,
            busy_timeout_ms: self.busy_timeout_ms.unwrap_or(profile.busy_timeout_ms),
            full_waveforms,
            partial_waveforms,
        })
    }
}
