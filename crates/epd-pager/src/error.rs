//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and display operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Runtime errors during display operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level hardware communication errors
//!
//! Bad coordinates, partial windows on a panel without partial addressing,
//! page calls outside a pass and busy timeouts are not errors. They are
//! absorbed and reported through the `log` facade.
//!
//! ## Example
//!
//! ```
//! use epd_pager::{Builder, BuilderError, Panel};
//!
//! // Missing panel
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingPanel)));
//!
//! // GDEW0154Z04 needs caller supplied waveforms
//! let result = Builder::new().panel(Panel::Gdew0154z04).build();
//! assert!(matches!(result, Err(BuilderError::MissingWaveforms { .. })));
//! ```

use crate::interface::DisplayInterface;
use crate::profile::Panel;

/// Errors that can occur when interacting with the display
///
/// Generic over the interface type to preserve the specific error type.
/// This allows error handling code to match on the underlying hardware error.
#[derive(Debug)]
pub enum Error<I: DisplayInterface> {
    /// Interface error (SPI/GPIO)
    ///
    /// Wraps the underlying hardware error from the [`DisplayInterface`] implementation.
    Interface(I::Error),
    /// Plane storage cannot hold a single row of the panel
    BufferTooSmall {
        /// Minimum plane size in bytes (one row)
        required: usize,
        /// Provided plane size in bytes
        provided: usize,
    },
    /// The panel has an accent plane but no accent storage was given
    MissingAccentBuffer,
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Interface(e) => write!(f, "Interface error: {e:?}"),
            Error::BufferTooSmall { required, provided } => {
                write!(
                    f,
                    "Buffer too small: required {required} bytes, provided {provided}"
                )
            }
            Error::MissingAccentBuffer => write!(f, "Accent plane storage required"),
        }
    }
}

impl<I: DisplayInterface + core::fmt::Debug> core::error::Error for Error<I> {}

/// Errors that can occur when building configuration
///
/// These errors occur during the builder pattern before the display is created.
#[derive(Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// Panel was not specified
    ///
    /// [`Builder::panel()`](crate::config::Builder::panel) must be called before building.
    MissingPanel,
    /// The panel's waveform tables are not built in and none were supplied
    ///
    /// See [`Builder::waveforms()`](crate::config::Builder::waveforms).
    MissingWaveforms {
        /// Panel that needs the tables
        panel: Panel,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BuilderError::MissingPanel => write!(f, "Panel must be specified"),
            BuilderError::MissingWaveforms { panel } => {
                write!(f, "Panel {panel:?} needs caller supplied waveforms")
            }
        }
    }
}

impl core::error::Error for BuilderError {}
