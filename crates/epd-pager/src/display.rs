//! Controller protocol driver
//!
//! [`Display`] owns the hardware interface and sequences everything a panel
//! controller needs: init registers, waveform upload, RAM addressing, data
//! encoding, refresh and power. Everything that differs between panels is
//! read from the [`Profile`] in the configuration.
//!
//! Paged rendering from a frame buffer goes through
//! [`PagedDisplay`](crate::pager::PagedDisplay). The bulk operations here
//! write controller RAM directly from a fill value or an external bitmap.
//! Their byte values use the controller convention: a set bit is white.

use embedded_hal::delay::DelayNs;

use crate::bitmap::{BitmapSource, Image};
use crate::buffer::Plane;
use crate::command::{ssd16xx, uc81xx};
use crate::config::Config;
use crate::error::Error;
use crate::interface::{DisplayInterface, ResetPulse};
use crate::lut::LutTransfer;
use crate::profile::{Controller, Encoding, Op, PowerOff, Profile, WindowEncoding};
use crate::window::{UpdateWindow, Window};

/// Bytes collected before one data burst
const STREAM_CHUNK: usize = 32;

/// Expands four 1-bit pixels into four 2-bit grey levels
#[rustfmt::skip]
const GREY: [u8; 16] = [
    0x00, 0x03, 0x0C, 0x0F, 0x30, 0x33, 0x3C, 0x3F,
    0xC0, 0xC3, 0xCC, 0xCF, 0xF0, 0xF3, 0xFC, 0xFF,
];

/// Waveform set and update sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshMode {
    /// Whole panel with the full waveform
    Full,
    /// Partial waveform, keeps power on afterwards
    Partial,
}

/// Phase of a render pass
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Black plane (or the only plane)
    First,
    /// Accent plane, second RAM bank, or the repeated initial frame
    Second,
}

/// What follows the last page of a phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PhaseEnd {
    /// Stream every page again for the second phase
    Continue,
    /// Refresh issued, pass complete
    Done,
}

/// Core display driver
///
/// Holds the interface, the configuration and the controller power state.
/// For drawing use [`PagedDisplay`](crate::pager::PagedDisplay).
pub struct Display<I>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    /// Display configuration
    config: Config,
    /// Whether the controller's analog supply is up
    power_is_on: bool,
    /// No full pass has completed since the last reset
    initial: bool,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Create a new Display instance
    pub fn new(interface: I, config: Config) -> Self {
        Self {
            interface,
            config,
            power_is_on: false,
            initial: true,
        }
    }

    /// Pulse the reset line and forget the controller state
    pub fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<I>> {
        self.interface
            .reset(delay, ResetPulse::POWER_UP)
            .map_err(Error::Interface)?;
        self.power_is_on = false;
        self.initial = true;
        Ok(())
    }

    /// Turn off the controller's analog supply
    ///
    /// Panels whose profile skips power off stay powered and the call only
    /// logs.
    pub fn power_off<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<I>> {
        let profile = self.profile();
        if profile.power_off == PowerOff::Skip {
            log::warn!("[EPD] {:?} power off skipped", profile.panel);
            return Ok(());
        }
        match profile.controller {
            Controller::Ssd16xx { .. } => {
                self.command(
                    ssd16xx::DISPLAY_UPDATE_CONTROL_2,
                    &[ssd16xx::SEQUENCE_POWER_OFF],
                )?;
                self.send_command(ssd16xx::MASTER_ACTIVATION)?;
            }
            Controller::Uc81xx { .. } => self.send_command(uc81xx::POWER_OFF)?,
        }
        self.wait(delay, "power off")?;
        self.power_is_on = false;
        Ok(())
    }

    /// Write `black` and `accent` to every byte of controller RAM and refresh
    ///
    /// Single-plane panels ignore `accent`.
    pub fn clear_screen<D: DelayNs>(
        &mut self,
        delay: &mut D,
        black: u8,
        accent: u8,
    ) -> Result<(), Error<I>> {
        self.fill_screen_ram(delay, black, accent, true)
    }

    /// Write `black` and `accent` to every byte of controller RAM
    ///
    /// Nothing is shown until the next refresh.
    pub fn write_screen_buffer<D: DelayNs>(
        &mut self,
        delay: &mut D,
        black: u8,
        accent: u8,
    ) -> Result<(), Error<I>> {
        self.fill_screen_ram(delay, black, accent, false)
    }

    /// Copy a bitmap into controller RAM without refreshing
    ///
    /// The target rectangle is clipped to the panel; a rectangle entirely
    /// outside it is ignored. A missing accent plane writes white.
    pub fn write_image<D: DelayNs>(
        &mut self,
        delay: &mut D,
        image: &Image<'_>,
    ) -> Result<(), Error<I>> {
        let profile = self.profile();
        let Some(placement) = Placement::new(image, profile) else {
            return Ok(());
        };
        let region = placement.window();

        match (profile.controller, profile.encoding) {
            (Controller::Uc81xx { black_data, .. }, Encoding::Grey)
            | (
                Controller::Uc81xx {
                    black_data,
                    window: None,
                    ..
                },
                _,
            ) => {
                // No partial addressing: the whole frame is rewritten
                self.init_controller(delay, RefreshMode::Full)?;
                self.send_command(black_data)?;
                self.write_screen_plane(&placement, Plane::Black)?;
                if let Controller::Uc81xx {
                    accent_data: Some(accent_data),
                    ..
                } = profile.controller
                {
                    self.send_command(accent_data)?;
                    self.write_screen_plane(&placement, Plane::Accent)?;
                }
            }
            (
                Controller::Uc81xx {
                    window: Some(WindowEncoding::Sized { black, accent }),
                    ..
                },
                _,
            ) => {
                self.init_controller(delay, RefreshMode::Partial)?;
                self.set_sized_window(black, region)?;
                self.write_region(&placement, Plane::Black)?;
                if profile.sends_accent_phase() {
                    self.set_sized_window(accent, region)?;
                    self.write_region(&placement, Plane::Accent)?;
                }
            }
            (
                Controller::Uc81xx {
                    black_data,
                    accent_data,
                    window: Some(encoding),
                },
                _,
            ) => {
                self.init_controller(delay, RefreshMode::Partial)?;
                self.send_command(uc81xx::PARTIAL_IN)?;
                self.set_partial_ram_area(region, encoding)?;
                self.send_command(black_data)?;
                self.write_region(&placement, Plane::Black)?;
                if let Some(accent_data) = accent_data {
                    self.send_command(accent_data)?;
                    self.write_region(&placement, Plane::Accent)?;
                }
                self.send_command(uc81xx::PARTIAL_OUT)?;
            }
            (Controller::Ssd16xx { entry_mode }, _) => {
                self.init_controller(delay, RefreshMode::Partial)?;
                self.set_ram_entry_window(region, entry_mode)?;
                self.write_region(&placement, Plane::Black)?;
            }
        }
        Ok(())
    }

    /// [`write_image`](Self::write_image) followed by a refresh of the same area
    pub fn draw_image<D: DelayNs>(
        &mut self,
        delay: &mut D,
        image: &Image<'_>,
    ) -> Result<(), Error<I>> {
        self.write_image(delay, image)?;
        self.refresh_area(delay, image.x, image.y, image.w, image.h)
    }

    /// Show what controller RAM holds
    ///
    /// A partial refresh covers the whole panel with the partial waveform.
    pub fn refresh<D: DelayNs>(&mut self, delay: &mut D, partial: bool) -> Result<(), Error<I>> {
        if partial {
            let profile = self.profile();
            self.refresh_area(
                delay,
                0,
                0,
                i32::from(profile.width),
                i32::from(profile.height),
            )
        } else {
            self.update(delay, RefreshMode::Full)
        }
    }

    /// Refresh a physical rectangle, clipped like [`write_image`](Self::write_image)
    ///
    /// Panels without partial addressing refresh the whole panel.
    pub fn refresh_area<D: DelayNs>(
        &mut self,
        delay: &mut D,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
    ) -> Result<(), Error<I>> {
        let profile = self.profile();
        let Some(region) = clip_region(x, y, w, h, profile).map(|(region, _, _)| region) else {
            return Ok(());
        };

        match profile.controller {
            Controller::Ssd16xx { .. } => self.update(delay, RefreshMode::Partial),
            Controller::Uc81xx { window: None, .. } => self.update(delay, RefreshMode::Full),
            Controller::Uc81xx { .. } if profile.encoding == Encoding::Grey => {
                self.update(delay, RefreshMode::Full)
            }
            Controller::Uc81xx {
                window: Some(WindowEncoding::Sized { .. }),
                ..
            } => {
                self.refresh_window(region)?;
                self.wait(delay, "refresh")
            }
            Controller::Uc81xx {
                window: Some(encoding),
                ..
            } => {
                self.init_controller(delay, RefreshMode::Partial)?;
                self.set_partial_ram_area(region, encoding)?;
                self.update(delay, RefreshMode::Partial)
            }
        }
    }

    /// Whether the controller's analog supply is up
    pub fn is_power_on(&self) -> bool {
        self.power_is_on
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Profile of the configured panel
    pub fn profile(&self) -> &'static Profile {
        self.config.profile
    }

    /// Access the hardware interface
    pub fn interface(&self) -> &I {
        &self.interface
    }

    /// Access the hardware interface mutably
    pub fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Give back the hardware interface
    pub fn release(self) -> I {
        self.interface
    }

    /// Open controller RAM for the first phase of a pass
    ///
    /// Issues exactly one controller init. An empty partial window stops
    /// after the init.
    pub(crate) fn begin_pass<D: DelayNs>(
        &mut self,
        delay: &mut D,
        window: UpdateWindow,
    ) -> Result<(), Error<I>> {
        let profile = self.profile();
        let window = match window {
            UpdateWindow::Full => {
                self.init_controller(delay, RefreshMode::Full)?;
                return match profile.controller {
                    Controller::Ssd16xx { .. } => self.send_command(ssd16xx::WRITE_RAM),
                    Controller::Uc81xx { black_data, .. } => self.send_command(black_data),
                };
            }
            UpdateWindow::Partial(window) => window,
        };

        self.init_controller(delay, RefreshMode::Partial)?;
        if window.is_empty() {
            return Ok(());
        }
        match profile.controller {
            Controller::Ssd16xx { entry_mode } => self.set_ram_entry_window(window, entry_mode),
            Controller::Uc81xx {
                window: Some(WindowEncoding::Sized { black, .. }),
                ..
            } => self.set_sized_window(black, window),
            Controller::Uc81xx {
                black_data,
                window: Some(encoding),
                ..
            } => {
                self.send_command(uc81xx::PARTIAL_IN)?;
                self.set_partial_ram_area(window, encoding)?;
                self.send_command(black_data)
            }
            Controller::Uc81xx { window: None, .. } => Ok(()),
        }
    }

    /// Close a phase after its last page has been streamed
    pub(crate) fn end_phase<D: DelayNs>(
        &mut self,
        delay: &mut D,
        window: UpdateWindow,
        phase: Phase,
    ) -> Result<PhaseEnd, Error<I>> {
        if phase == Phase::First && self.start_second_phase(delay, window)? {
            return Ok(PhaseEnd::Continue);
        }
        self.finish_pass(delay, window)?;
        Ok(PhaseEnd::Done)
    }

    /// Plane streamed during `phase`
    pub(crate) fn phase_plane(&self, phase: Phase) -> Plane {
        match phase {
            Phase::Second if self.profile().sends_accent_phase() => Plane::Accent,
            _ => Plane::Black,
        }
    }

    /// Start a chunked data transfer
    pub(crate) fn stream(&mut self) -> DataStream<'_, I> {
        DataStream::new(&mut self.interface)
    }

    /// Issue the commands that open the second phase, if the pass has one
    fn start_second_phase<D: DelayNs>(
        &mut self,
        delay: &mut D,
        window: UpdateWindow,
    ) -> Result<bool, Error<I>> {
        let profile = self.profile();
        match (profile.controller, window) {
            (Controller::Ssd16xx { .. }, UpdateWindow::Full) => {
                // The controller keeps two RAM banks; later partial updates
                // diff against the second one
                self.update(delay, RefreshMode::Full)?;
                delay.delay_ms(profile.full_settle_ms);
                self.init_controller(delay, RefreshMode::Partial)?;
                self.send_command(ssd16xx::WRITE_RAM)?;
                Ok(true)
            }
            (Controller::Ssd16xx { entry_mode }, UpdateWindow::Partial(window)) => {
                self.update(delay, RefreshMode::Partial)?;
                delay.delay_ms(profile.partial_settle_ms);
                self.set_ram_entry_window(window, entry_mode)?;
                Ok(true)
            }
            (
                Controller::Uc81xx {
                    accent_data: Some(accent_data),
                    window: encoding,
                    ..
                },
                _,
            ) => {
                match (window, encoding) {
                    (UpdateWindow::Partial(window), Some(WindowEncoding::Sized { accent, .. })) => {
                        self.set_sized_window(accent, window)?;
                    }
                    _ => self.send_command(accent_data)?,
                }
                Ok(true)
            }
            (Controller::Uc81xx { black_data, .. }, UpdateWindow::Full)
                if profile.repeat_initial_full && self.initial =>
            {
                self.update(delay, RefreshMode::Full)?;
                delay.delay_ms(profile.full_settle_ms);
                self.initial = false;
                self.send_command(black_data)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Refresh and power handling after the final phase
    fn finish_pass<D: DelayNs>(
        &mut self,
        delay: &mut D,
        window: UpdateWindow,
    ) -> Result<(), Error<I>> {
        let profile = self.profile();
        match (profile.controller, window) {
            (Controller::Ssd16xx { .. }, UpdateWindow::Full) => self.power_off(delay),
            (Controller::Ssd16xx { .. }, UpdateWindow::Partial(_)) => {
                delay.delay_ms(profile.partial_settle_ms);
                Ok(())
            }
            (Controller::Uc81xx { .. }, UpdateWindow::Full) => {
                self.update(delay, RefreshMode::Full)?;
                delay.delay_ms(profile.full_settle_ms);
                self.power_off(delay)
            }
            (
                Controller::Uc81xx {
                    window: Some(WindowEncoding::Sized { .. }),
                    ..
                },
                UpdateWindow::Partial(window),
            ) => {
                self.refresh_window(window)?;
                self.wait(delay, "refresh window")?;
                delay.delay_ms(profile.partial_settle_ms);
                Ok(())
            }
            (
                Controller::Uc81xx {
                    window: Some(encoding),
                    ..
                },
                UpdateWindow::Partial(_),
            ) => {
                if profile.partial_refresh_full_window {
                    self.set_partial_ram_area(Window::full(profile.width, profile.height), encoding)?;
                }
                self.update(delay, RefreshMode::Partial)?;
                self.send_command(uc81xx::PARTIAL_OUT)?;
                delay.delay_ms(profile.partial_settle_ms);
                Ok(())
            }
            (Controller::Uc81xx { window: None, .. }, UpdateWindow::Partial(_)) => Ok(()),
        }
    }

    /// Panel registers, RAM window, waveforms, then power on
    fn init_controller<D: DelayNs>(
        &mut self,
        delay: &mut D,
        mode: RefreshMode,
    ) -> Result<(), Error<I>> {
        let profile = self.profile();

        if profile.wake_reset && !self.power_is_on {
            self.interface
                .reset(delay, ResetPulse::WAKE)
                .map_err(Error::Interface)?;
        }

        for op in profile.init {
            match *op {
                Op::Command(command, data) => self.command(command, data)?,
                Op::WaitBusy(label) => self.wait(delay, label)?,
            }
        }

        if let Controller::Ssd16xx { entry_mode } = profile.controller {
            self.set_ram_entry_window(Window::full(profile.width, profile.height), entry_mode)?;
        }

        let waveforms = match mode {
            RefreshMode::Full => self.config.full_waveforms,
            RefreshMode::Partial => self.config.partial_waveforms,
        };
        for waveform in waveforms {
            self.send_command(waveform.register)?;
            match profile.lut_transfer {
                LutTransfer::Burst => self.send_data(waveform.data)?,
                LutTransfer::PerByte => {
                    for byte in waveform.data {
                        self.send_data(core::slice::from_ref(byte))?;
                    }
                }
            }
        }

        self.power_on(delay)
    }

    fn power_on<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<I>> {
        if !self.power_is_on {
            match self.profile().controller {
                Controller::Ssd16xx { .. } => {
                    self.command(
                        ssd16xx::DISPLAY_UPDATE_CONTROL_2,
                        &[ssd16xx::SEQUENCE_POWER_ON],
                    )?;
                    self.send_command(ssd16xx::MASTER_ACTIVATION)?;
                }
                Controller::Uc81xx { .. } => self.send_command(uc81xx::POWER_ON)?,
            }
            self.wait(delay, "power on")?;
        }
        self.power_is_on = true;
        Ok(())
    }

    /// Trigger a refresh and wait for it
    fn update<D: DelayNs>(&mut self, delay: &mut D, mode: RefreshMode) -> Result<(), Error<I>> {
        let label = match mode {
            RefreshMode::Full => "full update",
            RefreshMode::Partial => "partial update",
        };
        match self.profile().controller {
            Controller::Ssd16xx { .. } => {
                let sequence = match mode {
                    RefreshMode::Full => ssd16xx::SEQUENCE_FULL_UPDATE,
                    RefreshMode::Partial => ssd16xx::SEQUENCE_PARTIAL_UPDATE,
                };
                self.command(ssd16xx::DISPLAY_UPDATE_CONTROL_2, &[sequence])?;
                self.send_command(ssd16xx::MASTER_ACTIVATION)?;
                self.wait(delay, label)?;
                self.send_command(ssd16xx::NOP)
            }
            Controller::Uc81xx { .. } => {
                self.send_command(uc81xx::DISPLAY_REFRESH)?;
                self.wait(delay, label)
            }
        }
    }

    /// Entry mode, RAM area and pointer, then open RAM for writing
    fn set_ram_entry_window(&mut self, window: Window, entry_mode: u8) -> Result<(), Error<I>> {
        let entry_mode = entry_mode.min(0x03);
        self.command(ssd16xx::DATA_ENTRY_MODE, &[entry_mode])?;

        let (x, y) = (window.x, window.y);
        let xe = x + window.w.saturating_sub(1);
        let ye = y + window.h.saturating_sub(1);
        // Start corner depends on the counting direction of each axis
        let (xs, xe, ys, ye) = match entry_mode {
            0x00 => (xe, x, ye, y),
            0x01 => (x, xe, ye, y),
            0x02 => (xe, x, y, ye),
            _ => (x, xe, y, ye),
        };

        self.command(ssd16xx::SET_RAM_X_RANGE, &[(xs / 8) as u8, (xe / 8) as u8])?;
        self.command(
            ssd16xx::SET_RAM_Y_RANGE,
            &[
                (ys % 256) as u8,
                (ys / 256) as u8,
                (ye % 256) as u8,
                (ye / 256) as u8,
            ],
        )?;
        self.command(ssd16xx::SET_RAM_X_COUNTER, &[(xs / 8) as u8])?;
        self.command(
            ssd16xx::SET_RAM_Y_COUNTER,
            &[(ys % 256) as u8, (ys / 256) as u8],
        )?;
        self.send_command(ssd16xx::WRITE_RAM)
    }

    /// Partial window register (0x90), or the black data window on sized panels
    fn set_partial_ram_area(
        &mut self,
        window: Window,
        encoding: WindowEncoding,
    ) -> Result<(), Error<I>> {
        let x = window.x & 0xFFF8;
        let xe = (window.x + window.w).saturating_sub(1) | 0x0007;
        let y = window.y;
        let ye = (window.y + window.h).saturating_sub(1);

        match encoding {
            WindowEncoding::Wide { flag } => self.command(
                uc81xx::PARTIAL_WINDOW,
                &[
                    (x / 256) as u8,
                    (x % 256) as u8,
                    (xe / 256) as u8,
                    (xe % 256) as u8,
                    (y / 256) as u8,
                    (y % 256) as u8,
                    (ye / 256) as u8,
                    (ye % 256) as u8,
                    flag,
                ],
            ),
            WindowEncoding::Narrow => self.command(
                uc81xx::PARTIAL_WINDOW,
                &[
                    (x % 256) as u8,
                    (xe % 256) as u8,
                    (y / 256) as u8,
                    (y % 256) as u8,
                    (ye / 256) as u8,
                    (ye % 256) as u8,
                    0x01,
                ],
            ),
            WindowEncoding::Sized { black, .. } => self.set_sized_window(black, window),
        }
    }

    /// Origin and byte-rounded size under `command`
    fn set_sized_window(&mut self, command: u8, window: Window) -> Result<(), Error<I>> {
        let (x, y, h) = (window.x, window.y, window.h);
        let w = (window.w + 7 + x % 8) & 0xFFF8;
        self.command(
            command,
            &[
                (x >> 8) as u8,
                (x & 0xF8) as u8,
                (y >> 8) as u8,
                (y & 0xFF) as u8,
                (w >> 8) as u8,
                (w & 0xF8) as u8,
                (h >> 8) as u8,
                (h & 0xFF) as u8,
            ],
        )
    }

    /// Refresh a window on sized panels
    ///
    /// The controller mis-refreshes windows taller than 256 rows.
    fn refresh_window(&mut self, window: Window) -> Result<(), Error<I>> {
        let window = Window {
            h: window.h.min(256),
            ..window
        };
        self.set_sized_window(uc81xx::PARTIAL_REFRESH, window)
    }

    fn fill_screen_ram<D: DelayNs>(
        &mut self,
        delay: &mut D,
        black: u8,
        accent: u8,
        refresh: bool,
    ) -> Result<(), Error<I>> {
        let profile = self.profile();
        let full = Window::full(profile.width, profile.height);
        let count = profile.dimensions().buffer_size();
        let encoding = profile.encoding;
        // Single-plane panels have no accent ink
        let accent = if profile.has_color() { accent } else { 0xFF };

        match (profile.controller, encoding) {
            (
                Controller::Uc81xx {
                    black_data,
                    accent_data,
                    ..
                },
                Encoding::Grey,
            )
            | (
                Controller::Uc81xx {
                    black_data,
                    accent_data,
                    window: None,
                },
                _,
            ) => {
                self.init_controller(delay, RefreshMode::Full)?;
                self.send_command(black_data)?;
                self.fill_plane(count, Plane::Black, black)?;
                if let Some(accent_data) = accent_data {
                    self.send_command(accent_data)?;
                    self.fill_plane(count, Plane::Accent, accent)?;
                }
                if refresh {
                    self.update(delay, RefreshMode::Full)?;
                }
            }
            (
                Controller::Uc81xx {
                    window:
                        Some(WindowEncoding::Sized {
                            black: black_window,
                            accent: accent_window,
                        }),
                    ..
                },
                _,
            ) => {
                self.init_controller(delay, RefreshMode::Partial)?;
                self.set_sized_window(black_window, full)?;
                self.fill_plane(count, Plane::Black, black)?;
                if profile.sends_accent_phase() {
                    self.set_sized_window(accent_window, full)?;
                    self.fill_plane(count, Plane::Accent, accent)?;
                }
                if refresh {
                    self.refresh_window(full)?;
                    self.wait(delay, "clear screen")?;
                }
            }
            (
                Controller::Uc81xx {
                    black_data,
                    accent_data,
                    window: Some(window_encoding),
                },
                _,
            ) => {
                self.init_controller(delay, RefreshMode::Partial)?;
                self.send_command(uc81xx::PARTIAL_IN)?;
                self.set_partial_ram_area(full, window_encoding)?;
                self.send_command(black_data)?;
                if encoding == Encoding::Nibble {
                    let mut stream = self.stream();
                    for _ in 0..count {
                        stream.push_pair(black, accent)?;
                    }
                    stream.finish()?;
                } else {
                    self.fill_plane(count, Plane::Black, black)?;
                    if let Some(accent_data) = accent_data {
                        self.send_command(accent_data)?;
                        self.fill_plane(count, Plane::Accent, accent)?;
                    }
                }
                if refresh {
                    self.update(delay, RefreshMode::Partial)?;
                }
                self.send_command(uc81xx::PARTIAL_OUT)?;
            }
            (Controller::Ssd16xx { entry_mode }, _) => {
                self.init_controller(delay, RefreshMode::Partial)?;
                self.set_ram_entry_window(full, entry_mode)?;
                self.fill_plane(count, Plane::Black, black)?;
                if refresh {
                    self.update(delay, RefreshMode::Partial)?;
                }
            }
        }
        Ok(())
    }

    /// Send `count` copies of `value` encoded for `plane`
    fn fill_plane(&mut self, count: usize, plane: Plane, value: u8) -> Result<(), Error<I>> {
        let encoding = self.profile().encoding;
        let mut stream = self.stream();
        for _ in 0..count {
            stream.push_plane(encoding, plane, value)?;
        }
        stream.finish()
    }

    /// Send the clipped image rows of one plane
    fn write_region(&mut self, placement: &Placement<'_>, plane: Plane) -> Result<(), Error<I>> {
        let encoding = self.profile().encoding;
        let mut stream = self.stream();
        for row in 0..placement.h1 {
            for column in 0..placement.w1 / 8 {
                if encoding == Encoding::Nibble {
                    let black = placement.byte(Plane::Black, row, column);
                    let accent = placement.byte(Plane::Accent, row, column);
                    stream.push_pair(black, accent)?;
                } else {
                    stream.push_plane(encoding, plane, placement.byte(plane, row, column))?;
                }
            }
        }
        stream.finish()
    }

    /// Send one plane for the whole panel with the image placed inside
    fn write_screen_plane(&mut self, placement: &Placement<'_>, plane: Plane) -> Result<(), Error<I>> {
        let profile = self.profile();
        let (width, height) = (i32::from(profile.width), i32::from(profile.height));
        let encoding = profile.encoding;
        let mut stream = self.stream();
        for row in 0..height {
            for x in (0..width).step_by(8) {
                let byte = if placement.contains(x, row) {
                    placement.byte(plane, row - placement.y1, (x - placement.x1) / 8)
                } else {
                    0xFF
                };
                stream.push_plane(encoding, plane, byte)?;
            }
        }
        stream.finish()
    }

    fn wait<D: DelayNs>(&mut self, delay: &mut D, label: &str) -> Result<(), Error<I>> {
        let wait = self
            .interface
            .busy_wait(
                delay,
                self.config.profile.busy_level,
                self.config.busy_timeout_ms,
            )
            .map_err(Error::Interface)?;
        if wait.is_timeout() {
            log::warn!("[EPD] {label} : busy timeout after {} ms", wait.elapsed_ms());
        } else {
            log::debug!("[EPD] {label} : {} ms", wait.elapsed_ms());
        }
        Ok(())
    }

    /// Command byte followed by its data, if any
    fn command(&mut self, command: u8, data: &[u8]) -> Result<(), Error<I>> {
        self.send_command(command)?;
        if data.is_empty() {
            return Ok(());
        }
        self.send_data(data)
    }

    /// Send a command to the display controller
    fn send_command(&mut self, cmd: u8) -> Result<(), Error<I>> {
        self.interface.send_command(cmd).map_err(Error::Interface)
    }

    /// Send data to the display controller
    fn send_data(&mut self, data: &[u8]) -> Result<(), Error<I>> {
        self.interface.send_data(data).map_err(Error::Interface)
    }
}

/// Clip a physical rectangle the way bulk writes do
///
/// `x` is rounded towards zero to a byte boundary. Returns the visible
/// region and the offset of its origin inside the rectangle.
fn clip_region(x: i32, y: i32, w: i32, h: i32, profile: &Profile) -> Option<(Window, i32, i32)> {
    // Widened so edges far outside the panel cannot overflow
    let (width, height) = (i64::from(profile.width), i64::from(profile.height));
    let (x, y, w, h) = (i64::from(x), i64::from(y), i64::from(w), i64::from(h));
    let x = x - x % 8;
    let x1 = x.max(0);
    let y1 = y.max(0);
    let w1 = if x + w < width { w } else { width - x };
    let h1 = if y + h < height { h } else { height - y };
    let (dx, dy) = (x1 - x, y1 - y);
    let (w1, h1) = (w1 - dx, h1 - dy);
    if w1 <= 0 || h1 <= 0 {
        return None;
    }
    let region = Window {
        x: x1 as u16,
        y: y1 as u16,
        w: w1 as u16,
        h: h1 as u16,
    };
    Some((region, i32::try_from(dx).ok()?, i32::try_from(dy).ok()?))
}

/// An image clipped to the panel
struct Placement<'a> {
    black: &'a dyn BitmapSource,
    accent: Option<&'a dyn BitmapSource>,
    x1: i32,
    y1: i32,
    w1: i32,
    h1: i32,
    dx: i32,
    dy: i32,
    /// Source rows per plane and bytes per source row
    h: i32,
    stride: i32,
    invert: bool,
    mirror_y: bool,
}

impl<'a> Placement<'a> {
    fn new(image: &Image<'a>, profile: &Profile) -> Option<Self> {
        let (region, dx, dy) = clip_region(image.x, image.y, image.w, image.h, profile)?;
        Some(Self {
            black: image.black,
            accent: image.accent,
            x1: i32::from(region.x),
            y1: i32::from(region.y),
            w1: i32::from(region.w),
            h1: i32::from(region.h),
            dx,
            dy,
            h: image.h,
            stride: image.w / 8,
            invert: image.invert,
            // Bottom-up RAM takes the last source row first
            mirror_y: image.mirror_y != profile.reverse_y,
        })
    }

    fn window(&self) -> Window {
        Window {
            x: self.x1 as u16,
            y: self.y1 as u16,
            w: self.w1 as u16,
            h: self.h1 as u16,
        }
    }

    /// Whether panel pixel (`x`, `y`) lies inside the clipped region
    fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x1 && x < self.x1 + self.w1 && y >= self.y1 && y < self.y1 + self.h1
    }

    /// Source byte for region row `row`, byte column `column`
    ///
    /// Missing planes and reads past the end give white.
    fn byte(&self, plane: Plane, row: i32, column: i32) -> u8 {
        let source = match plane {
            Plane::Black => Some(self.black),
            Plane::Accent => self.accent,
        };
        let Some(source) = source else {
            return 0xFF;
        };
        let source_row = if self.mirror_y {
            self.h - 1 - (row + self.dy)
        } else {
            row + self.dy
        };
        let index = i64::from(column + self.dx / 8) + i64::from(source_row) * i64::from(self.stride);
        let Ok(index) = usize::try_from(index) else {
            return 0xFF;
        };
        match source.read(index) {
            Some(byte) if self.invert => !byte,
            Some(byte) => byte,
            None => 0xFF,
        }
    }
}

/// Chunked frame data transfer
///
/// Bytes are collected and sent in bursts of [`STREAM_CHUNK`]. Call
/// [`finish`](Self::finish) to send the tail.
pub(crate) struct DataStream<'a, I: DisplayInterface> {
    interface: &'a mut I,
    chunk: [u8; STREAM_CHUNK],
    len: usize,
}

impl<'a, I: DisplayInterface> DataStream<'a, I> {
    fn new(interface: &'a mut I) -> Self {
        Self {
            interface,
            chunk: [0; STREAM_CHUNK],
            len: 0,
        }
    }

    pub(crate) fn push(&mut self, byte: u8) -> Result<(), Error<I>> {
        self.chunk[self.len] = byte;
        self.len += 1;
        if self.len == STREAM_CHUNK {
            self.flush()?;
        }
        Ok(())
    }

    /// Push one plane byte (bit set = white) in the panel's wire encoding
    pub(crate) fn push_plane(&mut self, encoding: Encoding, plane: Plane, white: u8) -> Result<(), Error<I>> {
        match (encoding, plane) {
            (Encoding::Complement, _) => self.push(!white),
            (Encoding::Grey, Plane::Black) => {
                self.push(GREY[usize::from(white >> 4)])?;
                self.push(GREY[usize::from(white & 0x0F)])
            }
            _ => self.push(white),
        }
    }

    /// Merge eight pixels of both planes into four nibble-pair bytes
    ///
    /// Black ink is 0x0, accent ink 0x4, white 0x3; black wins.
    pub(crate) fn push_pair(&mut self, black_white: u8, accent_white: u8) -> Result<(), Error<I>> {
        let (mut black, mut accent) = (!black_white, !accent_white);
        for _ in 0..4 {
            let mut byte = 0u8;
            for _ in 0..2 {
                let nibble = if black & 0x80 != 0 {
                    0x00
                } else if accent & 0x80 != 0 {
                    0x04
                } else {
                    0x03
                };
                byte = (byte << 4) | nibble;
                black <<= 1;
                accent <<= 1;
            }
            self.push(byte)?;
        }
        Ok(())
    }

    pub(crate) fn finish(mut self) -> Result<(), Error<I>> {
        self.flush()
    }

    fn flush(&mut self) -> Result<(), Error<I>> {
        if self.len > 0 {
            self.interface
                .send_data(&self.chunk[..self.len])
                .map_err(Error::Interface)?;
            self.len = 0;
        }
        Ok(())
    }
}
