//! Paged rendering
//!
//! A frame rarely fits in RAM: 400x300 pixels take 15000 bytes per plane.
//! [`PagedDisplay`] keeps a buffer of a few whole rows and renders the frame
//! in vertical slices ("pages"). The caller draws the complete frame once
//! per page; pixels outside the resident page are dropped, and each page is
//! streamed to the controller before the buffer is reused for the next.
//!
//! ```text
//! begin_frame ──► draw ──► advance_page ──┬─ true ──► draw ──► advance_page ...
//!                                        └─ false: refresh issued, pass over
//! ```
//!
//! Two-plane panels and the SSD16xx RAM banks need a second phase: the pages
//! are streamed twice and `advance_page` keeps returning `true` until both
//! phases are done.
//!
//! ## Example
//!
//! ```ignore
//! use epd_pager::{Builder, Color, Display, Interface, PagedDisplay, Panel};
//!
//! let config = Builder::new().panel(Panel::Gdew042t2).build()?;
//! let display = Display::new(Interface::new(spi, dc, rst, busy), config);
//! let mut paged = PagedDisplay::new(display, [0u8; 5000], None)?;
//! paged.init(&mut delay)?;
//!
//! paged.render(&mut delay, |page| {
//!     page.fill(Color::White);
//!     for x in 0..100 {
//!         page.set_pixel(x, x, Color::Black);
//!     }
//! })?;
//! ```

use core::ops::Range;

use embedded_hal::delay::DelayNs;

use crate::bitmap::{BitmapSource, Image};
use crate::buffer::{FrameBuffer, Plane};
use crate::color::Color;
use crate::config::Rotation;
use crate::display::{Display, Phase, PhaseEnd};
use crate::error::Error;
use crate::geometry::Transform;
use crate::interface::DisplayInterface;
use crate::profile::Encoding;
use crate::window::{UpdateWindow, Window};

/// How a panel's rows are split into pages
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageLayout {
    height: u16,
    page_height: u16,
    pages: u16,
}

impl PageLayout {
    /// Layout for `height` rows of `bytes_per_row` bytes in `capacity` bytes
    pub fn new(height: u16, capacity: usize, bytes_per_row: usize) -> Self {
        let rows = capacity.checked_div(bytes_per_row).unwrap_or(0);
        let page_height = u16::try_from(rows).unwrap_or(u16::MAX).clamp(1, height.max(1));
        Self {
            height,
            page_height,
            pages: height.div_ceil(page_height),
        }
    }

    /// Rows per page (all pages but the last)
    pub fn page_height(&self) -> u16 {
        self.page_height
    }

    /// Number of pages per phase
    pub fn pages(&self) -> u16 {
        self.pages
    }

    /// Frame rows held by `page`; the last page may be shorter
    pub fn rows(&self, page: u16) -> Range<u16> {
        let start = page.saturating_mul(self.page_height).min(self.height);
        let end = start.saturating_add(self.page_height).min(self.height);
        start..end
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pass {
    Idle,
    Rendering { page: u16, phase: Phase },
}

/// Drawing surface with paged transmission
///
/// Owns the [`Display`] and the plane storage. Coordinates given to the
/// drawing methods are logical (rotation and mirroring applied); the bulk
/// operations take physical coordinates.
pub struct PagedDisplay<I, B>
where
    I: DisplayInterface,
{
    display: Display<I>,
    buffer: FrameBuffer<B>,
    layout: PageLayout,
    transform: Transform,
    window: UpdateWindow,
    pass: Pass,
}

impl<I, B> PagedDisplay<I, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Wrap a display and its plane storage
    ///
    /// Two-plane panels need `accent` storage; on single-plane panels it is
    /// dropped. The page height is the number of whole rows that fit in the
    /// smaller plane.
    ///
    /// # Errors
    ///
    /// [`Error::MissingAccentBuffer`] if the panel has an accent plane and
    /// `accent` is `None`, [`Error::BufferTooSmall`] if a plane cannot hold
    /// one row.
    pub fn new(display: Display<I>, black: B, accent: Option<B>) -> Result<Self, Error<I>> {
        let profile = display.profile();
        let accent = if profile.has_color() {
            Some(accent.ok_or(Error::MissingAccentBuffer)?)
        } else {
            None
        };

        let bytes_per_row = profile.bytes_per_row();
        let provided = accent
            .as_ref()
            .map_or(black.as_ref().len(), |accent| {
                black.as_ref().len().min(accent.as_ref().len())
            });
        let buffer = FrameBuffer::new(black, accent, bytes_per_row).ok_or(Error::BufferTooSmall {
            required: bytes_per_row,
            provided,
        })?;

        let config = display.config();
        let transform = Transform::new(
            profile.dimensions(),
            config.rotation,
            config.mirror,
            profile.reverse_y,
        );
        let layout = PageLayout::new(profile.height, buffer.capacity(), bytes_per_row);

        Ok(Self {
            display,
            buffer,
            layout,
            transform,
            window: UpdateWindow::Full,
            pass: Pass::Idle,
        })
    }

    /// Reset the controller and blank the buffer
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<I>> {
        self.display.reset(delay)?;
        self.buffer.clear();
        self.pass = Pass::Idle;

        let profile = self.display.profile();
        log::debug!(
            "[EPD] {:?} {}x{}, {} pages of {} rows",
            profile.panel,
            profile.width,
            profile.height,
            self.layout.pages(),
            self.layout.page_height()
        );
        Ok(())
    }

    /// Fill the resident page with `color`
    pub fn fill(&mut self, color: Color) {
        self.buffer.fill(color);
    }

    /// Set one logical pixel
    ///
    /// Pixels outside the panel, or outside the resident page during a
    /// pass, are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        let Some((px, py)) = self.transform.point(x, y) else {
            return;
        };
        let first = match self.pass {
            Pass::Rendering { page, .. } => self.layout.rows(page).start,
            Pass::Idle => 0,
        };
        let Some(row) = py.checked_sub(first) else {
            return;
        };
        if row >= self.layout.page_height() {
            return;
        }
        let index = usize::from(row) * self.display.profile().bytes_per_row() + usize::from(px / 8);
        self.buffer.set(index, 0x80 >> (px % 8), color);
    }

    /// Draw `color` wherever a row-padded `w` x `h` bitmap has a clear bit
    ///
    /// Bytes missing from `bitmap` draw nothing, nor do bitmap pixels that
    /// fall outside the logical area.
    pub fn draw_inverted_bitmap(
        &mut self,
        x: i32,
        y: i32,
        bitmap: &dyn BitmapSource,
        w: i32,
        h: i32,
        color: Color,
    ) {
        let stride = (i64::from(w) + 7) / 8;
        let columns = visible(x, w, self.width());
        for j in visible(y, h, self.height()) {
            let row = i64::from(j) * stride;
            let mut byte = 0xFF;
            for i in columns.clone() {
                if i % 8 == 0 || i == columns.start {
                    byte = usize::try_from(row + i64::from(i / 8))
                        .ok()
                        .and_then(|index| bitmap.read(index))
                        .unwrap_or(0xFF);
                }
                if byte & (0x80 >> (i % 8)) == 0 {
                    self.set_pixel(x + i, y + j, color);
                }
            }
        }
    }

    /// Address the whole panel in the next pass
    pub fn set_full_window(&mut self) {
        if self.in_pass() {
            log::warn!("[EPD] window change ignored during a pass");
            return;
        }
        self.window = UpdateWindow::Full;
    }

    /// Address a logical rectangle in the next pass
    ///
    /// The rectangle is transformed, clipped to the panel and widened to
    /// byte boundaries. An empty result is kept: the next pass then runs
    /// the controller init and sends no pixels.
    pub fn set_partial_window(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let profile = self.display.profile();
        if !profile.has_partial_update() {
            log::warn!("[EPD] {:?} has no partial update, window ignored", profile.panel);
            return;
        }
        if self.in_pass() {
            log::warn!("[EPD] window change ignored during a pass");
            return;
        }
        let (px, py, pw, ph) = self.transform.rect(x, y, w, h);
        self.window = UpdateWindow::Partial(Window::clip(
            px,
            py,
            pw,
            ph,
            profile.width,
            profile.height,
        ));
    }

    /// Active update window
    pub fn window(&self) -> UpdateWindow {
        self.window
    }

    /// Start a render pass on page 0
    ///
    /// Issues the controller init for the active window. The pass must be
    /// driven to completion with [`advance_page`](Self::advance_page).
    pub fn begin_frame<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<I>> {
        self.buffer.clear();
        self.display.begin_pass(delay, self.window)?;
        self.pass = Pass::Rendering {
            page: 0,
            phase: Phase::First,
        };
        Ok(())
    }

    /// Send the resident page and move to the next one
    ///
    /// Returns `true` while pages remain, `false` once the refresh has been
    /// issued. Outside a pass this does nothing and returns `false`.
    pub fn advance_page<D: DelayNs>(&mut self, delay: &mut D) -> Result<bool, Error<I>> {
        let Pass::Rendering { page, phase } = self.pass else {
            return Ok(false);
        };
        if matches!(self.window, UpdateWindow::Partial(window) if window.is_empty()) {
            self.pass = Pass::Idle;
            return Ok(false);
        }

        self.send_page(page, phase)?;

        if page + 1 < self.layout.pages() {
            self.buffer.clear();
            self.pass = Pass::Rendering {
                page: page + 1,
                phase,
            };
            return Ok(true);
        }

        match self.display.end_phase(delay, self.window, phase)? {
            PhaseEnd::Continue => {
                log::trace!("[EPD] second phase");
                self.buffer.clear();
                self.pass = Pass::Rendering {
                    page: 0,
                    phase: Phase::Second,
                };
                Ok(true)
            }
            PhaseEnd::Done => {
                self.pass = Pass::Idle;
                Ok(false)
            }
        }
    }

    /// Run a complete pass, calling `draw` once per page
    pub fn render<D, F>(&mut self, delay: &mut D, mut draw: F) -> Result<(), Error<I>>
    where
        D: DelayNs,
        F: FnMut(&mut Self),
    {
        self.begin_frame(delay)?;
        loop {
            draw(self);
            if !self.advance_page(delay)? {
                return Ok(());
            }
        }
    }

    /// Turn off the controller's analog supply
    pub fn power_off<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<I>> {
        self.display.power_off(delay)
    }

    /// See [`Display::clear_screen`]
    pub fn clear_screen<D: DelayNs>(&mut self, delay: &mut D, black: u8, accent: u8) -> Result<(), Error<I>> {
        self.display.clear_screen(delay, black, accent)
    }

    /// See [`Display::write_screen_buffer`]
    pub fn write_screen_buffer<D: DelayNs>(
        &mut self,
        delay: &mut D,
        black: u8,
        accent: u8,
    ) -> Result<(), Error<I>> {
        self.display.write_screen_buffer(delay, black, accent)
    }

    /// See [`Display::write_image`]
    pub fn write_image<D: DelayNs>(&mut self, delay: &mut D, image: &Image<'_>) -> Result<(), Error<I>> {
        self.display.write_image(delay, image)
    }

    /// See [`Display::draw_image`]
    pub fn draw_image<D: DelayNs>(&mut self, delay: &mut D, image: &Image<'_>) -> Result<(), Error<I>> {
        self.display.draw_image(delay, image)
    }

    /// See [`Display::refresh`]
    pub fn refresh<D: DelayNs>(&mut self, delay: &mut D, partial: bool) -> Result<(), Error<I>> {
        self.display.refresh(delay, partial)
    }

    /// See [`Display::refresh_area`]
    pub fn refresh_area<D: DelayNs>(
        &mut self,
        delay: &mut D,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
    ) -> Result<(), Error<I>> {
        self.display.refresh_area(delay, x, y, w, h)
    }

    /// Set mirroring of the logical x axis, returning the previous setting
    pub fn mirror(&mut self, mirror: bool) -> bool {
        self.transform.set_mirror(mirror)
    }

    /// Current rotation
    pub fn rotation(&self) -> Rotation {
        self.transform.rotation()
    }

    /// Change the rotation
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.transform.set_rotation(rotation);
    }

    /// Logical width
    pub fn width(&self) -> u16 {
        self.transform.width()
    }

    /// Logical height
    pub fn height(&self) -> u16 {
        self.transform.height()
    }

    /// Pages per phase
    pub fn page_count(&self) -> u16 {
        self.layout.pages()
    }

    /// Rows per page
    pub fn page_height(&self) -> u16 {
        self.layout.page_height()
    }

    /// Resident page, `None` outside a pass
    pub fn current_page(&self) -> Option<u16> {
        match self.pass {
            Pass::Rendering { page, .. } => Some(page),
            Pass::Idle => None,
        }
    }

    /// Whether the panel supports partial windows
    pub fn has_partial_update(&self) -> bool {
        self.display.profile().has_partial_update()
    }

    /// Whether the panel has an accent plane
    pub fn has_color(&self) -> bool {
        self.display.profile().has_color()
    }

    /// Access the frame buffer
    pub fn buffer(&self) -> &FrameBuffer<B> {
        &self.buffer
    }

    /// Access the underlying Display
    pub fn display(&self) -> &Display<I> {
        &self.display
    }

    /// Access the underlying Display mutably
    pub fn display_mut(&mut self) -> &mut Display<I> {
        &mut self.display
    }

    /// Give back the display and the plane storage
    pub fn release(self) -> (Display<I>, B, Option<B>) {
        let (black, accent) = self.buffer.release();
        (self.display, black, accent)
    }

    fn in_pass(&self) -> bool {
        matches!(self.pass, Pass::Rendering { .. })
    }

    /// Stream the resident rows that fall inside the window
    fn send_page(&mut self, page: u16, phase: Phase) -> Result<(), Error<I>> {
        let profile = self.display.profile();
        let plane = self.display.phase_plane(phase);
        let bytes_per_row = profile.bytes_per_row();
        let page_rows = self.layout.rows(page);

        let (rows, columns) = match self.window {
            UpdateWindow::Full => (page_rows.clone(), 0..bytes_per_row),
            UpdateWindow::Partial(window) => {
                let rows = window.rows(profile.height, profile.reverse_y);
                (
                    rows.start.max(page_rows.start)..rows.end.min(page_rows.end),
                    window.byte_columns(),
                )
            }
        };

        let buffer = &self.buffer;
        let mut stream = self.display.stream();
        for row in rows {
            let offset = usize::from(row - page_rows.start) * bytes_per_row;
            for column in columns.clone() {
                let index = offset + column;
                // Buffer holds ink, the controller takes bit set = white
                if profile.encoding == Encoding::Nibble {
                    stream.push_pair(
                        !buffer.byte(Plane::Black, index),
                        !buffer.byte(Plane::Accent, index),
                    )?;
                } else {
                    stream.push_plane(profile.encoding, plane, !buffer.byte(plane, index))?;
                }
            }
        }
        stream.finish()
    }
}

/// Offsets into `0..extent` that land on `0..limit` when added to `origin`
fn visible(origin: i32, extent: i32, limit: u16) -> Range<i32> {
    let start = origin.saturating_neg().max(0);
    let end = extent.min(i32::from(limit).saturating_sub(origin));
    start..end.max(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::Bitmap;
    use crate::command::{ssd16xx, uc81xx};
    use crate::config::{Builder, DEFAULT_BUFFER_SIZE};
    use crate::interface::mock::{MockDelay, MockInterface};
    use crate::lut::Waveform;
    use crate::profile::{Panel, Waveforms};
    use alloc::vec;
    use alloc::vec::Vec;

    static TEST_WAVEFORMS: [Waveform; 1] = [Waveform::new(0x20, &[0x01])];

    fn paged_with(panel: Panel, size: usize) -> PagedDisplay<MockInterface, Vec<u8>> {
        let builder = Builder::new().panel(panel);
        let builder = if panel.profile().waveforms == Waveforms::External {
            builder.waveforms(&TEST_WAVEFORMS, &TEST_WAVEFORMS)
        } else {
            builder
        };
        let display = Display::new(MockInterface::new(), builder.build().unwrap());
        let accent = panel.profile().has_color().then(|| vec![0u8; size]);
        let mut paged = PagedDisplay::new(display, vec![0u8; size], accent).unwrap();
        paged.init(&mut MockDelay::default()).unwrap();
        paged.display_mut().interface_mut().clear();
        paged
    }

    fn paged(panel: Panel) -> PagedDisplay<MockInterface, Vec<u8>> {
        paged_with(panel, DEFAULT_BUFFER_SIZE)
    }

    /// Number of `advance_page` calls until the pass reports done
    fn run_pass(paged: &mut PagedDisplay<MockInterface, Vec<u8>>, color: Color) -> usize {
        let mut delay = MockDelay::default();
        let mut calls = 0;
        paged.begin_frame(&mut delay).unwrap();
        loop {
            paged.fill(color);
            calls += 1;
            if !paged.advance_page(&mut delay).unwrap() {
                return calls;
            }
        }
    }

    fn mock(paged: &PagedDisplay<MockInterface, Vec<u8>>) -> &MockInterface {
        paged.display().interface()
    }

    #[test]
    fn test_page_layout_400x300() {
        let layout = PageLayout::new(300, 5000, 50);
        assert_eq!(layout.page_height(), 100);
        assert_eq!(layout.pages(), 3);
        assert_eq!(layout.rows(2), 200..300);
    }

    #[test]
    fn test_page_extents_sum_to_height() {
        for panel in Panel::ALL {
            let profile = panel.profile();
            let layout = PageLayout::new(profile.height, DEFAULT_BUFFER_SIZE, profile.bytes_per_row());
            let rows_per_page = (DEFAULT_BUFFER_SIZE / profile.bytes_per_row()).min(profile.height as usize);
            assert_eq!(
                layout.pages() as usize,
                (profile.height as usize).div_ceil(rows_per_page),
                "{panel:?}"
            );
            let total: usize = (0..layout.pages()).map(|page| layout.rows(page).len()).sum();
            assert_eq!(total, profile.height as usize, "{panel:?}");
        }
    }

    #[test]
    fn test_short_last_page() {
        let layout = PageLayout::new(384, 5000, 80);
        assert_eq!(layout.page_height(), 62);
        assert_eq!(layout.pages(), 7);
        assert_eq!(layout.rows(6), 372..384);
    }

    #[test]
    fn test_new_checks_storage() {
        let config = Builder::new().panel(Panel::Gdew042z15).build().unwrap();
        let display = Display::new(MockInterface::new(), config);
        let result = PagedDisplay::new(display, vec![0u8; 5000], None);
        assert!(matches!(result, Err(Error::MissingAccentBuffer)));

        let config = Builder::new().panel(Panel::Gdew042t2).build().unwrap();
        let display = Display::new(MockInterface::new(), config);
        let result = PagedDisplay::new(display, vec![0u8; 10], None);
        assert!(matches!(
            result,
            Err(Error::BufferTooSmall {
                required: 50,
                provided: 10
            })
        ));
    }

    #[test]
    fn test_full_and_partial_pass_power() {
        let mut paged = paged(Panel::Gdew042t2);
        assert_eq!(paged.page_count(), 3);

        // First full pass after init is sent twice
        assert_eq!(run_pass(&mut paged, Color::White), 6);
        assert_eq!(mock(&paged).count(uc81xx::DISPLAY_REFRESH), 2);

        paged.display_mut().interface_mut().clear();
        assert_eq!(run_pass(&mut paged, Color::White), 3);
        assert_eq!(paged.current_page(), None);
        assert_eq!(mock(&paged).count(uc81xx::DISPLAY_REFRESH), 1);
        assert!(!paged.display().is_power_on());

        paged.set_partial_window(0, 0, 400, 300);
        assert_eq!(run_pass(&mut paged, Color::White), 3);
        assert!(paged.display().is_power_on());
    }

    #[test]
    fn test_black_pass_streams_frame_once_per_plane() {
        let mut paged = paged(Panel::Gdew042z15);
        assert_eq!(run_pass(&mut paged, Color::Black), 6);

        let black = mock(&paged).data_after(uc81xx::DATA_START_1).unwrap();
        assert_eq!(black.len(), 400 * 300 / 8);
        assert!(black.iter().all(|&b| b == 0x00));
        let accent = mock(&paged).data_after(uc81xx::DATA_START_2).unwrap();
        assert_eq!(accent.len(), 400 * 300 / 8);
        assert!(accent.iter().all(|&b| b == 0xFF));
        assert_eq!(mock(&paged).count(uc81xx::DISPLAY_REFRESH), 1);
    }

    #[test]
    fn test_nibble_pass_streams_pairs() {
        let mut paged = paged(Panel::Gdew075z09);
        assert_eq!(paged.page_count(), 7);
        assert_eq!(run_pass(&mut paged, Color::Accent), 7);

        let frame = mock(&paged).data_after(uc81xx::DATA_START_1).unwrap();
        assert_eq!(frame.len(), 640 * 384 / 2);
        assert!(frame.iter().all(|&b| b == 0x44));
    }

    #[test]
    fn test_ssd_pass_sends_both_banks() {
        let mut paged = paged(Panel::Gdep015oc1);
        assert_eq!(paged.page_count(), 1);
        assert_eq!(run_pass(&mut paged, Color::White), 2);
        assert_eq!(
            mock(&paged).data_after_nth(ssd16xx::DISPLAY_UPDATE_CONTROL_2, 1),
            Some(&[ssd16xx::SEQUENCE_FULL_UPDATE][..])
        );
        assert!(!paged.display().is_power_on());
    }

    #[test]
    fn test_out_of_range_set_pixel_is_ignored() {
        let mut paged = paged(Panel::Gdew042t2);
        let before: Vec<u8> = (0..5000).map(|i| paged.buffer().byte(Plane::Black, i)).collect();
        for (x, y) in [(-1, 0), (0, -1), (400, 0), (0, 300), (i32::MAX, i32::MIN)] {
            paged.set_pixel(x, y, Color::Black);
        }
        let after: Vec<u8> = (0..5000).map(|i| paged.buffer().byte(Plane::Black, i)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_set_pixel_filters_by_page() {
        let mut paged = paged(Panel::Gdew042t2);
        let mut delay = MockDelay::default();
        paged.begin_frame(&mut delay).unwrap();

        paged.set_pixel(9, 150, Color::Black);
        assert_eq!(paged.buffer().byte(Plane::Black, 50 * 50 + 1), 0x00);

        assert!(paged.advance_page(&mut delay).unwrap());
        assert_eq!(paged.current_page(), Some(1));
        paged.set_pixel(9, 150, Color::Black);
        assert_eq!(paged.buffer().byte(Plane::Black, 50 * 50 + 1), 0x40);
    }

    #[test]
    fn test_advance_without_frame_is_noop() {
        let mut paged = paged(Panel::Gdew042t2);
        assert!(!paged.advance_page(&mut MockDelay::default()).unwrap());
        assert!(mock(&paged).sent.is_empty());
    }

    #[test]
    fn test_zero_area_window_only_inits() {
        let mut paged = paged(Panel::Gdew042t2);
        paged.set_partial_window(10, 10, 0, 5);
        assert_eq!(run_pass(&mut paged, Color::Black), 1);
        assert_eq!(mock(&paged).count(uc81xx::POWER_ON), 1);
        assert_eq!(mock(&paged).count(uc81xx::DATA_START_2), 0);
        assert_eq!(mock(&paged).count(uc81xx::DISPLAY_REFRESH), 0);
    }

    #[test]
    fn test_partial_pass_streams_window_rows() {
        let mut paged = paged(Panel::Gdew042t2);
        paged.set_partial_window(8, 150, 16, 20);
        assert_eq!(run_pass(&mut paged, Color::Black), 3);

        let mock = mock(&paged);
        assert_eq!(mock.count(uc81xx::PARTIAL_IN), 1);
        let data = mock.data_after(uc81xx::DATA_START_2).unwrap();
        assert_eq!(data, &[0x00; 2 * 20][..]);
        assert_eq!(mock.commands().last(), Some(&uc81xx::PARTIAL_OUT));
    }

    #[test]
    fn test_window_round_trip() {
        let mut paged = paged(Panel::Gdew042t2);
        paged.set_full_window();
        paged.set_partial_window(0, 0, 400, 300);
        assert_eq!(paged.window(), UpdateWindow::Partial(Window::full(400, 300)));
        paged.set_full_window();
        assert_eq!(paged.window(), UpdateWindow::Full);

        run_pass(&mut paged, Color::White);
        assert_eq!(mock(&paged).count(uc81xx::PARTIAL_IN), 0);
        assert_eq!(mock(&paged).count(uc81xx::PARTIAL_WINDOW), 0);
    }

    #[test]
    fn test_clip_overhanging_window() {
        let mut paged = paged(Panel::Gdew042t2);
        paged.set_partial_window(-5, 0, 400 + 100, 10);
        assert_eq!(
            paged.window(),
            UpdateWindow::Partial(Window {
                x: 0,
                y: 0,
                w: 400,
                h: 10
            })
        );
    }

    #[test]
    fn test_partial_window_rejected_without_partial_update() {
        let mut paged = paged(Panel::Gdew0154z04);
        assert!(!paged.has_partial_update());
        paged.set_partial_window(0, 0, 16, 16);
        assert_eq!(paged.window(), UpdateWindow::Full);
    }

    #[test]
    fn test_window_change_during_pass_ignored() {
        let mut paged = paged(Panel::Gdew042t2);
        paged.begin_frame(&mut MockDelay::default()).unwrap();
        paged.set_partial_window(0, 0, 16, 16);
        assert_eq!(paged.window(), UpdateWindow::Full);
    }

    #[test]
    fn test_rotated_partial_window() {
        let mut paged = paged(Panel::Gdew042t2);
        paged.set_rotation(Rotation::Rotate90);
        assert_eq!((paged.width(), paged.height()), (300, 400));
        paged.set_partial_window(0, 0, 300, 8);
        assert_eq!(
            paged.window(),
            UpdateWindow::Partial(Window {
                x: 392,
                y: 0,
                w: 8,
                h: 300
            })
        );
    }

    #[test]
    fn test_mirror_returns_previous() {
        let mut paged = paged(Panel::Gdew042t2);
        assert!(!paged.mirror(true));
        paged.set_pixel(0, 0, Color::Black);
        assert_eq!(paged.buffer().byte(Plane::Black, 49), 0x01);
        assert!(paged.mirror(false));
    }

    #[test]
    fn test_draw_inverted_bitmap() {
        let mut paged = paged(Panel::Gdew042t2);
        // 10 pixels wide, two bytes per row; clear bits draw
        let data = [0x7F, 0xBF, 0xFF, 0x7F];
        let bitmap = Bitmap::new(&data, false);
        paged.draw_inverted_bitmap(0, 0, &bitmap, 10, 2, Color::Black);
        assert_eq!(paged.buffer().byte(Plane::Black, 0), 0x80);
        assert_eq!(paged.buffer().byte(Plane::Black, 1), 0x40);
        assert_eq!(paged.buffer().byte(Plane::Black, 50), 0x00);
        assert_eq!(paged.buffer().byte(Plane::Black, 51), 0x80);
    }

    #[test]
    fn test_extreme_coordinates_are_ignored() {
        let mut paged = paged(Panel::Gdew042t2);
        paged.mirror(true);
        paged.set_partial_window(i32::MIN, 0, 10, 10);
        match paged.window() {
            UpdateWindow::Partial(window) => assert!(window.is_empty()),
            UpdateWindow::Full => panic!("partial window expected"),
        }
        paged.mirror(false);

        let data = [0x7Fu8];
        let bitmap = Bitmap::new(&data, false);
        paged.draw_inverted_bitmap(0, 0, &bitmap, i32::MAX, 0, Color::Black);
        paged.draw_inverted_bitmap(i32::MIN, i32::MIN, &bitmap, i32::MAX, i32::MAX, Color::Black);
        paged.draw_inverted_bitmap(i32::MAX, 0, &bitmap, i32::MAX, 1, Color::Black);
        assert!((0..5000).all(|i| paged.buffer().byte(Plane::Black, i) == 0));

        // Only the first byte exists; the rest of the row reads as unset
        paged.draw_inverted_bitmap(0, 0, &bitmap, i32::MAX, 1, Color::Black);
        assert_eq!(paged.buffer().byte(Plane::Black, 0), 0x80);
        assert!((1..5000).all(|i| paged.buffer().byte(Plane::Black, i) == 0));
    }

    #[test]
    fn test_inverted_bitmap_clipped_at_left_edge() {
        let mut paged = paged(Panel::Gdew042t2);
        // Second pixel of each byte is clear
        let data = [0xBFu8, 0xBF];
        let bitmap = Bitmap::new(&data, false);
        paged.draw_inverted_bitmap(-1, 0, &bitmap, 16, 1, Color::Black);
        assert_eq!(paged.buffer().byte(Plane::Black, 0), 0x80);
        assert_eq!(paged.buffer().byte(Plane::Black, 1), 0x80);
    }

    #[test]
    fn test_ssd_partial_pass_on_bottom_up_panel() {
        let mut paged = paged_with(Panel::Gde0213b1, 16 * 100);
        assert_eq!(paged.page_count(), 3);
        paged.set_partial_window(0, 0, 16, 10);

        let mut delay = MockDelay::default();
        let mut calls = 0;
        paged.begin_frame(&mut delay).unwrap();
        loop {
            paged.fill(Color::White);
            paged.set_pixel(0, 0, Color::Black);
            calls += 1;
            if !paged.advance_page(&mut delay).unwrap() {
                break;
            }
        }
        assert_eq!(calls, 6);

        let mock = mock(&paged);
        // Power on, then one partial refresh between the phases
        assert_eq!(mock.count(ssd16xx::DISPLAY_UPDATE_CONTROL_2), 2);
        assert_eq!(
            mock.data_after_nth(ssd16xx::DISPLAY_UPDATE_CONTROL_2, 0),
            Some(&[ssd16xx::SEQUENCE_POWER_ON][..])
        );
        assert_eq!(
            mock.data_after_nth(ssd16xx::DISPLAY_UPDATE_CONTROL_2, 1),
            Some(&[ssd16xx::SEQUENCE_PARTIAL_UPDATE][..])
        );

        // The window is addressed again for the second phase, y counting down
        for nth in 1..3 {
            assert_eq!(mock.data_after_nth(ssd16xx::SET_RAM_X_RANGE, nth), Some(&[0, 1][..]));
            assert_eq!(
                mock.data_after_nth(ssd16xx::SET_RAM_Y_RANGE, nth),
                Some(&[9, 0, 0, 0][..])
            );
            let data = mock.data_after_nth(ssd16xx::WRITE_RAM, nth).unwrap();
            assert_eq!(data.len(), 20);
            // Logical row 0 is stored last
            assert_eq!(data[18], 0x7F);
            assert!(data[..18].iter().all(|&b| b == 0xFF));
            assert_eq!(data[19], 0xFF);
        }
        assert_eq!(mock.count(ssd16xx::WRITE_RAM), 3);

        assert!(paged.display().is_power_on());
        assert_eq!(delay.total_ms(), 400);
    }

    #[test]
    fn test_sized_window_pass_mono() {
        let mut paged = paged(Panel::Gdew027w3);
        assert_eq!(paged.page_count(), 2);
        paged.set_partial_window(8, 16, 16, 4);

        let mut delay = MockDelay::default();
        let mut calls = 0;
        paged.begin_frame(&mut delay).unwrap();
        loop {
            paged.fill(Color::Black);
            calls += 1;
            if !paged.advance_page(&mut delay).unwrap() {
                break;
            }
        }
        assert_eq!(calls, 2);

        let mock = mock(&paged);
        let window = [0, 8, 0, 16, 0, 16, 0, 4];
        let data = mock.data_after(uc81xx::PARTIAL_DATA_START_2).unwrap();
        assert_eq!(&data[..8], &window[..]);
        assert_eq!(&data[8..], &[0x00; 8][..]);
        assert_eq!(mock.count(uc81xx::PARTIAL_DATA_START_2), 1);

        // The init writes the register once, the refresh once more
        assert_eq!(mock.count(uc81xx::PARTIAL_REFRESH), 2);
        assert_eq!(mock.data_after_nth(uc81xx::PARTIAL_REFRESH, 1), Some(&window[..]));
        assert_eq!(mock.count(uc81xx::DISPLAY_REFRESH), 0);
        assert!(paged.display().is_power_on());
        assert_eq!(delay.total_ms(), 500);
    }

    #[test]
    fn test_sized_window_pass_two_planes() {
        let mut paged = paged(Panel::Gdew027c44);
        paged.set_partial_window(8, 16, 16, 4);
        assert_eq!(run_pass(&mut paged, Color::Accent), 4);

        let mock = mock(&paged);
        let window = [0, 8, 0, 16, 0, 16, 0, 4];
        let black = mock.data_after(uc81xx::PARTIAL_DATA_START_1).unwrap();
        assert_eq!(&black[..8], &window[..]);
        assert_eq!(&black[8..], &[0x00; 8][..]);
        let accent = mock.data_after(uc81xx::PARTIAL_DATA_START_2).unwrap();
        assert_eq!(&accent[..8], &window[..]);
        assert_eq!(&accent[8..], &[0xFF; 8][..]);

        assert_eq!(mock.count(uc81xx::PARTIAL_REFRESH), 2);
        assert_eq!(mock.data_after_nth(uc81xx::PARTIAL_REFRESH, 1), Some(&window[..]));
        assert!(paged.display().is_power_on());
    }

    #[test]
    fn test_render_calls_draw_per_page() {
        let mut paged = paged(Panel::Gdew029z10);
        let mut pages = Vec::new();
        paged
            .render(&mut MockDelay::default(), |page| {
                pages.push(page.current_page());
                page.fill(Color::Accent);
            })
            .unwrap();
        // One page per phase, black then accent
        assert_eq!(pages, vec![Some(0), Some(0)]);
        assert_eq!(mock(&paged).data_after(uc81xx::DATA_START_1).unwrap()[0], 0xFF);
        assert_eq!(mock(&paged).data_after(uc81xx::DATA_START_2).unwrap()[0], 0x00);
    }

    #[test]
    fn test_reverse_y_pixel_lands_on_last_row() {
        let mut paged = paged_with(Panel::Gde0213b1, 16 * 250);
        paged.set_pixel(0, 0, Color::Black);
        assert_eq!(paged.buffer().byte(Plane::Black, 249 * 16), 0x80);
    }
}
