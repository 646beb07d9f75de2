//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`Interface`] struct
//! for talking to a panel controller over SPI.
//!
//! ## Hardware Requirements
//!
//! Every supported controller needs:
//! - SPI bus (MOSI + SCK, mode 0, MSB first). Chip-select belongs to the
//!   [`SpiDevice`], which asserts it for exactly one command or data burst.
//! - GPIO pins:
//!   - **DC**: Data/Command select (output)
//!   - **RST**: Reset (output, active low, optional)
//!   - **BUSY**: Busy status (input, active level depends on the panel)
//!
//! ## Example
//!
//! ```rust,ignore
//! use epd_pager::{BusyLevel, DisplayInterface, Interface, ResetPulse};
//!
//! let mut interface = Interface::new(spi_device, dc_pin, rst_pin, busy_pin);
//!
//! interface.reset(&mut delay, ResetPulse::POWER_UP)?;
//! interface.send_command(0x12)?; // Display refresh
//! let wait = interface.busy_wait(&mut delay, BusyLevel::Low, 10_000)?;
//! ```

use core::fmt::Debug;
use core::marker::PhantomData;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

/// Interval between two reads of the busy input
pub const BUSY_POLL_INTERVAL_MS: u32 = 1;

/// Level of the busy input while the controller is working
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusyLevel {
    /// BUSY is high while the controller works (SSD16xx)
    High,
    /// BUSY is low while the controller works (UC81xx)
    Low,
}

/// Outcome of a busy wait
///
/// A timeout is not an error: the panel gives no way to recover from a
/// stuck busy line, so the caller logs it and carries on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusyWait {
    /// The controller released the busy line
    Ready {
        /// Time spent waiting
        elapsed_ms: u32,
    },
    /// The busy line was still active when the timeout elapsed
    TimedOut {
        /// Time spent waiting
        elapsed_ms: u32,
    },
}

impl BusyWait {
    /// Time spent waiting, in milliseconds
    pub fn elapsed_ms(&self) -> u32 {
        match *self {
            BusyWait::Ready { elapsed_ms } | BusyWait::TimedOut { elapsed_ms } => elapsed_ms,
        }
    }

    /// Whether the wait gave up before the controller was ready
    pub fn is_timeout(&self) -> bool {
        matches!(self, BusyWait::TimedOut { .. })
    }
}

/// Reset pulse timing
///
/// The pin is optionally driven high first, then held low, then released
/// high and given time to settle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResetPulse {
    /// Time to hold RST high before the pulse (0 skips the lead-in)
    pub lead_high_ms: u32,
    /// Time to hold RST low
    pub low_ms: u32,
    /// Time to wait after releasing RST
    pub settle_ms: u32,
}

impl ResetPulse {
    /// Reset issued once by `init()`
    pub const POWER_UP: Self = Self {
        lead_high_ms: 20,
        low_ms: 20,
        settle_ms: 200,
    };

    /// Reset needed to wake some controllers from power-down
    pub const WAKE: Self = Self {
        lead_high_ms: 0,
        low_ms: 10,
        settle_ms: 10,
    };
}

/// Trait for the hardware interface to a panel controller
///
/// This trait abstracts over different hardware implementations,
/// allowing the [`Display`](crate::display::Display) to work with any
/// SPI + GPIO implementation that satisfies embedded-hal traits.
///
/// ## Implementing
///
/// For most cases, use the provided [`Interface`] struct. If you need
/// custom behavior (e.g., a shared bus with manual chip-select),
/// implement this trait on your own type.
pub trait DisplayInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Send a command byte to the controller
    ///
    /// The implementation must:
    /// 1. Set DC pin low (command mode)
    /// 2. Send the command byte over SPI in one chip-select burst
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_command(&mut self, command: u8) -> Result<(), Self::Error>;

    /// Send data bytes to the controller
    ///
    /// The implementation must:
    /// 1. Set DC pin high (data mode)
    /// 2. Send the data bytes over SPI in one chip-select burst
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Pulse the reset line
    ///
    /// Interfaces without a reset line do nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the reset pin cannot be driven.
    fn reset<D: DelayNs>(&mut self, delay: &mut D, pulse: ResetPulse) -> Result<(), Self::Error>;

    /// Wait while the busy input sits at `active`
    ///
    /// Polls every [`BUSY_POLL_INTERVAL_MS`] until the controller is ready
    /// or `timeout_ms` has elapsed.
    ///
    /// # Errors
    ///
    /// Returns an error only if the busy pin cannot be read. A timeout is
    /// reported as [`BusyWait::TimedOut`].
    fn busy_wait<D: DelayNs>(
        &mut self,
        delay: &mut D,
        active: BusyLevel,
        timeout_ms: u32,
    ) -> Result<BusyWait, Self::Error>;
}

/// Errors that can occur at the interface level
///
/// Generic over SPI and GPIO error types.
#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error
    Pin(PinErr),
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InterfaceError::Spi(e) => write!(f, "SPI error: {e:?}"),
            InterfaceError::Pin(e) => write!(f, "Pin error: {e:?}"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// Placeholder reset pin for boards that tie RST high
///
/// Never driven; see [`Interface::without_reset`].
#[derive(Debug)]
pub struct NoReset<E>(PhantomData<E>);

impl<E: digital::Error> digital::ErrorType for NoReset<E> {
    type Error = E;
}

impl<E: digital::Error> OutputPin for NoReset<E> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Hardware interface implementation
///
/// Implements [`DisplayInterface`] for embedded-hal v1.0 SPI and GPIO traits.
///
/// ## Type Parameters
///
/// * `SPI` - SPI device implementing [`SpiDevice`]
/// * `DC` - Data/Command pin implementing [`OutputPin`]
/// * `RST` - Reset pin implementing [`OutputPin`]
/// * `BUSY` - Busy pin implementing [`InputPin`]
///
/// ## Example
///
/// ```rust,ignore
/// use epd_pager::Interface;
///
/// let interface = Interface::new(
///     spi_device,  // SpiDevice
///     dc_pin,      // OutputPin
///     rst_pin,     // OutputPin
///     busy_pin,    // InputPin
/// );
///
/// // Board with RST tied high
/// let interface = Interface::without_reset(spi_device, dc_pin, busy_pin);
/// ```
pub struct Interface<SPI, DC, RST, BUSY> {
    /// SPI device for communication
    spi: SPI,
    /// Data/Command select pin (low=command, high=data)
    dc: DC,
    /// Reset pin (active low), absent when tied high
    rst: Option<RST>,
    /// Busy pin
    busy: BUSY,
}

impl<SPI, DC, RST, BUSY> Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
{
    /// Create a new Interface
    ///
    /// # Arguments
    ///
    /// * `spi` - SPI device (must implement [`SpiDevice`])
    /// * `dc` - Data/Command pin (output, low=command, high=data)
    /// * `rst` - Reset pin (output, active low)
    /// * `busy` - Busy pin (input)
    pub fn new(spi: SPI, dc: DC, rst: RST, busy: BUSY) -> Self {
        Self {
            spi,
            dc,
            rst: Some(rst),
            busy,
        }
    }

    /// Release the SPI device and pins
    pub fn release(self) -> (SPI, DC, Option<RST>, BUSY) {
        (self.spi, self.dc, self.rst, self.busy)
    }
}

impl<SPI, DC, BUSY> Interface<SPI, DC, NoReset<DC::Error>, BUSY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    BUSY: InputPin,
{
    /// Create an Interface for a board without a reset line
    ///
    /// Reset pulses are skipped.
    pub fn without_reset(spi: SPI, dc: DC, busy: BUSY) -> Self {
        Self {
            spi,
            dc,
            rst: None,
            busy,
        }
    }
}

impl<SPI, DC, RST, BUSY, PinErr> DisplayInterface for Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    SPI::Error: Debug,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    BUSY: InputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
        self.dc.set_low().map_err(InterfaceError::Pin)?;
        self.spi.write(&[command]).map_err(InterfaceError::Spi)?;
        Ok(())
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.dc.set_high().map_err(InterfaceError::Pin)?;
        self.spi.write(data).map_err(InterfaceError::Spi)?;
        Ok(())
    }

    fn reset<D: DelayNs>(&mut self, delay: &mut D, pulse: ResetPulse) -> Result<(), Self::Error> {
        let Some(rst) = self.rst.as_mut() else {
            return Ok(());
        };
        if pulse.lead_high_ms > 0 {
            rst.set_high().map_err(InterfaceError::Pin)?;
            delay.delay_ms(pulse.lead_high_ms);
        }
        rst.set_low().map_err(InterfaceError::Pin)?;
        delay.delay_ms(pulse.low_ms);
        rst.set_high().map_err(InterfaceError::Pin)?;
        delay.delay_ms(pulse.settle_ms);
        Ok(())
    }

    fn busy_wait<D: DelayNs>(
        &mut self,
        delay: &mut D,
        active: BusyLevel,
        timeout_ms: u32,
    ) -> Result<BusyWait, Self::Error> {
        let mut elapsed_ms = 0u32;

        loop {
            let busy = match active {
                BusyLevel::High => self.busy.is_high(),
                BusyLevel::Low => self.busy.is_low(),
            }
            .map_err(InterfaceError::Pin)?;

            if !busy {
                return Ok(BusyWait::Ready { elapsed_ms });
            }
            if elapsed_ms >= timeout_ms {
                return Ok(BusyWait::TimedOut { elapsed_ms });
            }
            delay.delay_ms(BUSY_POLL_INTERVAL_MS);
            elapsed_ms += BUSY_POLL_INTERVAL_MS;
        }
    }
}

/// Recording interface shared by the unit tests
#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use alloc::vec::Vec;

    /// One entry of the recorded bus traffic
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Sent {
        Cmd(u8),
        Data(Vec<u8>),
        Wait(BusyLevel),
        Reset(ResetPulse),
    }

    #[derive(Debug, Default)]
    pub struct MockInterface {
        pub sent: Vec<Sent>,
        /// Number of `send_data` calls (bursts) before merging
        pub bursts: usize,
        /// Report every busy wait as timed out
        pub stuck_busy: bool,
    }

    impl MockInterface {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn clear(&mut self) {
            self.sent.clear();
            self.bursts = 0;
        }

        pub fn commands(&self) -> Vec<u8> {
            self.sent
                .iter()
                .filter_map(|s| match s {
                    Sent::Cmd(c) => Some(*c),
                    _ => None,
                })
                .collect()
        }

        /// Data sent right after the first occurrence of `command`
        pub fn data_after(&self, command: u8) -> Option<&[u8]> {
            self.data_after_nth(command, 0)
        }

        /// Data sent right after the `n`th occurrence of `command`
        pub fn data_after_nth(&self, command: u8, n: usize) -> Option<&[u8]> {
            let pos = self
                .sent
                .iter()
                .enumerate()
                .filter(|(_, s)| **s == Sent::Cmd(command))
                .nth(n)?
                .0;
            match self.sent.get(pos + 1) {
                Some(Sent::Data(d)) => Some(d.as_slice()),
                _ => Some(&[]),
            }
        }

        pub fn count(&self, command: u8) -> usize {
            self.commands().iter().filter(|&&c| c == command).count()
        }

        pub fn waits(&self) -> usize {
            self.sent
                .iter()
                .filter(|s| matches!(s, Sent::Wait(_)))
                .count()
        }

        pub fn resets(&self) -> Vec<ResetPulse> {
            self.sent
                .iter()
                .filter_map(|s| match s {
                    Sent::Reset(p) => Some(*p),
                    _ => None,
                })
                .collect()
        }
    }

    impl DisplayInterface for MockInterface {
        type Error = core::convert::Infallible;

        fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
            self.sent.push(Sent::Cmd(command));
            Ok(())
        }

        fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
            self.bursts += 1;
            if let Some(Sent::Data(last)) = self.sent.last_mut() {
                last.extend_from_slice(data);
            } else {
                self.sent.push(Sent::Data(data.to_vec()));
            }
            Ok(())
        }

        fn reset<D: DelayNs>(
            &mut self,
            delay: &mut D,
            pulse: ResetPulse,
        ) -> Result<(), Self::Error> {
            delay.delay_ms(pulse.lead_high_ms + pulse.low_ms + pulse.settle_ms);
            self.sent.push(Sent::Reset(pulse));
            Ok(())
        }

        fn busy_wait<D: DelayNs>(
            &mut self,
            _delay: &mut D,
            active: BusyLevel,
            timeout_ms: u32,
        ) -> Result<BusyWait, Self::Error> {
            self.sent.push(Sent::Wait(active));
            if self.stuck_busy {
                Ok(BusyWait::TimedOut {
                    elapsed_ms: timeout_ms,
                })
            } else {
                Ok(BusyWait::Ready { elapsed_ms: 0 })
            }
        }
    }

    /// Delay that returns immediately and adds up what was asked of it
    #[derive(Debug, Default)]
    pub struct MockDelay {
        pub total_ns: u64,
    }

    impl MockDelay {
        pub fn total_ms(&self) -> u64 {
            self.total_ns / 1_000_000
        }
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
        }
    }
}
