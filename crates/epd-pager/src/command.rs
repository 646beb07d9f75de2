//! Controller command definitions
//!
//! The supported panels use one of two controller families that share the
//! SPI framing (DC low for the command byte, DC high for its data) but
//! nothing else:
//!
//! - [`ssd16xx`]: SSD1607/SSD1608/IL3820 style controllers. RAM is
//!   addressed with an entry mode plus X/Y window and pointer registers,
//!   and updates are started with an update sequence byte followed by
//!   master activation.
//! - [`uc81xx`]: UC8151/IL0373/IL91874 style controllers. Planes are
//!   loaded with data-start commands and refreshed with a single refresh
//!   command; partial updates use a window register.
//!
//! ## Example
//!
//! ```rust,ignore
//! use epd_pager::{command::uc81xx, DisplayInterface};
//!
//! interface.send_command(uc81xx::POWER_ON)?;
//! interface.send_command(uc81xx::DATA_START_1)?;
//! interface.send_data(&pixel_data)?;
//! ```

/// SSD16xx family command bytes
pub mod ssd16xx {
    /// Driver output control (0x01)
    ///
    /// Requires 3 bytes: [gates-1 (LSB), gates-1 (MSB), scanning mode]
    pub const DRIVER_OUTPUT_CONTROL: u8 = 0x01;

    /// Booster soft-start control (0x0C)
    pub const BOOSTER_SOFT_START: u8 = 0x0C;

    /// Data entry mode (0x11)
    ///
    /// - Bit 0: X direction (0=decrement, 1=increment)
    /// - Bit 1: Y direction (0=decrement, 1=increment)
    pub const DATA_ENTRY_MODE: u8 = 0x11;

    /// Master activation (0x20)
    ///
    /// Runs the sequence selected with [`DISPLAY_UPDATE_CONTROL_2`]. BUSY is
    /// high while it runs.
    pub const MASTER_ACTIVATION: u8 = 0x20;

    /// Display update control 2 (0x22)
    pub const DISPLAY_UPDATE_CONTROL_2: u8 = 0x22;

    /// Write RAM (0x24)
    ///
    /// Bit=0: black, bit=1: white.
    pub const WRITE_RAM: u8 = 0x24;

    /// Write VCOM register (0x2C)
    pub const WRITE_VCOM: u8 = 0x2C;

    /// Write LUT register (0x32)
    pub const WRITE_LUT: u8 = 0x32;

    /// Set dummy line period (0x3A)
    pub const DUMMY_LINE_PERIOD: u8 = 0x3A;

    /// Set gate line width (0x3B)
    pub const GATE_LINE_WIDTH: u8 = 0x3B;

    /// Set RAM X address start/end (0x44), in bytes
    pub const SET_RAM_X_RANGE: u8 = 0x44;

    /// Set RAM Y address start/end (0x45)
    pub const SET_RAM_Y_RANGE: u8 = 0x45;

    /// Set RAM X address counter (0x4E), in bytes
    pub const SET_RAM_X_COUNTER: u8 = 0x4E;

    /// Set RAM Y address counter (0x4F)
    pub const SET_RAM_Y_COUNTER: u8 = 0x4F;

    /// No operation (0xFF), terminates a pending frame write
    pub const NOP: u8 = 0xFF;

    // Sequences for DISPLAY_UPDATE_CONTROL_2

    /// Enable clock and analog
    pub const SEQUENCE_POWER_ON: u8 = 0xC0;
    /// Disable analog and clock
    pub const SEQUENCE_POWER_OFF: u8 = 0xC3;
    /// Clock and analog on, then display with the loaded waveform
    pub const SEQUENCE_FULL_UPDATE: u8 = 0xC4;
    /// Display only (power already on)
    pub const SEQUENCE_PARTIAL_UPDATE: u8 = 0x04;
}

/// UC81xx family command bytes
pub mod uc81xx {
    /// Panel setting (0x00)
    pub const PANEL_SETTING: u8 = 0x00;
    /// Power setting (0x01)
    pub const POWER_SETTING: u8 = 0x01;
    /// Power off (0x02)
    pub const POWER_OFF: u8 = 0x02;
    /// Power on (0x04), BUSY is asserted until the rails are up
    pub const POWER_ON: u8 = 0x04;
    /// Booster soft start (0x06)
    pub const BOOSTER_SOFT_START: u8 = 0x06;

    /// Data start transmission 1 (0x10)
    ///
    /// Black plane on color panels, old data on monochrome panels.
    pub const DATA_START_1: u8 = 0x10;
    /// Display refresh (0x12)
    pub const DISPLAY_REFRESH: u8 = 0x12;
    /// Data start transmission 2 (0x13)
    ///
    /// Accent plane on color panels, new data on monochrome panels.
    pub const DATA_START_2: u8 = 0x13;

    /// Partial data start transmission 1 (0x14), sized window encoding
    pub const PARTIAL_DATA_START_1: u8 = 0x14;
    /// Partial data start transmission 2 (0x15), sized window encoding
    pub const PARTIAL_DATA_START_2: u8 = 0x15;
    /// Partial display refresh (0x16), sized window encoding
    ///
    /// Also written with a single zero byte during init to select the
    /// panel's data polarity.
    pub const PARTIAL_REFRESH: u8 = 0x16;

    /// VCOM waveform register (0x20), first of the LUT registers
    pub const LUT_VCOM: u8 = 0x20;
    /// White-to-white waveform register (0x21)
    pub const LUT_WW: u8 = 0x21;
    /// Black-to-white waveform register (0x22)
    pub const LUT_BW: u8 = 0x22;
    /// White-to-black waveform register (0x23)
    pub const LUT_WB: u8 = 0x23;
    /// Black-to-black waveform register (0x24)
    pub const LUT_BB: u8 = 0x24;

    /// PLL control (0x30)
    pub const PLL_CONTROL: u8 = 0x30;
    /// Temperature sensor selection (0x41)
    pub const TEMPERATURE_SENSOR: u8 = 0x41;
    /// VCOM and data interval setting (0x50)
    pub const VCOM_DATA_INTERVAL: u8 = 0x50;
    /// TCON setting (0x60)
    pub const TCON_SETTING: u8 = 0x60;
    /// Resolution setting (0x61)
    pub const RESOLUTION: u8 = 0x61;
    /// Flash control (0x65)
    pub const FLASH_CONTROL: u8 = 0x65;
    /// VCM DC setting (0x82)
    pub const VCM_DC: u8 = 0x82;

    /// Partial window (0x90)
    pub const PARTIAL_WINDOW: u8 = 0x90;
    /// Partial in (0x91)
    pub const PARTIAL_IN: u8 = 0x91;
    /// Partial out (0x92)
    pub const PARTIAL_OUT: u8 = 0x92;

    /// Release the external flash from deep power-down (0xAB)
    pub const FLASH_WAKE: u8 = 0xAB;
    /// Flash mode (0xE5)
    pub const FLASH_MODE: u8 = 0xE5;
    /// Power optimisation register write (0xF8)
    pub const POWER_OPTIMIZATION: u8 = 0xF8;
}
