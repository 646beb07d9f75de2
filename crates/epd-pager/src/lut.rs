//! Waveform (LUT) tables
//!
//! A waveform set is a list of register writes that is replayed verbatim
//! after the panel registers during controller init. The bytes are opaque
//! to the engine; they describe voltage timing for each pixel transition
//! and are reproduced exactly as the panel vendors ship them.
//!
//! SSD16xx panels take a single 29 or 30 byte table in register 0x32.
//! UC81xx panels take one table per transition register (0x20..=0x27).
//!
//! Panels whose tables are not shipped here (GDEW0154Z04, GDEW027C44)
//! get theirs from the caller through
//! [`Builder::waveforms`](crate::config::Builder::waveforms).

use crate::command::{ssd16xx, uc81xx};

/// One waveform register write
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Waveform {
    /// Register (command byte) the table is written to
    pub register: u8,
    /// Table contents
    pub data: &'static [u8],
}

impl Waveform {
    /// Create a waveform write for `register`
    pub const fn new(register: u8, data: &'static [u8]) -> Self {
        Self { register, data }
    }
}

/// How waveform bytes are clocked out
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LutTransfer {
    /// One chip-select burst per table
    #[default]
    Burst,
    /// One chip-select burst per byte (GDEW027C44)
    PerByte,
}

#[rustfmt::skip]
const GDEP015OC1_LUT_FULL: [u8; 30] = [
    0x50, 0xAA, 0x55, 0xAA, 0x11, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0x1F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

#[rustfmt::skip]
const GDEP015OC1_LUT_PARTIAL: [u8; 30] = [
    0x10, 0x18, 0x18, 0x08, 0x18, 0x18, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x13, 0x14, 0x44, 0x12, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

#[rustfmt::skip]
const GDE0213B1_LUT_FULL: [u8; 29] = [
    0x22, 0x55, 0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x11, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x1E, 0x1E, 0x1E, 0x1E, 0x1E, 0x1E, 0x1E, 0x1E, 0x01, 0x00, 0x00, 0x00, 0x00,
];

#[rustfmt::skip]
const GDE0213B1_LUT_PARTIAL: [u8; 29] = [
    0x18, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x0F, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

#[rustfmt::skip]
const GDEW027W3_LUT_VCOM_DC: [u8; 44] = [
    0x00, 0x00,
    0x00, 0x0F, 0x0F, 0x00, 0x00, 0x05,
    0x00, 0x32, 0x32, 0x00, 0x00, 0x02,
    0x00, 0x0F, 0x0F, 0x00, 0x00, 0x05,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

// White-to-white and black-to-white share one table.
#[rustfmt::skip]
const GDEW027W3_LUT_TO_WHITE: [u8; 42] = [
    0x50, 0x0F, 0x0F, 0x00, 0x00, 0x05,
    0x60, 0x32, 0x32, 0x00, 0x00, 0x02,
    0xA0, 0x0F, 0x0F, 0x00, 0x00, 0x05,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

// White-to-black and black-to-black share one table.
#[rustfmt::skip]
const GDEW027W3_LUT_TO_BLACK: [u8; 42] = [
    0xA0, 0x0F, 0x0F, 0x00, 0x00, 0x05,
    0x60, 0x32, 0x32, 0x00, 0x00, 0x02,
    0x50, 0x0F, 0x0F, 0x00, 0x00, 0x05,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// GDEP015OC1 full refresh waveform
pub const GDEP015OC1_FULL: &[Waveform] = &[Waveform::new(ssd16xx::WRITE_LUT, &GDEP015OC1_LUT_FULL)];
/// GDEP015OC1 partial refresh waveform
pub const GDEP015OC1_PARTIAL: &[Waveform] =
    &[Waveform::new(ssd16xx::WRITE_LUT, &GDEP015OC1_LUT_PARTIAL)];

/// GDE0213B1 full refresh waveform
pub const GDE0213B1_FULL: &[Waveform] = &[Waveform::new(ssd16xx::WRITE_LUT, &GDE0213B1_LUT_FULL)];
/// GDE0213B1 partial refresh waveform
pub const GDE0213B1_PARTIAL: &[Waveform] =
    &[Waveform::new(ssd16xx::WRITE_LUT, &GDE0213B1_LUT_PARTIAL)];

/// GDEH029A1 full refresh waveform (same tables as GDEP015OC1)
pub const GDEH029A1_FULL: &[Waveform] = GDEP015OC1_FULL;
/// GDEH029A1 partial refresh waveform (same tables as GDEP015OC1)
pub const GDEH029A1_PARTIAL: &[Waveform] = GDEP015OC1_PARTIAL;

/// GDEW027W3 waveform, used for full and partial refresh
pub const GDEW027W3: &[Waveform] = &[
    Waveform::new(uc81xx::LUT_VCOM, &GDEW027W3_LUT_VCOM_DC),
    Waveform::new(uc81xx::LUT_WW, &GDEW027W3_LUT_TO_WHITE),
    Waveform::new(uc81xx::LUT_BW, &GDEW027W3_LUT_TO_WHITE),
    Waveform::new(uc81xx::LUT_WB, &GDEW027W3_LUT_TO_BLACK),
    Waveform::new(uc81xx::LUT_BB, &GDEW027W3_LUT_TO_BLACK),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssd16xx_tables_target_lut_register() {
        for set in [
            GDEP015OC1_FULL,
            GDEP015OC1_PARTIAL,
            GDE0213B1_FULL,
            GDE0213B1_PARTIAL,
        ] {
            assert_eq!(set.len(), 1);
            assert_eq!(set[0].register, ssd16xx::WRITE_LUT);
        }
    }

    #[test]
    fn test_table_lengths() {
        assert_eq!(GDEP015OC1_FULL[0].data.len(), 30);
        assert_eq!(GDE0213B1_FULL[0].data.len(), 29);
        assert_eq!(GDE0213B1_PARTIAL[0].data.len(), 29);
        assert_eq!(GDEW027W3[0].data.len(), 44);
        assert!(GDEW027W3[1..].iter().all(|w| w.data.len() == 42));
    }

    #[test]
    fn test_gdew027w3_registers_in_order() {
        let registers: alloc::vec::Vec<u8> = GDEW027W3.iter().map(|w| w.register).collect();
        assert_eq!(registers, [0x20, 0x21, 0x22, 0x23, 0x24]);
    }
}
