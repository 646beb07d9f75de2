//! Panel profiles
//!
//! Every supported panel is described by a static [`Profile`]: geometry,
//! plane count, controller family and its quirks, busy signalling, the
//! register writes that bring the controller up, and which waveform
//! tables it loads. Behaviour that differs between panels is selected
//! from these fields; the driver code itself never matches on [`Panel`].
//!
//! ## Example
//!
//! ```
//! use epd_pager::Panel;
//!
//! let profile = Panel::Gdew042t2.profile();
//! assert_eq!((profile.width, profile.height), (400, 300));
//! assert!(profile.has_partial_update());
//! assert!(!profile.has_color());
//! ```

use crate::command::{ssd16xx, uc81xx};
use crate::config::Dimensions;
use crate::interface::BusyLevel;
use crate::lut::{self, LutTransfer, Waveform};

/// Supported panels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Panel {
    /// 1.54" 200x200 black/white, SSD1607
    Gdep015oc1,
    /// 2.13" 128x250 black/white, IL3895
    Gde0213b1,
    /// 2.9" 128x296 black/white, IL3820
    Gdeh029a1,
    /// 2.7" 176x264 black/white, IL91874
    Gdew027w3,
    /// 4.2" 400x300 black/white, IL0398
    Gdew042t2,
    /// 7.5" 640x384 black/white, IL0371
    Gdew075t8,
    /// 1.54" 200x200 black/white/red, IL0376F
    Gdew0154z04,
    /// 2.13" 104x212 black/white/red, IL0373
    Gdew0213z16,
    /// 2.9" 128x296 black/white/red, IL0373
    Gdew029z10,
    /// 2.7" 176x264 black/white/red, IL91874
    Gdew027c44,
    /// 4.2" 400x300 black/white/red, IL0398
    Gdew042z15,
    /// 7.5" 640x384 black/white/red, IL0371
    Gdew075z09,
}

impl Panel {
    /// Every supported panel
    pub const ALL: [Panel; 12] = [
        Panel::Gdep015oc1,
        Panel::Gde0213b1,
        Panel::Gdeh029a1,
        Panel::Gdew027w3,
        Panel::Gdew042t2,
        Panel::Gdew075t8,
        Panel::Gdew0154z04,
        Panel::Gdew0213z16,
        Panel::Gdew029z10,
        Panel::Gdew027c44,
        Panel::Gdew042z15,
        Panel::Gdew075z09,
    ];

    /// The panel's profile
    pub fn profile(self) -> &'static Profile {
        match self {
            Panel::Gdep015oc1 => &GDEP015OC1,
            Panel::Gde0213b1 => &GDE0213B1,
            Panel::Gdeh029a1 => &GDEH029A1,
            Panel::Gdew027w3 => &GDEW027W3,
            Panel::Gdew042t2 => &GDEW042T2,
            Panel::Gdew075t8 => &GDEW075T8,
            Panel::Gdew0154z04 => &GDEW0154Z04,
            Panel::Gdew0213z16 => &GDEW0213Z16,
            Panel::Gdew029z10 => &GDEW029Z10,
            Panel::Gdew027c44 => &GDEW027C44,
            Panel::Gdew042z15 => &GDEW042Z15,
            Panel::Gdew075z09 => &GDEW075Z09,
        }
    }
}

/// Number of bit planes held per pixel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Planes {
    /// Black only
    Mono,
    /// Black plus a red accent
    Accent,
}

/// Encoding of the partial window register on UC81xx controllers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowEncoding {
    /// 0x90 with 16-bit x/xe/y/ye and a trailing scan flag
    Wide {
        /// Last byte of the window command
        flag: u8,
    },
    /// 0x90 with 8-bit x/xe, 16-bit y/ye and a trailing 0x01
    Narrow,
    /// Origin plus size, sent with the data command itself
    ///
    /// The refresh window uses the same layout under 0x16.
    Sized {
        /// Command that opens the black plane window
        black: u8,
        /// Command that opens the accent plane window
        accent: u8,
    },
}

/// Controller family and its addressing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Controller {
    /// RAM entry mode + X/Y window addressing
    Ssd16xx {
        /// Data entry mode written to 0x11
        entry_mode: u8,
    },
    /// Data-start commands + partial window register
    Uc81xx {
        /// Data command for the black (or only) plane of a full frame
        black_data: u8,
        /// Data command for the accent plane, when it is sent separately
        accent_data: Option<u8>,
        /// Partial window encoding, `None` if partial update is unsupported
        window: Option<WindowEncoding>,
    },
}

/// How frame bytes are put on the wire
///
/// Input bytes always use the controller convention (bit set = white).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    /// Sent as is
    Direct,
    /// Every byte inverted
    Complement,
    /// Black plane expanded to two bits per pixel, accent plane as is
    Grey,
    /// Both planes merged into one nibble per pixel, two pixels per byte
    Nibble,
}

/// Power-down behaviour
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerOff {
    /// Send the family's power off sequence
    Standard,
    /// Leave the panel powered; power off is a logged no-op
    Skip,
}

/// Where a panel's waveform tables come from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveforms {
    /// The controller uses its OTP waveforms
    Otp,
    /// Tables shipped in [`lut`]
    Builtin {
        /// Full refresh tables
        full: &'static [Waveform],
        /// Partial refresh tables
        partial: &'static [Waveform],
    },
    /// Register waveforms the caller must supply
    External,
}

/// One step of a controller init sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// Command byte followed by its data (possibly empty)
    Command(u8, &'static [u8]),
    /// Wait for the busy line, logged under the given label
    WaitBusy(&'static str),
}

/// Static description of one panel
#[derive(Debug)]
pub struct Profile {
    /// Panel this profile describes
    pub panel: Panel,
    /// Native width in pixels (multiple of 8)
    pub width: u16,
    /// Native height in pixels
    pub height: u16,
    /// Planes held per pixel
    pub planes: Planes,
    /// Controller family and addressing
    pub controller: Controller,
    /// Busy input level while the controller works
    pub busy_level: BusyLevel,
    /// Busy wait ceiling in milliseconds
    pub busy_timeout_ms: u32,
    /// Frame rows are stored bottom-up (y decrementing entry mode)
    pub reverse_y: bool,
    /// Controller needs a reset pulse to wake from power-down
    pub wake_reset: bool,
    /// Register writes issued at the start of every init
    pub init: &'static [Op],
    /// Waveform source
    pub waveforms: Waveforms,
    /// How waveform bytes are clocked out
    pub lut_transfer: LutTransfer,
    /// Wire encoding of frame data
    pub encoding: Encoding,
    /// Power-down behaviour
    pub power_off: PowerOff,
    /// The first full pass after `init()` is sent twice
    pub repeat_initial_full: bool,
    /// Re-address the whole panel before a partial refresh
    pub partial_refresh_full_window: bool,
    /// Delay after a full refresh, in milliseconds
    pub full_settle_ms: u32,
    /// Delay after a partial refresh, in milliseconds
    pub partial_settle_ms: u32,
}

impl Profile {
    /// Native panel dimensions
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }

    /// Bytes per row of one plane
    pub fn bytes_per_row(&self) -> usize {
        self.width as usize / 8
    }

    /// Whether the panel supports partial window updates
    pub fn has_partial_update(&self) -> bool {
        match self.controller {
            Controller::Ssd16xx { .. } => true,
            Controller::Uc81xx { window, .. } => window.is_some(),
        }
    }

    /// Whether the panel has an accent plane
    pub fn has_color(&self) -> bool {
        self.planes == Planes::Accent
    }

    /// Whether a pass sends the accent plane in a second phase
    pub(crate) fn sends_accent_phase(&self) -> bool {
        matches!(
            self.controller,
            Controller::Uc81xx {
                accent_data: Some(_),
                ..
            }
        )
    }
}

const TIMEOUT_MONO_MS: u32 = 10_000;
const TIMEOUT_ACCENT_MS: u32 = 20_000;
const TIMEOUT_LARGE_ACCENT_MS: u32 = 40_000;

const SSD_TAIL: [Op; 3] = [
    Op::Command(ssd16xx::WRITE_VCOM, &[0x9B]),
    Op::Command(ssd16xx::DUMMY_LINE_PERIOD, &[0x1A]),
    Op::Command(ssd16xx::GATE_LINE_WIDTH, &[0x08]),
];

const SSD_SOFT_START: Op = Op::Command(ssd16xx::BOOSTER_SOFT_START, &[0xD7, 0xD6, 0x9D]);

const INIT_GDEP015OC1: [Op; 5] = [
    Op::Command(ssd16xx::DRIVER_OUTPUT_CONTROL, &[0xC7, 0x00, 0x00]),
    SSD_SOFT_START,
    SSD_TAIL[0],
    SSD_TAIL[1],
    SSD_TAIL[2],
];

const INIT_GDE0213B1: [Op; 5] = [
    Op::Command(ssd16xx::DRIVER_OUTPUT_CONTROL, &[0xF9, 0x00, 0x00]),
    SSD_SOFT_START,
    Op::Command(ssd16xx::WRITE_VCOM, &[0xA8]),
    SSD_TAIL[1],
    SSD_TAIL[2],
];

const INIT_GDEH029A1: [Op; 5] = [
    Op::Command(ssd16xx::DRIVER_OUTPUT_CONTROL, &[0x27, 0x01, 0x00]),
    SSD_SOFT_START,
    Op::Command(ssd16xx::WRITE_VCOM, &[0xA8]),
    SSD_TAIL[1],
    SSD_TAIL[2],
];

const INIT_GDEW027W3: [Op; 14] = [
    Op::Command(uc81xx::POWER_SETTING, &[0x03, 0x00, 0x2B, 0x2B, 0x09]),
    Op::Command(uc81xx::BOOSTER_SOFT_START, &[0x07, 0x07, 0x17]),
    Op::Command(uc81xx::POWER_OPTIMIZATION, &[0x60, 0xA5]),
    Op::Command(uc81xx::POWER_OPTIMIZATION, &[0x89, 0xA5]),
    Op::Command(uc81xx::POWER_OPTIMIZATION, &[0x90, 0x00]),
    Op::Command(uc81xx::POWER_OPTIMIZATION, &[0x93, 0x2A]),
    Op::Command(uc81xx::POWER_OPTIMIZATION, &[0xA0, 0xA5]),
    Op::Command(uc81xx::POWER_OPTIMIZATION, &[0xA1, 0x00]),
    Op::Command(uc81xx::POWER_OPTIMIZATION, &[0x73, 0x41]),
    Op::Command(uc81xx::PARTIAL_REFRESH, &[0x00]),
    Op::Command(uc81xx::PANEL_SETTING, &[0x9F]),
    Op::Command(uc81xx::PLL_CONTROL, &[0x3A]),
    Op::Command(uc81xx::RESOLUTION, &[0x00, 0xB0, 0x01, 0x08]),
    Op::Command(uc81xx::VCM_DC, &[0x12]),
];

const INIT_GDEW042T2: [Op; 2] = [
    Op::Command(uc81xx::BOOSTER_SOFT_START, &[0x17, 0x17, 0x17]),
    Op::Command(uc81xx::PANEL_SETTING, &[0x1F]),
];

const FLASH_RELEASE: [Op; 3] = [
    Op::Command(uc81xx::FLASH_CONTROL, &[0x01]),
    Op::Command(uc81xx::FLASH_WAKE, &[]),
    Op::Command(uc81xx::FLASH_CONTROL, &[0x00]),
];

const INIT_GDEW075T8: [Op; 13] = [
    FLASH_RELEASE[0],
    FLASH_RELEASE[1],
    FLASH_RELEASE[2],
    Op::Command(uc81xx::POWER_SETTING, &[0x37, 0x00]),
    Op::Command(uc81xx::PANEL_SETTING, &[0xCF, 0x08]),
    Op::Command(uc81xx::BOOSTER_SOFT_START, &[0xC7, 0xCC, 0x28]),
    Op::Command(uc81xx::PLL_CONTROL, &[0x3C]),
    Op::Command(uc81xx::TEMPERATURE_SENSOR, &[0x00]),
    Op::Command(uc81xx::VCOM_DATA_INTERVAL, &[0x77]),
    Op::Command(uc81xx::TCON_SETTING, &[0x22]),
    Op::Command(uc81xx::RESOLUTION, &[0x02, 0x80, 0x01, 0x80]),
    Op::Command(uc81xx::VCM_DC, &[0x1E]),
    Op::Command(uc81xx::FLASH_MODE, &[0x03]),
];

const INIT_GDEW0154Z04: [Op; 9] = [
    Op::Command(uc81xx::POWER_SETTING, &[0x07, 0x00, 0x08, 0x00]),
    Op::Command(uc81xx::BOOSTER_SOFT_START, &[0x07, 0x07, 0x07]),
    Op::Command(uc81xx::POWER_ON, &[]),
    Op::WaitBusy("Power On"),
    Op::Command(uc81xx::PANEL_SETTING, &[0xCF]),
    Op::Command(uc81xx::VCOM_DATA_INTERVAL, &[0x37]),
    Op::Command(uc81xx::PLL_CONTROL, &[0x39]),
    Op::Command(uc81xx::RESOLUTION, &[0xC8, 0x00, 0xC8]),
    Op::Command(uc81xx::VCM_DC, &[0x0E]),
];

const INIT_GDEW0213Z16: [Op; 4] = [
    Op::Command(uc81xx::BOOSTER_SOFT_START, &[0x17, 0x17, 0x17]),
    Op::Command(uc81xx::PANEL_SETTING, &[0x8F]),
    Op::Command(uc81xx::VCOM_DATA_INTERVAL, &[0x37]),
    Op::Command(uc81xx::RESOLUTION, &[0x68, 0x00, 0xD4]),
];

const INIT_GDEW029Z10: [Op; 4] = [
    Op::Command(uc81xx::BOOSTER_SOFT_START, &[0x17, 0x17, 0x17]),
    Op::Command(uc81xx::PANEL_SETTING, &[0x8F]),
    Op::Command(uc81xx::VCOM_DATA_INTERVAL, &[0x77]),
    Op::Command(uc81xx::RESOLUTION, &[0x80, 0x01, 0x28]),
];

const INIT_GDEW027C44: [Op; 13] = [
    Op::Command(uc81xx::POWER_SETTING, &[0x03, 0x00, 0x2B, 0x2B, 0x09]),
    Op::Command(uc81xx::BOOSTER_SOFT_START, &[0x07, 0x07, 0x17]),
    Op::Command(uc81xx::POWER_OPTIMIZATION, &[0x60, 0xA5]),
    Op::Command(uc81xx::POWER_OPTIMIZATION, &[0x89, 0xA5]),
    Op::Command(uc81xx::POWER_OPTIMIZATION, &[0x90, 0x00]),
    Op::Command(uc81xx::POWER_OPTIMIZATION, &[0x93, 0x2A]),
    Op::Command(uc81xx::POWER_OPTIMIZATION, &[0x73, 0x41]),
    Op::Command(uc81xx::PARTIAL_REFRESH, &[0x00]),
    Op::Command(uc81xx::PANEL_SETTING, &[0xAF]),
    Op::Command(uc81xx::PLL_CONTROL, &[0x3A]),
    Op::Command(uc81xx::RESOLUTION, &[0x00, 0xB0, 0x01, 0x08]),
    Op::Command(uc81xx::VCM_DC, &[0x12]),
    Op::Command(uc81xx::VCOM_DATA_INTERVAL, &[0x87]),
];

const INIT_GDEW042Z15: [Op; 2] = [
    Op::Command(uc81xx::BOOSTER_SOFT_START, &[0x17, 0x17, 0x17]),
    Op::Command(uc81xx::PANEL_SETTING, &[0x0F]),
];

const INIT_GDEW075Z09: [Op; 15] = [
    FLASH_RELEASE[0],
    FLASH_RELEASE[1],
    FLASH_RELEASE[2],
    Op::Command(uc81xx::POWER_SETTING, &[0x37, 0x00]),
    Op::Command(uc81xx::POWER_ON, &[]),
    Op::WaitBusy("POWER"),
    Op::Command(uc81xx::PANEL_SETTING, &[0xCF, 0x08]),
    Op::Command(uc81xx::BOOSTER_SOFT_START, &[0xC7, 0xCC, 0x28]),
    Op::Command(uc81xx::PLL_CONTROL, &[0x3C]),
    Op::Command(uc81xx::TEMPERATURE_SENSOR, &[0x00]),
    Op::Command(uc81xx::VCOM_DATA_INTERVAL, &[0x77]),
    Op::Command(uc81xx::TCON_SETTING, &[0x22]),
    Op::Command(uc81xx::RESOLUTION, &[0x02, 0x80, 0x01, 0x80]),
    Op::Command(uc81xx::VCM_DC, &[0x1E]),
    Op::Command(uc81xx::FLASH_MODE, &[0x03]),
];

/// Defaults shared by the SSD16xx panels; geometry and tables are per panel
const SSD16XX: Profile = Profile {
    panel: Panel::Gdep015oc1,
    width: 200,
    height: 200,
    planes: Planes::Mono,
    controller: Controller::Ssd16xx { entry_mode: 0x03 },
    busy_level: BusyLevel::High,
    busy_timeout_ms: TIMEOUT_MONO_MS,
    reverse_y: false,
    wake_reset: false,
    init: &INIT_GDEP015OC1,
    waveforms: Waveforms::Builtin {
        full: lut::GDEP015OC1_FULL,
        partial: lut::GDEP015OC1_PARTIAL,
    },
    lut_transfer: LutTransfer::Burst,
    encoding: Encoding::Direct,
    power_off: PowerOff::Standard,
    repeat_initial_full: false,
    partial_refresh_full_window: false,
    full_settle_ms: 200,
    partial_settle_ms: 200,
};

/// Defaults shared by the UC81xx panels
const UC81XX: Profile = Profile {
    panel: Panel::Gdew042t2,
    width: 400,
    height: 300,
    planes: Planes::Mono,
    controller: Controller::Uc81xx {
        black_data: uc81xx::DATA_START_2,
        accent_data: None,
        window: Some(WindowEncoding::Wide { flag: 0x01 }),
    },
    busy_level: BusyLevel::Low,
    busy_timeout_ms: TIMEOUT_MONO_MS,
    reverse_y: false,
    wake_reset: false,
    init: &INIT_GDEW042T2,
    waveforms: Waveforms::Otp,
    lut_transfer: LutTransfer::Burst,
    encoding: Encoding::Direct,
    power_off: PowerOff::Standard,
    repeat_initial_full: false,
    partial_refresh_full_window: false,
    full_settle_ms: 200,
    partial_settle_ms: 0,
};

/// Two-plane UC81xx panel: black into 0x10, accent into 0x13
const UC81XX_ACCENT: Profile = Profile {
    planes: Planes::Accent,
    controller: Controller::Uc81xx {
        black_data: uc81xx::DATA_START_1,
        accent_data: Some(uc81xx::DATA_START_2),
        window: Some(WindowEncoding::Narrow),
    },
    busy_timeout_ms: TIMEOUT_ACCENT_MS,
    wake_reset: true,
    full_settle_ms: 0,
    partial_settle_ms: 200,
    ..UC81XX
};

static GDEP015OC1: Profile = SSD16XX;

static GDE0213B1: Profile = Profile {
    panel: Panel::Gde0213b1,
    width: 128,
    height: 250,
    controller: Controller::Ssd16xx { entry_mode: 0x01 },
    reverse_y: true,
    init: &INIT_GDE0213B1,
    waveforms: Waveforms::Builtin {
        full: lut::GDE0213B1_FULL,
        partial: lut::GDE0213B1_PARTIAL,
    },
    ..SSD16XX
};

static GDEH029A1: Profile = Profile {
    panel: Panel::Gdeh029a1,
    width: 128,
    height: 296,
    init: &INIT_GDEH029A1,
    waveforms: Waveforms::Builtin {
        full: lut::GDEH029A1_FULL,
        partial: lut::GDEH029A1_PARTIAL,
    },
    ..SSD16XX
};

static GDEW027W3: Profile = Profile {
    panel: Panel::Gdew027w3,
    width: 176,
    height: 264,
    controller: Controller::Uc81xx {
        black_data: uc81xx::DATA_START_2,
        accent_data: None,
        window: Some(WindowEncoding::Sized {
            black: uc81xx::PARTIAL_DATA_START_2,
            accent: uc81xx::PARTIAL_DATA_START_2,
        }),
    },
    init: &INIT_GDEW027W3,
    waveforms: Waveforms::Builtin {
        full: lut::GDEW027W3,
        partial: lut::GDEW027W3,
    },
    partial_settle_ms: 500,
    ..UC81XX
};

static GDEW042T2: Profile = Profile {
    repeat_initial_full: true,
    ..UC81XX
};

static GDEW075T8: Profile = Profile {
    panel: Panel::Gdew075t8,
    width: 640,
    height: 384,
    controller: Controller::Uc81xx {
        black_data: uc81xx::DATA_START_1,
        accent_data: None,
        window: Some(WindowEncoding::Wide { flag: 0x01 }),
    },
    wake_reset: true,
    init: &INIT_GDEW075T8,
    encoding: Encoding::Nibble,
    ..UC81XX
};

static GDEW0154Z04: Profile = Profile {
    panel: Panel::Gdew0154z04,
    width: 200,
    height: 200,
    controller: Controller::Uc81xx {
        black_data: uc81xx::DATA_START_1,
        accent_data: Some(uc81xx::DATA_START_2),
        window: None,
    },
    init: &INIT_GDEW0154Z04,
    waveforms: Waveforms::External,
    encoding: Encoding::Grey,
    power_off: PowerOff::Skip,
    partial_settle_ms: 0,
    ..UC81XX_ACCENT
};

static GDEW0213Z16: Profile = Profile {
    panel: Panel::Gdew0213z16,
    width: 104,
    height: 212,
    init: &INIT_GDEW0213Z16,
    ..UC81XX_ACCENT
};

static GDEW029Z10: Profile = Profile {
    panel: Panel::Gdew029z10,
    width: 128,
    height: 296,
    init: &INIT_GDEW029Z10,
    ..UC81XX_ACCENT
};

static GDEW027C44: Profile = Profile {
    panel: Panel::Gdew027c44,
    width: 176,
    height: 264,
    controller: Controller::Uc81xx {
        black_data: uc81xx::DATA_START_1,
        accent_data: Some(uc81xx::DATA_START_2),
        window: Some(WindowEncoding::Sized {
            black: uc81xx::PARTIAL_DATA_START_1,
            accent: uc81xx::PARTIAL_DATA_START_2,
        }),
    },
    init: &INIT_GDEW027C44,
    waveforms: Waveforms::External,
    lut_transfer: LutTransfer::PerByte,
    encoding: Encoding::Complement,
    partial_settle_ms: 500,
    ..UC81XX_ACCENT
};

static GDEW042Z15: Profile = Profile {
    panel: Panel::Gdew042z15,
    width: 400,
    height: 300,
    controller: Controller::Uc81xx {
        black_data: uc81xx::DATA_START_1,
        accent_data: Some(uc81xx::DATA_START_2),
        window: Some(WindowEncoding::Wide { flag: 0x00 }),
    },
    init: &INIT_GDEW042Z15,
    partial_refresh_full_window: true,
    ..UC81XX_ACCENT
};

static GDEW075Z09: Profile = Profile {
    panel: Panel::Gdew075z09,
    width: 640,
    height: 384,
    controller: Controller::Uc81xx {
        black_data: uc81xx::DATA_START_1,
        accent_data: None,
        window: Some(WindowEncoding::Wide { flag: 0x00 }),
    },
    busy_timeout_ms: TIMEOUT_LARGE_ACCENT_MS,
    init: &INIT_GDEW075Z09,
    encoding: Encoding::Nibble,
    full_settle_ms: 200,
    partial_settle_ms: 0,
    ..UC81XX_ACCENT
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_match_their_panel() {
        for panel in Panel::ALL {
            let profile = panel.profile();
            assert_eq!(profile.panel, panel);
            assert_eq!(profile.width % 8, 0, "{panel:?}");
        }
    }

    #[test]
    fn test_only_gdew0154z04_lacks_partial_update() {
        for panel in Panel::ALL {
            assert_eq!(
                panel.profile().has_partial_update(),
                panel != Panel::Gdew0154z04,
                "{panel:?}"
            );
        }
    }

    #[test]
    fn test_busy_levels_follow_controller_family() {
        for panel in Panel::ALL {
            let profile = panel.profile();
            let expected = match profile.controller {
                Controller::Ssd16xx { .. } => BusyLevel::High,
                Controller::Uc81xx { .. } => BusyLevel::Low,
            };
            assert_eq!(profile.busy_level, expected, "{panel:?}");
        }
    }

    #[test]
    fn test_busy_timeouts() {
        assert_eq!(Panel::Gdep015oc1.profile().busy_timeout_ms, 10_000);
        assert_eq!(Panel::Gdew075t8.profile().busy_timeout_ms, 10_000);
        assert_eq!(Panel::Gdew0213z16.profile().busy_timeout_ms, 20_000);
        assert_eq!(Panel::Gdew075z09.profile().busy_timeout_ms, 40_000);
    }

    #[test]
    fn test_accent_phase_only_on_two_plane_panels() {
        for panel in Panel::ALL {
            let profile = panel.profile();
            if profile.sends_accent_phase() {
                assert!(profile.has_color(), "{panel:?}");
            }
        }
        // Merged into nibbles, so no separate accent phase
        assert!(!Panel::Gdew075z09.profile().sends_accent_phase());
        assert!(Panel::Gdew075z09.profile().has_color());
    }

    #[test]
    fn test_ssd_driver_output_matches_height() {
        for panel in [Panel::Gdep015oc1, Panel::Gde0213b1, Panel::Gdeh029a1] {
            let profile = panel.profile();
            let rows = profile.height - 1;
            let Op::Command(command, data) = profile.init[0] else {
                panic!("{panel:?} starts with a busy wait");
            };
            assert_eq!(command, ssd16xx::DRIVER_OUTPUT_CONTROL);
            assert_eq!(data, &[(rows % 256) as u8, (rows / 256) as u8, 0x00]);
        }
    }

    #[test]
    fn test_external_waveforms() {
        assert_eq!(
            Panel::Gdew0154z04.profile().waveforms,
            Waveforms::External
        );
        assert_eq!(Panel::Gdew027c44.profile().waveforms, Waveforms::External);
        assert_eq!(
            Panel::Gdew027c44.profile().lut_transfer,
            LutTransfer::PerByte
        );
    }
}
