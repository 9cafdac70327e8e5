//! Command tables for the HX8369B WVGA panel.
//!
//! The mDNIe payloads here are placeholder blobs laid out in the panel's
//! register format (`0xE6` selects the mDNIe block on this LDI, followed by
//! the tuning fields). They are not calibrated HX8369B tuning data: replace
//! them with the vendor tables before driving real hardware. Only the DCS
//! inversion pair (`0x21`/`0x20`) is standard.

use crate::config::PanelVariant;
use crate::modes::{ResolvedMode, Scenario};

const UI_MODE: &[u8] = &[
    0xE6, 0x00, 0x30, 0x00, 0x00, 0x00, 0x10, 0x00, 0x05, 0x1A, 0x00, 0x00, 0xFF, 0x00, 0x00,
    0xFF, 0x00, 0x00, 0xFF,
];

const VIDEO_MODE: &[u8] = &[
    0xE6, 0x00, 0x3C, 0x00, 0x00, 0x00, 0x14, 0x00, 0x0A, 0x20, 0x04, 0x02, 0xFA, 0x02, 0x04,
    0xFA, 0x04, 0x02, 0xFA,
];

const VIDEO_WARM_MODE: &[u8] = &[
    0xE6, 0x00, 0x3C, 0x00, 0x00, 0x00, 0x14, 0x00, 0x0A, 0x20, 0x04, 0x02, 0xFF, 0x02, 0x04,
    0xEE, 0x04, 0x02, 0xDF,
];

const VIDEO_COLD_MODE: &[u8] = &[
    0xE6, 0x00, 0x3C, 0x00, 0x00, 0x00, 0x14, 0x00, 0x0A, 0x20, 0x04, 0x02, 0xE4, 0x02, 0x04,
    0xF0, 0x04, 0x02, 0xFF,
];

const NAVI_MODE: &[u8] = &[
    0xE6, 0x00, 0x20, 0x00, 0x00, 0x00, 0x0C, 0x00, 0x04, 0x18, 0x00, 0x00, 0xFF, 0x00, 0x00,
    0xFF, 0x00, 0x00, 0xFF,
];

const GALLERY_MODE: &[u8] = &[
    0xE6, 0x00, 0x38, 0x00, 0x00, 0x00, 0x12, 0x00, 0x08, 0x1C, 0x02, 0x01, 0xFC, 0x01, 0x02,
    0xFC, 0x02, 0x01, 0xFC,
];

const VT_MODE: &[u8] = &[
    0xE6, 0x00, 0x34, 0x00, 0x00, 0x00, 0x18, 0x00, 0x06, 0x1A, 0x00, 0x00, 0xFF, 0x00, 0x00,
    0xFF, 0x00, 0x00, 0xFF,
];

#[cfg(feature = "isdbt")]
const ISDBT_SOCCER_MODE: &[u8] = &[
    0xE6, 0x00, 0x3C, 0x00, 0x00, 0x00, 0x1C, 0x00, 0x0C, 0x24, 0x06, 0x03, 0xF8, 0x03, 0x06,
    0xF8, 0x06, 0x03, 0xF8,
];

/// mDNIe inversion profile used by Himax panels for negative mode.
///
/// Placeholder layout like the scenario blobs above, not vendor data.
const MDNIE_NEGATIVE_MODE: &[u8] = &[
    0xE6, 0x01, 0x30, 0x00, 0x00, 0x00, 0x10, 0x00, 0x05, 0x1A, 0xFF, 0xFF, 0x00, 0xFF, 0xFF,
    0x00, 0xFF, 0xFF, 0x00,
];

// DCS enter/exit invert mode.
const DCS_INVERT_ON: &[u8] = &[0x21, 0x00];
const DCS_INVERT_OFF: &[u8] = &[0x20, 0x00];

/// Scenario entries with panel data. Scenarios missing here (camera, browser,
/// e-book, e-mail, DMB, browser tones) have no tuning on this panel.
const SCENARIOS: &[(Scenario, &[u8])] = &[
    (Scenario::Ui, UI_MODE),
    (Scenario::Video, VIDEO_MODE),
    (Scenario::VideoWarm, VIDEO_WARM_MODE),
    (Scenario::VideoCold, VIDEO_COLD_MODE),
    (Scenario::Navi, NAVI_MODE),
    (Scenario::Gallery, GALLERY_MODE),
    (Scenario::Vt, VT_MODE),
    #[cfg(feature = "isdbt")]
    (Scenario::IsdbtSoccer, ISDBT_SOCCER_MODE),
];

/// Read-only mapping from resolved mode to the bytes to send.
#[derive(Debug)]
pub struct CommandTable {
    scenarios: &'static [(Scenario, &'static [u8])],
    blind: Option<&'static [u8]>,
    negative_on: &'static [u8],
    negative_off: Option<&'static [u8]>,
}

static GENERIC: CommandTable = CommandTable {
    scenarios: SCENARIOS,
    blind: None,
    negative_on: DCS_INVERT_ON,
    negative_off: Some(DCS_INVERT_OFF),
};

static HIMAX: CommandTable = CommandTable {
    scenarios: SCENARIOS,
    blind: None,
    negative_on: MDNIE_NEGATIVE_MODE,
    negative_off: None,
};

impl CommandTable {
    /// The table for a panel variant.
    pub fn for_variant(variant: PanelVariant) -> &'static CommandTable {
        match variant {
            PanelVariant::Generic => &GENERIC,
            PanelVariant::Himax => &HIMAX,
        }
    }

    /// Bytes for a resolved mode, or `None` if the panel has no data for it.
    pub fn lookup(&self, mode: ResolvedMode) -> Option<&'static [u8]> {
        match mode {
            ResolvedMode::Scenario(scenario) => self
                .scenarios
                .iter()
                .find(|(s, _)| *s == scenario)
                .map(|(_, bytes)| *bytes),
            ResolvedMode::Blind => self.blind,
        }
    }

    /// Command that enters negative mode.
    pub fn negative_on(&self) -> &'static [u8] {
        self.negative_on
    }

    /// Command that leaves negative mode, if the panel needs one.
    ///
    /// Himax panels leave negative mode by re-applying a scenario table.
    pub fn negative_off(&self) -> Option<&'static [u8]> {
        self.negative_off
    }
}
