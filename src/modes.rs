//! Mode definitions: scenarios, background styles and the accessibility flags.

use crate::error::ControllerError;

// =============================================================================
// Scenario
// =============================================================================

/// Content-context enhancement profile.
///
/// User space selects a scenario through the `scenario` attribute using the
/// signal codes returned by [`Scenario::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scenario {
    /// Default UI profile.
    #[default]
    Ui,
    /// Video playback.
    Video,
    /// Video playback, warm tone.
    VideoWarm,
    /// Video playback, cold tone.
    VideoCold,
    /// Camera preview.
    Camera,
    /// Navigation.
    Navi,
    /// Gallery.
    Gallery,
    /// Video telephony.
    Vt,
    /// Web browser.
    Browser,
    /// E-book reader.
    Ebook,
    /// E-mail client.
    Email,
    /// DMB broadcast.
    #[cfg(feature = "dmb")]
    Dmb,
    /// DMB broadcast, warm tone.
    #[cfg(feature = "dmb")]
    DmbWarm,
    /// DMB broadcast, cold tone.
    #[cfg(feature = "dmb")]
    DmbCold,
    /// ISDB-T soccer broadcast.
    #[cfg(feature = "isdbt")]
    IsdbtSoccer,
    /// Browser tone 1.
    #[cfg(feature = "browser-tone")]
    BrowserTone1,
    /// Browser tone 2.
    #[cfg(feature = "browser-tone")]
    BrowserTone2,
    /// Browser tone 3.
    #[cfg(feature = "browser-tone")]
    BrowserTone3,
}

impl Scenario {
    /// Every scenario compiled into this build.
    pub const ALL: &'static [Scenario] = &[
        Scenario::Ui,
        Scenario::Video,
        Scenario::VideoWarm,
        Scenario::VideoCold,
        Scenario::Camera,
        Scenario::Navi,
        Scenario::Gallery,
        Scenario::Vt,
        Scenario::Browser,
        Scenario::Ebook,
        Scenario::Email,
        #[cfg(feature = "dmb")]
        Scenario::Dmb,
        #[cfg(feature = "dmb")]
        Scenario::DmbWarm,
        #[cfg(feature = "dmb")]
        Scenario::DmbCold,
        #[cfg(feature = "isdbt")]
        Scenario::IsdbtSoccer,
        #[cfg(feature = "browser-tone")]
        Scenario::BrowserTone1,
        #[cfg(feature = "browser-tone")]
        Scenario::BrowserTone2,
        #[cfg(feature = "browser-tone")]
        Scenario::BrowserTone3,
    ];

    /// The signal code user space writes to select this scenario.
    pub fn code(self) -> i32 {
        match self {
            Scenario::Ui => 0,
            Scenario::Video => 1,
            Scenario::VideoWarm => 2,
            Scenario::VideoCold => 3,
            Scenario::Camera => 4,
            Scenario::Navi => 5,
            Scenario::Gallery => 6,
            Scenario::Vt => 7,
            Scenario::Browser => 8,
            Scenario::Ebook => 9,
            Scenario::Email => 10,
            #[cfg(feature = "dmb")]
            Scenario::Dmb => 20,
            #[cfg(feature = "dmb")]
            Scenario::DmbWarm => 21,
            #[cfg(feature = "dmb")]
            Scenario::DmbCold => 22,
            #[cfg(feature = "isdbt")]
            Scenario::IsdbtSoccer => 30,
            #[cfg(feature = "browser-tone")]
            Scenario::BrowserTone1 => 40,
            #[cfg(feature = "browser-tone")]
            Scenario::BrowserTone2 => 41,
            #[cfg(feature = "browser-tone")]
            Scenario::BrowserTone3 => 42,
        }
    }

    /// Map a signal code back to a scenario.
    ///
    /// # Errors
    /// Returns [`ControllerError::InvalidScenario`] for codes with no scenario
    /// in this build.
    pub fn from_code(code: i32) -> Result<Self, ControllerError> {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.code() == code)
            .ok_or(ControllerError::InvalidScenario(code))
    }

    /// Display name, as reported by the `scenario` attribute.
    pub fn name(self) -> &'static str {
        match self {
            Scenario::Ui => "UI_MODE",
            Scenario::Video => "VIDEO_MODE",
            Scenario::VideoWarm => "VIDEO_WARM_MODE",
            Scenario::VideoCold => "VIDEO_COLD_MODE",
            Scenario::Camera => "CAMERA_MODE",
            Scenario::Navi => "NAVI",
            Scenario::Gallery => "GALLERY_MODE",
            Scenario::Vt => "VT_MODE",
            Scenario::Browser => "BROWSER",
            Scenario::Ebook => "eBOOK",
            Scenario::Email => "EMAIL",
            #[cfg(feature = "dmb")]
            Scenario::Dmb => "DMB_MODE",
            #[cfg(feature = "dmb")]
            Scenario::DmbWarm => "DMB_WARM_MODE",
            #[cfg(feature = "dmb")]
            Scenario::DmbCold => "DMB_COLD_MODE",
            #[cfg(feature = "isdbt")]
            Scenario::IsdbtSoccer => "ISDBT_SOCCER_MODE",
            #[cfg(feature = "browser-tone")]
            Scenario::BrowserTone1 => "BROWSER_TONE1",
            #[cfg(feature = "browser-tone")]
            Scenario::BrowserTone2 => "BROWSER_TONE2",
            #[cfg(feature = "browser-tone")]
            Scenario::BrowserTone3 => "BROWSER_TONE3",
        }
    }
}

// =============================================================================
// Resolved Mode
// =============================================================================

/// The mode a scenario change actually resolves to.
///
/// Color-blind accessibility overrides the stored scenario, so the command
/// table is keyed by this rather than by [`Scenario`] directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedMode {
    /// A regular scenario profile.
    Scenario(Scenario),
    /// The color-blind correction profile.
    Blind,
}

impl ResolvedMode {
    /// Display name used in log messages and errors.
    pub fn name(self) -> &'static str {
        match self {
            ResolvedMode::Scenario(s) => s.name(),
            ResolvedMode::Blind => "BLIND_MODE",
        }
    }
}

// =============================================================================
// Background
// =============================================================================

/// Screen-mode background style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
    /// Dynamic.
    Dynamic,
    /// Standard (default).
    #[default]
    Standard,
    /// Movie.
    Movie,
    /// Natural.
    Natural,
}

impl Background {
    /// Display name, as reported by the `mode` attribute.
    pub fn name(self) -> &'static str {
        match self {
            Background::Dynamic => "DYNAMIC",
            Background::Standard => "STANDARD",
            Background::Movie => "MOVIE",
            Background::Natural => "NATURAL",
        }
    }
}

impl TryFrom<i32> for Background {
    type Error = ControllerError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Background::Dynamic),
            1 => Ok(Background::Standard),
            2 => Ok(Background::Movie),
            3 => Ok(Background::Natural),
            _ => Err(ControllerError::InvalidBackground(value)),
        }
    }
}

// =============================================================================
// On/Off Flags
// =============================================================================

/// Outdoor visibility enhancement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outdoor {
    /// Off (default).
    #[default]
    Off,
    /// On.
    On,
}

impl TryFrom<i32> for Outdoor {
    type Error = ControllerError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Outdoor::Off),
            1 => Ok(Outdoor::On),
            _ => Err(ControllerError::InvalidOutdoor(value)),
        }
    }
}

/// Full color inversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Negative {
    /// Off (default).
    #[default]
    Off,
    /// On.
    On,
}

impl Negative {
    /// Whether inversion is active.
    pub fn is_on(self) -> bool {
        self == Negative::On
    }
}

impl TryFrom<i32> for Negative {
    type Error = ControllerError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Negative::Off),
            1 => Ok(Negative::On),
            _ => Err(ControllerError::InvalidNegative(value)),
        }
    }
}

/// Stored accessibility state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accessibility {
    /// Off (default).
    #[default]
    Off,
    /// Color-blind correction.
    ColorBlind,
}

/// Command selector written to the `accessibility` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessibilityCommand {
    /// Clear both negative and color-blind modes.
    Off,
    /// Enter negative mode.
    Negative,
    /// Enter color-blind mode.
    ColorBlind,
}

impl TryFrom<i32> for AccessibilityCommand {
    type Error = ControllerError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AccessibilityCommand::Off),
            1 => Ok(AccessibilityCommand::Negative),
            2 => Ok(AccessibilityCommand::ColorBlind),
            _ => Err(ControllerError::InvalidAccessibility(value)),
        }
    }
}
