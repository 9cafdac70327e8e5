//! The `mdnie` attribute device.
//!
//! User space tunes the engine through a handful of text attributes, in the
//! style of sysfs device files. Reads return a human-readable line. Writes
//! always report the whole input as consumed: invalid values are logged and
//! dropped, never bounced back to the writer.

use crate::controller::{COLOR_MATRIX_ENTRIES, MdnieController};
use crate::error::ControllerError;
use crate::modes::{AccessibilityCommand, Background, Negative, Outdoor, Scenario};

use log::{debug, info, warn};
use std::sync::Arc;

/// Name of the device the attributes hang off.
pub const DEVICE_NAME: &str = "mdnie";

/// File mode every attribute is created with.
pub const ATTRIBUTE_PERMISSIONS: u32 = 0o664;

// =============================================================================
// Attribute
// =============================================================================

/// One attribute of the `mdnie` device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    /// Background style.
    Mode,
    /// Content scenario.
    Scenario,
    /// Outdoor enhancement.
    Outdoor,
    /// Playback-speed flag.
    Playspeed,
    /// Negative mode.
    Negative,
    /// Accessibility command plus color-blind matrix.
    Accessibility,
    /// Tuning file selection. Accepted and logged only.
    UserSelectFileCmd,
    /// Tuning reset to the UI scenario.
    InitFileCmd,
    /// Panel CABC.
    #[cfg(feature = "cabc")]
    Cabc,
}

impl Attribute {
    /// Every attribute, in registration order.
    pub const ALL: &'static [Attribute] = &[
        Attribute::Scenario,
        Attribute::UserSelectFileCmd,
        Attribute::InitFileCmd,
        Attribute::Mode,
        Attribute::Outdoor,
        Attribute::Playspeed,
        #[cfg(feature = "cabc")]
        Attribute::Cabc,
        Attribute::Accessibility,
        Attribute::Negative,
    ];

    /// File name of the attribute.
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Mode => "mode",
            Attribute::Scenario => "scenario",
            Attribute::Outdoor => "outdoor",
            Attribute::Playspeed => "playspeed",
            Attribute::Negative => "negative",
            Attribute::Accessibility => "accessibility",
            Attribute::UserSelectFileCmd => "mdnieset_user_select_file_cmd",
            Attribute::InitFileCmd => "mdnieset_init_file_cmd",
            #[cfg(feature = "cabc")]
            Attribute::Cabc => "cabc",
        }
    }

    /// Look an attribute up by file name.
    ///
    /// # Errors
    /// Returns [`ControllerError::UnknownAttribute`] if no attribute has that name.
    pub fn from_name(name: &str) -> Result<Self, ControllerError> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.name() == name)
            .ok_or_else(|| ControllerError::UnknownAttribute(name.to_string()))
    }
}

// =============================================================================
// TuningDevice
// =============================================================================

/// The `mdnie` device: text attributes over an [`MdnieController`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use mdnie_core::{MdnieController, MockPanel, PanelConfig, TuningDevice};
///
/// let panel = Arc::new(MockPanel::new());
/// let controller = Arc::new(MdnieController::new(
///     PanelConfig::default(),
///     panel.clone(),
///     panel.clone(),
/// ));
/// let device = TuningDevice::register(controller);
///
/// assert_eq!(device.store("scenario", "1\n")?, 2);
/// assert_eq!(device.show("scenario")?, "Current Scenario Mode : VIDEO_MODE\n");
/// # Ok::<(), mdnie_core::ControllerError>(())
/// ```
pub struct TuningDevice {
    controller: Arc<MdnieController>,
}

impl TuningDevice {
    /// Create the device with all its attributes and enable the engine.
    pub fn register(controller: Arc<MdnieController>) -> Self {
        debug!("creating {} device", DEVICE_NAME);
        for attr in Attribute::ALL {
            debug!(
                "created attribute {}/{} ({:o})",
                DEVICE_NAME,
                attr.name(),
                ATTRIBUTE_PERMISSIONS
            );
        }
        controller.set_enabled(true);
        info!("{} device registered", DEVICE_NAME);

        Self { controller }
    }

    /// The controller behind the attributes.
    pub fn controller(&self) -> &Arc<MdnieController> {
        &self.controller
    }

    /// Read an attribute by name.
    ///
    /// # Errors
    /// Returns [`ControllerError::UnknownAttribute`] for unknown names, or
    /// [`ControllerError::CabcUnavailable`] when reading `cabc` without panel support.
    pub fn show(&self, name: &str) -> Result<String, ControllerError> {
        self.read(Attribute::from_name(name)?)
    }

    /// Write an attribute by name, returning the number of bytes consumed.
    ///
    /// # Errors
    /// Returns [`ControllerError::UnknownAttribute`] for unknown names. Any
    /// other failure is logged and the input still counts as consumed.
    pub fn store(&self, name: &str, input: &str) -> Result<usize, ControllerError> {
        Ok(self.write(Attribute::from_name(name)?, input))
    }

    /// Read an attribute.
    ///
    /// # Errors
    /// Returns [`ControllerError::CabcUnavailable`] when reading `cabc` without panel support.
    pub fn read(&self, attr: Attribute) -> Result<String, ControllerError> {
        let state = self.controller.state();
        let text = match attr {
            Attribute::Mode => {
                format!("Current Background Mode : {}\n", state.background.name())
            }
            Attribute::Scenario => {
                format!("Current Scenario Mode : {}\n", state.scenario.name())
            }
            Attribute::Outdoor => format!(
                "Current outdoor Value : {}\n",
                enabled_str(state.outdoor == Outdoor::On)
            ),
            Attribute::Negative => format!(
                "Current negative Value : {}\n",
                enabled_str(state.negative.is_on())
            ),
            // Accessibility reads back the playback-speed flag.
            Attribute::Playspeed | Attribute::Accessibility => {
                format!("{}\n", self.controller.play_speed())
            }
            Attribute::UserSelectFileCmd => "0\n".to_string(),
            Attribute::InitFileCmd => "mdnieset_init_file_cmd_show\n".to_string(),
            #[cfg(feature = "cabc")]
            Attribute::Cabc => format!("{}\n", u8::from(self.controller.cabc_enabled()?)),
        };
        Ok(text)
    }

    /// Write an attribute, returning the number of bytes consumed.
    ///
    /// This is always `input.len()`; rejected values are only logged.
    pub fn write(&self, attr: Attribute, input: &str) -> usize {
        if let Err(e) = self.try_write(attr, input) {
            warn!("{}: {}", attr.name(), e);
        }
        input.len()
    }

    fn try_write(&self, attr: Attribute, input: &str) -> Result<(), ControllerError> {
        let mut scan = Scanner::new(input);
        let parse_err = || ControllerError::Parse {
            attribute: attr.name(),
            input: input.to_string(),
        };

        match attr {
            Attribute::Mode => {
                let value = scan.next_int().ok_or_else(parse_err)?;
                debug!("set background mode: {}", value);
                self.controller.set_background(Background::try_from(value)?)
            }
            Attribute::Scenario => {
                let value = scan.next_int().ok_or_else(parse_err)?;
                debug!("set scenario: {}", value);
                self.controller.set_scenario(Scenario::from_code(value)?)
            }
            Attribute::Outdoor => {
                let value = scan.next_int().ok_or_else(parse_err)?;
                debug!("set outdoor: {}", value);
                self.controller.set_outdoor(Outdoor::try_from(value)?)
            }
            Attribute::Playspeed => {
                let value = scan.next_int().ok_or_else(parse_err)?;
                self.controller.set_play_speed(value);
                Ok(())
            }
            Attribute::Negative => {
                let value = scan.next_int().ok_or_else(parse_err)?;
                debug!("set negative: {}", value);
                self.controller.set_negative(Negative::try_from(value)?)
            }
            Attribute::Accessibility => {
                let command = scan.next_int().ok_or_else(parse_err)?;
                let mut matrix = [0i16; COLOR_MATRIX_ENTRIES];
                for entry in matrix.iter_mut() {
                    match scan.next_hex() {
                        // Only the low 16 bits of each entry are meaningful.
                        Some(value) => *entry = (value & 0xFFFF) as u16 as i16,
                        None => break,
                    }
                }
                debug!("accessibility command {}, matrix {:?}", command, matrix);

                match AccessibilityCommand::try_from(command) {
                    Ok(command) => self.controller.set_accessibility(command, &matrix),
                    Err(e) => {
                        warn!("{}", e);
                        self.controller.resume_negative_state()
                    }
                }
            }
            Attribute::UserSelectFileCmd => {
                let value = scan.next_int().ok_or_else(parse_err)?;
                debug!("user select file cmd: {}", value);
                Ok(())
            }
            Attribute::InitFileCmd => {
                let value = scan.next_int().ok_or_else(parse_err)?;
                debug!("init file cmd: {}", value);
                if value == 0 {
                    self.controller.set_scenario(Scenario::Ui)
                } else {
                    warn!("init file cmd value is wrong: {}", value);
                    self.controller.reapply_scenario()
                }
            }
            #[cfg(feature = "cabc")]
            Attribute::Cabc => {
                let current = self.controller.cabc_enabled()?;
                let requested = match (input.strip_suffix('\n').unwrap_or(input), current) {
                    ("1", false) => true,
                    ("0", true) => false,
                    _ => {
                        warn!("cabc: invalid argument {:?}", input);
                        current
                    }
                };
                self.controller.set_cabc(requested)
            }
        }
    }
}

fn enabled_str(on: bool) -> &'static str {
    if on { "Enabled" } else { "Disabled" }
}

// =============================================================================
// Input scanning
// =============================================================================

/// Reads whitespace-separated decimal and hex fields from attribute input.
///
/// Each field is read up to the first character that cannot continue it;
/// anything after that is left for the next field.
struct Scanner<'a> {
    rest: &'a str,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self { rest: input }
    }

    /// A signed decimal integer.
    fn next_int(&mut self) -> Option<i32> {
        let s = self.rest.trim_start();
        let sign_len = usize::from(s.starts_with(['+', '-']));
        let digits = s[sign_len..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        if digits == 0 {
            return None;
        }
        let (field, rest) = s.split_at(sign_len + digits);
        self.rest = rest;
        field.parse().ok()
    }

    /// An unsigned hex integer, with or without a `0x` prefix.
    fn next_hex(&mut self) -> Option<u32> {
        let s = self.rest.trim_start();
        let body = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .filter(|b| b.starts_with(|c: char| c.is_ascii_hexdigit()))
            .unwrap_or(s);
        let digits = body.bytes().take_while(u8::is_ascii_hexdigit).count();
        if digits == 0 {
            return None;
        }
        let (field, rest) = body.split_at(digits);
        self.rest = rest;
        // Wider values keep their low 32 bits.
        u32::from_str_radix(&field[field.len().saturating_sub(8)..], 16).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_int() {
        let mut scan = Scanner::new("  12abc");
        assert_eq!(scan.next_int(), Some(12));
        assert_eq!(scan.next_int(), None);

        let mut scan = Scanner::new("-3 +4\n");
        assert_eq!(scan.next_int(), Some(-3));
        assert_eq!(scan.next_int(), Some(4));
        assert_eq!(scan.next_int(), None);

        assert_eq!(Scanner::new("").next_int(), None);
        assert_eq!(Scanner::new("-").next_int(), None);
        assert_eq!(Scanner::new("99999999999").next_int(), None);
    }

    #[test]
    fn test_scanner_hex() {
        let mut scan = Scanner::new("ff 0x1A2b\t10 zz");
        assert_eq!(scan.next_hex(), Some(0xFF));
        assert_eq!(scan.next_hex(), Some(0x1A2B));
        assert_eq!(scan.next_hex(), Some(0x10));
        assert_eq!(scan.next_hex(), None);
    }

    #[test]
    fn test_attribute_names_round_trip() {
        for attr in Attribute::ALL {
            assert_eq!(Attribute::from_name(attr.name()), Ok(*attr));
        }
        assert_eq!(
            Attribute::from_name("brightness"),
            Err(ControllerError::UnknownAttribute("brightness".into()))
        );
    }
}
