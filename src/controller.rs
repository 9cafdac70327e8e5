//! mDNIe mode controller.

use crate::config::{PanelConfig, PanelVariant};
#[cfg(feature = "cabc")]
use crate::dsi::CabcControl;
use crate::dsi::{DisplayPower, DsiCommand, DsiTransmit};
use crate::error::ControllerError;
use crate::modes::{
    Accessibility, AccessibilityCommand, Background, Negative, Outdoor, ResolvedMode, Scenario,
};
use crate::state::TuningState;
use crate::tables::CommandTable;

use log::{debug, error, info, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Number of entries in the color-blind correction matrix.
pub const COLOR_MATRIX_ENTRIES: usize = 9;

/// Packed size of the color-blind correction matrix in bytes.
pub const COLOR_MATRIX_LEN: usize = COLOR_MATRIX_ENTRIES * 2;

// =============================================================================
// Command Slot
// =============================================================================

/// The single in-flight tuning command.
#[derive(Debug, Default)]
struct CommandSlot {
    pending: Option<DsiCommand>,
}

impl CommandSlot {
    /// Populate the slot. It is cleared again when the guard drops.
    fn fill(&mut self, payload: &'static [u8]) -> SlotGuard<'_> {
        self.pending = Some(DsiCommand::long_write(payload));
        SlotGuard { slot: self }
    }
}

struct SlotGuard<'a> {
    slot: &'a mut CommandSlot,
}

impl SlotGuard<'_> {
    fn commands(&self) -> &[DsiCommand] {
        self.slot.pending.as_slice()
    }
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.slot.pending = None;
    }
}

// =============================================================================
// MdnieController
// =============================================================================

#[derive(Debug, Default)]
struct Inner {
    state: TuningState,
    play_speed: i32,
    color_matrix: Option<[u8; COLOR_MATRIX_LEN]>,
    slot: CommandSlot,
}

/// The mDNIe mode controller.
///
/// Holds the tuning state for one panel and turns every change into the DSI
/// command the panel needs. All state and the command slot sit behind a
/// single lock, so attribute writers and the resume path never interleave.
///
/// Negative mode masks everything else: while it is on, scenario, background
/// and outdoor changes are refused. Color-blind accessibility redirects every
/// scenario resolution to the blind profile.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use mdnie_core::{MdnieController, MockPanel, PanelConfig, Scenario};
///
/// let panel = Arc::new(MockPanel::new());
/// let controller = MdnieController::new(PanelConfig::default(), panel.clone(), panel.clone());
/// controller.set_enabled(true);
///
/// controller.set_scenario(Scenario::Video)?;
/// assert_eq!(panel.sent().len(), 1);
/// # Ok::<(), mdnie_core::ControllerError>(())
/// ```
pub struct MdnieController {
    variant: PanelVariant,
    table: &'static CommandTable,
    power: Arc<dyn DisplayPower>,
    dsi: Arc<dyn DsiTransmit>,
    #[cfg(feature = "cabc")]
    cabc: Option<Arc<dyn CabcControl>>,
    inner: Mutex<Inner>,
}

impl MdnieController {
    /// Bind a controller to the panel's power state and DSI link.
    ///
    /// The engine starts disabled with the default tuning state; it is
    /// enabled when the attribute device is registered.
    pub fn new(
        config: PanelConfig,
        power: Arc<dyn DisplayPower>,
        dsi: Arc<dyn DsiTransmit>,
    ) -> Self {
        let variant = config.variant();
        debug!(
            "mdnie init: manufacturer id {:#x}, variant {:?}",
            config.manufacturer_id, variant
        );

        Self {
            variant,
            table: CommandTable::for_variant(variant),
            power,
            dsi,
            #[cfg(feature = "cabc")]
            cabc: None,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Attach the panel's CABC control.
    #[cfg(feature = "cabc")]
    pub fn with_cabc(mut self, cabc: Arc<dyn CabcControl>) -> Self {
        self.cabc = Some(cabc);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The panel variant detected at bind time.
    pub fn variant(&self) -> PanelVariant {
        self.variant
    }

    /// Get a snapshot of the current tuning state.
    pub fn state(&self) -> TuningState {
        self.lock().state
    }

    /// Turn the engine on or off. While off, scenario changes are refused.
    pub fn set_enabled(&self, enabled: bool) {
        self.lock().state.enabled = enabled;
        debug!("mdnie engine {}", if enabled { "on" } else { "off" });
    }

    /// The playback-speed flag.
    pub fn play_speed(&self) -> i32 {
        self.lock().play_speed
    }

    /// Set the playback-speed flag. No command is sent.
    pub fn set_play_speed(&self, value: i32) {
        debug!("play speed set to {}", value);
        self.lock().play_speed = value;
    }

    /// The last color-blind matrix received, packed for the panel.
    pub fn color_blind_matrix(&self) -> Option<[u8; COLOR_MATRIX_LEN]> {
        self.lock().color_matrix
    }

    // -------------------------------------------------------------------------
    // Scenario resolution
    // -------------------------------------------------------------------------

    /// Resolve `scenario` to a command and send it, without storing it.
    ///
    /// Color-blind accessibility overrides `scenario` with the blind profile.
    /// Every resolution that gets past the guards clears the playback-speed
    /// flag.
    ///
    /// # Errors
    ///
    /// - [`ControllerError::PoweredOff`] if the panel is suspended
    /// - [`ControllerError::Disabled`] if the engine is off
    /// - [`ControllerError::NegativeActive`] if negative mode is on
    /// - [`ControllerError::NoCommandData`] if the panel has no table for the mode
    /// - [`ControllerError::Transmit`] if the DSI link fails
    pub fn apply_scenario(&self, scenario: Scenario) -> Result<(), ControllerError> {
        let mut inner = self.lock();
        self.apply_locked(&mut inner, scenario)
    }

    /// Re-apply the stored scenario.
    ///
    /// # Errors
    ///
    /// As [`apply_scenario`](Self::apply_scenario).
    pub fn reapply_scenario(&self) -> Result<(), ControllerError> {
        let mut inner = self.lock();
        let scenario = inner.state.scenario;
        self.apply_locked(&mut inner, scenario)
    }

    /// Store `scenario` and apply it.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::NegativeActive`] without touching the state
    /// while negative mode is on; otherwise as [`apply_scenario`](Self::apply_scenario).
    pub fn set_scenario(&self, scenario: Scenario) -> Result<(), ControllerError> {
        let mut inner = self.lock();
        if inner.state.negative.is_on() {
            debug!(
                "already negative mode, not setting scenario {}",
                scenario.name()
            );
            return Err(ControllerError::NegativeActive);
        }
        inner.state.scenario = scenario;
        self.apply_locked(&mut inner, scenario)
    }

    /// Store the background style and re-apply the current scenario.
    ///
    /// # Errors
    ///
    /// As [`set_scenario`](Self::set_scenario).
    pub fn set_background(&self, background: Background) -> Result<(), ControllerError> {
        let mut inner = self.lock();
        if inner.state.negative.is_on() {
            debug!(
                "already negative mode, not setting background {}",
                background.name()
            );
            return Err(ControllerError::NegativeActive);
        }
        inner.state.background = background;
        let scenario = inner.state.scenario;
        self.apply_locked(&mut inner, scenario)
    }

    /// Store the outdoor flag and re-apply the current scenario.
    ///
    /// # Errors
    ///
    /// As [`set_scenario`](Self::set_scenario).
    pub fn set_outdoor(&self, outdoor: Outdoor) -> Result<(), ControllerError> {
        let mut inner = self.lock();
        if inner.state.negative.is_on() {
            debug!("already negative mode, not setting outdoor {:?}", outdoor);
            return Err(ControllerError::NegativeActive);
        }
        inner.state.outdoor = outdoor;
        let scenario = inner.state.scenario;
        self.apply_locked(&mut inner, scenario)
    }

    fn apply_locked(&self, inner: &mut Inner, scenario: Scenario) -> Result<(), ControllerError> {
        debug!(
            "set mode start: scenario {}, background {}",
            scenario.name(),
            inner.state.background.name()
        );

        if !self.power.is_powered_on() {
            warn!("panel not resumed, not sending mipi cmd");
            return Err(ControllerError::PoweredOff);
        }
        if !inner.state.enabled {
            warn!("mdnie engine is off");
            return Err(ControllerError::Disabled);
        }
        if inner.state.negative.is_on() {
            debug!(
                "already negative mode, not setting background {}",
                inner.state.background.name()
            );
            return Err(ControllerError::NegativeActive);
        }

        inner.play_speed = 0;

        let mode = match inner.state.accessibility {
            Accessibility::ColorBlind => ResolvedMode::Blind,
            Accessibility::Off => ResolvedMode::Scenario(scenario),
        };

        let Some(payload) = self.table.lookup(mode) else {
            warn!("no data for {}", mode.name());
            return Err(ControllerError::NoCommandData(mode.name()));
        };

        info!("= {} =", mode.name());
        self.send_locked(inner, payload)?;

        debug!(
            "set mode end: mode {}, background {}",
            mode.name(),
            inner.state.background.name()
        );
        Ok(())
    }

    fn send_locked(&self, inner: &mut Inner, payload: &'static [u8]) -> Result<(), ControllerError> {
        let slot = inner.slot.fill(payload);

        if !self.power.is_powered_on() {
            warn!("panel powered off, dropping tuning cmd");
            return Err(ControllerError::PoweredOff);
        }

        for cmd in slot.commands() {
            debug!(
                "send tuning cmd: dtype {:#04x}, {} bytes {:02x?}",
                cmd.data_type.id(),
                cmd.payload.len(),
                cmd.payload
            );
        }
        self.dsi.send(slot.commands()).inspect_err(|e| {
            error!("tuning cmd failed: {}", e);
        })
    }

    // -------------------------------------------------------------------------
    // Negative and accessibility
    // -------------------------------------------------------------------------

    /// Enter or leave negative mode.
    ///
    /// Leaving sends the panel's exit command (if it has one) and then
    /// re-applies the stored scenario.
    ///
    /// # Errors
    ///
    /// Returns the first failure among the negative command and the scenario
    /// restore. The flag is stored either way.
    pub fn set_negative(&self, negative: Negative) -> Result<(), ControllerError> {
        let mut inner = self.lock();
        debug!(
            "negative {:?} -> {:?}, scenario {}",
            inner.state.negative,
            negative,
            inner.state.scenario.name()
        );
        inner.state.negative = negative;
        self.negative_locked(&mut inner)
    }

    /// Re-send the negative state after the panel resumes from suspend.
    ///
    /// Leaves negative mode with a scenario re-apply if it is off, so the
    /// panel's tuning is restored either way.
    ///
    /// # Errors
    ///
    /// As [`set_negative`](Self::set_negative).
    pub fn resume_negative_state(&self) -> Result<(), ControllerError> {
        let mut inner = self.lock();
        debug!("resume: negative mode {:?}", inner.state.negative);
        if !inner.state.negative.is_on() {
            debug!("negative off on resume, tuning again");
        }
        self.negative_locked(&mut inner)
    }

    /// Apply an accessibility command.
    ///
    /// `matrix` is the color-blind correction matrix. It is packed and kept
    /// (see [`color_blind_matrix`](Self::color_blind_matrix)) but the panel
    /// tables carry the blind profile, so it is not sent.
    ///
    /// # Errors
    ///
    /// As [`resume_negative_state`](Self::resume_negative_state).
    pub fn set_accessibility(
        &self,
        command: AccessibilityCommand,
        matrix: &[i16; COLOR_MATRIX_ENTRIES],
    ) -> Result<(), ControllerError> {
        let mut inner = self.lock();
        inner.color_matrix = Some(pack_color_matrix(matrix));

        let (negative, accessibility) = match command {
            AccessibilityCommand::Negative => (Negative::On, Accessibility::Off),
            AccessibilityCommand::ColorBlind => (Negative::Off, Accessibility::ColorBlind),
            AccessibilityCommand::Off => (Negative::Off, Accessibility::Off),
        };
        inner.state.negative = negative;
        inner.state.accessibility = accessibility;
        info!("accessibility {:?}", command);

        self.negative_locked(&mut inner)
    }

    fn negative_locked(&self, inner: &mut Inner) -> Result<(), ControllerError> {
        if inner.state.negative.is_on() {
            info!("= NEGATIVE MODE =");
            let payload = self.table.negative_on();
            return self.send_locked(inner, payload);
        }

        let exit = match self.table.negative_off() {
            Some(payload) => self.send_locked(inner, payload),
            None => Ok(()),
        };
        let scenario = inner.state.scenario;
        let restore = self.apply_locked(inner, scenario);
        exit.and(restore)
    }

    // -------------------------------------------------------------------------
    // CABC
    // -------------------------------------------------------------------------

    /// Whether CABC is enabled on the panel.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::CabcUnavailable`] if no CABC control is attached.
    #[cfg(feature = "cabc")]
    pub fn cabc_enabled(&self) -> Result<bool, ControllerError> {
        self.cabc
            .as_ref()
            .map(|c| c.cabc_enabled())
            .ok_or(ControllerError::CabcUnavailable)
    }

    /// Switch CABC on the panel.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::CabcUnavailable`] if no CABC control is attached.
    #[cfg(feature = "cabc")]
    pub fn set_cabc(&self, enabled: bool) -> Result<(), ControllerError> {
        let cabc = self.cabc.as_ref().ok_or(ControllerError::CabcUnavailable)?;
        info!("CABC {}", if enabled { "on" } else { "off" });
        cabc.set_cabc(enabled);
        Ok(())
    }
}

/// Pack the color-blind matrix into the byte order the panel expects:
/// 16-bit little-endian, one entry after another.
pub fn pack_color_matrix(matrix: &[i16; COLOR_MATRIX_ENTRIES]) -> [u8; COLOR_MATRIX_LEN] {
    let mut packed = [0u8; COLOR_MATRIX_LEN];
    for (chunk, value) in packed.chunks_exact_mut(2).zip(matrix) {
        chunk.copy_from_slice(&value.to_le_bytes());
    }
    packed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_color_matrix() {
        let packed = pack_color_matrix(&[0x1234, -1, 0, 0, 0, 0, 0, 0, 0x00FF]);
        assert_eq!(&packed[..4], &[0x34u8, 0x12, 0xFF, 0xFF][..]);
        assert_eq!(&packed[16..], &[0xFFu8, 0x00][..]);
    }

    #[test]
    fn test_slot_cleared_on_drop() {
        let mut slot = CommandSlot::default();
        {
            let guard = slot.fill(&[0x21, 0x00]);
            assert_eq!(guard.commands().len(), 1);
            assert_eq!(guard.commands()[0].payload, &[0x21u8, 0x00][..]);
        }
        assert!(slot.pending.is_none());
    }
}
