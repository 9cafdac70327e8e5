//! Mock panel for testing.

#[cfg(feature = "cabc")]
use crate::dsi::CabcControl;
use crate::dsi::{DisplayPower, DsiCommand, DsiTransmit};
use crate::error::ControllerError;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct PanelState {
    powered_off: bool,
    failing: bool,
    sent: Vec<DsiCommand>,
    cabc: bool,
}

/// A mock panel for testing.
///
/// Implements the power and DSI collaborators and records every command the
/// controller sends, so code driving an
/// [`MdnieController`](crate::MdnieController) can be tested without hardware.
///
/// # Example
///
/// ```
/// use mdnie_core::{DsiCommand, DsiTransmit, MockPanel};
///
/// let panel = MockPanel::new();
/// panel.send(&[DsiCommand::long_write(&[0x21, 0x00])]).unwrap();
/// assert_eq!(panel.last_payload(), Some(&[0x21u8, 0x00][..]));
/// ```
pub struct MockPanel {
    state: Mutex<PanelState>,
}

impl MockPanel {
    /// Create a powered-on panel with nothing sent yet.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PanelState::default()),
        }
    }

    /// Simulate suspend (`false`) or resume (`true`).
    pub fn set_powered(&self, powered: bool) {
        self.state.lock().unwrap().powered_off = !powered;
    }

    /// Make every subsequent transmission fail.
    pub fn set_failing(&self, failing: bool) {
        self.state.lock().unwrap().failing = failing;
    }

    /// All commands sent so far, in order.
    pub fn sent(&self) -> Vec<DsiCommand> {
        self.state.lock().unwrap().sent.clone()
    }

    /// Payload of the most recent command.
    pub fn last_payload(&self) -> Option<&'static [u8]> {
        self.state.lock().unwrap().sent.last().map(|c| c.payload)
    }

    /// Forget all recorded commands.
    pub fn clear(&self) {
        self.state.lock().unwrap().sent.clear();
    }
}

impl Default for MockPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPower for MockPanel {
    fn is_powered_on(&self) -> bool {
        !self.state.lock().unwrap().powered_off
    }
}

impl DsiTransmit for MockPanel {
    fn send(&self, commands: &[DsiCommand]) -> Result<(), ControllerError> {
        let mut state = self.state.lock().unwrap();
        if state.failing {
            return Err(ControllerError::Transmit("mock link failure".into()));
        }
        state.sent.extend_from_slice(commands);
        Ok(())
    }
}

#[cfg(feature = "cabc")]
impl CabcControl for MockPanel {
    fn cabc_enabled(&self) -> bool {
        self.state.lock().unwrap().cabc
    }

    fn set_cabc(&self, enabled: bool) {
        self.state.lock().unwrap().cabc = enabled;
    }
}
