//! Panel link abstraction.
//!
//! The controller never talks to hardware directly. It is handed two
//! collaborators from the display driver:
//!
//! - [`DisplayPower`] reports whether the panel is out of suspend
//! - [`DsiTransmit`] pushes command packets over the DSI link
//!
//! Both must be `Send + Sync` since attribute writes and the resume path can
//! arrive on different threads.

use crate::error::ControllerError;

/// MIPI DSI packet data types used by the tuning commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// DCS long write.
    DcsLongWrite = 0x39,
}

impl DataType {
    /// The on-wire data type identifier.
    pub fn id(self) -> u8 {
        self as u8
    }
}

/// A single DSI command packet.
///
/// Tuning payloads are static panel data, so a command only borrows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DsiCommand {
    /// Packet data type.
    pub data_type: DataType,
    /// Whether this is the last packet of the batch.
    pub last: bool,
    /// Virtual channel.
    pub channel: u8,
    /// Whether the host requests an acknowledge.
    pub ack: bool,
    /// Delay after the packet, in milliseconds.
    pub wait_ms: u16,
    /// Packet payload; the first byte is the DCS command.
    pub payload: &'static [u8],
}

impl DsiCommand {
    /// A DCS long write carrying `payload`, the shape every mDNIe command uses.
    pub const fn long_write(payload: &'static [u8]) -> Self {
        Self {
            data_type: DataType::DcsLongWrite,
            last: true,
            channel: 0,
            ack: false,
            wait_ms: 0,
            payload,
        }
    }
}

/// Display power state, as tracked by the framebuffer driver.
pub trait DisplayPower: Send + Sync {
    /// Whether the panel is resumed and able to accept commands.
    fn is_powered_on(&self) -> bool;
}

/// Blocking transmitter for DSI command packets.
pub trait DsiTransmit: Send + Sync {
    /// Send `commands` to the panel.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Transmit`] if the link reports a failure.
    /// The controller only logs it; there is no retry.
    fn send(&self, commands: &[DsiCommand]) -> Result<(), ControllerError>;
}

/// Panel-side content adaptive backlight control.
#[cfg(feature = "cabc")]
pub trait CabcControl: Send + Sync {
    /// Whether CABC is currently enabled on the panel.
    fn cabc_enabled(&self) -> bool;

    /// Switch CABC on or off.
    fn set_cabc(&self, enabled: bool);
}
