//! Error types for the mDNIe controller.

/// Errors that can occur when driving the mDNIe block.
///
/// Attribute writes never surface these to their caller; they are logged and
/// the write still reports the full input length as consumed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    /// The panel is suspended, so no DSI command can be sent.
    #[error("Panel is powered off - not sending DSI command")]
    PoweredOff,

    /// The mDNIe engine has not been enabled yet.
    #[error("mDNIe engine is disabled")]
    Disabled,

    /// Negative mode is active and masks every other mode.
    #[error("Negative mode is active - mode change suppressed")]
    NegativeActive,

    /// The panel has no tuning data for the resolved mode.
    #[error("No command data for {0}")]
    NoCommandData(&'static str),

    /// A scenario code outside the known range.
    #[error("Invalid scenario value {0}")]
    InvalidScenario(i32),

    /// A background mode outside 0-3.
    #[error("Invalid background mode value {0}")]
    InvalidBackground(i32),

    /// An outdoor value other than 0 or 1.
    #[error("Invalid outdoor mode value {0}")]
    InvalidOutdoor(i32),

    /// A negative value other than 0 or 1.
    #[error("Invalid negative value {0}")]
    InvalidNegative(i32),

    /// An accessibility command selector outside the known range.
    #[error("Invalid accessibility command {0}")]
    InvalidAccessibility(i32),

    /// Attribute input that could not be parsed.
    #[error("Failed to parse {attribute} input {input:?}")]
    Parse {
        /// The attribute being written.
        attribute: &'static str,
        /// The raw input.
        input: String,
    },

    /// No attribute with this name is registered.
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    /// The DSI link reported a failure.
    #[error("DSI transmission failed: {0}")]
    Transmit(String),

    /// The panel does not expose CABC control.
    #[error("CABC control is not available on this panel")]
    CabcUnavailable,
}
