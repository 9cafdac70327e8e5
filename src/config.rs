//! Panel configuration.

/// Manufacturer id reported by the Himax HX8369B WVGA panel.
pub const HIMAX_MANUFACTURER_ID: u32 = 0x55c090;

/// Which command family the panel understands for negative mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelVariant {
    /// Panels that invert through the standard DCS inversion commands.
    #[default]
    Generic,
    /// Himax LDI, which inverts through an mDNIe tuning table instead.
    Himax,
}

impl PanelVariant {
    /// Identify the variant from the panel's manufacturer id.
    pub fn from_manufacturer_id(id: u32) -> Self {
        if id == HIMAX_MANUFACTURER_ID {
            PanelVariant::Himax
        } else {
            PanelVariant::Generic
        }
    }
}

/// Static description of the attached panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelConfig {
    /// Manufacturer id read from the panel when the driver binds.
    pub manufacturer_id: u32,
}

impl PanelConfig {
    /// Create a config for a panel with the given manufacturer id.
    pub fn new(manufacturer_id: u32) -> Self {
        Self { manufacturer_id }
    }

    /// The panel variant implied by the manufacturer id.
    pub fn variant(&self) -> PanelVariant {
        PanelVariant::from_manufacturer_id(self.manufacturer_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_from_manufacturer_id() {
        assert_eq!(PanelConfig::new(0x55c090).variant(), PanelVariant::Himax);
        assert_eq!(PanelConfig::new(0x55c091).variant(), PanelVariant::Generic);
        assert_eq!(PanelConfig::default().variant(), PanelVariant::Generic);
    }
}
