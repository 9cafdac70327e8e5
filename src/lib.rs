//! Mode controller for the mDNIe lite image-enhancement block on MIPI DSI panels.
//!
//! The crate keeps the panel's tuning state (content scenario, background
//! style, outdoor, negative and color-blind modes) and turns every change into
//! the DSI command the panel needs. It talks to the display driver through two
//! small traits:
//!
//! - [`DisplayPower`] - is the panel resumed?
//! - [`DsiTransmit`] - send a command packet
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use mdnie_core::{MdnieController, MockPanel, Negative, PanelConfig, Scenario, TuningDevice};
//!
//! let panel = Arc::new(MockPanel::new());
//! let controller = Arc::new(MdnieController::new(
//!     PanelConfig::new(0x55c090),
//!     panel.clone(),
//!     panel.clone(),
//! ));
//!
//! // Registering the attribute device enables the engine
//! let device = TuningDevice::register(controller.clone());
//!
//! // Select the video scenario the way user space does
//! device.store("scenario", "1")?;
//! assert_eq!(controller.state().scenario, Scenario::Video);
//!
//! // Negative mode masks scenario changes until it is cleared
//! controller.set_negative(Negative::On)?;
//! device.store("scenario", "0")?;
//! assert_eq!(controller.state().scenario, Scenario::Video);
//! # Ok::<(), mdnie_core::ControllerError>(())
//! ```
//!
//! # Testing
//!
//! Use [`MockPanel`] to drive the controller without hardware. It records
//! every command sent:
//!
//! ```
//! use std::sync::Arc;
//! use mdnie_core::{MdnieController, MockPanel, PanelConfig, Scenario};
//!
//! let panel = Arc::new(MockPanel::new());
//! let controller = MdnieController::new(PanelConfig::default(), panel.clone(), panel.clone());
//! controller.set_enabled(true);
//! controller.set_scenario(Scenario::Gallery).unwrap();
//! assert_eq!(panel.sent().len(), 1);
//! ```

#![warn(missing_docs)]

mod attributes;
mod config;
mod controller;
mod dsi;
mod error;
mod mock;
mod modes;
mod state;
mod tables;

// Re-export public API
pub use attributes::{ATTRIBUTE_PERMISSIONS, Attribute, DEVICE_NAME, TuningDevice};
pub use config::{HIMAX_MANUFACTURER_ID, PanelConfig, PanelVariant};
pub use controller::{
    COLOR_MATRIX_ENTRIES, COLOR_MATRIX_LEN, MdnieController, pack_color_matrix,
};
#[cfg(feature = "cabc")]
pub use dsi::CabcControl;
pub use dsi::{DataType, DisplayPower, DsiCommand, DsiTransmit};
pub use error::ControllerError;
pub use mock::MockPanel;
pub use modes::{
    Accessibility, AccessibilityCommand, Background, Negative, Outdoor, ResolvedMode, Scenario,
};
pub use state::TuningState;
pub use tables::CommandTable;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn setup(manufacturer_id: u32) -> (Arc<MockPanel>, TuningDevice) {
        init_logger();
        let panel = Arc::new(MockPanel::new());
        let controller = Arc::new(MdnieController::new(
            PanelConfig::new(manufacturer_id),
            panel.clone(),
            panel.clone(),
        ));
        (panel, TuningDevice::register(controller))
    }

    fn table_bytes(scenario: Scenario) -> &'static [u8] {
        CommandTable::for_variant(PanelVariant::Generic)
            .lookup(ResolvedMode::Scenario(scenario))
            .unwrap()
    }

    #[test]
    fn test_defaults_after_register() {
        let (panel, device) = setup(0);
        let state = device.controller().state();

        assert!(state.enabled);
        assert_eq!(state.scenario, Scenario::Ui);
        assert_eq!(state.background, Background::Standard);
        assert_eq!(state.outdoor, Outdoor::Off);
        assert_eq!(state.negative, Negative::Off);
        assert_eq!(state.accessibility, Accessibility::Off);
        assert!(panel.sent().is_empty());
    }

    #[test]
    fn test_disabled_engine_sends_nothing() {
        init_logger();
        let panel = Arc::new(MockPanel::new());
        let controller = MdnieController::new(PanelConfig::default(), panel.clone(), panel.clone());

        assert_eq!(
            controller.apply_scenario(Scenario::Video),
            Err(ControllerError::Disabled)
        );
        assert!(panel.sent().is_empty());
    }

    #[test]
    fn test_write_scenario_sends_video_table() {
        let (panel, device) = setup(0);

        assert_eq!(device.store("scenario", "1").unwrap(), 1);

        assert_eq!(device.controller().state().scenario, Scenario::Video);
        assert_eq!(panel.last_payload(), Some(table_bytes(Scenario::Video)));

        let sent = panel.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].data_type, DataType::DcsLongWrite);
        assert_eq!(sent[0].data_type.id(), 0x39);
        assert!(sent[0].last);
    }

    #[test]
    fn test_invalid_scenario_codes_change_nothing() {
        let (panel, device) = setup(0);
        device.store("scenario", "6").unwrap();
        panel.clear();
        let before = device.controller().state();

        for input in ["-1", "11", "99", "abc", ""] {
            assert_eq!(device.store("scenario", input).unwrap(), input.len());
        }

        assert_eq!(device.controller().state(), before);
        assert!(panel.sent().is_empty());
    }

    #[test]
    fn test_negative_blocks_mode_changes() {
        let (panel, device) = setup(0);
        device.store("scenario", "7").unwrap();
        device.store("negative", "1").unwrap();
        let before = device.controller().state();
        panel.clear();

        device.store("scenario", "1").unwrap();
        device.store("mode", "0").unwrap();
        device.store("outdoor", "1").unwrap();

        let after = device.controller().state();
        assert_eq!(after.scenario, before.scenario);
        assert_eq!(after.background, before.background);
        assert_eq!(after.outdoor, before.outdoor);
        assert!(panel.sent().is_empty());
        assert_eq!(
            device.controller().apply_scenario(Scenario::Ui),
            Err(ControllerError::NegativeActive)
        );
    }

    #[test]
    fn test_negative_round_trip_restores_scenario_generic() {
        let (panel, device) = setup(0);
        device.store("scenario", "6").unwrap();
        panel.clear();

        device.store("negative", "1").unwrap();
        assert_eq!(panel.last_payload(), Some(&[0x21u8, 0x00][..]));

        device.store("negative", "0").unwrap();
        let sent = panel.sent();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[1].payload, &[0x20u8, 0x00][..]);
        assert_eq!(sent[2].payload, table_bytes(Scenario::Gallery));
        assert_eq!(
            device.show("negative").unwrap(),
            "Current negative Value : Disabled\n"
        );
    }

    #[test]
    fn test_negative_round_trip_restores_scenario_himax() {
        let (panel, device) = setup(HIMAX_MANUFACTURER_ID);
        assert_eq!(device.controller().variant(), PanelVariant::Himax);
        device.store("scenario", "2").unwrap();
        panel.clear();

        device.store("negative", "1").unwrap();
        let himax = CommandTable::for_variant(PanelVariant::Himax);
        assert_eq!(panel.last_payload(), Some(himax.negative_on()));

        // Himax has no exit command; the scenario table alone restores it
        device.store("negative", "0").unwrap();
        let sent = panel.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].payload, table_bytes(Scenario::VideoWarm));
    }

    #[test]
    fn test_color_blind_forces_blind_path() {
        let (panel, device) = setup(0);
        device
            .store("accessibility", "2 1 2 3 4 5 6 7 8 9")
            .unwrap();
        let state = device.controller().state();
        assert_eq!(state.accessibility, Accessibility::ColorBlind);
        assert_eq!(state.negative, Negative::Off);
        panel.clear();

        // Every scenario now resolves to blind mode, which has no panel data
        for scenario in [Scenario::Ui, Scenario::Video, Scenario::Vt] {
            assert_eq!(
                device.controller().set_scenario(scenario),
                Err(ControllerError::NoCommandData("BLIND_MODE"))
            );
        }
        assert!(panel.sent().is_empty());
        assert_eq!(device.controller().state().scenario, Scenario::Vt);

        device.store("accessibility", "0").unwrap();
        assert_eq!(
            device.controller().state().accessibility,
            Accessibility::Off
        );
        assert_eq!(panel.last_payload(), Some(table_bytes(Scenario::Vt)));
    }

    #[test]
    fn test_accessibility_negative_takes_priority() {
        let (panel, device) = setup(0);
        device.store("accessibility", "2").unwrap();
        device.store("accessibility", "1").unwrap();

        let state = device.controller().state();
        assert_eq!(state.negative, Negative::On);
        assert_eq!(state.accessibility, Accessibility::Off);
        assert_eq!(panel.last_payload(), Some(&[0x21u8, 0x00][..]));
    }

    #[test]
    fn test_accessibility_matrix_is_packed_not_sent() {
        let (panel, device) = setup(0);
        device
            .store("accessibility", "2 1234 ffff 0 0 0 0 0 0 1ab\n")
            .unwrap();

        let packed = device.controller().color_blind_matrix().unwrap();
        assert_eq!(&packed[..4], &[0x34u8, 0x12, 0xFF, 0xFF][..]);
        assert_eq!(&packed[16..], &[0xABu8, 0x01][..]);
        assert!(panel.sent().iter().all(|c| c.payload.len() != COLOR_MATRIX_LEN));
    }

    #[test]
    fn test_accessibility_unknown_command_resends_state() {
        let (panel, device) = setup(0);
        device.store("scenario", "5").unwrap();
        panel.clear();

        device.store("accessibility", "7").unwrap();

        let state = device.controller().state();
        assert_eq!(state.negative, Negative::Off);
        assert_eq!(state.accessibility, Accessibility::Off);
        assert_eq!(panel.last_payload(), Some(table_bytes(Scenario::Navi)));
    }

    #[test]
    fn test_accessibility_reads_play_speed() {
        let (_panel, device) = setup(0);
        device.store("playspeed", "1").unwrap();
        assert_eq!(device.show("accessibility").unwrap(), "1\n");
    }

    #[test]
    fn test_scenario_change_clears_play_speed() {
        let (_panel, device) = setup(0);
        device.store("playspeed", "1").unwrap();
        assert_eq!(device.show("playspeed").unwrap(), "1\n");

        device.store("scenario", "4").unwrap();
        assert_eq!(device.show("playspeed").unwrap(), "0\n");
    }

    #[test]
    fn test_missing_data_logs_and_skips() {
        let (panel, device) = setup(0);
        for code in ["4", "8", "9", "10"] {
            device.store("scenario", code).unwrap();
        }
        assert_eq!(device.controller().state().scenario, Scenario::Email);
        assert!(panel.sent().is_empty());
    }

    #[test]
    fn test_powered_off_panel_keeps_selection() {
        let (panel, device) = setup(0);
        panel.set_powered(false);

        device.store("scenario", "3").unwrap();
        assert_eq!(device.controller().state().scenario, Scenario::VideoCold);
        assert!(panel.sent().is_empty());

        panel.set_powered(true);
        device.controller().resume_negative_state().unwrap();
        let sent = panel.sent();
        assert_eq!(sent.last().map(|c| c.payload), Some(table_bytes(Scenario::VideoCold)));
    }

    #[test]
    fn test_resume_reapplies_negative() {
        let (panel, device) = setup(0);
        device.store("negative", "1").unwrap();
        panel.clear();

        device.controller().resume_negative_state().unwrap();
        assert_eq!(panel.sent().len(), 1);
        assert_eq!(panel.last_payload(), Some(&[0x21u8, 0x00][..]));
    }

    #[test]
    fn test_transmit_failure_is_logged_not_propagated() {
        let (panel, device) = setup(0);
        panel.set_failing(true);

        assert_eq!(device.store("scenario", "1").unwrap(), 1);
        assert_eq!(device.controller().state().scenario, Scenario::Video);
        assert!(matches!(
            device.controller().apply_scenario(Scenario::Video),
            Err(ControllerError::Transmit(_))
        ));
    }

    #[test]
    fn test_attributes_read_back_parsed_values() {
        let (_panel, device) = setup(0);

        device.store("mode", " 02\n").unwrap();
        assert_eq!(
            device.show("mode").unwrap(),
            "Current Background Mode : MOVIE\n"
        );

        device.store("outdoor", "1xyz").unwrap();
        assert_eq!(
            device.show("outdoor").unwrap(),
            "Current outdoor Value : Enabled\n"
        );

        device.store("playspeed", "+7").unwrap();
        assert_eq!(device.show("playspeed").unwrap(), "7\n");

        device.store("mode", "4").unwrap();
        device.store("outdoor", "2").unwrap();
        let state = device.controller().state();
        assert_eq!(state.background, Background::Movie);
        assert_eq!(state.outdoor, Outdoor::On);
    }

    #[test]
    fn test_background_and_outdoor_writes_reapply_scenario() {
        let (panel, device) = setup(0);
        device.store("scenario", "1").unwrap();
        panel.clear();

        device.store("mode", "0").unwrap();
        let sent = panel.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].payload, table_bytes(Scenario::Video));
        assert_eq!(device.controller().state().background, Background::Dynamic);
        panel.clear();

        device.store("outdoor", "1").unwrap();
        let sent = panel.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].payload, table_bytes(Scenario::Video));
        assert_eq!(device.controller().state().outdoor, Outdoor::On);
        panel.clear();

        // Out-of-range values are dropped before anything is sent
        device.store("mode", "4").unwrap();
        device.store("outdoor", "2").unwrap();
        assert!(panel.sent().is_empty());
    }

    #[test]
    fn test_himax_resume_without_negative_reapplies_scenario() {
        let (panel, device) = setup(HIMAX_MANUFACTURER_ID);
        device.store("scenario", "5").unwrap();
        panel.clear();

        device.controller().resume_negative_state().unwrap();

        let sent = panel.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].payload, table_bytes(Scenario::Navi));
        assert!(sent.iter().all(|c| c.payload != &[0x20u8, 0x00][..]));
    }

    #[test]
    fn test_init_file_cmd_nonzero_reapplies_stored_scenario() {
        let (panel, device) = setup(0);
        device.store("scenario", "6").unwrap();
        panel.clear();

        device.store("mdnieset_init_file_cmd", "3").unwrap();

        assert_eq!(device.controller().state().scenario, Scenario::Gallery);
        let sent = panel.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].payload, table_bytes(Scenario::Gallery));
    }

    #[test]
    fn test_reapply_scenario_respects_negative() {
        let (panel, device) = setup(0);
        device.store("scenario", "7").unwrap();
        device.store("negative", "1").unwrap();
        panel.clear();

        assert_eq!(
            device.controller().reapply_scenario(),
            Err(ControllerError::NegativeActive)
        );
        assert!(panel.sent().is_empty());
    }

    #[test]
    fn test_init_file_cmd_resets_to_ui() {
        let (panel, device) = setup(0);
        device.store("scenario", "1").unwrap();

        device.store("mdnieset_init_file_cmd", "0").unwrap();
        assert_eq!(device.controller().state().scenario, Scenario::Ui);
        assert_eq!(panel.last_payload(), Some(table_bytes(Scenario::Ui)));
        assert_eq!(
            device.show("mdnieset_init_file_cmd").unwrap(),
            "mdnieset_init_file_cmd_show\n"
        );
    }

    #[test]
    fn test_user_select_file_cmd_is_inert() {
        let (panel, device) = setup(0);
        assert_eq!(device.store("mdnieset_user_select_file_cmd", "3").unwrap(), 1);
        assert_eq!(device.show("mdnieset_user_select_file_cmd").unwrap(), "0\n");
        assert!(panel.sent().is_empty());
    }

    #[test]
    fn test_unknown_attribute() {
        let (_panel, device) = setup(0);
        assert!(matches!(
            device.store("brightness", "1"),
            Err(ControllerError::UnknownAttribute(_))
        ));
        assert!(device.show("brightness").is_err());
    }

    #[test]
    fn test_concurrent_writers() {
        let (panel, device) = setup(0);
        let device = Arc::new(device);

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let device = device.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        device.store("scenario", &i.to_string()).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // Camera (code 4) is never written, so every write of 0-3 transmits
        assert_eq!(panel.sent().len(), 100);
    }

    #[cfg(feature = "cabc")]
    #[test]
    fn test_cabc_attribute() {
        init_logger();
        let panel = Arc::new(MockPanel::new());
        let controller = MdnieController::new(PanelConfig::default(), panel.clone(), panel.clone())
            .with_cabc(panel.clone());
        let device = TuningDevice::register(Arc::new(controller));

        assert_eq!(device.show("cabc").unwrap(), "0\n");
        device.store("cabc", "1\n").unwrap();
        assert_eq!(device.show("cabc").unwrap(), "1\n");
        device.store("cabc", "on").unwrap();
        assert_eq!(device.show("cabc").unwrap(), "1\n");
        device.store("cabc", "0").unwrap();
        assert_eq!(device.show("cabc").unwrap(), "0\n");
    }
}
