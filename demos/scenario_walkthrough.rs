//! Example: Drive the mDNIe attributes against a mock panel.
//!
//! Run with: `RUST_LOG=debug cargo run --example scenario_walkthrough`

use std::sync::Arc;

use mdnie_core::{ControllerError, MdnieController, MockPanel, PanelConfig, TuningDevice};

fn main() -> Result<(), ControllerError> {
    // Initialize logging (optional)
    env_logger::init();

    // Bind the controller to a mock Himax panel
    let panel = Arc::new(MockPanel::new());
    let controller = Arc::new(MdnieController::new(
        PanelConfig::new(mdnie_core::HIMAX_MANUFACTURER_ID),
        panel.clone(),
        panel.clone(),
    ));
    println!("Panel variant: {:?}", controller.variant());

    // Registering the device enables the engine
    let device = TuningDevice::register(controller);

    let writes = [
        ("scenario", "1"),
        ("mode", "2"),
        ("negative", "1"),
        ("scenario", "6"),
        ("negative", "0"),
        ("accessibility", "2 0 0 0 0 0 0 0 0 0"),
        ("accessibility", "0"),
    ];

    for (name, value) in writes {
        device.store(name, value)?;
        print!("{} <- {:<24} ", name, value);
        print!("{}", device.show(name)?);
    }

    for (i, command) in panel.sent().iter().enumerate() {
        println!("cmd {}: {:02x?}", i, command.payload);
    }

    Ok(())
}
