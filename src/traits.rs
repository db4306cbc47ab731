//! Hardware abstraction traits

use crate::model::SignalLevel;

/// Trait for analog moisture probes
pub trait MoistureSensor {
    /// Read the raw ADC value (higher means drier)
    fn read_raw(&mut self) -> Result<u16, &'static str>;
}

/// Trait for the digital output driving the pump relay
pub trait RelayPin {
    /// Drive the pin to the given level
    fn set_level(&mut self, level: SignalLevel) -> Result<(), &'static str>;

    /// Level currently present on the pin, if the hardware can read it back
    fn read_back(&mut self) -> Option<SignalLevel> {
        None
    }
}

/// Trait for display devices
pub trait Display {
    /// Initialize the display
    fn init(&mut self) -> Result<(), &'static str>;

    /// Clear the display
    fn clear(&mut self) -> Result<(), &'static str>;

    /// Draw text at specified position
    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), &'static str>;

    /// Update/flush the display (show the buffer)
    fn update(&mut self) -> Result<(), &'static str>;
}

/// Trait for the line-oriented telemetry output
pub trait TelemetrySink {
    /// Emit one complete line (the sink adds the terminator)
    fn write_line(&mut self, line: &str) -> Result<(), &'static str>;
}

/// Source of the fixed control period
#[allow(async_fn_in_trait)]
pub trait Scheduler {
    /// Wait for the next cycle slot; `false` ends the control loop
    async fn next_cycle(&mut self) -> bool;
}
