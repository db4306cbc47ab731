// Model of the data produced by one control cycle

use heapless::String;

use crate::config::LCD_COLS;
use crate::error::Fault;

/// Electrical level of a digital pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalLevel {
    Low,
    High,
}

/// Logical pump state owned by the irrigation controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PumpState {
    #[default]
    Idle,
    Irrigating,
}

impl PumpState {
    /// Human-readable label shared by the display and telemetry
    pub const fn label(self) -> &'static str {
        match self {
            Self::Irrigating => "LIGADA",
            Self::Idle => "DESLIGADA",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "LIGADA" => Some(Self::Irrigating),
            "DESLIGADA" => Some(Self::Idle),
            _ => None,
        }
    }

    pub const fn is_irrigating(self) -> bool {
        matches!(self, Self::Irrigating)
    }
}

/// One sensor reading and its normalized percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoistureSample {
    pub raw: u16,
    /// Always within 0..=100
    pub percent: u8,
}

/// What the display and telemetry report for a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    /// `None` when the sensor could not produce a usable reading
    pub percent: Option<u8>,
    pub pump: PumpState,
    /// Why `percent` is missing
    pub sensor_fault: Option<Fault>,
    /// Relay did not follow the commanded state; independent of the sensor
    pub actuator_fault: Option<Fault>,
}

/// Two display rows, each at most `LCD_COLS` characters
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayFrame {
    pub moisture: String<LCD_COLS>,
    pub pump: String<LCD_COLS>,
}

impl DisplayFrame {
    pub fn rows(&self) -> [&str; 2] {
        [self.moisture.as_str(), self.pump.as_str()]
    }
}
