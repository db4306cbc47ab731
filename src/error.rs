//! Fault taxonomy reported through telemetry

use core::fmt;

use crate::model::PumpState;

/// A non-fatal fault observed during a control cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Raw reading outside the accepted sensor window
    SensorOutOfRange { raw: u16 },
    /// The sensor read itself failed
    SensorUnavailable(&'static str),
    /// Relay readback disagrees with the commanded state, or the write failed
    ActuatorFault { commanded: PumpState },
}

impl Fault {
    /// Stable code carried on the telemetry line
    pub const fn code(&self) -> FaultCode {
        match self {
            Self::SensorOutOfRange { .. } => FaultCode::SensorOutOfRange,
            Self::SensorUnavailable(_) => FaultCode::SensorUnavailable,
            Self::ActuatorFault { .. } => FaultCode::Actuator,
        }
    }

    pub const fn is_sensor(&self) -> bool {
        matches!(self, Self::SensorOutOfRange { .. } | Self::SensorUnavailable(_))
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SensorOutOfRange { raw } => write!(f, "sensor reading {raw} out of range"),
            Self::SensorUnavailable(reason) => write!(f, "sensor unavailable: {reason}"),
            Self::ActuatorFault { commanded } => {
                write!(f, "relay did not follow command {}", commanded.label())
            }
        }
    }
}

/// Fault identity without its payload, as seen by telemetry consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultCode {
    SensorOutOfRange,
    SensorUnavailable,
    Actuator,
}

impl FaultCode {
    pub const fn is_sensor(self) -> bool {
        matches!(self, Self::SensorOutOfRange | Self::SensorUnavailable)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SensorOutOfRange => "SENSOR_FORA_DE_FAIXA",
            Self::SensorUnavailable => "SENSOR_SEM_LEITURA",
            Self::Actuator => "ATUADOR",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "SENSOR_FORA_DE_FAIXA" => Some(Self::SensorOutOfRange),
            "SENSOR_SEM_LEITURA" => Some(Self::SensorUnavailable),
            "ATUADOR" => Some(Self::Actuator),
            _ => None,
        }
    }
}

/// Invalid [`SystemConfig`](crate::config::SystemConfig)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    ThresholdsInverted { dry: u8, wet: u8 },
    ThresholdAboveHundred(u8),
    CalibrationNotInverted { raw_dry: u16, raw_wet: u16 },
    BoundsInverted { min: u16, max: u16 },
    ColumnsOutOfRange(usize),
    ZeroCyclePeriod,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThresholdsInverted { dry, wet } => {
                write!(f, "dry threshold {dry} must be below wet threshold {wet}")
            }
            Self::ThresholdAboveHundred(value) => write!(f, "threshold {value} exceeds 100%"),
            Self::CalibrationNotInverted { raw_dry, raw_wet } => write!(
                f,
                "raw dry point {raw_dry} must be above raw wet point {raw_wet}"
            ),
            Self::BoundsInverted { min, max } => write!(f, "sensor bounds {min}..={max} are empty"),
            Self::ColumnsOutOfRange(cols) => write!(f, "display width {cols} is not supported"),
            Self::ZeroCyclePeriod => write!(f, "cycle period must be non-zero"),
        }
    }
}
