//! Periodic serial status line
//!
//! One record per cycle, whether or not anything changed:
//!
//! ```text
//! Umidade: 42%, Bomba: LIGADA
//! Umidade: --, Bomba: DESLIGADA, Falha: SENSOR_FORA_DE_FAIXA
//! Umidade: --, Bomba: DESLIGADA, Falha: SENSOR_SEM_LEITURA, Falha: ATUADOR
//! ```
//!
//! A sensor fault and an actuator fault can coincide; the sensor code comes first.

use core::fmt::{self, Write};

use heapless::String;
use log::warn;

use crate::config::BOOT_BANNER;
use crate::error::FaultCode;
use crate::model::{PumpState, Status};
use crate::traits::TelemetrySink;

/// Longest telemetry line
pub const LINE_CAPACITY: usize = 96;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryRecord {
    pub percent: Option<u8>,
    pub pump: PumpState,
    pub sensor_fault: Option<FaultCode>,
    pub actuator_fault: Option<FaultCode>,
}

impl From<&Status> for TelemetryRecord {
    fn from(status: &Status) -> Self {
        Self {
            percent: status.percent,
            pump: status.pump,
            sensor_fault: status.sensor_fault.map(|f| f.code()),
            actuator_fault: status.actuator_fault.map(|f| f.code()),
        }
    }
}

impl fmt::Display for TelemetryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.percent {
            Some(percent) => write!(f, "Umidade: {}%", percent)?,
            None => write!(f, "Umidade: --")?,
        }
        write!(f, ", Bomba: {}", self.pump.label())?;
        for code in self.sensor_fault.iter().chain(&self.actuator_fault) {
            write!(f, ", Falha: {}", code.as_str())?;
        }
        Ok(())
    }
}

/// Why a line could not be read back as a [`TelemetryRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    MissingField(&'static str),
    BadPercent,
    UnknownPumpLabel,
    UnknownFault,
    /// Fault codes repeated, or the sensor code after the actuator one
    FaultOrder,
    TrailingData,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(name) => write!(f, "missing field {name}"),
            Self::BadPercent => write!(f, "moisture is not a percentage"),
            Self::UnknownPumpLabel => write!(f, "unknown pump label"),
            Self::UnknownFault => write!(f, "unknown fault code"),
            Self::FaultOrder => write!(f, "fault codes repeated or out of order"),
            Self::TrailingData => write!(f, "unexpected trailing data"),
        }
    }
}

impl TelemetryRecord {
    pub fn to_line(&self) -> String<LINE_CAPACITY> {
        let mut line = String::new();
        let _ = write!(line, "{}", self);
        line
    }

    /// Parse a line produced by [`TelemetryRecord::to_line`]
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut fields = line.trim_end().split(", ");

        let moisture = fields
            .next()
            .and_then(|f| f.strip_prefix("Umidade: "))
            .ok_or(ParseError::MissingField("Umidade"))?;
        let percent = match moisture {
            "--" => None,
            value => {
                let digits = value.strip_suffix('%').ok_or(ParseError::BadPercent)?;
                let percent: u8 = digits.parse().map_err(|_| ParseError::BadPercent)?;
                if percent > 100 {
                    return Err(ParseError::BadPercent);
                }
                Some(percent)
            }
        };

        let pump = fields
            .next()
            .and_then(|f| f.strip_prefix("Bomba: "))
            .ok_or(ParseError::MissingField("Bomba"))?;
        let pump = PumpState::from_label(pump).ok_or(ParseError::UnknownPumpLabel)?;

        let mut sensor_fault = None;
        let mut actuator_fault = None;
        for field in fields {
            let code = field
                .strip_prefix("Falha: ")
                .ok_or(ParseError::TrailingData)?;
            let code = FaultCode::parse(code).ok_or(ParseError::UnknownFault)?;

            if code.is_sensor() {
                if sensor_fault.is_some() || actuator_fault.is_some() {
                    return Err(ParseError::FaultOrder);
                }
                sensor_fault = Some(code);
            } else {
                if actuator_fault.is_some() {
                    return Err(ParseError::FaultOrder);
                }
                actuator_fault = Some(code);
            }
        }

        Ok(Self {
            percent,
            pump,
            sensor_fault,
            actuator_fault,
        })
    }
}

/// Emits one [`TelemetryRecord`] per cycle on the sink
pub struct TelemetryReporter<T> {
    sink: T,
}

impl<T: TelemetrySink> TelemetryReporter<T> {
    pub fn new(sink: T) -> Self {
        Self { sink }
    }

    /// Announce startup
    pub fn boot(&mut self) {
        self.emit(BOOT_BANNER);
    }

    pub fn report(&mut self, status: &Status) -> TelemetryRecord {
        let record = TelemetryRecord::from(status);
        self.emit(record.to_line().as_str());
        record
    }

    fn emit(&mut self, line: &str) {
        if let Err(e) = self.sink.write_line(line) {
            warn!("[TELEMETRY] write failed: {}", e);
        }
    }

    pub fn sink(&self) -> &T {
        &self.sink
    }
}
