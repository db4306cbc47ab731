//! Status formatting for the two-row character display

use core::fmt::Write;

use heapless::String;

use crate::config::{LCD_COLS, SPLASH_TEXT, SystemConfig};
use crate::model::{DisplayFrame, Status};

/// Copy `text` into a row of exactly `columns` characters, cutting or padding with spaces
fn fit_row(text: &str, columns: usize) -> String<LCD_COLS> {
    let mut row = String::new();
    for ch in text.chars().chain(core::iter::repeat(' ')).take(columns) {
        if row.push(ch).is_err() {
            break;
        }
    }
    row
}

/// Builds a fresh [`DisplayFrame`] every cycle
pub struct DisplayRenderer {
    columns: usize,
}

impl DisplayRenderer {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            columns: config.display_columns.min(LCD_COLS),
        }
    }

    pub fn render(&self, status: &Status) -> DisplayFrame {
        let mut line: String<32> = String::new();

        match (status.percent, status.sensor_fault) {
            (_, Some(_)) => {
                let _ = write!(line, "Sensor: FALHA");
            }
            (Some(percent), None) => {
                let _ = write!(line, "Umidade: {}%", percent);
            }
            (None, None) => {
                let _ = write!(line, "Umidade: --");
            }
        }
        let moisture = fit_row(&line, self.columns);

        line.clear();
        if status.actuator_fault.is_some() {
            let _ = write!(line, "Rele: FALHA");
        } else {
            let _ = write!(line, "Bomba: {}", status.pump.label());
        }
        let pump = fit_row(&line, self.columns);

        DisplayFrame { moisture, pump }
    }

    /// Frame shown while the firmware boots
    pub fn splash(&self) -> DisplayFrame {
        DisplayFrame {
            moisture: fit_row(SPLASH_TEXT, self.columns),
            pump: fit_row("", self.columns),
        }
    }
}
