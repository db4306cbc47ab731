//! Board constants and the immutable system configuration

use crate::error::ConfigError;

/// Character columns of the status display (frame capacity)
pub const LCD_COLS: usize = 16;

/// Rows of the status display
pub const LCD_ROWS: usize = 2;

/// Pixel position of each display row on graphic panels
pub const ROW_ORIGINS: [(i32, i32); LCD_ROWS] = [(10, 10), (10, 25)];

/// Full-scale value of the 12-bit ADC
pub const ADC_MAX: u16 = 4095;

/// SSD1306 OLED I2C address
pub const OLED_I2C_ADDR: u8 = 0x3C;

pub const OLED_I2C_KHZ: u32 = 400;

/// Waveshare e-paper SPI clock
pub const EPAPER_SPI_MHZ: u32 = 10;

/// Shown on the display while booting
pub const SPLASH_TEXT: &str = "FarmTech ESP32";

/// Written once to telemetry at startup
pub const BOOT_BANNER: &str = "FarmTech ESP32 - Sistema de Irrigacao Iniciado.";

/// Hysteresis thresholds in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Below this the soil is dry and irrigation starts
    pub dry: u8,
    /// Above this the soil is moist enough and irrigation stops
    pub wet: u8,
}

/// Raw readings that map to the ends of the percentage scale.
///
/// The probe reads higher when drier, so `raw_dry` is above `raw_wet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    /// Raw value read as 0 %
    pub raw_dry: u16,
    /// Raw value read as 100 %
    pub raw_wet: u16,
}

/// Raw window a healthy probe can produce; anything outside is a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorBounds {
    pub min: u16,
    pub max: u16,
}

impl SensorBounds {
    pub const fn contains(&self, raw: u16) -> bool {
        raw >= self.min && raw <= self.max
    }
}

/// Which level energizes the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayPolarity {
    ActiveLow,
    ActiveHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemConfig {
    pub thresholds: Thresholds,
    pub calibration: Calibration,
    pub bounds: SensorBounds,
    pub relay_polarity: RelayPolarity,
    pub display_columns: usize,
    pub cycle_period_ms: u64,
    pub splash_ms: u64,
}

impl SystemConfig {
    pub const DEFAULT: Self = Self {
        thresholds: Thresholds { dry: 45, wet: 65 },
        calibration: Calibration {
            raw_dry: ADC_MAX,
            raw_wet: 0,
        },
        bounds: SensorBounds {
            min: 0,
            max: ADC_MAX,
        },
        relay_polarity: RelayPolarity::ActiveLow,
        display_columns: LCD_COLS,
        cycle_period_ms: 5_000,
        splash_ms: 2_000,
    };

    pub const fn with_thresholds(mut self, dry: u8, wet: u8) -> Self {
        self.thresholds = Thresholds { dry, wet };
        self
    }

    pub const fn with_bounds(mut self, min: u16, max: u16) -> Self {
        self.bounds = SensorBounds { min, max };
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Thresholds { dry, wet } = self.thresholds;
        if wet > 100 {
            return Err(ConfigError::ThresholdAboveHundred(wet));
        }
        if dry >= wet {
            return Err(ConfigError::ThresholdsInverted { dry, wet });
        }

        let Calibration { raw_dry, raw_wet } = self.calibration;
        if raw_dry <= raw_wet {
            return Err(ConfigError::CalibrationNotInverted { raw_dry, raw_wet });
        }

        if self.bounds.min > self.bounds.max {
            return Err(ConfigError::BoundsInverted {
                min: self.bounds.min,
                max: self.bounds.max,
            });
        }

        if self.display_columns == 0 || self.display_columns > LCD_COLS {
            return Err(ConfigError::ColumnsOutOfRange(self.display_columns));
        }

        if self.cycle_period_ms == 0 {
            return Err(ConfigError::ZeroCyclePeriod);
        }

        Ok(())
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
