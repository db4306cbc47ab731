//! Soil moisture reading and normalization

use log::{debug, warn};

use crate::config::{Calibration, SensorBounds, SystemConfig};
use crate::error::Fault;
use crate::model::MoistureSample;
use crate::traits::MoistureSensor;

/// Map a raw reading onto 0..=100 percent, inverted (higher raw is drier).
///
/// Integer linear interpolation truncating toward zero, then clamped, so raw
/// values beyond the calibration points saturate at 0 or 100.
pub fn raw_to_percent(raw: u16, calibration: &Calibration) -> u8 {
    let raw = i32::from(raw);
    let dry = i32::from(calibration.raw_dry);
    let wet = i32::from(calibration.raw_wet);

    if dry == wet {
        return 0;
    }

    let percent = (raw - dry) * 100 / (wet - dry);
    percent.clamp(0, 100) as u8
}

/// Reads the probe and turns raw values into [`MoistureSample`]s
pub struct SensorReader<S> {
    sensor: S,
    calibration: Calibration,
    bounds: SensorBounds,
}

impl<S: MoistureSensor> SensorReader<S> {
    pub fn new(sensor: S, config: &SystemConfig) -> Self {
        Self {
            sensor,
            calibration: config.calibration,
            bounds: config.bounds,
        }
    }

    /// Percentage the current calibration assigns to `raw`
    pub fn percent_for(&self, raw: u16) -> u8 {
        raw_to_percent(raw, &self.calibration)
    }

    /// Check a raw value against the accepted window and normalize it
    pub fn sample(&self, raw: u16) -> Result<MoistureSample, Fault> {
        if !self.bounds.contains(raw) {
            return Err(Fault::SensorOutOfRange { raw });
        }

        Ok(MoistureSample {
            raw,
            percent: self.percent_for(raw),
        })
    }

    /// Take one physical reading
    pub fn read(&mut self) -> Result<MoistureSample, Fault> {
        let raw = self.sensor.read_raw().map_err(|reason| {
            warn!("[SENSOR] read failed: {}", reason);
            Fault::SensorUnavailable(reason)
        })?;

        let sample = self.sample(raw);
        match &sample {
            Ok(s) => debug!("[SENSOR] raw={} percent={}", s.raw, s.percent),
            Err(fault) => warn!("[SENSOR] {}", fault),
        }
        sample
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }
}
