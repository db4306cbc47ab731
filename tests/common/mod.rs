//! Shared test doubles for the control loop

#![allow(dead_code)]

use std::collections::VecDeque;

use farmtech_irrigation::config::SystemConfig;
use farmtech_irrigation::logic::IrrigationSystem;
use farmtech_irrigation::model::SignalLevel;
use farmtech_irrigation::sensor::raw_to_percent;
use farmtech_irrigation::traits::{Display, MoistureSensor, RelayPin, Scheduler, TelemetrySink};

/// Sensor returning scripted readings, repeating the last one when exhausted
#[derive(Default)]
pub struct ScriptedSensor {
    readings: VecDeque<Result<u16, &'static str>>,
    last: Option<Result<u16, &'static str>>,
}

impl ScriptedSensor {
    pub fn new(raws: &[u16]) -> Self {
        let mut sensor = Self::default();
        for &raw in raws {
            sensor.push(raw);
        }
        sensor
    }

    pub fn push(&mut self, raw: u16) {
        self.readings.push_back(Ok(raw));
    }

    pub fn push_error(&mut self, reason: &'static str) {
        self.readings.push_back(Err(reason));
    }
}

impl MoistureSensor for ScriptedSensor {
    fn read_raw(&mut self) -> Result<u16, &'static str> {
        if let Some(next) = self.readings.pop_front() {
            self.last = Some(next);
        }
        self.last.unwrap_or(Err("no reading scripted"))
    }
}

/// Relay recording every level written
#[derive(Default)]
pub struct RecordingRelay {
    pub writes: Vec<SignalLevel>,
    pub readback: bool,
    pub stuck_at: Option<SignalLevel>,
}

impl RecordingRelay {
    pub fn with_readback() -> Self {
        Self {
            readback: true,
            ..Self::default()
        }
    }

    pub fn level(&self) -> Option<SignalLevel> {
        self.writes.last().copied()
    }
}

impl RelayPin for RecordingRelay {
    fn set_level(&mut self, level: SignalLevel) -> Result<(), &'static str> {
        self.writes.push(level);
        Ok(())
    }

    fn read_back(&mut self) -> Option<SignalLevel> {
        if !self.readback {
            return None;
        }
        self.stuck_at.or(self.level())
    }
}

/// Panel keeping the rows drawn since the last clear
#[derive(Default)]
pub struct RecordingDisplay {
    pub initialized: bool,
    pub rows: Vec<(String, i32, i32)>,
    pub updates: usize,
    pub fail: bool,
}

impl RecordingDisplay {
    pub fn text(&self) -> Vec<&str> {
        self.rows.iter().map(|(t, _, _)| t.as_str()).collect()
    }
}

impl Display for RecordingDisplay {
    fn init(&mut self) -> Result<(), &'static str> {
        self.initialized = true;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), &'static str> {
        if self.fail {
            return Err("i2c nack");
        }
        self.rows.clear();
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), &'static str> {
        self.rows.push((text.to_string(), x, y));
        Ok(())
    }

    fn update(&mut self) -> Result<(), &'static str> {
        self.updates += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub lines: Vec<String>,
}

impl TelemetrySink for RecordingSink {
    fn write_line(&mut self, line: &str) -> Result<(), &'static str> {
        self.lines.push(line.to_string());
        Ok(())
    }
}

/// Lets a fixed number of cycles through, then stops the loop
pub struct CountedScheduler {
    pub remaining: usize,
    pub waits: usize,
}

impl CountedScheduler {
    pub fn cycles(total: usize) -> Self {
        Self {
            remaining: total,
            waits: 0,
        }
    }
}

impl Scheduler for CountedScheduler {
    async fn next_cycle(&mut self) -> bool {
        self.waits += 1;
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining > 0
    }
}

pub type TestSystem = IrrigationSystem<ScriptedSensor, RecordingRelay, RecordingDisplay, RecordingSink>;

pub fn system(config: &SystemConfig, raws: &[u16]) -> TestSystem {
    IrrigationSystem::new(
        config,
        ScriptedSensor::new(raws),
        RecordingRelay::with_readback(),
        RecordingDisplay::default(),
        RecordingSink::default(),
    )
}

/// Highest raw reading that maps to `percent` under `config`
pub fn raw_for_percent(config: &SystemConfig, percent: u8) -> u16 {
    (0..=config.calibration.raw_dry)
        .rev()
        .find(|&raw| raw_to_percent(raw, &config.calibration) == percent)
        .expect("percent reachable by calibration")
}
