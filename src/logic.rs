//! Control cycle orchestration (hardware-independent)

use log::{debug, warn};

use crate::actuator::ActuatorDriver;
use crate::config::{ROW_ORIGINS, SystemConfig};
use crate::controller::IrrigationController;
use crate::error::Fault;
use crate::model::{DisplayFrame, MoistureSample, PumpState, Status};
use crate::render::DisplayRenderer;
use crate::sensor::SensorReader;
use crate::telemetry::{TelemetryRecord, TelemetryReporter};
use crate::traits::{Display, MoistureSensor, RelayPin, Scheduler, TelemetrySink};

/// Everything one cycle observed and produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub sample: Result<MoistureSample, Fault>,
    pub state: PumpState,
    /// New state when this cycle crossed a threshold
    pub transition: Option<PumpState>,
    pub sensor_fault: Option<Fault>,
    pub actuator_fault: Option<Fault>,
    pub frame: DisplayFrame,
    pub record: TelemetryRecord,
}

/// Write both rows of `frame` to the panel
pub fn show_frame<D: Display>(display: &mut D, frame: &DisplayFrame) -> Result<(), &'static str> {
    display.clear()?;
    for (row, (x, y)) in frame.rows().iter().zip(ROW_ORIGINS) {
        display.draw_text(row, x, y)?;
    }
    display.update()
}

/// One sensor, controller, relay, display and telemetry line wired together
pub struct IrrigationSystem<S, R, D, T> {
    sensor: SensorReader<S>,
    controller: IrrigationController,
    actuator: ActuatorDriver<R>,
    display: D,
    renderer: DisplayRenderer,
    telemetry: TelemetryReporter<T>,
    cycles: u32,
}

impl<S, R, D, T> IrrigationSystem<S, R, D, T>
where
    S: MoistureSensor,
    R: RelayPin,
    D: Display,
    T: TelemetrySink,
{
    /// Build the system; the relay is driven off immediately
    pub fn new(config: &SystemConfig, sensor: S, relay: R, display: D, sink: T) -> Self {
        Self {
            sensor: SensorReader::new(sensor, config),
            controller: IrrigationController::new(config),
            actuator: ActuatorDriver::new(relay, config),
            display,
            renderer: DisplayRenderer::new(config),
            telemetry: TelemetryReporter::new(sink),
            cycles: 0,
        }
    }

    /// Bring up the display, show the splash frame and announce startup
    pub fn boot(&mut self) -> DisplayFrame {
        if let Err(e) = self.display.init() {
            warn!("[DISPLAY] init failed: {}", e);
        }
        let splash = self.renderer.splash();
        if let Err(e) = show_frame(&mut self.display, &splash) {
            warn!("[DISPLAY] splash failed: {}", e);
        }
        self.telemetry.boot();
        splash
    }

    /// Read, decide, actuate, then report
    pub fn run_cycle(&mut self) -> CycleReport {
        self.cycles = self.cycles.wrapping_add(1);

        let sample = self.sensor.read();
        let transition = match &sample {
            Ok(s) => self.controller.update(s.percent),
            // Hold the last decision; only a valid sample may move the state
            Err(_) => None,
        };

        let state = self.controller.state();
        let sensor_fault = sample.as_ref().err().copied();
        let actuator_fault = self.actuator.apply(state).err();

        let status = Status {
            percent: sample.as_ref().ok().map(|s| s.percent),
            pump: state,
            sensor_fault,
            actuator_fault,
        };

        let frame = self.renderer.render(&status);
        if let Err(e) = show_frame(&mut self.display, &frame) {
            warn!("[DISPLAY] refresh failed: {}", e);
        }

        let record = self.telemetry.report(&status);
        debug!("[CYCLE] #{} {}", self.cycles, record);

        CycleReport {
            sample,
            state,
            transition,
            sensor_fault,
            actuator_fault,
            frame,
            record,
        }
    }

    pub const fn state(&self) -> PumpState {
        self.controller.state()
    }

    pub const fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        self.sensor.sensor_mut()
    }

    pub fn relay_mut(&mut self) -> &mut R {
        self.actuator.relay_mut()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn telemetry_sink(&self) -> &T {
        self.telemetry.sink()
    }
}

/// Run one cycle per scheduler slot until the scheduler stops
pub async fn run<S, R, D, T, C>(system: &mut IrrigationSystem<S, R, D, T>, scheduler: &mut C)
where
    S: MoistureSensor,
    R: RelayPin,
    D: Display,
    T: TelemetrySink,
    C: Scheduler,
{
    loop {
        system.run_cycle();
        if !scheduler.next_cycle().await {
            break;
        }
    }
}
