//! Two-threshold hysteresis policy for the pump

use log::info;

use crate::config::{SystemConfig, Thresholds};
use crate::model::PumpState;

/// Decides the pump state from the latest moisture percentage.
///
/// The pump starts idle. It turns on only when the reading drops strictly
/// below the dry threshold and turns off only when it rises strictly above
/// the wet threshold. Readings in `dry..=wet` never change the state.
pub struct IrrigationController {
    thresholds: Thresholds,
    state: PumpState,
}

impl IrrigationController {
    pub fn new(config: &SystemConfig) -> Self {
        Self::with_state(config, PumpState::Idle)
    }

    pub fn with_state(config: &SystemConfig, state: PumpState) -> Self {
        Self {
            thresholds: config.thresholds,
            state,
        }
    }

    pub const fn state(&self) -> PumpState {
        self.state
    }

    /// State that `percent` would lead to from `state`
    pub const fn next_state(state: PumpState, percent: u8, thresholds: Thresholds) -> PumpState {
        match state {
            PumpState::Idle if percent < thresholds.dry => PumpState::Irrigating,
            PumpState::Irrigating if percent > thresholds.wet => PumpState::Idle,
            held => held,
        }
    }

    /// Evaluate one sample; returns the new state if it changed
    pub fn update(&mut self, percent: u8) -> Option<PumpState> {
        let next = Self::next_state(self.state, percent, self.thresholds);
        if next == self.state {
            return None;
        }

        info!(
            "[CONTROL] {} -> {} at {}%",
            self.state.label(),
            next.label(),
            percent
        );
        self.state = next;
        Some(next)
    }
}
