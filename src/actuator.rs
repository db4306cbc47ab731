//! Pump relay driver

use log::{debug, warn};

use crate::config::{RelayPolarity, SystemConfig};
use crate::error::Fault;
use crate::model::{PumpState, SignalLevel};
use crate::traits::RelayPin;

/// Translates the logical pump state into the relay signal.
///
/// Writing the same state every cycle is expected; the pin is simply driven
/// to the same level again.
pub struct ActuatorDriver<R> {
    relay: R,
    polarity: RelayPolarity,
}

impl<R: RelayPin> ActuatorDriver<R> {
    /// Take ownership of the relay and drive it to the de-energized level
    pub fn new(relay: R, config: &SystemConfig) -> Self {
        let mut driver = Self {
            relay,
            polarity: config.relay_polarity,
        };
        if let Err(fault) = driver.apply(PumpState::Idle) {
            warn!("[RELAY] initial off failed: {}", fault);
        }
        driver
    }

    /// Pin level that realizes `state` under this driver's polarity
    pub const fn level_for(&self, state: PumpState) -> SignalLevel {
        match (self.polarity, state.is_irrigating()) {
            (RelayPolarity::ActiveLow, true) | (RelayPolarity::ActiveHigh, false) => {
                SignalLevel::Low
            }
            (RelayPolarity::ActiveLow, false) | (RelayPolarity::ActiveHigh, true) => {
                SignalLevel::High
            }
        }
    }

    /// Whether `level` energizes the relay
    pub const fn is_active(&self, level: SignalLevel) -> bool {
        matches!(
            (self.polarity, level),
            (RelayPolarity::ActiveLow, SignalLevel::Low)
                | (RelayPolarity::ActiveHigh, SignalLevel::High)
        )
    }

    /// Drive the relay for `state` and verify it through readback when available
    pub fn apply(&mut self, state: PumpState) -> Result<(), Fault> {
        let level = self.level_for(state);
        let fault = Fault::ActuatorFault { commanded: state };

        self.relay.set_level(level).map_err(|reason| {
            warn!("[RELAY] write failed: {}", reason);
            fault
        })?;

        match self.relay.read_back() {
            Some(actual) if actual != level => {
                warn!("[RELAY] {}", fault);
                Err(fault)
            }
            _ => {
                debug!("[RELAY] {:?} for {}", level, state.label());
                Ok(())
            }
        }
    }

    pub fn relay_mut(&mut self) -> &mut R {
        &mut self.relay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pin {
        level: Option<SignalLevel>,
        stuck: Option<SignalLevel>,
        writes: usize,
    }

    impl Pin {
        fn new() -> Self {
            Self {
                level: None,
                stuck: None,
                writes: 0,
            }
        }
    }

    impl RelayPin for Pin {
        fn set_level(&mut self, level: SignalLevel) -> Result<(), &'static str> {
            self.writes += 1;
            self.level = Some(level);
            Ok(())
        }

        fn read_back(&mut self) -> Option<SignalLevel> {
            self.stuck.or(self.level)
        }
    }

    #[test]
    fn construction_de_energizes_active_low_relay() {
        let driver = ActuatorDriver::new(Pin::new(), &SystemConfig::DEFAULT);
        assert_eq!(driver.relay.level, Some(SignalLevel::High));
        assert_eq!(driver.relay.writes, 1);
    }

    #[test]
    fn active_low_mapping() {
        let mut driver = ActuatorDriver::new(Pin::new(), &SystemConfig::DEFAULT);
        driver.apply(PumpState::Irrigating).unwrap();
        assert_eq!(driver.relay.level, Some(SignalLevel::Low));
        assert!(driver.is_active(SignalLevel::Low));

        driver.apply(PumpState::Idle).unwrap();
        assert_eq!(driver.relay.level, Some(SignalLevel::High));
        assert!(!driver.is_active(SignalLevel::High));
    }

    #[test]
    fn active_high_mapping() {
        let mut cfg = SystemConfig::DEFAULT;
        cfg.relay_polarity = RelayPolarity::ActiveHigh;
        let mut driver = ActuatorDriver::new(Pin::new(), &cfg);
        assert_eq!(driver.relay.level, Some(SignalLevel::Low));

        driver.apply(PumpState::Irrigating).unwrap();
        assert_eq!(driver.relay.level, Some(SignalLevel::High));
    }

    #[test]
    fn reapplying_same_state_is_harmless() {
        let mut driver = ActuatorDriver::new(Pin::new(), &SystemConfig::DEFAULT);
        for _ in 0..3 {
            assert_eq!(driver.apply(PumpState::Irrigating), Ok(()));
        }
        assert_eq!(driver.relay.writes, 4);
        assert_eq!(driver.relay.level, Some(SignalLevel::Low));
    }

    #[test]
    fn stuck_relay_reports_fault() {
        let mut pin = Pin::new();
        pin.stuck = Some(SignalLevel::High);
        let mut driver = ActuatorDriver::new(pin, &SystemConfig::DEFAULT);
        assert_eq!(
            driver.apply(PumpState::Irrigating),
            Err(Fault::ActuatorFault {
                commanded: PumpState::Irrigating
            })
        );
        assert_eq!(driver.apply(PumpState::Idle), Ok(()));
    }
}
