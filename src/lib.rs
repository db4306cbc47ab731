//! FarmTech soil-moisture irrigation firmware.
//!
//! Reads an analog moisture probe, runs a two-threshold hysteresis policy
//! over the reading, drives an active-low pump relay and reports status on a
//! two-row display and a serial telemetry line.
//!
//! Everything outside [`hardware`] and [`display`] is hardware-independent and
//! builds on the host, which is where the unit and integration tests run.

#![cfg_attr(not(test), no_std)]

pub mod actuator;
pub mod config;
pub mod controller;
pub mod error;
pub mod logic;
pub mod model;
pub mod render;
pub mod sensor;
pub mod telemetry;
pub mod traits;

#[cfg(feature = "esp32")]
pub mod display;
#[cfg(feature = "esp32")]
pub mod hardware;
