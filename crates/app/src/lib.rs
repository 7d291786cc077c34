//! # ledbridge-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ControlLog`: current actuator state and atomic appends to both logs
//!   - `SensorRepository`: read side of the sensor log
//!   - `ActuatorRepository`: read side of the actuator log
//!   - `ActuatorPublisher`: outbound actuator commands
//! - Define **driving/inbound ports**:
//!   - `ControlLoop` / `ControlHandle`: the single write path for readings
//!     and overrides
//!   - `QueryService`: read-only projections over both logs
//! - Provide **in-process infrastructure** (actuator bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `ledbridge-domain` only (plus `tokio` for channels and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod control_loop;
pub mod event_bus;
pub mod ports;
pub mod services;
