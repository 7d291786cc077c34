//! # ledbridge-domain
//!
//! Pure domain model for the ledbridge sensor-to-actuator bridge.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define **sensor samples** (temperature, humidity, illuminance readings)
//! - Define **actuator states** (the two LED channels and their log rows)
//! - Define **overrides** (partial actuator states supplied by a user)
//! - Contain the **decision rule** mapping sample + state + override to the
//!   next actuator state
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod actuator;
pub mod decision;
pub mod sensor;
