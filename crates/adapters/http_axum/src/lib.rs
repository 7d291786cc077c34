//! # ledbridge-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the JSON API consumed by the browser dashboard
//!   (`/api/latest`, `/api/led`, `/api/history_sensors`, `/api/history_led`)
//! - Route overrides into the control loop through its
//!   [`ControlHandle`](ledbridge_app::control_loop::ControlHandle)
//! - Map read-side projections and domain errors into HTTP responses
//!
//! Handlers never touch storage for writes. The dashboard is served from a
//! different origin, so the router allows any origin.
//!
//! ## Dependency rule
//! Depends on `ledbridge-app` (for port traits and services) and
//! `ledbridge-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
