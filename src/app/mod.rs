//! Application core: the two actors and their port boundary.
//!
//! The [`router`] relays DO_MATH commands; the [`evaluator`] computes them.
//! Neither touches I/O directly: everything outbound flows through the
//! **port traits** in [`ports`], so both actors run unchanged against mock
//! adapters.

pub mod commands;
pub mod evaluator;
pub mod events;
pub mod ports;
pub mod router;
pub mod telemetry;
