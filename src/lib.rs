//! MathComp: message-driven arithmetic components.
//!
//! A [`Router`](app::router::Router) accepts DO_MATH commands and forwards
//! requests; an [`Evaluator`](app::evaluator::Evaluator) queues them,
//! computes on its scheduler tick, scales by the FACTOR parameter, and
//! reports results, telemetry and rate-limited events.
//!
//! Both components are actors: producers post into a bounded mailbox from
//! any thread, and the owning component drains it synchronously each time
//! the external scheduler calls `sched_in`.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod mailbox;
pub mod math;
pub mod param;
pub mod throttle;
