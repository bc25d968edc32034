//! Outbound application events.
//!
//! Components emit these through the [`EventSink`](super::ports::EventSink)
//! port.  Each event carries a fixed severity and formats to a
//! human-readable line; adapters decide where the line goes.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::math::MathOp;

/// Event severity, ordered from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    WarningHi,
    WarningLo,
    ActivityHi,
    ActivityLo,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::WarningHi => "WARNING_HI",
            Self::WarningLo => "WARNING_LO",
            Self::ActivityHi => "ACTIVITY_HI",
            Self::ActivityLo => "ACTIVITY_LO",
        })
    }
}

/// Structured events emitted by the router and evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    // ── Evaluator ─────────────────────────────────────────────
    /// A division request had a zero divisor and was aborted.
    DivideByZero,
    /// An arithmetic operation completed.
    OperationPerformed(MathOp),
    /// The FACTOR parameter changed (throttled).
    FactorUpdated(f32),
    /// The FACTOR_UPDATED throttle was reset by command.
    ThrottleCleared,

    // ── Router ────────────────────────────────────────────────
    /// A DO_MATH command was accepted and forwarded.
    CommandReceived {
        operand1: f32,
        op: MathOp,
        operand2: f32,
    },
    /// A result came back from the evaluator.
    Result(f32),
}

impl AppEvent {
    pub const fn severity(&self) -> Severity {
        match self {
            Self::DivideByZero => Severity::WarningHi,
            Self::CommandReceived { .. } => Severity::ActivityLo,
            Self::OperationPerformed(_)
            | Self::FactorUpdated(_)
            | Self::ThrottleCleared
            | Self::Result(_) => Severity::ActivityHi,
        }
    }

    /// Upper-case event name, stable across releases.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DivideByZero => "DIVIDE_BY_ZERO",
            Self::OperationPerformed(_) => "OPERATION_PERFORMED",
            Self::FactorUpdated(_) => "FACTOR_UPDATED",
            Self::ThrottleCleared => "THROTTLE_CLEARED",
            Self::CommandReceived { .. } => "COMMAND_RECV",
            Self::Result(_) => "RESULT",
        }
    }
}

impl fmt::Display for AppEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivideByZero => write!(f, "Divide by zero attempted, operation aborted"),
            Self::OperationPerformed(op) => write!(f, "Math operation performed: {op}"),
            Self::FactorUpdated(value) => write!(f, "Factor updated to {value}"),
            Self::ThrottleCleared => write!(f, "Event throttle cleared"),
            Self::CommandReceived {
                operand1,
                op,
                operand2,
            } => write!(f, "Math command received: {operand1} {op} {operand2}"),
            Self::Result(value) => write!(f, "Math result is {value}"),
        }
    }
}
