//! Telemetry channels written by the components.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::math::MathOp;

/// One telemetry channel write.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Telemetry {
    // ── Evaluator ─────────────────────────────────────────────
    /// Operator of the last completed operation.
    Operation(MathOp),
    /// Cumulative number of completed operations.
    NumberOfOps(u32),

    // ── Router ────────────────────────────────────────────────
    /// First operand of the last DO_MATH command.
    Val1(f32),
    /// Operator of the last DO_MATH command.
    Op(MathOp),
    /// Second operand of the last DO_MATH command.
    Val2(f32),
    /// Last result received from the evaluator.
    Result(f32),
}

impl Telemetry {
    pub const fn channel(&self) -> &'static str {
        match self {
            Self::Operation(_) => "OPERATION",
            Self::NumberOfOps(_) => "NUMBER_OF_OPS",
            Self::Val1(_) => "VAL1",
            Self::Op(_) => "OP",
            Self::Val2(_) => "VAL2",
            Self::Result(_) => "RESULT",
        }
    }
}

impl fmt::Display for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.channel();
        match self {
            Self::Operation(op) | Self::Op(op) => write!(f, "{name}={op}"),
            Self::NumberOfOps(n) => write!(f, "{name}={n}"),
            Self::Val1(v) | Self::Val2(v) | Self::Result(v) => write!(f, "{name}={v}"),
        }
    }
}
