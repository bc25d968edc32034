//! Arithmetic request types and the raw evaluation rule.
//!
//! Scaling, counters and reporting live in the
//! [`Evaluator`](crate::app::evaluator::Evaluator); this module only knows
//! how to combine two operands.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::UnknownOperator;

/// Arithmetic operator carried by every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MathOp {
    Add = 0,
    Sub = 1,
    Mul = 2,
    Div = 3,
}

impl MathOp {
    pub const ALL: [MathOp; 4] = [MathOp::Add, MathOp::Sub, MathOp::Mul, MathOp::Div];

    /// Combine two operands.
    ///
    /// Returns `None` when a division has a zero divisor; the caller is
    /// expected to abort the request in that case.
    pub fn apply(self, lhs: f32, rhs: f32) -> Option<f32> {
        match self {
            Self::Add => Some(lhs + rhs),
            Self::Sub => Some(lhs - rhs),
            Self::Mul => Some(lhs * rhs),
            Self::Div if rhs == 0.0 => None,
            Self::Div => Some(lhs / rhs),
        }
    }

    /// Wire name of the operator.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::Div => "DIV",
        }
    }
}

impl fmt::Display for MathOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for MathOp {
    type Error = UnknownOperator;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Add),
            1 => Ok(Self::Sub),
            2 => Ok(Self::Mul),
            3 => Ok(Self::Div),
            other => Err(UnknownOperator(other)),
        }
    }
}

/// A request to combine two operands.  Immutable once enqueued.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArithmeticRequest {
    pub operand1: f32,
    pub op: MathOp,
    pub operand2: f32,
}

impl ArithmeticRequest {
    pub fn new(operand1: f32, op: MathOp, operand2: f32) -> Self {
        Self {
            operand1,
            op,
            operand2,
        }
    }

    /// Unscaled result, or `None` on division by zero.
    pub fn evaluate(&self) -> Option<f32> {
        self.op.apply(self.operand1, self.operand2)
    }
}
