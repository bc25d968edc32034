//! Inbound commands and the responses they produce.
//!
//! The command dispatcher routes an invocation to the owning component,
//! which queues it like any other message and answers exactly once on its
//! [`CommandResponsePort`](super::ports::CommandResponsePort).

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::math::MathOp;

/// Opcodes understood by the component pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum Opcode {
    /// Router: forward an arithmetic request.
    DoMath = 0x0100,
    /// Evaluator: reset the FACTOR_UPDATED throttle.
    ClearEventThrottle = 0x0200,
    /// Evaluator: set FACTOR from the command argument.
    FactorParamSet = 0x0201,
    /// Evaluator: persist FACTOR to the parameter store.
    FactorParamSave = 0x0202,
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DoMath => "DO_MATH",
            Self::ClearEventThrottle => "CLEAR_EVENT_THROTTLE",
            Self::FactorParamSet => "FACTOR_PARAM_SET",
            Self::FactorParamSave => "FACTOR_PARAM_SAVE",
        })
    }
}

/// Completion status reported to the command dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandStatus {
    Ok,
    Error,
}

/// One command completion, emitted once per received command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub opcode: Opcode,
    /// Caller-supplied sequence token, echoed back unchanged.
    pub seq: u32,
    pub status: CommandStatus,
}

/// Commands accepted by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EvaluatorCommand {
    ClearEventThrottle,
    FactorParamSet(f32),
    FactorParamSave,
}

impl EvaluatorCommand {
    pub const fn opcode(&self) -> Opcode {
        match self {
            Self::ClearEventThrottle => Opcode::ClearEventThrottle,
            Self::FactorParamSet(_) => Opcode::FactorParamSet,
            Self::FactorParamSave => Opcode::FactorParamSave,
        }
    }
}

/// Commands accepted by the router.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RouterCommand {
    DoMath {
        operand1: f32,
        op: MathOp,
        operand2: f32,
    },
}

impl RouterCommand {
    pub const fn opcode(&self) -> Opcode {
        match self {
            Self::DoMath { .. } => Opcode::DoMath,
        }
    }
}
