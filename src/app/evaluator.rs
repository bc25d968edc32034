//! Evaluator: the actor that computes arithmetic requests.
//!
//! [`Evaluator`] owns its mailbox, the FACTOR parameter, the event throttle
//! table and the operation counter.  Producers reach it only through a
//! cloneable [`EvaluatorHandle`]; all state changes happen inside
//! [`sched_in`](Evaluator::sched_in), one batch per scheduler tick.
//!
//! ```text
//!  Router ────────┐
//!  Param store ───┼─▶ EvaluatorHandle ─▶ Mailbox ─▶ sched_in() ─▶ ResultPort
//!  Cmd dispatch ──┘                                            ─▶ EventSink
//!                                                              ─▶ TelemetrySink
//! ```

use std::sync::Arc;

use log::{debug, error, info, trace, warn};

use crate::config::ComponentConfig;
use crate::mailbox::{Envelope, Mailbox};
use crate::math::{ArithmeticRequest, MathOp};
use crate::param::{ParamId, ParamValid, ScalingParameter};
use crate::throttle::{ThrottleTable, ThrottledEvent};

use super::commands::{CommandResponse, CommandStatus, EvaluatorCommand};
use super::events::AppEvent;
use super::ports::{ArithmeticPort, EvaluatorPorts};
use super::telemetry::Telemetry;

/// Evaluator mailbox capacity.
pub const EVALUATOR_QUEUE_DEPTH: usize = 16;

/// Everything that can sit in the evaluator's mailbox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EvaluatorMessage {
    Arithmetic(ArithmeticRequest),
    /// Asynchronous scheduler notification.  Carries no work.
    Tick(u32),
    Command {
        command: EvaluatorCommand,
        seq: u32,
    },
    ParamSet {
        id: ParamId,
        value: f32,
        validity: ParamValid,
    },
}

pub type EvaluatorMailbox = Mailbox<EvaluatorMessage, EVALUATOR_QUEUE_DEPTH>;

// ───────────────────────────────────────────────────────────────
// Producer handle
// ───────────────────────────────────────────────────────────────

/// Producer-side handle.  Cheap to clone and safe to use from any thread;
/// every method enqueues and returns immediately.
#[derive(Clone)]
pub struct EvaluatorHandle {
    mailbox: Arc<EvaluatorMailbox>,
}

impl EvaluatorHandle {
    pub fn submit_arithmetic(&self, operand1: f32, op: MathOp, operand2: f32) -> u32 {
        self.mailbox.post(EvaluatorMessage::Arithmetic(ArithmeticRequest::new(
            operand1, op, operand2,
        )))
    }

    pub fn post_tick(&self, context: u32) -> u32 {
        self.mailbox.post(EvaluatorMessage::Tick(context))
    }

    /// Parameter-store notification that `id` changed.
    pub fn set_parameter(&self, id: ParamId, value: f32, validity: ParamValid) -> u32 {
        self.mailbox.post(EvaluatorMessage::ParamSet {
            id,
            value,
            validity,
        })
    }

    pub fn invoke_command(&self, command: EvaluatorCommand, seq: u32) -> u32 {
        self.mailbox.post(EvaluatorMessage::Command { command, seq })
    }

    /// Messages waiting for the next tick.
    pub fn pending(&self) -> usize {
        self.mailbox.len()
    }
}

impl ArithmeticPort for EvaluatorHandle {
    fn submit(&mut self, request: ArithmeticRequest) {
        self.mailbox.post(EvaluatorMessage::Arithmetic(request));
    }
}

// ───────────────────────────────────────────────────────────────
// Evaluator
// ───────────────────────────────────────────────────────────────

pub struct Evaluator<P: EvaluatorPorts> {
    mailbox: Arc<EvaluatorMailbox>,
    ports: P,
    factor: ScalingParameter,
    throttle: ThrottleTable,
    /// Completed operations since construction.  Never reset.
    op_count: u32,
    param_namespace: heapless::String<15>,
}

impl<P: EvaluatorPorts> Evaluator<P> {
    /// Construct the evaluator with an empty mailbox and FACTOR on its
    /// default.  Call [`load_parameters`](Self::load_parameters) to pull the
    /// persisted value.
    pub fn new(config: &ComponentConfig, ports: P) -> Self {
        info!(
            "Evaluator created (queue={}, FACTOR_UPDATED throttle={})",
            EVALUATOR_QUEUE_DEPTH, config.factor_updated_throttle
        );
        Self {
            mailbox: Arc::new(Mailbox::new("evaluator")),
            ports,
            factor: ScalingParameter::new(config.factor_default),
            throttle: ThrottleTable::new(config.factor_updated_throttle),
            op_count: 0,
            param_namespace: config.param_namespace.clone(),
        }
    }

    pub fn handle(&self) -> EvaluatorHandle {
        EvaluatorHandle {
            mailbox: Arc::clone(&self.mailbox),
        }
    }

    /// Read FACTOR from the parameter store.  Emits nothing.
    pub fn load_parameters(&mut self) -> ParamValid {
        self.factor.load(&self.ports, &self.param_namespace)
    }

    // ── Dispatch ──────────────────────────────────────────────

    /// Scheduler entry point: dispatch every queued message in arrival
    /// order.  Returns the number of messages handled.
    pub fn sched_in(&mut self, context: u32) -> usize {
        let mailbox = Arc::clone(&self.mailbox);
        let dispatched = mailbox.drain(|envelope| self.dispatch(envelope));
        if dispatched > 0 {
            debug!("Evaluator tick {}: dispatched {}", context, dispatched);
        }
        dispatched
    }

    fn dispatch(&mut self, envelope: Envelope<EvaluatorMessage>) {
        trace!("Evaluator #{}: {:?}", envelope.seq, envelope.msg);
        match envelope.msg {
            EvaluatorMessage::Arithmetic(request) => self.handle_arithmetic(request),
            EvaluatorMessage::Tick(context) => {
                trace!("Evaluator: queued tick {} (no work)", context);
            }
            EvaluatorMessage::Command { command, seq } => self.handle_command(command, seq),
            EvaluatorMessage::ParamSet {
                id,
                value,
                validity,
            } => {
                match id {
                    ParamId::Factor => self.factor.set(value, validity),
                }
                self.parameter_updated(id);
            }
        }
    }

    // ── Handlers ──────────────────────────────────────────────

    fn handle_arithmetic(&mut self, request: ArithmeticRequest) {
        let Some(raw) = request.evaluate() else {
            debug!(
                "Evaluator: {} / {} aborted (divide by zero)",
                request.operand1, request.operand2
            );
            self.ports.emit(&AppEvent::DivideByZero);
            return;
        };

        let result = raw * self.factor.get();
        self.op_count = self.op_count.wrapping_add(1);

        self.ports.emit(&AppEvent::OperationPerformed(request.op));
        self.ports.record(&Telemetry::Operation(request.op));
        self.ports.record(&Telemetry::NumberOfOps(self.op_count));
        self.ports.publish(result);
    }

    /// Validate the changed parameter and announce it (throttled).
    fn parameter_updated(&mut self, id: ParamId) {
        match id {
            ParamId::Factor => {
                let validity = self.factor.validity();
                if !matches!(validity, ParamValid::Valid | ParamValid::Default) {
                    error!("{} updated with validity {:?}", id, validity);
                    panic!("parameter {id} updated with validity {validity:?}");
                }
                let value = self.factor.get();
                if self.throttle.admit(ThrottledEvent::FactorUpdated) {
                    self.ports.emit(&AppEvent::FactorUpdated(value));
                }
            }
        }
    }

    fn handle_command(&mut self, command: EvaluatorCommand, seq: u32) {
        let status = match command {
            EvaluatorCommand::ClearEventThrottle => {
                self.throttle.clear(ThrottledEvent::FactorUpdated);
                self.ports.emit(&AppEvent::ThrottleCleared);
                CommandStatus::Ok
            }
            EvaluatorCommand::FactorParamSet(value) => {
                self.factor.set(value, ParamValid::Valid);
                self.parameter_updated(ParamId::Factor);
                CommandStatus::Ok
            }
            EvaluatorCommand::FactorParamSave => {
                match self.factor.save(&mut self.ports, &self.param_namespace) {
                    Ok(()) => CommandStatus::Ok,
                    Err(e) => {
                        warn!("FACTOR save failed: {}", e);
                        CommandStatus::Error
                    }
                }
            }
        };
        self.ports.respond(CommandResponse {
            opcode: command.opcode(),
            seq,
            status,
        });
    }

    // ── Queries ───────────────────────────────────────────────

    /// Total completed operations.
    pub fn op_count(&self) -> u32 {
        self.op_count
    }

    pub fn factor(&self) -> &ScalingParameter {
        &self.factor
    }

    pub fn throttle(&self) -> &ThrottleTable {
        &self.throttle
    }

    /// Messages waiting for the next tick.
    pub fn pending(&self) -> usize {
        self.mailbox.len()
    }

    pub fn ports(&self) -> &P {
        &self.ports
    }

    pub fn ports_mut(&mut self) -> &mut P {
        &mut self.ports
    }
}
