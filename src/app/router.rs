//! Router: the actor that turns DO_MATH commands into evaluator requests.
//!
//! The router computes nothing.  It echoes the command operands to
//! telemetry, forwards an [`ArithmeticRequest`] on its
//! [`ArithmeticPort`](super::ports::ArithmeticPort), and reports results
//! that come back from the evaluator.

use std::sync::Arc;

use log::{debug, trace};

use crate::mailbox::{Envelope, Mailbox};
use crate::math::ArithmeticRequest;

use super::commands::{CommandResponse, CommandStatus, RouterCommand};
use super::events::AppEvent;
use super::ports::{ResultPort, RouterPorts};
use super::telemetry::Telemetry;

/// Router mailbox capacity.
pub const ROUTER_QUEUE_DEPTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RouterMessage {
    Command { command: RouterCommand, seq: u32 },
    Result(f32),
}

pub type RouterMailbox = Mailbox<RouterMessage, ROUTER_QUEUE_DEPTH>;

/// Producer-side handle for the router's mailbox.
#[derive(Clone)]
pub struct RouterHandle {
    mailbox: Arc<RouterMailbox>,
}

impl RouterHandle {
    pub fn invoke_command(&self, command: RouterCommand, seq: u32) -> u32 {
        self.mailbox.post(RouterMessage::Command { command, seq })
    }

    pub fn result_in(&self, value: f32) -> u32 {
        self.mailbox.post(RouterMessage::Result(value))
    }

    pub fn pending(&self) -> usize {
        self.mailbox.len()
    }
}

/// The evaluator's result port feeds straight into the router's mailbox.
impl ResultPort for RouterHandle {
    fn publish(&mut self, value: f32) {
        self.mailbox.post(RouterMessage::Result(value));
    }
}

pub struct Router<P: RouterPorts> {
    mailbox: Arc<RouterMailbox>,
    ports: P,
}

impl<P: RouterPorts> Router<P> {
    pub fn new(ports: P) -> Self {
        Self {
            mailbox: Arc::new(Mailbox::new("router")),
            ports,
        }
    }

    pub fn handle(&self) -> RouterHandle {
        RouterHandle {
            mailbox: Arc::clone(&self.mailbox),
        }
    }

    /// Scheduler entry point: dispatch every queued message.
    pub fn sched_in(&mut self, context: u32) -> usize {
        let mailbox = Arc::clone(&self.mailbox);
        let dispatched = mailbox.drain(|envelope| self.dispatch(envelope));
        if dispatched > 0 {
            debug!("Router tick {}: dispatched {}", context, dispatched);
        }
        dispatched
    }

    /// Dispatch a single queued message.  Returns `false` if the mailbox was
    /// empty.
    pub fn dispatch_one(&mut self) -> bool {
        match self.mailbox.pop() {
            Some(envelope) => {
                self.dispatch(envelope);
                true
            }
            None => false,
        }
    }

    fn dispatch(&mut self, envelope: Envelope<RouterMessage>) {
        trace!("Router #{}: {:?}", envelope.seq, envelope.msg);
        match envelope.msg {
            RouterMessage::Command { command, seq } => self.handle_command(command, seq),
            RouterMessage::Result(value) => {
                self.ports.record(&Telemetry::Result(value));
                self.ports.emit(&AppEvent::Result(value));
            }
        }
    }

    fn handle_command(&mut self, command: RouterCommand, seq: u32) {
        match command {
            RouterCommand::DoMath {
                operand1,
                op,
                operand2,
            } => {
                self.ports.record(&Telemetry::Val1(operand1));
                self.ports.record(&Telemetry::Op(op));
                self.ports.record(&Telemetry::Val2(operand2));
                self.ports.emit(&AppEvent::CommandReceived {
                    operand1,
                    op,
                    operand2,
                });
                self.ports
                    .submit(ArithmeticRequest::new(operand1, op, operand2));
            }
        }
        self.ports.respond(CommandResponse {
            opcode: command.opcode(),
            seq,
            status: CommandStatus::Ok,
        });
    }

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
