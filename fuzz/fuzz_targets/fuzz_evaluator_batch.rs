//! Fuzz target: `Evaluator::sched_in`
//!
//! Decodes arbitrary bytes into a batch of evaluator messages, dispatches
//! them in one tick, and checks the batch invariants: every message is
//! dispatched, every command is answered, and results never outnumber
//! completed operations.
//!
//! cargo fuzz run fuzz_evaluator_batch

#![no_main]

use libfuzzer_sys::fuzz_target;
use mathcomp::adapters::memory_store::MemoryStore;
use mathcomp::app::commands::{CommandResponse, EvaluatorCommand};
use mathcomp::app::evaluator::{EVALUATOR_QUEUE_DEPTH, Evaluator};
use mathcomp::app::events::AppEvent;
use mathcomp::app::ports::{
    CommandResponsePort, EventSink, ResultPort, StoragePort, TelemetrySink,
};
use mathcomp::app::telemetry::Telemetry;
use mathcomp::config::ComponentConfig;
use mathcomp::error::StorageError;
use mathcomp::math::MathOp;
use mathcomp::param::{ParamId, ParamValid};

#[derive(Default)]
struct Counters {
    events: usize,
    results: usize,
    responses: usize,
    store: MemoryStore,
}

impl EventSink for Counters {
    fn emit(&mut self, _: &AppEvent) {
        self.events += 1;
    }
}
impl TelemetrySink for Counters {
    fn record(&mut self, _: &Telemetry) {}
}
impl ResultPort for Counters {
    fn publish(&mut self, _: f32) {
        self.results += 1;
    }
}
impl CommandResponsePort for Counters {
    fn respond(&mut self, _: CommandResponse) {
        self.responses += 1;
    }
}
impl StoragePort for Counters {
    fn read(&self, ns: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        self.store.read(ns, key, buf)
    }
    fn write(&mut self, ns: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.store.write(ns, key, data)
    }
    fn delete(&mut self, ns: &str, key: &str) -> Result<(), StorageError> {
        self.store.delete(ns, key)
    }
    fn exists(&self, ns: &str, key: &str) -> bool {
        self.store.exists(ns, key)
    }
}

fn f32_at(chunk: &[u8]) -> f32 {
    f32::from_le_bytes([chunk[1], chunk[2], chunk[3], chunk[4]])
}

fuzz_target!(|data: &[u8]| {
    let mut eval = Evaluator::new(&ComponentConfig::default(), Counters::default());
    let handle = eval.handle();

    let mut posted = 0;
    let mut commands = 0;
    for chunk in data.chunks_exact(9).take(EVALUATOR_QUEUE_DEPTH) {
        let operand2 = f32::from_le_bytes([chunk[5], chunk[6], chunk[7], chunk[8]]);
        match chunk[0] % 6 {
            0..=1 => {
                // Unknown operator codes are rejected before they reach the mailbox.
                let Ok(op) = MathOp::try_from(chunk[0] >> 4) else {
                    continue;
                };
                handle.submit_arithmetic(f32_at(chunk), op, operand2);
            }
            2 => {
                let validity = if chunk[0] & 0x80 == 0 {
                    ParamValid::Valid
                } else {
                    ParamValid::Default
                };
                handle.set_parameter(ParamId::Factor, f32_at(chunk), validity);
            }
            3 => {
                handle.invoke_command(EvaluatorCommand::ClearEventThrottle, u32::from(chunk[1]));
                commands += 1;
            }
            4 => {
                let cmd = if chunk[0] & 0x80 == 0 {
                    EvaluatorCommand::FactorParamSet(f32_at(chunk))
                } else {
                    EvaluatorCommand::FactorParamSave
                };
                handle.invoke_command(cmd, u32::from(chunk[1]));
                commands += 1;
            }
            _ => {
                handle.post_tick(u32::from(chunk[1]));
            }
        }
        posted += 1;
    }

    assert_eq!(eval.sched_in(0), posted);
    assert_eq!(eval.pending(), 0);
    let p = eval.ports();
    assert_eq!(p.responses, commands);
    assert_eq!(p.results, eval.op_count() as usize);
    assert!(p.events >= p.results);

    // A second tick with nothing queued does nothing.
    assert_eq!(eval.sched_in(1), 0);
});
