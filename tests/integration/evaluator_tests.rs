//! Evaluator behaviour: arithmetic, parameter updates, throttling, commands.

use crate::mock_ports::MockPorts;

use mathcomp::adapters::memory_store::MemoryStore;
use mathcomp::app::commands::{CommandStatus, EvaluatorCommand, Opcode};
use mathcomp::app::evaluator::{EVALUATOR_QUEUE_DEPTH, Evaluator, EvaluatorHandle};
use mathcomp::app::events::AppEvent;
use mathcomp::app::ports::StoragePort;
use mathcomp::app::telemetry::Telemetry;
use mathcomp::config::ComponentConfig;
use mathcomp::math::MathOp;
use mathcomp::param::{ParamId, ParamValid};

const CMD_SEQ: u32 = 42;

fn make_evaluator() -> (Evaluator<MockPorts>, EvaluatorHandle) {
    let eval = Evaluator::new(&ComponentConfig::default(), MockPorts::new());
    let handle = eval.handle();
    (eval, handle)
}

fn expected(op: MathOp, a: f32, b: f32, factor: f32) -> f32 {
    op.apply(a, b).unwrap() * factor
}

/// Set FACTOR through the parameter-store notification path and dispatch.
fn set_factor(eval: &mut Evaluator<MockPorts>, handle: &EvaluatorHandle, factor: f32, throttled: bool) {
    eval.ports_mut().clear_history();
    handle.set_parameter(ParamId::Factor, factor, ParamValid::Valid);
    assert_eq!(eval.sched_in(0), 1);
    if throttled {
        assert!(eval.ports().events.is_empty(), "FACTOR_UPDATED must be suppressed");
    } else {
        assert_eq!(eval.ports().events, vec![AppEvent::FactorUpdated(factor)]);
    }
}

/// Submit one request, tick once, and check every output.
fn do_math_op(eval: &mut Evaluator<MockPorts>, handle: &EvaluatorHandle, op: MathOp, factor: f32) {
    let (a, b) = (1234.5_f32, -17.25_f32);
    eval.ports_mut().clear_history();
    let ops_before = eval.op_count();

    handle.submit_arithmetic(a, op, b);
    assert_eq!(eval.sched_in(99), 1);

    let p = eval.ports();
    assert_eq!(p.results, vec![expected(op, a, b, factor)]);
    assert_eq!(p.events, vec![AppEvent::OperationPerformed(op)]);
    assert_eq!(
        p.telemetry,
        vec![
            Telemetry::Operation(op),
            Telemetry::NumberOfOps(ops_before + 1)
        ]
    );
    assert_eq!(eval.op_count(), ops_before + 1);
}

// ── Arithmetic ────────────────────────────────────────────────

#[test]
fn add_with_factor_from_notification() {
    let (mut eval, handle) = make_evaluator();
    set_factor(&mut eval, &handle, 2.5, false);
    do_math_op(&mut eval, &handle, MathOp::Add, 2.5);
}

#[test]
fn sub_with_factor_from_store() {
    let mut store = MemoryStore::new();
    {
        // Persist a value the way FACTOR_PARAM_SAVE would.
        let mut seed = Evaluator::new(&ComponentConfig::default(), MockPorts::new());
        let h = seed.handle();
        h.invoke_command(EvaluatorCommand::FactorParamSet(-4.0), 1);
        h.invoke_command(EvaluatorCommand::FactorParamSave, 2);
        seed.sched_in(0);
        let mut buf = [0u8; 16];
        let n = seed.ports().read("mathrecv", "factor", &mut buf).unwrap();
        store.write("mathrecv", "factor", &buf[..n]).unwrap();
    }

    let mut eval = Evaluator::new(&ComponentConfig::default(), MockPorts::with_store(store));
    let handle = eval.handle();
    assert_eq!(eval.load_parameters(), ParamValid::Valid);
    // Loading is silent.
    assert!(eval.ports().is_quiet());
    do_math_op(&mut eval, &handle, MathOp::Sub, -4.0);
}

#[test]
fn mul_and_div_with_default_factor() {
    let (mut eval, handle) = make_evaluator();
    assert_eq!(eval.load_parameters(), ParamValid::Default);
    do_math_op(&mut eval, &handle, MathOp::Mul, 1.0);
    do_math_op(&mut eval, &handle, MathOp::Div, 1.0);
    assert_eq!(eval.op_count(), 2);
}

#[test]
fn default_validity_ignores_supplied_value() {
    let (mut eval, handle) = make_evaluator();
    handle.set_parameter(ParamId::Factor, 100.0, ParamValid::Default);
    eval.sched_in(0);
    assert_eq!(eval.ports().events, vec![AppEvent::FactorUpdated(1.0)]);
    do_math_op(&mut eval, &handle, MathOp::Add, 1.0);
}

#[test]
fn divide_by_zero_aborts_request() {
    let (mut eval, handle) = make_evaluator();
    set_factor(&mut eval, &handle, 3.0, false);
    eval.ports_mut().clear_history();

    handle.submit_arithmetic(10.0, MathOp::Div, 0.0);
    assert_eq!(eval.sched_in(0), 1);

    let p = eval.ports();
    assert!(p.results.is_empty(), "no result for an aborted division");
    assert_eq!(p.events, vec![AppEvent::DivideByZero]);
    assert!(p.telemetry.is_empty());
    assert_eq!(eval.op_count(), 0);
}

#[test]
fn operation_counter_accumulates() {
    let (mut eval, handle) = make_evaluator();
    for op in MathOp::ALL {
        handle.submit_arithmetic(8.0, op, 2.0);
    }
    handle.submit_arithmetic(8.0, MathOp::Div, 0.0);
    assert_eq!(eval.sched_in(0), 5);

    let counts: Vec<u32> = eval
        .ports()
        .telemetry
        .iter()
        .filter_map(|t| match t {
            Telemetry::NumberOfOps(n) => Some(*n),
            _ => None,
        })
        .collect();
    assert_eq!(counts, vec![1, 2, 3, 4]);
    assert_eq!(eval.ports().results, vec![10.0, 6.0, 16.0, 4.0]);
}

// ── Dispatch loop ─────────────────────────────────────────────

#[test]
fn empty_tick_is_noop() {
    let (mut eval, _handle) = make_evaluator();
    assert_eq!(eval.sched_in(1), 0);
    assert!(eval.ports().is_quiet());
    assert_eq!(eval.op_count(), 0);
    assert_eq!(eval.throttle().count(mathcomp::throttle::ThrottledEvent::FactorUpdated), 0);
}

#[test]
fn mixed_messages_dispatch_in_arrival_order() {
    let (mut eval, handle) = make_evaluator();
    handle.submit_arithmetic(1.0, MathOp::Add, 1.0);
    handle.set_parameter(ParamId::Factor, 10.0, ParamValid::Valid);
    handle.post_tick(3);
    handle.invoke_command(EvaluatorCommand::ClearEventThrottle, CMD_SEQ);
    handle.submit_arithmetic(1.0, MathOp::Add, 1.0);
    assert_eq!(handle.pending(), 5);

    assert_eq!(eval.sched_in(0), 5);
    assert_eq!(handle.pending(), 0);

    let p = eval.ports();
    assert_eq!(
        p.events,
        vec![
            AppEvent::OperationPerformed(MathOp::Add),
            AppEvent::FactorUpdated(10.0),
            AppEvent::ThrottleCleared,
            AppEvent::OperationPerformed(MathOp::Add),
        ]
    );
    // The first request ran before the factor changed.
    assert_eq!(p.results, vec![2.0, 20.0]);
    p.assert_response(0, Opcode::ClearEventThrottle, CMD_SEQ, CommandStatus::Ok);
}

#[test]
#[should_panic(expected = "mailbox 'evaluator' full")]
fn overflowing_mailbox_is_fatal() {
    let (_eval, handle) = make_evaluator();
    for _ in 0..=EVALUATOR_QUEUE_DEPTH {
        handle.submit_arithmetic(1.0, MathOp::Add, 1.0);
    }
}

#[test]
fn concurrent_producers_are_all_dispatched() {
    let (mut eval, handle) = make_evaluator();
    let threads: Vec<_> = (0..4)
        .map(|i| {
            let h = handle.clone();
            std::thread::spawn(move || {
                for _ in 0..EVALUATOR_QUEUE_DEPTH / 4 {
                    h.submit_arithmetic(i as f32, MathOp::Mul, 2.0);
                }
            })
        })
        .collect();
    for t in threads {
        t.join().unwrap();
    }

    assert_eq!(eval.sched_in(0), EVALUATOR_QUEUE_DEPTH);
    assert_eq!(eval.op_count() as usize, EVALUATOR_QUEUE_DEPTH);
    assert_eq!(eval.ports().results.len(), EVALUATOR_QUEUE_DEPTH);
}

// ── Throttle ──────────────────────────────────────────────────

#[test]
fn factor_updated_throttle_and_clear() {
    let (mut eval, handle) = make_evaluator();
    let limit = ComponentConfig::default().factor_updated_throttle;

    for i in 0..limit {
        set_factor(&mut eval, &handle, i as f32 + 1.0, false);
    }

    // Suppressed, but the value still changes.
    set_factor(&mut eval, &handle, 7.0, true);
    do_math_op(&mut eval, &handle, MathOp::Mul, 7.0);

    eval.ports_mut().clear_history();
    handle.invoke_command(EvaluatorCommand::ClearEventThrottle, CMD_SEQ);
    assert_eq!(eval.sched_in(0), 1);
    assert_eq!(eval.ports().events, vec![AppEvent::ThrottleCleared]);
    assert_eq!(eval.ports().responses.len(), 1);
    eval.ports()
        .assert_response(0, Opcode::ClearEventThrottle, CMD_SEQ, CommandStatus::Ok);

    set_factor(&mut eval, &handle, 8.0, false);
}

#[test]
fn clear_throttle_always_succeeds() {
    let (mut eval, handle) = make_evaluator();
    handle.invoke_command(EvaluatorCommand::ClearEventThrottle, 1);
    handle.invoke_command(EvaluatorCommand::ClearEventThrottle, 2);
    eval.sched_in(0);

    let p = eval.ports();
    assert_eq!(p.count_events(|e| *e == AppEvent::ThrottleCleared), 2);
    p.assert_response(0, Opcode::ClearEventThrottle, 1, CommandStatus::Ok);
    p.assert_response(1, Opcode::ClearEventThrottle, 2, CommandStatus::Ok);
}

#[test]
fn operation_performed_is_never_throttled() {
    let (mut eval, handle) = make_evaluator();
    for _ in 0..10 {
        handle.submit_arithmetic(1.0, MathOp::Sub, 1.0);
    }
    eval.sched_in(0);
    assert_eq!(
        eval.ports()
            .count_events(|e| matches!(e, AppEvent::OperationPerformed(_))),
        10
    );
}

#[test]
fn custom_throttle_limit_from_config() {
    let config = ComponentConfig {
        factor_updated_throttle: 1,
        ..ComponentConfig::default()
    };
    let mut eval = Evaluator::new(&config, MockPorts::new());
    let handle = eval.handle();
    set_factor(&mut eval, &handle, 2.0, false);
    set_factor(&mut eval, &handle, 3.0, true);
}

// ── Parameter commands ────────────────────────────────────────

#[test]
fn param_set_command_updates_and_responds() {
    let (mut eval, handle) = make_evaluator();
    handle.invoke_command(EvaluatorCommand::FactorParamSet(0.5), 11);
    eval.sched_in(0);

    let p = eval.ports();
    assert_eq!(p.events, vec![AppEvent::FactorUpdated(0.5)]);
    p.assert_response(0, Opcode::FactorParamSet, 11, CommandStatus::Ok);
    assert_eq!(eval.factor().validity(), ParamValid::Valid);
    assert_eq!(eval.factor().get(), 0.5);
}

#[test]
fn param_save_persists_for_next_boot() {
    let (mut eval, handle) = make_evaluator();
    handle.invoke_command(EvaluatorCommand::FactorParamSet(6.0), 1);
    handle.invoke_command(EvaluatorCommand::FactorParamSave, 2);
    eval.sched_in(0);
    eval.ports()
        .assert_response(1, Opcode::FactorParamSave, 2, CommandStatus::Ok);
    assert!(eval.ports().exists("mathrecv", "factor"));
}

#[test]
fn param_save_failure_reports_error_and_keeps_running() {
    let (mut eval, handle) = make_evaluator();
    eval.ports_mut().store.fail_writes(true);
    handle.invoke_command(EvaluatorCommand::FactorParamSet(6.0), 1);
    handle.invoke_command(EvaluatorCommand::FactorParamSave, 2);
    handle.submit_arithmetic(1.0, MathOp::Add, 1.0);
    assert_eq!(eval.sched_in(0), 3);

    let p = eval.ports();
    p.assert_response(1, Opcode::FactorParamSave, 2, CommandStatus::Error);
    assert_eq!(p.results, vec![12.0]);
}

#[test]
fn unreadable_store_is_fatal_only_on_use() {
    let mut store = MemoryStore::new();
    store.fail_reads(true);
    let mut eval = Evaluator::new(&ComponentConfig::default(), MockPorts::with_store(store));
    assert_eq!(eval.load_parameters(), ParamValid::Invalid);
    // Nothing read FACTOR yet: an empty tick and a divide-by-zero are fine.
    let handle = eval.handle();
    handle.submit_arithmetic(1.0, MathOp::Div, 0.0);
    eval.sched_in(0);
    assert_eq!(eval.ports().events, vec![AppEvent::DivideByZero]);
}

#[test]
#[should_panic(expected = "validity Invalid")]
fn arithmetic_with_invalid_factor_is_fatal() {
    let mut store = MemoryStore::new();
    store.fail_reads(true);
    let mut eval = Evaluator::new(&ComponentConfig::default(), MockPorts::with_store(store));
    eval.load_parameters();
    eval.handle().submit_arithmetic(1.0, MathOp::Add, 1.0);
    eval.sched_in(0);
}

#[test]
fn parameter_name_is_resolved_at_the_boundary() {
    let (mut eval, handle) = make_evaluator();
    let id: ParamId = "FACTOR".parse().unwrap();
    handle.set_parameter(id, 2.0, ParamValid::Valid);
    eval.sched_in(0);
    assert_eq!(eval.ports().events, vec![AppEvent::FactorUpdated(2.0)]);
    assert!("GAIN".parse::<ParamId>().is_err());
}
