// Test module - relaxed lint rules
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(missing_docs)]

//! Live input loop tests
//!
//! Drives a real controller with scripted keys and checks what reaches the
//! handler.

mod support;

use rcpad::model::{Command, Key};
use rcpad::{Context, Controller, ControllerConfig, ControllerError, ErrorCode};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use support::{fast_config, replay_file, wait_until, NullSurface, Recorder, ScriptedKeys, Step};

fn start(keys: ScriptedKeys, config: ControllerConfig, recorder: &Recorder) -> Controller {
    Controller::builder()
        .handler(recorder.clone())
        .config(config)
        .key_source(keys)
        .surface(NullSurface)
        .build()
        .expect("controller should start")
}

// =============================================================================
// Key Mapping
// =============================================================================

#[test]
fn each_mapped_key_dispatches_its_command_once() {
    let cases = [
        (Key::Esc, Command::Exit),
        (Key::Char('q'), Command::Exit),
        (Key::Up, Command::Forward),
        (Key::Down, Command::Back),
        (Key::Left, Command::Left),
        (Key::Right, Command::Right),
        (Key::Char(' '), Command::Jump),
    ];
    for (key, expected) in cases {
        let recorder = Recorder::new();
        let controller = start(ScriptedKeys::keys(&[key]), fast_config(None), &recorder);
        assert!(wait_until(Duration::from_secs(2), || !recorder.moves().is_empty()));
        thread::sleep(Duration::from_millis(50));
        controller.shutdown().unwrap();
        assert_eq!(recorder.moves(), vec![expected], "key {key:?}");
    }
}

#[test]
fn keys_are_dispatched_in_order() {
    let recorder = Recorder::new();
    let keys = ScriptedKeys::keys(&[Key::Up, Key::Left, Key::Char(' '), Key::Down]);
    let controller = start(keys, fast_config(None), &recorder);
    assert!(wait_until(Duration::from_secs(2), || recorder.moves().len() == 4));
    controller.shutdown().unwrap();
    assert_eq!(
        recorder.moves(),
        vec![Command::Forward, Command::Left, Command::Jump, Command::Back]
    );
}

#[test]
fn unmapped_key_dispatches_none() {
    let recorder = Recorder::new();
    let controller = start(
        ScriptedKeys::keys(&[Key::Char('x')]),
        fast_config(None),
        &recorder,
    );
    assert!(wait_until(Duration::from_secs(2), || {
        recorder.commands().first() == Some(&Command::None)
    }));
    controller.shutdown().unwrap();
    assert!(recorder.moves().is_empty());
}

#[test]
fn idle_polling_sends_none_heartbeat() {
    let recorder = Recorder::new();
    let controller = start(ScriptedKeys::silent(), fast_config(None), &recorder);
    assert!(wait_until(Duration::from_secs(2), || recorder.commands().len() >= 3));
    controller.shutdown().unwrap();
    assert!(recorder.commands().iter().all(|c| *c == Command::None));
}

#[test]
fn replay_key_never_dispatches_by_itself() {
    let recorder = Recorder::new();
    let file = replay_file("xyz123");
    let keys = ScriptedKeys::keys(&[Key::Char('r'), Key::Char('R')]);
    let controller = start(keys, fast_config(Some(file.path().to_path_buf())), &recorder);
    thread::sleep(Duration::from_millis(150));
    controller.shutdown().unwrap();
    assert!(recorder.moves().is_empty(), "got {:?}", recorder.moves());
}

// =============================================================================
// Context
// =============================================================================

#[test]
fn context_reaches_the_handler() {
    let seen: Arc<Mutex<Vec<Option<u32>>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let handler = move |command: Command, context: Option<&Context>| {
        if command == Command::Forward {
            let value = context.and_then(|ctx| ctx.downcast_ref::<u32>()).copied();
            sink.lock().unwrap().push(value);
        }
    };
    let keys = ScriptedKeys::new(vec![
        Step::Key(Key::Up),
        Step::Pause(Duration::from_millis(150)),
        Step::Key(Key::Up),
    ]);
    let controller = Controller::builder()
        .handler(handler)
        .config(fast_config(None))
        .key_source(keys)
        .surface(NullSurface)
        .context(Arc::new(1_u32))
        .build()
        .unwrap();
    assert!(wait_until(Duration::from_secs(2), || seen.lock().unwrap().len() == 1));
    controller.set_context(Arc::new(2_u32));
    assert!(wait_until(Duration::from_secs(2), || seen.lock().unwrap().len() == 2));
    controller.shutdown().unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![Some(1), Some(2)]);
}

#[test]
fn handler_without_context_sees_none() {
    let seen: Arc<Mutex<Vec<bool>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let handler = move |_command: Command, context: Option<&Context>| {
        sink.lock().unwrap().push(context.is_some());
    };
    let controller = Controller::builder()
        .handler(handler)
        .config(fast_config(None))
        .key_source(ScriptedKeys::keys(&[Key::Up]))
        .surface(NullSurface)
        .build()
        .unwrap();
    assert!(wait_until(Duration::from_secs(2), || !seen.lock().unwrap().is_empty()));
    controller.shutdown().unwrap();
    assert!(seen.lock().unwrap().iter().all(|has_context| !has_context));
}

// =============================================================================
// Construction and Teardown
// =============================================================================

#[test]
fn build_without_handler_fails() {
    let result = Controller::builder()
        .config(fast_config(None))
        .key_source(ScriptedKeys::silent())
        .surface(NullSurface)
        .build();
    match result {
        Err(err @ ControllerError::MissingHandler) => {
            assert_eq!(err.code(), ErrorCode::MissingHandler);
        }
        other => panic!("expected MissingHandler, got {other:?}"),
    }
}

#[test]
fn build_rejects_invalid_config() {
    let config = ControllerConfig {
        hold_repeats: 0,
        ..fast_config(None)
    };
    let result = Controller::builder()
        .handler(Recorder::new())
        .config(config)
        .key_source(ScriptedKeys::silent())
        .surface(NullSurface)
        .build();
    assert!(matches!(result, Err(ControllerError::ConfigInvalid(_))));
}

#[test]
fn shutdown_is_bounded_by_the_poll_interval() {
    let recorder = Recorder::new();
    let config = ControllerConfig {
        poll_interval_ms: 100,
        ..fast_config(None)
    };
    let controller = start(ScriptedKeys::silent(), config, &recorder);
    thread::sleep(Duration::from_millis(50));
    let started = Instant::now();
    controller.shutdown().unwrap();
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn dropping_the_controller_stops_dispatch() {
    let recorder = Recorder::new();
    let controller = start(ScriptedKeys::silent(), fast_config(None), &recorder);
    assert!(wait_until(Duration::from_secs(2), || !recorder.commands().is_empty()));
    drop(controller);
    let after_drop = recorder.commands().len();
    thread::sleep(Duration::from_millis(60));
    assert_eq!(recorder.commands().len(), after_drop);
}
