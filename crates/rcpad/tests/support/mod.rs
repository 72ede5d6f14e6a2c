//! Shared fakes for controller integration tests.
#![allow(dead_code)]
#![allow(clippy::panic, clippy::unwrap_used, clippy::expect_used)]

use rcpad::controller::{Context, InputHandler};
use rcpad::input::KeySource;
use rcpad::model::{Command, Key};
use rcpad::render::RenderSurface;
use rcpad::ControllerConfig;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;

/// One scripted input step.
pub enum Step {
    Key(Key),
    /// No key for this long.
    Pause(Duration),
}

/// Key source that replays a fixed script, then reports no keys.
pub struct ScriptedKeys {
    steps: VecDeque<Step>,
}

impl ScriptedKeys {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: steps.into(),
        }
    }

    pub fn keys(keys: &[Key]) -> Self {
        Self::new(keys.iter().copied().map(Step::Key).collect())
    }

    pub fn silent() -> Self {
        Self::new(Vec::new())
    }
}

impl KeySource for ScriptedKeys {
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<Key>> {
        match self.steps.pop_front() {
            Some(Step::Key(key)) => Ok(Some(key)),
            Some(Step::Pause(remaining)) => {
                let slept = remaining.min(timeout);
                thread::sleep(slept);
                if remaining > slept {
                    self.steps.push_front(Step::Pause(remaining - slept));
                }
                Ok(None)
            }
            None => {
                thread::sleep(timeout);
                Ok(None)
            }
        }
    }
}

/// Handler that records every dispatch with its arrival time.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<(Instant, Command)>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<Command> {
        self.events.lock().unwrap().iter().map(|(_, c)| *c).collect()
    }

    /// Every dispatch except the idle `None` heartbeat.
    pub fn moves(&self) -> Vec<Command> {
        self.commands()
            .into_iter()
            .filter(|c| *c != Command::None)
            .collect()
    }

    pub fn timed_moves(&self) -> Vec<(Instant, Command)> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, c)| *c != Command::None)
            .copied()
            .collect()
    }
}

impl InputHandler for Recorder {
    fn on_input(&self, command: Command, _context: Option<&Context>) {
        self.events.lock().unwrap().push((Instant::now(), command));
    }
}

/// Surface that draws nothing.
pub struct NullSurface;

impl RenderSurface for NullSurface {
    fn init(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn print_line(&mut self, _row: u16, _text: &str) -> io::Result<()> {
        Ok(())
    }

    fn release(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// What a [`RecordingSurface`] was asked to do.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SurfaceLog {
    pub inits: usize,
    pub releases: usize,
    pub lines: Vec<(u16, String)>,
}

/// Surface that logs every call and can be told to fail `init`.
#[derive(Clone, Default)]
pub struct RecordingSurface {
    log: Arc<Mutex<SurfaceLog>>,
    fail_init: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_init() -> Self {
        Self {
            fail_init: true,
            ..Self::default()
        }
    }

    pub fn log(&self) -> SurfaceLog {
        self.log.lock().unwrap().clone()
    }
}

impl RenderSurface for RecordingSurface {
    fn init(&mut self) -> io::Result<()> {
        self.log.lock().unwrap().inits += 1;
        if self.fail_init {
            return Err(io::Error::other("screen unavailable"));
        }
        Ok(())
    }

    fn print_line(&mut self, row: u16, text: &str) -> io::Result<()> {
        self.log.lock().unwrap().lines.push((row, text.to_string()));
        Ok(())
    }

    fn release(&mut self) -> io::Result<()> {
        self.log.lock().unwrap().releases += 1;
        Ok(())
    }
}

/// Key source whose every poll fails immediately.
#[derive(Clone, Default)]
pub struct FailingKeys {
    polls: Arc<AtomicUsize>,
}

impl FailingKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

impl KeySource for FailingKeys {
    fn poll_key(&mut self, _timeout: Duration) -> io::Result<Option<Key>> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        Err(io::Error::other("terminal gone"))
    }
}

/// Handler that panics on one command and records everything else.
#[derive(Clone)]
pub struct PanicOn {
    command: Command,
    inner: Recorder,
    fired: Arc<AtomicBool>,
}

impl PanicOn {
    pub fn new(command: Command, inner: Recorder) -> Self {
        Self {
            command,
            inner,
            fired: Arc::default(),
        }
    }

    pub fn fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }
}

impl InputHandler for PanicOn {
    fn on_input(&self, command: Command, context: Option<&Context>) {
        if command == self.command {
            self.fired.store(true, Ordering::SeqCst);
            panic!("handler rejected {command}");
        }
        self.inner.on_input(command, context);
    }
}

/// Writer whose bytes stay inspectable after it is moved into a surface.
#[derive(Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn contents(&self) -> Vec<u8> {
        self.bytes.lock().unwrap().clone()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Config with short timings so tests finish quickly.
pub fn fast_config(replay_file: Option<PathBuf>) -> ControllerConfig {
    ControllerConfig {
        replay_file,
        replay_required: false,
        poll_interval_ms: 10,
        yield_interval_us: 10,
        replay_delay_ms: 20,
        hold_repeats: 3,
    }
}

pub fn replay_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create replay file");
    file.write_all(contents.as_bytes()).expect("write replay file");
    file.flush().expect("flush replay file");
    file
}

/// Poll `condition` until it holds or `timeout` passes.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}
