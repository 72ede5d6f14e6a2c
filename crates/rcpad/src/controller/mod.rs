//! Controller lifecycle: construction, label rendering and teardown.
//!
//! # Key Types
//!
//! - [`ControllerBuilder`] - Collects the handler, config and collaborators
//! - [`Controller`] - Owns the live input task, the replay task and the
//!   render surface
//! - [`InputHandler`] - Receives every dispatched [`Command`]
//!
//! # Example
//!
//! ```no_run
//! use rcpad::{Command, Context, Controller, ControllerConfig};
//!
//! # fn example() -> Result<(), rcpad::ControllerError> {
//! let controller = Controller::builder()
//!     .config(ControllerConfig::default())
//!     .handler(|command: Command, _context: Option<&Context>| {
//!         // forward the command to the vehicle
//!         let _ = command;
//!     })
//!     .build()?;
//! controller.print_header("arrows drive, r replays, q quits")?;
//! controller.shutdown()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Dispatch
//!
//! Both tasks call the handler directly on their own thread. Live and replay
//! dispatch are kept apart only cooperatively through the trigger's
//! suppression indicator; a live movement key pressed during a replay can be
//! delivered between two replay dispatches. Handlers that need strict
//! exclusivity must provide it themselves.

use crate::config::ControllerConfig;
use crate::error::{ControllerError, ControllerResult};
use crate::input::live::run_live_loop;
use crate::input::{CrosstermKeys, KeySource, LiveTiming};
use crate::model::Command;
use crate::render::{
    battery_label, RenderSurface, TerminalSurface, BATTERY_ROW, HEADER_ROW, INFO_ROW,
};
use crate::replay::player::run_replay_loop;
use crate::replay::{ReplaySequence, ReplayTiming};
use crate::trigger::{Trigger, TriggerPhase};
use std::any::Any;
use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, trace, warn};

const LIVE_TASK: &str = "live input";
const REPLAY_TASK: &str = "replay";

/// Opaque caller context forwarded unchanged to every handler call.
pub type Context = Arc<dyn Any + Send + Sync>;

/// Receives dispatched commands.
///
/// Called synchronously from the live input task or the replay task, possibly
/// up to `hold_repeats` times back to back. Implementations should return
/// quickly; a slow handler delays key polling. Live and replay calls are
/// not serialized against each other.
pub trait InputHandler: Send + Sync {
    /// Handle one dispatched command. `context` is the value last passed to
    /// [`ControllerBuilder::context`] or [`Controller::set_context`].
    fn on_input(&self, command: Command, context: Option<&Context>);
}

impl<F> InputHandler for F
where
    F: Fn(Command, Option<&Context>) + Send + Sync,
{
    fn on_input(&self, command: Command, context: Option<&Context>) {
        self(command, context);
    }
}

/// Which task issued a dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DispatchSource {
    Live,
    Replay,
}

impl DispatchSource {
    fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Replay => "replay",
        }
    }
}

/// State shared by the controller and both tasks.
pub(crate) struct Shared {
    handler: Arc<dyn InputHandler>,
    context: RwLock<Option<Context>>,
    running: AtomicBool,
    pub(crate) trigger: Trigger,
}

impl Shared {
    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub(crate) fn dispatch(&self, command: Command, source: DispatchSource) {
        let context = self
            .context
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        trace!(%command, source = source.as_str(), "dispatch");
        self.handler.on_input(command, context.as_ref());
    }

    fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.trigger.stop();
    }
}

/// Builder for [`Controller`].
#[derive(Default)]
pub struct ControllerBuilder {
    handler: Option<Arc<dyn InputHandler>>,
    config: ControllerConfig,
    keys: Option<Box<dyn KeySource>>,
    surface: Option<Box<dyn RenderSurface>>,
    context: Option<Context>,
}

impl ControllerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler that receives every dispatched command. Required.
    #[must_use]
    pub fn handler<H: InputHandler + 'static>(mut self, handler: H) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Shared handler, for callers that keep their own reference.
    #[must_use]
    pub fn shared_handler(mut self, handler: Arc<dyn InputHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    #[must_use]
    pub fn config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    /// Key source for the live loop. Defaults to [`CrosstermKeys`].
    #[must_use]
    pub fn key_source<K: KeySource + 'static>(mut self, keys: K) -> Self {
        self.keys = Some(Box::new(keys));
        self
    }

    /// Render surface. Defaults to [`TerminalSurface::stdout`].
    #[must_use]
    pub fn surface<S: RenderSurface + 'static>(mut self, surface: S) -> Self {
        self.surface = Some(Box::new(surface));
        self
    }

    /// Context passed to the handler from the first dispatch on.
    #[must_use]
    pub fn context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    /// Load the replay file, prepare the render surface and start both tasks.
    ///
    /// On failure everything already started is stopped and released before
    /// the error is returned.
    pub fn build(self) -> ControllerResult<Controller> {
        let handler = self.handler.ok_or(ControllerError::MissingHandler)?;
        let config = self.config;
        config.validate()?;
        let replay = load_replay(&config)?.map(Arc::new);

        let mut surface = self
            .surface
            .unwrap_or_else(|| Box::new(TerminalSurface::stdout()));
        let keys = self.keys.unwrap_or_else(|| Box::new(CrosstermKeys::new()));
        if let Err(source) = surface.init() {
            // Raw mode may already be on when the screen setup fails.
            let _ = surface.release();
            return Err(ControllerError::terminal("setup", source));
        }

        let shared = Arc::new(Shared {
            handler,
            context: RwLock::new(self.context),
            running: AtomicBool::new(true),
            trigger: Trigger::new(),
        });

        let mut controller = Controller {
            shared,
            surface: Mutex::new(surface),
            replay,
            live_task: None,
            replay_task: None,
            released: false,
        };
        if let Err(err) = controller.start_tasks(keys, &config) {
            // Task spawn failures outrank any teardown error.
            let _ = controller.teardown();
            return Err(err);
        }
        info!(
            replay_len = controller.replay.as_ref().map_or(0, |seq| seq.len()),
            "controller started"
        );
        Ok(controller)
    }
}

fn load_replay(config: &ControllerConfig) -> ControllerResult<Option<ReplaySequence>> {
    let Some(path) = config.replay_file.as_deref() else {
        debug!("no replay file configured");
        return Ok(None);
    };
    match ReplaySequence::load(path) {
        Ok(sequence) => {
            info!(path = %path.display(), len = sequence.len(), "replay sequence loaded");
            Ok(Some(sequence))
        }
        Err(err) if !config.replay_required => {
            warn!(error = %err, "replay disabled");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Running keyboard controller.
///
/// Dropping a controller tears it down like [`Controller::shutdown`] but
/// discards any teardown error.
pub struct Controller {
    shared: Arc<Shared>,
    surface: Mutex<Box<dyn RenderSurface>>,
    replay: Option<Arc<ReplaySequence>>,
    live_task: Option<JoinHandle<()>>,
    replay_task: Option<JoinHandle<()>>,
    released: bool,
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("running", &self.shared.is_running())
            .field("phase", &self.shared.trigger.phase())
            .field("replay", &self.replay)
            .finish_non_exhaustive()
    }
}

impl Controller {
    pub fn builder() -> ControllerBuilder {
        ControllerBuilder::new()
    }

    fn start_tasks(
        &mut self,
        mut keys: Box<dyn KeySource>,
        config: &ControllerConfig,
    ) -> ControllerResult<()> {
        let live_timing = LiveTiming {
            poll_interval: config.poll_interval(),
            yield_interval: config.yield_interval(),
        };
        let shared = Arc::clone(&self.shared);
        self.live_task = Some(spawn_task(LIVE_TASK, "rcpad-live", move || {
            run_live_loop(&shared, keys.as_mut(), live_timing);
        })?);

        let replay_timing = ReplayTiming {
            delay: config.replay_delay(),
            hold_repeats: config.hold_repeats,
        };
        let shared = Arc::clone(&self.shared);
        let replay = self.replay.clone();
        self.replay_task = Some(spawn_task(REPLAY_TASK, "rcpad-replay", move || {
            run_replay_loop(&shared, replay.as_deref(), replay_timing);
        })?);
        Ok(())
    }

    /// Replace the context forwarded to the handler. Takes effect from the
    /// next dispatch on.
    pub fn set_context(&self, context: Context) {
        *self
            .shared
            .context
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(context);
    }

    /// Draw `text` on the header row, replacing what was there.
    pub fn print_header(&self, text: &str) -> ControllerResult<()> {
        self.print_row(HEADER_ROW, text)
    }

    /// Draw `text` on the info row, replacing what was there.
    pub fn print_info(&self, text: &str) -> ControllerResult<()> {
        self.print_row(INFO_ROW, text)
    }

    /// Draw `Battery: <percent>` on the battery row. Values above 100 are
    /// drawn as given.
    pub fn print_battery(&self, percent: u8) -> ControllerResult<()> {
        self.print_row(BATTERY_ROW, &battery_label(percent))
    }

    fn print_row(&self, row: u16, text: &str) -> ControllerResult<()> {
        self.surface
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .print_line(row, text)
            .map_err(|source| ControllerError::terminal("write", source))
    }

    /// Current replay trigger phase.
    pub fn trigger_phase(&self) -> TriggerPhase {
        self.shared.trigger.phase()
    }

    /// The loaded replay sequence, if replay is enabled.
    pub fn replay_sequence(&self) -> Option<&ReplaySequence> {
        self.replay.as_deref()
    }

    /// Stop both tasks, wait for them and release the render surface.
    ///
    /// Returns the first failure: a panicked task, then a surface release
    /// error. Teardown runs to the end either way.
    pub fn shutdown(mut self) -> ControllerResult<()> {
        self.teardown()
    }

    fn teardown(&mut self) -> ControllerResult<()> {
        self.shared.stop();
        let mut result = Ok(());
        for (task, handle) in [
            (LIVE_TASK, self.live_task.take()),
            (REPLAY_TASK, self.replay_task.take()),
        ] {
            if let Some(handle) = handle {
                if handle.join().is_err() && result.is_ok() {
                    result = Err(ControllerError::TaskPanicked { task });
                }
            }
        }
        if !self.released {
            self.released = true;
            let released = self
                .surface
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner)
                .release();
            if let Err(source) = released {
                if result.is_ok() {
                    result = Err(ControllerError::terminal("restore", source));
                }
            }
        }
        debug!("controller stopped");
        result
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(err) = self.teardown() {
            warn!(error = %err, "controller teardown failed during drop");
        }
    }
}

fn spawn_task<F>(task: &'static str, name: &str, body: F) -> ControllerResult<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(name.to_string())
        .spawn(body)
        .map_err(|source: io::Error| ControllerError::TaskSpawn { task, source })
}
