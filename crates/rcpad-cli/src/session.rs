//! Interactive drive session.
//!
//! The controller's tasks forward commands over a channel; the main thread
//! owns the simulated vehicle and all rendering.

use crate::record::EventRecorder;
use crate::sim::SimVehicle;
use rcpad::model::KEY_BINDINGS;
use rcpad::{
    Command, Context, Controller, ControllerConfig, ControllerResult,
    InputHandler, TriggerPhase,
};
use std::fmt;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;
use tracing::{info, warn};

/// How often the info row refreshes when no command arrives.
const REFRESH_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SessionEvent {
    Input(Command),
    Terminate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    ExitCommand,
    Interrupted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub reason: EndReason,
    pub moves: u32,
    pub battery: u8,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.reason {
            EndReason::ExitCommand => "exit command",
            EndReason::Interrupted => "interrupted",
        };
        write!(
            f,
            "session ended ({reason}): {} moves, battery {}%",
            self.moves, self.battery
        )
    }
}

/// Forwards movement commands to the session thread, recording them first.
struct ForwardingHandler {
    events: Sender<SessionEvent>,
    recorder: Option<EventRecorder>,
}

impl InputHandler for ForwardingHandler {
    fn on_input(&self, command: Command, _context: Option<&Context>) {
        if command == Command::None {
            return;
        }
        if let Some(recorder) = &self.recorder {
            if let Err(err) = recorder.record(command) {
                warn!(error = %err, "failed to record command");
            }
        }
        // The receiver is gone only once the session loop has returned.
        let _ = self.events.send(SessionEvent::Input(command));
    }
}

/// Run a session on the real terminal until Exit or a termination signal.
pub fn run(
    config: ControllerConfig,
    recorder: Option<EventRecorder>,
) -> ControllerResult<SessionSummary> {
    let (events, inbox) = mpsc::channel();
    install_signal_handler(events.clone());
    let controller = Controller::builder()
        .handler(ForwardingHandler { events, recorder })
        .config(config)
        .build()?;
    let outcome = drive(&controller, &inbox);
    let shutdown = controller.shutdown();
    let summary = outcome?;
    shutdown?;
    info!(moves = summary.moves, battery = summary.battery, "session ended");
    Ok(summary)
}

fn install_signal_handler(events: Sender<SessionEvent>) {
    let installed = ctrlc::set_handler(move || {
        let _ = events.send(SessionEvent::Terminate);
    });
    if let Err(err) = installed {
        warn!(error = %err, "termination signals will not end the session");
    }
}

fn drive(
    controller: &Controller,
    inbox: &Receiver<SessionEvent>,
) -> ControllerResult<SessionSummary> {
    let mut vehicle = SimVehicle::new();
    controller.print_header(&header_text())?;
    controller.print_info(&replay_status(controller))?;
    controller.print_battery(vehicle.battery())?;

    let mut phase = controller.trigger_phase();
    let reason = loop {
        match inbox.recv_timeout(REFRESH_INTERVAL) {
            Ok(SessionEvent::Input(Command::Exit)) => break EndReason::ExitCommand,
            Ok(SessionEvent::Input(command)) => {
                let battery = vehicle.battery();
                if vehicle.apply(command) {
                    phase = controller.trigger_phase();
                    controller.print_info(&info_line(&vehicle, phase))?;
                }
                if vehicle.battery() != battery {
                    controller.print_battery(vehicle.battery())?;
                }
            }
            Ok(SessionEvent::Terminate) | Err(RecvTimeoutError::Disconnected) => {
                break EndReason::Interrupted;
            }
            Err(RecvTimeoutError::Timeout) => {
                let current = controller.trigger_phase();
                if current != phase && vehicle.moves() > 0 {
                    controller.print_info(&info_line(&vehicle, current))?;
                }
                phase = current;
            }
        }
    };
    Ok(SessionSummary {
        reason,
        moves: vehicle.moves(),
        battery: vehicle.battery(),
    })
}

fn header_text() -> String {
    let bindings: Vec<String> = KEY_BINDINGS
        .iter()
        .map(|binding| format!("{}: {}", binding.key, binding.action))
        .collect();
    format!("rcpad | {}", bindings.join("  "))
}

fn replay_status(controller: &Controller) -> String {
    match controller.replay_sequence() {
        Some(sequence) if sequence.is_empty() => "replay file has no commands".to_string(),
        Some(sequence) => format!("replay ready: {sequence} (press r)"),
        None => "replay disabled".to_string(),
    }
}

fn info_line(vehicle: &SimVehicle, phase: TriggerPhase) -> String {
    let mode = match phase {
        TriggerPhase::Idle => "live",
        TriggerPhase::Armed | TriggerPhase::Draining => "replay",
    };
    format!("[{mode:<6}] {vehicle}")
}
