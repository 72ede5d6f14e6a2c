//! Simulated vehicle driven by dispatched commands.

use rcpad::Command;
use std::fmt;

/// Degrees turned per Left/Right dispatch. A held replay element (30
/// dispatches) turns a quarter circle.
const TURN_STEP_DEG: u16 = 3;
/// Movement dispatches that drain one percent of battery.
const MOVES_PER_PERCENT: u32 = 60;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimVehicle {
    distance: i64,
    heading: u16,
    jumps: u32,
    moves: u32,
    battery: u8,
    last: Command,
}

impl Default for SimVehicle {
    fn default() -> Self {
        Self {
            distance: 0,
            heading: 0,
            jumps: 0,
            moves: 0,
            battery: 100,
            last: Command::None,
        }
    }
}

impl SimVehicle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one command. Returns true when the visible state changed.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Forward => self.distance += 1,
            Command::Back => self.distance -= 1,
            Command::Left => self.heading = (self.heading + 360 - TURN_STEP_DEG) % 360,
            Command::Right => self.heading = (self.heading + TURN_STEP_DEG) % 360,
            Command::Jump => self.jumps += 1,
            Command::Exit | Command::None => return false,
        }
        self.last = command;
        self.moves += 1;
        if self.moves % MOVES_PER_PERCENT == 0 {
            self.battery = self.battery.saturating_sub(1);
        }
        true
    }

    pub fn battery(&self) -> u8 {
        self.battery
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }
}

impl fmt::Display for SimVehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "last: {:<8} distance: {:<5} heading: {:>3}  jumps: {}",
            self.last.as_str(),
            self.distance,
            self.heading,
            self.jumps
        )
    }
}
