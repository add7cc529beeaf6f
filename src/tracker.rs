// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Input state for the trumpet: which valves are down, which breath keys are
//! held, and whether the sounding note needs to be re-picked.

use std::fmt;

use tracing::debug;

/// One of the three trumpet valves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Valve {
    First,
    Second,
    Third,
}

impl Valve {
    /// All valves in playing order.
    pub const ALL: [Valve; 3] = [Valve::First, Valve::Second, Valve::Third];

    /// Zero based position of the valve.
    pub fn index(self) -> usize {
        match self {
            Valve::First => 0,
            Valve::Second => 1,
            Valve::Third => 2,
        }
    }
}

/// One of the three breath (blow force) keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Breath {
    Soft,
    Medium,
    Hard,
}

impl Breath {
    /// All breath keys from softest to hardest.
    pub const ALL: [Breath; 3] = [Breath::Soft, Breath::Medium, Breath::Hard];

    /// Zero based position of the breath key.
    pub fn index(self) -> usize {
        match self {
            Breath::Soft => 0,
            Breath::Medium => 1,
            Breath::Hard => 2,
        }
    }
}

impl fmt::Display for Breath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Breath::Soft => "soft",
            Breath::Medium => "medium",
            Breath::Hard => "hard",
        };
        f.pad(name)
    }
}

/// A control the tracker understands. Physical keys are translated into
/// controls by the keymap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Valve(Valve),
    Breath(Breath),
}

/// Press state of the three valves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValveState {
    pressed: [bool; 3],
}

impl ValveState {
    /// Creates a valve state from explicit press flags.
    pub fn new(first: bool, second: bool, third: bool) -> ValveState {
        ValveState {
            pressed: [first, second, third],
        }
    }

    /// Returns true if the given valve is down.
    pub fn is_pressed(&self, valve: Valve) -> bool {
        self.pressed[valve.index()]
    }

    /// Returns true if any valve is down.
    pub fn any(&self) -> bool {
        self.pressed.iter().any(|pressed| *pressed)
    }

    /// Sets the valve and reports whether anything changed.
    fn set(&mut self, valve: Valve, pressed: bool) -> bool {
        let slot = &mut self.pressed[valve.index()];
        let changed = *slot != pressed;
        *slot = pressed;
        changed
    }
}

impl fmt::Display for ValveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for valve in Valve::ALL {
            write!(f, "{}", if self.is_pressed(valve) { 'o' } else { '-' })?;
        }
        Ok(())
    }
}

/// Press state of the three breath keys. The key pressed last among those
/// still held decides the blow level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlowState {
    held: [bool; 3],
    /// Held breath keys, oldest press first.
    order: Vec<Breath>,
}

impl BlowState {
    /// Returns true if the given breath key is held.
    pub fn is_held(&self, breath: Breath) -> bool {
        self.held[breath.index()]
    }

    /// Returns true if at least one breath key is held.
    pub fn is_active(&self) -> bool {
        self.held.iter().any(|held| *held)
    }

    /// The breath key currently deciding the blow level, if any.
    pub fn governing(&self) -> Option<Breath> {
        self.order.last().copied()
    }

    fn press(&mut self, breath: Breath) -> bool {
        if self.held[breath.index()] {
            return false;
        }
        self.held[breath.index()] = true;
        self.order.push(breath);
        true
    }

    fn release(&mut self, breath: Breath) -> bool {
        if !self.held[breath.index()] {
            return false;
        }
        self.held[breath.index()] = false;
        self.order.retain(|held| *held != breath);
        true
    }
}

/// Whether a new note decision is pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Retrigger {
    /// The sounding note (or silence) already matches the input.
    #[default]
    Idle,
    /// The note must be re-picked and played.
    Requested,
}

/// Tracks key transitions and derives the retrigger ("doot") flag.
#[derive(Debug, Default)]
pub struct Tracker {
    valves: ValveState,
    blow: BlowState,
    retrigger: Retrigger,
}

impl Tracker {
    /// Creates a tracker with nothing pressed.
    pub fn new() -> Tracker {
        Tracker::default()
    }

    /// Handles a key-down edge. Pressing a held control is a no-op.
    pub fn on_key_down(&mut self, control: Control) {
        match control {
            Control::Valve(valve) => {
                if self.valves.set(valve, true) {
                    self.valve_changed(valve);
                }
            }
            Control::Breath(breath) => {
                if self.blow.press(breath) {
                    debug!(breath = %breath, "Breath started.");
                    self.retrigger = Retrigger::Requested;
                }
            }
        }
    }

    /// Handles a key-up edge. Releasing a released control is a no-op.
    pub fn on_key_up(&mut self, control: Control) {
        match control {
            Control::Valve(valve) => {
                if self.valves.set(valve, false) {
                    self.valve_changed(valve);
                }
            }
            Control::Breath(breath) => {
                let was_governing = self.blow.governing() == Some(breath);
                if !self.blow.release(breath) {
                    return;
                }

                if !self.blow.is_active() {
                    debug!(breath = %breath, "Breath stopped.");
                    self.retrigger = Retrigger::Idle;
                } else if was_governing {
                    // An older breath key is still held and takes over.
                    self.retrigger = Retrigger::Requested;
                }
            }
        }
    }

    /// Releases every control, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        for valve in Valve::ALL {
            self.on_key_up(Control::Valve(valve));
        }
        for breath in Breath::ALL {
            self.on_key_up(Control::Breath(breath));
        }
    }

    /// Current valve state.
    pub fn valves(&self) -> ValveState {
        self.valves
    }

    /// Current breath state.
    pub fn breath(&self) -> &BlowState {
        &self.blow
    }

    /// The breath key deciding the blow level, if breath is active.
    pub fn blow(&self) -> Option<Breath> {
        self.blow.governing()
    }

    /// Current retrigger flag.
    pub fn retrigger(&self) -> Retrigger {
        self.retrigger
    }

    /// Marks the pending retrigger as consumed.
    pub fn clear_retrigger(&mut self) {
        self.retrigger = Retrigger::Idle;
    }

    fn valve_changed(&mut self, valve: Valve) {
        if self.blow.is_active() {
            debug!(valve = ?valve, valves = %self.valves, "Slurring to new fingering.");
            self.retrigger = Retrigger::Requested;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const VALVE_OPS: [(Valve, bool); 6] = [
        (Valve::First, true),
        (Valve::First, false),
        (Valve::Second, true),
        (Valve::Second, false),
        (Valve::Third, true),
        (Valve::Third, false),
    ];

    fn apply(tracker: &mut Tracker, control: Control, down: bool) {
        if down {
            tracker.on_key_down(control);
        } else {
            tracker.on_key_up(control);
        }
    }

    #[test]
    fn test_valves_follow_last_edge() {
        // Every sequence of five valve edges: the final state of each valve is
        // its last edge, regardless of redundant presses and releases.
        let ops = VALVE_OPS.len();
        for mut code in 0..ops.pow(5) {
            let mut tracker = Tracker::new();
            let mut expected = [false; 3];
            for _ in 0..5 {
                let (valve, down) = VALVE_OPS[code % ops];
                code /= ops;
                apply(&mut tracker, Control::Valve(valve), down);
                expected[valve.index()] = down;
            }

            for valve in Valve::ALL {
                assert_eq!(expected[valve.index()], tracker.valves().is_pressed(valve));
            }
        }
    }

    #[test]
    fn test_breath_active_iff_any_held() {
        let ops: Vec<(Breath, bool)> = Breath::ALL
            .iter()
            .flat_map(|breath| [(*breath, true), (*breath, false)])
            .collect();
        for mut code in 0..ops.len().pow(4) {
            let mut tracker = Tracker::new();
            let mut held = [false; 3];
            for _ in 0..4 {
                let (breath, down) = ops[code % ops.len()];
                code /= ops.len();
                apply(&mut tracker, Control::Breath(breath), down);
                held[breath.index()] = down;
                assert_eq!(held.iter().any(|h| *h), tracker.breath().is_active());
            }
        }
    }

    #[test]
    fn test_valve_without_breath_does_not_retrigger() {
        let mut tracker = Tracker::new();
        tracker.on_key_down(Control::Valve(Valve::First));
        tracker.on_key_up(Control::Valve(Valve::First));
        tracker.on_key_down(Control::Valve(Valve::Third));
        assert_eq!(Retrigger::Idle, tracker.retrigger());
        assert!(tracker.valves().is_pressed(Valve::Third));
    }

    #[test]
    fn test_breath_and_valve_retrigger() {
        let mut tracker = Tracker::new();
        tracker.on_key_down(Control::Breath(Breath::Medium));
        assert_eq!(Retrigger::Requested, tracker.retrigger());
        assert_eq!(Some(Breath::Medium), tracker.blow());

        tracker.clear_retrigger();
        tracker.on_key_down(Control::Valve(Valve::Second));
        assert_eq!(Retrigger::Requested, tracker.retrigger());

        tracker.clear_retrigger();
        tracker.on_key_up(Control::Valve(Valve::Second));
        assert_eq!(Retrigger::Requested, tracker.retrigger());

        // Redundant edges do not raise the flag.
        tracker.clear_retrigger();
        tracker.on_key_up(Control::Valve(Valve::Second));
        tracker.on_key_down(Control::Breath(Breath::Medium));
        assert_eq!(Retrigger::Idle, tracker.retrigger());
    }

    #[test]
    fn test_breath_release_clears_retrigger() {
        let mut tracker = Tracker::new();
        tracker.on_key_down(Control::Breath(Breath::Soft));
        tracker.on_key_up(Control::Breath(Breath::Soft));
        assert!(!tracker.breath().is_active());
        assert_eq!(Retrigger::Idle, tracker.retrigger());
        assert_eq!(None, tracker.blow());
    }

    #[test]
    fn test_last_breath_key_wins() {
        let mut tracker = Tracker::new();
        tracker.on_key_down(Control::Breath(Breath::Soft));
        tracker.on_key_down(Control::Breath(Breath::Hard));
        assert_eq!(Some(Breath::Hard), tracker.blow());

        // Releasing an older key keeps the level and does not retrigger.
        tracker.clear_retrigger();
        tracker.on_key_up(Control::Breath(Breath::Soft));
        assert_eq!(Some(Breath::Hard), tracker.blow());
        assert_eq!(Retrigger::Idle, tracker.retrigger());

        // Releasing the governing key hands over to the remaining one.
        tracker.on_key_down(Control::Breath(Breath::Medium));
        tracker.clear_retrigger();
        tracker.on_key_up(Control::Breath(Breath::Medium));
        assert_eq!(Some(Breath::Hard), tracker.blow());
        assert_eq!(Retrigger::Requested, tracker.retrigger());
    }

    #[test]
    fn test_release_all() {
        let mut tracker = Tracker::new();
        tracker.on_key_down(Control::Valve(Valve::First));
        tracker.on_key_down(Control::Valve(Valve::Third));
        tracker.on_key_down(Control::Breath(Breath::Hard));
        tracker.release_all();

        assert!(!tracker.valves().any());
        assert!(!tracker.breath().is_active());
        assert_eq!(Retrigger::Idle, tracker.retrigger());
    }

    #[test]
    fn test_valve_state_display() {
        assert_eq!("o-o", ValveState::new(true, false, true).to_string());
        assert_eq!("---", ValveState::default().to_string());
    }
}
